use thiserror::Error;

/// Errors returned by sketch construction, register access and merges.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SketchError {
    /// Bucket count is zero, not a power of two, or above the supported maximum.
    #[error("invalid bucket count {0}: expected a power of two in [1, 65536]")]
    InvalidBucketCount(usize),
    /// Precision (log2 of the bucket count) is above the supported maximum.
    #[error("invalid precision {0}: expected a value in [0, 16]")]
    InvalidPrecision(u32),
    /// Register position is past the end of the store.
    #[error("register position {position} out of range for {len} registers")]
    OutOfRange { position: usize, len: usize },
    /// Rank does not fit into the register width.
    #[error("rank {rank} exceeds register maximum {max}")]
    InvalidRank { rank: u32, max: u32 },
    /// Merge of two structures with different bucket counts.
    #[error("cannot merge {right} buckets into {left} buckets")]
    ShapeMismatch { left: usize, right: usize },
    /// Merge of two sketches hashing with different seeds.
    #[error("cannot merge sketch hashed with seed {right} into sketch hashed with seed {left}")]
    SeedMismatch { left: u64, right: u64 },
    /// Packed register words do not match the expected layout.
    #[error("invalid register data: expected {expected} words, found {found}")]
    InvalidRegisterData { expected: usize, found: usize },
    /// Packed register word holds a value that no register may hold.
    #[error("invalid register data: word {word} holds bits outside of its registers")]
    InvalidRegisterValue { word: usize },
}
