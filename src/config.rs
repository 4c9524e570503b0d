//! Sketch configuration.
//!
//! A `SketchConfig` fixes everything that has to agree between sketches before
//! they can be merged: number of buckets and hash seed. It also picks the
//! linear counting formula used for small cardinalities.

#[cfg(feature = "with_serde")]
use serde::{Deserialize, Serialize};

use crate::correction::LinearCounting;
use crate::error::SketchError;
use crate::registers::{is_valid_len, MAX_REGISTERS};
use crate::router::MAX_PRECISION;

/// Default number of buckets (precision 12, ~1.6% standard error)
pub const DEFAULT_BUCKET_COUNT: usize = 1 << 12;
/// Smallest precision picked by `SketchConfig::with_error`
const MIN_ERROR_PRECISION: u32 = 4;

/// Configuration of a `Sketch`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "with_serde", derive(Serialize, Deserialize))]
pub struct SketchConfig {
    /// Number of registers, a power of two in `[1, 65536]`
    pub bucket_count: usize,
    /// Small-range correction formula
    pub linear_counting: LinearCounting,
    /// Seed passed to the hash function
    pub seed: u64,
}

impl SketchConfig {
    /// Create configuration with `bucket_count` registers
    pub fn new(bucket_count: usize) -> Self {
        Self {
            bucket_count,
            ..Self::default()
        }
    }

    /// Create configuration with `2^precision` registers
    pub fn with_precision(precision: u32) -> Result<Self, SketchError> {
        if precision > MAX_PRECISION {
            return Err(SketchError::InvalidPrecision(precision));
        }
        Ok(Self::new(1 << precision))
    }

    /// Create configuration with the fewest registers whose standard error
    /// `1.04 / sqrt(m)` does not exceed `target_error`.
    ///
    /// Precision is clamped to `[4, 16]`.
    pub fn with_error(target_error: f64) -> Self {
        let m = (1.04 / target_error).powi(2);
        let precision = if m.is_finite() && m > 1.0 {
            (m.log2().ceil() as u32).clamp(MIN_ERROR_PRECISION, MAX_PRECISION)
        } else if m <= 1.0 {
            MIN_ERROR_PRECISION
        } else {
            MAX_PRECISION
        };
        Self::new(1 << precision)
    }

    /// Set small-range correction formula
    pub fn linear_counting(mut self, linear_counting: LinearCounting) -> Self {
        self.linear_counting = linear_counting;
        self
    }

    /// Set hash seed
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Check that bucket count is a power of two in `[1, 65536]`
    pub fn validate(&self) -> Result<(), SketchError> {
        if !is_valid_len(self.bucket_count) {
            return Err(SketchError::InvalidBucketCount(self.bucket_count));
        }
        Ok(())
    }

    /// Return log2 of bucket count
    pub fn precision(&self) -> Result<u32, SketchError> {
        self.validate()?;
        Ok(self.bucket_count.trailing_zeros())
    }

    /// Return expected relative standard error `1.04 / sqrt(m)`
    pub fn standard_error(&self) -> f64 {
        1.04 / (self.bucket_count as f64).sqrt()
    }
}

impl Default for SketchConfig {
    fn default() -> Self {
        Self {
            bucket_count: DEFAULT_BUCKET_COUNT,
            linear_counting: LinearCounting::default(),
            seed: 0,
        }
    }
}

const _: () = assert!(1 << MAX_PRECISION == MAX_REGISTERS);
