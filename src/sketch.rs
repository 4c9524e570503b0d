//! HyperLogLog sketch estimating the number of distinct elements in a stream
//! using a fixed number of 6-bit registers.
//!
//! # Data flow
//! - `add` - hash element, route hash to `(bucket, rank)` and raise the bucket's
//!   register to `rank` if it is greater.
//! - `count` - summarise all registers into a harmonic sum and a number of zero
//!   registers, and pick either the raw estimate or linear counting.
//! - `merge` - bucket-wise maximum with another sketch of the same shape. The merged
//!   sketch estimates the cardinality of the union of both streams.
//!
//! # Memory
//! Registers are packed 5 per `u32` word, e.g.:
//! - m = 1024: 205 words - 820 bytes
//! - m = 4096: 820 words - 3280 bytes
//! - m = 16384: 3277 words - 13108 bytes
//! - m = 65536: 13108 words - 52432 bytes
//!
//! # Accuracy
//! Expected relative standard error is `1.04 / sqrt(m)`:
//! - m = 1024: 3.25%
//! - m = 4096: 1.63%
//! - m = 16384: 0.81%
//!
//! # Concurrency
//! `add` and `merge` take `&mut self`. Producers running in parallel should each
//! own a sketch and periodically `merge` it into a shared accumulator.

use std::fmt::{Debug, Formatter};
use std::hash::{Hash, Hasher};
use std::mem::{size_of, size_of_val};

use tracing::{debug, warn};
use wyhash::{wyhash, WyHash};

use crate::config::{SketchConfig, DEFAULT_BUCKET_COUNT};
use crate::error::SketchError;
use crate::estimator::{alpha_mm, estimate, Estimate, RegisterSums};
use crate::registers::Registers;
use crate::router::route;

/// Cardinality sketch
#[derive(Clone)]
pub struct Sketch {
    /// Configuration the sketch was created with
    config: SketchConfig,
    /// log2 of bucket count
    precision: u32,
    /// Bias correction constant scaled by squared bucket count
    alpha_mm: f64,
    /// One register per bucket
    registers: Registers,
}

impl Sketch {
    /// Create sketch with `bucket_count` registers and default configuration.
    ///
    /// `bucket_count` must be a power of two in `[1, 65536]`.
    pub fn new(bucket_count: usize) -> Result<Self, SketchError> {
        Self::with_config(SketchConfig::new(bucket_count))
    }

    /// Create sketch with `2^precision` registers and default configuration
    pub fn with_precision(precision: u32) -> Result<Self, SketchError> {
        Self::with_config(SketchConfig::with_precision(precision)?)
    }

    /// Create sketch from `config`
    pub fn with_config(config: SketchConfig) -> Result<Self, SketchError> {
        let precision = config.precision()?;
        Ok(Self {
            config,
            precision,
            alpha_mm: alpha_mm(config.bucket_count),
            registers: Registers::new(config.bucket_count)?,
        })
    }

    /// Create sketch from `config` and previously populated `registers`
    pub fn from_registers(config: SketchConfig, registers: Registers) -> Result<Self, SketchError> {
        let precision = config.precision()?;
        if registers.bucket_count() != config.bucket_count {
            return Err(SketchError::ShapeMismatch {
                left: config.bucket_count,
                right: registers.bucket_count(),
            });
        }
        Ok(Self {
            config,
            precision,
            alpha_mm: alpha_mm(config.bucket_count),
            registers,
        })
    }

    /// Add byte sequence to the sketch.
    /// Returns whether a register was raised, which is not a membership test.
    #[inline]
    pub fn add(&mut self, element: &[u8]) -> bool {
        self.add_hash(wyhash(element, self.config.seed))
    }

    /// Add a hashable item to the sketch.
    /// Returns whether a register was raised.
    #[inline]
    pub fn insert<T: Hash + ?Sized>(&mut self, item: &T) -> bool {
        let mut hasher = WyHash::with_seed(self.config.seed);
        item.hash(&mut hasher);
        self.add_hash(hasher.finish())
    }

    /// Add precomputed 64-bit hash to the sketch.
    /// Returns whether a register was raised.
    #[inline]
    pub fn add_hash(&mut self, hash: u64) -> bool {
        let (idx, rank) = route(hash, self.precision);
        self.registers.update(idx, rank)
    }

    /// Return cardinality estimate
    pub fn count(&self) -> usize {
        self.evaluate().value
    }

    /// Return raw harmonic-mean estimate without small-range correction
    pub fn raw_estimate(&self) -> f64 {
        let sums: RegisterSums = self.registers.iter().collect();
        self.alpha_mm / sums.sum
    }

    /// Merge `rhs` into `self`, after which `self` estimates the cardinality
    /// of the union of both streams
    pub fn merge(&mut self, rhs: &Self) -> Result<(), SketchError> {
        if let Err(e) = self.check_mergeable(rhs) {
            warn!(error = %e, "rejected sketch merge");
            return Err(e);
        }

        let raised = self.registers.merge(&rhs.registers)?;
        debug!(buckets = self.bucket_count(), raised, "merged sketch");
        Ok(())
    }

    /// Return new sketch holding the union of `self` and `rhs`
    pub fn union(&self, rhs: &Self) -> Result<Self, SketchError> {
        let mut merged = self.clone();
        merged.merge(rhs)?;
        Ok(merged)
    }

    /// Return number of buckets
    #[inline]
    pub fn bucket_count(&self) -> usize {
        self.registers.bucket_count()
    }

    /// Return log2 of number of buckets
    #[inline]
    pub fn precision(&self) -> u32 {
        self.precision
    }

    /// Return sketch configuration
    #[inline]
    pub fn config(&self) -> &SketchConfig {
        &self.config
    }

    /// Return register of bucket `idx`.
    ///
    /// # Panics
    ///
    /// Panics if `idx` is not below `bucket_count`.
    #[inline]
    pub fn register(&self, idx: usize) -> u32 {
        self.registers.get(idx)
    }

    /// Return underlying registers
    #[inline]
    pub fn registers(&self) -> &Registers {
        &self.registers
    }

    /// Return whether no element was added
    pub fn is_empty(&self) -> bool {
        self.registers.words().iter().all(|&word| word == 0)
    }

    /// Reset sketch to its empty state
    pub fn clear(&mut self) {
        self.registers.clear();
    }

    /// Return memory size of `Sketch`
    pub fn size_of(&self) -> usize {
        size_of::<Self>() + size_of_val(self.registers.words())
    }

    fn evaluate(&self) -> Estimate {
        let (sums, estimate) = self.estimate_quiet();
        debug!(
            raw = estimate.raw,
            buckets = self.bucket_count(),
            zeros = sums.zeros,
            branch = ?estimate.branch,
            estimate = estimate.value,
            "estimated cardinality"
        );
        estimate
    }

    fn estimate_quiet(&self) -> (RegisterSums, Estimate) {
        let sums: RegisterSums = self.registers.iter().collect();
        let estimate = estimate(
            self.alpha_mm,
            self.bucket_count(),
            sums,
            &self.config.linear_counting,
        );
        (sums, estimate)
    }

    fn check_mergeable(&self, rhs: &Self) -> Result<(), SketchError> {
        if self.bucket_count() != rhs.bucket_count() {
            return Err(SketchError::ShapeMismatch {
                left: self.bucket_count(),
                right: rhs.bucket_count(),
            });
        }
        if self.config.seed != rhs.config.seed {
            return Err(SketchError::SeedMismatch {
                left: self.config.seed,
                right: rhs.config.seed,
            });
        }
        Ok(())
    }
}

impl Default for Sketch {
    fn default() -> Self {
        Self {
            config: SketchConfig::default(),
            precision: DEFAULT_BUCKET_COUNT.trailing_zeros(),
            alpha_mm: alpha_mm(DEFAULT_BUCKET_COUNT),
            registers: Registers::zeroed(DEFAULT_BUCKET_COUNT),
        }
    }
}

impl PartialEq for Sketch {
    /// Compare configuration and registers
    fn eq(&self, rhs: &Self) -> bool {
        self.config == rhs.config && self.registers == rhs.registers
    }
}

impl Eq for Sketch {}

impl Debug for Sketch {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{{ buckets: {}, count: {}, size: {} }}",
            self.bucket_count(),
            self.estimate_quiet().1.value,
            self.size_of()
        )
    }
}
