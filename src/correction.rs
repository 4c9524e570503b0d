//! ## Small-range correction
//! For small cardinalities the harmonic-mean estimate is replaced with linear counting
//! over the number of empty registers. Two formulas are available:
//! - `Canonical` - `m * ln(m / zeros)` rounded to the nearest integer. Rounding up
//!   would report 2 for a single element once m reaches 16384.
//! - `Scaled` - `ceil(m * log2(m / zeros)) * 0.7` truncated to an integer,
//!   kept for parity with estimates produced by earlier deployments.
//!
//! Linear counting is undefined without empty registers, so both return `None`
//! when `zeros == 0`.

use enum_dispatch::enum_dispatch;
#[cfg(feature = "with_serde")]
use serde::{Deserialize, Serialize};

/// Empirical factor applied by `Scaled` linear counting
const SCALED_FACTOR: f64 = 0.7;

/// Linear counting trait implemented by all correction strategies.
#[enum_dispatch]
pub trait LinearCountingTrait {
    /// Return linear counting estimate for `buckets` registers of which `zeros` are empty
    fn linear_count(&self, buckets: usize, zeros: usize) -> Option<usize>;
}

/// Linear counting strategies supported by `Sketch`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "with_serde", derive(Serialize, Deserialize))]
#[enum_dispatch(LinearCountingTrait)]
pub enum LinearCounting {
    Canonical(Canonical),
    Scaled(Scaled),
}

/// Natural-logarithm linear counting
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "with_serde", derive(Serialize, Deserialize))]
pub struct Canonical;

/// Base-2 linear counting scaled by 0.7
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "with_serde", derive(Serialize, Deserialize))]
pub struct Scaled;

impl LinearCounting {
    /// Natural-logarithm linear counting
    pub const CANONICAL: Self = LinearCounting::Canonical(Canonical);
    /// Base-2 linear counting scaled by 0.7
    pub const SCALED: Self = LinearCounting::Scaled(Scaled);
}

impl Default for LinearCounting {
    fn default() -> Self {
        Self::CANONICAL
    }
}

impl LinearCountingTrait for Canonical {
    #[inline]
    fn linear_count(&self, buckets: usize, zeros: usize) -> Option<usize> {
        if zeros == 0 {
            return None;
        }
        let m = buckets as f64;
        Some((m * (m / zeros as f64).ln()).round() as usize)
    }
}

impl LinearCountingTrait for Scaled {
    #[inline]
    fn linear_count(&self, buckets: usize, zeros: usize) -> Option<usize> {
        if zeros == 0 {
            return None;
        }
        let m = buckets as f64;
        Some(((m * (m / zeros as f64).log2()).ceil() * SCALED_FACTOR) as usize)
    }
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(1024, 1024 => Some(0); "all empty")]
    #[test_case(1024, 100 => Some(2382); "some empty")]
    #[test_case(16, 3 => Some(27); "few buckets")]
    #[test_case(16_384, 16_383 => Some(1); "single item")]
    #[test_case(16, 0 => None; "no empty registers")]
    fn test_canonical(buckets: usize, zeros: usize) -> Option<usize> {
        LinearCounting::CANONICAL.linear_count(buckets, zeros)
    }

    #[test_case(1024, 1024 => Some(0); "all empty")]
    #[test_case(1024, 100 => Some(2405); "some empty")]
    #[test_case(16, 3 => Some(27); "few buckets")]
    #[test_case(16_384, 16_383 => Some(1); "single item")]
    #[test_case(16, 0 => None; "no empty registers")]
    fn test_scaled(buckets: usize, zeros: usize) -> Option<usize> {
        LinearCounting::SCALED.linear_count(buckets, zeros)
    }

    #[test]
    fn test_default_is_canonical() {
        assert_eq!(LinearCounting::default(), LinearCounting::Canonical(Canonical));
        assert_eq!(LinearCounting::from(Scaled), LinearCounting::SCALED);
    }
}
