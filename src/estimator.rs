//! ## Estimator
//! Cardinality estimate over `m` registers `v_i`:
//! - raw estimate `E = alpha(m) * m^2 / Σ 2^(-v_i)`
//! - `E <= 2.5 * m` - linear counting over the number of zero registers,
//!   or `ceil(E)` when no register is zero
//! - otherwise - `ceil(E)`
//!
//! No large-range correction is applied, estimates close to the 64-bit hash
//! space keep the bias of the raw estimate.
//!
//! [Original HyperLogLog paper](https://algo.inria.fr/flajolet/Publications/FlFuGaMe07.pdf)

use crate::correction::{LinearCounting, LinearCountingTrait};

/// Raw estimates up to this multiple of `m` fall into the small range
const SMALL_RANGE_FACTOR: f64 = 2.5;

/// Parameter for bias correction
#[inline]
pub(crate) fn alpha(m: usize) -> f64 {
    match m {
        16 => 0.673,
        32 => 0.697,
        64 => 0.709,
        _ => 0.7213 / (1.0 + 1.079 / (m as f64)),
    }
}

/// Bias correction constant scaled by squared number of registers
#[inline]
pub(crate) fn alpha_mm(m: usize) -> f64 {
    let m_f = m as f64;
    alpha(m) * m_f * m_f
}

/// Harmonic sum of registers and number of zero registers
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct RegisterSums {
    pub(crate) sum: f64,
    pub(crate) zeros: usize,
}

impl FromIterator<u32> for RegisterSums {
    fn from_iter<I: IntoIterator<Item = u32>>(ranks: I) -> Self {
        let mut sums = RegisterSums { sum: 0.0, zeros: 0 };
        for rank in ranks {
            if rank == 0 {
                sums.zeros += 1;
            }
            sums.sum += 1.0 / ((1u64 << rank) as f64);
        }
        sums
    }
}

/// Estimator branch which produced the final estimate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Branch {
    LinearCounting,
    NoZeroRegisters,
    Raw,
}

/// Cardinality estimate together with the raw value it was derived from
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Estimate {
    pub(crate) raw: f64,
    pub(crate) value: usize,
    pub(crate) branch: Branch,
}

/// Return estimate for `m` registers summarised by `sums`
#[inline]
pub(crate) fn estimate(
    alpha_mm: f64,
    m: usize,
    sums: RegisterSums,
    linear_counting: &LinearCounting,
) -> Estimate {
    let raw = alpha_mm / sums.sum;

    if raw > SMALL_RANGE_FACTOR * (m as f64) {
        return Estimate {
            raw,
            value: raw.ceil() as usize,
            branch: Branch::Raw,
        };
    }

    match linear_counting.linear_count(m, sums.zeros) {
        Some(value) => Estimate {
            raw,
            value,
            branch: Branch::LinearCounting,
        },
        None => Estimate {
            raw,
            value: raw.ceil() as usize,
            branch: Branch::NoZeroRegisters,
        },
    }
}
