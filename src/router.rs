//! ## Bucket routing
//! Splits a 64-bit hash into a bucket index and a rank:
//! - bucket index - top `p` bits of the hash.
//! - rank - one plus the number of leading zeros in the remaining `64 - p` bits,
//!   or `64 - p + 1` when all of them are zero.

use crate::registers::{Registers, REGISTER_WIDTH};

/// Largest supported precision, i.e. log2 of the largest bucket count
pub const MAX_PRECISION: u32 = 16;
/// Largest rank a register can hold
pub const MAX_RANK: u32 = Registers::<REGISTER_WIDTH>::MAX_VALUE;

/// Return `(bucket index, rank)` of `hash` for precision `p`.
///
/// Ranks are saturated at `MAX_RANK`, which is only reachable for `p < 2`
/// where a zero remainder would otherwise produce rank 64 or 65.
#[inline]
pub fn route(hash: u64, p: u32) -> (usize, u32) {
    debug_assert!(p <= MAX_PRECISION);

    // shifting by 64 is overflow, a single bucket has index 0
    let idx = hash.checked_shr(u64::BITS - p).unwrap_or(0) as usize;
    let rest = hash << p;
    let rank = if rest == 0 {
        u64::BITS - p + 1
    } else {
        rest.leading_zeros() + 1
    };

    (idx, rank.min(MAX_RANK))
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use test_case::test_case;

    #[test_case(0, 10 => (0, 55); "zero hash")]
    #[test_case(u64::MAX, 10 => (1023, 1); "all ones")]
    #[test_case(1 << 63, 10 => (512, 55); "only top bit")]
    #[test_case((5 << 54) | (1 << 40), 10 => (5, 14); "index five rank fourteen")]
    #[test_case(1, 10 => (0, 54); "lowest bit")]
    #[test_case(0, 16 => (0, 49); "zero hash max precision")]
    #[test_case(u64::MAX >> 16, 16 => (0, 1); "max precision empty index")]
    #[test_case(0xABCD_0000_0000_0001, 16 => (0xABCD, 48); "max precision lowest bit")]
    #[test_case(0, 4 => (0, 61); "zero hash min alpha precision")]
    fn test_route(hash: u64, p: u32) -> (usize, u32) {
        route(hash, p)
    }

    #[test_case(0, 0 => (0, 63); "single bucket zero hash")]
    #[test_case(1, 0 => (0, 63); "single bucket rank 64 saturated")]
    #[test_case(1 << 63, 0 => (0, 1); "single bucket top bit")]
    #[test_case(1 << 62, 0 => (0, 2); "single bucket second bit")]
    #[test_case(1 << 63, 1 => (1, 63); "two buckets zero remainder")]
    #[test_case(1, 1 => (0, 63); "two buckets lowest bit")]
    #[test_case(2, 1 => (0, 62); "two buckets second lowest bit")]
    #[test_case(4, 1 => (0, 61); "two buckets third lowest bit")]
    fn test_route_small_precision(hash: u64, p: u32) -> (usize, u32) {
        route(hash, p)
    }

    #[test]
    fn test_route_bounds() {
        let mut rng = StdRng::seed_from_u64(42);
        for p in 0..=MAX_PRECISION {
            for _ in 0..1000 {
                let (idx, rank) = route(rng.gen(), p);
                assert!(idx < 1 << p);
                assert!(rank >= 1);
                assert!(rank <= (u64::BITS - p + 1).min(MAX_RANK));
            }
        }
    }
}
