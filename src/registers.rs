//! ## Register store
//! Packed array of `W`-bit unsigned registers, indexed by bucket.
//!
//! Registers never straddle a word boundary. Each `u32` word holds `32 / W` registers
//! packed from the lowest bits upwards and the remaining high bits stay zero:
//! - `W = 6`: 5 registers per word in bits 0..29, bits 30..31 unused.
//! - `W = 5`: 6 registers per word in bits 0..29, bits 30..31 unused.
//! - `W = 4`: 8 registers per word, no unused bits.
//!
//! The last word is only partially used when the number of registers
//! is not a multiple of `32 / W`.

use std::fmt::{Debug, Formatter};
use std::mem::{size_of, size_of_val};

use crate::error::SketchError;

/// Register width used by `Sketch`, wide enough for any rank of a 64-bit hash
pub const REGISTER_WIDTH: usize = 6;
/// Maximum number of registers in a store
pub const MAX_REGISTERS: usize = 1 << 16;
/// Number of bits in a backing word
const WORD_BITS: usize = u32::BITS as usize;

/// Fixed-size array of `W`-bit registers
#[derive(Clone, PartialEq, Eq)]
pub struct Registers<const W: usize = REGISTER_WIDTH> {
    /// Number of registers
    len: usize,
    /// Packed register words
    words: Box<[u32]>,
}

impl<const W: usize> Registers<W> {
    /// Ensure that `W` leaves room for at least one register per word at compile time
    const VALID_WIDTH: () = assert!(W >= 1 && W < WORD_BITS);
    /// Number of registers stored in a single word
    pub const PER_WORD: usize = WORD_BITS / W;
    /// Largest value a register can hold
    pub const MAX_VALUE: u32 = (1 << W) - 1;

    /// Create a new store of `len` zeroed registers.
    ///
    /// `len` must be a power of two in `[1, MAX_REGISTERS]`.
    pub fn new(len: usize) -> Result<Self, SketchError> {
        // compile time check of width
        _ = Self::VALID_WIDTH;

        if !is_valid_len(len) {
            return Err(SketchError::InvalidBucketCount(len));
        }

        Ok(Self::zeroed(len))
    }

    /// Create zeroed store, caller must ensure that `len` is valid
    #[inline]
    pub(crate) fn zeroed(len: usize) -> Self {
        Self {
            len,
            words: vec![0u32; Self::words_for(len)].into_boxed_slice(),
        }
    }

    /// Rebuild a store of `len` registers from its packed words
    pub fn from_words(len: usize, words: Vec<u32>) -> Result<Self, SketchError> {
        _ = Self::VALID_WIDTH;

        if !is_valid_len(len) {
            return Err(SketchError::InvalidBucketCount(len));
        }
        let expected = Self::words_for(len);
        if words.len() != expected {
            return Err(SketchError::InvalidRegisterData {
                expected,
                found: words.len(),
            });
        }

        // unused high bits and unused trailing registers must be zero
        for (idx, &word) in words.iter().enumerate() {
            let used = (len - idx * Self::PER_WORD).min(Self::PER_WORD);
            if word & !Self::fields_mask(used) != 0 {
                return Err(SketchError::InvalidRegisterValue { word: idx });
            }
        }

        Ok(Self {
            len,
            words: words.into_boxed_slice(),
        })
    }

    /// Number of words required to store `len` registers
    #[inline]
    pub const fn words_for(len: usize) -> usize {
        len.div_ceil(Self::PER_WORD)
    }

    /// Return number of registers
    #[inline]
    pub fn bucket_count(&self) -> usize {
        self.len
    }

    /// Return packed register words
    #[inline]
    pub fn words(&self) -> &[u32] {
        &self.words
    }

    /// Get register at `position`, failing if it is out of range
    #[inline]
    pub fn try_get(&self, position: usize) -> Result<u32, SketchError> {
        self.check_position(position)?;
        let (word, shift) = Self::locate(position);
        Ok((self.words[word] >> shift) & Self::MAX_VALUE)
    }

    /// Set register at `position` to `value`, failing if either is out of range
    #[inline]
    pub fn try_set(&mut self, position: usize, value: u32) -> Result<(), SketchError> {
        self.check_position(position)?;
        if value > Self::MAX_VALUE {
            return Err(SketchError::InvalidRank {
                rank: value,
                max: Self::MAX_VALUE,
            });
        }

        let (word, shift) = Self::locate(position);
        let bits = &mut self.words[word];
        *bits = (*bits & !(Self::MAX_VALUE << shift)) | (value << shift);
        Ok(())
    }

    /// Get register at `position`.
    ///
    /// # Panics
    ///
    /// Panics if `position` is out of range.
    #[inline]
    pub fn get(&self, position: usize) -> u32 {
        match self.try_get(position) {
            Ok(value) => value,
            Err(e) => panic!("{e}"),
        }
    }

    /// Overwrite register at `position` with `value`.
    ///
    /// # Panics
    ///
    /// Panics if `position` is out of range or `value` exceeds `MAX_VALUE`.
    #[inline]
    pub fn set(&mut self, position: usize, value: u32) {
        if let Err(e) = self.try_set(position, value) {
            panic!("{e}");
        }
    }

    /// Raise register at `position` to `value` if `value` is strictly greater.
    /// Returns whether the register changed.
    ///
    /// # Panics
    ///
    /// Panics under the same conditions as `set`.
    #[inline]
    pub fn update(&mut self, position: usize, value: u32) -> bool {
        if value > self.get(position) {
            self.set(position, value);
            return true;
        }
        false
    }

    /// Raise every register to the maximum of itself and the matching register of `rhs`.
    /// Returns number of registers that changed.
    pub fn merge(&mut self, rhs: &Self) -> Result<usize, SketchError> {
        if self.len != rhs.len {
            return Err(SketchError::ShapeMismatch {
                left: self.len,
                right: rhs.len,
            });
        }

        let mut raised = 0;
        for (lhs_word, &rhs_word) in self.words.iter_mut().zip(rhs.words.iter()) {
            if *lhs_word == rhs_word {
                continue;
            }
            for slot in 0..Self::PER_WORD {
                let mask = Self::MAX_VALUE << (slot * W);
                if (rhs_word & mask) > (*lhs_word & mask) {
                    *lhs_word = (*lhs_word & !mask) | (rhs_word & mask);
                    raised += 1;
                }
            }
        }

        Ok(raised)
    }

    /// Iterate over register values in bucket order
    pub fn iter(&self) -> impl Iterator<Item = u32> + '_ {
        self.words
            .iter()
            .flat_map(|&word| {
                (0..Self::PER_WORD).map(move |slot| (word >> (slot * W)) & Self::MAX_VALUE)
            })
            .take(self.len)
    }

    /// Reset every register to zero
    #[inline]
    pub fn clear(&mut self) {
        self.words.fill(0);
    }

    /// Return memory size of the store
    #[inline]
    pub fn size_of(&self) -> usize {
        size_of::<Self>() + size_of_val(&*self.words)
    }

    /// Return word index and bit offset of register at `position`
    #[inline]
    fn locate(position: usize) -> (usize, usize) {
        (position / Self::PER_WORD, (position % Self::PER_WORD) * W)
    }

    #[inline]
    fn check_position(&self, position: usize) -> Result<(), SketchError> {
        if position >= self.len {
            return Err(SketchError::OutOfRange {
                position,
                len: self.len,
            });
        }
        Ok(())
    }

    /// Mask covering the lowest `fields` registers of a word
    #[inline]
    fn fields_mask(fields: usize) -> u32 {
        let bits = fields * W;
        if bits >= WORD_BITS {
            u32::MAX
        } else {
            (1 << bits) - 1
        }
    }
}

impl<const W: usize> Debug for Registers<W> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let nonzero = self.iter().filter(|&v| v != 0).count();
        write!(
            f,
            "{{ len: {}, width: {}, nonzero: {}, size: {} }}",
            self.len,
            W,
            nonzero,
            self.size_of()
        )
    }
}

/// Return whether `len` is a supported number of registers
#[inline]
pub(crate) fn is_valid_len(len: usize) -> bool {
    len.is_power_of_two() && len <= MAX_REGISTERS
}
