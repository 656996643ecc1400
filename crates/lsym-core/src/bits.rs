//! Fixed-width spin configurations wider than a machine word.

use std::cmp::Ordering;
use std::fmt::{self, Display};
use std::ops::{BitAnd, BitXor, BitXorAssign, Shl, Shr};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::{ErrorInfo, LsError};

/// 512-bit spin configuration stored as little-endian 64-bit words.
///
/// Bit `i` lives in `words[i / 64]` at position `i % 64`. Ordering compares the
/// configurations as unsigned 512-bit integers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(C)]
pub struct Bits512 {
    /// Little-endian words.
    pub words: [u64; 8],
}

impl Bits512 {
    /// The all-zero configuration.
    pub const ZERO: Bits512 = Bits512 { words: [0; 8] };

    /// Number of bits in the configuration.
    pub const BITS: u32 = 512;

    /// Builds a configuration whose low word is `value`.
    pub fn from_u64(value: u64) -> Self {
        let mut words = [0; 8];
        words[0] = value;
        Self { words }
    }

    /// Builds a configuration whose low two words hold `value`.
    pub fn from_u128(value: u128) -> Self {
        let mut words = [0; 8];
        words[0] = value as u64;
        words[1] = (value >> 64) as u64;
        Self { words }
    }

    /// Returns bit `index`.
    pub fn bit(&self, index: usize) -> bool {
        (self.words[index / 64] >> (index % 64)) & 1 == 1
    }

    /// Sets bit `index` to `value`.
    pub fn set_bit(&mut self, index: usize, value: bool) {
        let word = &mut self.words[index / 64];
        let mask = 1u64 << (index % 64);
        if value {
            *word |= mask;
        } else {
            *word &= !mask;
        }
    }

    /// Number of set bits.
    pub fn count_ones(&self) -> u32 {
        self.words.iter().map(|w| w.count_ones()).sum()
    }

    /// Index one past the highest set bit (zero for the empty configuration).
    pub fn significant_bits(&self) -> usize {
        for (idx, word) in self.words.iter().enumerate().rev() {
            if *word != 0 {
                return idx * 64 + (64 - word.leading_zeros() as usize);
            }
        }
        0
    }

    fn shifted_right(&self, shift: u32) -> Self {
        let word_shift = (shift / 64) as usize;
        let bit_shift = shift % 64;
        let mut out = [0u64; 8];
        for (i, slot) in out.iter_mut().enumerate() {
            let src = i + word_shift;
            if src >= 8 {
                break;
            }
            let mut value = self.words[src] >> bit_shift;
            if bit_shift != 0 && src + 1 < 8 {
                value |= self.words[src + 1] << (64 - bit_shift);
            }
            *slot = value;
        }
        Self { words: out }
    }

    fn shifted_left(&self, shift: u32) -> Self {
        let word_shift = (shift / 64) as usize;
        let bit_shift = shift % 64;
        let mut out = [0u64; 8];
        for i in word_shift..8 {
            let src = i - word_shift;
            let mut value = self.words[src] << bit_shift;
            if bit_shift != 0 && src >= 1 {
                value |= self.words[src - 1] >> (64 - bit_shift);
            }
            out[i] = value;
        }
        Self { words: out }
    }
}

impl Ord for Bits512 {
    fn cmp(&self, other: &Self) -> Ordering {
        self.words.iter().rev().cmp(other.words.iter().rev())
    }
}

impl PartialOrd for Bits512 {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl BitXor for Bits512 {
    type Output = Bits512;

    fn bitxor(mut self, rhs: Bits512) -> Bits512 {
        self ^= rhs;
        self
    }
}

impl BitXorAssign for Bits512 {
    fn bitxor_assign(&mut self, rhs: Bits512) {
        for (a, b) in self.words.iter_mut().zip(rhs.words.iter()) {
            *a ^= *b;
        }
    }
}

impl BitAnd for Bits512 {
    type Output = Bits512;

    fn bitand(mut self, rhs: Bits512) -> Bits512 {
        for (a, b) in self.words.iter_mut().zip(rhs.words.iter()) {
            *a &= *b;
        }
        self
    }
}

impl Shr<u32> for Bits512 {
    type Output = Bits512;

    fn shr(self, shift: u32) -> Bits512 {
        debug_assert!(shift < Self::BITS);
        self.shifted_right(shift)
    }
}

impl Shl<u32> for Bits512 {
    type Output = Bits512;

    fn shl(self, shift: u32) -> Bits512 {
        debug_assert!(shift < Self::BITS);
        self.shifted_left(shift)
    }
}

impl From<u64> for Bits512 {
    fn from(value: u64) -> Self {
        Bits512::from_u64(value)
    }
}

impl Display for Bits512 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let top = self.words.iter().rposition(|w| *w != 0).unwrap_or(0);
        write!(f, "0x{:x}", self.words[top])?;
        for word in self.words[..top].iter().rev() {
            write!(f, "{word:016x}")?;
        }
        Ok(())
    }
}

impl FromStr for Bits512 {
    type Err = LsError;

    /// Accepts `0x`-prefixed hexadecimal, `0b`-prefixed binary or decimal (up to 128 bits).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: &str| {
            LsError::InvalidState(
                ErrorInfo::new("bits-parse", reason.to_string()).with_context("input", s),
            )
        };
        let trimmed = s.trim().replace('_', "");
        let (digits, radix) = if let Some(rest) = trimmed.strip_prefix("0x") {
            (rest.to_string(), 16u32)
        } else if let Some(rest) = trimmed.strip_prefix("0b") {
            (rest.to_string(), 2u32)
        } else {
            let value: u128 = trimmed
                .parse()
                .map_err(|_| invalid("not a decimal integer"))?;
            return Ok(Bits512::from_u128(value));
        };
        if digits.is_empty() {
            return Err(invalid("missing digits"));
        }
        let bits_per_digit = if radix == 16 { 4 } else { 1 };
        let mut out = Bits512::ZERO;
        for (position, ch) in digits.chars().rev().enumerate() {
            let digit = ch
                .to_digit(radix)
                .ok_or_else(|| invalid("unexpected digit"))?;
            for bit in 0..bits_per_digit {
                if (digit >> bit) & 1 == 1 {
                    let index = position * bits_per_digit + bit;
                    if index >= Self::BITS as usize {
                        return Err(invalid("value does not fit into 512 bits"));
                    }
                    out.set_bit(index, true);
                }
            }
        }
        Ok(out)
    }
}

/// 64-bit mask with the low `n` bits set (`n <= 64`).
pub fn flip_mask_64(n: usize) -> u64 {
    if n == 0 {
        0
    } else {
        (!0u64) >> (64 - n.min(64))
    }
}

/// 512-bit mask with the low `n` bits set (`n <= 512`).
pub fn flip_mask_512(n: usize) -> Bits512 {
    let mut mask = Bits512::ZERO;
    let mut remaining = n.min(Bits512::BITS as usize);
    for word in mask.words.iter_mut() {
        if remaining == 0 {
            break;
        }
        let take = remaining.min(64);
        *word = flip_mask_64(take);
        remaining -= take;
    }
    mask
}
