//! Bit-packed fixed-width integer arrays.
//!
//! Value `i` occupies bits `[i * bits, (i + 1) * bits)` of the stream formed by
//! concatenating 64-bit words in order, least-significant bit first within
//! each word. Values may straddle two words.

use crate::error::DecodeError;

/// Widest supported value.
pub const MAX_BITS: u32 = 32;

/// Random access to a sequence of 64-bit words.
pub trait WordSource {
    fn word_count(&self) -> usize;
    fn word(&self, index: usize) -> Option<u64>;
}

impl WordSource for [u64] {
    fn word_count(&self) -> usize {
        self.len()
    }

    fn word(&self, index: usize) -> Option<u64> {
        self.get(index).copied()
    }
}

impl WordSource for Vec<u64> {
    fn word_count(&self) -> usize {
        self.len()
    }

    fn word(&self, index: usize) -> Option<u64> {
        self.get(index).copied()
    }
}

/// Bits per entry for a palette of `palette_len` states; never below 2.
pub fn bits_for_palette(palette_len: usize) -> u32 {
    if palette_len <= 1 {
        return 2;
    }
    let needed = usize::BITS - (palette_len - 1).leading_zeros();
    needed.max(2)
}

/// Number of words holding `count` values of `bits` bits.
#[inline]
pub fn packed_len(count: usize, bits: u32) -> usize {
    (count as u128 * bits as u128).div_ceil(64) as usize
}

#[inline]
fn mask(bits: u32) -> u64 {
    if bits >= 64 { u64::MAX } else { (1u64 << bits) - 1 }
}

/// Unpacks `count` values of `bits` bits each.
///
/// Fails if `words` holds fewer than [`packed_len`] words.
pub fn unpack<W: WordSource + ?Sized>(words: &W, bits: u32, count: usize) -> Result<Vec<u32>, DecodeError> {
    debug_assert!((1..=MAX_BITS).contains(&bits));
    let expected = packed_len(count, bits);
    if words.word_count() < expected {
        return Err(DecodeError::PackedArrayTooShort {
            expected,
            actual: words.word_count(),
        });
    }

    let mask = mask(bits);
    let mut values = Vec::with_capacity(count);
    let mut bit = 0usize;
    for _ in 0..count {
        let word_index = bit / 64;
        let offset = (bit % 64) as u32;
        let current = words.word(word_index).unwrap_or(0);
        // (next:current) >> offset, using the two 64-bit halves
        let combined = if offset == 0 {
            current
        } else {
            let next = words.word(word_index + 1).unwrap_or(0);
            (current >> offset) | (next << (64 - offset))
        };
        values.push((combined & mask) as u32);
        bit += bits as usize;
    }
    Ok(values)
}

/// Packs values into exactly [`packed_len`] words; unused trailing bits are zero.
///
/// Bits of a value above `bits` are discarded.
pub fn pack(values: &[u32], bits: u32) -> Vec<u64> {
    debug_assert!((1..=MAX_BITS).contains(&bits));
    let mask = mask(bits);
    let mut words = Vec::with_capacity(packed_len(values.len(), bits));

    let mut low = 0u64;
    let mut high = 0u64;
    let mut offset = 0u32;
    for &value in values {
        let value = value as u64 & mask;
        low |= value << offset;
        if offset > 0 {
            high |= value >> (64 - offset);
        }
        offset += bits;
        if offset >= 64 {
            words.push(low);
            low = high;
            high = 0;
            offset -= 64;
        }
    }
    if offset > 0 {
        words.push(low);
    }
    words
}
