//! Word-addressable view over the payload of a long-array tag.

use crate::codec::packed::WordSource;

/// Big-endian 64-bit words, kept as the raw bytes read off the wire.
///
/// Words are decoded on access, so the packed block-state data never goes
/// through an intermediate `Vec<i64>`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct LongArray {
    bytes: Vec<u8>,
}

impl LongArray {
    /// Creates an empty array.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps a pre-built big-endian byte buffer.
    ///
    /// Returns None unless the length is a multiple of 8.
    pub fn from_bytes(bytes: Vec<u8>) -> Option<Self> {
        if bytes.len() % 8 != 0 {
            return None;
        }
        Some(Self { bytes })
    }

    /// Wraps bytes already known to hold whole words.
    pub(crate) fn from_exact(bytes: Vec<u8>) -> Self {
        debug_assert_eq!(bytes.len() % 8, 0);
        Self { bytes }
    }

    /// Builds the big-endian buffer for a sequence of words.
    pub fn from_words(words: &[u64]) -> Self {
        let mut bytes = Vec::with_capacity(words.len() * 8);
        for word in words {
            bytes.extend_from_slice(&word.to_be_bytes());
        }
        Self { bytes }
    }

    /// Returns the number of 64-bit words.
    pub fn len(&self) -> usize {
        self.bytes.len() / 8
    }

    /// Returns true if the array holds no words.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Reads the Nth word, or None past the end.
    #[inline]
    pub fn word(&self, index: usize) -> Option<u64> {
        let start = index.checked_mul(8)?;
        let chunk = self.bytes.get(start..start + 8)?;
        let mut buf = [0u8; 8];
        buf.copy_from_slice(chunk);
        Some(u64::from_be_bytes(buf))
    }

    /// Returns the raw big-endian bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Consumes the array, returning the raw bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    /// Iterates over all words in order.
    pub fn words(&self) -> impl Iterator<Item = u64> + '_ {
        (0..self.len()).filter_map(move |i| self.word(i))
    }
}

impl WordSource for LongArray {
    fn word_count(&self) -> usize {
        self.len()
    }

    fn word(&self, index: usize) -> Option<u64> {
        LongArray::word(self, index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_word_access_is_big_endian() {
        let array = LongArray::from_bytes(vec![0, 0, 0, 0, 0, 0, 0, 1, 0x80, 0, 0, 0, 0, 0, 0, 0]).unwrap();
        assert_eq!(array.len(), 2);
        assert_eq!(array.word(0), Some(1));
        assert_eq!(array.word(1), Some(1 << 63));
        assert_eq!(array.word(2), None);
    }

    #[test]
    fn test_from_words() {
        let words = [0x0102_0304_0506_0708, u64::MAX];
        let array = LongArray::from_words(&words);
        assert_eq!(&array.as_bytes()[..8], &[1, 2, 3, 4, 5, 6, 7, 8]);
        assert_eq!(array.words().collect::<Vec<_>>(), words);
    }

    #[test]
    fn test_rejects_partial_word() {
        assert!(LongArray::from_bytes(vec![0; 7]).is_none());
        assert!(LongArray::from_bytes(Vec::new()).unwrap().is_empty());
    }
}
