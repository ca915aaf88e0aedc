//! Primitive encoding/decoding for the NBT binary format.
//!
//! All integers are big-endian. Strings are Java "modified UTF-8": U+0000 is
//! written as `C0 80` and supplementary characters as two 3-byte surrogates.

use std::borrow::Cow;

use crate::error::DecodeError;

// =============================================================================
// DECODING
// =============================================================================

/// Reader for decoding binary data.
///
/// Wraps a byte slice and provides methods for reading primitives
/// with bounds checking and error handling.
#[derive(Debug, Clone)]
pub struct Reader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    /// Creates a new reader from a byte slice.
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Returns the current position in the data.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Returns the bytes between `start` and the current position.
    pub fn consumed_since(&self, start: usize) -> &'a [u8] {
        &self.data[start.min(self.pos)..self.pos]
    }

    /// Returns the number of remaining bytes.
    pub fn remaining_len(&self) -> usize {
        self.data.len() - self.pos
    }

    /// Returns true if all data has been consumed.
    pub fn is_empty(&self) -> bool {
        self.pos >= self.data.len()
    }

    /// Reads a single byte.
    #[inline]
    pub fn read_byte(&mut self, context: &'static str) -> Result<u8, DecodeError> {
        if self.pos >= self.data.len() {
            return Err(DecodeError::UnexpectedEof { context });
        }
        let byte = self.data[self.pos];
        self.pos += 1;
        Ok(byte)
    }

    /// Reads exactly n bytes.
    #[inline]
    pub fn read_bytes(&mut self, n: usize, context: &'static str) -> Result<&'a [u8], DecodeError> {
        if n > self.remaining_len() {
            return Err(DecodeError::UnexpectedEof { context });
        }
        let bytes = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Ok(bytes)
    }

    /// Skips exactly n bytes.
    #[inline]
    pub fn skip(&mut self, n: usize, context: &'static str) -> Result<(), DecodeError> {
        self.read_bytes(n, context).map(|_| ())
    }

    #[inline]
    fn read_array<const N: usize>(&mut self, context: &'static str) -> Result<[u8; N], DecodeError> {
        let bytes = self.read_bytes(N, context)?;
        let mut buf = [0u8; N];
        buf.copy_from_slice(bytes);
        Ok(buf)
    }

    /// Reads a big-endian u16.
    #[inline]
    pub fn read_u16(&mut self, context: &'static str) -> Result<u16, DecodeError> {
        self.read_array(context).map(u16::from_be_bytes)
    }

    /// Reads a big-endian i32.
    #[inline]
    pub fn read_i32(&mut self, context: &'static str) -> Result<i32, DecodeError> {
        self.read_array(context).map(i32::from_be_bytes)
    }

    /// Reads a big-endian i64.
    #[inline]
    pub fn read_i64(&mut self, context: &'static str) -> Result<i64, DecodeError> {
        self.read_array(context).map(i64::from_be_bytes)
    }

    /// Reads the raw bytes of a u16-length-prefixed string.
    #[inline]
    pub fn read_string_bytes(&mut self, context: &'static str) -> Result<&'a [u8], DecodeError> {
        let len = self.read_u16(context)? as usize;
        self.read_bytes(len, context)
    }
}

// =============================================================================
// ENCODING
// =============================================================================

/// Writer for encoding binary data.
#[derive(Debug, Clone, Default)]
pub struct Writer {
    buf: Vec<u8>,
}

impl Writer {
    /// Creates a new writer.
    pub fn new() -> Self {
        Self { buf: Vec::new() }
    }

    /// Creates a new writer with capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: Vec::with_capacity(capacity),
        }
    }

    /// Returns the written bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    /// Returns a reference to the written bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Returns the number of bytes written.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Returns true if no bytes have been written.
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Writes a single byte.
    #[inline]
    pub fn write_byte(&mut self, byte: u8) {
        self.buf.push(byte);
    }

    /// Writes raw bytes.
    #[inline]
    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    /// Writes a big-endian u16.
    #[inline]
    pub fn write_u16(&mut self, value: u16) {
        self.buf.extend_from_slice(&value.to_be_bytes());
    }

    /// Writes a big-endian i32.
    #[inline]
    pub fn write_i32(&mut self, value: i32) {
        self.buf.extend_from_slice(&value.to_be_bytes());
    }

    /// Writes a big-endian i64.
    #[inline]
    pub fn write_i64(&mut self, value: i64) {
        self.buf.extend_from_slice(&value.to_be_bytes());
    }
}

// =============================================================================
// MODIFIED UTF-8
// =============================================================================

/// Encodes a string as modified UTF-8, borrowing when the bytes are unchanged.
pub fn encode_modified_utf8(s: &str) -> Cow<'_, [u8]> {
    if !s.chars().any(|c| c == '\0' || c as u32 > 0xFFFF) {
        return Cow::Borrowed(s.as_bytes());
    }

    let mut out = Vec::with_capacity(s.len() + 8);
    for c in s.chars() {
        match c as u32 {
            0 => out.extend_from_slice(&[0xC0, 0x80]),
            cp if cp > 0xFFFF => {
                let v = cp - 0x10000;
                push_three_byte(&mut out, 0xD800 | (v >> 10));
                push_three_byte(&mut out, 0xDC00 | (v & 0x3FF));
            }
            _ => {
                let mut buf = [0u8; 4];
                out.extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
            }
        }
    }
    Cow::Owned(out)
}

fn push_three_byte(out: &mut Vec<u8>, unit: u32) {
    out.push(0xE0 | (unit >> 12) as u8);
    out.push(0x80 | ((unit >> 6) & 0x3F) as u8);
    out.push(0x80 | (unit & 0x3F) as u8);
}

/// Decodes modified UTF-8, returning None on malformed input.
///
/// Plain UTF-8 (including 4-byte sequences) is accepted as well.
pub fn decode_modified_utf8(bytes: &[u8]) -> Option<String> {
    if let Ok(s) = std::str::from_utf8(bytes) {
        return Some(s.to_string());
    }

    let mut out = String::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        let b = bytes[i];
        if b < 0x80 {
            out.push(b as char);
            i += 1;
        } else if b & 0xE0 == 0xC0 {
            let b1 = continuation(bytes, i + 1)?;
            out.push(char::from_u32(((b as u32 & 0x1F) << 6) | b1)?);
            i += 2;
        } else if b & 0xF0 == 0xE0 {
            let unit = three_byte(bytes, i)?;
            if (0xD800..0xDC00).contains(&unit) {
                let low = three_byte(bytes, i + 3).filter(|u| (0xDC00..0xE000).contains(u))?;
                out.push(char::from_u32(0x10000 + ((unit - 0xD800) << 10) + (low - 0xDC00))?);
                i += 6;
            } else {
                out.push(char::from_u32(unit)?);
                i += 3;
            }
        } else if b & 0xF8 == 0xF0 {
            let cp = ((b as u32 & 0x07) << 18)
                | (continuation(bytes, i + 1)? << 12)
                | (continuation(bytes, i + 2)? << 6)
                | continuation(bytes, i + 3)?;
            out.push(char::from_u32(cp)?);
            i += 4;
        } else {
            return None;
        }
    }
    Some(out)
}

#[inline]
fn continuation(bytes: &[u8], i: usize) -> Option<u32> {
    let b = *bytes.get(i)?;
    (b & 0xC0 == 0x80).then_some((b & 0x3F) as u32)
}

#[inline]
fn three_byte(bytes: &[u8], i: usize) -> Option<u32> {
    let b = *bytes.get(i)?;
    if b & 0xF0 != 0xE0 {
        return None;
    }
    Some(((b as u32 & 0x0F) << 12) | (continuation(bytes, i + 1)? << 6) | continuation(bytes, i + 2)?)
}
