//! Gzip framing around the NBT document.

use std::io::{Read, Write};

use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;

use crate::error::{DecodeError, EncodeError};
use crate::limits::MAX_DOCUMENT_SIZE;

const GZIP_MAGIC: [u8; 2] = [0x1F, 0x8B];

/// Returns true if `data` starts with the gzip magic bytes.
pub fn is_gzip(data: &[u8]) -> bool {
    data.starts_with(&GZIP_MAGIC)
}

/// Inflates a gzip stream, refusing documents over [`MAX_DOCUMENT_SIZE`].
pub fn decompress(compressed: &[u8]) -> Result<Vec<u8>, DecodeError> {
    let decoder = GzDecoder::new(compressed);
    let mut decompressed = Vec::with_capacity(compressed.len().saturating_mul(4).min(MAX_DOCUMENT_SIZE));
    decoder
        .take(MAX_DOCUMENT_SIZE as u64 + 1)
        .read_to_end(&mut decompressed)
        .map_err(|e| DecodeError::DecompressionFailed(e.to_string()))?;

    if decompressed.len() > MAX_DOCUMENT_SIZE {
        return Err(DecodeError::DocumentTooLarge {
            max: MAX_DOCUMENT_SIZE,
        });
    }
    log::trace!("inflated {} bytes to {}", compressed.len(), decompressed.len());
    Ok(decompressed)
}

/// Deflates `data` into a gzip stream at `level` (0-9, clamped).
pub fn compress(data: &[u8], level: u32) -> Result<Vec<u8>, EncodeError> {
    let mut encoder = GzEncoder::new(Vec::with_capacity(data.len() / 4), Compression::new(level.min(9)));
    encoder
        .write_all(data)
        .map_err(|e| EncodeError::CompressionFailed(e.to_string()))?;
    encoder
        .finish()
        .map_err(|e| EncodeError::CompressionFailed(e.to_string()))
}
