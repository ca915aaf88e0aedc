//! Error types for schematic decoding, encoding and validation.

use thiserror::Error;

use crate::model::TagType;

/// Error classes for everything that can go wrong reading a schematic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// E001: Malformed or truncated compressed stream
    DecompressionFailure,
    /// E002: Tag type at a path does not match the schema, or input ended mid-parse
    SchemaMismatch,
    /// E003: Region missing or internally inconsistent
    InvalidRegion,
    /// E004: Unparseable canonical block-state string
    MalformedBlockState,
}

impl ErrorCode {
    /// Returns the error code string (e.g., "E001").
    pub fn code(&self) -> &'static str {
        match self {
            ErrorCode::DecompressionFailure => "E001",
            ErrorCode::SchemaMismatch => "E002",
            ErrorCode::InvalidRegion => "E003",
            ErrorCode::MalformedBlockState => "E004",
        }
    }
}

/// Error while decoding a canonical block-state string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BlockStateError {
    #[error("block state {input:?} has an empty name")]
    EmptyName { input: String },

    #[error("block state {input:?} opens '[' without a closing ']'")]
    UnclosedProperties { input: String },

    #[error("block state {input:?} has property {segment:?} without '='")]
    MissingEquals { input: String, segment: String },
}

/// Error during binary decoding.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DecodeError {
    // === E001: Decompression ===
    #[error("[E001] gzip decompression failed: {0}")]
    DecompressionFailed(String),

    #[error("[E001] decompressed document exceeds maximum {max} bytes")]
    DocumentTooLarge { max: usize },

    // === E002: Schema mismatch ===
    #[error("[E002] unexpected end of input while reading {context}")]
    UnexpectedEof { context: &'static str },

    #[error("[E002] input ended at {path} while reading {context}")]
    Truncated { path: String, context: &'static str },

    #[error("[E002] tag mismatch at {path}: expected {expected:?}, found {found:?}")]
    TagMismatch {
        path: String,
        expected: TagType,
        found: TagType,
    },

    #[error("[E002] invalid tag type {tag} at {path}")]
    InvalidTagType { path: String, tag: u8 },

    #[error("[E002] missing field {path}")]
    MissingField { path: String },

    #[error("[E002] negative length {len} at {path}")]
    NegativeLength { path: String, len: i32 },

    #[error("[E002] invalid modified UTF-8 at {path}")]
    InvalidUtf8 { path: String },

    #[error("[E002] nesting at {path} exceeds maximum depth {max}")]
    DepthLimitExceeded { path: String, max: usize },

    #[error("[E002] packed array has {actual} words, {expected} required")]
    PackedArrayTooShort { expected: usize, actual: usize },

    // === E003: Region ===
    #[error("[E003] document contains no regions")]
    NoRegions,

    #[error("[E003] invalid region: {0}")]
    InvalidRegion(#[from] ValidationError),

    // === E004: Block state ===
    #[error("[E004] {0}")]
    MalformedBlockState(#[from] BlockStateError),
}

impl DecodeError {
    /// Returns the error code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            DecodeError::DecompressionFailed(_) | DecodeError::DocumentTooLarge { .. } => {
                ErrorCode::DecompressionFailure
            }
            DecodeError::NoRegions | DecodeError::InvalidRegion(_) => ErrorCode::InvalidRegion,
            DecodeError::MalformedBlockState(_) => ErrorCode::MalformedBlockState,
            _ => ErrorCode::SchemaMismatch,
        }
    }
}

/// Error during binary encoding.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EncodeError {
    #[error("value at {path} does not match schema: expected {expected}, found {found}")]
    TagMismatch {
        path: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("missing field {path}")]
    MissingField { path: String },

    #[error("{path} length {len} exceeds maximum {max}")]
    LengthExceedsLimit { path: String, len: usize, max: usize },

    #[error("region {width}x{height}x{length} does not fit in a 32-bit size")]
    DimensionOverflow { width: u64, height: u64, length: u64 },

    #[error("gzip compression failed: {0}")]
    CompressionFailed(String),

    #[error("{0}")]
    MalformedBlockState(#[from] BlockStateError),

    #[error("invalid region: {0}")]
    InvalidRegion(#[from] ValidationError),
}

/// Error during region validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("region has {actual} blocks, its size requires {expected}")]
    BlockCountMismatch { expected: usize, actual: usize },

    #[error("block {position} uses palette index {index} (palette size: {size})")]
    PaletteIndexOutOfBounds {
        position: usize,
        index: u32,
        size: usize,
    },

    #[error("palette entry {state:?} appears at both {first} and {second}")]
    DuplicatePaletteEntry {
        state: String,
        first: usize,
        second: usize,
    },
}
