//! Limits and well-known constants for the schematic format.
//!
//! The decoder treats its input as untrusted; these bounds keep allocation
//! and recursion finite.

/// Maximum nesting depth of compound/list tags.
pub const MAX_DEPTH: usize = 512;

/// Maximum size of a decompressed document.
pub const MAX_DOCUMENT_SIZE: usize = 512 * 1024 * 1024;

/// Maximum encoded length of a string (u16 length prefix).
pub const MAX_STRING_LEN: usize = u16::MAX as usize;

/// Litematica format version written by [`SchematicWriter`](crate::SchematicWriter).
pub const LITEMATIC_VERSION: i32 = 5;

/// World data version written by default (Minecraft 1.18).
pub const DEFAULT_DATA_VERSION: i32 = 2730;

/// Default gzip level used by `save`.
pub const DEFAULT_COMPRESSION_LEVEL: u32 = 6;

/// Block state stored at palette index 0 and returned for out-of-range reads.
pub const AIR: &str = "minecraft:air";
