//! litematic: reader and writer for Litematica `.litematic` schematics.
//!
//! A schematic is a gzip-compressed NBT document holding format versions,
//! metadata and one or more regions of bit-packed block states.
//!
//! # Quick Start
//!
//! ```rust
//! use litematic::{SchematicReader, SchematicWriter};
//!
//! let mut writer = SchematicWriter::new("Gate", "builder");
//! writer.set_block(0, 0, 0, "minecraft:obsidian");
//! writer.set_block(0, 1, 0, "minecraft:stone_button[face=wall,facing=north]");
//!
//! let bytes = writer.save().unwrap();
//! let reader = SchematicReader::new(&bytes).unwrap();
//!
//! assert_eq!(reader.total_blocks(), 2);
//! assert_eq!(reader.get_block(0, 1, 0), "minecraft:stone_button[face=wall,facing=north]");
//! assert_eq!(reader.get_block(9, 9, 9), "minecraft:air");
//! ```
//!
//! # Modules
//!
//! - [`model`]: Core data types (schema/value tree, block states, canvas, regions)
//! - [`codec`]: NBT tree codec, bit-packed arrays and gzip framing
//! - [`schematic`]: Document schema, reader and writer
//! - [`validate`]: Region consistency checks
//! - [`error`]: Error types
//! - [`limits`]: Decoding limits and format defaults
//!
//! # Security
//!
//! The decoder is designed to safely handle untrusted input:
//! - Decompressed size and nesting depth are bounded by [`limits`]
//! - Array and list lengths are checked against the remaining input before allocating
//! - Invalid data is rejected with an error naming the offending path

pub mod codec;
pub mod error;
pub mod limits;
pub mod model;
pub mod schematic;
pub mod util;
pub mod validate;

// Re-export commonly used types at crate root
pub use error::{BlockStateError, DecodeError, EncodeError, ErrorCode, ValidationError};
pub use model::{
    BlockPos, BlockState, Compound, Extents, Field, LongArray, Metadata, OpaqueTag, Region, Schema, TagType,
    TreeValue, VirtualCanvas,
};
pub use schematic::{SchematicReader, SchematicWriter, SCHEMATIC_SCHEMA};
pub use validate::validate_region;

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
