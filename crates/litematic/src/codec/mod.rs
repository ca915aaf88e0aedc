//! Binary encoding/decoding for Litematica schematics.
//!
//! Layers, bottom up: big-endian primitives, the schema-directed NBT tree
//! codec, bit-packed block arrays and the gzip envelope.

pub mod compression;
pub mod packed;
pub mod primitives;
pub mod tree;

pub use compression::{compress, decompress, is_gzip};
pub use packed::{bits_for_palette, pack, packed_len, unpack, WordSource};
pub use primitives::{Reader, Writer};
pub use tree::{parse, serialize};
