//! Data model types for schematics.
//!
//! This module contains the in-memory types the codecs produce and consume:
//! - Tag types and the schema/value tree
//! - Long arrays (word-addressable packed data)
//! - Block states (canonical strings)
//! - The virtual canvas used while writing
//! - Regions and metadata

pub mod block_state;
pub mod canvas;
pub mod long_array;
pub mod region;
pub mod tag;
pub mod tree;

pub use block_state::BlockState;
pub use canvas::{Extents, VirtualCanvas};
pub use long_array::LongArray;
pub use region::{BlockPos, Metadata, Region};
pub use tag::TagType;
pub use tree::{Compound, Field, OpaqueTag, Schema, TreeValue};
