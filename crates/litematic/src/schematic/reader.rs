//! Decoding a `.litematic` document into its first region.

use crate::codec::compression::{decompress, is_gzip};
use crate::codec::tree::parse;
use crate::error::DecodeError;
use crate::model::{BlockPos, Metadata, Region, TagType, TreeValue};
use crate::schematic::document::{metadata_from_tree, region_from_tree, regions_from_tree, versions_from_tree};
use crate::schematic::schema::SCHEMATIC_SCHEMA;
use crate::validate::validate_region;

/// A parsed schematic, exposing metadata and the blocks of its first region.
///
/// Immutable once constructed.
#[derive(Debug, Clone)]
pub struct SchematicReader {
    document: TreeValue,
    version: i32,
    minecraft_data_version: i32,
    metadata: Metadata,
    region_names: Vec<String>,
    region: Region,
}

impl SchematicReader {
    /// Reads a gzip-compressed document.
    ///
    /// Uncompressed NBT (starting with a compound tag) is accepted as well.
    pub fn new(bytes: &[u8]) -> Result<Self, DecodeError> {
        if !is_gzip(bytes) && bytes.first() == Some(&(TagType::Compound as u8)) {
            log::debug!("input is uncompressed NBT ({} bytes)", bytes.len());
            return Self::from_nbt(bytes);
        }
        let nbt = decompress(bytes)?;
        log::debug!("decompressed {} bytes to {}", bytes.len(), nbt.len());
        Self::from_nbt(&nbt)
    }

    /// Reads an uncompressed NBT document.
    pub fn from_nbt(nbt: &[u8]) -> Result<Self, DecodeError> {
        let document = parse(nbt, &SCHEMATIC_SCHEMA)?;
        let (version, minecraft_data_version) = versions_from_tree(&document)?;
        let metadata = metadata_from_tree(&document)?;

        let regions = regions_from_tree(&document)?;
        let region_names: Vec<String> = regions.keys().map(str::to_string).collect();
        let (name, value) = regions.first().ok_or(DecodeError::NoRegions)?;
        if region_names.len() > 1 {
            log::warn!(
                "schematic has {} regions ({}); only {:?} is read",
                region_names.len(),
                region_names.join(", "),
                name
            );
        }

        let region = region_from_tree(name, value)?;
        validate_region(&region)?;

        Ok(Self {
            document,
            version,
            minecraft_data_version,
            metadata,
            region_names,
            region,
        })
    }

    /// Block state at a coordinate local to the region; air when out of range.
    pub fn get_block(&self, x: i32, y: i32, z: i32) -> &str {
        self.region.block(x, y, z)
    }

    // =========================================================================
    // Document fields
    // =========================================================================

    pub fn version(&self) -> i32 {
        self.version
    }

    pub fn minecraft_data_version(&self) -> i32 {
        self.minecraft_data_version
    }

    pub fn name(&self) -> &str {
        &self.metadata.name
    }

    pub fn author(&self) -> &str {
        &self.metadata.author
    }

    pub fn description(&self) -> &str {
        &self.metadata.description
    }

    pub fn total_blocks(&self) -> i32 {
        self.metadata.total_blocks
    }

    pub fn total_volume(&self) -> i32 {
        self.metadata.total_volume
    }

    pub fn enclosing_size(&self) -> BlockPos {
        self.metadata.enclosing_size
    }

    /// Creation time in milliseconds since the Unix epoch.
    pub fn time_created(&self) -> i64 {
        self.metadata.time_created
    }

    /// Modification time in milliseconds since the Unix epoch.
    pub fn time_modified(&self) -> i64 {
        self.metadata.time_modified
    }

    /// `RegionCount` as recorded in the metadata.
    pub fn region_count(&self) -> i32 {
        self.metadata.region_count
    }

    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    /// The full parsed tree, including opaque entity data.
    pub fn document(&self) -> &TreeValue {
        &self.document
    }

    // =========================================================================
    // Region fields
    // =========================================================================

    /// Names of every region in the document, in file order.
    pub fn region_names(&self) -> &[String] {
        &self.region_names
    }

    pub fn region_name(&self) -> &str {
        &self.region.name
    }

    pub fn region_position(&self) -> BlockPos {
        self.region.position
    }

    /// Signed size; negative components mark mirrored axes.
    pub fn region_size(&self) -> BlockPos {
        self.region.size
    }

    pub fn palette(&self) -> &[String] {
        &self.region.palette
    }

    pub fn width(&self) -> usize {
        self.region.width()
    }

    pub fn height(&self) -> usize {
        self.region.height()
    }

    pub fn length(&self) -> usize {
        self.region.length()
    }

    pub fn region(&self) -> &Region {
        &self.region
    }
}
