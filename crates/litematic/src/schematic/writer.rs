//! Building a single-region schematic from individually placed blocks.

use rustc_hash::FxHashMap;

use crate::codec::compression::compress;
use crate::codec::tree::serialize;
use crate::error::EncodeError;
use crate::limits::{AIR, DEFAULT_COMPRESSION_LEVEL, DEFAULT_DATA_VERSION, LITEMATIC_VERSION};
use crate::model::block_state;
use crate::model::{BlockPos, Metadata, Region, TreeValue, VirtualCanvas};
use crate::schematic::document::document_to_tree;
use crate::schematic::schema::SCHEMATIC_SCHEMA;
use crate::util::now_millis;
use crate::validate::validate_region;

/// Accumulates blocks in unbounded space and saves the smallest enclosing box.
///
/// # Example
///
/// ```
/// use litematic::SchematicWriter;
///
/// let mut writer = SchematicWriter::new("Tower", "builder").description("a stone pillar");
/// for y in 0..10 {
///     writer.set_block(0, y, 0, "minecraft:stone");
/// }
/// let bytes = writer.save().unwrap();
/// assert!(!bytes.is_empty());
/// ```
#[derive(Debug, Clone)]
pub struct SchematicWriter {
    name: String,
    author: String,
    description: String,
    version: i32,
    minecraft_data_version: i32,
    palette: Vec<String>,
    palette_index: FxHashMap<String, u32>,
    canvas: VirtualCanvas,
}

impl SchematicWriter {
    /// Creates a writer whose single region is named after the schematic.
    pub fn new(name: impl Into<String>, author: impl Into<String>) -> Self {
        let mut palette_index = FxHashMap::default();
        palette_index.insert(AIR.to_string(), 0);
        Self {
            name: name.into(),
            author: author.into(),
            description: String::new(),
            version: LITEMATIC_VERSION,
            minecraft_data_version: DEFAULT_DATA_VERSION,
            palette: vec![AIR.to_string()],
            palette_index,
            canvas: VirtualCanvas::new(),
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Sets the Litematica format version (default 5).
    pub fn version(mut self, version: i32) -> Self {
        self.version = version;
        self
    }

    /// Sets the world data version (default 2730).
    pub fn minecraft_data_version(mut self, data_version: i32) -> Self {
        self.minecraft_data_version = data_version;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Palette in first-seen order; index 0 is air.
    pub fn palette(&self) -> &[String] {
        &self.palette
    }

    pub fn canvas(&self) -> &VirtualCanvas {
        &self.canvas
    }

    /// Palette slot for a state, keyed by its canonical spelling.
    ///
    /// Strings that do not decode are kept verbatim so `save` can report them.
    fn palette_index_for(&mut self, state: &str) -> u32 {
        if let Some(&index) = self.palette_index.get(state) {
            return index;
        }
        let canonical = block_state::decode(state)
            .map(|decoded| decoded.to_canonical())
            .unwrap_or_else(|_| state.to_string());
        let index = match self.palette_index.get(&canonical) {
            Some(&index) => index,
            None => {
                let index = self.palette.len() as u32;
                self.palette.push(canonical.clone());
                self.palette_index.insert(canonical.clone(), index);
                index
            }
        };
        if canonical != state {
            // alias for the next lookup of this spelling
            self.palette_index.insert(state.to_string(), index);
        }
        index
    }

    /// Places a block state, adding its canonical form to the palette if new.
    pub fn set_block(&mut self, x: i32, y: i32, z: i32, state: &str) {
        let index = self.palette_index_for(state);
        self.canvas.set(x, y, z, index);
    }

    /// Block state at a coordinate; air if never set.
    pub fn get_block(&self, x: i32, y: i32, z: i32) -> &str {
        self.palette
            .get(self.canvas.get(x, y, z) as usize)
            .map_or(AIR, String::as_str)
    }

    /// Exports the canvas as a region in schematic coordinates, with its non-air count.
    fn region(&self) -> Result<(Region, usize), EncodeError> {
        let (width, height, length) = (self.canvas.width(), self.canvas.height(), self.canvas.length());
        let limit = i32::MAX as u64;
        if width > limit || height > limit || length > limit {
            return Err(EncodeError::DimensionOverflow { width, height, length });
        }

        let position = self
            .canvas
            .extents()
            .map_or_else(BlockPos::default, |e| BlockPos::new(e.min_x, e.min_y, e.min_z));
        let (blocks, non_air) = self.canvas.export_dense()?;
        let region = Region {
            name: self.name.clone(),
            position,
            size: BlockPos::new(width as i32, height as i32, length as i32),
            palette: self.palette.clone(),
            blocks,
        };
        Ok((region, non_air))
    }

    /// Builds the document tree, stamping both timestamps with the current time.
    pub fn build_document(&self) -> Result<TreeValue, EncodeError> {
        self.build_document_at(now_millis())
    }

    /// Builds the document tree with explicit timestamps (ms since epoch).
    pub fn build_document_at(&self, timestamp: i64) -> Result<TreeValue, EncodeError> {
        let (region, total_blocks) = self.region()?;
        validate_region(&region)?;

        let metadata = Metadata {
            name: self.name.clone(),
            author: self.author.clone(),
            description: self.description.clone(),
            enclosing_size: region.size,
            time_created: timestamp,
            time_modified: timestamp,
            total_blocks: total_blocks as i32,
            total_volume: region.blocks.len() as i32,
            region_count: 1,
        };
        log::debug!(
            "building {:?}: {}x{}x{}, {} blocks, {} palette entries",
            self.name,
            region.size.x,
            region.size.y,
            region.size.z,
            total_blocks,
            region.palette.len()
        );
        document_to_tree(self.version, self.minecraft_data_version, &metadata, &[region])
    }

    /// Serializes the document to uncompressed NBT.
    pub fn to_nbt(&self) -> Result<Vec<u8>, EncodeError> {
        serialize(&self.build_document()?, &SCHEMATIC_SCHEMA)
    }

    /// Serializes and gzips the document at the default level.
    pub fn save(&self) -> Result<Vec<u8>, EncodeError> {
        self.save_with_level(DEFAULT_COMPRESSION_LEVEL)
    }

    /// Serializes and gzips the document at `level` (0-9).
    pub fn save_with_level(&self, level: u32) -> Result<Vec<u8>, EncodeError> {
        let nbt = self.to_nbt()?;
        let compressed = compress(&nbt, level)?;
        log::debug!("saved {:?}: {} bytes NBT, {} bytes gzip", self.name, nbt.len(), compressed.len());
        Ok(compressed)
    }
}
