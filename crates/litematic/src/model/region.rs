//! Regions and document metadata.

use crate::limits::AIR;

/// Integer triple used for positions and sizes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct BlockPos {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl BlockPos {
    pub fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }
}

/// One rectangular voxel volume with its own palette.
///
/// `size` components may be negative to mark mirroring along that axis; only
/// their magnitude determines the dense layout.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Region {
    pub name: String,
    /// Minimum corner in schematic space.
    pub position: BlockPos,
    pub size: BlockPos,
    /// Canonical block-state strings.
    pub palette: Vec<String>,
    /// Palette indices in x-fastest, then z, then y order.
    pub blocks: Vec<u32>,
}

impl Region {
    pub fn width(&self) -> usize {
        self.size.x.unsigned_abs() as usize
    }

    pub fn height(&self) -> usize {
        self.size.y.unsigned_abs() as usize
    }

    pub fn length(&self) -> usize {
        self.size.z.unsigned_abs() as usize
    }

    /// Number of cells the size describes, or None if it overflows `usize`.
    pub fn volume(&self) -> Option<usize> {
        self.width()
            .checked_mul(self.height())?
            .checked_mul(self.length())
    }

    /// Dense index of a local coordinate, or None when out of range.
    #[inline]
    pub fn index(&self, x: i32, y: i32, z: i32) -> Option<usize> {
        let (x, y, z) = (usize::try_from(x).ok()?, usize::try_from(y).ok()?, usize::try_from(z).ok()?);
        if x >= self.width() || y >= self.height() || z >= self.length() {
            return None;
        }
        Some(x + self.width() * (z + self.length() * y))
    }

    /// Palette index at a local coordinate.
    pub fn palette_index(&self, x: i32, y: i32, z: i32) -> Option<u32> {
        self.index(x, y, z).and_then(|i| self.blocks.get(i).copied())
    }

    /// Block state at a local coordinate; air outside the region.
    pub fn block(&self, x: i32, y: i32, z: i32) -> &str {
        self.palette_index(x, y, z)
            .and_then(|i| self.palette.get(i as usize))
            .map_or(AIR, String::as_str)
    }
}

/// Document-level metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Metadata {
    pub name: String,
    pub author: String,
    pub description: String,
    pub enclosing_size: BlockPos,
    /// Milliseconds since the Unix epoch.
    pub time_created: i64,
    /// Milliseconds since the Unix epoch.
    pub time_modified: i64,
    /// Non-air blocks.
    pub total_blocks: i32,
    pub total_volume: i32,
    pub region_count: i32,
}
