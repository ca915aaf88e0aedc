//! Sparse, unbounded 3D grid of palette indices.
//!
//! Writes can land anywhere in `i32` space; the canvas tracks the smallest
//! box enclosing every write and exports that box densely.

use rustc_hash::FxHashMap;

use crate::error::EncodeError;

/// Largest box `export_dense` will allocate (a region's volume is an `i32`).
const MAX_DENSE_VOLUME: u64 = i32::MAX as u64;

/// Bounding box of all coordinates written so far (inclusive).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Extents {
    pub min_x: i32,
    pub max_x: i32,
    pub min_y: i32,
    pub max_y: i32,
    pub min_z: i32,
    pub max_z: i32,
}

impl Extents {
    fn point(x: i32, y: i32, z: i32) -> Self {
        Self {
            min_x: x,
            max_x: x,
            min_y: y,
            max_y: y,
            min_z: z,
            max_z: z,
        }
    }

    fn include(&mut self, x: i32, y: i32, z: i32) {
        self.min_x = self.min_x.min(x);
        self.max_x = self.max_x.max(x);
        self.min_y = self.min_y.min(y);
        self.max_y = self.max_y.max(y);
        self.min_z = self.min_z.min(z);
        self.max_z = self.max_z.max(z);
    }

    pub fn width(&self) -> u64 {
        span(self.min_x, self.max_x)
    }

    pub fn height(&self) -> u64 {
        span(self.min_y, self.max_y)
    }

    pub fn length(&self) -> u64 {
        span(self.min_z, self.max_z)
    }
}

fn span(min: i32, max: i32) -> u64 {
    (max as i64 - min as i64 + 1) as u64
}

/// Sparse coordinate → palette index store. Unset cells read as 0.
#[derive(Debug, Clone, Default)]
pub struct VirtualCanvas {
    cells: FxHashMap<(i32, i32, i32), u32>,
    extents: Option<Extents>,
}

impl VirtualCanvas {
    /// Creates an empty canvas.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `index` at the coordinate, growing the bounding box to include it.
    pub fn set(&mut self, x: i32, y: i32, z: i32, index: u32) {
        self.cells.insert((x, y, z), index);
        match &mut self.extents {
            Some(extents) => extents.include(x, y, z),
            None => self.extents = Some(Extents::point(x, y, z)),
        }
    }

    /// Returns the stored index, or 0 if the cell was never set.
    pub fn get(&self, x: i32, y: i32, z: i32) -> u32 {
        self.cells.get(&(x, y, z)).copied().unwrap_or(0)
    }

    /// Returns the bounding box, or None before the first `set`.
    pub fn extents(&self) -> Option<Extents> {
        self.extents
    }

    /// Extent along x, 0 for an empty canvas.
    pub fn width(&self) -> u64 {
        self.extents.map_or(0, |e| e.width())
    }

    /// Extent along y, 0 for an empty canvas.
    pub fn height(&self) -> u64 {
        self.extents.map_or(0, |e| e.height())
    }

    /// Extent along z, 0 for an empty canvas.
    pub fn length(&self) -> u64 {
        self.extents.map_or(0, |e| e.length())
    }

    /// Number of cells in the bounding box, saturating at `u64::MAX`.
    pub fn volume(&self) -> u64 {
        self.width().saturating_mul(self.height()).saturating_mul(self.length())
    }

    /// Number of coordinates that have been written.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Returns true if nothing has been written.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Exports the bounding box densely in x-fastest, then z, then y order,
    /// relative to the minimum corner.
    ///
    /// Also returns the number of cells whose index is not 0 (air). Fails with
    /// `DimensionOverflow` when the box holds more than `i32::MAX` cells.
    pub fn export_dense(&self) -> Result<(Vec<u32>, usize), EncodeError> {
        let Some(extents) = self.extents else {
            return Ok((Vec::new(), 0));
        };
        let (width, height, length) = (extents.width(), extents.height(), extents.length());
        let volume = width
            .checked_mul(height)
            .and_then(|v| v.checked_mul(length))
            .filter(|&v| v <= MAX_DENSE_VOLUME)
            .ok_or(EncodeError::DimensionOverflow { width, height, length })?;
        let (width, length) = (width as usize, length as usize);

        let mut blocks = vec![0u32; volume as usize];
        let mut non_air = 0;
        for (&(x, y, z), &index) in &self.cells {
            if index == 0 {
                continue;
            }
            let dx = (x as i64 - extents.min_x as i64) as usize;
            let dy = (y as i64 - extents.min_y as i64) as usize;
            let dz = (z as i64 - extents.min_z as i64) as usize;
            blocks[dx + width * (dz + length * dy)] = index;
            non_air += 1;
        }
        Ok((blocks, non_air))
    }
}
