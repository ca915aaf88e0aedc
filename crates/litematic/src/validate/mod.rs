//! Consistency checks for decoded and assembled regions.
//!
//! Structural validation happens while parsing the tree; these checks cover
//! the relationships between a region's size, palette and block array.

use rustc_hash::FxHashMap;

use crate::error::ValidationError;
use crate::model::Region;

/// Validates a region's block count, palette indices and palette uniqueness.
pub fn validate_region(region: &Region) -> Result<(), ValidationError> {
    let expected = region.volume().unwrap_or(usize::MAX);
    if region.blocks.len() != expected {
        return Err(ValidationError::BlockCountMismatch {
            expected,
            actual: region.blocks.len(),
        });
    }

    let size = region.palette.len();
    if let Some(position) = region.blocks.iter().position(|&i| i as usize >= size) {
        return Err(ValidationError::PaletteIndexOutOfBounds {
            position,
            index: region.blocks[position],
            size,
        });
    }

    validate_palette(&region.palette)
}

/// Checks that no block state appears twice in a palette.
pub fn validate_palette(palette: &[String]) -> Result<(), ValidationError> {
    let mut seen = FxHashMap::with_capacity_and_hasher(palette.len(), Default::default());
    for (i, state) in palette.iter().enumerate() {
        if let Some(first) = seen.insert(state.as_str(), i) {
            return Err(ValidationError::DuplicatePaletteEntry {
                state: state.clone(),
                first,
                second: i,
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::BlockPos;

    fn region(size: (i32, i32, i32), palette: &[&str], blocks: Vec<u32>) -> Region {
        Region {
            name: "r".into(),
            position: BlockPos::default(),
            size: BlockPos::new(size.0, size.1, size.2),
            palette: palette.iter().map(|s| s.to_string()).collect(),
            blocks,
        }
    }

    #[test]
    fn test_valid_region() {
        let r = region((2, 1, -2), &["minecraft:air", "minecraft:stone"], vec![0, 1, 1, 0]);
        assert!(validate_region(&r).is_ok());
    }

    #[test]
    fn test_empty_region() {
        let r = region((0, 0, 0), &["minecraft:air"], Vec::new());
        assert!(validate_region(&r).is_ok());
    }

    #[test]
    fn test_block_count_mismatch() {
        let r = region((2, 2, 2), &["minecraft:air"], vec![0; 7]);
        assert_eq!(
            validate_region(&r),
            Err(ValidationError::BlockCountMismatch { expected: 8, actual: 7 })
        );
    }

    #[test]
    fn test_index_out_of_bounds() {
        let r = region((3, 1, 1), &["minecraft:air", "minecraft:stone"], vec![0, 1, 3]);
        assert_eq!(
            validate_region(&r),
            Err(ValidationError::PaletteIndexOutOfBounds { position: 2, index: 3, size: 2 })
        );
    }

    #[test]
    fn test_duplicate_palette_entry() {
        let r = region((1, 1, 1), &["minecraft:air", "minecraft:stone", "minecraft:stone"], vec![0]);
        assert_eq!(
            validate_region(&r),
            Err(ValidationError::DuplicatePaletteEntry {
                state: "minecraft:stone".into(),
                first: 1,
                second: 2,
            })
        );
    }
}
