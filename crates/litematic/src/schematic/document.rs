//! Conversion between the parsed tree and typed regions/metadata.

use crate::codec::packed::{bits_for_palette, pack, unpack};
use crate::error::{DecodeError, EncodeError};
use crate::model::block_state;
use crate::model::{BlockPos, Compound, LongArray, Metadata, Region, TreeValue};
use crate::schematic::schema::*;

// =============================================================================
// TREE -> MODEL
// =============================================================================

/// Looks up a child that the schema guarantees, reporting its path if absent.
fn child<'t>(compound: &'t Compound, parent: &str, name: &str) -> Result<&'t TreeValue, DecodeError> {
    compound.get(name).ok_or_else(|| DecodeError::MissingField {
        path: format!("{parent}.{name}"),
    })
}

fn compound<'t>(value: &'t TreeValue, path: &str) -> Result<&'t Compound, DecodeError> {
    value.as_compound().ok_or_else(|| DecodeError::MissingField { path: path.to_string() })
}

fn int(compound: &Compound, parent: &str, name: &str) -> Result<i32, DecodeError> {
    child(compound, parent, name)?
        .as_int()
        .ok_or_else(|| DecodeError::MissingField {
            path: format!("{parent}.{name}"),
        })
}

fn long(compound: &Compound, parent: &str, name: &str) -> Result<i64, DecodeError> {
    child(compound, parent, name)?
        .as_long()
        .ok_or_else(|| DecodeError::MissingField {
            path: format!("{parent}.{name}"),
        })
}

fn string(compound: &Compound, parent: &str, name: &str) -> Result<String, DecodeError> {
    child(compound, parent, name)?
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| DecodeError::MissingField {
            path: format!("{parent}.{name}"),
        })
}

fn vec3(compound: &Compound, parent: &str, name: &str) -> Result<BlockPos, DecodeError> {
    let path = format!("{parent}.{name}");
    let v = self::compound(child(compound, parent, name)?, &path)?;
    Ok(BlockPos::new(int(v, &path, "x")?, int(v, &path, "y")?, int(v, &path, "z")?))
}

/// Reads `Version` and `MinecraftDataVersion` from the root.
pub fn versions_from_tree(root: &TreeValue) -> Result<(i32, i32), DecodeError> {
    let root = compound(root, "<root>")?;
    let version = root.get(VERSION).and_then(TreeValue::as_int);
    let data_version = root.get(MINECRAFT_DATA_VERSION).and_then(TreeValue::as_int);
    match (version, data_version) {
        (Some(version), Some(data_version)) => Ok((version, data_version)),
        (None, _) => Err(DecodeError::MissingField { path: VERSION.to_string() }),
        (_, None) => Err(DecodeError::MissingField {
            path: MINECRAFT_DATA_VERSION.to_string(),
        }),
    }
}

/// Reads the `Metadata` record from the root.
pub fn metadata_from_tree(root: &TreeValue) -> Result<Metadata, DecodeError> {
    let meta = root
        .get(METADATA)
        .and_then(TreeValue::as_compound)
        .ok_or_else(|| DecodeError::MissingField { path: METADATA.to_string() })?;
    let p = METADATA;
    Ok(Metadata {
        name: string(meta, p, NAME)?,
        author: string(meta, p, AUTHOR)?,
        description: string(meta, p, DESCRIPTION)?,
        enclosing_size: vec3(meta, p, ENCLOSING_SIZE)?,
        time_created: long(meta, p, TIME_CREATED)?,
        time_modified: long(meta, p, TIME_MODIFIED)?,
        total_blocks: int(meta, p, TOTAL_BLOCKS)?,
        total_volume: int(meta, p, TOTAL_VOLUME)?,
        region_count: int(meta, p, REGION_COUNT)?,
    })
}

/// Returns the `Regions` map from the root.
pub fn regions_from_tree(root: &TreeValue) -> Result<&Compound, DecodeError> {
    root.get(REGIONS)
        .and_then(TreeValue::as_compound)
        .ok_or_else(|| DecodeError::MissingField { path: REGIONS.to_string() })
}

/// Canonical block-state string of one `BlockStatePalette` entry.
fn palette_entry_from_tree(entry: &TreeValue, path: &str) -> Result<String, DecodeError> {
    let entry = compound(entry, path)?;
    let name = string(entry, path, NAME)?;
    let properties = entry.get(PROPERTIES).and_then(TreeValue::as_compound);
    Ok(match properties {
        Some(props) => block_state::encode(
            &name,
            props.iter().filter_map(|(k, v)| v.as_str().map(|v| (k, v))),
        ),
        None => name,
    })
}

/// Decodes one region: palette strings, positions and the unpacked block array.
pub fn region_from_tree(name: &str, value: &TreeValue) -> Result<Region, DecodeError> {
    let path = format!("{REGIONS}.{name}");
    let region = compound(value, &path)?;

    let palette = child(region, &path, BLOCK_STATE_PALETTE)?
        .as_list()
        .unwrap_or_default()
        .iter()
        .enumerate()
        .map(|(i, entry)| palette_entry_from_tree(entry, &format!("{path}.{BLOCK_STATE_PALETTE}[{i}]")))
        .collect::<Result<Vec<_>, _>>()?;

    let mut decoded = Region {
        name: name.to_string(),
        position: vec3(region, &path, POSITION)?,
        size: vec3(region, &path, SIZE)?,
        palette,
        blocks: Vec::new(),
    };

    let states = child(region, &path, BLOCK_STATES)?
        .as_long_array()
        .ok_or_else(|| DecodeError::MissingField {
            path: format!("{path}.{BLOCK_STATES}"),
        })?;
    let count = decoded.volume().ok_or(DecodeError::PackedArrayTooShort {
        expected: usize::MAX,
        actual: states.len(),
    })?;
    let bits = bits_for_palette(decoded.palette.len());
    decoded.blocks = unpack(states, bits, count)?;

    log::debug!(
        "region {:?}: {}x{}x{}, {} palette entries, {} bits per block",
        name,
        decoded.width(),
        decoded.height(),
        decoded.length(),
        decoded.palette.len(),
        bits
    );
    Ok(decoded)
}

// =============================================================================
// MODEL -> TREE
// =============================================================================

fn vec3_to_tree(pos: BlockPos) -> TreeValue {
    TreeValue::Record(
        Compound::with_capacity(3)
            .with("x", pos.x.into())
            .with("y", pos.y.into())
            .with("z", pos.z.into()),
    )
}

fn empty_list() -> TreeValue {
    TreeValue::List(Vec::new())
}

/// Builds the `Metadata` record.
pub fn metadata_to_tree(meta: &Metadata) -> TreeValue {
    TreeValue::Record(
        Compound::with_capacity(9)
            .with(NAME, meta.name.as_str().into())
            .with(AUTHOR, meta.author.as_str().into())
            .with(DESCRIPTION, meta.description.as_str().into())
            .with(ENCLOSING_SIZE, vec3_to_tree(meta.enclosing_size))
            .with(TIME_CREATED, meta.time_created.into())
            .with(TIME_MODIFIED, meta.time_modified.into())
            .with(TOTAL_BLOCKS, meta.total_blocks.into())
            .with(TOTAL_VOLUME, meta.total_volume.into())
            .with(REGION_COUNT, meta.region_count.into()),
    )
}

/// Builds one region record, packing blocks at the palette's bit width.
pub fn region_to_tree(region: &Region) -> Result<TreeValue, EncodeError> {
    let palette = region
        .palette
        .iter()
        .map(|state| -> Result<TreeValue, EncodeError> {
            let state = block_state::decode(state)?;
            let properties: Compound = state
                .properties
                .into_iter()
                .map(|(k, v)| (k, TreeValue::String(v)))
                .collect();
            Ok(TreeValue::Record(
                Compound::with_capacity(2)
                    .with(NAME, state.name.into())
                    .with(PROPERTIES, TreeValue::Map(properties)),
            ))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let words = pack(&region.blocks, bits_for_palette(region.palette.len()));

    Ok(TreeValue::Record(
        Compound::with_capacity(7)
            .with(BLOCK_STATE_PALETTE, TreeValue::List(palette))
            .with(BLOCK_STATES, LongArray::from_words(&words).into())
            .with(POSITION, vec3_to_tree(region.position))
            .with(SIZE, vec3_to_tree(region.size))
            .with(ENTITIES, empty_list())
            .with(TILE_ENTITIES, empty_list())
            .with(PENDING_BLOCK_TICKS, empty_list()),
    ))
}

/// Assembles a full document tree.
pub fn document_to_tree(
    version: i32,
    data_version: i32,
    metadata: &Metadata,
    regions: &[Region],
) -> Result<TreeValue, EncodeError> {
    let mut map = Compound::with_capacity(regions.len());
    for region in regions {
        map.insert(region.name.as_str(), region_to_tree(region)?);
    }
    Ok(TreeValue::Record(
        Compound::with_capacity(4)
            .with(VERSION, version.into())
            .with(MINECRAFT_DATA_VERSION, data_version.into())
            .with(METADATA, metadata_to_tree(metadata))
            .with(REGIONS, TreeValue::Map(map)),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_region() -> Region {
        Region {
            name: "main".into(),
            position: BlockPos::new(-1, 64, 3),
            size: BlockPos::new(2, 1, 2),
            palette: vec![
                "minecraft:air".into(),
                "minecraft:oak_log[axis=y]".into(),
                "minecraft:chest[facing=north,waterlogged=false]".into(),
            ],
            blocks: vec![0, 1, 2, 1],
        }
    }

    #[test]
    fn test_region_roundtrip() {
        let region = sample_region();
        let tree = region_to_tree(&region).unwrap();
        assert_eq!(region_from_tree("main", &tree).unwrap(), region);
    }

    #[test]
    fn test_palette_entry_properties() {
        let tree = region_to_tree(&sample_region()).unwrap();
        let palette = tree.get(BLOCK_STATE_PALETTE).and_then(TreeValue::as_list).unwrap();
        assert_eq!(palette[0].get(NAME).and_then(TreeValue::as_str), Some("minecraft:air"));
        assert!(palette[0].get(PROPERTIES).and_then(TreeValue::as_compound).unwrap().is_empty());
        let chest = palette[2].get(PROPERTIES).and_then(TreeValue::as_compound).unwrap();
        assert_eq!(chest.get("facing").and_then(TreeValue::as_str), Some("north"));
    }

    #[test]
    fn test_palette_entry_without_properties() {
        let entry = TreeValue::Record(Compound::new().with(NAME, "minecraft:stone".into()));
        assert_eq!(palette_entry_from_tree(&entry, "p").unwrap(), "minecraft:stone");
    }

    #[test]
    fn test_palette_entry_sorts_properties() {
        let entry = TreeValue::Record(
            Compound::new().with(NAME, "minecraft:observer".into()).with(
                PROPERTIES,
                TreeValue::Map(
                    Compound::new()
                        .with("powered", "false".into())
                        .with("facing", "east".into()),
                ),
            ),
        );
        assert_eq!(
            palette_entry_from_tree(&entry, "p").unwrap(),
            "minecraft:observer[facing=east,powered=false]"
        );
    }

    #[test]
    fn test_malformed_palette_state_on_encode() {
        let mut region = sample_region();
        region.palette.push("minecraft:bad[facing".into());
        assert!(matches!(
            region_to_tree(&region),
            Err(EncodeError::MalformedBlockState(_))
        ));
    }

    #[test]
    fn test_short_block_states() {
        let region = sample_region();
        let mut tree = region_to_tree(&region).unwrap();
        if let TreeValue::Record(c) = &mut tree {
            c.insert(BLOCK_STATES, LongArray::new().into());
        }
        assert!(matches!(
            region_from_tree("main", &tree),
            Err(DecodeError::PackedArrayTooShort { expected: 1, actual: 0 })
        ));
    }

    #[test]
    fn test_metadata_roundtrip() {
        let meta = Metadata {
            name: "House".into(),
            author: "someone".into(),
            description: "two floors".into(),
            enclosing_size: BlockPos::new(4, 5, 6),
            time_created: 1,
            time_modified: 2,
            total_blocks: 3,
            total_volume: 120,
            region_count: 1,
        };
        let root = TreeValue::Record(Compound::new().with(METADATA, metadata_to_tree(&meta)));
        assert_eq!(metadata_from_tree(&root).unwrap(), meta);
    }
}
