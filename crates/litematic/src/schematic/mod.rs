//! Reading and writing `.litematic` schematics.
//!
//! A schematic is a gzip-compressed NBT document: format versions, a
//! `Metadata` record and a `Regions` map from region name to palette,
//! packed block states and placement.

pub mod document;
pub mod reader;
pub mod schema;
pub mod writer;

pub use reader::SchematicReader;
pub use schema::SCHEMATIC_SCHEMA;
pub use writer::SchematicWriter;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{compress, serialize};
    use crate::error::{DecodeError, EncodeError, ErrorCode, ValidationError};
    use crate::model::{BlockPos, Metadata, Region, TagType};
    use crate::schematic::document::document_to_tree;

    const BUTTON: &str = "minecraft:stone_button[face=wall,facing=north]";

    fn scenario_writer() -> SchematicWriter {
        let mut writer = SchematicWriter::new("Test", "tester");
        writer.set_block(0, 0, 0, "minecraft:air");
        writer.set_block(1, 0, 0, "minecraft:obsidian");
        writer.set_block(1, 1, 0, BUTTON);
        writer
    }

    fn region(name: &str, size: (i32, i32, i32), palette: &[&str], blocks: Vec<u32>) -> Region {
        Region {
            name: name.into(),
            position: BlockPos::default(),
            size: BlockPos::new(size.0, size.1, size.2),
            palette: palette.iter().map(|s| s.to_string()).collect(),
            blocks,
        }
    }

    /// Gzipped document holding exactly the given regions.
    fn document_bytes(regions: &[Region]) -> Vec<u8> {
        let metadata = Metadata {
            name: "handmade".into(),
            region_count: regions.len() as i32,
            ..Metadata::default()
        };
        let tree = document_to_tree(5, 2730, &metadata, regions).unwrap();
        compress(&serialize(&tree, &SCHEMATIC_SCHEMA).unwrap(), 6).unwrap()
    }

    #[test]
    fn test_writer_reader_scenario() {
        let bytes = scenario_writer().save().unwrap();
        let reader = SchematicReader::new(&bytes).unwrap();

        assert_eq!(reader.total_blocks(), 2);
        assert_eq!(reader.enclosing_size(), BlockPos::new(2, 2, 1));
        assert_eq!(reader.get_block(1, 1, 0), BUTTON);
        assert_eq!(reader.get_block(1, 0, 0), "minecraft:obsidian");
        assert_eq!(reader.get_block(0, 0, 0), "minecraft:air");
        assert_eq!(reader.get_block(5, 5, 5), "minecraft:air");
    }

    #[test]
    fn test_scenario_metadata() {
        let writer = scenario_writer().description("three blocks");
        let reader = SchematicReader::new(&writer.save().unwrap()).unwrap();

        assert_eq!(reader.version(), 5);
        assert_eq!(reader.minecraft_data_version(), 2730);
        assert_eq!(reader.name(), "Test");
        assert_eq!(reader.author(), "tester");
        assert_eq!(reader.description(), "three blocks");
        assert_eq!(reader.total_volume(), 4);
        assert_eq!(reader.region_count(), 1);
        assert_eq!(reader.region_name(), "Test");
        assert_eq!(reader.region_names(), ["Test".to_string()]);
        assert_eq!(reader.region_position(), BlockPos::new(0, 0, 0));
        assert_eq!(reader.region_size(), BlockPos::new(2, 2, 1));
        assert_eq!((reader.width(), reader.height(), reader.length()), (2, 2, 1));
        assert_eq!(reader.palette(), ["minecraft:air", "minecraft:obsidian", BUTTON]);
        assert!(reader.time_created() > 0);
        assert_eq!(reader.time_created(), reader.time_modified());
    }

    #[test]
    fn test_empty_writer_roundtrip() {
        let writer = SchematicWriter::new("Empty", "nobody");
        let reader = SchematicReader::new(&writer.save().unwrap()).unwrap();

        assert_eq!(reader.total_volume(), 0);
        assert_eq!(reader.total_blocks(), 0);
        assert_eq!(reader.enclosing_size(), BlockPos::new(0, 0, 0));
        assert_eq!(reader.region_position(), BlockPos::new(0, 0, 0));
        assert_eq!(reader.palette(), ["minecraft:air"]);
        assert_eq!(reader.get_block(0, 0, 0), "minecraft:air");
    }

    #[test]
    fn test_out_of_bounds_reads_are_air() {
        let reader = SchematicReader::new(&scenario_writer().save().unwrap()).unwrap();
        for (x, y, z) in [(-1, 0, 0), (0, -1, 0), (0, 0, -1), (2, 0, 0), (0, 2, 0), (0, 0, 1), (i32::MIN, i32::MAX, 0)] {
            assert_eq!(reader.get_block(x, y, z), "minecraft:air");
        }
    }

    #[test]
    fn test_region_position_is_minimum_corner() {
        let mut writer = SchematicWriter::new("Offset", "tester");
        writer.set_block(-3, 70, 12, "minecraft:gold_block");
        writer.set_block(-1, 64, 10, "minecraft:oak_log[axis=x]");
        let reader = SchematicReader::new(&writer.save().unwrap()).unwrap();

        assert_eq!(reader.region_position(), BlockPos::new(-3, 64, 10));
        assert_eq!(reader.enclosing_size(), BlockPos::new(3, 7, 3));
        assert_eq!(reader.get_block(0, 6, 2), "minecraft:gold_block");
        assert_eq!(reader.get_block(2, 0, 0), "minecraft:oak_log[axis=x]");
        assert_eq!(reader.total_blocks(), 2);
        assert_eq!(reader.total_volume(), 63);
    }

    #[test]
    fn test_overwrite_keeps_palette_order() {
        let mut writer = SchematicWriter::new("Overwrite", "tester");
        writer.set_block(0, 0, 0, "minecraft:stone");
        writer.set_block(0, 0, 0, "minecraft:dirt");
        writer.set_block(1, 0, 0, "minecraft:stone");
        assert_eq!(writer.get_block(0, 0, 0), "minecraft:dirt");
        assert_eq!(writer.get_block(9, 9, 9), "minecraft:air");
        assert_eq!(writer.palette(), ["minecraft:air", "minecraft:stone", "minecraft:dirt"]);

        let reader = SchematicReader::new(&writer.save().unwrap()).unwrap();
        assert_eq!(reader.get_block(0, 0, 0), "minecraft:dirt");
        assert_eq!(reader.get_block(1, 0, 0), "minecraft:stone");
    }

    #[test]
    fn test_many_states_widen_packing() {
        let mut writer = SchematicWriter::new("Wool", "tester");
        for i in 0..40 {
            writer.set_block(i % 7, i / 7, 0, &format!("minecraft:test_block[n={i}]"));
        }
        let reader = SchematicReader::new(&writer.save().unwrap()).unwrap();
        assert_eq!(reader.palette().len(), 41);
        for i in 0..40 {
            assert_eq!(reader.get_block(i % 7, i / 7, 0), format!("minecraft:test_block[n={i}]"));
        }
    }

    #[test]
    fn test_explicit_timestamp_and_versions() {
        let writer = scenario_writer().version(6).minecraft_data_version(3465);
        let tree = writer.build_document_at(1_638_295_445_123).unwrap();
        let nbt = serialize(&tree, &SCHEMATIC_SCHEMA).unwrap();
        let reader = SchematicReader::from_nbt(&nbt).unwrap();

        assert_eq!(reader.time_created(), 1_638_295_445_123);
        assert_eq!(reader.time_modified(), 1_638_295_445_123);
        assert_eq!(reader.version(), 6);
        assert_eq!(reader.minecraft_data_version(), 3465);
    }

    #[test]
    fn test_accepts_uncompressed_nbt() {
        let nbt = scenario_writer().to_nbt().unwrap();
        let reader = SchematicReader::new(&nbt).unwrap();
        assert_eq!(reader.get_block(1, 1, 0), BUTTON);
    }

    #[test]
    fn test_compression_levels_read_back() {
        let writer = scenario_writer();
        for level in [0, 1, 9] {
            let reader = SchematicReader::new(&writer.save_with_level(level).unwrap()).unwrap();
            assert_eq!(reader.total_blocks(), 2);
        }
    }

    #[test]
    fn test_multiple_regions_uses_first() {
        let bytes = document_bytes(&[
            region("first", (1, 1, 1), &["minecraft:air", "minecraft:stone"], vec![1]),
            region("second", (1, 1, 1), &["minecraft:air", "minecraft:dirt"], vec![1]),
        ]);
        let reader = SchematicReader::new(&bytes).unwrap();
        assert_eq!(reader.region_name(), "first");
        assert_eq!(reader.region_names(), ["first".to_string(), "second".to_string()]);
        assert_eq!(reader.get_block(0, 0, 0), "minecraft:stone");
    }

    #[test]
    fn test_no_regions() {
        let err = SchematicReader::new(&document_bytes(&[])).unwrap_err();
        assert_eq!(err, DecodeError::NoRegions);
        assert_eq!(err.code(), ErrorCode::InvalidRegion);
    }

    #[test]
    fn test_mirrored_size() {
        let bytes = document_bytes(&[region(
            "mirrored",
            (-2, 1, 1),
            &["minecraft:air", "minecraft:stone"],
            vec![0, 1],
        )]);
        let reader = SchematicReader::new(&bytes).unwrap();
        assert_eq!(reader.region_size(), BlockPos::new(-2, 1, 1));
        assert_eq!(reader.width(), 2);
        assert_eq!(reader.get_block(1, 0, 0), "minecraft:stone");
    }

    #[test]
    fn test_palette_index_out_of_bounds() {
        let bytes = document_bytes(&[region("bad", (2, 1, 1), &["minecraft:air", "minecraft:stone"], vec![0, 3])]);
        let err = SchematicReader::new(&bytes).unwrap_err();
        assert_eq!(
            err,
            DecodeError::InvalidRegion(ValidationError::PaletteIndexOutOfBounds {
                position: 1,
                index: 3,
                size: 2,
            })
        );
    }

    #[test]
    fn test_tag_mismatch_is_schema_error() {
        let mut nbt = scenario_writer().to_nbt().unwrap();
        // first child of the root is Version
        assert_eq!(&nbt[3..13], &[TagType::Int as u8, 0, 7, b'V', b'e', b'r', b's', b'i', b'o', b'n']);
        nbt[3] = TagType::String as u8;
        let err = SchematicReader::from_nbt(&nbt).unwrap_err();
        assert_eq!(
            err,
            DecodeError::TagMismatch {
                path: "Version".into(),
                expected: TagType::Int,
                found: TagType::String,
            }
        );
        assert_eq!(err.code().code(), "E002");
    }

    #[test]
    fn test_truncated_document() {
        let nbt = scenario_writer().to_nbt().unwrap();
        let err = SchematicReader::from_nbt(&nbt[..nbt.len() / 2]).unwrap_err();
        assert_eq!(err.code(), ErrorCode::SchemaMismatch);
    }

    #[test]
    fn test_not_a_schematic() {
        let err = SchematicReader::new(b"hello world").unwrap_err();
        assert_eq!(err.code(), ErrorCode::DecompressionFailure);
    }

    #[test]
    fn test_corrupt_gzip() {
        let mut bytes = scenario_writer().save().unwrap();
        let last = bytes.len() - 1;
        // CRC/size trailer
        bytes[last] ^= 0xFF;
        let err = SchematicReader::new(&bytes).unwrap_err();
        assert_eq!(err.code(), ErrorCode::DecompressionFailure);
    }

    #[test]
    fn test_malformed_block_state_on_save() {
        let mut writer = SchematicWriter::new("Bad", "tester");
        writer.set_block(0, 0, 0, "minecraft:chest[facing=north");
        assert!(matches!(writer.save(), Err(EncodeError::MalformedBlockState(_))));
    }

    #[test]
    fn test_dimension_overflow() {
        let mut writer = SchematicWriter::new("Huge", "tester");
        writer.set_block(i32::MIN, 0, 0, "minecraft:stone");
        writer.set_block(i32::MAX, 0, 0, "minecraft:stone");
        assert!(matches!(
            writer.save(),
            Err(EncodeError::DimensionOverflow { width: 4_294_967_296, height: 1, length: 1 })
        ));
    }

    #[test]
    fn test_property_order_shares_palette_entry() {
        let mut writer = SchematicWriter::new("Levers", "tester");
        writer.set_block(0, 0, 0, "minecraft:lever[powered=true,face=floor]");
        writer.set_block(1, 0, 0, "minecraft:lever[face=floor,powered=true]");
        writer.set_block(2, 0, 0, "minecraft:lever[powered=true,face=floor]");
        assert_eq!(writer.palette(), ["minecraft:air", "minecraft:lever[face=floor,powered=true]"]);
        assert_eq!(writer.get_block(0, 0, 0), "minecraft:lever[face=floor,powered=true]");

        let reader = SchematicReader::new(&writer.save().unwrap()).unwrap();
        assert_eq!(reader.palette(), ["minecraft:air", "minecraft:lever[face=floor,powered=true]"]);
        for x in 0..3 {
            assert_eq!(reader.get_block(x, 0, 0), "minecraft:lever[face=floor,powered=true]");
        }
        assert_eq!(reader.total_blocks(), 3);
    }

    #[test]
    fn test_scenario_block_states_words() {
        let tree = scenario_writer().build_document_at(0).unwrap();
        let written = crate::codec::parse(&serialize(&tree, &SCHEMATIC_SCHEMA).unwrap(), &SCHEMATIC_SCHEMA).unwrap();
        let states = written
            .get("Regions")
            .and_then(|r| r.get("Test"))
            .and_then(|r| r.get("BlockStates"))
            .and_then(|v| v.as_long_array())
            .unwrap();
        // blocks [air, obsidian, air, button] at 2 bits each
        assert_eq!(states.words().collect::<Vec<_>>(), vec![0b10_00_01_00]);
        assert_eq!(states.as_bytes(), &[0, 0, 0, 0, 0, 0, 0, 0b1000_0100]);
    }

    #[test]
    fn test_volume_overflow() {
        let mut writer = SchematicWriter::new("Sparse", "tester");
        writer.set_block(0, 0, 0, "minecraft:stone");
        writer.set_block(100_000, 100_000, 100_000, "minecraft:stone");
        assert!(matches!(
            writer.save(),
            Err(EncodeError::DimensionOverflow { width: 100_001, height: 100_001, length: 100_001 })
        ));
    }

    #[test]
    fn test_document_keeps_opaque_lists() {
        let reader = SchematicReader::new(&scenario_writer().save().unwrap()).unwrap();
        let region = reader.document().get("Regions").and_then(|r| r.get("Test")).unwrap();
        for name in ["Entities", "TileEntities", "PendingBlockTicks"] {
            assert_eq!(region.get(name).and_then(|v| v.as_list()).map(<[_]>::len), Some(0));
        }
    }
}
