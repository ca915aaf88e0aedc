//! The fixed document shape of a `.litematic` file.

use lazy_static::lazy_static;

use crate::model::{Field, Schema};

pub const VERSION: &str = "Version";
pub const MINECRAFT_DATA_VERSION: &str = "MinecraftDataVersion";
pub const METADATA: &str = "Metadata";
pub const REGIONS: &str = "Regions";

pub const NAME: &str = "Name";
pub const AUTHOR: &str = "Author";
pub const DESCRIPTION: &str = "Description";
pub const ENCLOSING_SIZE: &str = "EnclosingSize";
pub const TIME_CREATED: &str = "TimeCreated";
pub const TIME_MODIFIED: &str = "TimeModified";
pub const TOTAL_BLOCKS: &str = "TotalBlocks";
pub const TOTAL_VOLUME: &str = "TotalVolume";
pub const REGION_COUNT: &str = "RegionCount";

pub const BLOCK_STATE_PALETTE: &str = "BlockStatePalette";
pub const BLOCK_STATES: &str = "BlockStates";
pub const POSITION: &str = "Position";
pub const SIZE: &str = "Size";
pub const ENTITIES: &str = "Entities";
pub const TILE_ENTITIES: &str = "TileEntities";
pub const PENDING_BLOCK_TICKS: &str = "PendingBlockTicks";

pub const PROPERTIES: &str = "Properties";

fn vec3() -> Schema {
    Schema::record([
        Field::new("x", Schema::Int),
        Field::new("y", Schema::Int),
        Field::new("z", Schema::Int),
    ])
}

fn palette_entry() -> Schema {
    Schema::record([
        Field::new(NAME, Schema::String),
        Field::optional(PROPERTIES, Schema::map(Schema::String)),
    ])
}

fn opaque_list() -> Schema {
    Schema::list(Schema::map(Schema::Opaque))
}

fn region() -> Schema {
    Schema::record([
        Field::new(BLOCK_STATE_PALETTE, Schema::list(palette_entry())),
        Field::new(BLOCK_STATES, Schema::LongArray),
        Field::new(POSITION, vec3()),
        Field::new(SIZE, vec3()),
        Field::new(ENTITIES, opaque_list()),
        Field::new(TILE_ENTITIES, opaque_list()),
        Field::new(PENDING_BLOCK_TICKS, opaque_list()),
    ])
}

fn metadata() -> Schema {
    Schema::record([
        Field::new(NAME, Schema::String),
        Field::new(AUTHOR, Schema::String),
        Field::new(DESCRIPTION, Schema::String),
        Field::new(ENCLOSING_SIZE, vec3()),
        Field::new(TIME_CREATED, Schema::Long),
        Field::new(TIME_MODIFIED, Schema::Long),
        Field::new(TOTAL_BLOCKS, Schema::Int),
        Field::new(TOTAL_VOLUME, Schema::Int),
        Field::new(REGION_COUNT, Schema::Int),
    ])
}

lazy_static! {
    /// Schema every document is parsed and serialized against.
    pub static ref SCHEMATIC_SCHEMA: Schema = Schema::record([
        Field::new(VERSION, Schema::Int),
        Field::new(MINECRAFT_DATA_VERSION, Schema::Int),
        Field::new(METADATA, metadata()),
        Field::new(REGIONS, Schema::map(region())),
    ]);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TagType;

    #[test]
    fn test_schema_shape() {
        let schema = &*SCHEMATIC_SCHEMA;
        assert_eq!(schema.tag_type(), Some(TagType::Compound));

        let Schema::Map(region) = &schema.field(REGIONS).unwrap().schema else {
            panic!("Regions should be a map");
        };
        let Schema::List(entry) = &region.field(BLOCK_STATE_PALETTE).unwrap().schema else {
            panic!("BlockStatePalette should be a list");
        };
        assert!(!entry.field(PROPERTIES).unwrap().required);
        assert!(entry.field(NAME).unwrap().required);
        assert_eq!(region.field(BLOCK_STATES).unwrap().schema, Schema::LongArray);
    }
}
