//! Tag types of the NBT wire format.

/// One-byte tag identifying the payload that follows it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum TagType {
    End = 0,
    Byte = 1,
    Short = 2,
    Int = 3,
    Long = 4,
    Float = 5,
    Double = 6,
    ByteArray = 7,
    String = 8,
    List = 9,
    Compound = 10,
    IntArray = 11,
    LongArray = 12,
}

impl TagType {
    /// Creates a TagType from its wire representation.
    pub fn from_u8(v: u8) -> Option<TagType> {
        match v {
            0 => Some(TagType::End),
            1 => Some(TagType::Byte),
            2 => Some(TagType::Short),
            3 => Some(TagType::Int),
            4 => Some(TagType::Long),
            5 => Some(TagType::Float),
            6 => Some(TagType::Double),
            7 => Some(TagType::ByteArray),
            8 => Some(TagType::String),
            9 => Some(TagType::List),
            10 => Some(TagType::Compound),
            11 => Some(TagType::IntArray),
            12 => Some(TagType::LongArray),
            _ => None,
        }
    }

    /// Returns the payload size for fixed-width tags.
    pub fn fixed_size(self) -> Option<usize> {
        match self {
            TagType::End => Some(0),
            TagType::Byte => Some(1),
            TagType::Short => Some(2),
            TagType::Int | TagType::Float => Some(4),
            TagType::Long | TagType::Double => Some(8),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_roundtrip() {
        for v in 0u8..=12 {
            let tag = TagType::from_u8(v).unwrap();
            assert_eq!(tag as u8, v);
        }
        assert_eq!(TagType::from_u8(13), None);
    }
}
