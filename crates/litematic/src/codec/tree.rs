//! Schema-directed parsing and serialization of NBT trees.
//!
//! One recursive function pair interprets a [`Schema`]: parsing checks every
//! tag against the schema node at that path, serializing emits record
//! children in declaration order and map children in insertion order.

use std::fmt;

use crate::codec::primitives::{decode_modified_utf8, encode_modified_utf8, Reader, Writer};
use crate::error::{DecodeError, EncodeError};
use crate::limits::{MAX_DEPTH, MAX_STRING_LEN};
use crate::model::{Compound, Field, LongArray, OpaqueTag, Schema, TagType, TreeValue};

/// Location inside a tree, rendered like `Regions.main.BlockStatePalette[3].Name`.
#[derive(Debug, Clone, Default)]
struct NodePath {
    segments: Vec<Segment>,
}

#[derive(Debug, Clone)]
enum Segment {
    Field(String),
    Index(usize),
}

impl NodePath {
    fn push_field(&mut self, name: &str) {
        self.segments.push(Segment::Field(name.to_string()));
    }

    fn push_index(&mut self, index: usize) {
        self.segments.push(Segment::Index(index));
    }

    fn pop(&mut self) {
        self.segments.pop();
    }

    fn child(&self, name: &str) -> String {
        let mut path = self.clone();
        path.push_field(name);
        path.to_string()
    }
}

impl fmt::Display for NodePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            return f.write_str("<root>");
        }
        for (i, segment) in self.segments.iter().enumerate() {
            match segment {
                Segment::Field(name) if i == 0 => write!(f, "{name}")?,
                Segment::Field(name) => write!(f, ".{name}")?,
                Segment::Index(index) => write!(f, "[{index}]")?,
            }
        }
        Ok(())
    }
}

/// Smallest payload a tag can have, used to reject impossible lengths early.
fn min_payload(tag: TagType) -> usize {
    match tag {
        TagType::String => 2,
        TagType::Compound => 1,
        TagType::ByteArray | TagType::IntArray | TagType::LongArray | TagType::List => 4,
        _ => tag.fixed_size().unwrap_or(1),
    }
}

// =============================================================================
// PARSING
// =============================================================================

/// Parses a document (one named root tag) against `schema`.
pub fn parse(data: &[u8], schema: &Schema) -> Result<TreeValue, DecodeError> {
    let mut parser = Parser {
        reader: Reader::new(data),
        path: NodePath::default(),
    };

    let tag = parser.read_tag()?;
    let root_name = parser.read_string("root name")?;
    let value = parser.parse_value(tag, schema, 0)?;

    if !parser.reader.is_empty() {
        log::debug!(
            "ignoring {} trailing bytes after root tag {:?}",
            parser.reader.remaining_len(),
            root_name
        );
    }
    Ok(value)
}

struct Parser<'a> {
    reader: Reader<'a>,
    path: NodePath,
}

impl<'a> Parser<'a> {
    /// Attaches the current path to end-of-input errors from the reader.
    fn at_path(&self, err: DecodeError) -> DecodeError {
        match err {
            DecodeError::UnexpectedEof { context } => DecodeError::Truncated {
                path: self.path.to_string(),
                context,
            },
            other => other,
        }
    }

    fn read_tag(&mut self) -> Result<TagType, DecodeError> {
        let byte = self.reader.read_byte("tag type").map_err(|e| self.at_path(e))?;
        TagType::from_u8(byte).ok_or_else(|| DecodeError::InvalidTagType {
            path: self.path.to_string(),
            tag: byte,
        })
    }

    fn read_string(&mut self, context: &'static str) -> Result<String, DecodeError> {
        let bytes = self.reader.read_string_bytes(context).map_err(|e| self.at_path(e))?;
        decode_modified_utf8(bytes).ok_or_else(|| DecodeError::InvalidUtf8 {
            path: self.path.to_string(),
        })
    }

    /// Reads an i32 length and checks `len * elem_size` fits in the remaining input.
    fn read_len(&mut self, elem_size: usize, context: &'static str) -> Result<usize, DecodeError> {
        let len = self.reader.read_i32(context).map_err(|e| self.at_path(e))?;
        if len < 0 {
            return Err(DecodeError::NegativeLength {
                path: self.path.to_string(),
                len,
            });
        }
        let len = len as usize;
        if len.saturating_mul(elem_size) > self.reader.remaining_len() {
            return Err(DecodeError::Truncated {
                path: self.path.to_string(),
                context,
            });
        }
        Ok(len)
    }

    fn check_depth(&self, depth: usize) -> Result<(), DecodeError> {
        if depth >= MAX_DEPTH {
            return Err(DecodeError::DepthLimitExceeded {
                path: self.path.to_string(),
                max: MAX_DEPTH,
            });
        }
        Ok(())
    }

    fn expect_tag(&self, found: TagType, expected: TagType) -> Result<(), DecodeError> {
        if found != expected {
            return Err(DecodeError::TagMismatch {
                path: self.path.to_string(),
                expected,
                found,
            });
        }
        Ok(())
    }

    fn parse_value(&mut self, tag: TagType, schema: &Schema, depth: usize) -> Result<TreeValue, DecodeError> {
        let Some(expected) = schema.tag_type() else {
            return self.parse_opaque(tag, depth);
        };
        self.expect_tag(tag, expected)?;

        match schema {
            Schema::Int => self.reader.read_i32("int").map(TreeValue::Int).map_err(|e| self.at_path(e)),
            Schema::Long => self.reader.read_i64("long").map(TreeValue::Long).map_err(|e| self.at_path(e)),
            Schema::String => self.read_string("string").map(TreeValue::String),
            Schema::LongArray => {
                let len = self.read_len(8, "long array")?;
                let bytes = self.reader.read_bytes(len * 8, "long array").map_err(|e| self.at_path(e))?;
                Ok(TreeValue::LongArray(LongArray::from_exact(bytes.to_vec())))
            }
            Schema::Record(fields) => self.parse_record(fields, depth).map(TreeValue::Record),
            Schema::Map(value_schema) => self.parse_map(value_schema, depth).map(TreeValue::Map),
            Schema::List(element) => self.parse_list(element, depth),
            Schema::Opaque => self.parse_opaque(tag, depth),
        }
    }

    fn parse_record(&mut self, fields: &[Field], depth: usize) -> Result<Compound, DecodeError> {
        self.check_depth(depth)?;
        let mut compound = Compound::with_capacity(fields.len());
        loop {
            let tag = self.read_tag()?;
            if tag == TagType::End {
                break;
            }
            let name = self.read_string("field name")?;
            self.path.push_field(&name);
            match fields.iter().find(|f| f.name == name) {
                Some(field) => {
                    let value = self.parse_value(tag, &field.schema, depth + 1)?;
                    compound.insert(name, value);
                }
                None => {
                    log::debug!("skipping unknown field {} ({:?})", self.path, tag);
                    self.skip_payload(tag, depth + 1)?;
                }
            }
            self.path.pop();
        }

        for field in fields.iter().filter(|f| f.required) {
            if compound.get(field.name).is_none() {
                return Err(DecodeError::MissingField {
                    path: self.path.child(field.name),
                });
            }
        }
        Ok(compound)
    }

    fn parse_map(&mut self, value_schema: &Schema, depth: usize) -> Result<Compound, DecodeError> {
        self.check_depth(depth)?;
        let mut compound = Compound::new();
        loop {
            let tag = self.read_tag()?;
            if tag == TagType::End {
                break;
            }
            let name = self.read_string("map key")?;
            self.path.push_field(&name);
            let value = self.parse_value(tag, value_schema, depth + 1)?;
            self.path.pop();
            compound.insert(name, value);
        }
        Ok(compound)
    }

    fn parse_list(&mut self, element: &Schema, depth: usize) -> Result<TreeValue, DecodeError> {
        self.check_depth(depth)?;
        let elem_tag = self.read_tag()?;
        let len = self.read_len(min_payload(elem_tag), "list length")?;
        if len == 0 {
            return Ok(TreeValue::List(Vec::new()));
        }
        if elem_tag == TagType::End {
            return Err(DecodeError::InvalidTagType {
                path: self.path.to_string(),
                tag: TagType::End as u8,
            });
        }
        if let Some(expected) = element.tag_type() {
            self.expect_tag(elem_tag, expected)?;
        }

        let mut items = Vec::with_capacity(len);
        for i in 0..len {
            self.path.push_index(i);
            items.push(self.parse_value(elem_tag, element, depth + 1)?);
            self.path.pop();
        }
        Ok(TreeValue::List(items))
    }

    fn parse_opaque(&mut self, tag: TagType, depth: usize) -> Result<TreeValue, DecodeError> {
        let start = self.reader.position();
        self.skip_payload(tag, depth)?;
        Ok(TreeValue::Opaque(OpaqueTag {
            tag,
            payload: self.reader.consumed_since(start).to_vec(),
        }))
    }

    /// Walks over a payload without building values, checking it is well formed.
    fn skip_payload(&mut self, tag: TagType, depth: usize) -> Result<(), DecodeError> {
        match tag {
            TagType::ByteArray | TagType::IntArray | TagType::LongArray => {
                let width = match tag {
                    TagType::ByteArray => 1,
                    TagType::IntArray => 4,
                    _ => 8,
                };
                let len = self.read_len(width, "array")?;
                self.reader.skip(len * width, "array").map_err(|e| self.at_path(e))
            }
            TagType::String => {
                self.reader.read_string_bytes("string").map_err(|e| self.at_path(e))?;
                Ok(())
            }
            TagType::List => {
                self.check_depth(depth)?;
                let elem_tag = self.read_tag()?;
                let len = self.read_len(min_payload(elem_tag), "list length")?;
                if len > 0 && elem_tag == TagType::End {
                    return Err(DecodeError::InvalidTagType {
                        path: self.path.to_string(),
                        tag: TagType::End as u8,
                    });
                }
                for _ in 0..len {
                    self.skip_payload(elem_tag, depth + 1)?;
                }
                Ok(())
            }
            TagType::Compound => {
                self.check_depth(depth)?;
                loop {
                    let child = self.read_tag()?;
                    if child == TagType::End {
                        return Ok(());
                    }
                    self.reader.read_string_bytes("field name").map_err(|e| self.at_path(e))?;
                    self.skip_payload(child, depth + 1)?;
                }
            }
            fixed => {
                let size = fixed.fixed_size().unwrap_or(0);
                self.reader.skip(size, "scalar").map_err(|e| self.at_path(e))
            }
        }
    }
}

// =============================================================================
// SERIALIZATION
// =============================================================================

/// Serializes `value` as a document with an unnamed root tag.
pub fn serialize(value: &TreeValue, schema: &Schema) -> Result<Vec<u8>, EncodeError> {
    let mut serializer = Serializer {
        writer: Writer::with_capacity(4096),
        path: NodePath::default(),
    };
    let tag = serializer.tag_for(value, schema)?;
    serializer.writer.write_byte(tag as u8);
    serializer.write_string("")?;
    serializer.write_payload(value, schema)?;
    Ok(serializer.writer.into_bytes())
}

struct Serializer {
    writer: Writer,
    path: NodePath,
}

impl Serializer {
    fn mismatch(&self, value: &TreeValue, schema: &Schema) -> EncodeError {
        EncodeError::TagMismatch {
            path: self.path.to_string(),
            expected: schema.kind_name(),
            found: value.kind_name(),
        }
    }

    /// Tag a value is written with: the schema's, or the kept tag for opaque values.
    fn tag_for(&self, value: &TreeValue, schema: &Schema) -> Result<TagType, EncodeError> {
        match (schema.tag_type(), value) {
            (Some(tag), _) => Ok(tag),
            (None, TreeValue::Opaque(opaque)) => Ok(opaque.tag),
            (None, _) => Err(self.mismatch(value, schema)),
        }
    }

    fn write_string(&mut self, s: &str) -> Result<(), EncodeError> {
        let bytes = encode_modified_utf8(s);
        if bytes.len() > MAX_STRING_LEN {
            return Err(EncodeError::LengthExceedsLimit {
                path: self.path.to_string(),
                len: bytes.len(),
                max: MAX_STRING_LEN,
            });
        }
        self.writer.write_u16(bytes.len() as u16);
        self.writer.write_bytes(&bytes);
        Ok(())
    }

    fn write_len(&mut self, len: usize) -> Result<(), EncodeError> {
        let len = i32::try_from(len).map_err(|_| EncodeError::LengthExceedsLimit {
            path: self.path.to_string(),
            len,
            max: i32::MAX as usize,
        })?;
        self.writer.write_i32(len);
        Ok(())
    }

    fn write_child(&mut self, name: &str, value: &TreeValue, schema: &Schema) -> Result<(), EncodeError> {
        self.path.push_field(name);
        let tag = self.tag_for(value, schema)?;
        self.writer.write_byte(tag as u8);
        self.write_string(name)?;
        self.write_payload(value, schema)?;
        self.path.pop();
        Ok(())
    }

    fn write_payload(&mut self, value: &TreeValue, schema: &Schema) -> Result<(), EncodeError> {
        match (schema, value) {
            (Schema::Int, TreeValue::Int(v)) => self.writer.write_i32(*v),
            (Schema::Long, TreeValue::Long(v)) => self.writer.write_i64(*v),
            (Schema::String, TreeValue::String(s)) => self.write_string(s)?,
            (Schema::LongArray, TreeValue::LongArray(array)) => {
                self.write_len(array.len())?;
                self.writer.write_bytes(array.as_bytes());
            }
            (Schema::Record(fields), TreeValue::Record(compound) | TreeValue::Map(compound)) => {
                for field in fields {
                    match compound.get(field.name) {
                        Some(child) => self.write_child(field.name, child, &field.schema)?,
                        None if field.required => {
                            return Err(EncodeError::MissingField {
                                path: self.path.child(field.name),
                            });
                        }
                        None => {}
                    }
                }
                self.writer.write_byte(TagType::End as u8);
            }
            (Schema::Map(value_schema), TreeValue::Map(compound) | TreeValue::Record(compound)) => {
                for (name, child) in compound.iter() {
                    self.write_child(name, child, value_schema)?;
                }
                self.writer.write_byte(TagType::End as u8);
            }
            (Schema::List(element), TreeValue::List(items)) => {
                let elem_tag = match (element.tag_type(), items.first()) {
                    (Some(tag), _) => tag,
                    (None, Some(first)) => self.tag_for(first, element)?,
                    (None, None) => TagType::End,
                };
                self.writer.write_byte(elem_tag as u8);
                self.write_len(items.len())?;
                for (i, item) in items.iter().enumerate() {
                    self.path.push_index(i);
                    if self.tag_for(item, element)? != elem_tag {
                        return Err(self.mismatch(item, element));
                    }
                    self.write_payload(item, element)?;
                    self.path.pop();
                }
            }
            (Schema::Opaque, TreeValue::Opaque(opaque)) => self.writer.write_bytes(&opaque.payload),
            _ => return Err(self.mismatch(value, schema)),
        }
        Ok(())
    }
}
