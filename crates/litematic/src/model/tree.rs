//! Schema and value types for the tagged tree.
//!
//! A [`Schema`] declares the shape a document must have; parsing against it
//! yields a [`TreeValue`] mirroring the same node kinds.

use crate::model::{LongArray, TagType};

/// Declarative description of an expected tree shape.
#[derive(Debug, Clone, PartialEq)]
pub enum Schema {
    /// 32-bit signed integer.
    Int,
    /// 64-bit signed integer.
    Long,
    /// Length-prefixed string.
    String,
    /// Array of big-endian 64-bit words.
    LongArray,
    /// Compound with a fixed, ordered set of named children.
    Record(Vec<Field>),
    /// Compound with arbitrary keys sharing one child schema.
    Map(Box<Schema>),
    /// Homogeneous list.
    List(Box<Schema>),
    /// Any well-formed subtree, kept unparsed.
    Opaque,
}

/// A named child of a [`Schema::Record`].
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub name: &'static str,
    pub schema: Schema,
    /// Absent optional fields parse as missing instead of failing.
    pub required: bool,
}

impl Field {
    /// A field that must be present.
    pub fn new(name: &'static str, schema: Schema) -> Self {
        Self { name, schema, required: true }
    }

    /// A field that may be absent.
    pub fn optional(name: &'static str, schema: Schema) -> Self {
        Self { name, schema, required: false }
    }
}

impl Schema {
    /// Builds a record schema from its fields.
    pub fn record(fields: impl IntoIterator<Item = Field>) -> Self {
        Schema::Record(fields.into_iter().collect())
    }

    /// Builds a wildcard map schema.
    pub fn map(value: Schema) -> Self {
        Schema::Map(Box::new(value))
    }

    /// Builds a list schema.
    pub fn list(element: Schema) -> Self {
        Schema::List(Box::new(element))
    }

    /// Returns the tag this node is encoded with, or None for opaque nodes.
    pub fn tag_type(&self) -> Option<TagType> {
        match self {
            Schema::Int => Some(TagType::Int),
            Schema::Long => Some(TagType::Long),
            Schema::String => Some(TagType::String),
            Schema::LongArray => Some(TagType::LongArray),
            Schema::Record(_) | Schema::Map(_) => Some(TagType::Compound),
            Schema::List(_) => Some(TagType::List),
            Schema::Opaque => None,
        }
    }

    /// Looks up a record field by name.
    pub fn field(&self, name: &str) -> Option<&Field> {
        match self {
            Schema::Record(fields) => fields.iter().find(|f| f.name == name),
            _ => None,
        }
    }

    pub(crate) fn kind_name(&self) -> &'static str {
        match self {
            Schema::Int => "int",
            Schema::Long => "long",
            Schema::String => "string",
            Schema::LongArray => "long array",
            Schema::Record(_) => "record",
            Schema::Map(_) => "map",
            Schema::List(_) => "list",
            Schema::Opaque => "opaque",
        }
    }
}

/// Unparsed subtree: its tag and raw payload bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpaqueTag {
    pub tag: TagType,
    pub payload: Vec<u8>,
}

impl OpaqueTag {
    /// An empty compound (just the End tag).
    pub fn empty_compound() -> Self {
        Self {
            tag: TagType::Compound,
            payload: vec![TagType::End as u8],
        }
    }
}

/// Insertion-ordered named children of a compound.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Compound {
    entries: Vec<(String, TreeValue)>,
}

impl Compound {
    /// Creates an empty compound.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty compound with room for `capacity` children.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
        }
    }

    /// Inserts a child, replacing any existing child of the same name in place.
    pub fn insert(&mut self, name: impl Into<String>, value: TreeValue) {
        let name = name.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((name, value)),
        }
    }

    /// Chaining form of [`insert`](Self::insert).
    pub fn with(mut self, name: impl Into<String>, value: TreeValue) -> Self {
        self.insert(name, value);
        self
    }

    /// Gets a child by name.
    pub fn get(&self, name: &str) -> Option<&TreeValue> {
        self.entries.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    /// Returns the number of children.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if there are no children.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over children in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &TreeValue)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v))
    }

    /// Iterates over child names in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(n, _)| n.as_str())
    }

    /// Returns the first child in insertion order.
    pub fn first(&self) -> Option<(&str, &TreeValue)> {
        self.entries.first().map(|(n, v)| (n.as_str(), v))
    }
}

impl<K: Into<String>> FromIterator<(K, TreeValue)> for Compound {
    fn from_iter<I: IntoIterator<Item = (K, TreeValue)>>(iter: I) -> Self {
        let mut compound = Compound::new();
        for (name, value) in iter {
            compound.insert(name, value);
        }
        compound
    }
}

/// Parsed counterpart of a [`Schema`].
#[derive(Debug, Clone, PartialEq)]
pub enum TreeValue {
    Int(i32),
    Long(i64),
    String(String),
    LongArray(LongArray),
    Record(Compound),
    Map(Compound),
    List(Vec<TreeValue>),
    Opaque(OpaqueTag),
}

impl TreeValue {
    pub fn as_int(&self) -> Option<i32> {
        match self {
            TreeValue::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_long(&self) -> Option<i64> {
        match self {
            TreeValue::Long(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            TreeValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_long_array(&self) -> Option<&LongArray> {
        match self {
            TreeValue::LongArray(a) => Some(a),
            _ => None,
        }
    }

    /// Returns the children of a record or map.
    pub fn as_compound(&self) -> Option<&Compound> {
        match self {
            TreeValue::Record(c) | TreeValue::Map(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[TreeValue]> {
        match self {
            TreeValue::List(items) => Some(items),
            _ => None,
        }
    }

    /// Shorthand for `as_compound()?.get(name)`.
    pub fn get(&self, name: &str) -> Option<&TreeValue> {
        self.as_compound()?.get(name)
    }

    pub(crate) fn kind_name(&self) -> &'static str {
        match self {
            TreeValue::Int(_) => "int",
            TreeValue::Long(_) => "long",
            TreeValue::String(_) => "string",
            TreeValue::LongArray(_) => "long array",
            TreeValue::Record(_) => "record",
            TreeValue::Map(_) => "map",
            TreeValue::List(_) => "list",
            TreeValue::Opaque(_) => "opaque",
        }
    }
}

impl From<i32> for TreeValue {
    fn from(v: i32) -> Self {
        TreeValue::Int(v)
    }
}

impl From<i64> for TreeValue {
    fn from(v: i64) -> Self {
        TreeValue::Long(v)
    }
}

impl From<&str> for TreeValue {
    fn from(v: &str) -> Self {
        TreeValue::String(v.to_string())
    }
}

impl From<String> for TreeValue {
    fn from(v: String) -> Self {
        TreeValue::String(v)
    }
}

impl From<LongArray> for TreeValue {
    fn from(v: LongArray) -> Self {
        TreeValue::LongArray(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compound_preserves_insertion_order() {
        let mut c = Compound::new();
        c.insert("b", TreeValue::Int(1));
        c.insert("a", TreeValue::Int(2));
        c.insert("b", TreeValue::Int(3));

        assert_eq!(c.keys().collect::<Vec<_>>(), ["b", "a"]);
        assert_eq!(c.get("b"), Some(&TreeValue::Int(3)));
        assert_eq!(c.first().map(|(k, _)| k), Some("b"));
    }

    #[test]
    fn test_schema_field_lookup() {
        let schema = Schema::record([
            Field::new("x", Schema::Int),
            Field::optional("tags", Schema::map(Schema::String)),
        ]);
        assert!(schema.field("x").unwrap().required);
        assert!(!schema.field("tags").unwrap().required);
        assert!(schema.field("y").is_none());
        assert_eq!(schema.tag_type(), Some(TagType::Compound));
        assert_eq!(Schema::Opaque.tag_type(), None);
    }

    #[test]
    fn test_value_accessors() {
        let v = TreeValue::Record(Compound::new().with("Name", "stone".into()));
        assert_eq!(v.get("Name").and_then(TreeValue::as_str), Some("stone"));
        assert_eq!(v.as_int(), None);
        assert!(v.get("Missing").is_none());
    }
}
