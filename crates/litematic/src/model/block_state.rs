//! Canonical block-state strings.
//!
//! A block state is a namespaced name plus key/value properties, written as
//! `minecraft:observer[facing=east,powered=false]` with keys sorted.
//! Property values are not escaped: `,` `=` `[` `]` inside a key or value
//! cannot be represented.

use std::fmt;
use std::str::FromStr;

use crate::error::BlockStateError;

/// A block name with its properties in appearance order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct BlockState {
    pub name: String,
    pub properties: Vec<(String, String)>,
}

impl BlockState {
    /// Creates a block state with no properties.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            properties: Vec::new(),
        }
    }

    /// Adds a property.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.push((key.into(), value.into()));
        self
    }

    /// Gets a property value by key.
    pub fn property(&self, key: &str) -> Option<&str> {
        self.properties
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Returns the canonical string.
    pub fn to_canonical(&self) -> String {
        encode(&self.name, self.properties.iter().map(|(k, v)| (k.as_str(), v.as_str())))
    }
}

/// Encodes a name and properties as a canonical string, keys sorted ascending.
pub fn encode<'a>(name: &str, properties: impl IntoIterator<Item = (&'a str, &'a str)>) -> String {
    let mut props: Vec<(&str, &str)> = properties.into_iter().collect();
    if props.is_empty() {
        return name.to_string();
    }
    props.sort_by(|a, b| a.0.cmp(b.0));

    let mut out = String::with_capacity(name.len() + 2 + props.iter().map(|(k, v)| k.len() + v.len() + 2).sum::<usize>());
    out.push_str(name);
    out.push('[');
    for (i, (key, value)) in props.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        out.push_str(key);
        out.push('=');
        out.push_str(value);
    }
    out.push(']');
    out
}

/// Decodes a canonical string, keeping properties in appearance order.
pub fn decode(input: &str) -> Result<BlockState, BlockStateError> {
    let (name, props) = match input.split_once('[') {
        Some((name, rest)) => {
            let props = rest
                .strip_suffix(']')
                .ok_or_else(|| BlockStateError::UnclosedProperties { input: input.to_string() })?;
            (name, Some(props))
        }
        None => (input, None),
    };

    if name.is_empty() {
        return Err(BlockStateError::EmptyName { input: input.to_string() });
    }

    let mut properties = Vec::new();
    if let Some(props) = props.filter(|p| !p.is_empty()) {
        for segment in props.split(',') {
            let (key, value) = segment.split_once('=').ok_or_else(|| BlockStateError::MissingEquals {
                input: input.to_string(),
                segment: segment.to_string(),
            })?;
            properties.push((key.to_string(), value.to_string()));
        }
    }

    Ok(BlockState {
        name: name.to_string(),
        properties,
    })
}

impl fmt::Display for BlockState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_canonical())
    }
}

impl FromStr for BlockState {
    type Err = BlockStateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        decode(s)
    }
}
