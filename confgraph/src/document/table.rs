//! The problem table, classified once into components, groups and attributes.
//!
//! A table carrying the [`KEY_COMPONENT_ID`] key is a component reference;
//! every other table is a group whose entries are nested tables or
//! attribute leaves. The classification happens here, while the document
//! is loaded, so the graph builder only has to match on [`Table`].

use std::fmt;

use crate::document::value::{join_key, ParameterMap, Value};
use crate::document::KEY_COMPONENT_ID;

/// A table under the problem root.
#[derive(Debug, Clone, PartialEq)]
pub enum Table {
    /// A table selecting a registry component by id.
    Component(ComponentRef),
    /// Any other table.
    Group(GroupTable),
}

/// A reference to a registry component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentRef {
    /// The registry identifier.
    pub id: String,
    /// Sibling keys of `id`, which are not interpreted.
    pub ignored: Vec<String>,
}

/// A group table: nested tables and attribute leaves, in document order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GroupTable {
    /// The entries, in document order.
    pub entries: Vec<(String, Entry)>,
}

/// One entry of a group table.
#[derive(Debug, Clone, PartialEq)]
pub enum Entry {
    /// A nested table.
    Table(Table),
    /// An attribute leaf.
    Attribute(Literal),
}

/// The raw value of an attribute leaf, before evaluation.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    /// A YAML null.
    Null,
    /// A boolean.
    Bool(bool),
    /// An integer.
    Int(i64),
    /// A float.
    Float(f64),
    /// A string, evaluated as an expression.
    Str(String),
    /// An array; elements are converted one by one.
    Array(Vec<Value>),
}

impl Table {
    /// Classifies `map`, found at the dotted `path`.
    ///
    /// # Errors
    ///
    /// Returns a message naming the offending key if an `id` value is not a
    /// string.
    pub fn from_map(map: ParameterMap, path: &str) -> Result<Self, String> {
        if let Some(id) = map.get(KEY_COMPONENT_ID) {
            let id = id.as_str().ok_or_else(|| {
                format!(
                    "'{}' must be a string, found {}",
                    join_key(path, KEY_COMPONENT_ID),
                    id.kind()
                )
            })?;
            let ignored = map
                .keys()
                .filter(|key| *key != KEY_COMPONENT_ID)
                .cloned()
                .collect();
            return Ok(Self::Component(ComponentRef {
                id: id.to_string(),
                ignored,
            }));
        }

        let mut entries = Vec::with_capacity(map.len());
        for (key, value) in map {
            let entry = match value {
                Value::Table(nested) => {
                    Entry::Table(Self::from_map(nested, &join_key(path, &key))?)
                }
                Value::Null => Entry::Attribute(Literal::Null),
                Value::Bool(b) => Entry::Attribute(Literal::Bool(b)),
                Value::Int(i) => Entry::Attribute(Literal::Int(i)),
                Value::Float(x) => Entry::Attribute(Literal::Float(x)),
                Value::Str(s) => Entry::Attribute(Literal::Str(s)),
                Value::Array(items) => Entry::Attribute(Literal::Array(items)),
            };
            entries.push((key, entry));
        }
        Ok(Self::Group(GroupTable { entries }))
    }

    /// True for a group with no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Component(_) => false,
            Self::Group(group) => group.entries.is_empty(),
        }
    }

    /// The component reference, if this is a component table.
    #[must_use]
    pub const fn as_component(&self) -> Option<&ComponentRef> {
        match self {
            Self::Component(component) => Some(component),
            Self::Group(_) => None,
        }
    }

    /// The group, if this is a group table.
    #[must_use]
    pub const fn as_group(&self) -> Option<&GroupTable> {
        match self {
            Self::Group(group) => Some(group),
            Self::Component(_) => None,
        }
    }
}

impl GroupTable {
    /// Looks up an entry by key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Entry> {
        self.entries
            .iter()
            .find_map(|(k, entry)| (k == key).then_some(entry))
    }
}

/// Renders the leaf the way it was written: strings without quotes.
impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "null"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(x) => write!(f, "{x:?}"),
            Self::Str(s) => write!(f, "{s}"),
            Self::Array(items) => write!(f, "{}", Value::Array(items.clone())),
        }
    }
}
