//! Format-independent values read from TOML or YAML documents.

use std::fmt;

use indexmap::IndexMap;
use serde::Serialize;

/// An ordered mapping of named parameters, forwarded as-is to the engine.
pub type ParameterMap = IndexMap<String, Value>;

/// A value read from a configuration document.
///
/// TOML and YAML documents are both converted into this type so the rest
/// of the crate never needs to know which format a document was written in.
/// Table entries keep their document order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    /// YAML `null` / `~`. TOML has no equivalent.
    Null,
    /// A boolean.
    Bool(bool),
    /// An integer that fits in 64 bits.
    Int(i64),
    /// A float.
    Float(f64),
    /// A string. TOML datetimes also end up here.
    Str(String),
    /// An array.
    Array(Vec<Value>),
    /// A nested table.
    Table(ParameterMap),
}

impl Value {
    /// Short name of the value's kind, for error messages.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "boolean",
            Self::Int(_) => "integer",
            Self::Float(_) => "float",
            Self::Str(_) => "string",
            Self::Array(_) => "array",
            Self::Table(_) => "table",
        }
    }

    /// The string content, if this is a string.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    pub(crate) fn from_toml(value: toml::Value) -> Self {
        match value {
            toml::Value::String(s) => Self::Str(s),
            toml::Value::Integer(i) => Self::Int(i),
            toml::Value::Float(x) => Self::Float(x),
            toml::Value::Boolean(b) => Self::Bool(b),
            toml::Value::Datetime(dt) => Self::Str(dt.to_string()),
            toml::Value::Array(items) => {
                Self::Array(items.into_iter().map(Self::from_toml).collect())
            }
            toml::Value::Table(table) => Self::Table(
                table
                    .into_iter()
                    .map(|(key, value)| (key, Self::from_toml(value)))
                    .collect(),
            ),
        }
    }

    /// Converts a YAML value. `path` locates the value for error messages.
    pub(crate) fn from_yaml(value: serde_yaml::Value, path: &str) -> Result<Self, String> {
        Ok(match value {
            serde_yaml::Value::Null => Self::Null,
            serde_yaml::Value::Bool(b) => Self::Bool(b),
            serde_yaml::Value::Number(n) => match (n.as_i64(), n.as_f64()) {
                (Some(i), _) => Self::Int(i),
                (None, Some(x)) => Self::Float(x),
                (None, None) => return Err(format!("unrepresentable number at '{path}'")),
            },
            serde_yaml::Value::String(s) => Self::Str(s),
            serde_yaml::Value::Sequence(items) => Self::Array(
                items
                    .into_iter()
                    .enumerate()
                    .map(|(i, item)| Self::from_yaml(item, &format!("{path}[{i}]")))
                    .collect::<Result<_, _>>()?,
            ),
            serde_yaml::Value::Mapping(mapping) => {
                let mut table = ParameterMap::with_capacity(mapping.len());
                for (key, value) in mapping {
                    let key = yaml_key(key, path)?;
                    let child_path = join_key(path, &key);
                    // `1` and `"1"` are distinct YAML keys but the same table key.
                    if table.contains_key(&key) {
                        return Err(format!("duplicate key '{child_path}'"));
                    }
                    table.insert(key, Self::from_yaml(value, &child_path)?);
                }
                Self::Table(table)
            }
            serde_yaml::Value::Tagged(tagged) => Self::from_yaml(tagged.value, path)?,
        })
    }
}

fn yaml_key(key: serde_yaml::Value, path: &str) -> Result<String, String> {
    match key {
        serde_yaml::Value::String(s) => Ok(s),
        serde_yaml::Value::Number(n) => Ok(n.to_string()),
        serde_yaml::Value::Bool(b) => Ok(b.to_string()),
        _ => Err(format!("table keys must be strings (under '{path}')")),
    }
}

/// Joins a dotted path and a key; an empty path yields the bare key.
pub(crate) fn join_key(path: &str, key: &str) -> String {
    if path.is_empty() {
        key.to_string()
    } else {
        format!("{path}.{key}")
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "null"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(x) => write!(f, "{x:?}"),
            Self::Str(s) => write!(f, "{s:?}"),
            Self::Array(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
            Self::Table(table) => {
                write!(f, "{{")?;
                for (i, (key, value)) in table.iter().enumerate() {
                    if i > 0 {
                        write!(f, ",")?;
                    }
                    write!(f, " {key} = {value}")?;
                }
                write!(f, " }}")
            }
        }
    }
}
