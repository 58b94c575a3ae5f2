//! Variable files.
//!
//! Problem inputs and outputs are exchanged as YAML mappings from a
//! variable name to its value, units and description:
//!
//! ```yaml
//! geometry:wing:area:
//!   value: [124.8]
//!   units: m**2
//! data:mission:range:
//!   value: 5000.0
//!   units: NM
//!   description: design range
//! ```
//!
//! A scalar `value` is read as a one-element list.

use std::fs;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{Error, Result};

/// One variable: its value, units and description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Variable {
    /// The value, always as a list.
    #[serde(deserialize_with = "scalar_or_list")]
    pub value: Vec<f64>,

    /// Physical units, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub units: Option<String>,

    /// Free-form description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Variable {
    /// A unitless variable with the given value.
    #[must_use]
    pub fn new(value: Vec<f64>) -> Self {
        Self {
            value,
            units: None,
            description: None,
        }
    }

    /// Sets the units.
    #[must_use]
    pub fn with_units(mut self, units: impl Into<String>) -> Self {
        self.units = Some(units.into());
        self
    }
}

/// Accepts either `1.5` or `[1.5, 2.0]`.
pub(crate) fn scalar_or_list<'de, D>(deserializer: D) -> std::result::Result<Vec<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Helper {
        Scalar(f64),
        List(Vec<f64>),
    }

    match Helper::deserialize(deserializer)? {
        Helper::Scalar(x) => Ok(vec![x]),
        Helper::List(values) => Ok(values),
    }
}

/// An ordered set of named variables.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VariableSet {
    variables: IndexMap<String, Variable>,
}

impl VariableSet {
    /// An empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a variable. Returns the previous one.
    pub fn insert(&mut self, name: impl Into<String>, variable: Variable) -> Option<Variable> {
        self.variables.insert(name.into(), variable)
    }

    /// Looks up a variable.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Variable> {
        self.variables.get(name)
    }

    /// Whether `name` is in the set.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.variables.contains_key(name)
    }

    /// Number of variables.
    #[must_use]
    pub fn len(&self) -> usize {
        self.variables.len()
    }

    /// Whether the set is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }

    /// Iterates in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Variable)> {
        self.variables.iter().map(|(name, var)| (name.as_str(), var))
    }

    /// Variable names in insertion order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.variables.keys().map(String::as_str)
    }

    /// Variables in file order: fewer `:`-separated segments first, then by
    /// name.
    #[must_use]
    pub fn sorted_for_output(&self) -> Vec<(&str, &Variable)> {
        let mut sorted: Vec<_> = self.iter().collect();
        sorted.sort_by(|(a, _), (b, _)| {
            a.matches(':')
                .count()
                .cmp(&b.matches(':').count())
                .then_with(|| a.cmp(b))
        });
        sorted
    }
}

impl FromIterator<(String, Variable)> for VariableSet {
    fn from_iter<I: IntoIterator<Item = (String, Variable)>>(iter: I) -> Self {
        Self {
            variables: iter.into_iter().collect(),
        }
    }
}

/// Reads and writes variable files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariableIo {
    path: PathBuf,
}

impl VariableIo {
    /// A reader/writer for the file at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the file. An empty file is an empty set.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DataFile`] if the file cannot be read or parsed.
    pub fn read(&self) -> Result<VariableSet> {
        let text = fs::read_to_string(&self.path).map_err(|e| self.error(e))?;
        if text.trim().is_empty() {
            return Ok(VariableSet::new());
        }
        serde_yaml::from_str(&text).map_err(|e| self.error(e))
    }

    /// Writes `variables`, in the order of
    /// [`VariableSet::sorted_for_output`]. Missing parent directories are
    /// created.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DataFile`] if the file cannot be written.
    pub fn write(&self, variables: &VariableSet) -> Result<()> {
        let sorted: IndexMap<&str, &Variable> = variables.sorted_for_output().into_iter().collect();
        let text = serde_yaml::to_string(&sorted).map_err(|e| self.error(e))?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| self.error(e))?;
        }
        fs::write(&self.path, text).map_err(|e| self.error(e))?;
        log::info!("Wrote {} variables to {}", variables.len(), self.path.display());
        Ok(())
    }

    fn error(&self, err: impl std::fmt::Display) -> Error {
        Error::DataFile {
            path: self.path.clone(),
            message: err.to_string(),
        }
    }
}
