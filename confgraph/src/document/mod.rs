//! Configuration document loading.
//!
//! A configuration document is a TOML (default) or YAML file with these
//! top-level keys:
//!
//! | Key              | Meaning                                                 |
//! |------------------|---------------------------------------------------------|
//! | `module_folders` | folders scanned for component manifests                 |
//! | `input_file`     | variable file read by `read_inputs`                     |
//! | `output_file`    | variable file written by `write_outputs`                |
//! | `problem`        | the problem table (required)                            |
//! | `design_var`     | design-variable parameter tables                        |
//! | `objective`      | objective parameter tables                              |
//! | `constraint`     | constraint parameter tables                             |
//!
//! Paths are resolved against the directory holding the document, and the
//! problem table is classified into a [`Table`] while loading.
//!
//! # Examples
//!
//! ```
//! use confgraph::document::{ConfigurationDocument, DocumentFormat, Table};
//!
//! let text = r#"
//! module_folders = ["modules"]
//! input_file = "inputs.yaml"
//!
//! [problem.mygroup]
//! factor = "2*3"
//! comp.id = "my.component"
//! "#;
//!
//! let doc = ConfigurationDocument::from_str(text, DocumentFormat::Toml, "/work").unwrap();
//! assert_eq!(doc.module_folders()[0], std::path::Path::new("/work/modules"));
//! assert!(matches!(doc.problem().unwrap(), Table::Group(_)));
//! ```

mod table;
mod value;

use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;

use crate::error::{Error, Result};
use crate::path::{document_dir, PathResolver};
use crate::variables::{VariableBinding, VariableRole};

pub use table::{ComponentRef, Entry, GroupTable, Literal, Table};
pub use value::{ParameterMap, Value};

/// Key listing the module folders.
pub const KEY_FOLDERS: &str = "module_folders";
/// Key of the input variable file.
pub const KEY_INPUT_FILE: &str = "input_file";
/// Key of the output variable file.
pub const KEY_OUTPUT_FILE: &str = "output_file";
/// Key marking a table as a component reference.
pub const KEY_COMPONENT_ID: &str = "id";
/// Name of the problem table.
pub const TABLE_PROBLEM: &str = "problem";
/// Name of the design-variable tables.
pub const TABLES_DESIGN_VAR: &str = "design_var";
/// Name of the objective tables.
pub const TABLES_OBJECTIVE: &str = "objective";
/// Name of the constraint tables.
pub const TABLES_CONSTRAINT: &str = "constraint";

/// Origin reported for documents parsed from memory.
const MEMORY_ORIGIN: &str = "<memory>";

/// Syntax of a configuration document or component manifest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    /// TOML.
    Toml,
    /// YAML.
    Yaml,
}

impl DocumentFormat {
    /// Picks the format from the file extension: `.yaml` and `.yml` are
    /// YAML, anything else is TOML.
    #[must_use]
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml") => {
                Self::Yaml
            }
            _ => Self::Toml,
        }
    }

    /// Deserializes `text` into `T`.
    ///
    /// # Errors
    ///
    /// Returns the parser's message on failure.
    pub fn deserialize<T: DeserializeOwned>(self, text: &str) -> std::result::Result<T, String> {
        match self {
            Self::Toml => toml::from_str(text).map_err(|e| e.to_string()),
            Self::Yaml => serde_yaml::from_str(text).map_err(|e| e.to_string()),
        }
    }

    fn parse_value(self, text: &str) -> std::result::Result<Value, String> {
        match self {
            Self::Toml => self.deserialize::<toml::Value>(text).map(Value::from_toml),
            Self::Yaml => {
                let parsed = self.deserialize::<serde_yaml::Value>(text)?;
                Value::from_yaml(parsed, "")
            }
        }
    }
}

/// A parsed configuration document with its paths resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigurationDocument {
    origin: String,
    base_dir: PathBuf,
    module_folders: Vec<PathBuf>,
    input_file: Option<PathBuf>,
    output_file: Option<PathBuf>,
    problem: Option<Table>,
    bindings: Vec<VariableBinding>,
}

impl ConfigurationDocument {
    /// Reads the document at `path`. The format follows the extension.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or if a path
    /// in it cannot be resolved.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|e| Error::InvalidPath {
            path: path.to_path_buf(),
            reason: format!("cannot read configuration document: {e}"),
        })?;
        let base_dir = document_dir(path)?;
        let doc = Self::parse(
            &text,
            DocumentFormat::from_path(path),
            base_dir,
            path.display().to_string(),
        )?;
        log::info!("Loaded configuration document {}", doc.origin);
        Ok(doc)
    }

    /// Reads a document from an open handle. Relative paths in it resolve
    /// against `base_dir`.
    ///
    /// # Errors
    ///
    /// Returns an error if reading or parsing fails.
    pub fn from_reader(
        mut reader: impl Read,
        format: DocumentFormat,
        base_dir: impl Into<PathBuf>,
    ) -> Result<Self> {
        let mut text = String::new();
        reader.read_to_string(&mut text)?;
        Self::parse(&text, format, base_dir.into(), MEMORY_ORIGIN.to_string())
    }

    /// Parses a document held in memory. Relative paths in it resolve
    /// against `base_dir`.
    ///
    /// # Errors
    ///
    /// Returns an error if parsing fails.
    pub fn from_str(text: &str, format: DocumentFormat, base_dir: impl Into<PathBuf>) -> Result<Self> {
        Self::parse(text, format, base_dir.into(), MEMORY_ORIGIN.to_string())
    }

    fn parse(text: &str, format: DocumentFormat, base_dir: PathBuf, origin: String) -> Result<Self> {
        let parse_error = |message: String| Error::DocumentParse {
            origin: origin.clone(),
            message,
        };

        let root = match format.parse_value(text).map_err(parse_error)? {
            Value::Table(root) => root,
            // An empty YAML file parses as null.
            Value::Null => ParameterMap::new(),
            other => {
                return Err(parse_error(format!(
                    "document root must be a table, found {}",
                    other.kind()
                )))
            }
        };

        let resolver = PathResolver::new(base_dir);
        let mut doc = Self {
            origin: origin.clone(),
            base_dir: resolver.base_dir().to_path_buf(),
            module_folders: Vec::new(),
            input_file: None,
            output_file: None,
            problem: None,
            bindings: Vec::new(),
        };

        for (key, value) in root {
            match key.as_str() {
                KEY_FOLDERS => {
                    doc.module_folders = string_list(&key, value)
                        .map_err(parse_error)?
                        .iter()
                        .map(|folder| resolver.resolve(Path::new(folder)))
                        .collect::<Result<_>>()?;
                }
                KEY_INPUT_FILE => {
                    let file = string(&key, value).map_err(parse_error)?;
                    doc.input_file = Some(resolver.resolve(Path::new(&file))?);
                }
                KEY_OUTPUT_FILE => {
                    let file = string(&key, value).map_err(parse_error)?;
                    doc.output_file = Some(resolver.resolve(Path::new(&file))?);
                }
                TABLE_PROBLEM => match value {
                    Value::Table(map) => {
                        doc.problem = Some(Table::from_map(map, TABLE_PROBLEM).map_err(parse_error)?);
                    }
                    Value::Null => {}
                    other => {
                        return Err(parse_error(format!(
                            "'{TABLE_PROBLEM}' must be a table, found {}",
                            other.kind()
                        )))
                    }
                },
                _ => match VariableRole::from_key(&key) {
                    Some(role) => {
                        for params in table_list(&key, value).map_err(parse_error)? {
                            doc.bindings.push(VariableBinding { role, params });
                        }
                    }
                    None => log::debug!("Ignoring unknown top-level key '{key}' in {origin}"),
                },
            }
        }

        Ok(doc)
    }

    /// Where the document came from: its path, or `<memory>`.
    #[must_use]
    pub fn origin(&self) -> &str {
        &self.origin
    }

    /// The directory relative paths were resolved against.
    #[must_use]
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Resolved module folders, in document order.
    #[must_use]
    pub fn module_folders(&self) -> &[PathBuf] {
        &self.module_folders
    }

    /// Resolved input file, if any.
    #[must_use]
    pub fn input_file(&self) -> Option<&Path> {
        self.input_file.as_deref()
    }

    /// Resolved output file, if any.
    #[must_use]
    pub fn output_file(&self) -> Option<&Path> {
        self.output_file.as_deref()
    }

    /// The problem table.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingProblemDefinition`] if the table is absent
    /// or empty.
    pub fn problem(&self) -> Result<&Table> {
        self.problem
            .as_ref()
            .filter(|table| !table.is_empty())
            .ok_or(Error::MissingProblemDefinition)
    }

    /// All variable bindings, grouped by role in document order.
    #[must_use]
    pub fn bindings(&self) -> &[VariableBinding] {
        &self.bindings
    }

    /// The bindings of one role, in document order.
    pub fn bindings_for(&self, role: VariableRole) -> impl Iterator<Item = &VariableBinding> {
        self.bindings.iter().filter(move |binding| binding.role == role)
    }
}

fn string(key: &str, value: Value) -> std::result::Result<String, String> {
    match value {
        Value::Str(s) => Ok(s),
        other => Err(format!("'{key}' must be a string, found {}", other.kind())),
    }
}

fn string_list(key: &str, value: Value) -> std::result::Result<Vec<String>, String> {
    match value {
        Value::Array(items) => items
            .into_iter()
            .enumerate()
            .map(|(i, item)| string(&format!("{key}[{i}]"), item))
            .collect(),
        Value::Null => Ok(Vec::new()),
        other => Err(format!("'{key}' must be a list of paths, found {}", other.kind())),
    }
}

/// A list of tables. A lone table counts as a list of one.
fn table_list(key: &str, value: Value) -> std::result::Result<Vec<ParameterMap>, String> {
    match value {
        Value::Array(items) => items
            .into_iter()
            .enumerate()
            .map(|(i, item)| match item {
                Value::Table(params) => Ok(params),
                other => Err(format!("'{key}[{i}]' must be a table, found {}", other.kind())),
            })
            .collect(),
        Value::Table(params) => Ok(vec![params]),
        Value::Null => Ok(Vec::new()),
        other => Err(format!("'{key}' must be a list of tables, found {}", other.kind())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const SAMPLE_TOML: &str = r#"
module_folders = ["modules", "../shared"]
input_file = "data/inputs.yaml"
output_file = "data/outputs.yaml"

[problem.mygroup]
factor = "2*3"

[problem.mygroup.comp]
id = "my.component"

[[design_var]]
name = "x"
lower = 0.0

[[design_var]]
name = "z"

[[objective]]
name = "obj"

[[constraint]]
name = "con1"
upper = 0.0
"#;

    #[test]
    fn test_format_from_path() {
        assert_eq!(DocumentFormat::from_path(Path::new("a.yaml")), DocumentFormat::Yaml);
        assert_eq!(DocumentFormat::from_path(Path::new("a.YML")), DocumentFormat::Yaml);
        assert_eq!(DocumentFormat::from_path(Path::new("a.toml")), DocumentFormat::Toml);
        assert_eq!(DocumentFormat::from_path(Path::new("a.conf")), DocumentFormat::Toml);
    }

    #[test]
    #[cfg(unix)]
    fn test_paths_resolve_against_base_dir() {
        let doc = ConfigurationDocument::from_str(SAMPLE_TOML, DocumentFormat::Toml, "/work/conf")
            .unwrap();
        assert_eq!(
            doc.module_folders(),
            &[PathBuf::from("/work/conf/modules"), PathBuf::from("/work/shared")]
        );
        assert_eq!(doc.input_file(), Some(Path::new("/work/conf/data/inputs.yaml")));
        assert_eq!(doc.output_file(), Some(Path::new("/work/conf/data/outputs.yaml")));
    }

    #[test]
    fn test_bindings_keep_document_order() {
        let doc = ConfigurationDocument::from_str(SAMPLE_TOML, DocumentFormat::Toml, "/").unwrap();
        let names: Vec<_> = doc
            .bindings_for(VariableRole::DesignVar)
            .map(|b| b.params["name"].clone())
            .collect();
        assert_eq!(names, vec![Value::Str("x".into()), Value::Str("z".into())]);
        assert_eq!(doc.bindings_for(VariableRole::Objective).count(), 1);
        assert_eq!(doc.bindings_for(VariableRole::Constraint).count(), 1);
    }

    #[test]
    fn test_missing_problem() {
        let doc = ConfigurationDocument::from_str("input_file = \"in.yaml\"", DocumentFormat::Toml, "/")
            .unwrap();
        assert!(matches!(doc.problem(), Err(Error::MissingProblemDefinition)));
    }

    #[test]
    fn test_empty_problem_counts_as_missing() {
        let doc = ConfigurationDocument::from_str("[problem]\n", DocumentFormat::Toml, "/").unwrap();
        assert!(matches!(doc.problem(), Err(Error::MissingProblemDefinition)));
    }

    #[test]
    fn test_malformed_document_is_parse_error() {
        let err = ConfigurationDocument::from_str("[problem\n", DocumentFormat::Toml, "/").unwrap_err();
        assert!(matches!(err, Error::DocumentParse { .. }));
    }

    #[test]
    fn test_colliding_yaml_keys_are_parse_error() {
        let text = "problem:\n  g:\n    1: \"2*3\"\n    '1': \"4\"\n";
        let err = ConfigurationDocument::from_str(text, DocumentFormat::Yaml, "/").unwrap_err();
        let Error::DocumentParse { message, .. } = err else {
            panic!("expected a parse error, got {err:?}");
        };
        assert!(message.contains("duplicate key 'problem.g.1'"));
    }

    #[test]
    fn test_wrong_type_for_folders() {
        let err = ConfigurationDocument::from_str("module_folders = 3", DocumentFormat::Toml, "/")
            .unwrap_err();
        assert!(err.to_string().contains("module_folders"));
    }

    #[test]
    fn test_yaml_document() {
        let text = "problem:\n  mygroup:\n    comp:\n      id: my.component\n    factor: 2*3\n";
        let doc = ConfigurationDocument::from_str(text, DocumentFormat::Yaml, "/").unwrap();
        let group = doc.problem().unwrap().as_group().unwrap();
        let Some(Entry::Table(Table::Group(mygroup))) = group.get("mygroup") else {
            panic!("expected mygroup to be a group");
        };
        assert!(matches!(mygroup.get("comp"), Some(Entry::Table(Table::Component(_)))));
    }

    #[test]
    fn test_empty_yaml_document() {
        let doc = ConfigurationDocument::from_str("", DocumentFormat::Yaml, "/").unwrap();
        assert!(matches!(doc.problem(), Err(Error::MissingProblemDefinition)));
    }

    #[test]
    fn test_load_from_disk_records_directory() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("problem.toml");
        fs::write(&path, SAMPLE_TOML).unwrap();

        let doc = ConfigurationDocument::load(&path).unwrap();
        assert_eq!(doc.base_dir(), temp_dir.path());
        assert_eq!(doc.module_folders()[0], temp_dir.path().join("modules"));
        assert!(doc.origin().ends_with("problem.toml"));
    }

    #[test]
    fn test_load_nonexistent_file() {
        let result = ConfigurationDocument::load(Path::new("/nonexistent/problem.toml"));
        assert!(matches!(result, Err(Error::InvalidPath { .. })));
    }

    #[test]
    fn test_from_reader() {
        let doc = ConfigurationDocument::from_reader(
            SAMPLE_TOML.as_bytes(),
            DocumentFormat::Toml,
            "/base",
        )
        .unwrap();
        assert_eq!(doc.origin(), "<memory>");
        assert!(doc.problem().is_ok());
    }
}
