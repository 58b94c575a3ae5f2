//! Common test utilities for integration tests.
//!
//! This module provides a fixture that lays out a configuration document,
//! its module folders and its variable files in a temporary directory.

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// Manifest declaring the components used across the integration tests.
pub const SAMPLE_MANIFEST: &str = r#"
[[component]]
id = "my.component"
inputs = [{ name = "x", value = 2.0 }]
outputs = [{ name = "y" }]

[[component]]
id = "wing.geometry"
inputs = [{ name = "span", units = "m", value = 30.0 }, { name = "chord", units = "m" }]
outputs = [{ name = "area", units = "m**2" }]

[[component]]
id = "wing.aero"
inputs = [{ name = "area", units = "m**2" }, { name = "alpha", units = "deg" }]
outputs = [{ name = "cl" }]
"#;

/// A temporary problem directory.
pub struct ProblemFixture {
    dir: TempDir,
}

#[allow(dead_code)]
impl ProblemFixture {
    /// An empty directory.
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().unwrap(),
        }
    }

    /// A directory with [`SAMPLE_MANIFEST`] under `modules/`.
    pub fn with_modules() -> Self {
        let fixture = Self::new();
        fixture.write("modules/sample.component.toml", SAMPLE_MANIFEST);
        fixture
    }

    /// The directory path.
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Writes `content` to `relative`, creating parent directories.
    pub fn write(&self, relative: &str, content: &str) -> PathBuf {
        let path = self.dir.path().join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, content).unwrap();
        path
    }

    /// Writes the configuration document `problem.toml`.
    pub fn document(&self, content: &str) -> PathBuf {
        self.write("problem.toml", content)
    }
}

/// Builds a document nesting `depth` groups named `g0`, `g1`, ... around a
/// failing leaf `leaf = "bad_expr("`. Returns the document and the dotted
/// key of the leaf.
#[allow(dead_code)]
pub fn nested_failing_document(depth: usize) -> (String, String) {
    let groups: Vec<String> = (0..depth).map(|i| format!("g{i}")).collect();
    let mut header = String::from("problem");
    for group in &groups {
        header.push('.');
        header.push_str(group);
    }
    let document = format!("[{header}]\nleaf = \"bad_expr(\"\n");
    (document, format!("{header}.leaf"))
}
