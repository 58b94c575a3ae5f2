//! Common test utilities for CLI integration tests.
//!
//! This module provides shared helpers for CLI testing, including:
//! - Test environment setup with temporary directories
//! - Fixture manifests and documents
//! - Command builder helpers

use assert_cmd::Command;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Manifest declaring the components used by the fixture documents.
pub const MANIFEST: &str = r#"
[[component]]
id = "my.component"
description = "A sample component"
inputs = [{ name = "x", value = 2.0 }]
outputs = [{ name = "y" }]

[[component]]
id = "wing.geometry"
inputs = [{ name = "span", units = "m", value = 30.0 }]
outputs = [{ name = "area", units = "m**2" }]
"#;

/// A valid document using the fixture manifest.
pub const VALID_DOCUMENT: &str = r#"
module_folders = ["modules"]
input_file = "data/inputs.yaml"

[problem.mygroup]
comp = { id = "my.component" }
factor = "2*3"

[problem.wing]
geometry = { id = "wing.geometry" }

[[design_var]]
name = "span"
lower = 10.0
"#;

/// Test environment with an isolated directory.
pub struct TestEnv {
    /// Temporary directory (kept alive for the duration of the test)
    #[allow(dead_code)]
    temp_dir: TempDir,
    /// Path to the temporary directory
    pub temp_path: PathBuf,
}

#[allow(dead_code)]
impl TestEnv {
    /// Create a new test environment with the fixture manifest under `modules/`.
    pub fn new() -> Self {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let temp_path = temp_dir.path().to_path_buf();
        let env = Self {
            temp_dir,
            temp_path,
        };
        env.write("modules/sample.component.toml", MANIFEST);
        env
    }

    /// Get a command builder for the confgraph binary.
    pub fn command(&self) -> Command {
        let mut cmd = Command::cargo_bin("confgraph").expect("Failed to find confgraph binary");
        cmd.current_dir(&self.temp_path);
        cmd.env_remove("CONFGRAPH_LOG_MODE");
        cmd.env_remove("CONFGRAPH_OUTPUT_FORMAT");
        cmd
    }

    /// Get the temp path.
    pub fn path(&self) -> &Path {
        &self.temp_path
    }

    /// Write a file relative to the environment, creating parent directories.
    pub fn write(&self, relative: &str, content: &str) -> PathBuf {
        let path = self.temp_path.join(relative);
        std::fs::create_dir_all(path.parent().expect("path has a parent"))
            .expect("Failed to create test directory");
        std::fs::write(&path, content).expect("Failed to write test file");
        path
    }

    /// Write `problem.toml` and return its path.
    pub fn document(&self, content: &str) -> PathBuf {
        self.write("problem.toml", content)
    }
}
