//! Utility functions for CLI operations.
//!
//! This module provides helpers shared across commands: global options,
//! loading and configuring a problem, and argument parsers.

use crate::error::CliError;
use confgraph::ConfiguredProblem;
use std::path::Path;

/// Global CLI options shared across all commands.
#[derive(Debug, Clone)]
#[allow(dead_code)] // Fields used via pattern matching in main.rs
pub struct GlobalOptions {
    /// Enable verbose output.
    pub verbose: bool,

    /// Suppress non-essential output.
    pub quiet: bool,
}

/// Configure a problem from the document at `path`.
///
/// # Errors
///
/// Returns `InvalidArguments` if the document does not exist, or the
/// library error if configuration fails.
pub fn configure_problem(path: &Path) -> Result<ConfiguredProblem, CliError> {
    if !path.exists() {
        return Err(CliError::InvalidArguments(format!(
            "File not found: {}",
            path.display()
        )));
    }
    let mut problem = ConfiguredProblem::new();
    problem.configure(path)?;
    Ok(problem)
}

/// Parse a `NAME=EXPR` pair.
pub fn parse_define(s: &str) -> Result<(String, String), String> {
    let (name, expr) = s
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=EXPR, got '{s}'"))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("missing name in '{s}'"));
    }
    Ok((name.to_string(), expr.trim().to_string()))
}
