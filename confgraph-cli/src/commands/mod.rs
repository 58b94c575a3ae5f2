//! CLI command implementations.
//!
//! This module contains the implementations of all CLI commands:
//! - `check`: Validate a configuration document
//! - `tree`: Print the assembled hierarchy
//! - `components`: List the components found in module folders
//! - `write_inputs`: Write the inputs a problem needs
//! - `eval`: Evaluate an attribute expression
//! - `completions`: Generate shell completion scripts

pub mod check;
pub mod completions;
pub mod components;
pub mod eval;
pub mod tree;
pub mod write_inputs;

pub use check::CheckCommand;
pub use completions::CompletionsCommand;
pub use components::ComponentsCommand;
pub use eval::EvalCommand;
pub use tree::TreeCommand;
pub use write_inputs::WriteInputsCommand;
