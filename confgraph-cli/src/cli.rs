//! CLI structure and command definitions.
//!
//! This module defines the main CLI structure using clap's derive macros,
//! including global options and subcommands.

use crate::commands::{
    CheckCommand, CompletionsCommand, ComponentsCommand, EvalCommand, TreeCommand,
    WriteInputsCommand,
};
use clap::{Parser, Subcommand};

/// Command-line tool for assembling computation graphs from configuration documents.
#[derive(Parser)]
#[command(name = "confgraph")]
#[command(version, about = "Assemble computation graphs from configuration documents", long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(long, global = true)]
    pub verbose: bool,

    /// Suppress non-essential output
    #[arg(long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand)]
pub enum Command {
    /// Validate a configuration document
    Check(CheckCommand),

    /// Print the assembled hierarchy
    Tree(TreeCommand),

    /// List the components found in module folders
    Components(ComponentsCommand),

    /// Write the inputs a problem needs to its input file
    WriteInputs(WriteInputsCommand),

    /// Evaluate an attribute expression
    Eval(EvalCommand),

    /// Generate shell completion scripts
    Completions(CompletionsCommand),
}
