//! Main entry point for the confgraph CLI.
//!
//! This is the command-line interface for assembling computation graphs
//! from configuration documents. It provides commands for:
//! - `check`: Validate a configuration document
//! - `tree`: Print the assembled hierarchy
//! - `components`: List the components found in module folders
//! - `write-inputs`: Write the inputs a problem needs
//! - `eval`: Evaluate an attribute expression

mod cli;
mod commands;
mod error;
mod utils;

use clap::Parser;
use cli::Cli;
use utils::GlobalOptions;

fn main() {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    confgraph::init_logger(cli.verbose, cli.quiet).install();

    let global = GlobalOptions {
        verbose: cli.verbose,
        quiet: cli.quiet,
    };

    // Execute the command
    let result = match cli.command {
        cli::Command::Check(cmd) => cmd.execute(&global),
        cli::Command::Tree(cmd) => cmd.execute(&global),
        cli::Command::Components(cmd) => cmd.execute(&global),
        cli::Command::WriteInputs(cmd) => cmd.execute(&global),
        cli::Command::Eval(cmd) => cmd.execute(&global),
        cli::Command::Completions(cmd) => cmd.execute(&global),
    };

    // Handle errors and set exit code
    match result {
        Ok(()) => std::process::exit(0),
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(e.exit_code());
        }
    }
}
