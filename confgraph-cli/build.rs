//! Build script for confgraph-cli.
//!
//! This script generates man pages at build time using clap_mangen.
//! The generated man page is placed in OUT_DIR for inclusion in release builds.
//!
//! Note: We build a minimal command structure here rather than importing from
//! the main crate, since build scripts cannot depend on the crate being built.

use clap::{Arg, Command};
use clap_mangen::Man;
use std::fs;
use std::io;
use std::path::PathBuf;

/// Build the CLI command structure for man page generation.
///
/// IMPORTANT: Keep this structure synchronized with src/cli.rs
/// When adding/removing/modifying commands, update both files.
fn build_cli() -> Command {
    Command::new("confgraph")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Assemble computation graphs from configuration documents")
        .long_about(
            "Command-line tool for checking, inspecting and preparing problems described by \
             TOML or YAML configuration documents",
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .help("Enable verbose output")
                .global(true)
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("quiet")
                .long("quiet")
                .help("Suppress non-essential output")
                .global(true)
                .action(clap::ArgAction::SetTrue),
        )
        .subcommands(vec![
            Command::new("check")
                .about("Validate a configuration document")
                .long_about("Configure the problem and report node and variable counts"),
            Command::new("tree")
                .about("Print the assembled hierarchy")
                .long_about("Configure the problem and print its groups, components and attributes"),
            Command::new("components")
                .about("List the components found in module folders")
                .long_about("Explore folders for component manifests and list registered ids"),
            Command::new("write-inputs")
                .about("Write the inputs a problem needs to its input file")
                .long_about("Write every unconnected input, with its default value, to the input file"),
            Command::new("eval")
                .about("Evaluate an attribute expression")
                .long_about("Evaluate an expression the way problem attributes are evaluated"),
            Command::new("completions")
                .about("Generate shell completion scripts")
                .long_about("Generate shell completion scripts for bash, zsh, fish, or PowerShell"),
        ])
}

fn main() -> io::Result<()> {
    // Generate man pages at build time
    let out_dir = std::env::var("OUT_DIR")
        .map(PathBuf::from)
        .map_err(|e| io::Error::new(io::ErrorKind::NotFound, e))?;
    let man_dir = out_dir.join("man");
    fs::create_dir_all(&man_dir)?;

    // Generate main confgraph.1 man page
    let man = Man::new(build_cli());
    let mut buffer = Vec::new();
    man.render(&mut buffer)?;

    fs::write(man_dir.join("confgraph.1"), buffer)?;

    println!("cargo:rerun-if-changed=src/cli.rs");
    println!("cargo:rerun-if-changed=src/commands/");
    Ok(())
}
