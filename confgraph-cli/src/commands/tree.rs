//! Command to print the assembled hierarchy.

use crate::error::CliError;
use crate::utils::{configure_problem, GlobalOptions};
use clap::{Args, ValueEnum};
use confgraph::OutputFormat;
use std::path::PathBuf;

/// Print the assembled hierarchy.
#[derive(Args)]
pub struct TreeCommand {
    /// Configuration document
    #[arg(value_name = "CONF")]
    pub conf: PathBuf,

    /// Output format
    #[arg(
        long,
        value_enum,
        default_value = "human",
        env = "CONFGRAPH_OUTPUT_FORMAT",
        ignore_case = true
    )]
    pub format: TreeFormat,
}

/// Output format for the tree command.
#[derive(Clone, Copy, ValueEnum)]
#[value(rename_all = "lowercase")]
pub enum TreeFormat {
    /// Indented tree (human-readable)
    Human,
    /// JSON format
    Json,
    /// YAML format
    Yaml,
}

impl From<TreeFormat> for OutputFormat {
    fn from(format: TreeFormat) -> Self {
        match format {
            TreeFormat::Human => OutputFormat::Human,
            TreeFormat::Json => OutputFormat::Json,
            TreeFormat::Yaml => OutputFormat::Yaml,
        }
    }
}

impl TreeCommand {
    /// Execute the tree command.
    pub fn execute(self, _global: &GlobalOptions) -> Result<(), CliError> {
        let problem = configure_problem(&self.conf)?;
        let model = problem.engine().ok_or(confgraph::Error::NotConfigured)?;

        let formatter = OutputFormat::from(self.format).create_formatter();
        let output = formatter.format(&model.snapshot())?;
        print!("{output}");
        if !output.ends_with('\n') {
            println!();
        }
        Ok(())
    }
}
