//! Command to validate a configuration document.

use crate::error::CliError;
use crate::utils::{configure_problem, GlobalOptions};
use clap::Args;
use confgraph::GraphEngine;
use std::path::PathBuf;

/// Validate a configuration document.
#[derive(Args)]
pub struct CheckCommand {
    /// Configuration document to validate
    #[arg(value_name = "CONF")]
    pub conf: PathBuf,
}

impl CheckCommand {
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let problem = configure_problem(&self.conf)?;
        let model = problem.engine().ok_or(confgraph::Error::NotConfigured)?;

        println!("Configuration is valid");
        if !global.quiet {
            let snapshot = model.snapshot();
            println!(
                "{} node(s), {} component(s), {} needed input(s), {} variable(s)",
                snapshot.count(),
                snapshot.component_count(),
                model.needed_inputs()?.len(),
                model.variables()?.len()
            );
        }
        Ok(())
    }
}
