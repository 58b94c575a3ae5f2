//! Command to write the inputs a problem needs.

use crate::error::CliError;
use crate::utils::{configure_problem, GlobalOptions};
use clap::Args;
use std::path::PathBuf;

/// Write the inputs a problem needs to its input file.
#[derive(Args)]
pub struct WriteInputsCommand {
    /// Configuration document
    #[arg(value_name = "CONF")]
    pub conf: PathBuf,

    /// Read the written file back and register design variables
    #[arg(long)]
    pub read: bool,
}

impl WriteInputsCommand {
    /// Execute the write-inputs command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let mut problem = configure_problem(&self.conf)?;

        let Some(input_file) = problem
            .document()
            .and_then(|document| document.input_file())
            .map(PathBuf::from)
        else {
            if !global.quiet {
                eprintln!("No input_file in {}; nothing written", self.conf.display());
            }
            return Ok(());
        };

        problem.write_needed_inputs()?;
        if !global.quiet {
            println!("Wrote {}", input_file.display());
        }

        if self.read {
            problem.read_inputs()?;
            let model = problem.engine().ok_or(confgraph::Error::NotConfigured)?;
            if !global.quiet {
                println!("Registered {} design variable(s)", model.design_vars().len());
            }
        }
        Ok(())
    }
}
