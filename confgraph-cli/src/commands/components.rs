//! Command to list the components found in module folders.

use crate::error::CliError;
use crate::utils::GlobalOptions;
use clap::Args;
use confgraph::ComponentRegistry;
use std::path::PathBuf;

/// List the components found in module folders.
#[derive(Args)]
pub struct ComponentsCommand {
    /// Folders to explore for component manifests
    #[arg(value_name = "FOLDER", required = true)]
    pub folders: Vec<PathBuf>,

    /// Also show declared variables and descriptions
    #[arg(long)]
    pub long: bool,
}

impl ComponentsCommand {
    /// Execute the components command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let mut registry = ComponentRegistry::new();
        for folder in &self.folders {
            if folder.is_dir() {
                registry.explore(folder)?;
            } else {
                log::warn!("SKIPPED {}: it does not exist.", folder.display());
            }
        }

        if registry.is_empty() {
            if !global.quiet {
                eprintln!("No components found");
            }
            return Ok(());
        }

        for id in registry.ids() {
            match registry.spec(id).filter(|_| self.long) {
                Some(spec) => {
                    let description = spec.description.as_deref().unwrap_or("");
                    println!(
                        "{id}\t{} input(s)\t{} output(s)\t{description}",
                        spec.inputs.len(),
                        spec.outputs.len()
                    );
                }
                None => println!("{id}"),
            }
        }
        Ok(())
    }
}
