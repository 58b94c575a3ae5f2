//! Command to evaluate an attribute expression.

use crate::error::CliError;
use crate::utils::{parse_define, GlobalOptions};
use clap::Args;
use confgraph::expr::evaluate;
use confgraph::graph::check_attribute_name;
use confgraph::EvalContext;

/// Evaluate an attribute expression.
#[derive(Args)]
pub struct EvalCommand {
    /// Expression to evaluate
    #[arg(value_name = "EXPR", allow_hyphen_values = true)]
    pub expr: String,

    /// Define a named constant (evaluated in order, may use earlier ones)
    #[arg(long = "define", short = 'D', value_name = "NAME=EXPR", value_parser = parse_define)]
    pub defines: Vec<(String, String)>,
}

impl EvalCommand {
    /// Execute the eval command.
    pub fn execute(self, _global: &GlobalOptions) -> Result<(), CliError> {
        let mut context = EvalContext::default();
        for (name, source) in self.defines {
            check_attribute_name(&name)
                .map_err(|e| CliError::InvalidArguments(e.to_string()))?;
            let value = evaluate(&source, &context).map_err(|e| {
                CliError::SemanticFailure(format!("cannot evaluate {name} = \"{source}\": {e}"))
            })?;
            context = context.with(name, value);
        }

        let value = evaluate(&self.expr, &context).map_err(|e| {
            CliError::SemanticFailure(format!("cannot evaluate \"{}\": {e}", self.expr))
        })?;
        println!("{value}");
        Ok(())
    }
}
