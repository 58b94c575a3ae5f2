//! Output formatting for assembled graphs.
//!
//! This module renders a [`NodeSnapshot`] as an indented tree for people,
//! or as JSON or YAML for tools.

mod formatters;

use crate::graph::NodeSnapshot;
use crate::Result;

pub use formatters::{HumanFormatter, JsonFormatter, YamlFormatter};

/// Trait for formatting an assembled graph.
pub trait OutputFormatter {
    /// Format the graph rooted at `root` into a string.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    fn format(&self, root: &NodeSnapshot) -> Result<String>;
}

/// Available output formats for graphs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Indented tree.
    #[default]
    Human,
    /// JSON.
    Json,
    /// YAML.
    Yaml,
}

impl OutputFormat {
    /// Create a formatter for this output format.
    #[must_use]
    pub fn create_formatter(&self) -> Box<dyn OutputFormatter> {
        match self {
            Self::Human => Box::new(HumanFormatter),
            Self::Json => Box::new(JsonFormatter),
            Self::Yaml => Box::new(YamlFormatter),
        }
    }
}
