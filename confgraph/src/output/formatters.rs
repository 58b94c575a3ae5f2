//! Output formatter implementations.

use crate::graph::{NodeKind, NodeSnapshot};
use crate::{Error, Result};

use super::OutputFormatter;

/// Formatter for JSON output.
pub struct JsonFormatter;

impl OutputFormatter for JsonFormatter {
    fn format(&self, root: &NodeSnapshot) -> Result<String> {
        serde_json::to_string_pretty(root).map_err(|e| Error::Engine {
            message: format!("failed to serialize graph to JSON: {e}"),
        })
    }
}

/// Formatter for YAML output.
pub struct YamlFormatter;

impl OutputFormatter for YamlFormatter {
    fn format(&self, root: &NodeSnapshot) -> Result<String> {
        serde_yaml::to_string(root).map_err(|e| Error::Engine {
            message: format!("failed to serialize graph to YAML: {e}"),
        })
    }
}

/// Formatter for human-readable output.
///
/// One line per node, indented by depth, followed by the node's attributes:
///
/// ```text
/// model
///   mygroup
///     factor = 6
///     comp [my.component]
/// ```
pub struct HumanFormatter;

impl HumanFormatter {
    fn format_node(lines: &mut Vec<String>, node: &NodeSnapshot, depth: usize) {
        let indent = "  ".repeat(depth);
        match (&node.kind, &node.component) {
            (NodeKind::Component, Some(id)) => lines.push(format!("{indent}{} [{id}]", node.name)),
            _ => lines.push(format!("{indent}{}", node.name)),
        }
        for (name, value) in &node.attributes {
            lines.push(format!("{indent}  {name} = {value}"));
        }
        for child in &node.children {
            Self::format_node(lines, child, depth + 1);
        }
    }
}

impl OutputFormatter for HumanFormatter {
    fn format(&self, root: &NodeSnapshot) -> Result<String> {
        let mut lines = Vec::new();
        Self::format_node(&mut lines, root, 0);
        Ok(lines.join("\n"))
    }
}
