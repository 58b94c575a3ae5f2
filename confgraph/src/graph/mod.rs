//! The computation graph the builder writes into.
//!
//! [`GraphEngine`] is the seam between problem assembly and whatever
//! executes the graph. [`Model`] is the in-memory engine used by the
//! library and the CLI: it records the hierarchy, the attributes and the
//! optimization bindings, and resolves promoted variable names on setup.

mod model;
mod snapshot;

use std::fmt::Debug;

use thiserror::Error;

use crate::document::ParameterMap;
use crate::error::Result;
use crate::expr::AttrValue;
use crate::io::VariableSet;
use crate::registry::Component;

pub use model::{Model, NodeId};
pub use snapshot::{NodeKind, NodeSnapshot};

/// Attribute names a node keeps for itself.
pub const RESERVED_ATTRIBUTES: &[&str] = &["name", "id", "children", "promotes"];

/// Why the engine refused an attribute.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AttributeError {
    /// The name is one of [`RESERVED_ATTRIBUTES`].
    #[error("'{name}' is a reserved attribute")]
    Reserved {
        /// The attribute name.
        name: String,
    },

    /// The name is not an identifier.
    #[error("'{name}' is not a valid attribute name")]
    InvalidName {
        /// The attribute name.
        name: String,
    },

    /// The node does not exist in this graph.
    #[error("no such node")]
    UnknownNode,
}

/// What gets attached under a parent node.
#[derive(Debug, Clone, PartialEq)]
pub enum Subsystem {
    /// A group, which holds children.
    Group,
    /// A component from the registry.
    Component(Component),
}

/// A hierarchical computation graph under construction.
pub trait GraphEngine {
    /// Handle to a node of this graph.
    type Node: Copy + Debug;

    /// A graph holding only its root group.
    fn new_root() -> Self
    where
        Self: Sized;

    /// The root group.
    fn root(&self) -> Self::Node;

    /// Attaches `subsystem` under `parent` as `name`. With `promote_all`,
    /// the child's variables are addressed at the parent's scope.
    ///
    /// # Errors
    ///
    /// Returns an error if `parent` cannot hold children or already has a
    /// child called `name`.
    fn add_subsystem(
        &mut self,
        parent: Self::Node,
        name: &str,
        subsystem: Subsystem,
        promote_all: bool,
    ) -> Result<Self::Node>;

    /// Sets the attribute `name` of `node`.
    ///
    /// # Errors
    ///
    /// Returns an [`AttributeError`] if the assignment is refused.
    fn set_attribute(
        &mut self,
        node: Self::Node,
        name: &str,
        value: AttrValue,
    ) -> std::result::Result<(), AttributeError>;

    /// Declares a design variable.
    ///
    /// # Errors
    ///
    /// Returns an error if the engine rejects the parameters.
    fn add_design_var(&mut self, params: &ParameterMap) -> Result<()>;

    /// Declares an objective.
    ///
    /// # Errors
    ///
    /// Returns an error if the engine rejects the parameters.
    fn add_objective(&mut self, params: &ParameterMap) -> Result<()>;

    /// Declares a constraint.
    ///
    /// # Errors
    ///
    /// Returns an error if the engine rejects the parameters.
    fn add_constraint(&mut self, params: &ParameterMap) -> Result<()>;

    /// Finalizes the structure. May be called again after changes.
    ///
    /// # Errors
    ///
    /// Returns an error if the structure cannot be resolved.
    fn setup(&mut self) -> Result<()>;

    /// Inputs no output feeds, with their default values.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Engine`] if `setup` has not run.
    fn needed_inputs(&self) -> Result<VariableSet>;

    /// Every variable visible at the root, with its current value.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Engine`] if `setup` has not run.
    fn variables(&self) -> Result<VariableSet>;
}

/// Checks an attribute name against the reserved names and identifier rules.
///
/// # Errors
///
/// Returns the matching [`AttributeError`].
pub fn check_attribute_name(name: &str) -> std::result::Result<(), AttributeError> {
    if RESERVED_ATTRIBUTES.contains(&name) {
        return Err(AttributeError::Reserved {
            name: name.to_string(),
        });
    }
    let mut chars = name.chars();
    let valid = chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_');
    if valid {
        Ok(())
    } else {
        Err(AttributeError::InvalidName {
            name: name.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reserved_names() {
        for name in RESERVED_ATTRIBUTES {
            assert!(matches!(
                check_attribute_name(name),
                Err(AttributeError::Reserved { .. })
            ));
        }
    }

    #[test]
    fn test_identifier_rules() {
        assert!(check_attribute_name("max_iter").is_ok());
        assert!(check_attribute_name("_private2").is_ok());
        assert!(check_attribute_name("2x").is_err());
        assert!(check_attribute_name("a-b").is_err());
        assert!(check_attribute_name("").is_err());
    }

    #[test]
    fn test_attribute_error_display() {
        let err = AttributeError::Reserved { name: "id".into() };
        assert_eq!(err.to_string(), "'id' is a reserved attribute");
    }
}
