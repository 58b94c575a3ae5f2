//! Design variables, objectives and constraints.
//!
//! The document's `design_var`, `objective` and `constraint` tables are
//! forwarded to the engine exactly as written, in document order. Checking
//! them (unknown variables, conflicting bounds) is left to the engine.

use std::fmt;

use crate::document::{ParameterMap, TABLES_CONSTRAINT, TABLES_DESIGN_VAR, TABLES_OBJECTIVE};
use crate::error::Result;
use crate::graph::GraphEngine;

/// The optimization role of a parameter table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VariableRole {
    /// A design variable.
    DesignVar,
    /// An objective.
    Objective,
    /// A constraint.
    Constraint,
}

impl VariableRole {
    /// The document key holding tables of this role.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::DesignVar => TABLES_DESIGN_VAR,
            Self::Objective => TABLES_OBJECTIVE,
            Self::Constraint => TABLES_CONSTRAINT,
        }
    }

    /// The role stored under the document key `key`.
    #[must_use]
    pub fn from_key(key: &str) -> Option<Self> {
        [Self::DesignVar, Self::Objective, Self::Constraint]
            .into_iter()
            .find(|role| role.key() == key)
    }
}

impl fmt::Display for VariableRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// A parameter table tagged with its role.
#[derive(Debug, Clone, PartialEq)]
pub struct VariableBinding {
    /// The role.
    pub role: VariableRole,
    /// The parameters, passed through untouched.
    pub params: ParameterMap,
}

/// Forwards each binding to the engine call matching its role, in order.
///
/// # Errors
///
/// Returns the first error the engine raises.
pub fn register<'a, E: GraphEngine>(
    engine: &mut E,
    bindings: impl IntoIterator<Item = &'a VariableBinding>,
) -> Result<usize> {
    let mut count = 0;
    for binding in bindings {
        log::debug!("Registering {} {:?}", binding.role, binding.params);
        match binding.role {
            VariableRole::DesignVar => engine.add_design_var(&binding.params)?,
            VariableRole::Objective => engine.add_objective(&binding.params)?,
            VariableRole::Constraint => engine.add_constraint(&binding.params)?,
        }
        count += 1;
    }
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Value;
    use crate::graph::Model;

    fn binding(role: VariableRole, name: &str) -> VariableBinding {
        let mut params = ParameterMap::new();
        params.insert("name".into(), Value::Str(name.into()));
        params.insert("lower".into(), Value::Float(0.0));
        VariableBinding { role, params }
    }

    #[test]
    fn test_role_keys() {
        assert_eq!(VariableRole::DesignVar.key(), "design_var");
        assert_eq!(VariableRole::from_key("objective"), Some(VariableRole::Objective));
        assert_eq!(VariableRole::from_key("problem"), None);
    }

    #[test]
    fn test_register_nothing() {
        let mut model = Model::new_root();
        assert_eq!(register(&mut model, &[]).unwrap(), 0);
        assert!(model.design_vars().is_empty());
    }

    #[test]
    fn test_register_forwards_in_order_unchanged() {
        let bindings = vec![
            binding(VariableRole::DesignVar, "x"),
            binding(VariableRole::Constraint, "c"),
            binding(VariableRole::DesignVar, "z"),
        ];
        let mut model = Model::new_root();
        assert_eq!(register(&mut model, &bindings).unwrap(), 3);

        assert_eq!(model.design_vars(), &[bindings[0].params.clone(), bindings[2].params.clone()]);
        assert_eq!(model.constraints(), &[bindings[1].params.clone()]);
        assert!(model.objectives().is_empty());
    }

    #[test]
    fn test_duplicates_are_not_filtered() {
        let bindings = vec![
            binding(VariableRole::Objective, "obj"),
            binding(VariableRole::Objective, "obj"),
        ];
        let mut model = Model::new_root();
        register(&mut model, &bindings).unwrap();
        assert_eq!(model.objectives().len(), 2);
    }
}
