//! Component declarations and instances.

use serde::{Deserialize, Deserializer, Serialize};

use crate::io::{scalar_or_list, Variable, VariableSet};

/// Value given to declared variables that have none.
pub const DEFAULT_VALUE: f64 = 1.0;

/// Contents of a component manifest file.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Manifest {
    /// The declared components.
    #[serde(rename = "component", default)]
    pub components: Vec<ComponentSpec>,
}

/// A component as declared in a manifest.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ComponentSpec {
    /// Registry identifier.
    pub id: String,

    /// Free-form description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Declared input variables.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub inputs: Vec<VariableSpec>,

    /// Declared output variables.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub outputs: Vec<VariableSpec>,
}

/// A variable declared by a component.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct VariableSpec {
    /// Variable name.
    pub name: String,

    /// Physical units.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub units: Option<String>,

    /// Default value; a scalar or a list.
    #[serde(
        default,
        deserialize_with = "optional_scalar_or_list",
        skip_serializing_if = "Option::is_none"
    )]
    pub value: Option<Vec<f64>>,

    /// Free-form description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

fn optional_scalar_or_list<'de, D>(deserializer: D) -> Result<Option<Vec<f64>>, D::Error>
where
    D: Deserializer<'de>,
{
    scalar_or_list(deserializer).map(Some)
}

impl ComponentSpec {
    /// A declaration with no variables.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            description: None,
            inputs: Vec::new(),
            outputs: Vec::new(),
        }
    }

    /// Adds an input.
    #[must_use]
    pub fn with_input(mut self, name: impl Into<String>) -> Self {
        self.inputs.push(VariableSpec::named(name));
        self
    }

    /// Adds an output.
    #[must_use]
    pub fn with_output(mut self, name: impl Into<String>) -> Self {
        self.outputs.push(VariableSpec::named(name));
        self
    }

    /// Checks the id is non-empty and variable names are unique per side.
    ///
    /// # Errors
    ///
    /// Returns a description of the first problem found.
    pub fn validate(&self) -> Result<(), String> {
        if self.id.trim().is_empty() {
            return Err("component id must not be empty".to_string());
        }
        for (side, variables) in [("input", &self.inputs), ("output", &self.outputs)] {
            let mut seen = std::collections::HashSet::new();
            for variable in variables {
                if variable.name.trim().is_empty() {
                    return Err(format!("component '{}' has an unnamed {side}", self.id));
                }
                if !seen.insert(variable.name.as_str()) {
                    return Err(format!(
                        "component '{}' declares {side} '{}' twice",
                        self.id, variable.name
                    ));
                }
            }
        }
        Ok(())
    }
}

impl VariableSpec {
    /// A variable with only a name.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            units: None,
            value: None,
            description: None,
        }
    }

    fn to_variable(&self) -> Variable {
        Variable {
            value: self.value.clone().unwrap_or_else(|| vec![DEFAULT_VALUE]),
            units: self.units.clone(),
            description: self.description.clone(),
        }
    }
}

/// An instantiated component, ready to be added to a graph.
#[derive(Debug, Clone, PartialEq)]
pub struct Component {
    id: String,
    inputs: VariableSet,
    outputs: VariableSet,
}

impl Component {
    /// Instantiates a declaration.
    #[must_use]
    pub fn from_spec(spec: &ComponentSpec) -> Self {
        let collect = |specs: &[VariableSpec]| {
            specs
                .iter()
                .map(|var| (var.name.clone(), var.to_variable()))
                .collect::<VariableSet>()
        };
        Self {
            id: spec.id.clone(),
            inputs: collect(&spec.inputs),
            outputs: collect(&spec.outputs),
        }
    }

    /// A source component whose outputs are `variables`, with their values.
    #[must_use]
    pub fn from_variables(id: impl Into<String>, variables: &VariableSet) -> Self {
        Self {
            id: id.into(),
            inputs: VariableSet::new(),
            outputs: variables.clone(),
        }
    }

    /// The registry id this component was created from.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Declared inputs with their defaults.
    #[must_use]
    pub const fn inputs(&self) -> &VariableSet {
        &self.inputs
    }

    /// Declared outputs with their defaults.
    #[must_use]
    pub const fn outputs(&self) -> &VariableSet {
        &self.outputs
    }
}
