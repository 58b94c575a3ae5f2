//! In-memory graph engine.

use indexmap::IndexMap;

use crate::document::ParameterMap;
use crate::error::{Error, Result};
use crate::expr::AttrValue;
use crate::graph::snapshot::{NodeKind, NodeSnapshot};
use crate::graph::{check_attribute_name, AttributeError, GraphEngine, Subsystem};
use crate::io::{Variable, VariableSet};

/// Name of the root group.
pub const ROOT_NAME: &str = "model";

/// Handle to a node of a [`Model`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

#[derive(Debug, Clone, PartialEq)]
struct Node {
    name: String,
    subsystem: Subsystem,
    promote_all: bool,
    attributes: IndexMap<String, AttrValue>,
    children: Vec<NodeId>,
}

/// Variables visible at one node's scope.
#[derive(Debug, Clone, Default, PartialEq)]
struct Namespace {
    inputs: IndexMap<String, Variable>,
    outputs: IndexMap<String, Variable>,
}

/// The in-memory graph engine.
///
/// Nodes live in an arena and only know their children. On
/// [`setup`](GraphEngine::setup) every group gathers the variables of its
/// children: promoted children contribute bare names, others contribute
/// `child.name`. When two children expose the same name the later one wins.
/// An input is connected when an output of the same name is visible at the
/// root.
///
/// # Examples
///
/// ```
/// use confgraph::expr::AttrValue;
/// use confgraph::graph::{GraphEngine, Model, Subsystem};
///
/// let mut model = Model::new_root();
/// let group = model.add_subsystem(model.root(), "mygroup", Subsystem::Group, true).unwrap();
/// model.set_attribute(group, "factor", AttrValue::Int(6)).unwrap();
/// model.setup().unwrap();
///
/// let snapshot = model.snapshot();
/// assert_eq!(snapshot.find("mygroup").unwrap().attributes["factor"], AttrValue::Int(6));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Model {
    nodes: Vec<Node>,
    design_vars: Vec<ParameterMap>,
    objectives: Vec<ParameterMap>,
    constraints: Vec<ParameterMap>,
    setup_count: usize,
    resolved: Option<Namespace>,
}

impl Model {
    fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    /// Name of a node.
    #[must_use]
    pub fn name(&self, id: NodeId) -> Option<&str> {
        self.node(id).map(|node| node.name.as_str())
    }

    /// Children of a node, in insertion order.
    #[must_use]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.node(id).map_or(&[], |node| node.children.as_slice())
    }

    /// Finds the child `name` of `parent`.
    #[must_use]
    pub fn child(&self, parent: NodeId, name: &str) -> Option<NodeId> {
        self.children(parent)
            .iter()
            .copied()
            .find(|child| self.name(*child) == Some(name))
    }

    /// Finds a node by its dotted path from the root (`""` is the root).
    #[must_use]
    pub fn find(&self, path: &str) -> Option<NodeId> {
        if path.is_empty() {
            return Some(self.root());
        }
        path.split('.')
            .try_fold(self.root(), |node, name| self.child(node, name))
    }

    /// An attribute of a node.
    #[must_use]
    pub fn attribute(&self, id: NodeId, name: &str) -> Option<&AttrValue> {
        self.node(id).and_then(|node| node.attributes.get(name))
    }

    /// Total number of nodes, root included.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Registered design variables, in registration order.
    #[must_use]
    pub fn design_vars(&self) -> &[ParameterMap] {
        &self.design_vars
    }

    /// Registered objectives, in registration order.
    #[must_use]
    pub fn objectives(&self) -> &[ParameterMap] {
        &self.objectives
    }

    /// Registered constraints, in registration order.
    #[must_use]
    pub fn constraints(&self) -> &[ParameterMap] {
        &self.constraints
    }

    /// How many times setup has run.
    #[must_use]
    pub const fn setup_count(&self) -> usize {
        self.setup_count
    }

    /// Whether setup has run since the last structural change.
    #[must_use]
    pub const fn is_set_up(&self) -> bool {
        self.resolved.is_some()
    }

    /// Promoted input names fed by an output of the same name.
    ///
    /// Empty until setup has run.
    #[must_use]
    pub fn connections(&self) -> Vec<&str> {
        self.resolved.as_ref().map_or_else(Vec::new, |ns| {
            ns.inputs
                .keys()
                .filter(|name| ns.outputs.contains_key(*name))
                .map(String::as_str)
                .collect()
        })
    }

    /// A serializable copy of the hierarchy.
    #[must_use]
    pub fn snapshot(&self) -> NodeSnapshot {
        self.snapshot_node(self.root())
    }

    fn snapshot_node(&self, id: NodeId) -> NodeSnapshot {
        let node = &self.nodes[id.0];
        let (kind, component) = match &node.subsystem {
            Subsystem::Group => (NodeKind::Group, None),
            Subsystem::Component(component) => {
                (NodeKind::Component, Some(component.id().to_string()))
            }
        };
        NodeSnapshot {
            name: node.name.clone(),
            kind,
            component,
            promotes: node.promote_all,
            attributes: node.attributes.clone(),
            children: node
                .children
                .iter()
                .map(|child| self.snapshot_node(*child))
                .collect(),
        }
    }

    fn resolve(&self, id: NodeId) -> Namespace {
        let node = &self.nodes[id.0];
        match &node.subsystem {
            Subsystem::Component(component) => Namespace {
                inputs: collect(component.inputs()),
                outputs: collect(component.outputs()),
            },
            Subsystem::Group => {
                let mut namespace = Namespace::default();
                for child_id in &node.children {
                    let child = &self.nodes[child_id.0];
                    let scoped = |name: String| {
                        if child.promote_all {
                            name
                        } else {
                            format!("{}.{name}", child.name)
                        }
                    };
                    let resolved = self.resolve(*child_id);
                    for (name, variable) in resolved.inputs {
                        namespace.inputs.insert(scoped(name), variable);
                    }
                    for (name, variable) in resolved.outputs {
                        namespace.outputs.insert(scoped(name), variable);
                    }
                }
                namespace
            }
        }
    }

    fn resolved(&self) -> Result<&Namespace> {
        self.resolved.as_ref().ok_or_else(|| Error::Engine {
            message: "setup has not been run since the last change".to_string(),
        })
    }
}

fn collect(variables: &VariableSet) -> IndexMap<String, Variable> {
    variables
        .iter()
        .map(|(name, variable)| (name.to_string(), variable.clone()))
        .collect()
}

impl GraphEngine for Model {
    type Node = NodeId;

    fn new_root() -> Self {
        Self {
            nodes: vec![Node {
                name: ROOT_NAME.to_string(),
                subsystem: Subsystem::Group,
                promote_all: true,
                attributes: IndexMap::new(),
                children: Vec::new(),
            }],
            design_vars: Vec::new(),
            objectives: Vec::new(),
            constraints: Vec::new(),
            setup_count: 0,
            resolved: None,
        }
    }

    fn root(&self) -> NodeId {
        NodeId(0)
    }

    fn add_subsystem(
        &mut self,
        parent: NodeId,
        name: &str,
        subsystem: Subsystem,
        promote_all: bool,
    ) -> Result<NodeId> {
        let engine_error = |message: String| Error::Engine { message };

        if name.is_empty() || name.contains('.') {
            return Err(engine_error(format!("'{name}' is not a valid subsystem name")));
        }
        let parent_node = self
            .node(parent)
            .ok_or_else(|| engine_error(format!("cannot add '{name}' under a missing node")))?;
        if let Subsystem::Component(component) = &parent_node.subsystem {
            return Err(engine_error(format!(
                "cannot add '{name}' under component '{}' ({})",
                parent_node.name,
                component.id()
            )));
        }
        if self.child(parent, name).is_some() {
            return Err(engine_error(format!(
                "'{}' already has a subsystem named '{name}'",
                parent_node.name
            )));
        }

        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            name: name.to_string(),
            subsystem,
            promote_all,
            attributes: IndexMap::new(),
            children: Vec::new(),
        });
        self.nodes[parent.0].children.push(id);
        self.resolved = None;
        log::debug!("Added subsystem '{name}'");
        Ok(id)
    }

    fn set_attribute(
        &mut self,
        node: NodeId,
        name: &str,
        value: AttrValue,
    ) -> std::result::Result<(), AttributeError> {
        check_attribute_name(name)?;
        let node = self
            .nodes
            .get_mut(node.0)
            .ok_or(AttributeError::UnknownNode)?;
        log::debug!("Set attribute '{name}' = {value} on '{}'", node.name);
        node.attributes.insert(name.to_string(), value);
        Ok(())
    }

    fn add_design_var(&mut self, params: &ParameterMap) -> Result<()> {
        self.design_vars.push(params.clone());
        Ok(())
    }

    fn add_objective(&mut self, params: &ParameterMap) -> Result<()> {
        self.objectives.push(params.clone());
        Ok(())
    }

    fn add_constraint(&mut self, params: &ParameterMap) -> Result<()> {
        self.constraints.push(params.clone());
        Ok(())
    }

    fn setup(&mut self) -> Result<()> {
        let namespace = self.resolve(self.root());
        log::debug!(
            "Setup: {} node(s), {} input(s), {} output(s)",
            self.nodes.len(),
            namespace.inputs.len(),
            namespace.outputs.len()
        );
        self.resolved = Some(namespace);
        self.setup_count += 1;
        Ok(())
    }

    fn needed_inputs(&self) -> Result<VariableSet> {
        let namespace = self.resolved()?;
        Ok(namespace
            .inputs
            .iter()
            .filter(|(name, _)| !namespace.outputs.contains_key(*name))
            .map(|(name, variable)| (name.clone(), variable.clone()))
            .collect())
    }

    fn variables(&self) -> Result<VariableSet> {
        let namespace = self.resolved()?;
        let mut variables: VariableSet = namespace
            .outputs
            .iter()
            .map(|(name, variable)| (name.clone(), variable.clone()))
            .collect();
        for (name, variable) in &namespace.inputs {
            if !variables.contains(name) {
                variables.insert(name.clone(), variable.clone());
            }
        }
        Ok(variables)
    }
}
