//! Serializable view of an assembled graph.

use indexmap::IndexMap;
use serde::Serialize;

use crate::expr::AttrValue;

/// Whether a node is a group or a component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    /// A group.
    Group,
    /// A component.
    Component,
}

/// A node and everything below it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeSnapshot {
    /// The key the node was added under.
    pub name: String,

    /// Group or component.
    pub kind: NodeKind,

    /// Registry id, for components.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub component: Option<String>,

    /// Whether the node's variables are promoted to its parent.
    pub promotes: bool,

    /// Attributes, in assignment order.
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub attributes: IndexMap<String, AttrValue>,

    /// Children, in insertion order.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<NodeSnapshot>,
}

impl NodeSnapshot {
    /// The direct child called `name`.
    #[must_use]
    pub fn child(&self, name: &str) -> Option<&Self> {
        self.children.iter().find(|child| child.name == name)
    }

    /// The descendant at the dotted `path`; `""` is this node.
    #[must_use]
    pub fn find(&self, path: &str) -> Option<&Self> {
        if path.is_empty() {
            return Some(self);
        }
        path.split('.').try_fold(self, |node, name| node.child(name))
    }

    /// Number of nodes in this subtree, this one included.
    #[must_use]
    pub fn count(&self) -> usize {
        1 + self.children.iter().map(Self::count).sum::<usize>()
    }

    /// Number of component nodes in this subtree.
    #[must_use]
    pub fn component_count(&self) -> usize {
        usize::from(self.kind == NodeKind::Component)
            + self.children.iter().map(Self::component_count).sum::<usize>()
    }

    /// Depth of this subtree: a leaf has depth 1.
    #[must_use]
    pub fn depth(&self) -> usize {
        1 + self.children.iter().map(Self::depth).max().unwrap_or(0)
    }
}
