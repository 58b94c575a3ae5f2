//! Recursive translation of a problem table into graph nodes.

use crate::document::{ComponentRef, Entry, GroupTable, Table};
use crate::error::{QualifiedKeyError, Result};
use crate::expr::{evaluate_literal, EvalContext};
use crate::graph::{GraphEngine, Subsystem};
use crate::registry::ComponentRegistry;

/// Builds graph nodes from problem tables.
///
/// The registry is only read. Every subsystem is added with all its
/// variables promoted.
///
/// # Examples
///
/// ```
/// use confgraph::builder::GraphBuilder;
/// use confgraph::document::{ConfigurationDocument, DocumentFormat};
/// use confgraph::expr::{AttrValue, EvalContext};
/// use confgraph::graph::{GraphEngine, Model};
/// use confgraph::registry::{ComponentRegistry, ComponentSpec};
///
/// let mut registry = ComponentRegistry::new();
/// registry.register(ComponentSpec::new("my.component")).unwrap();
///
/// let text = "[problem.mygroup]\nfactor = \"2*3\"\ncomp.id = \"my.component\"";
/// let doc = ConfigurationDocument::from_str(text, DocumentFormat::Toml, ".").unwrap();
///
/// let context = EvalContext::default();
/// let builder = GraphBuilder::new(&registry, &context);
/// let mut model = Model::new_root();
/// let root = model.root();
/// builder.build(&mut model, root, "problem", doc.problem().unwrap()).unwrap();
///
/// let mygroup = model.find("mygroup").unwrap();
/// assert_eq!(model.attribute(mygroup, "factor"), Some(&AttrValue::Int(6)));
/// assert!(model.find("mygroup.comp").is_some());
/// ```
#[derive(Debug, Clone, Copy)]
pub struct GraphBuilder<'a> {
    registry: &'a ComponentRegistry,
    context: &'a EvalContext,
}

impl<'a> GraphBuilder<'a> {
    /// A builder reading components from `registry` and evaluating
    /// attributes in `context`.
    #[must_use]
    pub const fn new(registry: &'a ComponentRegistry, context: &'a EvalContext) -> Self {
        Self { registry, context }
    }

    /// Feeds `node` from `table`, found under the key `identifier`.
    ///
    /// A component table attaches one component under `node`, named
    /// `identifier`. A group table is walked in document order: nested
    /// tables become child groups (or components) and other entries are
    /// evaluated and set as attributes of `node`.
    ///
    /// Returns `node`.
    ///
    /// # Errors
    ///
    /// A failing attribute is reported as a qualified-key error whose key
    /// is the path below `node`, e.g. `wing.aero.cl`; the caller prepends
    /// its own key. Unknown components and engine refusals abort as they
    /// are.
    pub fn build<E: GraphEngine>(
        &self,
        engine: &mut E,
        node: E::Node,
        identifier: &str,
        table: &Table,
    ) -> Result<E::Node> {
        match table {
            Table::Component(component) => {
                self.attach_component(engine, node, identifier, component)?;
            }
            Table::Group(group) => self.build_group(engine, node, group)?,
        }
        Ok(node)
    }

    fn attach_component<E: GraphEngine>(
        &self,
        engine: &mut E,
        parent: E::Node,
        identifier: &str,
        component: &ComponentRef,
    ) -> Result<E::Node> {
        for key in &component.ignored {
            log::warn!(
                "'{identifier}' selects component '{}'; its key '{key}' is ignored",
                component.id
            );
        }
        let instance = self.registry.get(&component.id)?;
        log::debug!("Adding component '{identifier}' ({})", component.id);
        engine.add_subsystem(parent, identifier, Subsystem::Component(instance), true)
    }

    fn build_group<E: GraphEngine>(
        &self,
        engine: &mut E,
        node: E::Node,
        group: &GroupTable,
    ) -> Result<()> {
        for (key, entry) in &group.entries {
            match entry {
                Entry::Table(Table::Component(component)) => {
                    self.attach_component(engine, node, key, component)?;
                }
                Entry::Table(nested @ Table::Group(_)) => {
                    log::debug!("Adding group '{key}'");
                    let child = engine.add_subsystem(node, key, Subsystem::Group, true)?;
                    self.build(engine, child, key, nested)
                        .map_err(|err| err.within(key))?;
                }
                Entry::Attribute(literal) => {
                    let value = evaluate_literal(literal, self.context)
                        .map_err(|err| QualifiedKeyError::new(key, literal.to_string(), err))?;
                    engine
                        .set_attribute(node, key, value)
                        .map_err(|err| QualifiedKeyError::new(key, literal.to_string(), err))?;
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{ConfigurationDocument, DocumentFormat};
    use crate::error::{AttributeFailure, Error};
    use crate::expr::{AttrValue, EvalError};
    use crate::graph::{AttributeError, Model, NodeKind};
    use crate::registry::ComponentSpec;

    fn registry() -> ComponentRegistry {
        let mut registry = ComponentRegistry::new();
        registry
            .register(ComponentSpec::new("my.component").with_output("y"))
            .unwrap();
        registry
    }

    fn build(text: &str) -> Result<Model> {
        let doc = ConfigurationDocument::from_str(text, DocumentFormat::Toml, ".").unwrap();
        let registry = registry();
        let context = EvalContext::default();
        let mut model = Model::new_root();
        let root = model.root();
        GraphBuilder::new(&registry, &context).build(&mut model, root, "problem", doc.problem()?)?;
        Ok(model)
    }

    #[test]
    fn test_group_nesting_mirrors_tables() {
        let model = build("[problem.a.b.c]\n[problem.a.d]\n[problem.e]").unwrap();
        let snapshot = model.snapshot();
        assert!(snapshot.find("a.b.c").is_some());
        assert!(snapshot.find("a.d").is_some());
        assert!(snapshot.find("e").is_some());
        assert_eq!(snapshot.count(), 6);
        assert_eq!(snapshot.component_count(), 0);
    }

    #[test]
    fn test_component_table_attaches_one_component() {
        let model = build("[problem.g.comp]\nid = \"my.component\"\nignored = 3").unwrap();
        let comp = model.snapshot().find("g.comp").cloned().unwrap();
        assert_eq!(comp.kind, NodeKind::Component);
        assert_eq!(comp.component.as_deref(), Some("my.component"));
        assert!(comp.attributes.is_empty());
        assert!(comp.children.is_empty());
    }

    #[test]
    fn test_attributes_are_set_on_the_enclosing_group() {
        let model = build("[problem.g]\nfactor = \"2*3\"\nflag = true\nratio = 0.5").unwrap();
        let g = model.find("g").unwrap();
        assert_eq!(model.attribute(g, "factor"), Some(&AttrValue::Int(6)));
        assert_eq!(model.attribute(g, "flag"), Some(&AttrValue::Bool(true)));
        assert_eq!(model.attribute(g, "ratio"), Some(&AttrValue::Float(0.5)));
    }

    #[test]
    fn test_root_attributes_go_on_the_root() {
        let model = build("[problem]\nmax_iter = \"10\"").unwrap();
        assert_eq!(
            model.attribute(model.root(), "max_iter"),
            Some(&AttrValue::Int(10))
        );
    }

    #[test]
    fn test_error_key_is_relative_to_the_built_node() {
        let err = build("[problem.wing.aero]\ncl = \"bad_expr(\"").unwrap_err();
        let qualified = err.as_qualified_key().unwrap();
        assert_eq!(qualified.key(), "wing.aero.cl");
        assert_eq!(qualified.value(), "bad_expr(");
        assert!(matches!(
            qualified.cause(),
            AttributeFailure::Eval(EvalError::Syntax { .. })
        ));
    }

    #[test]
    fn test_oversized_string_is_qualified() {
        let err = build("[problem.g]\nlabel = \"'x' * 9223372036854775807\"").unwrap_err();
        let qualified = err.as_qualified_key().unwrap();
        assert_eq!(qualified.key(), "g.label");
        assert_eq!(
            qualified.cause(),
            &AttributeFailure::Eval(EvalError::TooLarge { op: "*" })
        );
    }

    #[test]
    fn test_deeply_nested_expression_is_qualified() {
        let source = format!("{}1{}", "(".repeat(10_000), ")".repeat(10_000));
        let err = build(&format!("[problem.g]\nlimit = \"{source}\"")).unwrap_err();
        let qualified = err.as_qualified_key().unwrap();
        assert_eq!(qualified.key(), "g.limit");
        assert!(matches!(
            qualified.cause(),
            AttributeFailure::Eval(EvalError::Syntax { message, .. })
                if message == "expression nested too deeply"
        ));
    }

    #[test]
    fn test_assignment_failure_is_qualified() {
        let err = build("[problem.g]\nchildren = 1").unwrap_err();
        let qualified = err.as_qualified_key().unwrap();
        assert_eq!(qualified.key(), "g.children");
        assert_eq!(
            qualified.cause(),
            &AttributeFailure::Assign(AttributeError::Reserved {
                name: "children".into()
            })
        );
    }

    #[test]
    fn test_unknown_component_is_structural() {
        let err = build("[problem.g.comp]\nid = \"missing\"").unwrap_err();
        assert!(matches!(err, Error::UnknownComponent { id } if id == "missing"));
    }

    #[test]
    fn test_root_component_table() {
        let model = build("[problem]\nid = \"my.component\"").unwrap();
        let problem = model.snapshot().find("problem").cloned().unwrap();
        assert_eq!(problem.kind, NodeKind::Component);
    }
}
