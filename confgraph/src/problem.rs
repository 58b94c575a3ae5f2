//! Problem configuration from a document.

use std::path::Path;

use crate::builder::GraphBuilder;
use crate::document::{ConfigurationDocument, TABLE_PROBLEM};
use crate::error::{Error, Result};
use crate::expr::EvalContext;
use crate::graph::{GraphEngine, Model, Subsystem};
use crate::io::VariableIo;
use crate::registry::{Component, ComponentRegistry};
use crate::variables::{self, VariableRole};

/// Name of the subsystem holding the variables read from the input file.
pub const INPUTS_SUBSYSTEM: &str = "inputs";

/// A problem whose graph is described by a configuration document.
///
/// # Examples
///
/// ```no_run
/// use confgraph::ConfiguredProblem;
/// use std::path::Path;
///
/// let mut problem = ConfiguredProblem::new();
/// problem.configure(Path::new("problem.toml")).unwrap();
/// problem.write_needed_inputs().unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct ConfiguredProblem<E: GraphEngine = Model> {
    registry: ComponentRegistry,
    context: EvalContext,
    document: Option<ConfigurationDocument>,
    engine: Option<E>,
}

impl Default for ConfiguredProblem<Model> {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfiguredProblem<Model> {
    /// An unconfigured problem with an empty registry and the default
    /// expression context.
    #[must_use]
    pub fn new() -> Self {
        Self::with_registry(ComponentRegistry::new())
    }
}

impl<E: GraphEngine> ConfiguredProblem<E> {
    /// An unconfigured problem starting from `registry`. Module folders
    /// listed by the document are explored into it.
    #[must_use]
    pub fn with_registry(registry: ComponentRegistry) -> Self {
        Self {
            registry,
            context: EvalContext::default(),
            document: None,
            engine: None,
        }
    }

    /// Replaces the names visible to attribute expressions.
    #[must_use]
    pub fn with_context(mut self, context: EvalContext) -> Self {
        self.context = context;
        self
    }

    /// Loads the document at `path` and assembles the graph.
    ///
    /// # Errors
    ///
    /// See [`configure_document`](Self::configure_document); loading can
    /// also fail on unreadable or malformed documents.
    pub fn configure(&mut self, path: &Path) -> Result<()> {
        let document = ConfigurationDocument::load(path)?;
        self.configure_document(document)
    }

    /// Assembles the graph described by `document`.
    ///
    /// Module folders are explored (missing ones are skipped with a
    /// warning), the problem table is built into a fresh graph, objectives
    /// and constraints are registered, and setup runs. On failure the
    /// previous graph, if any, is discarded and nothing partial is kept.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingProblemDefinition`] if the problem table is
    /// absent or empty, a qualified-key error rooted at `problem` for a
    /// failing attribute, or any discovery or engine error.
    pub fn configure_document(&mut self, document: ConfigurationDocument) -> Result<()> {
        self.engine = None;
        self.document = None;

        for folder in document.module_folders() {
            if folder.exists() {
                self.registry.explore(folder)?;
            } else {
                log::warn!("SKIPPED {}: it does not exist.", folder.display());
            }
        }

        let table = document.problem()?;

        let mut engine = E::new_root();
        let root = engine.root();
        GraphBuilder::new(&self.registry, &self.context)
            .build(&mut engine, root, TABLE_PROBLEM, table)
            .map_err(|err| {
                let err = err.within(TABLE_PROBLEM);
                if err.as_qualified_key().is_some() {
                    log::error!("{err}");
                }
                err
            })?;

        variables::register(&mut engine, document.bindings_for(VariableRole::Objective))?;
        variables::register(&mut engine, document.bindings_for(VariableRole::Constraint))?;
        engine.setup()?;

        log::info!("Configured problem from {}", document.origin());
        self.engine = Some(engine);
        self.document = Some(document);
        Ok(())
    }

    /// Attaches the variables of the input file as an `inputs` subsystem,
    /// reruns setup, then registers the design variables. Does nothing if
    /// the document names no input file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotConfigured`] before a successful configure, or
    /// an error if the file cannot be read or the engine refuses the
    /// subsystem (for instance on a second call).
    pub fn read_inputs(&mut self) -> Result<()> {
        let (document, engine) = match (&self.document, &mut self.engine) {
            (Some(document), Some(engine)) => (document, engine),
            _ => return Err(Error::NotConfigured),
        };
        let Some(input_file) = document.input_file() else {
            return Ok(());
        };

        let variables = VariableIo::new(input_file).read()?;
        log::info!("Read {} input(s) from {}", variables.len(), input_file.display());

        let root = engine.root();
        let inputs = Component::from_variables(INPUTS_SUBSYSTEM, &variables);
        engine.add_subsystem(root, INPUTS_SUBSYSTEM, Subsystem::Component(inputs), true)?;
        engine.setup()?;
        variables::register(engine, document.bindings_for(VariableRole::DesignVar))?;
        Ok(())
    }

    /// Writes every input that no output feeds, with its default value, to
    /// the input file. Does nothing if the document names no input file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotConfigured`] before a successful configure, or
    /// an error if the file cannot be written.
    pub fn write_needed_inputs(&self) -> Result<()> {
        let (document, engine) = self.configured()?;
        let Some(input_file) = document.input_file() else {
            return Ok(());
        };
        VariableIo::new(input_file).write(&engine.needed_inputs()?)
    }

    /// Writes every variable of the graph to the output file. Does nothing
    /// if the document names no output file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotConfigured`] before a successful configure, or
    /// an error if the file cannot be written.
    pub fn write_outputs(&self) -> Result<()> {
        let (document, engine) = self.configured()?;
        let Some(output_file) = document.output_file() else {
            return Ok(());
        };
        VariableIo::new(output_file).write(&engine.variables()?)
    }

    fn configured(&self) -> Result<(&ConfigurationDocument, &E)> {
        match (&self.document, &self.engine) {
            (Some(document), Some(engine)) => Ok((document, engine)),
            _ => Err(Error::NotConfigured),
        }
    }

    /// The assembled graph, once configured.
    #[must_use]
    pub const fn engine(&self) -> Option<&E> {
        self.engine.as_ref()
    }

    /// The document of the last successful configure.
    #[must_use]
    pub const fn document(&self) -> Option<&ConfigurationDocument> {
        self.document.as_ref()
    }

    /// The component registry.
    #[must_use]
    pub const fn registry(&self) -> &ComponentRegistry {
        &self.registry
    }

    /// The expression context.
    #[must_use]
    pub const fn context(&self) -> &EvalContext {
        &self.context
    }
}
