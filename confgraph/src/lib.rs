#![deny(missing_docs, unsafe_code)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

//! # confgraph
//!
//! A library for assembling hierarchical computation graphs from
//! declarative configuration documents.
//!
//! A document names the folders holding component manifests, the variable
//! files to read and write, and a nested `problem` table. Each nested table
//! becomes a group of the graph, a table with an `id` key becomes a
//! registered component, and every other value is evaluated with a small
//! expression language and set as an attribute of the enclosing group.
//!
//! ## Core Types
//!
//! - [`ConfiguredProblem`]: loads a document and assembles its graph
//! - [`ConfigurationDocument`]: a parsed document with its paths resolved
//! - [`ComponentRegistry`]: components discovered in module folders
//! - [`GraphEngine`] and [`Model`]: the graph being assembled
//! - [`Error`] and [`Result`]: Error handling types
//! - [`Logger`] and [`LogLevel`]: Logging infrastructure
//!
//! ## Examples
//!
//! ```
//! use confgraph::document::{ConfigurationDocument, DocumentFormat};
//! use confgraph::expr::AttrValue;
//! use confgraph::registry::{ComponentRegistry, ComponentSpec};
//! use confgraph::{ConfiguredProblem, GraphEngine};
//!
//! let mut registry = ComponentRegistry::new();
//! registry.register(ComponentSpec::new("my.component")).unwrap();
//!
//! let text = r#"
//! [problem.mygroup]
//! comp = { id = "my.component" }
//! factor = "2*3"
//! "#;
//! let doc = ConfigurationDocument::from_str(text, DocumentFormat::Toml, ".").unwrap();
//!
//! let mut problem: ConfiguredProblem = ConfiguredProblem::with_registry(registry);
//! problem.configure_document(doc).unwrap();
//!
//! let model = problem.engine().unwrap();
//! let mygroup = model.find("mygroup").unwrap();
//! assert_eq!(model.attribute(mygroup, "factor"), Some(&AttrValue::Int(6)));
//! ```

pub mod builder;
pub mod document;
pub mod error;
pub mod expr;
pub mod graph;
pub mod io;
pub mod logging;
pub mod output;
pub mod path;
pub mod problem;
pub mod registry;
pub mod variables;

// Re-export key types at crate root for convenience
pub use builder::GraphBuilder;
pub use document::{ConfigurationDocument, DocumentFormat};
pub use error::{Error, QualifiedKeyError, Result};
pub use expr::{AttrValue, EvalContext, EvalError};
pub use graph::{GraphEngine, Model, NodeSnapshot};
pub use io::{Variable, VariableIo, VariableSet};
pub use logging::{init_logger, LogLevel, Logger};
pub use output::{OutputFormat, OutputFormatter};
pub use path::PathResolver;
pub use problem::ConfiguredProblem;
pub use registry::{Component, ComponentRegistry, ComponentSpec};
pub use variables::{VariableBinding, VariableRole};
