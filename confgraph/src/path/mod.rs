//! Path handling for configuration documents.
//!
//! Every path-valued top-level key of a document (`module_folders`,
//! `input_file`, `output_file`) is relative to the directory holding the
//! document. Resolution is purely lexical:
//!
//! - a leading `~` is expanded to the home directory,
//! - relative paths are joined onto the document directory,
//! - `.` and `..` components are collapsed.
//!
//! # Examples
//!
//! ```
//! use confgraph::path::PathResolver;
//! use std::path::Path;
//!
//! let resolver = PathResolver::new("/projects/wing");
//! let folder = resolver.resolve(Path::new("./modules")).unwrap();
//! assert_eq!(folder, Path::new("/projects/wing/modules"));
//! ```

pub mod normalize;
pub mod resolver;

#[cfg(all(test, feature = "property-tests"))]
mod proptests;

pub use resolver::{document_dir, PathResolver};
