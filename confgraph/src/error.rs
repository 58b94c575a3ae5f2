//! Error types for the confgraph library.
//!
//! Structural problems (unreadable documents, a missing problem table,
//! unknown components) abort assembly immediately. Problems with individual
//! attribute leaves are reported as a [`QualifiedKeyError`], which carries the
//! dotted path from the problem root down to the offending leaf.

use std::path::PathBuf;

use thiserror::Error;

use crate::expr::EvalError;
use crate::graph::AttributeError;

/// Result type alias for operations that may fail with a confgraph error.
///
/// # Examples
///
/// ```
/// use confgraph::{Error, Result};
///
/// fn example_operation() -> Result<usize> {
///     Ok(3)
/// }
/// ```
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for the confgraph library.
#[derive(Debug, Error)]
pub enum Error {
    /// The configuration document could not be parsed.
    #[error("cannot parse configuration document {origin}: {message}")]
    DocumentParse {
        /// Where the document came from (file path or `<memory>`).
        origin: String,
        /// Parser message.
        message: String,
    },

    /// The document has no (or an empty) problem table.
    #[error("section [{}] is missing", crate::document::TABLE_PROBLEM)]
    MissingProblemDefinition,

    /// An attribute leaf could not be evaluated or assigned.
    #[error(transparent)]
    QualifiedKey(#[from] QualifiedKeyError),

    /// A component table references an id the registry does not know.
    #[error("no component registered under id '{id}'")]
    UnknownComponent {
        /// The requested identifier.
        id: String,
    },

    /// A component manifest found during discovery is malformed.
    #[error("invalid component manifest {}: {message}", path.display())]
    InvalidComponent {
        /// The manifest file.
        path: PathBuf,
        /// What is wrong with it.
        message: String,
    },

    /// A path could not be resolved.
    #[error("invalid path {}: {reason}", path.display())]
    InvalidPath {
        /// The offending path.
        path: PathBuf,
        /// The reason the path is invalid.
        reason: String,
    },

    /// A variable data file could not be read or written.
    #[error("invalid variable file {}: {message}", path.display())]
    DataFile {
        /// The data file.
        path: PathBuf,
        /// What went wrong.
        message: String,
    },

    /// The graph engine refused an operation.
    #[error("graph engine error: {message}")]
    Engine {
        /// Details from the engine.
        message: String,
    },

    /// An operation needs a configured problem.
    #[error("problem has not been configured")]
    NotConfigured,

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Prepends `prefix` to the key path of a qualified-key error.
    ///
    /// Every other variant is returned unchanged.
    #[must_use]
    pub fn within(self, prefix: &str) -> Self {
        match self {
            Self::QualifiedKey(err) => Self::QualifiedKey(err.within(prefix)),
            other => other,
        }
    }

    /// Returns the qualified-key error, if this is one.
    #[must_use]
    pub fn as_qualified_key(&self) -> Option<&QualifiedKeyError> {
        match self {
            Self::QualifiedKey(err) => Some(err),
            _ => None,
        }
    }
}

/// The reason an attribute leaf was rejected.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AttributeFailure {
    /// The leaf expression did not evaluate.
    #[error(transparent)]
    Eval(#[from] EvalError),

    /// The engine refused the assignment.
    #[error(transparent)]
    Assign(#[from] AttributeError),
}

/// A failure on an attribute leaf, located by its dotted key path.
///
/// Composing never nests: [`within`](Self::within) only grows the key, the
/// offending value and the root cause always come from the leaf itself.
///
/// # Examples
///
/// ```
/// use confgraph::error::QualifiedKeyError;
/// use confgraph::expr::EvalError;
///
/// let leaf = QualifiedKeyError::new("cl", "bad_expr(", EvalError::UnknownName("x".into()));
/// let err = leaf.within("aero").within("wing").within("problem");
///
/// assert_eq!(err.key(), "problem.wing.aero.cl");
/// assert_eq!(err.value(), "bad_expr(");
/// ```
#[derive(Debug, Clone, PartialEq, Error)]
#[error("attribute or value not recognized: {key} = \"{value}\"\noriginal error: {cause}")]
pub struct QualifiedKeyError {
    key: String,
    value: String,
    #[source]
    cause: AttributeFailure,
}

impl QualifiedKeyError {
    /// Creates an error for the leaf `key` holding `value`.
    pub fn new(
        key: impl Into<String>,
        value: impl Into<String>,
        cause: impl Into<AttributeFailure>,
    ) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            cause: cause.into(),
        }
    }

    /// Wraps this error one level up, giving the key `"<prefix>.<key>"`.
    #[must_use]
    pub fn within(mut self, prefix: &str) -> Self {
        self.key = format!("{prefix}.{}", self.key);
        self
    }

    /// The dotted key path.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The offending value as written in the document.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }

    /// The root cause.
    #[must_use]
    pub const fn cause(&self) -> &AttributeFailure {
        &self.cause
    }
}
