//! Resolution of document-relative paths.

use std::env;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::path::normalize::{collapse_dots, expand_home};

/// Resolves paths found in a configuration document against the
/// directory the document lives in.
///
/// # Examples
///
/// ```
/// use confgraph::path::PathResolver;
/// use std::path::{Path, PathBuf};
///
/// let resolver = PathResolver::new("/work/conf");
/// assert_eq!(
///     resolver.resolve(Path::new("../data/inputs.yaml")).unwrap(),
///     PathBuf::from("/work/data/inputs.yaml")
/// );
/// assert_eq!(
///     resolver.resolve(Path::new("/abs/modules")).unwrap(),
///     PathBuf::from("/abs/modules")
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathResolver {
    base_dir: PathBuf,
}

impl PathResolver {
    /// Creates a resolver rooted at `base_dir`.
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    /// Creates a resolver rooted at the directory containing `document`.
    ///
    /// # Errors
    ///
    /// Returns an error if the current directory is needed and unavailable.
    pub fn for_document(document: &Path) -> Result<Self> {
        Ok(Self::new(document_dir(document)?))
    }

    /// The directory relative paths are resolved against.
    #[must_use]
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Resolve `path`: expand `~`, join relative paths onto the base
    /// directory, then collapse `.` and `..`.
    ///
    /// # Errors
    ///
    /// Returns an error if home expansion fails or `..` escapes the root.
    pub fn resolve(&self, path: &Path) -> Result<PathBuf> {
        let expanded = expand_home(path)?;
        let joined = if expanded.is_absolute() {
            expanded
        } else {
            self.base_dir.join(expanded)
        };
        collapse_dots(&joined)
    }
}

/// The absolute directory containing `document`.
///
/// # Errors
///
/// Returns an error if `document` is relative and the current directory
/// cannot be determined.
pub fn document_dir(document: &Path) -> Result<PathBuf> {
    let absolute = if document.is_absolute() {
        document.to_path_buf()
    } else {
        let cwd = env::current_dir().map_err(|e| Error::InvalidPath {
            path: document.to_path_buf(),
            reason: format!("cannot get current directory: {e}"),
        })?;
        cwd.join(document)
    };

    let absolute = collapse_dots(&absolute)?;
    Ok(absolute
        .parent()
        .map_or_else(|| absolute.clone(), Path::to_path_buf))
}
