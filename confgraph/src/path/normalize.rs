//! Lexical path normalization.
//!
//! Nothing here touches the filesystem: module folders listed in a
//! configuration document may legitimately not exist yet, and input or
//! output files are often created later.

use std::path::{Component, Path, PathBuf};

use crate::error::{Error, Result};

/// Expand a leading `~` or `~/` to the home directory.
///
/// `~user` forms are rejected.
///
/// # Errors
///
/// Returns an error if the path is not valid UTF-8, the home directory is
/// unknown, or the `~user` form is used.
///
/// # Examples
///
/// ```
/// use confgraph::path::normalize::expand_home;
/// use std::path::Path;
///
/// let expanded = expand_home(Path::new("~/models")).unwrap();
/// assert!(expanded.ends_with("models"));
///
/// let untouched = expand_home(Path::new("relative/models")).unwrap();
/// assert_eq!(untouched, Path::new("relative/models"));
/// ```
pub fn expand_home(path: &Path) -> Result<PathBuf> {
    let Some(text) = path.to_str() else {
        return Err(Error::InvalidPath {
            path: path.to_path_buf(),
            reason: "path is not valid UTF-8".to_string(),
        });
    };

    let Some(rest) = text.strip_prefix('~') else {
        return Ok(path.to_path_buf());
    };

    let home = home::home_dir().ok_or_else(|| Error::InvalidPath {
        path: path.to_path_buf(),
        reason: "home directory is unknown".to_string(),
    })?;

    if rest.is_empty() {
        return Ok(home);
    }
    match rest.strip_prefix('/').or_else(|| rest.strip_prefix('\\')) {
        Some(tail) => Ok(home.join(tail)),
        None => Err(Error::InvalidPath {
            path: path.to_path_buf(),
            reason: "only ~ and ~/path are supported".to_string(),
        }),
    }
}

/// Drop `.` components and fold `..` into their parent.
///
/// # Errors
///
/// Returns an error if a `..` climbs above the root of an absolute path.
///
/// # Examples
///
/// ```
/// use confgraph::path::normalize::collapse_dots;
/// use std::path::{Path, PathBuf};
///
/// let collapsed = collapse_dots(Path::new("/conf/./models/../data")).unwrap();
/// assert_eq!(collapsed, PathBuf::from("/conf/data"));
/// ```
pub fn collapse_dots(path: &Path) -> Result<PathBuf> {
    let mut parts: Vec<Component<'_>> = Vec::new();

    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match parts.last() {
                Some(Component::Normal(_)) => {
                    parts.pop();
                }
                Some(Component::RootDir | Component::Prefix(_)) => {
                    return Err(Error::InvalidPath {
                        path: path.to_path_buf(),
                        reason: "'..' escapes the root directory".to_string(),
                    });
                }
                // Relative paths keep leading '..' segments.
                _ => parts.push(component),
            },
            other => parts.push(other),
        }
    }

    let collapsed: PathBuf = parts.iter().collect();
    if collapsed.as_os_str().is_empty() {
        Ok(PathBuf::from("."))
    } else {
        Ok(collapsed)
    }
}
