//! Component registry and discovery.
//!
//! Components are declared in manifest files named `*.component.toml`,
//! `*.component.yaml` or `*.component.yml`. Each manifest holds one or more
//! `component` entries:
//!
//! ```toml
//! [[component]]
//! id = "my.component"
//! description = "Wing lift"
//! inputs = [{ name = "alpha", units = "deg", value = 2.0 }]
//! outputs = [{ name = "cl" }]
//! ```
//!
//! [`ComponentRegistry::explore`] walks a folder and registers every
//! manifest it finds. Lookups by id with [`ComponentRegistry::get`] return a
//! fresh [`Component`] each time.

mod component;

use std::fs;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use walkdir::WalkDir;

use crate::document::DocumentFormat;
use crate::error::{Error, Result};

pub use component::{Component, ComponentSpec, Manifest, VariableSpec};

/// File name suffixes that mark a component manifest.
pub const MANIFEST_SUFFIXES: &[&str] = &[".component.toml", ".component.yaml", ".component.yml"];

/// Maps component ids to their declarations.
///
/// Created empty, filled by [`explore`](Self::explore) and
/// [`register`](Self::register), then only read while a problem is built.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ComponentRegistry {
    specs: IndexMap<String, ComponentSpec>,
}

impl ComponentRegistry {
    /// An empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a component declaration. A later declaration with the
    /// same id replaces the earlier one.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidComponent`] if the declaration is invalid.
    pub fn register(&mut self, spec: ComponentSpec) -> Result<()> {
        self.register_from(spec, Path::new("<memory>"))
    }

    fn register_from(&mut self, spec: ComponentSpec, source: &Path) -> Result<()> {
        spec.validate().map_err(|message| Error::InvalidComponent {
            path: source.to_path_buf(),
            message,
        })?;

        match self.specs.get(&spec.id) {
            Some(previous) if *previous != spec => {
                log::warn!(
                    "Component '{}' redefined by {}; the new definition replaces the old one",
                    spec.id,
                    source.display()
                );
            }
            _ => {}
        }
        log::debug!("Registered component '{}'", spec.id);
        self.specs.insert(spec.id.clone(), spec);
        Ok(())
    }

    /// Scans `folder` recursively for manifests and registers their
    /// components, visiting files in sorted path order. Returns the number
    /// of components registered.
    ///
    /// # Errors
    ///
    /// Returns an error if the folder cannot be walked or a manifest cannot
    /// be read, parsed, or validated.
    pub fn explore(&mut self, folder: &Path) -> Result<usize> {
        let manifests = find_manifests(folder)?;

        let mut count = 0;
        for path in manifests {
            count += self.load_manifest(&path)?;
        }
        log::info!("Explored {}: {count} component(s)", folder.display());
        Ok(count)
    }

    fn load_manifest(&mut self, path: &Path) -> Result<usize> {
        let invalid = |message: String| Error::InvalidComponent {
            path: path.to_path_buf(),
            message,
        };

        let text = fs::read_to_string(path).map_err(|e| invalid(e.to_string()))?;
        let manifest: Manifest = DocumentFormat::from_path(path)
            .deserialize(&text)
            .map_err(invalid)?;

        let count = manifest.components.len();
        for spec in manifest.components {
            self.register_from(spec, path)?;
        }
        Ok(count)
    }

    /// Instantiates the component registered under `id`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownComponent`] if no component has that id.
    pub fn get(&self, id: &str) -> Result<Component> {
        self.specs
            .get(id)
            .map(Component::from_spec)
            .ok_or_else(|| Error::UnknownComponent { id: id.to_string() })
    }

    /// The declaration registered under `id`.
    #[must_use]
    pub fn spec(&self, id: &str) -> Option<&ComponentSpec> {
        self.specs.get(id)
    }

    /// Whether `id` is registered.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.specs.contains_key(id)
    }

    /// Registered ids, in registration order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.specs.keys().map(String::as_str)
    }

    /// Number of registered components.
    #[must_use]
    pub fn len(&self) -> usize {
        self.specs.len()
    }

    /// Whether the registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }
}

fn is_manifest(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| MANIFEST_SUFFIXES.iter().any(|suffix| name.ends_with(suffix)))
}

/// Paths of the manifests directly or indirectly under `folder`, sorted.
///
/// # Errors
///
/// Returns an error if the folder cannot be walked.
pub fn find_manifests(folder: &Path) -> Result<Vec<PathBuf>> {
    let mut found = Vec::new();
    for entry in WalkDir::new(folder).follow_links(true) {
        let entry = entry.map_err(|e| Error::InvalidPath {
            path: e.path().map_or_else(|| folder.to_path_buf(), Path::to_path_buf),
            reason: format!("cannot scan module folder: {e}"),
        })?;
        if entry.file_type().is_file() && is_manifest(entry.path()) {
            found.push(entry.into_path());
        }
    }
    found.sort();
    Ok(found)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const WING_MANIFEST: &str = r#"
[[component]]
id = "wing.aero"
description = "Wing aerodynamics"
inputs = [{ name = "alpha", units = "deg", value = 2.0 }]
outputs = [{ name = "cl" }]

[[component]]
id = "wing.mass"
outputs = [{ name = "mass", units = "kg" }]
"#;

    fn folder_with(files: &[(&str, &str)]) -> TempDir {
        let temp_dir = TempDir::new().unwrap();
        for (name, content) in files {
            let path = temp_dir.path().join(name);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, content).unwrap();
        }
        temp_dir
    }

    #[test]
    fn test_is_manifest() {
        assert!(is_manifest(Path::new("a/wing.component.toml")));
        assert!(is_manifest(Path::new("wing.component.yml")));
        assert!(!is_manifest(Path::new("wing.toml")));
        assert!(!is_manifest(Path::new("component.toml")));
    }

    #[test]
    fn test_explore_registers_nested_manifests() {
        let dir = folder_with(&[
            ("wing.component.toml", WING_MANIFEST),
            (
                "sub/engine.component.yaml",
                "component:\n  - id: engine\n    outputs:\n      - name: thrust\n",
            ),
            ("notes.toml", "not a manifest"),
        ]);

        let mut registry = ComponentRegistry::new();
        assert_eq!(registry.explore(dir.path()).unwrap(), 3);
        assert!(registry.contains("wing.aero"));
        assert!(registry.contains("engine"));
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn test_explore_order_is_sorted() {
        let dir = folder_with(&[
            ("b.component.toml", "[[component]]\nid = \"b\""),
            ("a.component.toml", "[[component]]\nid = \"a\""),
        ]);
        let mut registry = ComponentRegistry::new();
        registry.explore(dir.path()).unwrap();
        assert_eq!(registry.ids().collect::<Vec<_>>(), vec!["a", "b"]);
    }

    #[test]
    fn test_last_definition_wins() {
        let dir = folder_with(&[
            ("a.component.toml", "[[component]]\nid = \"x\"\ndescription = \"first\""),
            ("b.component.toml", "[[component]]\nid = \"x\"\ndescription = \"second\""),
        ]);
        let mut registry = ComponentRegistry::new();
        registry.explore(dir.path()).unwrap();
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.spec("x").unwrap().description.as_deref(), Some("second"));
    }

    #[test]
    fn test_invalid_manifest_is_reported_with_path() {
        let dir = folder_with(&[("bad.component.toml", "[[component]]\nname = \"x\"")]);
        let mut registry = ComponentRegistry::new();
        let err = registry.explore(dir.path()).unwrap_err();
        assert!(matches!(err, Error::InvalidComponent { ref path, .. } if path.ends_with("bad.component.toml")));
    }

    #[test]
    fn test_get_unknown_component() {
        let registry = ComponentRegistry::new();
        assert!(matches!(
            registry.get("nope"),
            Err(Error::UnknownComponent { id }) if id == "nope"
        ));
    }

    #[test]
    fn test_get_instantiates_component() {
        let dir = folder_with(&[("wing.component.toml", WING_MANIFEST)]);
        let mut registry = ComponentRegistry::new();
        registry.explore(dir.path()).unwrap();

        let component = registry.get("wing.aero").unwrap();
        assert_eq!(component.id(), "wing.aero");
        assert_eq!(component.inputs().get("alpha").unwrap().value, vec![2.0]);
        assert_eq!(component.outputs().get("cl").unwrap().value, vec![1.0]);
    }

    #[test]
    fn test_find_manifests() {
        let dir = folder_with(&[
            ("z.component.toml", "[[component]]\nid = \"z\""),
            ("inner/a.component.yml", "component: []"),
        ]);
        let found = find_manifests(dir.path()).unwrap();
        assert_eq!(found.len(), 2);
        assert!(found[0].ends_with("inner/a.component.yml"));
    }
}
