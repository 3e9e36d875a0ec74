use std::path::{Path, PathBuf};

use repomaintain_core::DependencyKind;
use semver::Version;
use serde_json::{Map, Value};

use crate::error::ManifestError;

/// An order-preserving view of a `package.json` document.
///
/// The document is kept as a raw JSON object so that saving reproduces the
/// original key order; only the fields the tool touches get typed accessors.
#[derive(Debug, Clone)]
pub struct Manifest {
    path: PathBuf,
    doc: Map<String, Value>,
}

impl Manifest {
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not a JSON object.
    pub fn load(path: &Path) -> Result<Self, ManifestError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ManifestError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let doc = serde_json::from_str(&raw).map_err(|source| ManifestError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        Ok(Self {
            path: path.to_path_buf(),
            doc,
        })
    }

    /// Write the document back with two-space indentation and a trailing
    /// newline, matching what npm itself produces.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn save(&self) -> Result<(), ManifestError> {
        self.save_to(&self.path)
    }

    /// Write the document to `path` instead of its own location. Used when a
    /// backed-up manifest is written back to the live file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn save_to(&self, path: &Path) -> Result<(), ManifestError> {
        let mut rendered = serde_json::to_string_pretty(&self.doc).map_err(|source| {
            ManifestError::Parse {
                path: self.path.clone(),
                source,
            }
        })?;
        rendered.push('\n');

        std::fs::write(path, rendered).map_err(|source| ManifestError::Write {
            path: path.to_path_buf(),
            source,
        })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.doc.get("name").and_then(Value::as_str)
    }

    #[must_use]
    pub fn is_private(&self) -> bool {
        self.doc
            .get("private")
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }

    /// # Errors
    ///
    /// Returns an error if the `version` field is missing or not a valid
    /// semantic version.
    pub fn version(&self) -> Result<Version, ManifestError> {
        let raw = self
            .doc
            .get("version")
            .and_then(Value::as_str)
            .ok_or_else(|| ManifestError::MissingField {
                path: self.path.clone(),
                field: "version".to_string(),
            })?;

        Version::parse(raw).map_err(|source| ManifestError::InvalidVersion {
            path: self.path.clone(),
            version: raw.to_string(),
            source,
        })
    }

    pub fn set_version(&mut self, version: &Version) {
        self.doc.insert(
            "version".to_string(),
            Value::String(version.to_string()),
        );
    }

    /// String-valued entries of one dependency map, in document order.
    pub fn dependencies(&self, kind: DependencyKind) -> impl Iterator<Item = (&str, &str)> {
        self.doc
            .get(kind.manifest_key())
            .and_then(Value::as_object)
            .into_iter()
            .flat_map(|map| {
                map.iter()
                    .filter_map(|(name, range)| Some((name.as_str(), range.as_str()?)))
            })
    }

    #[must_use]
    pub fn dependency_range(&self, kind: DependencyKind, name: &str) -> Option<&str> {
        self.doc
            .get(kind.manifest_key())
            .and_then(Value::as_object)
            .and_then(|map| map.get(name))
            .and_then(Value::as_str)
    }

    /// Rewrite an existing entry in place. Returns false when the entry does
    /// not exist; the map itself is never created.
    pub fn set_dependency(&mut self, kind: DependencyKind, name: &str, range: &str) -> bool {
        let Some(map) = self
            .doc
            .get_mut(kind.manifest_key())
            .and_then(Value::as_object_mut)
        else {
            return false;
        };

        match map.get_mut(name) {
            Some(entry) => {
                *entry = Value::String(range.to_string());
                true
            }
            None => false,
        }
    }

    /// Remove an entry, returning its previous range when it existed.
    pub fn remove_dependency(&mut self, kind: DependencyKind, name: &str) -> Option<String> {
        let map = self
            .doc
            .get_mut(kind.manifest_key())
            .and_then(Value::as_object_mut)?;

        match map.remove(name)? {
            Value::String(range) => Some(range),
            _ => Some(String::new()),
        }
    }
}
