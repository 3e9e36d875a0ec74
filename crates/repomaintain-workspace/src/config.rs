use std::path::{Path, PathBuf};

use serde_json::{Map, Value};

use crate::error::WorkspaceError;

const CONFIG_FILE: &str = "scope.json";
const CONFIG_KEY: &str = "repomaintain";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishMode {
    All,
    Independent,
}

impl PublishMode {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Independent => "independent",
        }
    }

    fn parse(value: &str) -> Option<Self> {
        match value {
            "all" => Some(Self::All),
            "independent" => Some(Self::Independent),
            _ => None,
        }
    }
}

/// The `repomaintain` section of the repository's `scope.json`.
///
/// Unknown or malformed values fall back to the defaults; the rest of the
/// file belongs to other tooling and is never interpreted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryConfig {
    pub publish_mode: Option<PublishMode>,
    pub publish_tag_name: Option<String>,
    pub indent: usize,
}

impl Default for RepositoryConfig {
    fn default() -> Self {
        Self {
            publish_mode: None,
            publish_tag_name: None,
            indent: 2,
        }
    }
}

impl RepositoryConfig {
    /// # Errors
    ///
    /// Returns an error if `scope.json` is missing or not valid JSON.
    pub fn load(root: &Path) -> Result<Self, WorkspaceError> {
        let path = config_path(root);
        let doc = read_document(&path)?;

        let mut config = Self::default();
        let Some(section) = doc.get(CONFIG_KEY).and_then(Value::as_object) else {
            return Ok(config);
        };

        if let Some(mode) = section.get("publish_mode").and_then(Value::as_str) {
            config.publish_mode = PublishMode::parse(mode);
        }
        if let Some(tag_name) = section.get("publish_tag_name").and_then(Value::as_str) {
            config.publish_tag_name = Some(tag_name.to_string());
        }
        if let Some(indent) = section.get("indent").and_then(Value::as_u64) {
            config.indent = usize::try_from(indent).unwrap_or(2);
        }

        Ok(config)
    }

    /// Write the given values into the `repomaintain` section, leaving every
    /// other key of `scope.json` untouched. `None` values keep their stored
    /// counterpart.
    ///
    /// # Errors
    ///
    /// Returns an error if `scope.json` cannot be read, parsed, or written.
    pub fn store(
        root: &Path,
        publish_mode: Option<PublishMode>,
        publish_tag_name: Option<&str>,
    ) -> Result<(), WorkspaceError> {
        let path = config_path(root);
        let mut doc = read_document(&path)?;
        let indent = Self::load(root)?.indent;

        let section = doc
            .entry(CONFIG_KEY.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        if let Some(section) = section.as_object_mut() {
            if let Some(mode) = publish_mode {
                section.insert(
                    "publish_mode".to_string(),
                    Value::String(mode.as_str().to_string()),
                );
            }
            if let Some(tag_name) = publish_tag_name {
                section.insert(
                    "publish_tag_name".to_string(),
                    Value::String(tag_name.to_string()),
                );
            }
        }

        write_document(&path, &doc, indent)
    }
}

fn config_path(root: &Path) -> PathBuf {
    root.join(CONFIG_FILE)
}

fn read_document(path: &Path) -> Result<Map<String, Value>, WorkspaceError> {
    let raw = std::fs::read_to_string(path).map_err(|source| WorkspaceError::ConfigRead {
        path: path.to_path_buf(),
        source,
    })?;

    serde_json::from_str(&raw).map_err(|source| WorkspaceError::ConfigParse {
        path: path.to_path_buf(),
        source,
    })
}

fn write_document(
    path: &Path,
    doc: &Map<String, Value>,
    indent: usize,
) -> Result<(), WorkspaceError> {
    let indent_str = " ".repeat(indent);
    let formatter = serde_json::ser::PrettyFormatter::with_indent(indent_str.as_bytes());
    let mut buf = Vec::new();
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);

    serde::Serialize::serialize(doc, &mut serializer).map_err(|source| {
        WorkspaceError::ConfigParse {
            path: path.to_path_buf(),
            source,
        }
    })?;
    buf.push(b'\n');

    std::fs::write(path, buf).map_err(|source| WorkspaceError::ConfigWrite {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_scope(dir: &Path, content: &str) {
        std::fs::write(dir.join("scope.json"), content).expect("write scope.json");
    }

    #[test]
    fn loads_configured_values() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        write_scope(
            dir.path(),
            r#"{
  "scopes": ["@shapediver"],
  "repomaintain": {
    "publish_mode": "all",
    "publish_tag_name": "viewer",
    "indent": 4
  }
}"#,
        );

        let config = RepositoryConfig::load(dir.path())?;

        assert_eq!(config.publish_mode, Some(PublishMode::All));
        assert_eq!(config.publish_tag_name.as_deref(), Some("viewer"));
        assert_eq!(config.indent, 4);
        Ok(())
    }

    #[test]
    fn missing_section_yields_defaults() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        write_scope(dir.path(), r#"{"scopes": []}"#);

        let config = RepositoryConfig::load(dir.path())?;

        assert_eq!(config, RepositoryConfig::default());
        Ok(())
    }

    #[test]
    fn unknown_publish_mode_is_ignored() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        write_scope(dir.path(), r#"{"repomaintain": {"publish_mode": "sometimes"}}"#);

        let config = RepositoryConfig::load(dir.path())?;

        assert_eq!(config.publish_mode, None);
        Ok(())
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = tempfile::tempdir().expect("create temp dir");

        let result = RepositoryConfig::load(dir.path());

        assert!(matches!(result, Err(WorkspaceError::ConfigRead { .. })));
    }

    #[test]
    fn store_merges_without_touching_other_keys() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        write_scope(
            dir.path(),
            r#"{
  "scopes": ["@shapediver"],
  "repomaintain": {
    "publish_tag_name": "viewer"
  }
}"#,
        );

        RepositoryConfig::store(dir.path(), Some(PublishMode::Independent), None)?;

        let raw = std::fs::read_to_string(dir.path().join("scope.json"))?;
        assert!(raw.contains("\"scopes\""));
        assert!(raw.contains("\"publish_mode\": \"independent\""));
        // Stored tag name survives a partial update.
        assert!(raw.contains("\"publish_tag_name\": \"viewer\""));
        assert!(raw.ends_with('\n'));

        let config = RepositoryConfig::load(dir.path())?;
        assert_eq!(config.publish_mode, Some(PublishMode::Independent));
        assert_eq!(config.publish_tag_name.as_deref(), Some("viewer"));
        Ok(())
    }

    #[test]
    fn store_creates_section_when_absent() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        write_scope(dir.path(), r#"{"scopes": []}"#);

        RepositoryConfig::store(dir.path(), None, Some("platform"))?;

        let config = RepositoryConfig::load(dir.path())?;
        assert_eq!(config.publish_tag_name.as_deref(), Some("platform"));
        Ok(())
    }
}
