use std::path::{Path, PathBuf};

use repomaintain_core::{Component, ProcessRunner};
use semver::Version;
use serde::Deserialize;
use tracing::warn;

use crate::error::WorkspaceError;

#[derive(Debug, Deserialize)]
struct RawComponent {
    name: String,
    #[serde(default)]
    version: Option<String>,
    #[serde(default)]
    private: bool,
    location: String,
}

/// List all Lerna-managed components in topological order, with a synthetic
/// private root component appended.
///
/// A failing or garbled `lerna list` is fatal; nothing has been mutated at
/// this point.
pub fn discover(root: &Path, runner: &ProcessRunner) -> Result<Vec<Component>, WorkspaceError> {
    let output = runner.run_captured(
        "npx",
        &["lerna", "list", "--all", "--toposort", "--json"],
        root,
    )?;

    let raw: Vec<RawComponent> =
        serde_json::from_str(&output).map_err(WorkspaceError::ComponentList)?;

    let mut components: Vec<Component> = raw.into_iter().map(into_component).collect();
    components.push(Component::root(normalize_location(
        &root.to_string_lossy(),
    )));

    Ok(components)
}

fn into_component(raw: RawComponent) -> Component {
    let version = raw.version.as_deref().and_then(|v| match Version::parse(v) {
        Ok(version) => Some(version),
        Err(_) => {
            warn!(component = raw.name, version = v, "component version is not semver");
            None
        }
    });

    Component {
        name: raw.name,
        version,
        private: raw.private,
        location: normalize_location(&raw.location),
    }
}

// Shell scripts receive these paths as arguments; backslashes would need a
// second round of escaping in Git-Bash, so forward slashes are used
// everywhere.
fn normalize_location(location: &str) -> PathBuf {
    PathBuf::from(location.replace('\\', "/"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> Vec<Component> {
        let raw: Vec<RawComponent> = serde_json::from_str(json).expect("parse component list");
        raw.into_iter().map(into_component).collect()
    }

    #[test]
    fn parses_lerna_output_in_order() {
        let components = parse(
            r#"[
  {"name": "@scope/shared", "version": "1.2.0", "private": false, "location": "/repo/packages/shared"},
  {"name": "@scope/viewer", "version": "1.2.0", "private": false, "location": "/repo/packages/viewer"},
  {"name": "@scope/internal", "version": "0.0.1", "private": true, "location": "/repo/packages/internal"}
]"#,
        );

        assert_eq!(components.len(), 3);
        assert_eq!(components[0].name, "@scope/shared");
        assert_eq!(components[1].name, "@scope/viewer");
        assert!(components[2].private);
        assert_eq!(
            components[0].version,
            Some(Version::new(1, 2, 0))
        );
    }

    #[test]
    fn invalid_version_becomes_none() {
        let components = parse(
            r#"[{"name": "odd", "version": "not-a-version", "private": false, "location": "/repo/odd"}]"#,
        );

        assert_eq!(components[0].version, None);
    }

    #[test]
    fn locations_use_forward_slashes() {
        let components = parse(
            r#"[{"name": "win", "version": "1.0.0", "private": false, "location": "C:\\repo\\packages\\win"}]"#,
        );

        assert_eq!(
            components[0].location,
            PathBuf::from("C:/repo/packages/win")
        );
    }

    #[test]
    fn root_component_is_appended() -> anyhow::Result<()> {
        let root = Component::root(PathBuf::from("/repo"));
        assert!(root.is_root());
        assert!(root.private);
        assert_eq!(root.version, None);
        Ok(())
    }
}
