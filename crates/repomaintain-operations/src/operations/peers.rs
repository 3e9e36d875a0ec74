use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use repomaintain_core::{Component, DependencyKind};
use repomaintain_manifest::Manifest;
use repomaintain_range::{extract_anchor, satisfies};
use semver::Version;
use tracing::warn;

use crate::traits::RegistryAccess;
use crate::Result;

/// A peer requirement that the anchored version of the peer does not meet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeerMismatch {
    /// The package declaring the peer requirement.
    pub dependent: String,
    pub dependent_version: Version,
    /// The peer package that fails the requirement.
    pub peer_name: String,
    pub requirement: String,
    /// The version of the peer anchored in the component manifests.
    pub actual_version: Version,
    /// Components whose manifests anchor that version.
    pub components: Vec<String>,
}

/// Checks the declared dependencies of all components against the peer
/// requirements their registry metadata declares.
///
/// Versions are anchored from the declared ranges rather than resolved from
/// an installed tree, so a range like `^17.0.2` is checked as `17.0.2`.
pub struct PeerCompatibilityChecker<R> {
    registry: R,
}

impl<R: RegistryAccess> PeerCompatibilityChecker<R> {
    pub fn new(registry: R) -> Self {
        Self { registry }
    }

    /// # Errors
    ///
    /// Returns an error when a manifest cannot be read. Failed registry
    /// lookups yield no requirements, so one unpublished package does not
    /// hide the remaining results.
    pub fn find_mismatches(
        &self,
        root: &Path,
        components: &[Component],
    ) -> Result<Vec<PeerMismatch>> {
        let usages = collect_usages(components)?;

        let mut mismatches = Vec::new();
        for (name, version) in usages.keys() {
            let requirements = self.registry.peer_requirements(root, name, version);

            for (peer_name, requirement) in &requirements {
                for ((used_name, used_version), users) in &usages {
                    if used_name == peer_name && !satisfies(used_version, requirement) {
                        mismatches.push(PeerMismatch {
                            dependent: name.clone(),
                            dependent_version: version.clone(),
                            peer_name: peer_name.clone(),
                            requirement: requirement.clone(),
                            actual_version: used_version.clone(),
                            components: users.iter().cloned().collect(),
                        });
                    }
                }
            }
        }
        Ok(mismatches)
    }
}

/// All externally declared dependencies with their anchored versions, each
/// mapped to the components declaring them. Ranges without a parsable anchor
/// are reported and skipped.
fn collect_usages(
    components: &[Component],
) -> Result<BTreeMap<(String, Version), BTreeSet<String>>> {
    let kinds = [
        DependencyKind::Runtime,
        DependencyKind::Development,
        DependencyKind::Peer,
    ];

    let mut usages: BTreeMap<(String, Version), BTreeSet<String>> = BTreeMap::new();
    for component in components {
        let manifest = Manifest::load(&component.manifest_path())?;
        for kind in kinds {
            for (name, range) in manifest.dependencies(kind) {
                let Some(anchor) = extract_anchor(range) else {
                    warn!(
                        component = %component.name,
                        dependency = %name,
                        range = %range,
                        "cannot anchor a version, skipping"
                    );
                    continue;
                };
                usages
                    .entry((name.to_string(), anchor))
                    .or_default()
                    .insert(component.name.clone());
            }
        }
    }
    Ok(usages)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mocks::{manifest_component, MockRegistry};

    #[test]
    fn unmet_peer_requirement_is_reported_with_its_users() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let app = manifest_component(
            dir.path(),
            "app",
            r#"{
  "name": "app",
  "version": "1.0.0",
  "dependencies": {
    "react": "^17.0.2",
    "react-dom": "^18.2.0"
  }
}
"#,
        );
        let registry =
            MockRegistry::new().with_peer_requirement("react-dom", "18.2.0", "react", "^18.0.0");
        let checker = PeerCompatibilityChecker::new(registry);

        let mismatches = checker.find_mismatches(dir.path(), &[app])?;

        assert_eq!(mismatches.len(), 1);
        let mismatch = &mismatches[0];
        assert_eq!(mismatch.dependent, "react-dom");
        assert_eq!(mismatch.peer_name, "react");
        assert_eq!(mismatch.requirement, "^18.0.0");
        assert_eq!(mismatch.actual_version, Version::new(17, 0, 2));
        assert_eq!(mismatch.components, vec!["app"]);
        Ok(())
    }

    #[test]
    fn satisfied_requirements_produce_no_mismatch() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let app = manifest_component(
            dir.path(),
            "app",
            r#"{
  "name": "app",
  "version": "1.0.0",
  "dependencies": {
    "react": "^18.2.0",
    "react-dom": "^18.2.0"
  }
}
"#,
        );
        let registry =
            MockRegistry::new().with_peer_requirement("react-dom", "18.2.0", "react", "^18.0.0");
        let checker = PeerCompatibilityChecker::new(registry);

        let mismatches = checker.find_mismatches(dir.path(), &[app])?;

        assert!(mismatches.is_empty());
        Ok(())
    }

    #[test]
    fn shared_anchors_are_queried_once() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let app = manifest_component(
            dir.path(),
            "app",
            r#"{
  "name": "app",
  "version": "1.0.0",
  "dependencies": {
    "react": "~18.2.0"
  }
}
"#,
        );
        let page = manifest_component(
            dir.path(),
            "page",
            r#"{
  "name": "page",
  "version": "1.0.0",
  "devDependencies": {
    "react": "^18.2.0"
  }
}
"#,
        );
        let checker = PeerCompatibilityChecker::new(MockRegistry::new());

        checker.find_mismatches(dir.path(), &[app, page])?;

        assert_eq!(
            checker.registry.peer_queries(),
            vec!["react@18.2.0".to_string()]
        );
        Ok(())
    }

    #[test]
    fn unparsable_ranges_are_skipped() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let app = manifest_component(
            dir.path(),
            "app",
            r#"{
  "name": "app",
  "version": "1.0.0",
  "dependencies": {
    "tooling": "file:../tooling"
  }
}
"#,
        );
        let checker = PeerCompatibilityChecker::new(MockRegistry::new());

        let mismatches = checker.find_mismatches(dir.path(), &[app])?;

        assert!(mismatches.is_empty());
        assert!(checker.registry.peer_queries().is_empty());
        Ok(())
    }
}
