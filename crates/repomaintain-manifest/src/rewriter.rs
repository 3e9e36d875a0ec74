use std::collections::BTreeMap;

use repomaintain_core::DependencyKind;
use repomaintain_range::{range_prefix, satisfies};
use semver::Version;

use crate::document::Manifest;

const REWRITE_KINDS: [DependencyKind; 2] =
    [DependencyKind::Runtime, DependencyKind::Development];

/// An internal dependency that was kept because its declared range does not
/// cover the locally checked-out version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StripWarning {
    pub name: String,
    pub range: String,
    pub local_version: Version,
}

/// An internal dependency whose old range did not cover the new target
/// version and had to be rewritten anyway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForcedUpdate {
    pub name: String,
    pub old_range: String,
    pub new_range: String,
}

/// Remove internal dependency entries that are covered by the local checkout.
///
/// Entries whose range does not cover the local version are assumed to refer
/// to an already-published release and are left untouched; each such entry is
/// reported so the caller can warn. Running twice is a no-op.
pub fn strip_internal(
    manifest: &mut Manifest,
    local_versions: &BTreeMap<String, Version>,
) -> Vec<StripWarning> {
    let own_name = manifest.name().map(str::to_string);
    let mut warnings = Vec::new();

    for kind in REWRITE_KINDS {
        let entries: Vec<(String, String)> = manifest
            .dependencies(kind)
            .map(|(name, range)| (name.to_string(), range.to_string()))
            .collect();

        for (name, range) in entries {
            if own_name.as_deref() == Some(name.as_str()) {
                continue;
            }
            let Some(local) = local_versions.get(&name) else {
                continue;
            };

            if satisfies(local, &range) {
                manifest.remove_dependency(kind, &name);
            } else {
                warnings.push(StripWarning {
                    name,
                    range,
                    local_version: local.clone(),
                });
            }
        }
    }

    warnings
}

/// Rewrite internal dependency ranges to point at the freshly assigned target
/// versions, keeping each entry's original prefix operator.
///
/// An entry found in `dependencies` shadows one of the same name in
/// `devDependencies`. Only rewrites where the old range did not already cover
/// the target are returned; these need explicit confirmation upstream.
pub fn reconcile_to_target(
    manifest: &mut Manifest,
    targets: &BTreeMap<String, Version>,
) -> Vec<ForcedUpdate> {
    let mut forced = Vec::new();
    let mut handled: Vec<String> = Vec::new();

    for kind in REWRITE_KINDS {
        let entries: Vec<(String, String)> = manifest
            .dependencies(kind)
            .map(|(name, range)| (name.to_string(), range.to_string()))
            .collect();

        for (name, old_range) in entries {
            if handled.iter().any(|h| h == &name) {
                continue;
            }
            let Some(target) = targets.get(&name) else {
                continue;
            };

            let new_range = format!("{}{target}", range_prefix(&old_range));
            manifest.set_dependency(kind, &name, &new_range);
            handled.push(name.clone());

            if !satisfies(target, &old_range) {
                forced.push(ForcedUpdate {
                    name,
                    old_range,
                    new_range,
                });
            }
        }
    }

    forced
}

/// Pin dependencies to exact versions, prefix-free, in whichever map declares
/// them. Returns the names that were actually present and rewritten.
pub fn apply_pinned(manifest: &mut Manifest, pinned: &BTreeMap<String, Version>) -> Vec<String> {
    let mut applied = Vec::new();

    for (name, version) in pinned {
        for kind in REWRITE_KINDS {
            if manifest.dependency_range(kind, name).is_some() {
                manifest.set_dependency(kind, name, &version.to_string());
                applied.push(name.clone());
                break;
            }
        }
    }

    applied
}
