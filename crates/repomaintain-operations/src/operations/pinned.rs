use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use repomaintain_manifest::{apply_pinned, Manifest};
use repomaintain_pinned::{PinnedDependency, PinnedStore};
use semver::Version;

use crate::traits::{GitAccess, PackageTools};
use crate::Result;

#[derive(Debug, Default)]
pub struct PinnedUpdateOutput {
    /// The pinned dependencies as documented, possibly none.
    pub pinned: Vec<PinnedDependency>,
    /// Names of pinned dependencies found in at least one manifest.
    pub enforced: Vec<String>,
    /// Whether the documentation page needed a repositories update.
    pub page_changed: bool,
    pub committed: bool,
}

/// Keeps the repository in sync with the globally pinned dependency document.
pub struct PinnedMaintenance<G, T, S> {
    git: G,
    tools: T,
    store: S,
}

impl<G, T, S> PinnedMaintenance<G, T, S>
where
    G: GitAccess,
    T: PackageTools,
    S: PinnedStore,
{
    pub fn new(git: G, tools: T, store: S) -> Self {
        Self { git, tools, store }
    }

    /// # Errors
    ///
    /// Returns an error when the document cannot be fetched.
    pub fn list_pinned(&self) -> Result<Vec<PinnedDependency>> {
        Ok(self.store.fetch()?)
    }

    /// Rewrite every manifest entry for a pinned dependency to the exact
    /// pinned version, sync the documentation page's repositories column,
    /// and commit the manifest changes.
    ///
    /// # Errors
    ///
    /// Returns an error when manifests are dirty or the document, a
    /// manifest, or Git fails.
    pub fn update_pinned(&self, root: &Path) -> Result<PinnedUpdateOutput> {
        let components = self.tools.discover(root)?;
        self.git.require_clean_manifests(root)?;

        let pinned = self.store.fetch()?;
        if pinned.is_empty() {
            return Ok(PinnedUpdateOutput::default());
        }
        let versions: BTreeMap<String, Version> = pinned
            .iter()
            .map(|p| (p.name.clone(), p.version.clone()))
            .collect();

        let mut in_use = BTreeSet::new();
        for component in &components {
            let mut manifest = Manifest::load(&component.manifest_path())?;
            let applied = apply_pinned(&mut manifest, &versions);
            if applied.is_empty() {
                continue;
            }
            manifest.save()?;
            in_use.extend(applied);
        }
        let enforced: Vec<String> = in_use.into_iter().collect();
        if enforced.is_empty() {
            return Ok(PinnedUpdateOutput {
                pinned,
                ..PinnedUpdateOutput::default()
            });
        }

        let repo_name = repository_name(self.git.remote_url(root)?.as_deref(), root);
        let page_changed = self.store.update_repositories(&enforced, &repo_name)?;

        let paths: Vec<PathBuf> = components.iter().map(|c| c.manifest_path()).collect();
        let refs: Vec<&Path> = paths.iter().map(PathBuf::as_path).collect();
        self.git.stage_files(root, &refs)?;
        let committed = if self.git.has_staged_changes(root)? {
            self.git
                .commit(root, "Update globally pinned dependencies")?;
            true
        } else {
            false
        };

        Ok(PinnedUpdateOutput {
            pinned,
            enforced,
            page_changed,
            committed,
        })
    }
}

/// The repository name as the documentation page spells it: the last segment
/// of the origin URL without the `.git` suffix. Falls back to the checkout
/// directory name when no origin remote exists.
fn repository_name(remote_url: Option<&str>, root: &Path) -> String {
    if let Some(url) = remote_url {
        let trimmed = url.split(".git").next().unwrap_or(url);
        if let Some(name) = trimmed.rsplit(['/', ':']).next() {
            if !name.is_empty() {
                return name.to_string();
            }
        }
    }
    root.file_name()
        .map_or_else(|| "unknown".to_string(), |n| n.to_string_lossy().into_owned())
}
