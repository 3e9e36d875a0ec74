use std::path::{Path, PathBuf};

use repomaintain_core::{Component, DependencyKind};
use repomaintain_manifest::{strip_internal, Manifest};
use repomaintain_txn::FileTransaction;
use tracing::{debug, warn};

use crate::error::OperationError;
use crate::traits::{GitAccess, InteractionProvider, PackageTools, RegistryAccess};
use crate::Result;

#[derive(Debug, Default, Clone)]
pub struct UpdateInput {
    pub no_git: bool,
}

#[derive(Debug)]
pub struct UpdateOutput {
    /// Whether a commit with the resulting changes was created.
    pub committed: bool,
}

/// Updates and audits the external dependencies of every component.
///
/// Internal cross-dependencies are stripped from the manifests for the
/// duration of the npm runs and restored afterwards, so npm never tries to
/// resolve unpublished workspace versions against a registry.
pub struct UpdateOperation<I, G, R, T> {
    interaction: I,
    git: G,
    registry: R,
    tools: T,
}

impl<I, G, R, T> UpdateOperation<I, G, R, T>
where
    I: InteractionProvider,
    G: GitAccess,
    R: RegistryAccess,
    T: PackageTools,
{
    pub fn new(interaction: I, git: G, registry: R, tools: T) -> Self {
        Self {
            interaction,
            git,
            registry,
            tools,
        }
    }

    /// # Errors
    ///
    /// Returns an error when a manifest is dirty, a mandatory tool run fails,
    /// or the user declines to continue after a failed audit.
    pub fn execute(&self, root: &Path, input: &UpdateInput) -> Result<UpdateOutput> {
        let components = self.run_update(root, input.no_git)?;

        if input.no_git {
            return Ok(UpdateOutput { committed: false });
        }
        let committed = self.commit_changes(root, &components, "Update dependencies")?;
        Ok(UpdateOutput { committed })
    }

    /// Finalize an earlier `upgrade` run: re-run the update and audit flow
    /// without Git checks, then commit whatever changed.
    ///
    /// # Errors
    ///
    /// Same failure modes as [`Self::execute`], plus commit failures.
    pub fn apply_upgrade(&self, root: &Path) -> Result<UpdateOutput> {
        let components = self.run_update(root, true)?;
        let committed = self.commit_changes(root, &components, "Upgrade dependencies")?;
        Ok(UpdateOutput { committed })
    }

    fn run_update(&self, root: &Path, no_git: bool) -> Result<Vec<Component>> {
        let components = self.tools.discover(root)?;
        if !no_git {
            self.git.require_clean_manifests(root)?;
        }

        let mut txn = FileTransaction::new();
        for component in &components {
            txn.stage(&component.manifest_path(), true)?;
            txn.stage(&component.lock_path(), false)?;
        }
        self.registry.link_npmrc(root, &components, false, false)?;

        match self.run_tooling(&components, &txn) {
            Ok(()) => {
                txn.commit()?;
                for component in &components {
                    self.registry.unlink_npmrc(component);
                }
                self.tools.reinstall(root)?;
                Ok(components)
            }
            Err(err) => {
                for component in &components {
                    self.registry.unlink_npmrc(component);
                }
                if let Err(rollback) = txn.rollback() {
                    warn!(error = %rollback, "rollback after failed update was incomplete");
                }
                Err(err)
            }
        }
    }

    fn run_tooling(&self, components: &[Component], txn: &FileTransaction) -> Result<()> {
        let local_versions = super::local_versions(components);

        for component in components {
            let mut manifest = Manifest::load(&component.manifest_path())?;
            for warning in strip_internal(&mut manifest, &local_versions) {
                warn!(
                    component = %component.name,
                    dependency = %warning.name,
                    range = %warning.range,
                    local = %warning.local_version,
                    "internal dependency kept, assuming the ranged version is published"
                );
            }
            manifest.save()?;
        }

        for component in components {
            // The report needs an installed tree to compare against.
            if component.location.join("node_modules").is_dir() {
                if let Err(err) = self.tools.outdated(&component.location) {
                    debug!(component = %component.name, report = %err, "outdated dependencies");
                }
            }

            self.tools.update(&component.location)?;

            if let Err(err) = self.tools.audit_fix(&component.location) {
                warn!(component = %component.name, error = %err, "audit fix failed");
                let proceed = self
                    .interaction
                    .confirm("Continue with the remaining components?", false)?
                    .unwrap_or(false);
                if !proceed {
                    return Err(OperationError::Cancelled);
                }
            }
        }

        merge_back(components, txn)
    }

    fn commit_changes(
        &self,
        root: &Path,
        components: &[Component],
        message: &str,
    ) -> Result<bool> {
        let mut paths: Vec<PathBuf> = Vec::new();
        for component in components {
            paths.push(component.manifest_path());
            let lock = component.lock_path();
            if lock.exists() {
                paths.push(lock);
            }
        }
        let refs: Vec<&Path> = paths.iter().map(PathBuf::as_path).collect();

        self.git.stage_files(root, &refs)?;
        if !self.git.has_staged_changes(root)? {
            return Ok(false);
        }
        self.git.commit(root, message)?;
        Ok(true)
    }
}

/// Reapply the external version changes npm made onto the backed-up manifest
/// content, so the stripped internal entries reappear unchanged.
fn merge_back(components: &[Component], txn: &FileTransaction) -> Result<()> {
    for component in components {
        let manifest_path = component.manifest_path();
        let Some(backup) = txn.backup_of(&manifest_path) else {
            continue;
        };

        let updated = Manifest::load(&manifest_path)?;
        let mut original = Manifest::load(backup)?;
        for kind in [DependencyKind::Runtime, DependencyKind::Development] {
            let entries: Vec<(String, String)> = updated
                .dependencies(kind)
                .map(|(name, range)| (name.to_string(), range.to_string()))
                .collect();
            for (name, range) in entries {
                original.set_dependency(kind, &name, &range);
            }
        }
        original.save_to(&manifest_path)?;
    }
    Ok(())
}
