use std::path::Path;

use repomaintain_core::BumpType;
use repomaintain_pinned::PinnedStore;
use repomaintain_txn::FileTransaction;
use tracing::warn;

use crate::traits::{PackageTools, RegistryAccess};
use crate::Result;

#[derive(Debug, Clone)]
pub struct UpgradeInput {
    pub target: BumpType,
    pub filter: String,
    pub exclude: Option<String>,
}

#[derive(Debug)]
pub struct UpgradeOutput {
    /// Components whose ncu run failed; their manifests keep the old ranges.
    pub failed_components: Vec<String>,
}

/// Raises declared dependency ranges via `ncu`, skipping globally pinned
/// packages and anything the user excluded.
pub struct UpgradeOperation<R, T, S> {
    registry: R,
    tools: T,
    store: S,
}

impl<R, T, S> UpgradeOperation<R, T, S>
where
    R: RegistryAccess,
    T: PackageTools,
    S: PinnedStore,
{
    pub fn new(registry: R, tools: T, store: S) -> Self {
        Self {
            registry,
            tools,
            store,
        }
    }

    /// # Errors
    ///
    /// Returns an error when discovery, the pinned document, or the final
    /// reinstall fails. Per-component ncu failures are reported in the
    /// output instead.
    pub fn execute(&self, root: &Path, input: &UpgradeInput) -> Result<UpgradeOutput> {
        let components = self.tools.discover(root)?;
        let pinned = self.store.fetch()?;

        // ncu tolerates duplicates and stray separators in the reject list.
        let mut reject_parts: Vec<String> = pinned.iter().map(|p| p.name.clone()).collect();
        if let Some(exclude) = input.exclude.as_deref() {
            if !exclude.is_empty() {
                reject_parts.push(exclude.to_string());
            }
        }
        let reject = if reject_parts.is_empty() {
            None
        } else {
            Some(reject_parts.join(","))
        };

        let mut txn = FileTransaction::new();
        for component in &components {
            txn.stage(&component.manifest_path(), true)?;
        }
        self.registry.link_npmrc(root, &components, false, false)?;

        let mut failed = Vec::new();
        for component in &components {
            if let Err(err) = self.tools.ncu_upgrade(
                &component.location,
                input.target.as_str(),
                &input.filter,
                reject.as_deref(),
            ) {
                warn!(component = %component.name, error = %err, "dependency upgrade failed");
                failed.push(component.name.clone());
            }
        }

        let commit_result = txn.commit();
        for component in &components {
            self.registry.unlink_npmrc(component);
        }
        commit_result?;

        self.tools.reinstall(root)?;

        Ok(UpgradeOutput {
            failed_components: failed,
        })
    }
}
