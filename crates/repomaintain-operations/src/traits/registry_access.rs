use std::collections::BTreeMap;
use std::path::Path;

use repomaintain_core::{Component, Registry};
use semver::Version;

use crate::Result;

pub trait RegistryAccess: Send + Sync {
    /// # Errors
    ///
    /// Returns an error when no login session exists for the registry.
    fn ensure_authenticated(&self, root: &Path, registry: Registry) -> Result<()>;

    /// Whether `name@version` is already published to the registry.
    /// Lookup failures are treated as "not published".
    fn exists(&self, root: &Path, name: &str, version: &Version, registry: Registry) -> bool;

    /// # Errors
    ///
    /// Returns an error when the publish subprocess fails.
    fn publish(&self, component_dir: &Path, registry: Registry, dry_run: bool) -> Result<()>;

    /// Declared peer dependencies of `name@version`; empty on any failure.
    fn peer_requirements(
        &self,
        root: &Path,
        name: &str,
        version: &Version,
    ) -> BTreeMap<String, String>;

    /// # Errors
    ///
    /// Returns an error when the root `.npmrc` is required but missing, or a
    /// copy cannot be written.
    fn link_npmrc(
        &self,
        root: &Path,
        components: &[Component],
        must_exist: bool,
        remove_registries: bool,
    ) -> Result<()>;

    fn unlink_npmrc(&self, component: &Component);
}
