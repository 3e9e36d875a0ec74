use std::collections::BTreeMap;
use std::path::Path;

use repomaintain_core::{Component, ProcessRunner, Registry};
use repomaintain_registry::NpmRegistryClient;
use semver::Version;

use crate::Result;
use crate::traits::RegistryAccess;

pub struct NpmCliRegistry {
    client: NpmRegistryClient,
}

impl NpmCliRegistry {
    #[must_use]
    pub fn new(runner: ProcessRunner) -> Self {
        Self {
            client: NpmRegistryClient::new(runner),
        }
    }
}

impl RegistryAccess for NpmCliRegistry {
    fn ensure_authenticated(&self, root: &Path, registry: Registry) -> Result<()> {
        Ok(self.client.ensure_authenticated(root, registry)?)
    }

    fn exists(&self, root: &Path, name: &str, version: &Version, registry: Registry) -> bool {
        self.client.exists(root, name, version, registry)
    }

    fn publish(&self, component_dir: &Path, registry: Registry, dry_run: bool) -> Result<()> {
        Ok(self.client.publish(component_dir, registry, dry_run)?)
    }

    fn peer_requirements(
        &self,
        root: &Path,
        name: &str,
        version: &Version,
    ) -> BTreeMap<String, String> {
        self.client.peer_requirements(root, name, version)
    }

    fn link_npmrc(
        &self,
        root: &Path,
        components: &[Component],
        must_exist: bool,
        remove_registries: bool,
    ) -> Result<()> {
        Ok(repomaintain_registry::link_npmrc(
            root,
            components,
            must_exist,
            remove_registries,
        )?)
    }

    fn unlink_npmrc(&self, component: &Component) {
        repomaintain_registry::unlink_npmrc(component);
    }
}
