use std::collections::BTreeMap;
use std::path::Path;

use repomaintain_core::{ProcessRunner, Registry};
use semver::Version;
use tracing::warn;

use crate::error::RegistryError;
use crate::parse::parse_object_notation;

/// Talks to npm registries through the npm CLI.
///
/// Authorization is ambient: GitHub via a linked `.npmrc`, npmjs.org via the
/// npm login session.
#[derive(Debug, Default, Clone, Copy)]
pub struct NpmRegistryClient {
    runner: ProcessRunner,
}

impl NpmRegistryClient {
    #[must_use]
    pub fn new(runner: ProcessRunner) -> Self {
        Self { runner }
    }

    /// Verify that an npm login session exists for the registry.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::NotAuthenticated`] with a remediation hint
    /// when `npm whoami` fails.
    pub fn ensure_authenticated(&self, root: &Path, registry: Registry) -> Result<(), RegistryError> {
        self.runner
            .run_captured("npm", &["whoami", "--registry", registry.url()], root)
            .map(|_| ())
            .map_err(|_| RegistryError::NotAuthenticated {
                registry: registry.url().to_string(),
            })
    }

    /// Whether `name@version` is already published to the registry.
    ///
    /// A failing lookup is reported as "does not exist": unpublished packages
    /// make `npm view` exit non-zero, so absence and lookup failure cannot be
    /// told apart. A warning is logged for the latter interpretation.
    #[must_use]
    pub fn exists(&self, root: &Path, name: &str, version: &Version, registry: Registry) -> bool {
        let spec = format!("{name}@{version}");
        match self.runner.run_captured(
            "npm",
            &["view", &spec, "version", "--registry", registry.url()],
            root,
        ) {
            Ok(output) => !output.trim().is_empty(),
            Err(err) => {
                warn!(package = spec, error = %err, "existence check failed, assuming not published");
                false
            }
        }
    }

    /// Publish the package in `component_dir` to the registry.
    ///
    /// # Errors
    ///
    /// Returns the subprocess error when `npm publish` fails.
    pub fn publish(
        &self,
        component_dir: &Path,
        registry: Registry,
        dry_run: bool,
    ) -> Result<(), RegistryError> {
        let mut args = vec!["publish"];
        if dry_run {
            args.push("--dry-run");
        }
        args.push("--registry");
        args.push(registry.url());

        self.runner.run("npm", &args, component_dir)?;
        Ok(())
    }

    /// Fetch the declared peer dependencies of `name@version`.
    ///
    /// Failures are never fatal: a warning is logged and an empty map
    /// returned, so one unreachable package does not abort a whole scan.
    #[must_use]
    pub fn peer_requirements(
        &self,
        root: &Path,
        name: &str,
        version: &Version,
    ) -> BTreeMap<String, String> {
        let spec = format!("{name}@{version}");
        match self
            .runner
            .run_captured("npm", &["view", &spec, "peerDependencies"], root)
        {
            Ok(output) => parse_object_notation(&output),
            Err(err) => {
                warn!(package = spec, error = %err, "failed to fetch peer dependencies");
                BTreeMap::new()
            }
        }
    }
}
