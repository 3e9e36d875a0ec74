use std::path::Path;

use repomaintain_core::Component;

use crate::Result;

/// The workspace-tool subprocesses an operation needs: component discovery
/// plus the npm, lerna and ncu invocations.
pub trait PackageTools: Send + Sync {
    /// # Errors
    ///
    /// Returns an error when the component listing fails or is unparsable.
    fn discover(&self, root: &Path) -> Result<Vec<Component>>;

    /// # Errors
    ///
    /// Returns an error on a non-zero exit; `npm outdated` signals findings
    /// that way, so callers treat this error as informational.
    fn outdated(&self, cwd: &Path) -> Result<()>;

    /// # Errors
    ///
    /// Returns an error when the update subprocess fails.
    fn update(&self, cwd: &Path) -> Result<()>;

    /// # Errors
    ///
    /// Returns an error when unfixable advisories remain or the subprocess
    /// fails; callers confirm with the user before proceeding.
    fn audit_fix(&self, cwd: &Path) -> Result<()>;

    /// # Errors
    ///
    /// Returns an error when the ncu subprocess fails.
    fn ncu_upgrade(
        &self,
        cwd: &Path,
        target: &str,
        filter: &str,
        reject: Option<&str>,
    ) -> Result<()>;

    /// # Errors
    ///
    /// Returns an error when the npm run script fails.
    fn run_hook(&self, cwd: &Path, hook: &str, args: &[&str]) -> Result<()>;

    /// # Errors
    ///
    /// Returns an error when cleaning or bootstrapping fails.
    fn reinstall(&self, root: &Path) -> Result<()>;
}
