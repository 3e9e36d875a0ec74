use std::path::Path;

use repomaintain_core::{Component, ProcessRunner};

use crate::Result;
use crate::traits::PackageTools;

pub struct LernaTools {
    runner: ProcessRunner,
}

impl LernaTools {
    #[must_use]
    pub fn new(runner: ProcessRunner) -> Self {
        Self { runner }
    }
}

impl PackageTools for LernaTools {
    fn discover(&self, root: &Path) -> Result<Vec<Component>> {
        Ok(repomaintain_workspace::discover(root, &self.runner)?)
    }

    fn outdated(&self, cwd: &Path) -> Result<()> {
        Ok(repomaintain_workspace::npm_outdated(&self.runner, cwd)?)
    }

    fn update(&self, cwd: &Path) -> Result<()> {
        Ok(repomaintain_workspace::npm_update(&self.runner, cwd)?)
    }

    fn audit_fix(&self, cwd: &Path) -> Result<()> {
        Ok(repomaintain_workspace::npm_audit_fix(&self.runner, cwd)?)
    }

    fn ncu_upgrade(
        &self,
        cwd: &Path,
        target: &str,
        filter: &str,
        reject: Option<&str>,
    ) -> Result<()> {
        Ok(repomaintain_workspace::ncu_upgrade(
            &self.runner,
            cwd,
            target,
            filter,
            reject,
        )?)
    }

    fn run_hook(&self, cwd: &Path, hook: &str, args: &[&str]) -> Result<()> {
        Ok(repomaintain_workspace::run_hook(&self.runner, cwd, hook, args)?)
    }

    fn reinstall(&self, root: &Path) -> Result<()> {
        Ok(repomaintain_workspace::reinstall(&self.runner, root)?)
    }
}
