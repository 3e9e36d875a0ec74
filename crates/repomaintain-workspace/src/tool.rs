//! Thin wrappers around the npm, lerna and ncu invocations the operations
//! share. Callers decide which failures are fatal.

use std::path::Path;

use repomaintain_core::{ProcessRunner, ToolError};

/// `npm outdated` exits non-zero when anything is outdated; the caller treats
/// the report as informational and tolerates that.
pub fn npm_outdated(runner: &ProcessRunner, cwd: &Path) -> Result<(), ToolError> {
    runner.run("npm", &["outdated"], cwd)
}

pub fn npm_update(runner: &ProcessRunner, cwd: &Path) -> Result<(), ToolError> {
    runner.run("npm", &["update", "--save", "--no-fund", "--no-audit"], cwd)
}

pub fn npm_audit_fix(runner: &ProcessRunner, cwd: &Path) -> Result<(), ToolError> {
    runner.run(
        "npm",
        &["audit", "fix", "--audit-level=high", "--no-fund"],
        cwd,
    )
}

/// Run an npm script such as `pre-publish`, forwarding `args` to the
/// script. Components that do not declare the script are skipped.
pub fn run_hook(
    runner: &ProcessRunner,
    cwd: &Path,
    hook: &str,
    args: &[&str],
) -> Result<(), ToolError> {
    let mut full_args = vec!["run", "--if-present", hook, "--"];
    full_args.extend_from_slice(args);
    runner.run("npm", &full_args, cwd)
}

/// Upgrade dependency declarations via npm-check-updates.
pub fn ncu_upgrade(
    runner: &ProcessRunner,
    cwd: &Path,
    target: &str,
    filter: &str,
    reject: Option<&str>,
) -> Result<(), ToolError> {
    let mut args = vec!["ncu", "--upgrade", "--target", target, "--filter", filter];
    if let Some(reject) = reject {
        args.push("--reject");
        args.push(reject);
    }
    runner.run("npx", &args, cwd)
}

/// Remove all `node_modules` folders and reinstall from scratch. Plain
/// `npm update` runs leave Lerna's links in a broken state otherwise.
pub fn reinstall(runner: &ProcessRunner, root: &Path) -> Result<(), ToolError> {
    runner.run("npx", &["lerna", "clean", "--yes"], root)?;
    runner.run("npx", &["lerna", "bootstrap"], root)
}
