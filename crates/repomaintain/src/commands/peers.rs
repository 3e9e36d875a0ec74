use std::path::Path;

use repomaintain_core::ProcessRunner;
use repomaintain_operations::operations::PeerCompatibilityChecker;
use repomaintain_operations::providers::{LernaTools, NpmCliRegistry};
use repomaintain_operations::traits::PackageTools as _;

use crate::error::Result;
use crate::output;

pub(crate) fn run(root: &Path) -> Result<()> {
    let tools = LernaTools::new(ProcessRunner);
    let components = tools.discover(root)?;
    let checker = PeerCompatibilityChecker::new(NpmCliRegistry::new(ProcessRunner));

    let mismatches = checker.find_mismatches(root, &components)?;
    if mismatches.is_empty() {
        output::success("All peer requirements are satisfied.");
        return Ok(());
    }

    for mismatch in &mismatches {
        output::warning(&format!(
            "{}@{} requires {} {}, found {}",
            mismatch.dependent,
            mismatch.dependent_version,
            mismatch.peer_name,
            mismatch.requirement,
            mismatch.actual_version,
        ));
        output::note(&format!("used by: {}", mismatch.components.join(", ")));
    }
    output::warning(&format!("{} unmet peer requirement(s)", mismatches.len()));
    Ok(())
}
