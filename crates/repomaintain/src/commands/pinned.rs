use std::path::Path;

use repomaintain_core::ProcessRunner;
use repomaintain_operations::operations::PinnedMaintenance;
use repomaintain_operations::providers::{Git2Access, LernaTools};
use repomaintain_pinned::ConfluenceStore;

use crate::error::Result;
use crate::output;

pub(crate) fn run_list(root: &Path) -> Result<()> {
    let store = ConfluenceStore::new(root)?;
    let operation = PinnedMaintenance::new(Git2Access::new(), LernaTools::new(ProcessRunner), store);

    let pinned = operation.list_pinned()?;
    if pinned.is_empty() {
        output::success("There are no globally pinned dependencies.");
        return Ok(());
    }

    output::success("Globally pinned dependencies:");
    for dependency in &pinned {
        output::note(&format!(
            "{} {} ({})",
            dependency.name, dependency.version, dependency.reason
        ));
    }
    Ok(())
}

pub(crate) fn run_update(root: &Path) -> Result<()> {
    let store = ConfluenceStore::new(root)?;
    let operation = PinnedMaintenance::new(Git2Access::new(), LernaTools::new(ProcessRunner), store);

    let result = operation.update_pinned(root)?;
    if result.pinned.is_empty() {
        output::success("There are no globally pinned dependencies.");
        return Ok(());
    }
    if result.enforced.is_empty() {
        output::success("No pinned dependency is used in this repository.");
        return Ok(());
    }

    output::success(&format!("Pinned versions enforced for: {}", result.enforced.join(", ")));
    if result.page_changed {
        output::note("The documentation page was updated.");
    }
    if result.committed {
        output::note("The manifest changes were committed.");
    } else {
        output::note("All manifests already matched, nothing to commit.");
    }
    Ok(())
}
