use std::path::Path;

use repomaintain_core::ProcessRunner;
use repomaintain_operations::operations::{UpdateInput, UpdateOperation};
use repomaintain_operations::providers::{Git2Access, LernaTools, NpmCliRegistry};

use crate::error::Result;
use crate::interaction::TerminalInteraction;
use crate::output;

fn operation() -> UpdateOperation<TerminalInteraction, Git2Access, NpmCliRegistry, LernaTools> {
    UpdateOperation::new(
        TerminalInteraction,
        Git2Access::new(),
        NpmCliRegistry::new(ProcessRunner),
        LernaTools::new(ProcessRunner),
    )
}

pub(crate) fn run(root: &Path, no_git: bool) -> Result<()> {
    let result = operation().execute(root, &UpdateInput { no_git })?;

    if result.committed {
        output::success("Dependencies updated and committed.");
    } else {
        output::success("Dependencies updated, nothing to commit.");
    }
    Ok(())
}

pub(crate) fn run_apply_upgrade(root: &Path) -> Result<()> {
    let result = operation().apply_upgrade(root)?;

    if result.committed {
        output::success("Upgrade applied and committed.");
    } else {
        output::success("Upgrade applied, nothing to commit.");
    }
    Ok(())
}
