use std::path::Path;

use repomaintain_core::{BumpType, ProcessRunner};
use repomaintain_operations::operations::{UpgradeInput, UpgradeOperation};
use repomaintain_operations::providers::{LernaTools, NpmCliRegistry};
use repomaintain_pinned::ConfluenceStore;

use crate::error::Result;
use crate::output;

pub(crate) fn run(
    root: &Path,
    target: BumpType,
    filter: String,
    exclude: Option<String>,
) -> Result<()> {
    let store = ConfluenceStore::new(root)?;
    let operation = UpgradeOperation::new(
        NpmCliRegistry::new(ProcessRunner),
        LernaTools::new(ProcessRunner),
        store,
    );

    let result = operation.execute(
        root,
        &UpgradeInput {
            target,
            filter,
            exclude,
        },
    )?;

    for name in &result.failed_components {
        output::warning(&format!("upgrade failed for '{name}', its ranges are unchanged"));
    }
    output::success("Upgrade complete. Review the changes, then run 'repomaintain apply-upgrade'.");
    Ok(())
}
