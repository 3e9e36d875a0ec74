use std::path::Path;

use repomaintain_core::ProcessRunner;
use repomaintain_operations::operations::{PublishInput, ReleaseCoordinator};
use repomaintain_operations::providers::{Git2Access, LernaTools, NpmCliRegistry};

use crate::error::Result;
use crate::interaction::TerminalInteraction;
use crate::output;

pub(crate) fn run(root: &Path, input: PublishInput) -> Result<()> {
    let operation = ReleaseCoordinator::new(
        TerminalInteraction,
        Git2Access::new(),
        NpmCliRegistry::new(ProcessRunner),
        LernaTools::new(ProcessRunner),
    );

    let result = operation.execute(root, &input)?;

    if input.dry_run {
        output::success("Dry run finished, the repository is unchanged.");
    } else {
        output::success("Published:");
    }
    for (name, version) in &result.published {
        output::note(&format!("{name}@{version}"));
    }
    for tag in &result.tags {
        output::note(&format!("tagged {tag}"));
    }
    if result.commit.is_some() && !result.pushed {
        output::warning("The release commit was not pushed.");
    }
    Ok(())
}
