mod peers;
mod pinned;
mod publish;
mod update;
mod upgrade;

use std::path::Path;

use clap::Subcommand;
use repomaintain_core::BumpType;
use repomaintain_operations::operations::PublishInput;

use crate::error::Result;

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Update and audit the external dependencies of all components
    Update {
        /// Skip the clean-manifest check and the final commit
        #[arg(long)]
        no_git: bool,
    },
    /// Raise declared dependency ranges with npm-check-updates
    Upgrade {
        /// Highest version step the upgrade may take
        #[arg(long, value_enum, default_value_t = BumpType::Minor)]
        target: BumpType,

        /// Package filter passed through to ncu
        #[arg(long, default_value = "*")]
        filter: String,

        /// Comma-separated packages to leave untouched
        #[arg(long)]
        exclude: Option<String>,
    },
    /// Re-run update and audit after an upgrade, then commit the result
    ApplyUpgrade,
    /// Select, version and publish the public components
    Publish {
        /// Go through all steps without changing the repository or registries
        #[arg(long)]
        dry_run: bool,

        /// Skip all Git interaction
        #[arg(long)]
        no_git: bool,

        /// Ask for the publish mode even when it is configured
        #[arg(long)]
        always_ask: bool,

        /// Skip registries that already have a version instead of failing
        #[arg(long)]
        skip_existing: bool,

        /// Publish the current versions without bumping
        #[arg(long)]
        keep_version: bool,
    },
    /// Check declared dependencies against registry peer requirements
    CheckPeers,
    /// Manage the globally pinned dependencies
    #[command(subcommand)]
    SdGlobal(SdGlobal),
}

#[derive(Subcommand)]
pub(crate) enum SdGlobal {
    /// List the documented pinned dependencies
    ListPinned,
    /// Enforce the pinned versions and sync the documentation page
    UpdatePinned,
}

impl Commands {
    pub(crate) fn execute(self, root: &Path) -> Result<()> {
        match self {
            Self::Update { no_git } => update::run(root, no_git),
            Self::Upgrade {
                target,
                filter,
                exclude,
            } => upgrade::run(root, target, filter, exclude),
            Self::ApplyUpgrade => update::run_apply_upgrade(root),
            Self::Publish {
                dry_run,
                no_git,
                always_ask,
                skip_existing,
                keep_version,
            } => publish::run(
                root,
                PublishInput {
                    dry_run,
                    no_git,
                    always_ask,
                    skip_existing,
                    keep_version,
                },
            ),
            Self::CheckPeers => peers::run(root),
            Self::SdGlobal(SdGlobal::ListPinned) => pinned::run_list(root),
            Self::SdGlobal(SdGlobal::UpdatePinned) => pinned::run_update(root),
        }
    }
}
