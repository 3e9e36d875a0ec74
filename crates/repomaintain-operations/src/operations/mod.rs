mod peers;
mod pinned;
mod publish;
mod update;
mod upgrade;

use std::collections::BTreeMap;

use repomaintain_core::Component;
use semver::Version;

pub use peers::{PeerCompatibilityChecker, PeerMismatch};
pub use pinned::{PinnedMaintenance, PinnedUpdateOutput};
pub use publish::{PlannedRelease, PublishInput, PublishOutput, ReleaseCoordinator};
pub use update::{UpdateInput, UpdateOperation, UpdateOutput};
pub use upgrade::{UpgradeInput, UpgradeOperation, UpgradeOutput};

/// Current versions of all versioned components, keyed by name.
pub(crate) fn local_versions(components: &[Component]) -> BTreeMap<String, Version> {
    components
        .iter()
        .filter_map(|c| c.version.clone().map(|v| (c.name.clone(), v)))
        .collect()
}
