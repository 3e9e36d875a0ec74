use semver::Version;

use crate::error::PinnedError;

/// One dependency whose version is pinned organisation-wide, together with
/// the repositories currently known to depend on it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PinnedDependency {
    pub name: String,
    pub version: Version,
    pub reason: String,
    pub repositories: Vec<String>,
}

/// Source of the globally pinned dependency document.
pub trait PinnedStore {
    /// Fetch all pinned dependencies.
    fn fetch(&self) -> Result<Vec<PinnedDependency>, PinnedError>;

    /// Synchronize the repositories column for `repo_name`: listed for every
    /// dependency in `in_use`, absent everywhere else. Returns whether the
    /// document was actually modified; no new document revision is created
    /// otherwise.
    fn update_repositories(&self, in_use: &[String], repo_name: &str)
        -> Result<bool, PinnedError>;
}
