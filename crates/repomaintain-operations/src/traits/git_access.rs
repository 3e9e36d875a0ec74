use std::path::Path;

use repomaintain_git::{CommitInfo, TagInfo};

use crate::Result;

pub trait GitAccess: Send + Sync {
    /// # Errors
    ///
    /// Returns an error if the repository cannot be opened or any manifest
    /// has uncommitted changes.
    fn require_clean_manifests(&self, root: &Path) -> Result<()>;

    /// # Errors
    ///
    /// Returns an error if staging any of the files fails.
    fn stage_files(&self, root: &Path, paths: &[&Path]) -> Result<()>;

    /// # Errors
    ///
    /// Returns an error if the index diff cannot be computed.
    fn has_staged_changes(&self, root: &Path) -> Result<bool>;

    /// # Errors
    ///
    /// Returns an error if the commit cannot be created.
    fn commit(&self, root: &Path, message: &str) -> Result<CommitInfo>;

    /// # Errors
    ///
    /// Returns an error if the tag cannot be created or already exists.
    fn create_tag(&self, root: &Path, name: &str) -> Result<TagInfo>;

    /// # Errors
    ///
    /// Returns an error if HEAD is detached.
    fn current_branch(&self, root: &Path) -> Result<String>;

    /// # Errors
    ///
    /// Returns an error if the repository cannot be opened.
    fn remote_url(&self, root: &Path) -> Result<Option<String>>;

    /// # Errors
    ///
    /// Returns an error if pushing any of the refs fails.
    fn push(&self, root: &Path, refspecs: &[String]) -> Result<()>;
}
