use std::path::Path;

use repomaintain_git::{CommitInfo, Repository, TagInfo};

use crate::Result;
use crate::traits::GitAccess;

pub struct Git2Access;

impl Git2Access {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Default for Git2Access {
    fn default() -> Self {
        Self::new()
    }
}

impl GitAccess for Git2Access {
    fn require_clean_manifests(&self, root: &Path) -> Result<()> {
        let repo = Repository::open(root)?;
        Ok(repo.require_clean_manifests()?)
    }

    fn stage_files(&self, root: &Path, paths: &[&Path]) -> Result<()> {
        let repo = Repository::open(root)?;
        Ok(repo.stage_files(paths)?)
    }

    fn has_staged_changes(&self, root: &Path) -> Result<bool> {
        let repo = Repository::open(root)?;
        Ok(repo.has_staged_changes()?)
    }

    fn commit(&self, root: &Path, message: &str) -> Result<CommitInfo> {
        let repo = Repository::open(root)?;
        Ok(repo.commit(message)?)
    }

    fn create_tag(&self, root: &Path, name: &str) -> Result<TagInfo> {
        let repo = Repository::open(root)?;
        Ok(repo.create_tag(name)?)
    }

    fn current_branch(&self, root: &Path) -> Result<String> {
        let repo = Repository::open(root)?;
        Ok(repo.current_branch()?)
    }

    fn remote_url(&self, root: &Path) -> Result<Option<String>> {
        let repo = Repository::open(root)?;
        Ok(repo.remote_url()?)
    }

    fn push(&self, root: &Path, refspecs: &[String]) -> Result<()> {
        let repo = Repository::open(root)?;
        Ok(repo.push(refspecs)?)
    }
}
