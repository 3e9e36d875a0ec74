use crate::{GitError, Result};

use super::Repository;

impl Repository {
    /// # Errors
    ///
    /// Returns [`GitError::DetachedHead`] if HEAD is not on a branch.
    pub fn current_branch(&self) -> Result<String> {
        let head = self.inner.head()?;

        if !head.is_branch() {
            return Err(GitError::DetachedHead);
        }

        head.shorthand()
            .map(String::from)
            .ok_or(GitError::DetachedHead)
    }

    /// Paths of `package.json` files with staged or unstaged changes.
    ///
    /// Other dirty files are deliberately ignored; only manifests are about
    /// to be rewritten and must start from a committed state.
    ///
    /// # Errors
    ///
    /// Returns an error if the git status operation fails.
    pub fn dirty_manifests(&self) -> Result<Vec<String>> {
        let statuses = self.inner.statuses(Some(
            git2::StatusOptions::new()
                .include_untracked(true)
                .recurse_untracked_dirs(true),
        ))?;

        let mut dirty = Vec::new();
        for entry in statuses.iter() {
            let Some(path) = entry.path() else { continue };
            if path.ends_with("package.json") {
                dirty.push(path.to_string());
            }
        }

        Ok(dirty)
    }

    /// # Errors
    ///
    /// Returns [`GitError::DirtyManifests`] if any `package.json` has
    /// uncommitted changes.
    pub fn require_clean_manifests(&self) -> Result<()> {
        let dirty = self.dirty_manifests()?;
        if dirty.is_empty() {
            Ok(())
        } else {
            Err(GitError::DirtyManifests { paths: dirty })
        }
    }
}
