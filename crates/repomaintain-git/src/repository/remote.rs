use crate::{GitError, Repository, Result};

const DEFAULT_REMOTE: &str = "origin";

impl Repository {
    /// # Errors
    ///
    /// Returns an error if the remote lookup fails.
    pub fn remote_url(&self) -> Result<Option<String>> {
        let Ok(remote) = self.inner.find_remote(DEFAULT_REMOTE) else {
            return Ok(None);
        };

        Ok(remote.url().map(String::from))
    }

    /// Push the given refspecs to `origin`, authenticating through the ssh
    /// agent or the configured git credential helper.
    ///
    /// # Errors
    ///
    /// Returns [`GitError::RemoteNotFound`] when `origin` is not configured,
    /// or the underlying git error when the push is rejected.
    pub fn push(&self, refspecs: &[String]) -> Result<()> {
        let mut remote =
            self.inner
                .find_remote(DEFAULT_REMOTE)
                .map_err(|_| GitError::RemoteNotFound {
                    name: DEFAULT_REMOTE.to_string(),
                })?;

        let config = self.inner.config()?;
        let mut callbacks = git2::RemoteCallbacks::new();
        callbacks.credentials(move |url, username_from_url, allowed| {
            if allowed.contains(git2::CredentialType::SSH_KEY) {
                if let Some(user) = username_from_url {
                    return git2::Cred::ssh_key_from_agent(user);
                }
            }
            if allowed.contains(git2::CredentialType::USER_PASS_PLAINTEXT) {
                return git2::Cred::credential_helper(&config, url, username_from_url);
            }
            git2::Cred::default()
        });

        let mut options = git2::PushOptions::new();
        options.remote_callbacks(callbacks);

        remote.push(refspecs, Some(&mut options))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::tests::setup_test_repo;
    use std::fs;
    use std::path::Path;

    #[test]
    fn remote_url_returns_none_when_no_remote() -> anyhow::Result<()> {
        let (_dir, repo) = setup_test_repo()?;

        let url = repo.remote_url()?;

        assert!(url.is_none());

        Ok(())
    }

    #[test]
    fn remote_url_returns_url_when_present() -> anyhow::Result<()> {
        let (dir, repo) = setup_test_repo()?;

        repo.inner
            .remote("origin", "https://github.com/owner/repo")?;

        let repository = Repository::open(dir.path())?;
        let url = repository.remote_url()?;

        assert_eq!(url.as_deref(), Some("https://github.com/owner/repo"));

        Ok(())
    }

    #[test]
    fn push_without_remote_fails() -> anyhow::Result<()> {
        let (_dir, repo) = setup_test_repo()?;

        let result = repo.push(&["refs/heads/main:refs/heads/main".to_string()]);

        assert!(matches!(result, Err(GitError::RemoteNotFound { .. })));
        Ok(())
    }

    #[test]
    fn push_branch_and_tag_to_local_remote() -> anyhow::Result<()> {
        let (dir, repo) = setup_test_repo()?;

        let bare_dir = tempfile::TempDir::new()?;
        let bare = git2::Repository::init_bare(bare_dir.path())?;
        repo.inner
            .remote("origin", bare_dir.path().to_str().unwrap())?;

        fs::write(dir.path().join("package.json"), "{}")?;
        repo.stage_files(&[Path::new("package.json")])?;
        let commit = repo.commit("Publish")?;
        repo.create_tag("v1.0.0")?;

        let branch = repo.current_branch()?;
        let repository = Repository::open(dir.path())?;
        repository.push(&[
            format!("refs/heads/{branch}:refs/heads/{branch}"),
            "refs/tags/v1.0.0:refs/tags/v1.0.0".to_string(),
        ])?;

        let pushed_head = bare.find_reference(&format!("refs/heads/{branch}"))?;
        assert_eq!(pushed_head.peel_to_commit()?.id().to_string(), commit.sha);
        assert!(bare.find_reference("refs/tags/v1.0.0").is_ok());
        Ok(())
    }
}
