use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GitError {
    #[error("git operation failed")]
    Git(#[from] git2::Error),

    #[error("not a git repository: '{path}'")]
    NotARepository { path: PathBuf },

    #[error("package.json files have uncommitted changes: {}", paths.join(", "))]
    DirtyManifests { paths: Vec<String> },

    #[error("HEAD is detached, not on a branch")]
    DetachedHead,

    #[error("repository has no remote named '{name}'")]
    RemoteNotFound { name: String },
}
