use std::path::PathBuf;

use thiserror::Error;

/// One file that could not be restored or cleaned up.
#[derive(Debug)]
pub struct RestoreFailure {
    pub path: PathBuf,
    pub source: std::io::Error,
}

#[derive(Debug, Error)]
pub enum TxnError {
    #[error("cannot stage '{path}': file does not exist")]
    MissingSource { path: PathBuf },

    #[error("failed to back up '{path}'")]
    Backup {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("rolled back, but {} file(s) could not be restored: {}", failures.len(), render(failures))]
    RestoreFailed { failures: Vec<RestoreFailure> },

    #[error("{} backup file(s) could not be removed: {}", failures.len(), render(failures))]
    CleanupFailed { failures: Vec<RestoreFailure> },
}

fn render(failures: &[RestoreFailure]) -> String {
    failures
        .iter()
        .map(|f| f.path.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
