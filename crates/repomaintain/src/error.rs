use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Operation(#[from] repomaintain_operations::OperationError),

    #[error(transparent)]
    Pinned(#[from] repomaintain_pinned::PinnedError),

    #[error("could not determine the current directory")]
    CurrentDir(#[source] std::io::Error),
}

pub type Result<T> = std::result::Result<T, CliError>;
