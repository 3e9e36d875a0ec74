use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PinnedError {
    #[error("could not read '{path}': file does not exist")]
    CredentialsMissing { path: PathBuf },

    #[error("failed to read credentials at '{path}'")]
    CredentialsRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse credentials at '{path}'")]
    CredentialsParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("could not establish connection to the Confluence service")]
    Http(#[from] reqwest::Error),

    #[error(
        "could not find Confluence page '{title}' in space '{space}'\ncheck whether these settings changed in the 'MonorepoTemplate' repository"
    )]
    PageNotFound { title: String, space: String },

    #[error(
        "this CLI version is outdated for the pinned dependency page\ndownstream the changes made in the 'MonorepoTemplate' repository before running this command again"
    )]
    ProcessorVersionMismatch,

    #[error(
        "could not extract information from the Confluence page '{title}'\ncheck whether the formatting of the page is off"
    )]
    PageFormat { title: String },
}
