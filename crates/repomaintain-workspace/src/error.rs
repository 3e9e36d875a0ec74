use std::path::PathBuf;

use repomaintain_core::ToolError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WorkspaceError {
    #[error(transparent)]
    Tool(#[from] ToolError),

    #[error("failed to parse lerna component list")]
    ComponentList(#[source] serde_json::Error),

    #[error("failed to read '{path}'")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse '{path}'")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to write '{path}'")]
    ConfigWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
