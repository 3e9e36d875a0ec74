use std::path::PathBuf;

use repomaintain_core::ToolError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error(transparent)]
    Tool(#[from] ToolError),

    #[error(
        "you are not logged in to the npm registry\nrun 'npm login --registry {registry}' and use your ShapeDiver account"
    )]
    NotAuthenticated { registry: String },

    #[error("could not link '{path}': file does not exist")]
    NpmrcMissing { path: PathBuf },

    #[error("failed to read '{path}'")]
    NpmrcRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write '{path}'")]
    NpmrcWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
