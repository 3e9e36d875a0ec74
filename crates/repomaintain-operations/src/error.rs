use repomaintain_core::Registry;
use semver::Version;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum OperationError {
    #[error(transparent)]
    Workspace(#[from] repomaintain_workspace::WorkspaceError),

    #[error(transparent)]
    Manifest(#[from] repomaintain_manifest::ManifestError),

    #[error(transparent)]
    Transaction(#[from] repomaintain_txn::TxnError),

    #[error(transparent)]
    Git(#[from] repomaintain_git::GitError),

    #[error(transparent)]
    Registry(#[from] repomaintain_registry::RegistryError),

    #[error(transparent)]
    Pinned(#[from] repomaintain_pinned::PinnedError),

    #[error(transparent)]
    Tool(#[from] repomaintain_core::ToolError),

    #[error("failed to show an interactive prompt")]
    Prompt(#[source] std::io::Error),

    #[error("operation cancelled")]
    Cancelled,

    #[error("found no public components that are managed by the workspace tool")]
    NoPublicComponents,

    #[error(
        "cannot release all public components since they do not share the same version:\n{}",
        components.join("\n")
    )]
    SharedVersionMismatch { components: Vec<String> },

    #[error("no registry selected")]
    NoRegistrySelected,

    #[error("at least one component must be selected")]
    EmptySelection,

    #[error("component '{name}' has no valid version")]
    MissingVersion { name: String },

    #[error("invalid version string: '{input}'")]
    InvalidCustomVersion { input: String },

    #[error("{name}@{version} is already published to {registry}")]
    AlreadyPublished {
        name: String,
        version: Version,
        registry: Registry,
    },
}

pub type Result<T> = std::result::Result<T, OperationError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cancelled_error_message() {
        let err = OperationError::Cancelled;

        assert!(err.to_string().contains("cancelled"));
    }

    #[test]
    fn shared_version_mismatch_lists_components() {
        let err = OperationError::SharedVersionMismatch {
            components: vec![
                "  * viewer, 1.2.0".to_string(),
                "  * api, 1.1.0".to_string(),
            ],
        };

        let msg = err.to_string();

        assert!(msg.contains("viewer, 1.2.0"));
        assert!(msg.contains("api, 1.1.0"));
    }

    #[test]
    fn already_published_names_the_registry() {
        let err = OperationError::AlreadyPublished {
            name: "@shapediver/viewer".to_string(),
            version: Version::new(1, 2, 0),
            registry: Registry::Npm,
        };

        let msg = err.to_string();

        assert!(msg.contains("@shapediver/viewer@1.2.0"));
        assert!(msg.contains("NPM"));
    }

    #[test]
    fn tool_error_converts_via_from() {
        let tool_err = repomaintain_core::ToolError::Terminated {
            command: "npm update".to_string(),
        };

        let err: OperationError = tool_err.into();

        assert!(matches!(err, OperationError::Tool(_)));
    }
}
