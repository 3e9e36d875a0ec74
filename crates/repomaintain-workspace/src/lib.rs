mod config;
mod error;
mod tool;
mod workspace;

pub use config::{PublishMode, RepositoryConfig};
pub use error::WorkspaceError;
pub use tool::{ncu_upgrade, npm_audit_fix, npm_outdated, npm_update, reinstall, run_hook};
pub use workspace::discover;
