//! Shared types and subprocess plumbing for the repomaintain workspace.

mod process;
mod types;

pub use process::{ProcessRunner, ToolError};
pub use types::{BumpType, Component, DependencyKind, Registry};
