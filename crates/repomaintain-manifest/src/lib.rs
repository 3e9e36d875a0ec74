mod document;
mod error;
mod rewriter;

pub use document::Manifest;
pub use error::ManifestError;
pub use rewriter::{apply_pinned, reconcile_to_target, strip_internal, ForcedUpdate, StripWarning};
