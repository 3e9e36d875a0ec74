mod confluence;
mod error;
mod page;
mod types;

pub use confluence::ConfluenceStore;
pub use error::PinnedError;
pub use types::{PinnedDependency, PinnedStore};
