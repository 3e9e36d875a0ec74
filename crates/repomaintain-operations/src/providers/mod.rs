mod git;
mod registry;
mod tools;

pub use git::Git2Access;
pub use registry::NpmCliRegistry;
pub use tools::LernaTools;
