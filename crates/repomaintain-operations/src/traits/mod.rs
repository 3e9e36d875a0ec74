mod git_access;
mod interaction;
mod package_tools;
mod registry_access;

pub use git_access::GitAccess;
pub use interaction::InteractionProvider;
pub use package_tools::PackageTools;
pub use registry_access::RegistryAccess;
