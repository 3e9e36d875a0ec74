mod client;
mod error;
mod npmrc;
mod parse;

pub use client::NpmRegistryClient;
pub use error::RegistryError;
pub use npmrc::{link_npmrc, unlink_npmrc};
pub use parse::parse_object_notation;
