use std::fmt;
use std::path::PathBuf;

use clap::ValueEnum;
use semver::Version;
use serde::{Deserialize, Serialize};

/// Name of the synthetic component that represents the repository root.
pub const ROOT_COMPONENT: &str = "root";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum BumpType {
    Patch,
    Minor,
    Major,
}

impl BumpType {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Patch => "patch",
            Self::Minor => "minor",
            Self::Major => "major",
        }
    }
}

/// A dependency map inside a component manifest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DependencyKind {
    Runtime,
    Development,
    Peer,
}

impl DependencyKind {
    #[must_use]
    pub fn manifest_key(self) -> &'static str {
        match self {
            Self::Runtime => "dependencies",
            Self::Development => "devDependencies",
            Self::Peer => "peerDependencies",
        }
    }
}

/// A package registry that components can be published to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Registry {
    Github,
    Npm,
}

impl Registry {
    #[must_use]
    pub fn url(self) -> &'static str {
        match self {
            Self::Github => "https://npm.pkg.github.com/",
            Self::Npm => "https://registry.npmjs.org/",
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Github => "GitHub",
            Self::Npm => "NPM",
        }
    }
}

impl fmt::Display for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// One internally managed package of the monorepo.
///
/// The synthetic root component carries no version and is always private.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Component {
    pub name: String,
    pub version: Option<Version>,
    pub private: bool,
    pub location: PathBuf,
}

impl Component {
    #[must_use]
    pub fn root(location: PathBuf) -> Self {
        Self {
            name: ROOT_COMPONENT.to_string(),
            version: None,
            private: true,
            location,
        }
    }

    #[must_use]
    pub fn is_root(&self) -> bool {
        self.name == ROOT_COMPONENT
    }

    #[must_use]
    pub fn manifest_path(&self) -> PathBuf {
        self.location.join("package.json")
    }

    #[must_use]
    pub fn lock_path(&self) -> PathBuf {
        self.location.join("package-lock.json")
    }
}
