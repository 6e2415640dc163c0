//! Package manager selection.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Lockfile whose presence selects yarn.
pub const YARN_LOCKFILE: &str = "yarn.lock";

/// The two supported package managers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PackageManager {
    #[default]
    Npm,
    Yarn,
}

impl PackageManager {
    /// Pick the manager for a project.
    ///
    /// Yarn wins if the user asked for it or the project already has a
    /// yarn lockfile; npm otherwise.
    pub fn detect(project_root: &Path, prefer_yarn: bool) -> Self {
        if prefer_yarn || project_root.join(YARN_LOCKFILE).is_file() {
            PackageManager::Yarn
        } else {
            PackageManager::Npm
        }
    }

    /// Executable name.
    pub fn program(&self) -> &'static str {
        match self {
            PackageManager::Npm => "npm",
            PackageManager::Yarn => "yarn",
        }
    }

    /// Subcommand that adds packages to the project.
    pub fn add_subcommand(&self) -> &'static str {
        match self {
            PackageManager::Npm => "install",
            PackageManager::Yarn => "add",
        }
    }

    /// Full argument list for installing `packages`.
    pub fn install_args<'a>(&self, packages: impl IntoIterator<Item = &'a str>) -> Vec<String> {
        std::iter::once(self.add_subcommand().to_string())
            .chain(packages.into_iter().map(str::to_string))
            .collect()
    }
}

impl fmt::Display for PackageManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.program())
    }
}

impl FromStr for PackageManager {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "npm" => Ok(PackageManager::Npm),
            "yarn" => Ok(PackageManager::Yarn),
            _ => Err(format!(
                "invalid package manager '{}'; expected 'npm' or 'yarn'",
                s
            )),
        }
    }
}
