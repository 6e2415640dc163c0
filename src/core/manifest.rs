//! `package.json` reading.
//!
//! Only the two dependency tables matter for reconciliation; every other
//! field of the manifest is ignored.

use std::collections::{BTreeMap, BTreeSet};
use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::core::errors::ReconcileError;

/// File name of the manifest at the project root.
pub const MANIFEST_FILE: &str = "package.json";

/// The dependency tables of a `package.json`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageJson {
    /// Runtime dependencies (name -> version constraint)
    #[serde(default)]
    pub dependencies: BTreeMap<String, String>,

    /// Development dependencies (name -> version constraint)
    #[serde(default)]
    pub dev_dependencies: BTreeMap<String, String>,
}

impl PackageJson {
    /// Load the manifest from a project root directory.
    pub fn load(project_root: &Path) -> Result<Self, ReconcileError> {
        let path = manifest_path(project_root);
        let contents = std::fs::read_to_string(&path).map_err(|source| {
            if source.kind() == io::ErrorKind::NotFound {
                ReconcileError::ManifestNotFound { path: path.clone() }
            } else {
                ReconcileError::ManifestRead {
                    path: path.clone(),
                    source,
                }
            }
        })?;

        Self::parse(&contents, &path)
    }

    /// Parse manifest contents. `path` is only used for error reporting.
    pub fn parse(contents: &str, path: &Path) -> Result<Self, ReconcileError> {
        serde_json::from_str(contents).map_err(|source| ReconcileError::ManifestParse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Union of the names in both dependency tables.
    pub fn declared_names(&self) -> BTreeSet<String> {
        self.dependencies
            .keys()
            .chain(self.dev_dependencies.keys())
            .cloned()
            .collect()
    }

    /// Whether `name` is declared in either table.
    pub fn declares(&self, name: &str) -> bool {
        self.dependencies.contains_key(name) || self.dev_dependencies.contains_key(name)
    }
}

/// Path of the manifest for a project root.
pub fn manifest_path(project_root: &Path) -> PathBuf {
    project_root.join(MANIFEST_FILE)
}
