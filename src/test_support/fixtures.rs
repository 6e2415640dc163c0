//! Test fixtures for JavaScript project trees.
//!
//! Provides builders for the on-disk shapes the reconciler reads: a
//! `package.json`, a source tree, and optionally a yarn lockfile.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde_json::json;

use crate::core::manifest::MANIFEST_FILE;
use crate::core::package_manager::YARN_LOCKFILE;

/// A JavaScript project fixture.
#[derive(Debug, Clone, Default)]
pub struct JsProjectFixture {
    /// Runtime dependencies written to `dependencies`
    pub dependencies: BTreeMap<String, String>,
    /// Development dependencies written to `devDependencies`
    pub dev_dependencies: BTreeMap<String, String>,
    /// Raw manifest text; overrides the generated one when set
    pub raw_manifest: Option<String>,
    /// Whether to write `package.json` at all
    pub write_manifest: bool,
    /// Source files relative to the project root
    pub sources: BTreeMap<PathBuf, String>,
    /// Whether to write an empty `yarn.lock`
    pub yarn_lock: bool,
}

impl JsProjectFixture {
    /// An empty project with a manifest and no sources.
    pub fn new() -> Self {
        JsProjectFixture {
            write_manifest: true,
            ..Default::default()
        }
    }

    /// A Next.js-shaped app declaring react, react-dom and next.
    pub fn next_app() -> Self {
        JsProjectFixture::new()
            .with_dependency("next", "15.0.0")
            .with_dependency("react", "^19.0.0")
            .with_dependency("react-dom", "^19.0.0")
            .with_dev_dependency("typescript", "^5")
            .with_source(
                "src/app/layout.tsx",
                "import type { Metadata } from \"next\";\nimport \"./globals.css\";\n",
            )
            .with_source(
                "src/app/page.tsx",
                "import Link from \"next/link\";\nimport { Button } from \"@/components/button\";\n",
            )
    }

    /// Add a runtime dependency.
    pub fn with_dependency(mut self, name: &str, version: &str) -> Self {
        self.dependencies.insert(name.to_string(), version.to_string());
        self
    }

    /// Add a development dependency.
    pub fn with_dev_dependency(mut self, name: &str, version: &str) -> Self {
        self.dev_dependencies
            .insert(name.to_string(), version.to_string());
        self
    }

    /// Add a source file.
    pub fn with_source(mut self, path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        self.sources.insert(path.into(), content.into());
        self
    }

    /// Write this text as `package.json` verbatim.
    pub fn with_raw_manifest(mut self, manifest: impl Into<String>) -> Self {
        self.raw_manifest = Some(manifest.into());
        self
    }

    /// Do not write `package.json`.
    pub fn without_manifest(mut self) -> Self {
        self.write_manifest = false;
        self
    }

    /// Write a `yarn.lock` next to the manifest.
    pub fn with_yarn_lock(mut self) -> Self {
        self.yarn_lock = true;
        self
    }

    /// Render the manifest this fixture writes.
    pub fn manifest(&self) -> String {
        if let Some(ref raw) = self.raw_manifest {
            return raw.clone();
        }
        let manifest = json!({
            "name": "fixture-app",
            "version": "0.1.0",
            "private": true,
            "dependencies": self.dependencies,
            "devDependencies": self.dev_dependencies,
        });
        serde_json::to_string_pretty(&manifest).unwrap_or_default()
    }

    /// Write this fixture into `dir` and return `dir`.
    pub fn write_to(&self, dir: &Path) -> std::io::Result<PathBuf> {
        std::fs::create_dir_all(dir)?;

        if self.write_manifest {
            std::fs::write(dir.join(MANIFEST_FILE), self.manifest())?;
        }

        for (rel_path, content) in &self.sources {
            let full_path = dir.join(rel_path);
            if let Some(parent) = full_path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(&full_path, content)?;
        }

        if self.yarn_lock {
            std::fs::write(dir.join(YARN_LOCKFILE), "")?;
        }

        Ok(dir.to_path_buf())
    }
}

/// Lay out a scaffolding template tree under `dir`.
///
/// Produces `base/prisma/schema.prisma`, `base/eslint.config.mjs`,
/// `base/.env` and `src/app/page.tsx` for the named template.
pub fn write_template(dir: &Path, name: &str) -> std::io::Result<PathBuf> {
    let root = dir.join(name);
    let files: [(&str, &str); 4] = [
        (
            "base/prisma/schema.prisma",
            "datasource db {\n  provider = \"mongodb\"\n  url = env(\"DATABASE_URL\")\n}\n",
        ),
        ("base/eslint.config.mjs", "export default [];\n"),
        ("base/.env", "DATABASE_URL=\"mongodb://localhost/app\"\n"),
        (
            "src/app/page.tsx",
            "import { motion } from \"framer-motion\";\nimport Link from \"next/link\";\n",
        ),
    ];
    for (rel, content) in files {
        let path = root.join(rel);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)?;
    }
    Ok(root)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_manifest_lists_both_tables() {
        let manifest = JsProjectFixture::new()
            .with_dependency("react", "^19")
            .with_dev_dependency("eslint", "^9")
            .manifest();

        let value: serde_json::Value = serde_json::from_str(&manifest).unwrap();
        assert_eq!(value["dependencies"]["react"], "^19");
        assert_eq!(value["devDependencies"]["eslint"], "^9");
    }

    #[test]
    fn test_write_to() {
        let tmp = TempDir::new().unwrap();
        let root = JsProjectFixture::next_app()
            .with_yarn_lock()
            .write_to(tmp.path())
            .unwrap();

        assert!(root.join("package.json").is_file());
        assert!(root.join("yarn.lock").is_file());
        assert!(root.join("src/app/page.tsx").is_file());
    }

    #[test]
    fn test_without_manifest() {
        let tmp = TempDir::new().unwrap();
        let root = JsProjectFixture::new()
            .without_manifest()
            .with_source("src/index.ts", "")
            .write_to(tmp.path())
            .unwrap();

        assert!(!root.join("package.json").exists());
        assert!(root.join("src/index.ts").exists());
    }

    #[test]
    fn test_write_template() {
        let tmp = TempDir::new().unwrap();
        let root = write_template(tmp.path(), "default").unwrap();

        assert!(root.join("base/prisma/schema.prisma").is_file());
        assert!(root.join("base/.env").is_file());
        assert!(root.join("src/app/page.tsx").is_file());
    }
}
