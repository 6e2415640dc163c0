//! Configuration file support for storyrow.
//!
//! storyrow reads two configuration file locations:
//! - Global: `~/.storyrow/config.toml` - User-wide defaults
//! - Project: `.storyrow/config.toml` - Project-specific overrides
//!
//! Project config takes precedence over global config. Command-line flags
//! take precedence over both.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::core::package_manager::PackageManager;

/// storyrow configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Import scanning settings
    pub scan: ScanConfig,

    /// Package installation settings
    pub install: InstallConfig,

    /// Project template settings
    pub template: TemplateConfig,

    /// Prisma settings used by `storyrow new --with-prisma`
    pub prisma: PrismaConfig,
}

/// Import scanning configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Source directory, relative to the project root
    pub source_dir: PathBuf,

    /// File extensions (without the dot) that are scanned
    pub extensions: Vec<String>,

    /// Prefixes of the project's own import aliases
    pub alias_prefixes: Vec<String>,

    /// Prefixes reserved for runtime built-in modules
    pub runtime_prefixes: Vec<String>,

    /// Additional package names that are never installed
    pub exclude: Vec<String>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        ScanConfig {
            source_dir: PathBuf::from("src"),
            extensions: ["ts", "tsx", "js", "jsx"].map(String::from).to_vec(),
            alias_prefixes: vec!["@/".to_string()],
            runtime_prefixes: vec!["node:".to_string()],
            exclude: Vec::new(),
        }
    }
}

/// Package installation configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InstallConfig {
    /// Force a package manager instead of detecting it from the lockfile
    pub manager: Option<PackageManager>,

    /// Per-package install timeout in seconds (None = wait forever)
    pub timeout_secs: Option<u64>,
}

impl InstallConfig {
    /// Per-package install deadline.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

/// Template configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TemplateConfig {
    /// Directory holding one subdirectory per template
    pub dir: Option<PathBuf>,
}

/// Prisma configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PrismaConfig {
    /// Datasource provider passed to `prisma init`
    pub provider: String,
}

impl Default for PrismaConfig {
    fn default() -> Self {
        PrismaConfig {
            provider: "mongodb".to_string(),
        }
    }
}

/// One configuration file as written.
///
/// Keys the file does not set stay `None`, so applying a layer only
/// overrides what it names, even when it names a default value.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ConfigLayer {
    pub scan: ScanLayer,
    pub install: InstallConfig,
    pub template: TemplateConfig,
    pub prisma: PrismaLayer,
}

/// `[scan]` as written in one file.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ScanLayer {
    pub source_dir: Option<PathBuf>,
    pub extensions: Option<Vec<String>>,
    pub alias_prefixes: Option<Vec<String>>,
    pub runtime_prefixes: Option<Vec<String>>,
    pub exclude: Vec<String>,
}

/// `[prisma]` as written in one file.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct PrismaLayer {
    pub provider: Option<String>,
}

impl ConfigLayer {
    /// Load one layer from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("failed to parse config file: {}", path.display()))
    }

    /// Load a layer, treating a missing or broken file as empty.
    pub fn load_or_empty(path: &Path) -> Self {
        if path.exists() {
            Self::load(path).unwrap_or_else(|e| {
                tracing::warn!("Failed to load config from {}: {:#}", path.display(), e);
                Self::default()
            })
        } else {
            Self::default()
        }
    }
}

impl Config {
    /// Load configuration from a single file on top of the defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let mut config = Config::default();
        config.apply(ConfigLayer::load(path)?);
        Ok(config)
    }

    /// Apply a layer on top of this config. Set keys win; exclusions
    /// accumulate.
    pub fn apply(&mut self, layer: ConfigLayer) {
        let ScanLayer {
            source_dir,
            extensions,
            alias_prefixes,
            runtime_prefixes,
            exclude,
        } = layer.scan;

        if let Some(dir) = source_dir {
            self.scan.source_dir = dir;
        }
        if let Some(exts) = extensions {
            self.scan.extensions = exts;
        }
        if let Some(prefixes) = alias_prefixes {
            self.scan.alias_prefixes = prefixes;
        }
        if let Some(prefixes) = runtime_prefixes {
            self.scan.runtime_prefixes = prefixes;
        }
        for name in exclude {
            if !self.scan.exclude.contains(&name) {
                self.scan.exclude.push(name);
            }
        }

        if layer.install.manager.is_some() {
            self.install.manager = layer.install.manager;
        }
        if layer.install.timeout_secs.is_some() {
            self.install.timeout_secs = layer.install.timeout_secs;
        }

        if layer.template.dir.is_some() {
            self.template.dir = layer.template.dir;
        }

        if let Some(provider) = layer.prisma.provider {
            self.prisma.provider = provider;
        }
    }
}

/// Load merged configuration from global and project locations.
///
/// Order of precedence (highest to lowest):
/// 1. Project config (.storyrow/config.toml)
/// 2. Global config (~/.storyrow/config.toml)
/// 3. Defaults
pub fn load_config(global_path: Option<&Path>, project_path: &Path) -> Config {
    let mut config = Config::default();

    if let Some(global_path) = global_path {
        config.apply(ConfigLayer::load_or_empty(global_path));
    }

    // Project config overrides global
    config.apply(ConfigLayer::load_or_empty(project_path));

    config
}

/// Get the global storyrow config directory (~/.storyrow).
pub fn global_config_dir() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|b| b.home_dir().join(".storyrow"))
}

/// Get the global config path (~/.storyrow/config.toml).
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("config.toml"))
}

/// Get the project config path (.storyrow/config.toml).
pub fn project_config_path(project_root: &Path) -> PathBuf {
    project_root.join(".storyrow").join("config.toml")
}
