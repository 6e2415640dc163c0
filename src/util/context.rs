//! Global context for storyrow operations.
//!
//! Provides centralized access to the working directory, the storyrow home
//! directory, and layered configuration. Everything downstream receives its
//! settings from here explicitly; there is no process-wide mutable state.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::util::config::{global_config_path, load_config, project_config_path, Config};

/// Name of the template directory searched for when none is configured.
pub const TEMPLATES_DIR: &str = "templates";

/// Global context containing configuration and paths.
#[derive(Debug, Clone)]
pub struct GlobalContext {
    /// Current working directory
    cwd: PathBuf,

    /// Global config file (~/.storyrow/config.toml), if a home directory exists
    global_config: Option<PathBuf>,
}

impl GlobalContext {
    /// Create a new GlobalContext with defaults.
    pub fn new() -> Result<Self> {
        let cwd = std::env::current_dir().context("failed to get current directory")?;

        Ok(GlobalContext {
            cwd,
            global_config: global_config_path(),
        })
    }

    /// Create a GlobalContext with a specific working directory.
    pub fn with_cwd(cwd: PathBuf) -> Result<Self> {
        let mut ctx = Self::new()?;
        ctx.cwd = cwd;
        Ok(ctx)
    }

    /// Ignore the user's global config file.
    pub fn without_global_config(mut self) -> Self {
        self.global_config = None;
        self
    }

    /// Get the current working directory.
    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    /// Resolve a user-supplied project path against the working directory.
    pub fn project_root(&self, path: Option<&Path>) -> PathBuf {
        match path {
            Some(p) if p.is_absolute() => p.to_path_buf(),
            Some(p) => self.cwd.join(p),
            None => self.cwd.clone(),
        }
    }

    /// Load the merged configuration for a project.
    pub fn config_for(&self, project_root: &Path) -> Config {
        load_config(
            self.global_config.as_deref(),
            &project_config_path(project_root),
        )
    }

    /// Locate the template directory.
    ///
    /// A configured directory wins. Otherwise the first existing of
    /// `./templates` and `<executable dir>/templates` is used.
    pub fn template_dir(&self, config: &Config) -> Option<PathBuf> {
        if let Some(dir) = &config.template.dir {
            return Some(self.project_root(Some(dir)));
        }

        let exe_dir = std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(Path::to_path_buf));

        std::iter::once(self.cwd.join(TEMPLATES_DIR))
            .chain(exe_dir.map(|dir| dir.join(TEMPLATES_DIR)))
            .find(|candidate| candidate.is_dir())
    }
}
