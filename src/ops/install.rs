//! Per-package installation of missing dependencies.
//!
//! Each package is installed with its own package-manager invocation so that
//! one bad package cannot take the rest down with it. Outcomes are recorded
//! per package; nothing here returns an error for a failed install.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Result;
use serde::Serialize;

use crate::core::package_manager::PackageManager;
use crate::util::process::{ProcessBuilder, RunStatus};
use crate::util::{Shell, Status};

/// Runs external commands on behalf of the installer and scaffolder.
pub trait CommandRunner {
    /// Run `cmd` to completion with inherited stdio.
    ///
    /// `Err` means the command could not be started or waited on.
    fn run(&mut self, cmd: &ProcessBuilder) -> Result<RunStatus>;
}

/// Runs commands as real child processes.
#[derive(Debug, Clone, Default)]
pub struct SystemRunner {
    timeout: Option<Duration>,
}

impl SystemRunner {
    /// Create a runner that kills children after `timeout`.
    pub fn with_timeout(timeout: Option<Duration>) -> Self {
        SystemRunner { timeout }
    }
}

impl CommandRunner for SystemRunner {
    fn run(&mut self, cmd: &ProcessBuilder) -> Result<RunStatus> {
        tracing::debug!("running `{}`", cmd.display_command());
        cmd.status_with_timeout(self.timeout)
    }
}

/// Options for an install run.
#[derive(Debug, Clone)]
pub struct InstallOptions {
    /// Package manager to invoke
    pub manager: PackageManager,
    /// Directory the package manager runs in
    pub project_root: PathBuf,
}

impl InstallOptions {
    /// Build the install command for a single package.
    pub fn command_for(&self, package: &str) -> ProcessBuilder {
        ProcessBuilder::from_path(self.manager.program())
            .args(self.manager.install_args([package]))
            .cwd(&self.project_root)
    }
}

/// A package whose installation failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailedInstall {
    /// Package name
    pub name: String,
    /// Why it failed
    pub reason: String,
}

/// Per-package outcomes of an install run.
///
/// `succeeded` and `failed` are disjoint and together hold exactly the
/// packages that were passed in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct InstallReport {
    /// Packages installed successfully, in attempt order
    pub succeeded: Vec<String>,
    /// Packages that failed, in attempt order
    pub failed: Vec<FailedInstall>,
}

impl InstallReport {
    /// Whether every package installed.
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }

    /// Number of packages attempted.
    pub fn attempted(&self) -> usize {
        self.succeeded.len() + self.failed.len()
    }

    /// Names of failed packages.
    pub fn failed_names(&self) -> Vec<&str> {
        self.failed.iter().map(|f| f.name.as_str()).collect()
    }
}

/// Install each package independently, continuing past failures.
pub fn install_missing<'a, R>(
    packages: impl IntoIterator<Item = &'a str>,
    opts: &InstallOptions,
    runner: &mut R,
    shell: &Shell,
) -> InstallReport
where
    R: CommandRunner + ?Sized,
{
    let mut report = InstallReport::default();

    for package in packages {
        let cmd = opts.command_for(package);
        shell.status(Status::Installing, cmd.display_command());

        let outcome = match runner.run(&cmd) {
            Ok(status) => failure_reason(&status),
            Err(e) => Some(format!("{:#}", e)),
        };

        match outcome {
            None => {
                shell.status(Status::Installed, package);
                report.succeeded.push(package.to_string());
            }
            Some(reason) => {
                tracing::debug!("install of {} failed: {}", package, reason);
                shell.status(Status::Failed, format!("{} ({})", package, reason));
                report.failed.push(FailedInstall {
                    name: package.to_string(),
                    reason,
                });
            }
        }
    }

    report
}

/// Install a batch of packages with a single invocation.
///
/// Used for the fixed feature set of a freshly scaffolded project, where
/// all-or-nothing is the right behavior.
pub fn install_batch<R>(
    packages: &[&str],
    manager: PackageManager,
    project_root: &Path,
    runner: &mut R,
    shell: &Shell,
) -> Result<()>
where
    R: CommandRunner + ?Sized,
{
    if packages.is_empty() {
        return Ok(());
    }

    let cmd = ProcessBuilder::from_path(manager.program())
        .args(manager.install_args(packages.iter().copied()))
        .cwd(project_root);
    shell.status(Status::Installing, cmd.display_command());

    match runner.run(&cmd)? {
        status if status.success() => Ok(()),
        status => anyhow::bail!(
            "`{}` failed: {}",
            cmd.display_command(),
            failure_reason(&status).unwrap_or_default()
        ),
    }
}

/// Describe a non-successful run; `None` for success.
pub fn failure_reason(status: &RunStatus) -> Option<String> {
    match status {
        RunStatus::Exited(Some(0)) => None,
        RunStatus::Exited(Some(code)) => Some(format!("exit code {}", code)),
        RunStatus::Exited(None) => Some("terminated by signal".to_string()),
        RunStatus::TimedOut(after) => Some(format!("timed out after {}s", after.as_secs())),
    }
}
