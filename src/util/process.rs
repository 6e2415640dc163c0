//! Subprocess execution utilities.
//!
//! Every child started here inherits the parent's stdout and stderr, so
//! package-manager and generator output streams to the user live.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};

/// How often a child with a deadline is polled.
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// How a child process ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    /// The process exited on its own; `None` if killed by a signal.
    Exited(Option<i32>),
    /// The deadline passed and the process was killed.
    TimedOut(Duration),
}

impl RunStatus {
    /// Whether the process exited successfully.
    pub fn success(&self) -> bool {
        matches!(self, RunStatus::Exited(Some(0)))
    }
}

impl From<ExitStatus> for RunStatus {
    fn from(status: ExitStatus) -> Self {
        RunStatus::Exited(status.code())
    }
}

/// Builder for subprocess execution.
#[derive(Debug, Clone)]
pub struct ProcessBuilder {
    program: PathBuf,
    args: Vec<String>,
    cwd: Option<PathBuf>,
}

impl ProcessBuilder {
    /// Create a new process builder for the given program.
    pub fn new(program: impl AsRef<Path>) -> Self {
        ProcessBuilder {
            program: program.as_ref().to_path_buf(),
            args: Vec::new(),
            cwd: None,
        }
    }

    /// Create a process builder for a program looked up in PATH.
    ///
    /// Falls back to the bare name when it cannot be found, so the spawn
    /// failure surfaces with the name the user knows.
    pub fn from_path(name: &str) -> Self {
        Self::new(find_executable(name).unwrap_or_else(|| PathBuf::from(name)))
    }

    /// Add a single argument.
    pub fn arg(mut self, arg: impl AsRef<OsStr>) -> Self {
        self.args.push(arg.as_ref().to_string_lossy().into_owned());
        self
    }

    /// Add multiple arguments.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        self.args.extend(
            args.into_iter()
                .map(|s| s.as_ref().to_string_lossy().into_owned()),
        );
        self
    }

    /// Set the working directory.
    pub fn cwd(mut self, cwd: impl AsRef<Path>) -> Self {
        self.cwd = Some(cwd.as_ref().to_path_buf());
        self
    }

    /// Get the program path.
    pub fn get_program(&self) -> &Path {
        &self.program
    }

    /// Get the working directory.
    pub fn get_cwd(&self) -> Option<&Path> {
        self.cwd.as_deref()
    }

    /// Build the Command.
    fn build_command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);

        if let Some(ref cwd) = self.cwd {
            cmd.current_dir(cwd);
        }

        cmd
    }

    /// Execute with inherited stdio and return the exit status.
    pub fn status(&self) -> Result<ExitStatus> {
        let mut cmd = self.build_command();
        let status = cmd
            .status()
            .with_context(|| format!("failed to execute `{}`", self.display_command()))?;
        Ok(status)
    }

    /// Execute with inherited stdio, killing the child after `timeout`.
    pub fn status_with_timeout(&self, timeout: Option<Duration>) -> Result<RunStatus> {
        let Some(timeout) = timeout else {
            return self.status().map(RunStatus::from);
        };

        let mut child = self
            .build_command()
            .spawn()
            .with_context(|| format!("failed to spawn `{}`", self.display_command()))?;

        let start = Instant::now();
        loop {
            if let Some(status) = child
                .try_wait()
                .with_context(|| format!("failed to wait for `{}`", self.display_command()))?
            {
                return Ok(RunStatus::from(status));
            }

            if start.elapsed() >= timeout {
                tracing::debug!("killing `{}` after {:?}", self.display_command(), timeout);
                // The child may have exited between try_wait and kill
                let _ = child.kill();
                let _ = child.wait();
                return Ok(RunStatus::TimedOut(timeout));
            }

            thread::sleep(POLL_INTERVAL);
        }
    }

    /// Display the command for error messages.
    ///
    /// Uses the program's file stem so resolved paths print as `npm`.
    pub fn display_command(&self) -> String {
        let program = self
            .program
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.program.display().to_string());
        let mut parts = vec![program];
        parts.extend(self.args.iter().cloned());
        parts.join(" ")
    }
}

/// Find an executable in PATH.
pub fn find_executable(name: &str) -> Option<PathBuf> {
    which::which(name).ok()
}
