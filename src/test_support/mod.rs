//! Test utilities and mocks for storyrow unit tests.
//!
//! The installer and scaffolder run every external command through
//! [`CommandRunner`], so tests swap in [`MockExecutor`] to script exit
//! codes and record what would have been run.
//!
//! # Example
//!
//! ```rust,ignore
//! use storyrow::test_support::{MockExecutor, MockProcessOutput};
//!
//! #[test]
//! fn test_example() {
//!     let mut exec = MockExecutor::new();
//!     exec.expect("npm install axios", MockProcessOutput::success());
//!
//!     // Pass `&mut exec` wherever a CommandRunner is wanted...
//! }
//! ```

pub mod fixtures;

use std::time::Duration;

use anyhow::{bail, Result};

use crate::ops::install::CommandRunner;
use crate::util::process::{ProcessBuilder, RunStatus};

pub use fixtures::*;

/// Mock process output for testing command execution.
#[derive(Debug, Clone)]
pub struct MockProcessOutput {
    /// Exit status code (0 = success).
    pub status: i32,
    /// Standard error, surfaced in debug logs only.
    pub stderr: String,
    /// Set when the process should look like it hit its deadline.
    pub timed_out: Option<Duration>,
}

impl MockProcessOutput {
    /// Create a successful output.
    ///
    /// Children inherit stdio, so there is no captured stdout to script.
    pub fn success() -> Self {
        MockProcessOutput {
            status: 0,
            stderr: String::new(),
            timed_out: None,
        }
    }

    /// Create a failure output with the given stderr and status code.
    pub fn failure(status: i32, stderr: impl Into<String>) -> Self {
        MockProcessOutput {
            status,
            stderr: stderr.into(),
            timed_out: None,
        }
    }

    /// Create an output for a process killed after `secs` seconds.
    pub fn timed_out(secs: u64) -> Self {
        MockProcessOutput {
            status: -1,
            stderr: String::new(),
            timed_out: Some(Duration::from_secs(secs)),
        }
    }

    /// Check if the process succeeded.
    pub fn success_status(&self) -> bool {
        self.timed_out.is_none() && self.status == 0
    }

    /// The status a real runner would have reported.
    pub fn run_status(&self) -> RunStatus {
        match self.timed_out {
            Some(after) => RunStatus::TimedOut(after),
            None => RunStatus::Exited(Some(self.status)),
        }
    }
}

impl Default for MockProcessOutput {
    fn default() -> Self {
        MockProcessOutput::success()
    }
}

/// Pattern for matching commands in MockExecutor.
#[derive(Debug, Clone)]
pub enum CommandPattern {
    /// Exact match on full command string.
    Exact(String),
    /// Match if command starts with prefix.
    StartsWith(String),
    /// Match using a regex pattern.
    Regex(String),
}

impl CommandPattern {
    /// Check if this pattern matches the given command.
    pub fn matches(&self, cmd: &str) -> bool {
        match self {
            CommandPattern::Exact(s) => cmd == s,
            CommandPattern::StartsWith(s) => cmd.starts_with(s),
            CommandPattern::Regex(pattern) => regex::Regex::new(pattern)
                .map(|re| re.is_match(cmd))
                .unwrap_or(false),
        }
    }
}

/// Expectation for a command execution.
#[derive(Debug, Clone)]
pub struct CommandExpectation {
    /// Pattern to match against commands.
    pub pattern: CommandPattern,
    /// Output to return when matched.
    pub output: MockProcessOutput,
    /// Number of times this expectation can be used (None = unlimited).
    pub times: Option<usize>,
    /// Number of times this expectation has been used.
    pub used: usize,
}

impl CommandExpectation {
    /// Create a new expectation.
    pub fn new(pattern: CommandPattern, output: MockProcessOutput) -> Self {
        CommandExpectation {
            pattern,
            output,
            times: None,
            used: 0,
        }
    }

    /// Set the number of times this expectation can be used.
    pub fn times(mut self, n: usize) -> Self {
        self.times = Some(n);
        self
    }

    /// Check if this expectation can still be used.
    pub fn available(&self) -> bool {
        match self.times {
            Some(n) => self.used < n,
            None => true,
        }
    }
}

/// Mock command runner.
///
/// Records every command as its display string (`npm install axios`) and
/// answers with the first available matching expectation, then the
/// default. Anything else is an error, the same way a missing binary is.
#[derive(Debug, Default)]
pub struct MockExecutor {
    expectations: Vec<CommandExpectation>,
    calls: Vec<String>,
    default_output: Option<MockProcessOutput>,
}

impl MockExecutor {
    /// Create a new mock executor.
    pub fn new() -> Self {
        MockExecutor::default()
    }

    /// Add an expectation for an exact command match, used exactly once.
    pub fn expect(&mut self, cmd: &str, output: MockProcessOutput) -> &mut Self {
        self.expectations.push(
            CommandExpectation::new(CommandPattern::Exact(cmd.to_string()), output).times(1),
        );
        self
    }

    /// Add an expectation for a command starting with a prefix.
    pub fn expect_prefix(&mut self, prefix: &str, output: MockProcessOutput) -> &mut Self {
        self.expectations.push(CommandExpectation::new(
            CommandPattern::StartsWith(prefix.to_string()),
            output,
        ));
        self
    }

    /// Add a custom expectation.
    pub fn expect_pattern(&mut self, expectation: CommandExpectation) -> &mut Self {
        self.expectations.push(expectation);
        self
    }

    /// Set a default output for commands that don't match any expectation.
    pub fn set_default(&mut self, output: MockProcessOutput) -> &mut Self {
        self.default_output = Some(output);
        self
    }

    /// Get all commands that were called.
    pub fn calls(&self) -> &[String] {
        &self.calls
    }

    /// Verify that all expectations with a specific count were satisfied.
    pub fn verify(&self) -> Result<()> {
        for (i, exp) in self.expectations.iter().enumerate() {
            if let Some(expected) = exp.times {
                if exp.used != expected {
                    bail!(
                        "expectation {} ({:?}) was used {} times, expected {}",
                        i,
                        exp.pattern,
                        exp.used,
                        expected
                    );
                }
            }
        }
        Ok(())
    }
}

impl CommandRunner for MockExecutor {
    fn run(&mut self, cmd: &ProcessBuilder) -> Result<RunStatus> {
        let full_cmd = cmd.display_command();
        self.calls.push(full_cmd.clone());

        for exp in &mut self.expectations {
            if exp.pattern.matches(&full_cmd) && exp.available() {
                exp.used += 1;
                if !exp.output.stderr.is_empty() {
                    tracing::debug!("{}: {}", full_cmd, exp.output.stderr);
                }
                return Ok(exp.output.run_status());
            }
        }

        if let Some(ref default) = self.default_output {
            return Ok(default.run_status());
        }

        bail!("unexpected command: {}", full_cmd)
    }
}

/// Assertion helpers for testing.
pub mod assertions {
    use std::path::Path;

    /// Assert that an error message contains a substring.
    pub fn assert_error_contains<T: std::fmt::Debug>(
        result: anyhow::Result<T>,
        substring: &str,
    ) {
        match result {
            Ok(v) => panic!("expected Err containing '{}', got Ok: {:?}", substring, v),
            Err(e) => {
                let msg = format!("{:#}", e);
                assert!(
                    msg.contains(substring),
                    "error '{}' does not contain '{}'",
                    msg,
                    substring
                );
            }
        }
    }

    /// Assert that a file exists and contains specific content.
    pub fn assert_file_contains(path: impl AsRef<Path>, content: &str) {
        let path = path.as_ref();
        let actual = std::fs::read_to_string(path)
            .unwrap_or_else(|_| panic!("file not found: {}", path.display()));
        assert!(
            actual.contains(content),
            "file {} does not contain '{}'\nactual content:\n{}",
            path.display(),
            content,
            actual
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn npm(args: &[&str]) -> ProcessBuilder {
        ProcessBuilder::new("npm").args(args)
    }

    #[test]
    fn test_mock_executor_basic() {
        let mut exec = MockExecutor::new();
        exec.expect("npm install axios", MockProcessOutput::success());
        exec.expect_prefix("npx prisma", MockProcessOutput::failure(1, "boom"));

        let status = exec.run(&npm(&["install", "axios"])).unwrap();
        assert!(status.success());

        let status = exec
            .run(&ProcessBuilder::new("npx").args(["prisma", "generate"]))
            .unwrap();
        assert_eq!(status, RunStatus::Exited(Some(1)));

        assert_eq!(exec.calls(), &["npm install axios", "npx prisma generate"]);
        exec.verify().unwrap();
    }

    #[test]
    fn test_mock_executor_unexpected() {
        let mut exec = MockExecutor::new();

        let err = exec.run(&npm(&["install", "zod"])).unwrap_err();
        assert!(err.to_string().contains("unexpected command: npm install zod"));
    }

    #[test]
    fn test_exact_expectation_is_used_once() {
        let mut exec = MockExecutor::new();
        exec.expect("npm install zod", MockProcessOutput::failure(1, ""));
        exec.set_default(MockProcessOutput::success());

        assert!(!exec.run(&npm(&["install", "zod"])).unwrap().success());
        assert!(exec.run(&npm(&["install", "zod"])).unwrap().success());
    }

    #[test]
    fn test_verify_reports_unused_expectation() {
        let mut exec = MockExecutor::new();
        exec.expect("yarn add zod", MockProcessOutput::success());
        assert!(exec.verify().is_err());
    }

    #[test]
    fn test_regex_pattern() {
        let mut exec = MockExecutor::new();
        exec.expect_pattern(CommandExpectation::new(
            CommandPattern::Regex(r"^npm install @[a-z]+/".to_string()),
            MockProcessOutput::timed_out(5),
        ));

        let status = exec.run(&npm(&["install", "@mui/material"])).unwrap();
        assert_eq!(status, RunStatus::TimedOut(Duration::from_secs(5)));
        assert!(!MockProcessOutput::timed_out(5).success_status());
    }
}
