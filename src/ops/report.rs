//! Console reporting for reconciliation passes.
//!
//! A pass ends in exactly one of three shapes: nothing missing, a list of
//! missing packages, or an install summary. Each shape is a status line in
//! human mode and a single event on stdout in JSON mode.

use std::collections::BTreeSet;

use serde::Serialize;
use serde_json::json;

use crate::ops::install::InstallReport;
use crate::util::diagnostic::suggestions;
use crate::util::{Shell, Status};

/// Lists handed back after the install summary is printed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct InstallSummary {
    /// Packages that installed
    pub succeeded: Vec<String>,
    /// Packages that did not
    pub failed: Vec<String>,
}

/// Renders pass results to a [`Shell`].
pub struct Reporter<'a> {
    shell: &'a Shell,
}

impl<'a> Reporter<'a> {
    pub fn new(shell: &'a Shell) -> Self {
        Reporter { shell }
    }

    /// Shape 1: every referenced package is declared.
    pub fn no_missing(&self, satisfied: usize) {
        self.shell.status(Status::Finished, no_missing_message());
        tracing::debug!("{} referenced packages already declared", satisfied);

        self.shell.json_event(&json!({
            "reason": "no-missing-dependencies",
            "satisfied": satisfied,
        }));
    }

    /// Shape 2: the missing packages, one per line.
    pub fn missing(&self, missing: &BTreeSet<String>) -> Vec<String> {
        self.shell
            .status(Status::Missing, missing_message(missing.len()));
        for name in missing {
            self.shell.line(name);
        }

        let names: Vec<String> = missing.iter().cloned().collect();
        self.shell.json_event(&json!({
            "reason": "missing-dependencies",
            "count": names.len(),
            "packages": names,
        }));
        names
    }

    /// Shape 3: how many installs succeeded and which ones failed.
    pub fn install_summary(&self, report: &InstallReport) -> InstallSummary {
        let summary = InstallSummary {
            succeeded: report.succeeded.clone(),
            failed: report.failed.iter().map(|f| f.name.clone()).collect(),
        };

        self.shell.status(
            Status::Finished,
            summary_message(summary.succeeded.len(), summary.failed.len()),
        );
        if !summary.failed.is_empty() {
            self.shell
                .warn(format!("failed to install: {}", summary.failed.join(", ")));
            self.shell.line(format!("help: {}", suggestions::INSTALL_FAILED));
        }

        self.shell.json_event(&json!({
            "reason": "install-summary",
            "succeeded": summary.succeeded,
            "failed": report.failed,
        }));
        summary
    }
}

/// Text of the nothing-to-do message.
pub fn no_missing_message() -> &'static str {
    "no missing dependencies found"
}

/// Text of the missing-packages header.
pub fn missing_message(count: usize) -> String {
    if count == 1 {
        "1 missing dependency found".to_string()
    } else {
        format!("{} missing dependencies found", count)
    }
}

/// Text of the install summary line.
pub fn summary_message(succeeded: usize, failed: usize) -> String {
    format!(
        "installed {} {}, {} failed",
        succeeded,
        if succeeded == 1 { "package" } else { "packages" },
        failed
    )
}
