//! Reconciliation error types and diagnostics.

use std::path::PathBuf;

use miette::Diagnostic as MietteDiagnostic;
use thiserror::Error;

use crate::util::diagnostic::{suggestions, Diagnostic};

/// Fatal error during a reconciliation pass.
///
/// Per-file scan failures and per-package install failures are not
/// represented here; they are collected into the scan and install reports.
#[derive(Debug, Error, MietteDiagnostic)]
pub enum ReconcileError {
    #[error("no package.json found at `{}`", path.display())]
    #[diagnostic(
        code(storyrow::manifest::not_found),
        help("run `npm init -y` in the project root, or pass the project path")
    )]
    ManifestNotFound { path: PathBuf },

    #[error("failed to read `{}`", path.display())]
    #[diagnostic(code(storyrow::manifest::read))]
    ManifestRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse `{}`", path.display())]
    #[diagnostic(
        code(storyrow::manifest::parse),
        help("fix the JSON syntax in package.json")
    )]
    ManifestParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("source directory `{}` does not exist", path.display())]
    #[diagnostic(
        code(storyrow::scan::root_not_found),
        help("pass `--source-dir` or set `scan.source_dir` in .storyrow/config.toml")
    )]
    SourceRootNotFound { path: PathBuf },
}

impl ReconcileError {
    /// The path that caused the failure.
    pub fn path(&self) -> &PathBuf {
        match self {
            ReconcileError::ManifestNotFound { path }
            | ReconcileError::ManifestRead { path, .. }
            | ReconcileError::ManifestParse { path, .. }
            | ReconcileError::SourceRootNotFound { path } => path,
        }
    }

    /// Convert to a user-friendly diagnostic.
    pub fn to_diagnostic(&self) -> Diagnostic {
        let diag = Diagnostic::error(self.to_string()).with_location(self.path());

        match self {
            ReconcileError::ManifestNotFound { .. } => {
                diag.with_suggestion(suggestions::NO_MANIFEST)
            }
            ReconcileError::ManifestRead { source, .. } => diag.with_context(source.to_string()),
            ReconcileError::ManifestParse { source, .. } => diag
                .with_context(format!("line {}, column {}", source.line(), source.column()))
                .with_context(source.to_string())
                .with_suggestion(suggestions::INVALID_MANIFEST),
            ReconcileError::SourceRootNotFound { .. } => {
                diag.with_suggestion(suggestions::NO_SOURCE_DIR)
            }
        }
    }
}
