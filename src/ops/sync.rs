//! Implementation of a reconciliation pass (`storyrow sync`).
//!
//! read manifest -> scan sources -> reconcile -> install -> report.
//! Manifest and scan-root failures abort the pass; per-file read errors and
//! per-package install failures do not.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::core::errors::ReconcileError;
use crate::core::manifest::PackageJson;
use crate::core::package_manager::PackageManager;
use crate::core::specifier::ImportFilter;
use crate::ops::install::{install_missing, CommandRunner, InstallOptions, InstallReport};
use crate::ops::reconcile::{reconcile, Reconciliation};
use crate::ops::report::{InstallSummary, Reporter};
use crate::ops::scan::ImportScanner;
use crate::util::{Config, Shell, Status};

/// Options for a reconciliation pass.
#[derive(Debug, Clone, Default)]
pub struct SyncOptions {
    /// Force yarn regardless of config and lockfile
    pub use_yarn: bool,
    /// Report missing packages without installing them
    pub dry_run: bool,
    /// Source directory, relative to the project root; overrides config
    pub source_dir: Option<PathBuf>,
}

/// Everything a pass found and did.
#[derive(Debug, Clone, Default)]
pub struct SyncOutcome {
    /// The reconciled sets
    pub reconciliation: Reconciliation,
    /// Eligible source files read
    pub files_scanned: usize,
    /// Manager that was (or would have been) used
    pub manager: PackageManager,
    /// Install results; `None` when nothing was installed
    pub install: Option<InstallReport>,
    /// Lists returned by the reporter after installing
    pub summary: Option<InstallSummary>,
}

impl SyncOutcome {
    /// Whether any install failed.
    pub fn has_failures(&self) -> bool {
        self.install.as_ref().is_some_and(|r| !r.is_success())
    }
}

/// Pick the package manager for a pass.
///
/// Yarn if `--use-yarn` is given, `install.manager = "yarn"` is configured,
/// or the project has a yarn lockfile. `manager = "npm"` never overrides an
/// existing yarn lockfile.
pub fn select_manager(root: &Path, config: &Config, use_yarn: bool) -> PackageManager {
    let prefer_yarn = use_yarn || config.install.manager == Some(PackageManager::Yarn);
    PackageManager::detect(root, prefer_yarn)
}

/// Run one reconciliation pass over the project at `root`.
pub fn sync_project<R>(
    root: &Path,
    config: &Config,
    opts: &SyncOptions,
    runner: &mut R,
    shell: &Arc<Shell>,
) -> Result<SyncOutcome, ReconcileError>
where
    R: CommandRunner + ?Sized,
{
    let manifest = PackageJson::load(root)?;
    let declared = manifest.declared_names();
    tracing::debug!("{} packages declared in package.json", declared.len());

    let source_dir = opts
        .source_dir
        .as_deref()
        .unwrap_or(config.scan.source_dir.as_path());
    let source_root = root.join(source_dir);

    shell.status(Status::Scanning, source_root.display());
    let scan = ImportScanner::from_config(&config.scan).scan(&source_root, shell)?;
    if let Some(err) = &scan.root_error {
        shell.warn(format!("could not read {}: {}", source_root.display(), err));
    }
    if scan.files_skipped > 0 {
        shell.warn(format!("skipped {} unreadable entries", scan.files_skipped));
    }
    tracing::debug!(
        "{} distinct specifiers in {} files",
        scan.specifiers.len(),
        scan.files_scanned
    );

    let filter = ImportFilter::from_config(&config.scan);
    let reconciliation = reconcile(
        scan.specifiers.iter().map(String::as_str),
        &declared,
        &filter,
    );

    let mut outcome = SyncOutcome {
        files_scanned: scan.files_scanned,
        manager: select_manager(root, config, opts.use_yarn),
        ..SyncOutcome::default()
    };

    let reporter = Reporter::new(shell);
    if reconciliation.is_complete() {
        reporter.no_missing(reconciliation.satisfied.len());
        outcome.reconciliation = reconciliation;
        return Ok(outcome);
    }

    reporter.missing(&reconciliation.missing);

    if opts.dry_run {
        shell.note("dry run, nothing installed");
        outcome.reconciliation = reconciliation;
        return Ok(outcome);
    }

    let install_opts = InstallOptions {
        manager: outcome.manager,
        project_root: root.to_path_buf(),
    };
    let report = install_missing(
        reconciliation.missing.iter().map(String::as_str),
        &install_opts,
        runner,
        shell,
    );

    outcome.summary = Some(reporter.install_summary(&report));
    outcome.install = Some(report);
    outcome.reconciliation = reconciliation;
    Ok(outcome)
}
