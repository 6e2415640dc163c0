//! High-level operations.
//!
//! This module contains the implementation of storyrow commands.

pub mod install;
pub mod reconcile;
pub mod report;
pub mod scaffold;
pub mod scan;
pub mod sync;

pub use install::{install_missing, CommandRunner, InstallOptions, InstallReport, SystemRunner};
pub use reconcile::{reconcile, Reconciliation};
pub use report::{InstallSummary, Reporter};
pub use scaffold::{new_project, NewOptions};
pub use scan::{ImportScanner, ScanResult};
pub use sync::{sync_project, SyncOptions, SyncOutcome};
