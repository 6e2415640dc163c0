//! storyrow - scaffold Next.js projects and keep package.json honest
//!
//! This crate provides the library behind the `storyrow` binary: scanning
//! a source tree for imports, diffing them against package.json, and
//! installing whatever is missing one package at a time.

pub mod core;
pub mod ops;
pub mod util;

/// Test utilities and mocks for storyrow unit tests.
///
/// This module is only available when compiling with `--cfg test`. It
/// provides a scripted command runner and project fixtures.
#[cfg(test)]
pub mod test_support;

pub use crate::core::{ImportFilter, PackageJson, PackageManager, ReconcileError};
pub use util::context::GlobalContext;
