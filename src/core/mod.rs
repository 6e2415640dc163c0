//! Core data structures for storyrow.
//!
//! This module contains the foundational types of a reconciliation pass:
//! - The package.json manifest and its declared set
//! - Import specifier classification and normalization
//! - Package manager selection
//! - Typed fatal errors

pub mod errors;
pub mod manifest;
pub mod package_manager;
pub mod specifier;

pub use errors::ReconcileError;
pub use manifest::PackageJson;
pub use package_manager::PackageManager;
pub use specifier::{ImportFilter, Specifier};
