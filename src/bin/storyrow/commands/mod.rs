//! Command implementations

pub mod completions;
pub mod new;
pub mod sync;
