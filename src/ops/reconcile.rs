//! Set reconciliation between scanned imports and declared dependencies.

use std::collections::BTreeSet;

use crate::core::specifier::{ImportFilter, Specifier};

/// Result of comparing scanned specifiers against the declared set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reconciliation {
    /// Normalized package names that are referenced but not declared
    pub missing: BTreeSet<String>,
    /// Normalized package names that are referenced and declared
    pub satisfied: BTreeSet<String>,
    /// Specifiers dropped as local, aliased, built-in, or excluded
    pub ignored: BTreeSet<String>,
}

impl Reconciliation {
    /// Whether nothing needs to be installed.
    pub fn is_complete(&self) -> bool {
        self.missing.is_empty()
    }
}

/// Classify every specifier and diff the installable ones against `declared`.
pub fn reconcile<'a>(
    specifiers: impl IntoIterator<Item = &'a str>,
    declared: &BTreeSet<String>,
    filter: &ImportFilter,
) -> Reconciliation {
    let mut result = Reconciliation::default();

    for spec in specifiers {
        let name = match filter.classify(spec) {
            Specifier::Package(name) => name,
            other => {
                tracing::trace!("ignoring `{}` ({:?})", spec, other);
                result.ignored.insert(spec.to_string());
                continue;
            }
        };

        if name.is_empty() {
            continue;
        }

        if declared.contains(&name) {
            result.satisfied.insert(name);
        } else {
            result.missing.insert(name);
        }
    }

    result
}
