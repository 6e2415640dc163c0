//! Import scanning.
//!
//! Walks a source tree and pulls the string literal out of every
//! `import ... from "<spec>"`, bare `import "<spec>"`, and `require("<spec>")`
//! it can find. This is a textual scan, not a parse: `export ... from`,
//! dynamic `import()`, and statements split across lines are not seen.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::{Arc, LazyLock};

use regex::Regex;
use walkdir::WalkDir;

use crate::core::errors::ReconcileError;
use crate::util::config::ScanConfig;
use crate::util::Shell;

/// Matches import/require statements, capturing the specifier.
static IMPORT_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?:import\s+(?:.+\s+from\s+)?|require\()\s*['"]([^'"]+)['"]"#)
        .expect("import pattern is a valid regex")
});

/// Extract every specifier referenced in a source text.
pub fn extract_specifiers(text: &str) -> impl Iterator<Item = &str> {
    IMPORT_PATTERN
        .captures_iter(text)
        .filter_map(|caps| caps.get(1).map(|m| m.as_str()))
}

/// Outcome of scanning a source tree.
#[derive(Debug, Clone, Default)]
pub struct ScanResult {
    /// Distinct raw specifiers, sorted
    pub specifiers: BTreeSet<String>,
    /// Eligible files that were read
    pub files_scanned: usize,
    /// Entries skipped because they could not be read
    pub files_skipped: usize,
    /// Error hit while reading the walk root itself, if any
    pub root_error: Option<String>,
}

/// Scans source trees for import specifiers.
#[derive(Debug, Clone)]
pub struct ImportScanner {
    extensions: Vec<String>,
}

impl ImportScanner {
    /// Create a scanner for the configured extensions.
    pub fn from_config(config: &ScanConfig) -> Self {
        ImportScanner {
            extensions: config
                .extensions
                .iter()
                .map(|ext| ext.trim_start_matches('.').to_string())
                .collect(),
        }
    }

    /// Whether a file is a source file this scanner reads.
    pub fn is_eligible(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| self.extensions.iter().any(|e| e == ext))
    }

    /// Scan `root` recursively.
    ///
    /// Fails only if `root` is not a directory. Unreadable entries below
    /// the root are skipped.
    pub fn scan(&self, root: &Path, shell: &Arc<Shell>) -> Result<ScanResult, ReconcileError> {
        if !root.is_dir() {
            return Err(ReconcileError::SourceRootNotFound {
                path: root.to_path_buf(),
            });
        }

        let mut result = ScanResult::default();
        let files = self.collect_files(root, &mut result);
        tracing::debug!("found {} source files under {}", files.len(), root.display());

        let mut progress = shell.progress(files.len() as u64, "Scanning imports");
        for path in &files {
            match std::fs::read(path) {
                Ok(bytes) => {
                    let text = String::from_utf8_lossy(&bytes);
                    result
                        .specifiers
                        .extend(extract_specifiers(&text).map(str::to_string));
                    result.files_scanned += 1;
                }
                Err(e) => {
                    tracing::debug!("skipping {}: {}", path.display(), e);
                    result.files_skipped += 1;
                }
            }
            progress.inc(1);
        }
        progress.finish();

        Ok(result)
    }

    /// Walk the tree and collect eligible files in a stable order.
    fn collect_files(&self, root: &Path, result: &mut ScanResult) -> Vec<PathBuf> {
        let mut files = Vec::new();

        for entry in WalkDir::new(root).sort_by_file_name() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) if e.depth() == 0 => {
                    tracing::warn!("cannot read source root {}: {}", root.display(), e);
                    result.root_error = Some(e.to_string());
                    continue;
                }
                Err(e) => {
                    tracing::debug!("skipping unreadable entry: {}", e);
                    result.files_skipped += 1;
                    continue;
                }
            };

            // Symlinked sources count; a dangling link fails on read and is skipped
            let candidate = entry.file_type().is_file()
                || (entry.path_is_symlink() && !entry.path().is_dir());
            if candidate && self.is_eligible(entry.path()) {
                files.push(entry.into_path());
            }
        }

        files
    }
}

impl Default for ImportScanner {
    fn default() -> Self {
        ImportScanner::from_config(&ScanConfig::default())
    }
}
