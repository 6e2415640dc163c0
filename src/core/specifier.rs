//! Import specifier classification and package-name normalization.
//!
//! A specifier is the string literal inside `import ... from "<spec>"` or
//! `require("<spec>")`. Only bare specifiers that name an installable
//! package survive classification; everything else is local code, a
//! project alias, or part of the runtime.

use std::collections::BTreeSet;

use crate::util::config::ScanConfig;

/// Packages that are never separately installable.
pub const EXCLUDED_PACKAGES: &[&str] = &["uri-js"];

/// Node.js built-in modules, importable without the `node:` prefix.
///
/// Core modules that share a name with a published browser polyfill
/// (`buffer`, `events`, `process`, `util`, `url`, `punycode`,
/// `string_decoder`, `assert`) are not listed and classify as packages.
/// Their `node:` forms are still built-ins.
pub const BUILTIN_MODULES: &[&str] = &[
    "async_hooks",
    "child_process",
    "cluster",
    "console",
    "constants",
    "crypto",
    "dgram",
    "diagnostics_channel",
    "dns",
    "domain",
    "fs",
    "http",
    "http2",
    "https",
    "inspector",
    "module",
    "net",
    "os",
    "path",
    "perf_hooks",
    "querystring",
    "readline",
    "repl",
    "stream",
    "timers",
    "tls",
    "trace_events",
    "tty",
    "v8",
    "vm",
    "wasi",
    "worker_threads",
    "zlib",
];

/// What a raw specifier refers to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Specifier {
    /// `./foo`, `../foo`
    Relative,
    /// `/abs/path`
    Absolute,
    /// Project import alias such as `@/components/button`
    Alias,
    /// Runtime module: `node:fs`, or a bare built-in like `path`
    Builtin,
    /// On the exclusion list
    Excluded,
    /// An installable package, already normalized to its root name
    Package(String),
}

impl Specifier {
    /// The normalized package name, if this is a package.
    pub fn package(&self) -> Option<&str> {
        match self {
            Specifier::Package(name) => Some(name),
            _ => None,
        }
    }
}

/// Reduce a bare specifier to its installable root package name.
///
/// `@scope/name/sub/path` becomes `@scope/name`; `lodash/map` becomes
/// `lodash`. Root names are returned unchanged.
pub fn normalize_package_name(spec: &str) -> &str {
    if spec.starts_with('@') {
        let mut parts = spec.splitn(3, '/');
        let scope = parts.next().unwrap_or_default();
        return match parts.next() {
            Some(name) if !name.is_empty() => &spec[..scope.len() + 1 + name.len()],
            _ => scope,
        };
    }

    spec.split('/').next().unwrap_or_default()
}

/// Rules deciding which specifiers are ignored.
#[derive(Debug, Clone)]
pub struct ImportFilter {
    alias_prefixes: Vec<String>,
    runtime_prefixes: Vec<String>,
    excluded: BTreeSet<String>,
}

impl ImportFilter {
    /// Build a filter from the scan configuration.
    pub fn from_config(config: &ScanConfig) -> Self {
        let excluded = EXCLUDED_PACKAGES
            .iter()
            .map(|s| s.to_string())
            .chain(config.exclude.iter().cloned())
            .collect();

        ImportFilter {
            alias_prefixes: config.alias_prefixes.clone(),
            runtime_prefixes: config.runtime_prefixes.clone(),
            excluded,
        }
    }

    /// Classify a raw specifier.
    pub fn classify(&self, spec: &str) -> Specifier {
        if spec.starts_with('.') {
            return Specifier::Relative;
        }
        if spec.starts_with('/') {
            return Specifier::Absolute;
        }
        if self.alias_prefixes.iter().any(|p| spec.starts_with(p.as_str())) {
            return Specifier::Alias;
        }
        if self.runtime_prefixes.iter().any(|p| spec.starts_with(p.as_str())) {
            return Specifier::Builtin;
        }
        if self.excluded.contains(spec) {
            return Specifier::Excluded;
        }

        let root = normalize_package_name(spec);
        // `fs/promises` is as built-in as `fs`
        if BUILTIN_MODULES.contains(&root) {
            return Specifier::Builtin;
        }
        if self.excluded.contains(root) {
            return Specifier::Excluded;
        }

        Specifier::Package(root.to_string())
    }
}

impl Default for ImportFilter {
    fn default() -> Self {
        ImportFilter::from_config(&ScanConfig::default())
    }
}
