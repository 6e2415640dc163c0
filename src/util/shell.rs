//! Centralized shell output and progress management.
//!
//! The Shell module provides a unified API for all CLI output, including:
//! - Status messages with consistent formatting
//! - A progress bar over scanned files (via indicatif)
//! - Scoped timing spans with delayed start
//! - JSON output mode for machine-readable output
//!
//! Human output goes to stderr so that stdout stays free for JSON events.
//! Package-manager children write to the same terminal in between.

use std::fmt::Display;
use std::io::{self, IsTerminal, Write};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use indicatif::{ProgressBar, ProgressStyle};

/// Shell output mode - Human and Json are mutually exclusive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellMode {
    /// Human-readable output with optional colors and progress bars.
    Human {
        verbosity: Verbosity,
        color: ColorChoice,
    },
    /// Machine-readable JSON output only.
    Json,
}

impl Default for ShellMode {
    fn default() -> Self {
        ShellMode::Human {
            verbosity: Verbosity::Normal,
            color: ColorChoice::Auto,
        }
    }
}

/// Output verbosity level (Human mode only).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verbosity {
    /// --quiet: errors only, no progress
    Quiet,
    /// Default: status messages + progress bars
    #[default]
    Normal,
    /// --verbose: immediate status lines, no progress bars
    Verbose,
}

/// Color output mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorChoice {
    /// Detect TTY and use colors if available.
    #[default]
    Auto,
    /// Always use ANSI colors.
    Always,
    /// Never use ANSI colors.
    Never,
}

impl std::str::FromStr for ColorChoice {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "auto" => Ok(ColorChoice::Auto),
            "always" => Ok(ColorChoice::Always),
            "never" => Ok(ColorChoice::Never),
            _ => Err(format!(
                "invalid color choice '{}'; expected 'auto', 'always', or 'never'",
                s
            )),
        }
    }
}

/// Status types for output messages.
///
/// Shell handles all formatting - callers just specify the semantic status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    // Success statuses (green)
    Created,
    Installed,
    Finished,

    // In-progress statuses (cyan)
    Creating,
    Copying,
    Scanning,
    Installing,

    // Info statuses (blue/default)
    Info,

    // Warning statuses (yellow)
    Missing,
    Skipped,
    Warning,

    // Error statuses (red)
    Failed,
    Error,
}

impl Status {
    /// Get the display text for this status.
    fn as_str(&self) -> &'static str {
        match self {
            Status::Created => "Created",
            Status::Installed => "Installed",
            Status::Finished => "Finished",
            Status::Creating => "Creating",
            Status::Copying => "Copying",
            Status::Scanning => "Scanning",
            Status::Installing => "Installing",
            Status::Info => "Info",
            Status::Missing => "Missing",
            Status::Skipped => "Skipped",
            Status::Warning => "Warning",
            Status::Failed => "Failed",
            Status::Error => "error",
        }
    }

    /// Get the ANSI color code for this status.
    fn color_code(&self) -> &'static str {
        match self {
            Status::Created | Status::Installed | Status::Finished => "\x1b[1;32m",
            Status::Creating | Status::Copying | Status::Scanning | Status::Installing => {
                "\x1b[1;36m"
            }
            Status::Info => "\x1b[1;34m",
            Status::Missing | Status::Skipped | Status::Warning => "\x1b[1;33m",
            Status::Failed | Status::Error => "\x1b[1;31m",
        }
    }
}

/// Width of the right-aligned status column.
const STATUS_WIDTH: usize = 12;

/// Central shell for all CLI output.
#[derive(Debug)]
pub struct Shell {
    mode: ShellMode,
    use_color: bool,
    /// Every JSON event emitted so far
    json_output: Mutex<Vec<String>>,
}

impl Shell {
    /// Create a new shell with the given mode.
    pub fn new(mode: ShellMode) -> Self {
        let use_color = match &mode {
            ShellMode::Json => false,
            ShellMode::Human { color, .. } => match color {
                ColorChoice::Auto => io::stderr().is_terminal(),
                ColorChoice::Always => true,
                ColorChoice::Never => false,
            },
        };

        Shell {
            mode,
            use_color,
            json_output: Mutex::new(Vec::new()),
        }
    }

    /// Create a shell from CLI flags with proper precedence.
    ///
    /// JSON mode takes precedence over quiet/verbose.
    pub fn from_flags(
        quiet: bool,
        verbose: bool,
        color: ColorChoice,
        message_format_json: bool,
    ) -> Self {
        let mode = if message_format_json {
            ShellMode::Json
        } else {
            let verbosity = if quiet {
                Verbosity::Quiet
            } else if verbose {
                Verbosity::Verbose
            } else {
                Verbosity::Normal
            };
            ShellMode::Human { verbosity, color }
        };

        Shell::new(mode)
    }

    /// A shell that prints nothing but errors. Used by tests and embedders.
    pub fn quiet() -> Self {
        Shell::new(ShellMode::Human {
            verbosity: Verbosity::Quiet,
            color: ColorChoice::Never,
        })
    }

    /// Check if shell is in quiet mode.
    pub fn is_quiet(&self) -> bool {
        matches!(
            self.mode,
            ShellMode::Human {
                verbosity: Verbosity::Quiet,
                ..
            }
        )
    }

    /// Check if shell is in verbose mode.
    pub fn is_verbose(&self) -> bool {
        matches!(
            self.mode,
            ShellMode::Human {
                verbosity: Verbosity::Verbose,
                ..
            }
        )
    }

    /// Check if shell is in JSON mode.
    pub fn is_json(&self) -> bool {
        matches!(self.mode, ShellMode::Json)
    }

    /// Check if colors are enabled.
    pub fn use_color(&self) -> bool {
        self.use_color
    }

    /// Print a status message.
    ///
    /// Format: `{status:>12} {message}`
    ///
    /// In quiet mode, only Error status is printed.
    /// In JSON mode, messages are silently ignored (use json_event for JSON output).
    pub fn status(&self, status: Status, msg: impl Display) {
        if self.is_json() {
            return;
        }

        if self.is_quiet() && status != Status::Error {
            return;
        }

        eprintln!("{} {}", self.format_status(status), msg);
    }

    /// Print an info message.
    pub fn note(&self, msg: impl Display) {
        self.status(Status::Info, msg);
    }

    /// Print a warning message.
    pub fn warn(&self, msg: impl Display) {
        self.status(Status::Warning, msg);
    }

    /// Print a line indented under the status column (list items, next steps).
    ///
    /// Suppressed in quiet and JSON modes.
    pub fn line(&self, msg: impl Display) {
        if self.is_json() || self.is_quiet() {
            return;
        }
        eprintln!("{:>width$} {}", "", msg, width = STATUS_WIDTH);
    }

    /// Print an error message.
    ///
    /// In JSON mode, this outputs a JSON error event.
    pub fn error(&self, msg: impl Display) {
        if self.is_json() {
            let event = serde_json::json!({
                "reason": "error",
                "message": msg.to_string()
            });
            self.json_event(&event);
        } else {
            self.status(Status::Error, msg);
        }
    }

    /// Print a JSON event to stdout.
    ///
    /// Only works in JSON mode; silently ignored in human mode.
    pub fn json_event(&self, event: &serde_json::Value) {
        if !self.is_json() {
            return;
        }

        let json_str = serde_json::to_string(event).unwrap_or_default();
        println!("{}", json_str);
        let _ = io::stdout().flush();

        if let Ok(mut buffer) = self.json_output.lock() {
            buffer.push(json_str);
        }
    }

    /// JSON events emitted so far, in order.
    pub fn json_events(&self) -> Vec<String> {
        self.json_output
            .lock()
            .map(|buffer| buffer.clone())
            .unwrap_or_default()
    }

    /// Format a status prefix with optional color.
    fn format_status(&self, status: Status) -> String {
        let text = status.as_str();

        if self.use_color {
            let color = status.color_code();
            format!("{}{:>width$}\x1b[0m", color, text, width = STATUS_WIDTH)
        } else {
            format!("{:>width$}", text, width = STATUS_WIDTH)
        }
    }

    /// Create a scoped span for timing operations.
    ///
    /// The start message is printed immediately in verbose mode only.
    pub fn span(self: &Arc<Self>, status: Status, msg: impl Display) -> Span {
        Span::new(Arc::clone(self), status, msg.to_string())
    }

    /// Create a progress bar over `total` items.
    ///
    /// In quiet, verbose, or JSON mode, returns a no-op progress bar.
    pub fn progress(self: &Arc<Self>, total: u64, msg: impl Display) -> Progress {
        Progress::new(Arc::clone(self), total, msg.to_string())
    }
}

impl Default for Shell {
    fn default() -> Self {
        Shell::new(ShellMode::default())
    }
}

/// A scoped timing span.
///
/// The start line is printed up front only in verbose mode; the finish
/// line is printed when the span is finished or dropped.
pub struct Span {
    shell: Arc<Shell>,
    start: Instant,
    start_printed: bool,
    finished: bool,
}

impl Span {
    /// Spans shorter than this finish silently unless started loudly.
    const DEFAULT_DELAY: Duration = Duration::from_millis(200);

    fn new(shell: Arc<Shell>, status: Status, message: String) -> Self {
        let start_printed = shell.is_verbose();

        // In verbose mode, print start immediately
        if start_printed {
            shell.status(status, &message);
        }

        Span {
            shell,
            start: Instant::now(),
            start_printed,
            finished: false,
        }
    }

    /// Mark the span as finished with a custom message.
    pub fn finish_with_message(mut self, msg: impl Display) {
        self.finished = true;
        let elapsed = self.start.elapsed();
        self.shell.status(
            Status::Finished,
            format!("{} in {}", msg, format_duration(elapsed)),
        );
    }
}

impl Drop for Span {
    fn drop(&mut self) {
        if self.finished {
            return;
        }

        let elapsed = self.start.elapsed();
        if self.start_printed || elapsed > Self::DEFAULT_DELAY {
            self.shell
                .status(Status::Finished, format!("in {}", format_duration(elapsed)));
        }
    }
}

/// Progress bar wrapper that respects shell mode.
pub struct Progress {
    pb: Option<ProgressBar>,
    total: u64,
    current: u64,
}

impl Progress {
    fn new(shell: Arc<Shell>, total: u64, message: String) -> Self {
        let pb = if shell.is_quiet() || shell.is_verbose() || shell.is_json() || total <= 1 {
            None
        } else {
            let pb = ProgressBar::new(total);
            if let Ok(style) =
                ProgressStyle::default_bar().template("{spinner:.green} {msg} [{bar:40.cyan/blue}] {pos}/{len}")
            {
                pb.set_style(style.progress_chars("#>-"));
            }
            pb.set_message(message);
            Some(pb)
        };

        Progress {
            pb,
            total,
            current: 0,
        }
    }

    /// Increment progress.
    pub fn inc(&mut self, delta: u64) {
        self.current += delta;
        if let Some(pb) = &self.pb {
            pb.inc(delta);
        }
    }

    /// Finish and clear the progress bar.
    pub fn finish(&self) {
        if let Some(pb) = &self.pb {
            pb.finish_and_clear();
        }
    }

    /// Get the current position.
    pub fn position(&self) -> u64 {
        self.current
    }

    /// Get the total.
    pub fn total(&self) -> u64 {
        self.total
    }
}

/// Format a duration in a human-readable way.
fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs_f64();
    if secs < 60.0 {
        format!("{:.2}s", secs)
    } else {
        format!("{:.1}m", secs / 60.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shell_modes() {
        let shell = Shell::new(ShellMode::Human {
            verbosity: Verbosity::Normal,
            color: ColorChoice::Never,
        });
        assert!(!shell.is_quiet());
        assert!(!shell.is_verbose());
        assert!(!shell.is_json());

        assert!(Shell::quiet().is_quiet());

        let json_shell = Shell::new(ShellMode::Json);
        assert!(json_shell.is_json());
    }

    #[test]
    fn test_color_choice_parse() {
        assert_eq!("auto".parse::<ColorChoice>().unwrap(), ColorChoice::Auto);
        assert_eq!("always".parse::<ColorChoice>().unwrap(), ColorChoice::Always);
        assert_eq!("never".parse::<ColorChoice>().unwrap(), ColorChoice::Never);
        assert!("invalid".parse::<ColorChoice>().is_err());
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(Duration::from_millis(500)), "0.50s");
        assert_eq!(format_duration(Duration::from_secs(2)), "2.00s");
        assert_eq!(format_duration(Duration::from_secs(90)), "1.5m");
    }

    #[test]
    fn test_status_formatting() {
        let shell = Shell::new(ShellMode::Human {
            verbosity: Verbosity::Normal,
            color: ColorChoice::Never,
        });

        let formatted = shell.format_status(Status::Installed);
        assert_eq!(formatted.trim(), "Installed");
        assert_eq!(formatted.len(), STATUS_WIDTH);
    }

    #[test]
    fn test_json_events_recorded() {
        let shell = Shell::new(ShellMode::Json);
        shell.json_event(&serde_json::json!({ "reason": "test" }));
        shell.error("boom");

        let events = shell.json_events();
        assert_eq!(events.len(), 2);
        assert!(events[1].contains("\"reason\":\"error\""));
    }

    #[test]
    fn test_human_mode_ignores_json_events() {
        let shell = Shell::quiet();
        shell.json_event(&serde_json::json!({ "reason": "test" }));
        assert!(shell.json_events().is_empty());
    }

    #[test]
    fn test_from_flags() {
        let shell = Shell::from_flags(false, false, ColorChoice::Auto, false);
        assert!(!shell.is_quiet());
        assert!(!shell.is_verbose());

        let shell = Shell::from_flags(true, false, ColorChoice::Auto, false);
        assert!(shell.is_quiet());

        let shell = Shell::from_flags(false, true, ColorChoice::Auto, false);
        assert!(shell.is_verbose());

        // JSON takes precedence
        let shell = Shell::from_flags(true, true, ColorChoice::Auto, true);
        assert!(shell.is_json());
        assert!(!shell.is_quiet());
    }

    #[test]
    fn test_progress_noop_when_quiet() {
        let shell = Arc::new(Shell::quiet());
        let mut progress = shell.progress(10, "Scanning");
        progress.inc(3);
        progress.finish();
        assert_eq!(progress.position(), 3);
        assert_eq!(progress.total(), 10);
    }
}
