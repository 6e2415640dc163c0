//! CLI definitions using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_complete::Shell as CompletionShell;

use storyrow::util::shell::ColorChoice;

/// storyrow - scaffold Next.js projects and install what their imports need
#[derive(Parser)]
#[command(name = "storyrow")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Print only errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Coloring: auto, always, never
    #[arg(long, global = true, default_value = "auto", value_name = "WHEN")]
    pub color: ColorChoice,

    /// Output format for messages
    #[arg(long, global = true, value_enum, default_value_t = MessageFormat::Human)]
    pub message_format: MessageFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// How results are printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum MessageFormat {
    /// Status lines on stderr
    Human,
    /// One JSON event per line on stdout
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Scaffold a new Next.js project
    New(NewArgs),

    /// Install packages that are imported but not declared in package.json
    Sync(SyncArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Args)]
pub struct NewArgs {
    /// Project name
    pub name: String,

    /// Directory to create the project in
    #[arg(long, short, default_value = ".")]
    pub output: PathBuf,

    /// Include NextAuth.js (uses the with-auth-prisma template)
    #[arg(long)]
    pub with_auth: bool,

    /// Include Prisma ORM
    #[arg(long)]
    pub with_prisma: bool,

    /// Template name
    #[arg(long, default_value = "default")]
    pub template: String,

    /// Use yarn instead of npm
    #[arg(long)]
    pub use_yarn: bool,

    /// Skip the missing-dependency check
    #[arg(long)]
    pub skip_deps: bool,
}

#[derive(Args)]
pub struct SyncArgs {
    /// Project directory (defaults to current directory)
    pub path: Option<PathBuf>,

    /// Use yarn instead of npm
    #[arg(long)]
    pub use_yarn: bool,

    /// Report missing packages without installing them
    #[arg(long)]
    pub dry_run: bool,

    /// Exit with an error if any install fails
    #[arg(long)]
    pub strict: bool,

    /// Source directory relative to the project (defaults to `src`)
    #[arg(long, value_name = "DIR")]
    pub source_dir: Option<PathBuf>,
}

#[derive(Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: CompletionShell,
}
