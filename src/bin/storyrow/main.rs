//! storyrow CLI - scaffold Next.js projects and reconcile their dependencies

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use storyrow::util::diagnostic::emit;
use storyrow::util::Shell;
use storyrow::ReconcileError;

mod cli;
mod commands;

use cli::{Cli, Commands, MessageFormat};

/// Options shared by every command.
pub struct GlobalOptions {
    pub shell: Arc<Shell>,
}

fn main() {
    let cli = Cli::parse();

    let shell = Arc::new(Shell::from_flags(
        cli.quiet,
        cli.verbose,
        cli.color,
        cli.message_format == MessageFormat::Json,
    ));

    // Set up logging
    let filter = if cli.verbose {
        EnvFilter::new("storyrow=debug")
    } else {
        EnvFilter::new("storyrow=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();

    let global_opts = GlobalOptions {
        shell: Arc::clone(&shell),
    };

    if let Err(e) = run(cli.command, &global_opts) {
        report_error(&e, &shell);
        std::process::exit(1);
    }
}

fn run(command: Commands, global_opts: &GlobalOptions) -> Result<()> {
    match command {
        Commands::New(args) => commands::new::execute(args, global_opts),
        Commands::Sync(args) => commands::sync::execute(args, global_opts),
        Commands::Completions(args) => commands::completions::execute(args),
    }
}

/// Print a fatal error, as a diagnostic when it is a reconciliation failure.
fn report_error(e: &anyhow::Error, shell: &Shell) {
    if shell.is_json() {
        shell.error(format!("{:#}", e));
        return;
    }

    let reconcile_err = e.chain().find_map(|c| c.downcast_ref::<ReconcileError>());
    match reconcile_err {
        Some(err) => emit(&err.to_diagnostic(), shell.use_color()),
        None => eprintln!("error: {:#}", e),
    }
}
