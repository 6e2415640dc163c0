//! `storyrow sync` command

use anyhow::{bail, Result};

use crate::cli::SyncArgs;
use crate::GlobalOptions;
use storyrow::ops::install::SystemRunner;
use storyrow::ops::sync::{sync_project, SyncOptions};
use storyrow::util::GlobalContext;

pub fn execute(args: SyncArgs, global_opts: &GlobalOptions) -> Result<()> {
    let shell = &global_opts.shell;

    let ctx = GlobalContext::new()?;
    let root = ctx.project_root(args.path.as_deref());
    let config = ctx.config_for(&root);

    let opts = SyncOptions {
        use_yarn: args.use_yarn,
        dry_run: args.dry_run,
        source_dir: args.source_dir,
    };

    let mut runner = SystemRunner::with_timeout(config.install.timeout());
    let outcome = sync_project(&root, &config, &opts, &mut runner, shell)?;

    if args.strict && outcome.has_failures() {
        let failed = outcome
            .summary
            .map(|s| s.failed.join(", "))
            .unwrap_or_default();
        bail!("failed to install: {}", failed);
    }

    Ok(())
}
