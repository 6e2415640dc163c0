//! `storyrow new` command

use anyhow::Result;

use crate::cli::NewArgs;
use crate::GlobalOptions;
use storyrow::ops::install::SystemRunner;
use storyrow::ops::scaffold::{new_project, NewOptions};
use storyrow::util::GlobalContext;

/// Translate parsed arguments into scaffolding options.
pub fn new_options(args: NewArgs) -> NewOptions {
    NewOptions {
        name: args.name,
        output: args.output,
        with_auth: args.with_auth,
        with_prisma: args.with_prisma,
        template: args.template,
        use_yarn: args.use_yarn,
        skip_deps: args.skip_deps,
    }
}

pub fn execute(args: NewArgs, global_opts: &GlobalOptions) -> Result<()> {
    let shell = &global_opts.shell;

    let ctx = GlobalContext::new()?;
    let config = ctx.config_for(ctx.cwd());
    let opts = new_options(args);

    let mut runner = SystemRunner::with_timeout(config.install.timeout());
    new_project(&ctx, &config, &opts, &mut runner, shell)?;

    Ok(())
}
