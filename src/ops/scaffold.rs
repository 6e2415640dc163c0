//! Implementation of `storyrow new`.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context, Result};

use crate::core::package_manager::PackageManager;
use crate::ops::install::{failure_reason, install_batch, CommandRunner};
use crate::ops::sync::{sync_project, SyncOptions};
use crate::util::fs::{copy_dir_all, copy_file, ensure_dir};
use crate::util::process::ProcessBuilder;
use crate::util::{Config, GlobalContext, Shell, Status};

/// Template used when none is named.
pub const DEFAULT_TEMPLATE: &str = "default";

/// Template forced by `--with-auth`.
pub const AUTH_TEMPLATE: &str = "with-auth-prisma";

/// Generator invoked through npx.
const CREATE_NEXT_APP: &str = "create-next-app@latest";

/// Always installed into a fresh project.
const BASE_FEATURES: &[&str] = &["tailwindcss-animate"];

/// Directories copied from a template: (template-relative, project-relative).
const TEMPLATE_DIRS: &[(&str, &str)] = &[("base/prisma", "prisma"), ("src", "src")];

/// Single files copied from a template.
const TEMPLATE_FILES: &[(&str, &str)] = &[
    ("base/eslint.config.mjs", "eslint.config.mjs"),
    ("base/.env", ".env"),
];

/// Options for creating a new project.
#[derive(Debug, Clone)]
pub struct NewOptions {
    /// Project name
    pub name: String,

    /// Directory the project is created in
    pub output: PathBuf,

    /// Add NextAuth and switch to the auth template
    pub with_auth: bool,

    /// Add Prisma and initialize it
    pub with_prisma: bool,

    /// Template name under the template directory
    pub template: String,

    /// Use yarn instead of npm
    pub use_yarn: bool,

    /// Skip the reconciliation pass at the end
    pub skip_deps: bool,
}

impl NewOptions {
    /// Template that will actually be applied.
    pub fn template_name(&self) -> &str {
        if self.with_auth {
            AUTH_TEMPLATE
        } else {
            &self.template
        }
    }

    /// Packages installed in the single feature batch.
    pub fn feature_packages(&self) -> Vec<&'static str> {
        let mut packages = BASE_FEATURES.to_vec();
        if self.with_auth {
            packages.push("next-auth@beta");
        }
        if self.with_prisma {
            packages.extend(["prisma", "@prisma/client"]);
        }
        packages
    }
}

impl Default for NewOptions {
    fn default() -> Self {
        NewOptions {
            name: String::new(),
            output: PathBuf::from("."),
            with_auth: false,
            with_prisma: false,
            template: DEFAULT_TEMPLATE.to_string(),
            use_yarn: false,
            skip_deps: false,
        }
    }
}

/// The `npx create-next-app` invocation for `project_dir`.
pub fn create_next_app_command(project_dir: &Path, manager: PackageManager) -> ProcessBuilder {
    ProcessBuilder::from_path("npx")
        .arg(CREATE_NEXT_APP)
        .arg(project_dir)
        .args([
            "--ts",
            "--tailwind",
            "--eslint",
            "--app",
            "--src-dir",
            "--import-alias",
            "@/",
        ])
        .arg(format!("--use-{}", manager))
        .arg("--yes")
}

/// Copy a template's files over a generated project.
///
/// Returns how many entries were copied. Entries the template does not
/// have are skipped.
pub fn apply_template(template_root: &Path, project_dir: &Path) -> Result<usize> {
    if !template_root.is_dir() {
        bail!("template `{}` not found", template_root.display());
    }

    let mut copied = 0;
    for (from, to) in TEMPLATE_DIRS {
        let src = template_root.join(from);
        if !src.is_dir() {
            tracing::debug!("template has no {}, skipping", from);
            continue;
        }
        copy_dir_all(&src, &project_dir.join(to))?;
        copied += 1;
    }

    for (from, to) in TEMPLATE_FILES {
        let src = template_root.join(from);
        if !src.is_file() {
            tracing::debug!("template has no {}, skipping", from);
            continue;
        }
        copy_file(&src, &project_dir.join(to))?;
        copied += 1;
    }

    Ok(copied)
}

/// Create a new project.
///
/// Returns the project directory.
pub fn new_project<R>(
    ctx: &GlobalContext,
    config: &Config,
    opts: &NewOptions,
    runner: &mut R,
    shell: &Arc<Shell>,
) -> Result<PathBuf>
where
    R: CommandRunner + ?Sized,
{
    if opts.name.trim().is_empty() {
        bail!("project name must not be empty");
    }

    let output = ctx.project_root(Some(opts.output.as_path()));
    let project_dir = output.join(&opts.name);
    if is_non_empty_dir(&project_dir) {
        bail!(
            "destination `{}` already exists\n\
             \n\
             Use `storyrow sync {}` to reconcile an existing project.",
            project_dir.display(),
            project_dir.display()
        );
    }

    // Resolve the template before generating anything
    let template_root = match ctx.template_dir(config) {
        Some(dir) => dir.join(opts.template_name()),
        None => bail!(
            "no template directory found\n\
             \n\
             Set `template.dir` in .storyrow/config.toml or run from a directory containing `templates/`."
        ),
    };
    if !template_root.is_dir() {
        bail!("template `{}` not found", template_root.display());
    }

    let manager = if opts.use_yarn {
        PackageManager::Yarn
    } else {
        config.install.manager.unwrap_or_default()
    };

    let span = shell.span(Status::Creating, &opts.name);
    ensure_dir(&output)?;

    let cmd = create_next_app_command(&project_dir, manager).cwd(&output);
    shell.status(Status::Creating, cmd.display_command());
    run_required(&cmd, runner)?;

    shell.status(Status::Copying, format!("template `{}`", opts.template_name()));
    let copied = apply_template(&template_root, &project_dir)
        .with_context(|| format!("failed to apply template `{}`", opts.template_name()))?;
    tracing::debug!("copied {} template entries", copied);

    install_batch(
        &opts.feature_packages(),
        manager,
        &project_dir,
        runner,
        shell,
    )
    .context("failed to install features")?;

    if opts.with_prisma {
        setup_prisma(&project_dir, &config.prisma.provider, runner, shell)?;
    }

    if opts.skip_deps {
        shell.status(Status::Skipped, "dependency check");
    } else {
        let sync_opts = SyncOptions {
            use_yarn: manager == PackageManager::Yarn,
            ..SyncOptions::default()
        };
        if let Err(e) = sync_project(&project_dir, config, &sync_opts, runner, shell) {
            shell.warn(format!("dependency check failed: {}", e));
        }
    }

    span.finish_with_message(format!("created `{}`", opts.name));

    shell.status(Status::Created, project_dir.display());
    shell.line("next steps:");
    shell.line(format!("  cd {}", project_dir.display()));
    shell.line(format!("  {} run dev", manager));

    Ok(project_dir)
}

/// Run `prisma init` and `prisma generate` in the project.
fn setup_prisma<R>(project_dir: &Path, provider: &str, runner: &mut R, shell: &Shell) -> Result<()>
where
    R: CommandRunner + ?Sized,
{
    let init = ProcessBuilder::from_path("npx")
        .args(["prisma", "init", "--datasource-provider", provider])
        .cwd(project_dir);
    shell.status(Status::Creating, init.display_command());
    run_required(&init, runner).context("failed to initialize Prisma")?;

    let generate = ProcessBuilder::from_path("npx")
        .args(["prisma", "generate"])
        .cwd(project_dir);
    shell.status(Status::Creating, generate.display_command());
    run_required(&generate, runner).context("failed to generate Prisma client")
}

fn run_required<R>(cmd: &ProcessBuilder, runner: &mut R) -> Result<()>
where
    R: CommandRunner + ?Sized,
{
    let status = runner.run(cmd)?;
    match failure_reason(&status) {
        None => Ok(()),
        Some(reason) => bail!("`{}` failed: {}", cmd.display_command(), reason),
    }
}

fn is_non_empty_dir(path: &Path) -> bool {
    std::fs::read_dir(path)
        .map(|mut entries| entries.next().is_some())
        .unwrap_or(false)
}
