//! Top-level command orchestration.
pub mod apply;
pub mod install;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context as _, Result};

use crate::cli::GlobalOpts;
use crate::config::Config;
use crate::error::ConfigError;
use crate::logging::{Log, Logger};
use crate::prompt::TerminalPrompt;
use crate::tasks::{self, Context, Task};

/// Shared state produced by the common command setup sequence.
///
/// Encapsulates root detection and configuration loading so that each
/// command does not have to repeat the boilerplate.
#[derive(Debug)]
pub struct CommandSetup {
    /// Loaded configuration.
    pub config: Config,
}

impl CommandSetup {
    /// Resolve the repository root and load the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the root directory cannot be determined, the
    /// settings file is invalid, or no home directory is known.
    pub fn init(global: &GlobalOpts, log: &Logger) -> Result<Self> {
        let root = resolve_root(global)?;

        log.stage("Loading configuration");
        let config = Config::load(&root, &global.overrides())?;

        log.info(&format!("root: {}", config.root.display()));
        log.info(&format!("identity: {}", config.identity));
        log.debug(&format!("config dir: {}", config.config_dir.display()));
        log.debug(&format!("payload dir: {}", config.payload_dir.display()));
        log.debug(&format!("home: {}", config.home.display()));
        if let Some(action) = config.on_conflict {
            log.info(&format!("conflicts: {action}"));
        }

        Ok(Self { config })
    }

    /// Build the run context, prompting on the terminal.
    #[must_use]
    pub fn into_context(self, global: &GlobalOpts, log: &Arc<Logger>) -> Context {
        Context::new(
            self.config,
            Arc::clone(log) as Arc<dyn Log>,
            global.dry_run,
            Box::new(TerminalPrompt),
        )
    }
}

/// Execute every task in order, print the summary, and bail if any task failed.
///
/// A fatal conflict error stops the run at once; the summary of what ran so
/// far is still printed.
///
/// # Errors
///
/// Returns an error if a task hit a fatal conflict error or one or more tasks
/// recorded a failure.
pub fn run_tasks_to_completion<'a>(
    tasks: impl IntoIterator<Item = &'a dyn Task>,
    ctx: &Context,
    log: &Logger,
) -> Result<()> {
    for task in tasks {
        if let Err(e) = tasks::execute(task, ctx) {
            log.print_summary();
            return Err(e);
        }
    }

    log.print_summary();

    let count = log.failure_count();
    if count > 0 {
        anyhow::bail!("{count} task(s) failed");
    }
    Ok(())
}

/// Log the program version.
pub fn log_version(log: &Logger) {
    let version = option_env!("DOTLINK_VERSION").unwrap_or(env!("CARGO_PKG_VERSION"));
    log.info(&format!("dotlink {version}"));
}

/// Resolve the dotfiles root directory from CLI arguments or auto-detection.
///
/// Order: `--root`, `DOTLINK_ROOT`, the binary's location, the current
/// directory. Auto-detected candidates must hold `config/` and `dotfiles/`.
///
/// # Errors
///
/// Returns an error if the root directory cannot be determined or doesn't exist.
pub fn resolve_root(global: &GlobalOpts) -> Result<PathBuf> {
    let env_root = std::env::var_os("DOTLINK_ROOT").map(PathBuf::from);
    let exe = std::env::current_exe().ok();
    let cwd = std::env::current_dir().ok();

    let root = find_root(
        global.root.as_deref(),
        env_root.as_deref(),
        exe.as_deref(),
        cwd.as_deref(),
    )
    .ok_or(ConfigError::NoRoot)?;

    dunce::canonicalize(&root).with_context(|| format!("resolving root {}", root.display()))
}

fn find_root(
    explicit: Option<&Path>,
    env_root: Option<&Path>,
    exe: Option<&Path>,
    cwd: Option<&Path>,
) -> Option<PathBuf> {
    if let Some(root) = explicit.or(env_root) {
        return Some(root.to_path_buf());
    }

    if let Some(parent) = exe.and_then(Path::parent) {
        let candidates = [
            parent.join("../.."), // target/release/ -> repo root
            parent.join(".."),    // bin/ -> repo root
            parent.to_path_buf(),
        ];
        if let Some(found) = candidates.into_iter().find(|c| is_repository(c)) {
            return Some(found);
        }
    }

    cwd.filter(|c| is_repository(c)).map(Path::to_path_buf)
}

fn is_repository(dir: &Path) -> bool {
    dir.join("config").is_dir() && dir.join("dotfiles").is_dir()
}
