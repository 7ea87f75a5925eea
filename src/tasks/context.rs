//! Shared state handed to every task.
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::config::Config;
use crate::logging::Log;
use crate::prompt::Prompt;
use crate::resources::conflict::ConflictResolver;
use crate::resources::helpers::fs::expand_home;

/// Shared context for task execution.
///
/// One context lives for the whole run; the conflict resolver it owns
/// carries the global action from the first "all" answer to the last link.
pub struct Context {
    /// Configuration fixed at startup.
    pub config: Config,
    /// Logger for output and task recording.
    pub log: Arc<dyn Log>,
    /// Whether to perform a dry run (preview changes without applying).
    pub dry_run: bool,
    /// Interactive capability used for conflicts.
    pub prompt: Box<dyn Prompt>,
    /// Conflict decisions for this run.
    pub conflicts: ConflictResolver,
}

impl std::fmt::Debug for Context {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Context")
            .field("config", &self.config)
            .field("log", &"<dyn Log>")
            .field("dry_run", &self.dry_run)
            .field("prompt", &"<dyn Prompt>")
            .field("conflicts", &self.conflicts)
            .finish()
    }
}

impl Context {
    /// Creates a new context for task execution.
    ///
    /// The conflict resolver starts with the configured global action, if any.
    #[must_use]
    pub fn new(config: Config, log: Arc<dyn Log>, dry_run: bool, prompt: Box<dyn Prompt>) -> Self {
        let conflicts = ConflictResolver::new(config.on_conflict);
        Self {
            config,
            log,
            dry_run,
            prompt,
            conflicts,
        }
    }

    /// Repository root.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.config.root
    }

    /// Expand `~` in `raw` against the configured home directory.
    #[must_use]
    pub fn expand(&self, raw: &str) -> PathBuf {
        expand_home(raw, &self.config.home)
    }
}
