//! Link the repository root to its home alias.
use anyhow::{Result, bail};

use super::links::{LinkOutcome, apply_link};
use super::{Context, Task, TaskResult};

/// Link the repository root to its home alias (`~/.dotfiles` by default).
#[derive(Debug)]
pub struct LinkRepository;

impl Task for LinkRepository {
    fn name(&self) -> &str {
        "Link repository"
    }

    fn should_run(&self, ctx: &Context) -> bool {
        !ctx.config.self_link.is_empty()
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        let outcome = apply_link(ctx, ctx.root(), &ctx.config.self_link)?;
        match outcome {
            LinkOutcome::Failed => bail!("cannot link repository to {}", ctx.config.self_link),
            LinkOutcome::Skipped => Ok(TaskResult::Skipped(format!(
                "{} left as it was",
                ctx.config.self_link
            ))),
            _ if ctx.dry_run => Ok(TaskResult::DryRun),
            _ => Ok(TaskResult::Ok),
        }
    }
}
