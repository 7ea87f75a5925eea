//! Named tasks that orchestrate link changes.
mod context;
pub mod links;
pub mod manifests;
pub mod self_link;

pub use context::Context;

use anyhow::Result;

use crate::error::ConflictError;
use crate::logging::TaskStatus;

/// Result of a single task execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskResult {
    /// Task completed successfully.
    Ok,
    /// Task was skipped with a reason.
    Skipped(String),
    /// Task ran in dry-run mode.
    DryRun,
}

/// A named, executable task.
pub trait Task {
    /// Human-readable task name.
    fn name(&self) -> &str;

    /// Whether this task should run for the current configuration.
    fn should_run(&self, ctx: &Context) -> bool;

    /// Execute the task.
    ///
    /// # Errors
    ///
    /// Returns an error if the task fails. A [`ConflictError`] anywhere in
    /// the chain is fatal to the run.
    fn run(&self, ctx: &Context) -> Result<TaskResult>;
}

/// The tasks run when no single manifest is given, in order.
#[must_use]
pub fn install_tasks() -> Vec<Box<dyn Task>> {
    vec![
        Box::new(self_link::LinkRepository),
        Box::new(manifests::ApplyManifests),
    ]
}

/// Execute a task, recording the result in the logger.
///
/// # Errors
///
/// Returns an error only when the task failed with a [`ConflictError`];
/// every other failure is logged and recorded as [`TaskStatus::Failed`].
pub fn execute(task: &dyn Task, ctx: &Context) -> Result<()> {
    if !task.should_run(ctx) {
        ctx.log
            .debug(&format!("skipping task: {} (not applicable)", task.name()));
        ctx.log
            .record_task(task.name(), TaskStatus::Skipped, Some("not applicable"));
        return Ok(());
    }

    ctx.log.stage(task.name());

    match task.run(ctx) {
        Ok(TaskResult::Ok) => {
            ctx.log.record_task(task.name(), TaskStatus::Ok, None);
        }
        Ok(TaskResult::Skipped(reason)) => {
            ctx.log.info(&format!("skipped: {reason}"));
            ctx.log
                .record_task(task.name(), TaskStatus::Skipped, Some(&reason));
        }
        Ok(TaskResult::DryRun) => {
            ctx.log.record_task(task.name(), TaskStatus::DryRun, None);
        }
        Err(e) if e.downcast_ref::<ConflictError>().is_some() => {
            ctx.log
                .record_task(task.name(), TaskStatus::Failed, Some("aborted"));
            return Err(e);
        }
        Err(e) => {
            ctx.log.error(&format!("{}: {e:#}", task.name()));
            ctx.log
                .record_task(task.name(), TaskStatus::Failed, Some(&format!("{e:#}")));
        }
    }
    Ok(())
}
