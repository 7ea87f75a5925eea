//! The [`Log`] trait and the task records behind the run summary.
use std::fmt;

/// One line of the run summary.
#[derive(Debug, Clone)]
pub struct TaskEntry {
    /// Task name as shown to the user ("Apply manifests", ...).
    pub name: String,
    /// How the task ended.
    pub status: TaskStatus,
    /// Skip reason or failure description.
    pub message: Option<String>,
}

/// How a task ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskStatus {
    /// Every link it handled is in place.
    Ok,
    /// Not applicable, or nothing to do.
    Skipped,
    /// Evaluated in dry-run mode; nothing on disk changed.
    DryRun,
    /// At least one link failed, or the task was aborted.
    Failed,
}

impl TaskStatus {
    /// Summary marker and its ANSI colour.
    #[must_use]
    pub const fn marker(self) -> (&'static str, &'static str) {
        match self {
            Self::Ok => ("✓", "\x1b[32m"),
            Self::Skipped => ("○", "\x1b[33m"),
            Self::DryRun => ("~", "\x1b[37m"),
            Self::Failed => ("✗", "\x1b[31m"),
        }
    }
}

/// Task counts per [`TaskStatus`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Tally {
    /// Tasks that ended [`TaskStatus::Ok`].
    pub ok: usize,
    /// Tasks that ended [`TaskStatus::Skipped`].
    pub skipped: usize,
    /// Tasks that ended [`TaskStatus::DryRun`].
    pub dry_run: usize,
    /// Tasks that ended [`TaskStatus::Failed`].
    pub failed: usize,
}

impl Tally {
    /// Count the statuses of `entries`.
    #[must_use]
    pub fn of(entries: &[TaskEntry]) -> Self {
        entries.iter().fold(Self::default(), |mut tally, entry| {
            match entry.status {
                TaskStatus::Ok => tally.ok += 1,
                TaskStatus::Skipped => tally.skipped += 1,
                TaskStatus::DryRun => tally.dry_run += 1,
                TaskStatus::Failed => tally.failed += 1,
            }
            tally
        })
    }

    /// Number of tasks counted.
    #[must_use]
    pub const fn total(&self) -> usize {
        self.ok + self.skipped + self.dry_run + self.failed
    }
}

impl fmt::Display for Tally {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} tasks: \x1b[32m{} ok\x1b[0m, \x1b[33m{} skipped\x1b[0m, \x1b[37m{} dry-run\x1b[0m, \x1b[31m{} failed\x1b[0m",
            self.total(),
            self.ok,
            self.skipped,
            self.dry_run,
            self.failed
        )
    }
}

/// Where link and task progress is reported.
///
/// [`Logger`](super::logger::Logger) writes to the console and the log file;
/// tests record messages instead.
pub trait Log: Send + Sync {
    /// Section header, e.g. a task starting.
    fn stage(&self, msg: &str);
    /// Neutral progress message.
    fn info(&self, msg: &str);
    /// A link was created, replaced or found in place.
    fn success(&self, msg: &str);
    /// Detail shown only with `--verbose` (always kept in the log file).
    fn debug(&self, msg: &str);
    /// Something was skipped that the user should look at.
    fn warn(&self, msg: &str);
    /// A link or manifest could not be processed.
    fn error(&self, msg: &str);
    /// What a dry run would have done.
    fn dry_run(&self, msg: &str);
    /// Remember how a task ended, for the summary.
    fn record_task(&self, name: &str, status: TaskStatus, message: Option<&str>);
}
