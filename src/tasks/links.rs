//! Apply one `(source, destination)` pair.
//!
//! The decision for a destination follows a fixed order: a missing source
//! abandons the link, a free destination is linked, a destination that
//! already links to the source is left alone, a destination equal to the
//! source is refused, and anything else is a conflict handed to the
//! [`ConflictResolver`](crate::resources::conflict::ConflictResolver).
use std::fmt;
use std::path::Path;

use super::Context;
use crate::error::{ConflictError, LinkError};
use crate::resources::conflict::ConflictAction;
use crate::resources::helpers::fs::{backup_path, is_occupied};
use crate::resources::symlink::SymlinkResource;
use crate::resources::{Applicable as _, Resource as _, ResourceState};

/// What happened to one link.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkOutcome {
    /// A new link was created.
    Linked,
    /// The destination already linked to the source.
    AlreadyLinked,
    /// An existing destination was overwritten or backed up, then linked.
    Replaced,
    /// The destination was left as it was.
    Skipped,
    /// The link could not be applied.
    Failed,
}

/// Per-manifest counts of [`LinkOutcome`]s.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LinkStats {
    /// New links.
    pub linked: usize,
    /// Links already in place.
    pub already_linked: usize,
    /// Destinations overwritten or backed up.
    pub replaced: usize,
    /// Destinations left alone.
    pub skipped: usize,
    /// Links that failed.
    pub failed: usize,
}

impl LinkStats {
    /// Count one outcome.
    pub const fn record(&mut self, outcome: LinkOutcome) {
        match outcome {
            LinkOutcome::Linked => self.linked += 1,
            LinkOutcome::AlreadyLinked => self.already_linked += 1,
            LinkOutcome::Replaced => self.replaced += 1,
            LinkOutcome::Skipped => self.skipped += 1,
            LinkOutcome::Failed => self.failed += 1,
        }
    }

    /// Add another set of counts to this one.
    pub const fn merge(&mut self, other: Self) {
        self.linked += other.linked;
        self.already_linked += other.already_linked;
        self.replaced += other.replaced;
        self.skipped += other.skipped;
        self.failed += other.failed;
    }

    /// Total number of links seen.
    #[must_use]
    pub const fn total(&self) -> usize {
        self.linked + self.already_linked + self.replaced + self.skipped + self.failed
    }
}

impl fmt::Display for LinkStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} linked, {} already linked, {} replaced, {} skipped, {} failed",
            self.linked, self.already_linked, self.replaced, self.skipped, self.failed
        )
    }
}

/// Link `destination_raw` (which may start with `~`) to `source`.
///
/// Every problem with this one link is logged and reported as
/// [`LinkOutcome::Failed`] or [`LinkOutcome::Skipped`].
///
/// # Errors
///
/// Returns a [`ConflictError`] if a conflict prompt could not be answered.
/// The run must stop.
pub fn apply_link(
    ctx: &Context,
    source: &Path,
    destination_raw: &str,
) -> Result<LinkOutcome, ConflictError> {
    let destination = ctx.expand(destination_raw);
    let resource = SymlinkResource::new(source.to_path_buf(), destination);

    if !is_occupied(&resource.source) {
        ctx.log
            .error(&LinkError::SourceMissing(resource.source.clone()).to_string());
        return Ok(LinkOutcome::Failed);
    }

    if !ctx.dry_run
        && let Err(e) = resource.prepare()
    {
        ctx.log.error(&e.to_string());
        return Ok(LinkOutcome::Failed);
    }

    let action = match resource.current_state() {
        ResourceState::Missing => ConflictAction::Link,
        ResourceState::Correct => ConflictAction::AlreadyLinked,
        ResourceState::Invalid { reason } => {
            ctx.log.error(&reason);
            ConflictAction::Skip
        }
        ResourceState::Incorrect { current } => {
            ctx.log
                .debug(&format!("{}: {current}", resource.target.display()));
            if ctx.dry_run && ctx.conflicts.global().is_none() {
                ctx.log.dry_run(&format!(
                    "would ask: {} ({current})",
                    resource.target.display()
                ));
                return Ok(LinkOutcome::Skipped);
            }
            ctx.conflicts
                .resolve(&resource.target, &resource.source, ctx.prompt.as_ref())?
        }
    };

    if ctx.dry_run {
        Ok(preview(ctx, action, &resource))
    } else {
        Ok(perform(ctx, action, &resource))
    }
}

/// Report what `action` would do without touching the filesystem.
fn preview(ctx: &Context, action: ConflictAction, resource: &SymlinkResource) -> LinkOutcome {
    let target = resource.target.display();
    match action.single_shot() {
        ConflictAction::AlreadyLinked => {
            ctx.log.debug(&format!("already linked: {target}"));
            LinkOutcome::AlreadyLinked
        }
        ConflictAction::Link => {
            ctx.log.dry_run(&format!("would link {}", resource.description()));
            LinkOutcome::Linked
        }
        ConflictAction::Overwrite => {
            ctx.log.dry_run(&format!("would overwrite {}", resource.description()));
            LinkOutcome::Replaced
        }
        ConflictAction::Backup => {
            ctx.log.dry_run(&format!(
                "would back up {target} to {} and link it",
                backup_path(&resource.target).display()
            ));
            LinkOutcome::Replaced
        }
        _ => {
            ctx.log.dry_run(&format!("would skip {target}"));
            LinkOutcome::Skipped
        }
    }
}

/// Carry out `action` on disk.
fn perform(ctx: &Context, action: ConflictAction, resource: &SymlinkResource) -> LinkOutcome {
    let target = resource.target.display();
    let result = match action.single_shot() {
        ConflictAction::AlreadyLinked => {
            ctx.log.success(&format!("already linked: {target}"));
            return LinkOutcome::AlreadyLinked;
        }
        ConflictAction::Link => resource
            .apply()
            .map(|()| (LinkOutcome::Linked, format!("linked {}", resource.description()))),
        ConflictAction::Overwrite => resource.overwrite().map(|()| {
            (
                LinkOutcome::Replaced,
                format!("overwrote {}", resource.description()),
            )
        }),
        ConflictAction::Backup => resource.backup().map(|()| {
            (
                LinkOutcome::Replaced,
                format!(
                    "backed up {target} to {} and linked it",
                    backup_path(&resource.target).display()
                ),
            )
        }),
        _ => {
            ctx.log.info(&format!("skipped: {target}"));
            return LinkOutcome::Skipped;
        }
    };

    match result {
        Ok((outcome, message)) => {
            ctx.log.success(&message);
            outcome
        }
        Err(e) => {
            ctx.log.error(&e.to_string());
            LinkOutcome::Failed
        }
    }
}
