//! Manifest traversal: discovery, parsing, links, then includes.
use std::path::{Path, PathBuf};

use anyhow::{Result, bail};

use super::links::{LinkStats, apply_link};
use super::{Context, Task, TaskResult};
use crate::config::discovery::discover;
use crate::config::manifest::{self, Severity};
use crate::error::ConflictError;

/// Apply every manifest named after the current identity.
#[derive(Debug)]
pub struct ApplyManifests;

impl Task for ApplyManifests {
    fn name(&self) -> &str {
        "Apply manifests"
    }

    fn should_run(&self, _ctx: &Context) -> bool {
        true
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        let config_dir = &ctx.config.config_dir;
        let mut totals = LinkStats::default();
        let mut found = 0usize;

        for entry in discover(config_dir, &ctx.config.identity) {
            match entry {
                Ok(path) => {
                    found += 1;
                    totals.merge(apply_top_level(ctx, &path)?);
                }
                Err(e) => ctx.log.warn(&format!("cannot search {}: {e}", config_dir.display())),
            }
        }

        if found == 0 {
            return Ok(TaskResult::Skipped(format!(
                "no {} found under {}",
                ctx.config.identity.manifest_file_name(),
                config_dir.display()
            )));
        }

        finish(ctx, totals)
    }
}

/// Apply a single manifest, bypassing discovery.
#[derive(Debug)]
pub struct ApplyManifest {
    path: PathBuf,
}

impl ApplyManifest {
    /// Create the task for the manifest at `path`.
    #[must_use]
    pub const fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl Task for ApplyManifest {
    fn name(&self) -> &str {
        "Apply manifest"
    }

    fn should_run(&self, _ctx: &Context) -> bool {
        true
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        if !self.path.is_file() {
            bail!("manifest not found: {}", self.path.display());
        }
        let totals = apply_top_level(ctx, &self.path)?;
        finish(ctx, totals)
    }
}

fn apply_top_level(ctx: &Context, path: &Path) -> Result<LinkStats, ConflictError> {
    ctx.log.info(&format!("manifest: {}", path.display()));
    let stats = apply_manifest(ctx, path)?;
    ctx.log.info(&stats.to_string());
    Ok(stats)
}

fn finish(ctx: &Context, totals: LinkStats) -> Result<TaskResult> {
    if totals.failed > 0 {
        bail!("{} link(s) failed", totals.failed);
    }
    if ctx.dry_run {
        return Ok(TaskResult::DryRun);
    }
    Ok(TaskResult::Ok)
}

/// Apply the manifest at `path`: all of its links first, then each include
/// in order, depth-first.
///
/// Diagnostics, unreadable files and include cycles are logged; only a
/// failed conflict prompt stops the traversal.
///
/// # Errors
///
/// Returns a [`ConflictError`] if a conflict prompt could not be answered.
pub fn apply_manifest(ctx: &Context, path: &Path) -> Result<LinkStats, ConflictError> {
    let mut chain = Vec::new();
    process(ctx, path, &mut chain)
}

fn process(ctx: &Context, path: &Path, chain: &mut Vec<PathBuf>) -> Result<LinkStats, ConflictError> {
    let mut stats = LinkStats::default();

    let key = dunce::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
    if chain.contains(&key) {
        ctx.log.error(&format!(
            "include cycle: {} is already being applied",
            path.display()
        ));
        return Ok(stats);
    }

    let parsed = match manifest::parse(path) {
        Ok(parsed) => parsed,
        Err(e) => {
            ctx.log.error(&e.to_string());
            stats.failed += 1;
            return Ok(stats);
        }
    };

    for diagnostic in &parsed.diagnostics {
        let msg = format!("{}:{}: {}", path.display(), diagnostic.line, diagnostic.message);
        match diagnostic.severity {
            Severity::Warning => ctx.log.warn(&msg),
            Severity::Error => ctx.log.error(&msg),
        }
    }

    for link in &parsed.links {
        let source = link.source_path(&ctx.config.payload_dir);
        stats.record(apply_link(ctx, &source, &link.destination_raw)?);
    }

    chain.push(key);
    for include in &parsed.includes {
        ctx.log.debug(&format!("include: {}", include.path.display()));
        stats.merge(process(ctx, &include.path, chain)?);
    }
    chain.pop();

    Ok(stats)
}
