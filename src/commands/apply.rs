//! The single-manifest mode.
use std::path::Path;
use std::sync::Arc;

use anyhow::Result;

use super::{CommandSetup, log_version, run_tasks_to_completion};
use crate::cli::GlobalOpts;
use crate::logging::Logger;
use crate::tasks::Task;
use crate::tasks::manifests::ApplyManifest;

/// Apply the single manifest at `manifest`, bypassing discovery and the
/// repository self-link.
///
/// # Errors
///
/// Returns an error if configuration loading fails, a conflict prompt cannot
/// be answered, or the manifest cannot be applied.
pub fn run(global: &GlobalOpts, manifest: &Path, log: &Arc<Logger>) -> Result<()> {
    log_version(log);
    let setup = CommandSetup::init(global, log)?;
    let task = ApplyManifest::new(setup.config.manifest_path(manifest));
    let ctx = setup.into_context(global, log);

    run_tasks_to_completion([&task as &dyn Task], &ctx, log)
}
