//! The default mode: link the repository and apply discovered manifests.
use std::sync::Arc;

use anyhow::Result;

use super::{CommandSetup, log_version, run_tasks_to_completion};
use crate::cli::GlobalOpts;
use crate::logging::Logger;
use crate::tasks;

/// Run the default mode: link the repository, then apply every discovered
/// manifest.
///
/// # Errors
///
/// Returns an error if configuration loading fails, a conflict prompt cannot
/// be answered, or any task fails.
pub fn run(global: &GlobalOpts, log: &Arc<Logger>) -> Result<()> {
    log_version(log);
    let setup = CommandSetup::init(global, log)?;
    let ctx = setup.into_context(global, log);

    let all_tasks = tasks::install_tasks();
    run_tasks_to_completion(all_tasks.iter().map(AsRef::as_ref), &ctx, log)
}
