//! `dotlink` command-line entry point.
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;

use dotlink_cli::{cli, commands, logging};

fn main() -> Result<()> {
    let _ = enable_ansi_support::enable_ansi_support();
    let args = cli::Cli::parse();
    let command = args.command_name();
    logging::init_subscriber(args.verbose, command);
    let log = Arc::new(logging::Logger::new(command));

    match &args.manifest {
        Some(manifest) => commands::apply::run(&args.global, manifest, &log),
        None => commands::install::run(&args.global, &log),
    }
}
