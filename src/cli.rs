//! Command-line arguments.
use std::path::PathBuf;

use clap::Parser;

use crate::config::Overrides;
use crate::resources::conflict::GlobalAction;

/// Top-level CLI entry point for the dotfiles linker.
///
/// Without a manifest, links the repository to its home alias and applies
/// every manifest named `<user>@<host>.config` under the configuration root.
/// With one, applies just that manifest.
#[derive(Parser, Debug)]
#[command(
    name = "dotlink",
    about = "Link dotfiles into place from per-machine manifests",
    version = option_env!("DOTLINK_VERSION").unwrap_or(env!("CARGO_PKG_VERSION"))
)]
pub struct Cli {
    /// Apply a single manifest (relative paths resolve against the configuration root)
    pub manifest: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Options shared by both modes.
    #[command(flatten)]
    pub global: GlobalOpts,
}

impl Cli {
    /// Name used for the log file of this invocation.
    #[must_use]
    pub const fn command_name(&self) -> &'static str {
        if self.manifest.is_some() {
            "apply"
        } else {
            "install"
        }
    }
}

/// Options shared by both modes.
#[derive(Parser, Debug, Clone, Default)]
pub struct GlobalOpts {
    /// Preview changes without applying
    #[arg(short = 'd', long)]
    pub dry_run: bool,

    /// Override dotfiles root directory
    #[arg(long)]
    pub root: Option<PathBuf>,

    /// User name used to select manifests
    #[arg(long)]
    pub user: Option<String>,

    /// Host name used to select manifests
    #[arg(long)]
    pub host: Option<String>,

    /// Answer every conflict the same way instead of prompting
    #[arg(long, value_enum)]
    pub on_conflict: Option<GlobalAction>,
}

impl GlobalOpts {
    /// Values that take precedence over the settings file.
    #[must_use]
    pub fn overrides(&self) -> Overrides {
        Overrides {
            user: self.user.clone(),
            host: self.host.clone(),
            on_conflict: self.on_conflict,
        }
    }
}
