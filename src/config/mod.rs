//! Run configuration: repository layout, identity, and manifest parsing.
pub mod discovery;
pub mod identity;
pub mod manifest;
pub mod settings;

use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};

use crate::error::ConfigError;
use crate::resources::conflict::GlobalAction;
use identity::Identity;
use settings::Settings;

/// Everything fixed for the duration of a run.
#[derive(Debug, Clone)]
pub struct Config {
    /// Repository root.
    pub root: PathBuf,
    /// Configuration root searched for manifests.
    pub config_dir: PathBuf,
    /// Payload root that link sources are relative to.
    pub payload_dir: PathBuf,
    /// Home directory used to expand `~`.
    pub home: PathBuf,
    /// Identity selecting the top-level manifests.
    pub identity: Identity,
    /// Destination of the repository self-link (may start with `~`).
    pub self_link: String,
    /// Conflict decision in force from the start of the run.
    pub on_conflict: Option<GlobalAction>,
}

/// Values supplied on the command line that take precedence over settings.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    /// Explicit user name.
    pub user: Option<String>,
    /// Explicit host name.
    pub host: Option<String>,
    /// Explicit conflict decision.
    pub on_conflict: Option<GlobalAction>,
}

impl Config {
    /// Build a configuration from explicit parts using default settings.
    #[must_use]
    pub fn new(root: &Path, home: &Path, identity: Identity) -> Self {
        Self::from_settings(root, home, identity, &Settings::default())
    }

    /// Build a configuration from a settings value.
    #[must_use]
    pub fn from_settings(root: &Path, home: &Path, identity: Identity, settings: &Settings) -> Self {
        Self {
            root: root.to_path_buf(),
            config_dir: root.join(&settings.config_dir),
            payload_dir: root.join(&settings.payload_dir),
            home: home.to_path_buf(),
            identity,
            self_link: settings.self_link.clone(),
            on_conflict: settings.on_conflict,
        }
    }

    /// Load the configuration for `root`: read `dotlink.toml`, detect the
    /// home directory and identity, then apply `overrides`.
    ///
    /// # Errors
    ///
    /// Returns an error if the settings file is invalid or no home directory
    /// can be determined.
    pub fn load(root: &Path, overrides: &Overrides) -> Result<Self> {
        let settings = Settings::load(root).context("loading settings")?;
        let home = home_dir()?;
        let identity = Identity::detect(overrides.user.as_deref(), overrides.host.as_deref());
        let mut config = Self::from_settings(root, &home, identity, &settings);
        if overrides.on_conflict.is_some() {
            config.on_conflict = overrides.on_conflict;
        }
        Ok(config)
    }

    /// Resolve a manifest named on the command line.
    ///
    /// Relative paths are taken relative to the configuration root.
    #[must_use]
    pub fn manifest_path(&self, arg: &Path) -> PathBuf {
        if arg.is_absolute() {
            arg.to_path_buf()
        } else {
            self.config_dir.join(arg)
        }
    }
}

/// The user's home directory from `HOME` (or `USERPROFILE` on Windows).
///
/// # Errors
///
/// Returns an error if neither variable is set.
pub fn home_dir() -> Result<PathBuf, ConfigError> {
    let home = if cfg!(target_os = "windows") {
        std::env::var("USERPROFILE")
            .or_else(|_| std::env::var("HOME"))
            .map_err(|_| {
                ConfigError::NoHome("neither USERPROFILE nor HOME is set".to_string())
            })?
    } else {
        std::env::var("HOME").map_err(|_| ConfigError::NoHome("HOME is not set".to_string()))?
    };
    Ok(PathBuf::from(home))
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn new_uses_default_layout() {
        let config = Config::new(
            Path::new("/repo"),
            Path::new("/home/me"),
            Identity::new("me", "box"),
        );
        assert_eq!(config.config_dir, PathBuf::from("/repo/config"));
        assert_eq!(config.payload_dir, PathBuf::from("/repo/dotfiles"));
        assert_eq!(config.self_link, "~/.dotfiles");
        assert!(config.on_conflict.is_none());
    }

    #[test]
    fn from_settings_honours_custom_dirs() {
        let settings = Settings {
            config_dir: "machines".to_string(),
            payload_dir: "home".to_string(),
            ..Settings::default()
        };
        let config = Config::from_settings(
            Path::new("/repo"),
            Path::new("/home/me"),
            Identity::new("me", "box"),
            &settings,
        );
        assert_eq!(config.config_dir, PathBuf::from("/repo/machines"));
        assert_eq!(config.payload_dir, PathBuf::from("/repo/home"));
    }

    #[test]
    fn manifest_path_relative_to_config_root() {
        let config = Config::new(
            Path::new("/repo"),
            Path::new("/home/me"),
            Identity::new("me", "box"),
        );
        assert_eq!(
            config.manifest_path(Path::new("work/me@box.config")),
            PathBuf::from("/repo/config/work/me@box.config")
        );
        assert_eq!(
            config.manifest_path(Path::new("/tmp/x.config")),
            PathBuf::from("/tmp/x.config")
        );
    }

    #[test]
    fn load_applies_overrides() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(settings::SETTINGS_FILE),
            "on_conflict = \"skip\"\n",
        )
        .unwrap();
        let overrides = Overrides {
            user: Some("ci".to_string()),
            host: Some("runner".to_string()),
            on_conflict: Some(GlobalAction::OverwriteAll),
        };
        // HOME is set in every supported test environment.
        let config = Config::load(dir.path(), &overrides).unwrap();
        assert_eq!(config.identity, Identity::new("ci", "runner"));
        assert_eq!(config.on_conflict, Some(GlobalAction::OverwriteAll));
    }
}
