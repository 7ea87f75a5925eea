//! Optional repository settings (`dotlink.toml`).
use std::path::Path;

use serde::Deserialize;

use crate::error::ConfigError;
use crate::resources::conflict::GlobalAction;

/// Name of the settings file at the repository root.
pub const SETTINGS_FILE: &str = "dotlink.toml";

/// Repository-level settings. Every key is optional.
///
/// ```toml
/// config_dir = "config"
/// payload_dir = "dotfiles"
/// self_link = "~/.dotfiles"
/// on_conflict = "backup"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Directory (relative to the root) searched for manifests.
    pub config_dir: String,
    /// Directory (relative to the root) holding link sources.
    pub payload_dir: String,
    /// Where the repository itself is linked during a full run.
    pub self_link: String,
    /// Conflict decision applied from the start of the run.
    pub on_conflict: Option<GlobalAction>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            config_dir: "config".to_string(),
            payload_dir: "dotfiles".to_string(),
            self_link: "~/.dotfiles".to_string(),
            on_conflict: None,
        }
    }
}

impl Settings {
    /// Load `dotlink.toml` from `root`, falling back to defaults when absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(root: &Path) -> Result<Self, ConfigError> {
        let path = root.join(SETTINGS_FILE);
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(&path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml(&content).map_err(|message| ConfigError::InvalidSettings {
            file: path.display().to_string(),
            message,
        })
    }

    /// Parse settings from TOML text.
    ///
    /// # Errors
    ///
    /// Returns the parser message if the text is not valid settings TOML.
    pub fn from_toml(content: &str) -> Result<Self, String> {
        toml::from_str(content).map_err(|e| e.message().to_string())
    }
}
