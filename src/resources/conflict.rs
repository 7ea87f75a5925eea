//! Conflict resolution for destinations that already exist.
//!
//! A conflict is decided either by asking the user or by a run-wide
//! [`GlobalAction`]. The first "all" answer becomes the global action and is
//! used verbatim for every later conflict; it is never re-asked and never
//! reset.
use std::cell::Cell;
use std::fmt;
use std::path::Path;

use serde::Deserialize;

use crate::error::ConflictError;
use crate::prompt::{Prompt, PromptOption};

/// What to do with one destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictAction {
    /// Destination already links to the source.
    AlreadyLinked,
    /// Leave the destination alone.
    Skip,
    /// Leave this and every later conflicting destination alone.
    SkipAll,
    /// Remove the destination, then link.
    Overwrite,
    /// Overwrite this and every later conflicting destination.
    OverwriteAll,
    /// Rename the destination to `<name>.backup`, then link.
    Backup,
    /// Back up this and every later conflicting destination.
    BackupAll,
    /// Destination is free; link directly.
    Link,
}

/// A decision that applies to the rest of the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, clap::ValueEnum)]
pub enum GlobalAction {
    /// Skip every conflict.
    #[serde(rename = "skip")]
    #[value(name = "skip")]
    SkipAll,
    /// Overwrite every conflict.
    #[serde(rename = "overwrite")]
    #[value(name = "overwrite")]
    OverwriteAll,
    /// Back up every conflict.
    #[serde(rename = "backup")]
    #[value(name = "backup")]
    BackupAll,
}

impl GlobalAction {
    /// The per-destination action this global decision stands for.
    #[must_use]
    pub const fn single_shot(self) -> ConflictAction {
        match self {
            Self::SkipAll => ConflictAction::Skip,
            Self::OverwriteAll => ConflictAction::Overwrite,
            Self::BackupAll => ConflictAction::Backup,
        }
    }
}

impl fmt::Display for GlobalAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SkipAll => write!(f, "skip all"),
            Self::OverwriteAll => write!(f, "overwrite all"),
            Self::BackupAll => write!(f, "backup all"),
        }
    }
}

impl ConflictAction {
    /// The global decision carried by an "all" action, if any.
    #[must_use]
    pub const fn as_global(self) -> Option<GlobalAction> {
        match self {
            Self::SkipAll => Some(GlobalAction::SkipAll),
            Self::OverwriteAll => Some(GlobalAction::OverwriteAll),
            Self::BackupAll => Some(GlobalAction::BackupAll),
            _ => None,
        }
    }

    /// Map an "all" action to its single-shot equivalent; others are unchanged.
    #[must_use]
    pub const fn single_shot(self) -> Self {
        match self.as_global() {
            Some(global) => global.single_shot(),
            None => self,
        }
    }

    /// Parse a prompt answer.
    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        CONFLICT_OPTIONS
            .iter()
            .zip(PROMPT_ACTIONS)
            .find(|(option, _)| option.label == label)
            .map(|(_, action)| action)
    }
}

/// Options offered when a destination is in the way, in display order.
pub const CONFLICT_OPTIONS: [PromptOption; 6] = [
    PromptOption::new("s", "skip"),
    PromptOption::new("S", "skip all"),
    PromptOption::new("o", "overwrite"),
    PromptOption::new("O", "overwrite all"),
    PromptOption::new("b", "backup"),
    PromptOption::new("B", "backup all"),
];

/// Actions matching [`CONFLICT_OPTIONS`] position by position.
const PROMPT_ACTIONS: [ConflictAction; 6] = [
    ConflictAction::Skip,
    ConflictAction::SkipAll,
    ConflictAction::Overwrite,
    ConflictAction::OverwriteAll,
    ConflictAction::Backup,
    ConflictAction::BackupAll,
];

/// Decides conflicts and remembers the run-wide global action.
///
/// Single-threaded by construction: the global action lives in a [`Cell`].
#[derive(Debug, Default)]
pub struct ConflictResolver {
    global: Cell<Option<GlobalAction>>,
}

impl ConflictResolver {
    /// Create a resolver, optionally starting with a global action in force.
    #[must_use]
    pub const fn new(preset: Option<GlobalAction>) -> Self {
        Self {
            global: Cell::new(preset),
        }
    }

    /// The global action currently in force.
    #[must_use]
    pub fn global(&self) -> Option<GlobalAction> {
        self.global.get()
    }

    /// Decide what to do with an existing `destination` that does not link
    /// to `source`.
    ///
    /// Uses the global action when one is set; otherwise asks through
    /// `prompt`. An "all" answer is recorded as the global action and the
    /// returned action is always single-shot.
    ///
    /// # Errors
    ///
    /// Returns a [`ConflictError`] if the answer is not one of the offered
    /// labels or cannot be read. Both are fatal to the run.
    pub fn resolve(
        &self,
        destination: &Path,
        source: &Path,
        prompt: &dyn Prompt,
    ) -> Result<ConflictAction, ConflictError> {
        if let Some(global) = self.global.get() {
            return Ok(global.single_shot());
        }

        let source_name = source
            .file_name()
            .map_or_else(|| source.display().to_string(), |n| n.to_string_lossy().into_owned());
        let question = format!("File already exists: {} ({source_name})", destination.display());
        let answer = prompt
            .choose(&question, "What do you want to do?", &CONFLICT_OPTIONS)
            .map_err(|e| ConflictError::Prompt {
                destination: destination.to_path_buf(),
                message: format!("{e:#}"),
            })?;

        let action =
            ConflictAction::from_label(answer.trim()).ok_or_else(|| ConflictError::InvalidAnswer {
                answer: answer.clone(),
                destination: destination.to_path_buf(),
            })?;

        if let Some(global) = action.as_global() {
            self.global.set(Some(global));
        }
        Ok(action.single_shot())
    }
}
