//! Filesystem primitives that know their current state and how to reach the
//! desired one.
pub mod conflict;
pub mod helpers;
pub mod symlink;

use crate::error::LinkError;

/// Something that can be shown to the user and put in place.
pub trait Applicable {
    /// One-line description, e.g. `~/.bashrc -> /repo/dotfiles/bashrc`.
    fn description(&self) -> String;

    /// Put the resource in place.
    ///
    /// The destination must already be free; clearing it is the caller's
    /// decision.
    ///
    /// # Errors
    ///
    /// Returns a [`LinkError`] if the filesystem operation fails.
    fn apply(&self) -> Result<(), LinkError>;
}

/// What occupies a destination compared to what should be there.
///
/// # Examples
///
/// ```
/// use dotlink_cli::resources::ResourceState;
///
/// let occupied = ResourceState::Incorrect { current: "target is a regular file".into() };
/// assert_ne!(occupied, ResourceState::Missing);
/// assert_eq!(ResourceState::Correct, ResourceState::Correct);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceState {
    /// The destination is free.
    Missing,
    /// The destination is already what it should be.
    Correct,
    /// Something else occupies the destination.
    Incorrect {
        /// Description of the occupant.
        current: String,
    },
    /// The resource can never be applied (missing source, self link).
    Invalid {
        /// Why not.
        reason: String,
    },
}

/// An [`Applicable`] that can inspect the destination first.
pub trait Resource: Applicable {
    /// Inspect the destination.
    fn current_state(&self) -> ResourceState;

    /// Whether applying would change anything on disk.
    fn needs_change(&self) -> bool {
        matches!(
            self.current_state(),
            ResourceState::Missing | ResourceState::Incorrect { .. }
        )
    }
}
