//! Symlink resource.
use std::path::{Path, PathBuf};

use super::helpers::fs::{backup_path, ensure_parent_dir, is_occupied, remove_existing};
use super::{Applicable, Resource, ResourceState};
use crate::error::LinkError;

/// A symlink at `target` pointing to `source`.
#[derive(Debug, Clone)]
pub struct SymlinkResource {
    /// The source file/directory (what the symlink points to).
    pub source: PathBuf,
    /// The target path (where the symlink will be created).
    pub target: PathBuf,
}

impl SymlinkResource {
    /// Create a new symlink resource.
    #[must_use]
    pub const fn new(source: PathBuf, target: PathBuf) -> Self {
        Self { source, target }
    }

    /// Ensure the target's parent directory exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub fn prepare(&self) -> Result<(), LinkError> {
        ensure_parent_dir(&self.target).map_err(|source| LinkError::Filesystem {
            action: "create parent of",
            path: self.target.clone(),
            source,
        })
    }

    /// Remove whatever occupies the target, then link.
    ///
    /// # Errors
    ///
    /// Returns an error if removal or link creation fails.
    pub fn overwrite(&self) -> Result<(), LinkError> {
        remove_existing(&self.target).map_err(|source| LinkError::Filesystem {
            action: "remove existing",
            path: self.target.clone(),
            source,
        })?;
        self.apply()
    }

    /// Move the target aside to `<target>.backup`, then link.
    ///
    /// An existing backup is never replaced.
    ///
    /// # Errors
    ///
    /// Returns an error if a backup already exists, or if the rename or link
    /// creation fails.
    pub fn backup(&self) -> Result<(), LinkError> {
        let backup = backup_path(&self.target);
        if is_occupied(&backup) {
            return Err(LinkError::BackupExists(backup));
        }
        std::fs::rename(&self.target, &backup).map_err(|source| LinkError::Filesystem {
            action: "back up",
            path: self.target.clone(),
            source,
        })?;
        self.apply()
    }
}

impl Applicable for SymlinkResource {
    fn description(&self) -> String {
        format!("{} -> {}", self.target.display(), self.source.display())
    }

    fn apply(&self) -> Result<(), LinkError> {
        create_symlink(&self.source, &self.target).map_err(|source| LinkError::Filesystem {
            action: "create link",
            path: self.target.clone(),
            source,
        })
    }
}

impl Resource for SymlinkResource {
    fn current_state(&self) -> ResourceState {
        if !is_occupied(&self.source) {
            return ResourceState::Invalid {
                reason: LinkError::SourceMissing(self.source.clone()).to_string(),
            };
        }

        if !is_occupied(&self.target) {
            return ResourceState::Missing;
        }

        if let Ok(existing) = std::fs::read_link(&self.target)
            && paths_equal(&existing, &self.source)
        {
            return ResourceState::Correct;
        }

        if same_location(&self.target, &self.source) {
            return ResourceState::Invalid {
                reason: LinkError::SelfLink(self.target.clone()).to_string(),
            };
        }

        let current = std::fs::read_link(&self.target).map_or_else(
            |_| {
                if self.target.is_dir() {
                    "target is a directory".to_string()
                } else {
                    "target is a regular file".to_string()
                }
            },
            |existing| format!("points to {}", existing.display()),
        );
        ResourceState::Incorrect { current }
    }
}

/// Compare two paths for equality, handling UNC prefix normalization on Windows.
fn paths_equal(a: &Path, b: &Path) -> bool {
    let normalize = |p: &Path| -> PathBuf {
        #[cfg(windows)]
        {
            let s = p.to_string_lossy();
            if let Some(stripped) = s.strip_prefix(r"\\?\") {
                return PathBuf::from(stripped);
            }
        }
        p.components().collect()
    };

    normalize(a) == normalize(b)
}

/// Whether `a` and `b` name the same directory entry.
///
/// Parents are canonicalized so `..` and symlinked directories are seen
/// through; the final component is not followed, so a link to `b` is not
/// the same entry as `b`.
fn same_location(a: &Path, b: &Path) -> bool {
    if paths_equal(a, b) {
        return true;
    }
    match (resolve_parent(a), resolve_parent(b)) {
        (Some(a), Some(b)) => a == b,
        _ => false,
    }
}

/// `path` with its parent directory canonicalized and its file name kept.
fn resolve_parent(path: &Path) -> Option<PathBuf> {
    let name = path.file_name()?;
    let parent = dunce::canonicalize(path.parent()?).ok()?;
    Some(parent.join(name))
}

/// Create a symlink at `link` pointing to `target`.
fn create_symlink(target: &Path, link: &Path) -> std::io::Result<()> {
    #[cfg(unix)]
    {
        std::os::unix::fs::symlink(target, link)
    }

    #[cfg(windows)]
    {
        if target.is_dir() {
            std::os::windows::fs::symlink_dir(target, link)
        } else {
            std::os::windows::fs::symlink_file(target, link)
        }
    }
}
