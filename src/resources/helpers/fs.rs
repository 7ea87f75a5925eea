//! File-system helpers shared by resources: home expansion, parent
//! creation, removal and backups.
use std::io;
use std::path::{Path, PathBuf};

/// Suffix appended to a destination when it is backed up.
pub const BACKUP_SUFFIX: &str = ".backup";

/// Expand a leading `~` (alone or followed by a separator) to `home` and make
/// the result absolute.
///
/// `~user` forms are left untouched. Relative results are resolved against
/// the current directory.
///
/// # Examples
///
/// ```
/// use std::path::{Path, PathBuf};
/// use dotlink_cli::resources::helpers::fs::expand_home;
///
/// let home = Path::new("/home/me");
/// assert_eq!(expand_home("~/.bashrc", home), PathBuf::from("/home/me/.bashrc"));
/// assert_eq!(expand_home("~", home), PathBuf::from("/home/me"));
/// assert_eq!(expand_home("/etc/hosts", home), PathBuf::from("/etc/hosts"));
/// ```
#[must_use]
pub fn expand_home(raw: &str, home: &Path) -> PathBuf {
    let expanded = if raw == "~" {
        home.to_path_buf()
    } else if let Some(rest) = raw.strip_prefix("~/").or_else(|| raw.strip_prefix("~\\")) {
        home.join(rest)
    } else {
        PathBuf::from(raw)
    };
    std::path::absolute(&expanded).unwrap_or(expanded)
}

/// Ensure the parent directory of `path` exists, creating it (and any
/// ancestors) if necessary.
///
/// # Errors
///
/// Returns an error if the directory cannot be created.
pub fn ensure_parent_dir(path: &Path) -> io::Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => std::fs::create_dir_all(parent),
        _ => Ok(()),
    }
}

/// Returns `true` if anything occupies `path`, including a broken symlink.
#[must_use]
pub fn is_occupied(path: &Path) -> bool {
    path.symlink_metadata().is_ok()
}

/// Remove whatever occupies `path`.
///
/// Real directories are removed recursively. Symlinks are removed themselves
/// and never followed, so a link to a directory leaves the directory intact.
/// Does nothing if `path` is free.
///
/// # Errors
///
/// Returns an error if the entry exists but cannot be removed.
pub fn remove_existing(path: &Path) -> io::Result<()> {
    let meta = match path.symlink_metadata() {
        Ok(meta) => meta,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(()),
        Err(e) => return Err(e),
    };
    if meta.is_dir() {
        std::fs::remove_dir_all(path)
    } else {
        remove_link_or_file(path)
    }
}

#[cfg(not(windows))]
fn remove_link_or_file(path: &Path) -> io::Result<()> {
    std::fs::remove_file(path)
}

/// On Windows a directory symlink must be removed with `remove_dir`.
#[cfg(windows)]
fn remove_link_or_file(path: &Path) -> io::Result<()> {
    std::fs::remove_file(path).or_else(|_| std::fs::remove_dir(path))
}

/// The path an existing destination is moved to by a backup.
///
/// # Examples
///
/// ```
/// use std::path::{Path, PathBuf};
/// use dotlink_cli::resources::helpers::fs::backup_path;
///
/// assert_eq!(
///     backup_path(Path::new("/home/me/.bashrc")),
///     PathBuf::from("/home/me/.bashrc.backup")
/// );
/// ```
#[must_use]
pub fn backup_path(path: &Path) -> PathBuf {
    let mut os = path.as_os_str().to_os_string();
    os.push(BACKUP_SUFFIX);
    PathBuf::from(os)
}
