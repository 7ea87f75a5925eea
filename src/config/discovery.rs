//! Discovery of identity manifests under the configuration root.
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use super::identity::Identity;

/// Lazy depth-first walk yielding every manifest for one identity.
///
/// Directory entries are visited in file-name order so that runs are
/// reproducible across filesystems. Entries that cannot be read are yielded
/// as errors; the walk continues past them.
pub struct Discovery {
    walk: walkdir::IntoIter,
    file_name: String,
}

impl std::fmt::Debug for Discovery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Discovery")
            .field("walk", &"<walkdir::IntoIter>")
            .field("file_name", &self.file_name)
            .finish()
    }
}

/// Start discovering manifests named `<user>@<host>.config` below `root`.
///
/// # Examples
///
/// ```no_run
/// use std::path::Path;
/// use dotlink_cli::config::{discovery, identity::Identity};
///
/// let id = Identity::new("alice", "laptop");
/// for manifest in discovery::discover(Path::new("config"), &id).flatten() {
///     println!("{}", manifest.display());
/// }
/// ```
#[must_use]
pub fn discover(root: &Path, identity: &Identity) -> Discovery {
    Discovery {
        walk: WalkDir::new(root).sort_by_file_name().into_iter(),
        file_name: identity.manifest_file_name(),
    }
}

impl Iterator for Discovery {
    type Item = walkdir::Result<PathBuf>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let entry = match self.walk.next()? {
                Ok(entry) => entry,
                Err(e) => return Some(Err(e)),
            };
            if entry.file_name().to_str() == Some(self.file_name.as_str())
                && entry.path().is_file()
            {
                return Some(Ok(entry.into_path()));
            }
        }
    }
}
