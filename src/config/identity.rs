//! Machine identity used to select the top-level manifest.
use std::fmt;

/// File extension of identity manifests.
pub const MANIFEST_EXTENSION: &str = "config";

/// The `(user, host)` pair a manifest is written for.
///
/// # Examples
///
/// ```
/// use dotlink_cli::config::identity::Identity;
///
/// let id = Identity::new("alice", "laptop");
/// assert_eq!(id.manifest_file_name(), "alice@laptop.config");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    /// Login name.
    pub user: String,
    /// Host name.
    pub host: String,
}

impl Identity {
    /// Create an identity from explicit values.
    #[must_use]
    pub fn new(user: impl Into<String>, host: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            host: host.into(),
        }
    }

    /// Detect the identity of the current process, honouring overrides.
    ///
    /// The user name comes from the operating system account; the host name
    /// from `gethostname`. A host name that cannot be read becomes `"unknown"`.
    #[must_use]
    pub fn detect(user: Option<&str>, host: Option<&str>) -> Self {
        let user = user.map_or_else(whoami::username, str::to_string);
        let host = host.map_or_else(
            || {
                hostname::get()
                    .ok()
                    .and_then(|h| h.into_string().ok())
                    .unwrap_or_else(|| "unknown".to_string())
            },
            str::to_string,
        );
        Self { user, host }
    }

    /// The exact file name a manifest for this identity must have.
    #[must_use]
    pub fn manifest_file_name(&self) -> String {
        format!("{self}.{MANIFEST_EXTENSION}")
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.user, self.host)
    }
}
