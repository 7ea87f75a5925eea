//! Domain-specific error types for the link engine.
//!
//! Internal modules return typed errors while command handlers at the CLI
//! boundary convert them to [`anyhow::Error`] via the standard `?` operator.
//!
//! # Error kinds
//!
//! ```text
//! ConfigError   : settings file, root and home detection
//! ManifestError : reading manifest files
//! LinkError     : a single link that could not be applied
//! ConflictError : unrecoverable conflict resolution (fatal)
//! ```
//!
//! Only [`ConflictError`] stops a run. Every other error is reported and the
//! run carries on with the next directive.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that arise while loading configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The settings file is not valid TOML or has unknown keys.
    #[error("Invalid settings in {file}: {message}")]
    InvalidSettings {
        /// Path to the settings file.
        file: String,
        /// Parser message.
        message: String,
    },

    /// An I/O error occurred while reading a config file.
    #[error("IO error reading config file {path}: {source}")]
    Io {
        /// Path to the file that could not be read.
        path: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Neither `HOME` nor `USERPROFILE` is set.
    #[error("cannot determine home directory: {0}")]
    NoHome(String),

    /// The repository root could not be located.
    #[error("cannot determine dotfiles root. Use --root or set DOTLINK_ROOT env var")]
    NoRoot,
}

/// Errors that arise from reading a manifest.
#[derive(Error, Debug)]
pub enum ManifestError {
    /// The manifest file could not be read.
    #[error("cannot read manifest {path}: {source}")]
    Read {
        /// Path to the manifest.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
}

/// Errors that abandon a single link without stopping the run.
#[derive(Error, Debug)]
pub enum LinkError {
    /// The link source does not exist in the payload tree.
    #[error("source missing: {0}")]
    SourceMissing(PathBuf),

    /// The destination resolves to the source itself.
    #[error("cannot link to self: {0}")]
    SelfLink(PathBuf),

    /// A backup would clobber an earlier backup.
    #[error("backup already exists: {0}")]
    BackupExists(PathBuf),

    /// The underlying filesystem operation failed.
    #[error("{action} {path}: {source}")]
    Filesystem {
        /// What was being attempted (e.g. `"create link"`).
        action: &'static str,
        /// Path the operation acted on.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
}

/// Errors from conflict resolution. Always fatal to the run.
#[derive(Error, Debug)]
pub enum ConflictError {
    /// The answer did not match any offered option.
    #[error("invalid answer '{answer}' for {destination}")]
    InvalidAnswer {
        /// The raw answer.
        answer: String,
        /// The destination being resolved.
        destination: PathBuf,
    },

    /// No answer could be read at all (closed stdin, I/O error).
    #[error("cannot read answer for {destination}: {message}")]
    Prompt {
        /// The destination being resolved.
        destination: PathBuf,
        /// Description of the failure.
        message: String,
    },
}
