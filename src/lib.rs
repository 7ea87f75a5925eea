//! Manifest-driven dotfiles linker.
//!
//! Scans a configuration tree for `<user>@<host>.config` manifests, resolves
//! their link and include directives, and materializes each pair as a
//! symbolic link, asking (or applying a run-wide decision) when a
//! destination is already taken.
//!
//! The public API is organised into four layers:
//!
//! - **[`config`]**: settings, identity, manifest discovery and parsing
//! - **[`resources`]**: idempotent `check + apply` symlink primitives and conflict resolution
//! - **[`tasks`]**: named units of work wired to resources
//! - **[`commands`]**: top-level orchestration for the two entry modes
#![deny(clippy::or_fun_call)]
#![deny(clippy::bool_to_int_with_if)]

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod logging;
pub mod prompt;
pub mod resources;
pub mod tasks;
