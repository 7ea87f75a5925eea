//! Log file location, ANSI removal and timestamps.
use std::path::PathBuf;

use crate::config::home_dir;

/// `chrono` format of the run header timestamp.
pub(super) const HEADER_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
/// `chrono` format of the per-line timestamp.
pub(super) const LINE_FORMAT: &str = "%H:%M:%S";

/// Drop terminal escape sequences so the log file holds plain text.
///
/// A CSI sequence (`ESC [`, parameters, then a final byte in `@..=~`) is
/// dropped whole. Any other escape drops itself and the next character.
pub(super) fn strip_ansi(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '\x1b' {
            out.push(c);
        } else if chars.next_if_eq(&'[').is_some() {
            chars
                .by_ref()
                .take_while(|ch| !('@'..='~').contains(ch))
                .for_each(drop);
        } else {
            chars.next();
        }
    }
    out
}

/// `$XDG_CACHE_HOME/dotlink`, or `~/.cache/dotlink`; created if missing.
fn log_dir() -> Option<PathBuf> {
    let cache = std::env::var_os("XDG_CACHE_HOME")
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
        .or_else(|| home_dir().ok().map(|home| home.join(".cache")))?;
    let dir = cache.join("dotlink");
    std::fs::create_dir_all(&dir).ok()?;
    Some(dir)
}

/// Log file for one invocation mode (`install.log`, `apply.log`).
pub(super) fn log_file_path(command: &str) -> Option<PathBuf> {
    log_dir().map(|dir| dir.join(format!("{command}.log")))
}

/// Current UTC time rendered with `format`.
pub(super) fn utc_now(format: &str) -> String {
    chrono::Utc::now().format(format).to_string()
}
