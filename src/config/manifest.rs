//! Link manifest parsing.
//!
//! A manifest is a plain-text file with one directive per line:
//!
//! ```text
//! # comment
//! ~/.bashrc          bashrc
//! ~/My\ Notes        notes         # escaped space inside a path
//! include            common.links
//! ```
//!
//! Parsing is best-effort: malformed lines and missing include targets are
//! collected as [`Diagnostic`]s and the rest of the file is still processed.
use std::path::{Path, PathBuf};

use crate::error::ManifestError;

/// Keyword that introduces an include directive.
const INCLUDE_KEYWORD: &str = "include";

/// A `<destination> <source>` pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkDirective {
    /// Destination as written; may start with `~`.
    pub destination_raw: String,
    /// Source path relative to the payload root.
    pub source_relative: String,
}

impl LinkDirective {
    /// Absolute source path under `payload_root`.
    #[must_use]
    pub fn source_path(&self, payload_root: &Path) -> PathBuf {
        payload_root.join(&self.source_relative)
    }
}

/// An `include <manifest>` reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncludeDirective {
    /// Path as written in the manifest.
    pub relative: String,
    /// Path resolved against the declaring manifest's directory.
    pub path: PathBuf,
}

/// Severity of a parse diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// The line was skipped.
    Warning,
    /// A referenced file is missing.
    Error,
}

/// A problem found on one manifest line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// How serious the problem is.
    pub severity: Severity,
    /// 1-based line number.
    pub line: usize,
    /// Human-readable description.
    pub message: String,
}

/// Everything extracted from a single manifest, in file order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedManifest {
    /// Link directives.
    pub links: Vec<LinkDirective>,
    /// Include directives whose targets exist.
    pub includes: Vec<IncludeDirective>,
    /// Skipped lines and discarded includes.
    pub diagnostics: Vec<Diagnostic>,
}

/// Read and parse the manifest at `path`.
///
/// # Errors
///
/// Returns an error only if the file itself cannot be read.
pub fn parse(path: &Path) -> Result<ParsedManifest, ManifestError> {
    let content = std::fs::read_to_string(path).map_err(|source| ManifestError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let base = path.parent().unwrap_or_else(|| Path::new("."));
    Ok(parse_str(&content, base))
}

/// Parse manifest text. Include paths are resolved against `base_dir` and
/// checked for existence.
#[must_use]
pub fn parse_str(content: &str, base_dir: &Path) -> ParsedManifest {
    let mut parsed = ParsedManifest::default();

    for (idx, line) in content.lines().enumerate() {
        let line_num = idx + 1;
        let tokens = tokenize(line);

        match tokens.as_slice() {
            [] => {}
            [keyword, target] if keyword == INCLUDE_KEYWORD => {
                let path = base_dir.join(target);
                if path.is_file() {
                    parsed.includes.push(IncludeDirective {
                        relative: target.clone(),
                        path,
                    });
                } else {
                    parsed.diagnostics.push(Diagnostic {
                        severity: Severity::Error,
                        line: line_num,
                        message: format!("included file not found: {}", path.display()),
                    });
                }
            }
            [destination, source] => parsed.links.push(LinkDirective {
                destination_raw: destination.clone(),
                source_relative: source.clone(),
            }),
            other => parsed.diagnostics.push(Diagnostic {
                severity: Severity::Warning,
                line: line_num,
                message: format!(
                    "cannot parse line ({} tokens, expected 2): {}",
                    other.len(),
                    line.trim()
                ),
            }),
        }
    }

    parsed
}

/// Split one manifest line into tokens.
///
/// Whitespace separates tokens and runs of it count as one separator.
/// An unescaped `#` ends the line. A backslash escapes a following space,
/// tab, `#` or backslash; before any other character it is kept verbatim.
///
/// # Examples
///
/// ```
/// use dotlink_cli::config::manifest::tokenize;
///
/// assert_eq!(tokenize(r"~/My\ Docs  docs # notes"), ["~/My Docs", "docs"]);
/// assert!(tokenize("   # only a comment").is_empty());
/// ```
#[must_use]
pub fn tokenize(line: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_token = false;
    let mut chars = line.chars();

    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                in_token = true;
                match chars.next() {
                    Some(next @ (' ' | '\t' | '#' | '\\')) => current.push(next),
                    Some(next) => {
                        current.push('\\');
                        current.push(next);
                    }
                    None => current.push('\\'),
                }
            }
            '#' => break,
            c if c.is_whitespace() => {
                if in_token {
                    tokens.push(std::mem::take(&mut current));
                    in_token = false;
                }
            }
            c => {
                in_token = true;
                current.push(c);
            }
        }
    }

    if in_token {
        tokens.push(current);
    }
    tokens
}
