//! Interactive choice prompts.
//!
//! The link engine only needs one capability: show a question with a set of
//! labeled options and return the label the user typed. Validation of the
//! answer is left to the caller.
use std::io::{self, BufRead, Write};

use anyhow::{Context as _, Result, bail};

/// One selectable answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PromptOption {
    /// What the user types.
    pub label: &'static str,
    /// Shown next to the label.
    pub description: &'static str,
}

impl PromptOption {
    /// Create an option.
    #[must_use]
    pub const fn new(label: &'static str, description: &'static str) -> Self {
        Self { label, description }
    }
}

/// Ask the user to pick one of several labeled options.
#[cfg_attr(test, mockall::automock)]
pub trait Prompt {
    /// Show `prompt` and `message` with `options` and return the raw answer.
    ///
    /// # Errors
    ///
    /// Returns an error if no answer can be read (closed input, I/O failure).
    fn choose(&self, prompt: &str, message: &str, options: &[PromptOption]) -> Result<String>;
}

/// Prompt on the controlling terminal (stdout/stdin).
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalPrompt;

impl Prompt for TerminalPrompt {
    fn choose(&self, prompt: &str, message: &str, options: &[PromptOption]) -> Result<String> {
        let mut out = io::stdout().lock();
        render(&mut out, prompt, message, options).context("writing prompt")?;
        read_answer(&mut io::stdin().lock())
    }
}

/// Write the question block.
///
/// ```text
/// File already exists: /home/me/.bashrc (bashrc)
///   [s] skip  [S] skip all  [o] overwrite  ...
/// What do you want to do? ›
/// ```
///
/// # Errors
///
/// Returns an error if the writer fails.
pub fn render(
    out: &mut impl Write,
    prompt: &str,
    message: &str,
    options: &[PromptOption],
) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "\x1b[1;33m?\x1b[0m {prompt}")?;
    let choices: Vec<String> = options
        .iter()
        .map(|o| format!("\x1b[1m[{}]\x1b[0m {}", o.label, o.description))
        .collect();
    writeln!(out, "  {}", choices.join("  "))?;
    write!(out, "{message} › ")?;
    out.flush()
}

/// Read a single answer line, without its line terminator.
///
/// # Errors
///
/// Returns an error if reading fails or input is already closed.
pub fn read_answer(input: &mut impl BufRead) -> Result<String> {
    let mut line = String::new();
    let read = input.read_line(&mut line).context("reading answer")?;
    if read == 0 {
        bail!("input closed before an answer was given");
    }
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}
