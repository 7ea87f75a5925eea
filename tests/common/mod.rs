// Shared helpers for integration tests.
//
// Provides a temporary-directory-backed repository (with `config/`,
// `dotfiles/` and a fake home next to it), a fluent builder, a prompt that
// replays scripted answers and a logger that records every message.
//
// Used by all integration test binaries that declare `mod common;`.
#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::sync::{Arc, Mutex};

use dotlink_cli::config::Config;
use dotlink_cli::config::identity::Identity;
use dotlink_cli::config::settings::Settings;
use dotlink_cli::logging::{Log, TaskStatus};
use dotlink_cli::prompt::{Prompt, PromptOption};
use dotlink_cli::tasks::{self, Context, Task};

/// Identity every test repository is keyed on.
pub const USER: &str = "me";
/// Host every test repository is keyed on.
pub const HOST: &str = "box";
/// Manifest name matching [`USER`] and [`HOST`].
pub const MANIFEST: &str = "me@box.config";

/// A [`Prompt`] that answers from a fixed script and remembers each question.
///
/// Running out of answers is reported as a prompt failure, like closed stdin.
pub struct ScriptedPrompt {
    answers: RefCell<VecDeque<String>>,
    asked: Rc<RefCell<Vec<String>>>,
}

impl ScriptedPrompt {
    /// Answer with `answers`, in order.
    pub fn new(answers: &[&str]) -> Self {
        Self {
            answers: RefCell::new(answers.iter().map(|a| (*a).to_string()).collect()),
            asked: Rc::new(RefCell::new(Vec::new())),
        }
    }

    /// Shared view of the questions asked so far.
    pub fn transcript(&self) -> Rc<RefCell<Vec<String>>> {
        Rc::clone(&self.asked)
    }
}

impl Prompt for ScriptedPrompt {
    fn choose(&self, prompt: &str, _message: &str, _options: &[PromptOption]) -> anyhow::Result<String> {
        self.asked.borrow_mut().push(prompt.to_string());
        self.answers
            .borrow_mut()
            .pop_front()
            .ok_or_else(|| anyhow::anyhow!("no scripted answer left"))
    }
}

/// A [`Log`] that keeps every message and task result.
#[derive(Debug, Default)]
pub struct RecordingLog {
    messages: Mutex<Vec<(&'static str, String)>>,
    tasks: Mutex<Vec<(String, TaskStatus)>>,
}

impl RecordingLog {
    fn push(&self, level: &'static str, msg: &str) {
        self.messages
            .lock()
            .expect("log lock")
            .push((level, msg.to_string()));
    }

    /// Messages logged at `level` (`"success"`, `"error"`, ...), in order.
    pub fn at(&self, level: &str) -> Vec<String> {
        self.messages
            .lock()
            .expect("log lock")
            .iter()
            .filter(|(l, _)| *l == level)
            .map(|(_, m)| m.clone())
            .collect()
    }

    /// Whether any message at any level contains `needle`.
    pub fn contains(&self, needle: &str) -> bool {
        self.messages
            .lock()
            .expect("log lock")
            .iter()
            .any(|(_, m)| m.contains(needle))
    }

    /// Recorded task results, in order.
    pub fn tasks(&self) -> Vec<(String, TaskStatus)> {
        self.tasks.lock().expect("log lock").clone()
    }

    /// Status recorded for the task called `name`.
    pub fn status_of(&self, name: &str) -> Option<TaskStatus> {
        self.tasks()
            .into_iter()
            .find(|(n, _)| n == name)
            .map(|(_, s)| s)
    }
}

impl Log for RecordingLog {
    fn stage(&self, msg: &str) {
        self.push("stage", msg);
    }
    fn info(&self, msg: &str) {
        self.push("info", msg);
    }
    fn success(&self, msg: &str) {
        self.push("success", msg);
    }
    fn debug(&self, msg: &str) {
        self.push("debug", msg);
    }
    fn warn(&self, msg: &str) {
        self.push("warn", msg);
    }
    fn error(&self, msg: &str) {
        self.push("error", msg);
    }
    fn dry_run(&self, msg: &str) {
        self.push("dry_run", msg);
    }
    fn record_task(&self, name: &str, status: TaskStatus, _message: Option<&str>) {
        self.tasks
            .lock()
            .expect("log lock")
            .push((name.to_string(), status));
    }
}

/// An isolated repository and home backed by a [`tempfile::TempDir`].
pub struct TestRepo {
    _dir: tempfile::TempDir,
    base: PathBuf,
}

impl TestRepo {
    /// Create `repo/config`, `repo/dotfiles` and `home`.
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("create temp dir");
        let base = dunce::canonicalize(dir.path()).expect("canonical temp dir");
        for sub in ["repo/config", "repo/dotfiles", "home"] {
            std::fs::create_dir_all(base.join(sub)).expect("create layout");
        }
        Self { _dir: dir, base }
    }

    /// Repository root.
    pub fn root(&self) -> PathBuf {
        self.base.join("repo")
    }

    /// Fake home directory.
    pub fn home(&self) -> PathBuf {
        self.base.join("home")
    }

    /// Payload file `rel` under `dotfiles/`.
    pub fn payload(&self, rel: &str) -> PathBuf {
        self.root().join("dotfiles").join(rel)
    }

    fn write(path: &Path, content: &str) {
        std::fs::create_dir_all(path.parent().expect("parent")).expect("create parent");
        std::fs::write(path, content).expect("write file");
    }

    /// Add a payload file under `dotfiles/`.
    pub fn with_payload(self, rel: &str, content: &str) -> Self {
        Self::write(&self.payload(rel), content);
        self
    }

    /// Add a payload directory under `dotfiles/`.
    pub fn with_payload_dir(self, rel: &str) -> Self {
        std::fs::create_dir_all(self.payload(rel)).expect("create payload dir");
        self
    }

    /// Add a manifest (or any file) under `config/`.
    pub fn with_manifest(self, rel: &str, content: &str) -> Self {
        Self::write(&self.root().join("config").join(rel), content);
        self
    }

    /// Add a file to the fake home.
    pub fn with_home_file(self, rel: &str, content: &str) -> Self {
        Self::write(&self.home().join(rel), content);
        self
    }

    /// Add `dotlink.toml` at the repository root.
    pub fn with_settings(self, content: &str) -> Self {
        Self::write(&self.root().join("dotlink.toml"), content);
        self
    }

    /// Configuration for identity `me@box`, honouring `dotlink.toml` if present.
    pub fn config(&self) -> Config {
        let settings = Settings::load(&self.root()).expect("load settings");
        Config::from_settings(
            &self.root(),
            &self.home(),
            Identity::new(USER, HOST),
            &settings,
        )
    }

    /// Build a run context.
    pub fn context(&self, prompt: ScriptedPrompt, dry_run: bool) -> (Context, Arc<RecordingLog>) {
        let log = Arc::new(RecordingLog::default());
        let ctx = Context::new(
            self.config(),
            Arc::clone(&log) as Arc<dyn Log>,
            dry_run,
            Box::new(prompt),
        );
        (ctx, log)
    }

    /// Whether `rel` in the fake home is a symlink to `target`.
    pub fn links_to(&self, rel: &str, target: &Path) -> bool {
        std::fs::read_link(self.home().join(rel)).is_ok_and(|t| t == target)
    }
}

/// Execute `tasks` in order, stopping at the first fatal error.
pub fn run_tasks(tasks: &[Box<dyn Task>], ctx: &Context) -> anyhow::Result<()> {
    for task in tasks {
        tasks::execute(task.as_ref(), ctx)?;
    }
    Ok(())
}
