#![allow(
    clippy::expect_used,
    clippy::unwrap_used,
    clippy::wildcard_imports,
    clippy::indexing_slicing
)]
//! Integration tests for the default mode: link the repository, then apply
//! every manifest discovered for the current identity.

mod common;

use common::*;
use dotlink_cli::error::ConflictError;
use dotlink_cli::logging::TaskStatus;
use dotlink_cli::tasks;

// ---------------------------------------------------------------------------
// Task list
// ---------------------------------------------------------------------------

#[test]
fn install_task_names() {
    let all_tasks = tasks::install_tasks();
    let names: Vec<&str> = all_tasks.iter().map(|t| t.name()).collect();
    insta::assert_snapshot!(names.join("\n"), @r"
    Link repository
    Apply manifests
    ");
}

// ---------------------------------------------------------------------------
// Linking
// ---------------------------------------------------------------------------

#[test]
fn links_repository_and_manifest_entries() {
    let repo = TestRepo::new()
        .with_payload("bashrc", "# bash")
        .with_payload_dir("nvim")
        .with_manifest(MANIFEST, "~/.bashrc bashrc\n~/.config/nvim nvim\n");
    let (ctx, log) = repo.context(ScriptedPrompt::new(&[]), false);

    run_tasks(&tasks::install_tasks(), &ctx).unwrap();

    assert!(repo.links_to(".dotfiles", &repo.root()));
    assert!(repo.links_to(".bashrc", &repo.payload("bashrc")));
    assert!(repo.links_to(".config/nvim", &repo.payload("nvim")));
    assert_eq!(
        log.tasks(),
        vec![
            ("Link repository".to_string(), TaskStatus::Ok),
            ("Apply manifests".to_string(), TaskStatus::Ok),
        ]
    );
}

#[test]
fn second_run_is_idempotent() {
    let repo = TestRepo::new()
        .with_payload("bashrc", "")
        .with_payload("vimrc", "")
        .with_manifest(MANIFEST, "~/.bashrc bashrc\n~/.vimrc vimrc\n");

    let (ctx, _) = repo.context(ScriptedPrompt::new(&[]), false);
    run_tasks(&tasks::install_tasks(), &ctx).unwrap();

    let prompt = ScriptedPrompt::new(&[]);
    let asked = prompt.transcript();
    let (ctx, log) = repo.context(prompt, false);
    run_tasks(&tasks::install_tasks(), &ctx).unwrap();

    let successes = log.at("success");
    assert_eq!(successes.len(), 3);
    assert!(successes.iter().all(|m| m.starts_with("already linked")));
    assert!(asked.borrow().is_empty());
}

#[test]
fn overwrite_all_answer_applies_to_later_conflicts() {
    let repo = TestRepo::new()
        .with_payload("a", "repo")
        .with_payload("b", "repo")
        .with_payload("c", "repo")
        .with_home_file(".a", "local")
        .with_home_file(".b", "local")
        .with_home_file(".c", "local")
        .with_manifest(MANIFEST, "~/.a a\n~/.b b\n~/.c c\n");
    let prompt = ScriptedPrompt::new(&["O"]);
    let asked = prompt.transcript();
    let (ctx, log) = repo.context(prompt, false);

    run_tasks(&tasks::install_tasks(), &ctx).unwrap();

    assert_eq!(asked.borrow().len(), 1);
    assert!(asked.borrow()[0].contains(".a"));
    for name in ["a", "b", "c"] {
        assert!(repo.links_to(&format!(".{name}"), &repo.payload(name)));
    }
    assert_eq!(log.status_of("Apply manifests"), Some(TaskStatus::Ok));
}

#[test]
fn skip_all_leaves_every_conflict_alone() {
    let repo = TestRepo::new()
        .with_payload("a", "")
        .with_payload("b", "")
        .with_home_file(".a", "local a")
        .with_home_file(".b", "local b")
        .with_manifest(MANIFEST, "~/.a a\n~/.b b\n");
    let prompt = ScriptedPrompt::new(&["S"]);
    let asked = prompt.transcript();
    let (ctx, _log) = repo.context(prompt, false);

    run_tasks(&tasks::install_tasks(), &ctx).unwrap();

    assert_eq!(asked.borrow().len(), 1);
    assert_eq!(std::fs::read_to_string(repo.home().join(".a")).unwrap(), "local a");
    assert_eq!(std::fs::read_to_string(repo.home().join(".b")).unwrap(), "local b");
}

#[test]
fn preset_backup_from_settings_never_prompts() {
    let repo = TestRepo::new()
        .with_settings("on_conflict = \"backup\"\n")
        .with_payload("gitconfig", "repo")
        .with_home_file(".gitconfig", "local")
        .with_manifest(MANIFEST, "~/.gitconfig gitconfig\n");
    let prompt = ScriptedPrompt::new(&[]);
    let asked = prompt.transcript();
    let (ctx, _log) = repo.context(prompt, false);

    run_tasks(&tasks::install_tasks(), &ctx).unwrap();

    assert!(asked.borrow().is_empty());
    assert!(repo.links_to(".gitconfig", &repo.payload("gitconfig")));
    assert_eq!(
        std::fs::read_to_string(repo.home().join(".gitconfig.backup")).unwrap(),
        "local"
    );
}

#[test]
fn links_are_applied_before_included_manifests() {
    let repo = TestRepo::new()
        .with_payload("first", "")
        .with_payload("second", "")
        .with_manifest("shared/second.links", "~/.second second\n")
        .with_manifest(MANIFEST, "include shared/second.links\n~/.first first\n");
    let (ctx, log) = repo.context(ScriptedPrompt::new(&[]), false);

    run_tasks(&tasks::install_tasks(), &ctx).unwrap();

    let successes = log.at("success");
    let first = successes.iter().position(|m| m.contains(".first")).unwrap();
    let second = successes.iter().position(|m| m.contains(".second")).unwrap();
    assert!(first < second);
}

#[test]
fn discovers_nested_manifests_for_this_identity_only() {
    let repo = TestRepo::new()
        .with_payload("a", "")
        .with_payload("b", "")
        .with_payload("c", "")
        .with_manifest(&format!("work/{MANIFEST}"), "~/.b b\n")
        .with_manifest(&format!("home/{MANIFEST}"), "~/.a a\n")
        .with_manifest("home/someone@box.config", "~/.c c\n");
    let (ctx, log) = repo.context(ScriptedPrompt::new(&[]), false);

    run_tasks(&tasks::install_tasks(), &ctx).unwrap();

    assert!(repo.links_to(".a", &repo.payload("a")));
    assert!(repo.links_to(".b", &repo.payload("b")));
    assert!(!repo.home().join(".c").exists());
    let manifests: Vec<String> = log
        .at("info")
        .into_iter()
        .filter(|m| m.starts_with("manifest: "))
        .collect();
    assert_eq!(manifests.len(), 2);
    assert!(manifests[0].contains("home"), "sorted by path: {manifests:?}");
}

#[test]
fn no_manifest_for_identity_is_skipped() {
    let repo = TestRepo::new().with_manifest("other@host.config", "~/.a a\n");
    let (ctx, log) = repo.context(ScriptedPrompt::new(&[]), false);

    run_tasks(&tasks::install_tasks(), &ctx).unwrap();

    assert_eq!(log.status_of("Apply manifests"), Some(TaskStatus::Skipped));
}

// ---------------------------------------------------------------------------
// Error handling
// ---------------------------------------------------------------------------

#[test]
fn missing_source_is_reported_and_processing_continues() {
    let repo = TestRepo::new()
        .with_payload("present", "")
        .with_manifest(MANIFEST, "~/.absent absent\n~/.present present\n");
    let (ctx, log) = repo.context(ScriptedPrompt::new(&[]), false);

    run_tasks(&tasks::install_tasks(), &ctx).unwrap();

    assert!(!repo.home().join(".absent").exists());
    assert!(repo.links_to(".present", &repo.payload("present")));
    assert!(log.at("error").iter().any(|m| m.starts_with("source missing")));
    assert_eq!(log.status_of("Apply manifests"), Some(TaskStatus::Failed));
}

#[test]
fn self_link_is_reported_and_left_alone() {
    let repo = TestRepo::new().with_payload("profile", "keep");
    let source = repo.payload("profile");
    let escaped = source.display().to_string().replace(' ', "\\ ");
    let repo = repo.with_manifest(MANIFEST, &format!("{escaped} profile\n"));
    let (ctx, log) = repo.context(ScriptedPrompt::new(&[]), false);

    run_tasks(&tasks::install_tasks(), &ctx).unwrap();

    assert!(log.at("error").iter().any(|m| m.starts_with("cannot link to self")));
    assert_eq!(std::fs::read_to_string(&source).unwrap(), "keep");
}

#[test]
fn malformed_lines_warn_and_later_lines_still_apply() {
    let repo = TestRepo::new()
        .with_payload("ok", "")
        .with_manifest(MANIFEST, "~/.bad one two\n~/.ok ok\n");
    let (ctx, log) = repo.context(ScriptedPrompt::new(&[]), false);

    run_tasks(&tasks::install_tasks(), &ctx).unwrap();

    assert_eq!(log.at("warn").len(), 1);
    assert!(repo.links_to(".ok", &repo.payload("ok")));
}

#[test]
fn invalid_answer_stops_the_run() {
    let repo = TestRepo::new()
        .with_payload("a", "")
        .with_payload("b", "")
        .with_home_file(".a", "local")
        .with_manifest(MANIFEST, "~/.a a\n~/.b b\n");
    let (ctx, log) = repo.context(ScriptedPrompt::new(&["yes"]), false);

    let err = run_tasks(&tasks::install_tasks(), &ctx).unwrap_err();

    assert!(err.downcast_ref::<ConflictError>().is_some());
    assert!(!repo.home().join(".b").exists());
    assert!(repo.links_to(".dotfiles", &repo.root()), "earlier links remain");
    assert_eq!(log.status_of("Apply manifests"), Some(TaskStatus::Failed));
}

#[test]
fn closed_input_stops_the_run() {
    let repo = TestRepo::new()
        .with_payload("a", "")
        .with_home_file(".a", "local")
        .with_manifest(MANIFEST, "~/.a a\n");
    let (ctx, _log) = repo.context(ScriptedPrompt::new(&[]), false);

    let err = run_tasks(&tasks::install_tasks(), &ctx).unwrap_err();
    assert!(err.to_string().contains("no scripted answer left"));
}

// ---------------------------------------------------------------------------
// Dry run
// ---------------------------------------------------------------------------

#[test]
fn dry_run_changes_nothing() {
    let repo = TestRepo::new()
        .with_payload("a", "")
        .with_payload("b", "")
        .with_home_file(".b", "local")
        .with_manifest(MANIFEST, "~/.config/a a\n~/.b b\n");
    let prompt = ScriptedPrompt::new(&[]);
    let asked = prompt.transcript();
    let (ctx, log) = repo.context(prompt, true);

    run_tasks(&tasks::install_tasks(), &ctx).unwrap();

    assert!(asked.borrow().is_empty());
    assert!(!repo.home().join(".dotfiles").exists());
    assert!(!repo.home().join(".config").exists());
    assert_eq!(std::fs::read_to_string(repo.home().join(".b")).unwrap(), "local");
    assert!(log.at("dry_run").iter().any(|m| m.starts_with("would ask")));
    assert_eq!(log.status_of("Apply manifests"), Some(TaskStatus::DryRun));
}
