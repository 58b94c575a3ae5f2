//! Integration tests for global options.

mod common;

use common::{TestEnv, VALID_DOCUMENT};
use predicates::prelude::*;

#[test]
fn test_version() {
    let env = TestEnv::new();
    env.command()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("confgraph"));
}

#[test]
fn test_help_lists_commands() {
    let env = TestEnv::new();
    let assert = env.command().arg("--help").assert().success();
    for command in ["check", "tree", "components", "write-inputs", "eval", "completions"] {
        assert_eq_contains(&assert.get_output().stdout, command);
    }
}

fn assert_eq_contains(stdout: &[u8], needle: &str) {
    let text = String::from_utf8_lossy(stdout);
    assert!(text.contains(needle), "missing {needle} in:\n{text}");
}

#[test]
fn test_verbose_logs_debug_events() {
    let env = TestEnv::new();
    let conf = env.document(VALID_DOCUMENT);
    env.command()
        .arg("--verbose")
        .arg("check")
        .arg(&conf)
        .assert()
        .success()
        .stderr(predicate::str::contains("Adding group 'mygroup'"));
}

#[test]
fn test_quiet_suppresses_warnings() {
    let env = TestEnv::new();
    let conf = env.document("module_folders = [\"nowhere\"]\n[problem.g]\nx = 1\n");
    env.command()
        .arg("--quiet")
        .arg("check")
        .arg(&conf)
        .assert()
        .success()
        .stderr(predicate::str::contains("SKIPPED").not());
}

#[test]
fn test_log_mode_from_environment() {
    let env = TestEnv::new();
    let conf = env.document(VALID_DOCUMENT);
    env.command()
        .env("CONFGRAPH_LOG_MODE", "verbose")
        .arg("check")
        .arg(&conf)
        .assert()
        .success()
        .stderr(predicate::str::contains("Adding group 'mygroup'"));
}
