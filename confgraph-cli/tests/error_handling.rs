//! Integration tests for error handling and exit codes.
//!
//! These tests verify that confgraph returns appropriate exit codes:
//! - Exit code 0: Success
//! - Exit code 1: Semantic failure (expression does not evaluate)
//! - Exit code 2: Usage error reported by clap
//! - Exit code 4: Invalid arguments
//! - Exit code 5: I/O error
//! - Exit code 7: Configuration error

mod common;

use common::{TestEnv, VALID_DOCUMENT};
use predicates::prelude::*;

// ============================================================================
// Success Cases (Exit Code 0)
// ============================================================================

#[test]
fn test_success_exit_code() {
    let env = TestEnv::new();
    let conf = env.document(VALID_DOCUMENT);
    env.command().arg("check").arg(&conf).assert().code(0);
}

// ============================================================================
// Semantic Failures (Exit Code 1)
// ============================================================================

#[test]
fn test_eval_unknown_name() {
    let env = TestEnv::new();
    env.command()
        .args(["eval", "undefined_name + 1"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("name 'undefined_name' is not defined"));
}

#[test]
fn test_eval_division_by_zero() {
    let env = TestEnv::new();
    env.command()
        .args(["eval", "1 / 0"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("division by zero"));
}

// ============================================================================
// Usage Errors (Exit Code 2)
// ============================================================================

#[test]
fn test_unknown_subcommand() {
    let env = TestEnv::new();
    env.command().arg("reserve").assert().code(2);
}

#[test]
fn test_malformed_define() {
    let env = TestEnv::new();
    env.command()
        .args(["eval", "1", "--define", "oops"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("NAME=EXPR"));
}

// ============================================================================
// Invalid Arguments (Exit Code 4)
// ============================================================================

#[test]
fn test_missing_document() {
    let env = TestEnv::new();
    env.command()
        .arg("check")
        .arg(env.path().join("absent.toml"))
        .assert()
        .code(4)
        .stderr(predicate::str::contains("File not found"));
}

#[test]
fn test_reserved_define_name() {
    let env = TestEnv::new();
    env.command()
        .args(["eval", "1", "-D", "children=2"])
        .assert()
        .code(4);
}

// ============================================================================
// Configuration Errors (Exit Code 7)
// ============================================================================

#[test]
fn test_missing_problem_section() {
    let env = TestEnv::new();
    let conf = env.document("input_file = \"inputs.yaml\"\n");
    env.command()
        .arg("check")
        .arg(&conf)
        .assert()
        .code(7)
        .stderr(predicate::str::contains("[problem] is missing"));
}

#[test]
fn test_unrecognized_attribute_reports_full_key() {
    let env = TestEnv::new();
    let conf = env.document("[problem.wing.aero]\ncl = \"bad_expr(\"\n");
    env.command()
        .arg("check")
        .arg(&conf)
        .assert()
        .code(7)
        .stderr(predicate::str::contains(
            "attribute or value not recognized: problem.wing.aero.cl = \"bad_expr(\"",
        ));
}

#[test]
fn test_unknown_component() {
    let env = TestEnv::new();
    let conf = env.document("module_folders = [\"modules\"]\n[problem.c]\nid = \"nope\"\n");
    env.command().arg("check").arg(&conf).assert().code(7);
}

#[test]
fn test_malformed_document() {
    let env = TestEnv::new();
    let conf = env.document("[problem\n");
    env.command().arg("check").arg(&conf).assert().code(7);
}

// ============================================================================
// I/O Errors (Exit Code 5)
// ============================================================================

#[test]
fn test_unwritable_input_file() {
    let env = TestEnv::new();
    let conf = env.document(VALID_DOCUMENT);
    // A directory where the input file should go
    std::fs::create_dir_all(env.path().join("data/inputs.yaml")).unwrap();

    env.command().arg("write-inputs").arg(&conf).assert().code(5);
}
