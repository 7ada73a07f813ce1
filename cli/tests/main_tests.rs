//! # WizGen CLI Main Integration Tests
//!
//! File: cli/tests/main_tests.rs
//!
//! Top-level behavior of the `wizgen` binary: standard flags, help output,
//! and argument errors.
//!

mod common;
use common::*;
use predicates::prelude::*;

#[test]
fn test_version_flag() {
    wizgen_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_help_lists_project_group() {
    wizgen_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("project"));
}

#[test]
fn test_project_help_lists_subcommands() {
    wizgen_cmd()
        .args(["project", "--help"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("new")
                .and(predicate::str::contains("config"))
                .and(predicate::str::contains("list")),
        );
}

#[test]
fn test_missing_subcommand_fails() {
    wizgen_cmd().assert().failure();
}

#[test]
fn test_unknown_kind_is_rejected() {
    wizgen_cmd()
        .args(["project", "new", "x", "--kind", "applet"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown project kind 'applet'"));
}
