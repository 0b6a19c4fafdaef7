//! Binary-level CLI tests
//!
//! These exercise argument handling and the non-network command paths.

use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn help_lists_commands() {
    Command::cargo_bin("zauth")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("auth"))
        .stdout(predicate::str::contains("status"));
}

#[test]
fn no_command_fails_with_usage() {
    Command::cargo_bin("zauth")
        .unwrap()
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn auth_unknown_provider_fails() {
    Command::cargo_bin("zauth")
        .unwrap()
        .args(["auth", "--provider", "nope"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unsupported provider"));
}

#[test]
fn auth_google_prints_guidance() {
    Command::cargo_bin("zauth")
        .unwrap()
        .args(["auth", "--provider", "google"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "gcloud auth application-default login",
        ))
        .stdout(predicate::str::contains("GOOGLE_API_KEY"));
}

#[test]
fn status_unknown_provider_fails() {
    Command::cargo_bin("zauth")
        .unwrap()
        .args(["status", "--provider", "nope"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unsupported provider"));
}
