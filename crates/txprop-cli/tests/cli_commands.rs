use assert_cmd::Command;
use predicates::prelude::*;

fn base_cmd() -> Command {
    let mut cmd = Command::cargo_bin("txprop").expect("txprop binary");
    cmd.env_remove("RUST_LOG");
    cmd
}

#[test]
fn help_lists_commands() {
    base_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("migrate"))
        .stdout(predicate::str::contains("run"))
        .stdout(predicate::str::contains("list"))
        .stdout(predicate::str::contains("reset"));
}

#[test]
fn run_help_documents_inner_call() {
    base_cmd()
        .args(["run", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--inner"))
        .stdout(predicate::str::contains("--no-fault"));
}

#[test]
fn unknown_inner_call_is_rejected() {
    base_cmd()
        .args(["run", "--inner", "proxy"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid inner_call value: proxy"));
}

#[test]
fn missing_command_is_rejected() {
    base_cmd().assert().failure();
}
