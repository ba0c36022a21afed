// ABOUTME: Integration tests for the paulenv CLI surface.
// ABOUTME: Validates --help output and argument errors without a container engine.

use assert_cmd::Command;
use predicates::prelude::*;

fn paulenv_cmd() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("paulenv"))
}

#[test]
fn help_shows_commands() {
    paulenv_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("info"))
        .stdout(predicate::str::contains("list"))
        .stdout(predicate::str::contains("build"))
        .stdout(predicate::str::contains("join"))
        .stdout(predicate::str::contains("prune"));
}

#[test]
fn list_requires_a_resource_kind() {
    paulenv_cmd()
        .args(["list", "pods"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid value"));
}

#[test]
fn build_requires_project_files() {
    paulenv_cmd()
        .args(["build", "--project", "web"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--compose-file"));
}

#[test]
fn unknown_engine_flag_is_rejected() {
    paulenv_cmd()
        .args(["--engine", "lxc", "info"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("lxc"));
}

#[test]
fn missing_config_file_is_reported() {
    let temp_dir = tempfile::tempdir().unwrap();
    let missing = temp_dir.path().join("absent.yml");

    paulenv_cmd()
        .arg("--config")
        .arg(&missing)
        .arg("info")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error: configuration file not found"));
}

#[test]
fn invalid_engine_env_is_reported() {
    let temp_dir = tempfile::tempdir().unwrap();

    paulenv_cmd()
        .current_dir(temp_dir.path())
        .env("PAULENV_ENGINE", "lxc")
        .arg("info")
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid configuration"));
}
