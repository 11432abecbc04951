// Command line surface of the sprint-health binary

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

#[test]
fn test_help_lists_commands() {
    let mut cmd = Command::cargo_bin("sprint-health").unwrap();

    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("run"))
        .stdout(predicate::str::contains("once"))
        .stdout(predicate::str::contains("webhook"))
        .stdout(predicate::str::contains("config"));
}

#[test]
fn test_once_without_credentials_asks_for_fields() {
    let dir = TempDir::new().unwrap();
    let mut cmd = Command::cargo_bin("sprint-health").unwrap();

    cmd.current_dir(dir.path())
        .env_remove("JIRA_API_TOKEN")
        .env("SPRINT_HEALTH__OBSERVABILITY__JSON_LOGS", "false")
        .arg("once")
        .assert()
        .failure()
        .stdout(predicate::str::contains("Please fill in all fields to get started"))
        .stdout(predicate::str::contains("tracker.base_url"));
}

#[test]
fn test_config_init_writes_file() {
    let dir = TempDir::new().unwrap();
    let mut cmd = Command::cargo_bin("sprint-health").unwrap();

    cmd.current_dir(dir.path())
        .args(["config", "init"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Wrote sprint-health.toml"));

    assert!(dir.path().join("sprint-health.toml").exists());
}
