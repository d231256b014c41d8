// ABOUTME: Integration tests for the stolos CLI commands.
// ABOUTME: Validates help output, init behavior, argument validation, and locking.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;

use stolos::fleet::LockInfo;

fn stolos_cmd() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("stolos"))
}

/// Write a minimal configuration into the given directory.
fn write_config(dir: &Path) {
    fs::write(dir.join("stolos.yml"), "prefix: stolos\n").unwrap();
}

#[test]
fn help_shows_commands() {
    stolos_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("init"))
        .stdout(predicate::str::contains("fleet"))
        .stdout(predicate::str::contains("maintain"))
        .stdout(predicate::str::contains("members"));
}

#[test]
fn init_creates_config_file() {
    let temp_dir = tempfile::tempdir().unwrap();
    let config_path = temp_dir.path().join("stolos.yml");

    stolos_cmd()
        .current_dir(temp_dir.path())
        .arg("init")
        .assert()
        .success();

    assert!(config_path.exists(), "stolos.yml should be created");
    let content = fs::read_to_string(&config_path).unwrap();
    assert!(content.contains("prefix:"), "Config should have prefix field");
}

#[test]
fn init_refuses_to_overwrite_existing_config() {
    let temp_dir = tempfile::tempdir().unwrap();
    let config_path = temp_dir.path().join("stolos.yml");

    fs::write(&config_path, "existing: config").unwrap();

    stolos_cmd()
        .current_dir(temp_dir.path())
        .arg("init")
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn init_force_overwrites_existing_config() {
    let temp_dir = tempfile::tempdir().unwrap();
    let config_path = temp_dir.path().join("stolos.yml");

    fs::write(&config_path, "existing: config").unwrap();

    stolos_cmd()
        .current_dir(temp_dir.path())
        .args(["init", "--prefix", "myfleet", "--force"])
        .assert()
        .success();

    let content = fs::read_to_string(&config_path).unwrap();
    assert!(content.contains("prefix: myfleet"));
}

#[test]
fn init_rejects_invalid_prefix() {
    let temp_dir = tempfile::tempdir().unwrap();

    stolos_cmd()
        .current_dir(temp_dir.path())
        .args(["init", "--prefix", "Bad_Prefix"])
        .assert()
        .failure();
}

#[test]
fn maintain_rejects_negative_counts() {
    stolos_cmd()
        .args(["maintain", "--", "-1", "2"])
        .assert()
        .failure();
}

#[test]
fn maintain_rejects_non_integer_counts() {
    stolos_cmd()
        .args(["maintain", "two", "3"])
        .assert()
        .failure();
}

#[test]
fn fleet_requires_both_counts() {
    stolos_cmd().args(["fleet", "1"]).assert().failure();
}

#[test]
fn maintain_without_config_fails() {
    let temp_dir = tempfile::tempdir().unwrap();

    stolos_cmd()
        .current_dir(temp_dir.path())
        .env("HOME", temp_dir.path())
        .args(["maintain", "1", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("configuration file not found"));
}

#[test]
fn maintain_of_empty_topology_succeeds() {
    let temp_dir = tempfile::tempdir().unwrap();
    write_config(temp_dir.path());

    stolos_cmd()
        .current_dir(temp_dir.path())
        .env("HOME", temp_dir.path())
        .args(["maintain", "0", "0"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Fleet reconciled"));
}

#[test]
fn maintain_emits_json_events_when_asked() {
    let temp_dir = tempfile::tempdir().unwrap();
    write_config(temp_dir.path());

    stolos_cmd()
        .current_dir(temp_dir.path())
        .env("HOME", temp_dir.path())
        .args(["maintain", "0", "0", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"event\":\"success\""));
}

#[test]
fn maintain_respects_a_held_lock() {
    let temp_dir = tempfile::tempdir().unwrap();
    write_config(temp_dir.path());

    let state_dir = temp_dir.path().join(".local/state/stolos");
    fs::create_dir_all(&state_dir).unwrap();
    let info = LockInfo {
        holder: "other-host".to_string(),
        pid: 12345,
        started_at: chrono::Utc::now(),
        prefix: "stolos".to_string(),
    };
    fs::write(
        state_dir.join("stolos.lock"),
        serde_json::to_string(&info).unwrap(),
    )
    .unwrap();

    stolos_cmd()
        .current_dir(temp_dir.path())
        .env("HOME", temp_dir.path())
        .args(["maintain", "0", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("held by"));
}

#[test]
fn force_breaks_a_held_lock() {
    let temp_dir = tempfile::tempdir().unwrap();
    write_config(temp_dir.path());

    let state_dir = temp_dir.path().join(".local/state/stolos");
    fs::create_dir_all(&state_dir).unwrap();
    let info = LockInfo {
        holder: "other-host".to_string(),
        pid: 12345,
        started_at: chrono::Utc::now(),
        prefix: "stolos".to_string(),
    };
    fs::write(
        state_dir.join("stolos.lock"),
        serde_json::to_string(&info).unwrap(),
    )
    .unwrap();

    stolos_cmd()
        .current_dir(temp_dir.path())
        .env("HOME", temp_dir.path())
        .args(["maintain", "0", "0", "--force"])
        .assert()
        .success();
}

#[test]
fn version_flag_prints_version() {
    stolos_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("stolos"));
}
