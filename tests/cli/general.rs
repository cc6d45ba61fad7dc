use crate::support::{init_project, logbook, store_root};
use predicates::prelude::*;
use tempfile::tempdir;

// ============================================================================
// Help, version and init
// ============================================================================

#[test]
fn test_help_flag() {
    logbook()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage: logbook"))
        .stdout(predicate::str::contains("session"))
        .stdout(predicate::str::contains("task"))
        .stdout(predicate::str::contains("gc"));
}

#[test]
fn test_version_flag() {
    logbook()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("logbook"));
}

#[test]
fn test_no_command_prints_banner() {
    logbook()
        .assert()
        .success()
        .stdout(predicate::str::contains("logbook --help"));
}

#[test]
fn test_init_creates_layout() {
    let dir = tempdir().unwrap();

    logbook()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Initialized logbook store"));

    let root = store_root(dir.path());
    for sub in [
        "sessions",
        "sessions/archive",
        "tasks/open",
        "tasks/in_progress",
        "tasks/done",
        "tasks/cancelled",
        "index",
    ] {
        assert!(root.join(sub).is_dir(), "missing {sub}");
    }
    assert!(root.join("config.json").is_file());
}

#[test]
fn test_init_with_explicit_store() {
    let dir = tempdir().unwrap();

    logbook()
        .current_dir(dir.path())
        .args(["--store", "notes/log", "init"])
        .assert()
        .success();
    assert!(dir.path().join("notes/log/tasks/done").is_dir());

    logbook()
        .current_dir(dir.path())
        .args(["--store", "notes/log", "task", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No tasks"));
}

#[test]
fn test_store_discovered_from_subdirectory() {
    let dir = init_project();
    let nested = dir.path().join("src/deep");
    std::fs::create_dir_all(&nested).unwrap();

    logbook()
        .current_dir(&nested)
        .args(["session", "list"])
        .assert()
        .success();
}

#[test]
fn test_missing_store_is_data_error() {
    let dir = tempdir().unwrap();

    logbook()
        .current_dir(dir.path())
        .args(["session", "list"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("store not found"));
}

#[test]
fn test_json_error_envelope() {
    let dir = tempdir().unwrap();

    logbook()
        .current_dir(dir.path())
        .args(["--format", "json", "session", "list"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("\"type\":\"store_not_found\""));
}

#[test]
fn test_json_usage_error_from_clap() {
    logbook()
        .args(["--format", "json", "task", "new", "x", "--status", "someday"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("usage_error"));
}
