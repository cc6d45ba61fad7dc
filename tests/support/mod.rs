#![allow(dead_code)]

use assert_cmd::{cargo::cargo_bin_cmd, Command};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Output;
use tempfile::TempDir;

/// Get a Command for logbook
pub fn logbook() -> Command {
    cargo_bin_cmd!("logbook")
}

/// Temporary project directory with an initialized store
pub fn init_project() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    logbook()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success();
    dir
}

/// Store root inside a project directory
pub fn store_root(project: &Path) -> PathBuf {
    project.join(".logbook")
}

/// Parse stdout as JSON
pub fn json_stdout(output: &Output) -> serde_json::Value {
    serde_json::from_slice(&output.stdout).expect("stdout should be JSON")
}

/// Run a command with `--format json` and parse its stdout
pub fn run_json(project: &Path, args: &[&str]) -> serde_json::Value {
    let output = logbook()
        .current_dir(project)
        .args(["--format", "json"])
        .args(args)
        .output()
        .unwrap();
    assert!(
        output.status.success(),
        "command {:?} failed: {}",
        args,
        String::from_utf8_lossy(&output.stderr)
    );
    json_stdout(&output)
}

/// Write a raw session document into the active sessions directory
pub fn write_session(project: &Path, filename: &str, frontmatter: &str, body: &str) -> PathBuf {
    let path = store_root(project).join("sessions").join(filename);
    fs::write(&path, format!("---\n{}---\n\n{}", frontmatter, body)).unwrap();
    path
}
