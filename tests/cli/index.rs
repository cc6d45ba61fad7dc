use crate::support::{init_project, logbook, run_json, store_root};
use predicates::prelude::*;
use std::fs;

// ============================================================================
// Index maintenance
// ============================================================================

#[test]
fn test_rebuild_reports_counts() {
    let dir = init_project();
    run_json(dir.path(), &["session", "new", "One"]);
    run_json(dir.path(), &["task", "new", "Two"]);
    run_json(dir.path(), &["task", "new", "Three", "--status", "done"]);

    let report = run_json(dir.path(), &["index", "rebuild"]);
    assert_eq!(report["sessions_indexed"], 1);
    assert_eq!(report["tasks_indexed"], 2);
    assert_eq!(report["skipped"], 0);

    logbook()
        .current_dir(dir.path())
        .args(["index", "rebuild"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Indexed 1 session(s) and 2 task(s)"));
}

#[test]
fn test_rebuild_is_byte_identical() {
    let dir = init_project();
    run_json(dir.path(), &["session", "new", "Alpha", "--tag", "a"]);
    run_json(dir.path(), &["task", "new", "Beta"]);
    let index = store_root(dir.path()).join("index");

    run_json(dir.path(), &["index", "rebuild"]);
    let sessions = fs::read(index.join("sessions.jsonl")).unwrap();
    let tasks = fs::read(index.join("tasks.jsonl")).unwrap();

    run_json(dir.path(), &["index", "rebuild"]);
    assert_eq!(fs::read(index.join("sessions.jsonl")).unwrap(), sessions);
    assert_eq!(fs::read(index.join("tasks.jsonl")).unwrap(), tasks);
}

#[test]
fn test_missing_index_is_rebuilt_for_listing() {
    let dir = init_project();
    run_json(dir.path(), &["task", "new", "Present"]);
    let index = store_root(dir.path()).join("index/tasks.jsonl");
    fs::remove_file(&index).unwrap();

    let listed = run_json(dir.path(), &["task", "list"]);
    assert_eq!(listed.as_array().unwrap().len(), 1);
    assert!(index.is_file());
}

#[test]
fn test_corrupt_index_line_keeps_earlier_records() {
    let dir = init_project();
    run_json(dir.path(), &["session", "new", "Before"]);
    let index = store_root(dir.path()).join("index/sessions.jsonl");
    let mut content = fs::read_to_string(&index).unwrap();
    content.push_str("{ this is not json\n");
    fs::write(&index, content).unwrap();

    let listed = run_json(dir.path(), &["session", "list"]);
    assert_eq!(listed.as_array().unwrap().len(), 1);
}
