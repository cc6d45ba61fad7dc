use crate::support::{init_project, logbook, run_json, store_root};
use predicates::prelude::*;
use std::fs;

// ============================================================================
// Task commands
// ============================================================================

#[test]
fn test_new_defaults_to_open() {
    let dir = init_project();

    let created = run_json(dir.path(), &["task", "new", "Fix login", "--tag", "auth"]);
    assert!(created["id"].as_str().unwrap().starts_with("task-"));
    assert_eq!(created["status"], "open");

    let filename = created["filename"].as_str().unwrap();
    assert!(store_root(dir.path()).join("tasks/open").join(filename).is_file());

    let shown = run_json(dir.path(), &["task", "show", "fix login"]);
    assert_eq!(shown["priority"], "medium");
    assert_eq!(shown["tags"], serde_json::json!(["auth"]));
}

#[test]
fn test_status_change_moves_file_and_keeps_body() {
    let dir = init_project();
    let created = run_json(
        dir.path(),
        &["task", "new", "Ship it", "--body", "## Description\n\nKeep this text.\n"],
    );
    let filename = created["filename"].as_str().unwrap().to_string();
    let tasks = store_root(dir.path()).join("tasks");
    let before = fs::read_to_string(tasks.join("open").join(&filename)).unwrap();

    logbook()
        .current_dir(dir.path())
        .args(["task", "update", "ship it", "status=done"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[done]"));

    assert!(!tasks.join("open").join(&filename).exists());
    let after = fs::read_to_string(tasks.join("done").join(&filename)).unwrap();
    let body_of = |doc: &str| doc.splitn(3, "---\n").nth(2).unwrap().to_string();
    assert_eq!(body_of(&before), body_of(&after));
    assert!(after.contains("completed:"));

    let shown = run_json(dir.path(), &["task", "show", "ship it"]);
    assert_eq!(shown["status"], "done");
}

#[test]
fn test_list_filters_by_status() {
    let dir = init_project();
    run_json(dir.path(), &["task", "new", "First"]);
    run_json(dir.path(), &["task", "new", "Second", "--status", "in-progress"]);
    run_json(dir.path(), &["task", "new", "Third", "--status", "done"]);

    let listed = run_json(dir.path(), &["task", "list", "--status", "in_progress"]);
    let records = listed.as_array().unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["title"], "Second");

    logbook()
        .current_dir(dir.path())
        .args(["task", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("STATUS"))
        .stdout(predicate::str::contains("First"))
        .stdout(predicate::str::contains("Third"));
}

#[test]
fn test_ambiguous_across_statuses() {
    let dir = init_project();
    run_json(dir.path(), &["task", "new", "login bug"]);
    run_json(dir.path(), &["task", "new", "login flow", "--status", "done"]);

    logbook()
        .current_dir(dir.path())
        .args(["task", "update", "login", "priority=high"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("ambiguous task"));
}

#[test]
fn test_update_rejects_unknown_field_and_bad_value() {
    let dir = init_project();
    let created = run_json(dir.path(), &["task", "new", "Solo"]);
    let path = store_root(dir.path())
        .join("tasks/open")
        .join(created["filename"].as_str().unwrap());
    let before = fs::read_to_string(&path).unwrap();

    logbook()
        .current_dir(dir.path())
        .args(["task", "update", "solo", "status=done", "owner=sam"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("unknown field: owner"));

    logbook()
        .current_dir(dir.path())
        .args(["task", "update", "solo", "status=someday"])
        .assert()
        .code(2);

    assert_eq!(fs::read_to_string(&path).unwrap(), before);
}

#[test]
fn test_session_link_field() {
    let dir = init_project();
    run_json(dir.path(), &["task", "new", "Linked"]);

    let updated = run_json(
        dir.path(),
        &["task", "update", "linked", "session-link=2025-02-20_auth.md", "assignee=sam"],
    );
    assert_eq!(updated["status"], "open");

    let shown = run_json(dir.path(), &["task", "show", "linked"]);
    assert_eq!(shown["session"], "2025-02-20_auth.md");
    assert_eq!(shown["sessions"], serde_json::json!(["2025-02-20_auth.md"]));
    assert_eq!(shown["assignee"], "sam");
}

#[test]
fn test_delete_and_purge() {
    let dir = init_project();
    run_json(dir.path(), &["task", "new", "Gone"]);
    run_json(dir.path(), &["task", "new", "Old one", "--status", "cancelled"]);
    run_json(dir.path(), &["task", "new", "Old two", "--status", "cancelled"]);

    logbook()
        .current_dir(dir.path())
        .args(["task", "delete", "gone"])
        .assert()
        .success();

    logbook()
        .current_dir(dir.path())
        .args(["task", "purge", "cancelled"])
        .assert()
        .code(2);

    let purged = run_json(dir.path(), &["task", "purge", "cancelled", "--yes"]);
    assert_eq!(purged["removed"], 2);

    assert!(run_json(dir.path(), &["task", "list"])
        .as_array()
        .unwrap()
        .is_empty());
}
