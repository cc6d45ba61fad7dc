use crate::support::{init_project, logbook, run_json, store_root, write_session};
use predicates::prelude::*;

// ============================================================================
// Session commands
// ============================================================================

#[test]
fn test_new_and_list() {
    let dir = init_project();

    let created = run_json(
        dir.path(),
        &["session", "new", "Auth rewrite", "--agent", "claude", "--tag", "auth"],
    );
    let filename = created["filename"].as_str().unwrap().to_string();
    assert!(filename.ends_with("_auth-rewrite.md"));
    assert_eq!(created["id"].as_str().unwrap().len(), 12);
    assert!(store_root(dir.path()).join("sessions").join(&filename).is_file());

    logbook()
        .current_dir(dir.path())
        .args(["session", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains(filename.as_str()))
        .stdout(predicate::str::contains("Auth rewrite"));

    let listed = run_json(dir.path(), &["session", "list", "--tag", "auth"]);
    let records = listed.as_array().unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["agent"], "claude");
    assert_eq!(records[0]["tasks"], serde_json::json!([]));
}

#[test]
fn test_new_uses_template_body() {
    let dir = init_project();
    run_json(dir.path(), &["session", "new", "Templated"]);

    logbook()
        .current_dir(dir.path())
        .args(["session", "show", "templated"])
        .assert()
        .success()
        .stdout(predicate::str::contains("## Summary"));
}

#[test]
fn test_new_reads_stdin() {
    let dir = init_project();

    logbook()
        .current_dir(dir.path())
        .args(["session", "new", "Piped", "--stdin"])
        .write_stdin("## Summary\n\nWritten from a pipe.\n")
        .assert()
        .success();

    let listed = run_json(dir.path(), &["session", "search", "pipe"]);
    assert_eq!(listed[0]["excerpt"], "Written from a pipe.");
}

#[test]
fn test_show_summary_keeps_only_summary_sections() {
    let dir = init_project();
    write_session(
        dir.path(),
        "2025-02-20_auth.md",
        "id: 3f9a1c0d2b7e\ndate: 2025-02-20T10:00:00Z\ntopic: auth\n",
        "## Summary\n\nMoved to PKCE.\n\n## Scratch\n\nnoise\n",
    );

    logbook()
        .current_dir(dir.path())
        .args(["session", "show", "--summary", "auth"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Moved to PKCE."))
        .stdout(predicate::str::contains("noise").not());
}

#[test]
fn test_exact_match_beats_partial() {
    let dir = init_project();
    run_json(dir.path(), &["session", "new", "auth"]);
    run_json(dir.path(), &["session", "new", "auth-v2"]);

    let shown = run_json(dir.path(), &["session", "show", "auth"]);
    assert_eq!(shown["topic"], "auth");
}

#[test]
fn test_ambiguous_lists_candidates() {
    let dir = init_project();
    run_json(dir.path(), &["session", "new", "login bug"]);
    run_json(dir.path(), &["session", "new", "login flow"]);

    logbook()
        .current_dir(dir.path())
        .args(["session", "show", "login"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("ambiguous"))
        .stderr(predicate::str::contains("1. "))
        .stderr(predicate::str::contains("2. "));
}

#[test]
fn test_update_topic_renames_file() {
    let dir = init_project();
    let created = run_json(dir.path(), &["session", "new", "Old name"]);
    let old = created["filename"].as_str().unwrap().to_string();

    let updated = run_json(
        dir.path(),
        &["session", "update", "old name", "topic=New name", "tag=moved"],
    );
    let new = updated["filename"].as_str().unwrap();

    let sessions = store_root(dir.path()).join("sessions");
    assert!(new.ends_with("_new-name.md"));
    assert!(!sessions.join(&old).exists());
    assert!(sessions.join(new).exists());
}

#[test]
fn test_update_rejects_unknown_field() {
    let dir = init_project();
    run_json(dir.path(), &["session", "new", "x"]);

    logbook()
        .current_dir(dir.path())
        .args(["session", "update", "x", "colour=blue"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("unknown field"));
}

#[test]
fn test_archive_list_archived_and_purge() {
    let dir = init_project();
    let created = run_json(dir.path(), &["session", "new", "Retire me"]);
    let filename = created["filename"].as_str().unwrap().to_string();

    logbook()
        .current_dir(dir.path())
        .args(["session", "archive", "retire"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Archived"));

    let archive = store_root(dir.path()).join("sessions/archive");
    assert!(archive.join(&filename).is_file());
    assert!(run_json(dir.path(), &["session", "list"])
        .as_array()
        .unwrap()
        .is_empty());
    assert_eq!(
        run_json(dir.path(), &["session", "list", "--archived"])
            .as_array()
            .unwrap()
            .len(),
        1
    );

    logbook()
        .current_dir(dir.path())
        .args(["session", "purge"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("--yes"));
    assert!(archive.join(&filename).is_file());

    logbook()
        .current_dir(dir.path())
        .args(["session", "purge", "--yes"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Purged 1"));
    assert!(!archive.join(&filename).exists());
}

#[test]
fn test_archive_unknown_query_moves_nothing() {
    let dir = init_project();
    let created = run_json(dir.path(), &["session", "new", "Keep"]);
    let filename = created["filename"].as_str().unwrap().to_string();

    logbook()
        .current_dir(dir.path())
        .args(["session", "archive", "keep", "missing"])
        .assert()
        .code(3);
    assert!(store_root(dir.path()).join("sessions").join(filename).is_file());
}

#[test]
fn test_delete() {
    let dir = init_project();
    run_json(dir.path(), &["session", "new", "Scratch"]);

    logbook()
        .current_dir(dir.path())
        .args(["session", "delete", "scratch"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Deleted"));

    logbook()
        .current_dir(dir.path())
        .args(["session", "show", "scratch"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn test_malformed_document_does_not_break_listing() {
    let dir = init_project();
    run_json(dir.path(), &["session", "new", "Fine"]);
    std::fs::write(
        store_root(dir.path()).join("sessions/2025-01-01_broken.md"),
        "no metadata here",
    )
    .unwrap();

    run_json(dir.path(), &["index", "rebuild"]);
    let listed = run_json(dir.path(), &["session", "list"]);
    assert_eq!(listed.as_array().unwrap().len(), 1);
}
