use crate::support::{init_project, logbook, run_json, store_root, write_session};
use chrono::{Duration, Utc};
use predicates::prelude::*;

// ============================================================================
// Retention (gc)
// ============================================================================

fn days_ago(days: i64) -> String {
    (Utc::now() - Duration::days(days)).to_rfc3339()
}

#[test]
fn test_dry_run_lists_weak_candidate() {
    let dir = init_project();
    let path = write_session(
        dir.path(),
        "2020-01-01_ancient.md",
        &format!("id: aaaaaaaaaaaa\ndate: {}\ntopic: ancient\n", days_ago(40)),
        "old notes\n",
    );

    logbook()
        .current_dir(dir.path())
        .arg("gc")
        .assert()
        .success()
        .stdout(predicate::str::contains("[weak] 2020-01-01_ancient.md"))
        .stdout(predicate::str::contains("40 days old"))
        .stdout(predicate::str::contains("--apply"));
    assert!(path.exists());

    logbook()
        .current_dir(dir.path())
        .args(["gc", "--orphan-days", "90"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No sessions to archive"));
}

#[test]
fn test_apply_archives_and_reindexes() {
    let dir = init_project();
    write_session(
        dir.path(),
        "2020-01-01_ancient.md",
        &format!("id: aaaaaaaaaaaa\ndate: {}\ntopic: ancient\n", days_ago(60)),
        "",
    );
    run_json(dir.path(), &["session", "new", "Fresh"]);

    let result = run_json(dir.path(), &["gc", "--apply"]);
    assert_eq!(result["apply"], true);
    assert_eq!(result["archived"].as_array().unwrap().len(), 1);

    let sessions = store_root(dir.path()).join("sessions");
    assert!(!sessions.join("2020-01-01_ancient.md").exists());
    assert!(sessions.join("archive/2020-01-01_ancient.md").exists());

    let listed = run_json(dir.path(), &["session", "list"]);
    let records = listed.as_array().unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["topic"], "Fresh");
}

#[test]
fn test_open_task_protects_session() {
    let dir = init_project();
    let task = run_json(dir.path(), &["task", "new", "Still open"]);
    let task_file = task["filename"].as_str().unwrap();
    write_session(
        dir.path(),
        "2020-01-01_pinned.md",
        &format!(
            "id: bbbbbbbbbbbb\ndate: {}\ntopic: pinned\ntasks:\n- {}\n",
            days_ago(365),
            task_file
        ),
        "",
    );

    let plan = run_json(
        dir.path(),
        &["gc", "--orphan-days", "0", "--linked-days", "0"],
    );
    let entries = plan["sessions"].as_array().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["verdict"], "protected");

    run_json(dir.path(), &["task", "update", "still open", "status=done"]);
    let plan = run_json(dir.path(), &["gc", "--linked-days", "0"]);
    assert_eq!(plan["sessions"][0]["verdict"], "candidate");
    assert_eq!(plan["sessions"][0]["tier"], "strong");
}

#[test]
fn test_dangling_task_link_does_not_pin() {
    let dir = init_project();
    write_session(
        dir.path(),
        "2020-01-01_dangling.md",
        &format!(
            "id: cccccccccccc\ndate: {}\ntopic: dangling\ntasks:\n- 2019-01-01_deleted.md\n",
            days_ago(30)
        ),
        "",
    );

    let plan = run_json(dir.path(), &["gc"]);
    assert_eq!(plan["sessions"][0]["verdict"], "candidate");
    assert_eq!(plan["sessions"][0]["tier"], "strong");
}
