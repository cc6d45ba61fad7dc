//! Task storage, partitioned by status
//!
//! Every status change goes through [`Store::persist_task`], which writes the
//! task into the directory named after its status and only then removes the
//! previous file. A crash between the two steps leaves the task at both
//! paths; the next index rebuild reflects whatever is on disk.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;

use super::scan::{self, LoadReport};
use super::{PurgeReport, Store};
use crate::document;
use crate::error::{LogbookError, Result};
use crate::id;
use crate::resolve;
use crate::task::{Task, TaskField, TaskMeta, TaskStatus};

impl Store {
    /// Save a new task.
    ///
    /// Fills in ID, date, status and priority from the settings when missing.
    /// A task saved directly into done/cancelled gets a completion stamp.
    #[tracing::instrument(skip(self, meta, body), fields(title = %meta.title))]
    pub fn save_task(&self, mut meta: TaskMeta, body: impl Into<String>) -> Result<Task> {
        let now = Utc::now();
        if meta.id.is_empty() {
            meta.id = id::task_id();
        }
        if meta.date.is_none() {
            meta.date = Some(now);
        }
        let status = if meta.has_status() {
            meta.status()
        } else {
            self.settings().default_status
        };
        meta.set_status(status, now);
        if !meta.has_priority() {
            meta.set_priority(self.settings().default_priority);
        }

        let mut task = Task::new(meta, body);
        let path = self.status_dir(status).join(task.canonical_filename());
        self.persist_task(&mut task, path, None)?;
        self.append_task_index(&task);

        tracing::debug!(id = %task.id(), path = ?task.path, "saved task");
        Ok(task)
    }

    /// Load every task from all four status directories.
    ///
    /// A task whose file has no status takes the status of its directory.
    pub fn load_tasks(&self) -> Result<LoadReport<Task>> {
        let mut report = LoadReport::default();
        for status in TaskStatus::ALL {
            report.merge(self.load_tasks_with_status(status)?);
        }
        Ok(report)
    }

    /// Load the tasks of one status directory
    pub fn load_tasks_with_status(&self, status: TaskStatus) -> Result<LoadReport<Task>> {
        Ok(scan::load_dir(&self.status_dir(status), |path| {
            read_task_in(path, status)
        }))
    }

    /// Find the single task matching a partial name, across every status
    #[tracing::instrument(skip(self))]
    pub fn get_task(&self, query: &str) -> Result<Task> {
        let tasks = self.load_tasks()?.into_items();
        find_task(query, &tasks).cloned()
    }

    /// Apply field assignments to the task matching `query`.
    ///
    /// A status change relocates the file into the new status directory,
    /// keeping its filename.
    #[tracing::instrument(skip(self, fields))]
    pub fn update_task(&self, query: &str, fields: &[TaskField]) -> Result<Task> {
        let mut task = self.get_task(query)?;
        let old_path = loaded_path(&task)?;

        let now = Utc::now();
        for field in fields {
            field.apply(&mut task.meta, now);
        }

        let new_path = self.task_path(task.status(), &old_path)?;
        self.persist_task(&mut task, new_path, Some(&old_path))?;
        self.refresh_task_index();
        Ok(task)
    }

    /// Permanently delete the task matching `query`
    #[tracing::instrument(skip(self))]
    pub fn delete_task(&self, query: &str) -> Result<Task> {
        let task = self.get_task(query)?;
        let path = loaded_path(&task)?;

        fs::remove_file(&path)
            .map_err(|e| LogbookError::io_operation("delete", path.display(), e))?;
        self.unstage(&path);
        self.refresh_task_index();

        Ok(task)
    }

    /// Delete every task in one status directory, continuing past failures
    pub fn purge_tasks(&self, status: TaskStatus) -> Result<PurgeReport> {
        let mut report = PurgeReport::default();

        for path in scan::document_files(&self.status_dir(status)).into_items() {
            match fs::remove_file(&path) {
                Ok(()) => {
                    self.unstage(&path);
                    report.removed.push(path);
                }
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "failed to purge task");
                    report.failed.push((path, e.to_string()));
                }
            }
        }

        if !report.removed.is_empty() {
            self.refresh_task_index();
        }
        Ok(report)
    }

    /// Path of a task with the given status, keeping the existing filename
    fn task_path(&self, status: TaskStatus, current: &Path) -> Result<PathBuf> {
        let filename = current
            .file_name()
            .ok_or_else(|| LogbookError::Other(format!("invalid task path: {}", current.display())))?;
        Ok(self.status_dir(status).join(filename))
    }

    /// Write `task` to `path`, then remove `previous` if it is a different file.
    ///
    /// This is the only place a task file changes location.
    fn persist_task(&self, task: &mut Task, path: PathBuf, previous: Option<&Path>) -> Result<()> {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }
        task.body = document::normalize_body(&task.body);
        fs::write(&path, task.to_document()?)?;

        if let Some(previous) = previous.filter(|p| *p != path.as_path()) {
            fs::remove_file(previous)
                .map_err(|e| LogbookError::io_operation("remove", previous.display(), e))?;
            self.unstage(previous);
            tracing::debug!(from = %previous.display(), to = %path.display(), "relocated task");
        }
        self.stage(&path);

        task.path = Some(path);
        Ok(())
    }
}

/// Resolve a partial name against loaded tasks
pub fn find_task<'a>(query: &str, tasks: &'a [Task]) -> Result<&'a Task> {
    resolve::resolve_one("task", query, tasks, Task::name_facets, Task::filename)
}

fn read_task_in(path: &Path, dir_status: TaskStatus) -> Result<Task> {
    let mut task = Task::read(path)?;
    task.meta.infer_status(dir_status);
    if task.status() != dir_status {
        tracing::warn!(
            path = %path.display(),
            status = %task.status(),
            directory = %dir_status,
            "task status does not match its directory"
        );
    }
    Ok(task)
}

fn loaded_path(task: &Task) -> Result<PathBuf> {
    task.path
        .clone()
        .ok_or_else(|| LogbookError::Other("loaded task has no path".to_string()))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::TimeZone;
    use tempfile::tempdir;

    use super::*;
    use crate::task::Priority;
    use crate::vcs::testing::{Call, RecordingHook};

    fn store() -> (tempfile::TempDir, Store) {
        let dir = tempdir().unwrap();
        let store = Store::init(dir.path()).unwrap();
        (dir, store)
    }

    fn dated(title: &str) -> TaskMeta {
        let mut meta = TaskMeta::new(title);
        meta.date = Some(Utc.with_ymd_and_hms(2025, 2, 20, 9, 0, 0).unwrap());
        meta
    }

    fn assert_located(store: &Store, task: &Task) {
        let path = task.path.clone().unwrap();
        assert!(path.exists());
        assert_eq!(path.parent().unwrap(), store.status_dir(task.status()));
        let copies = TaskStatus::ALL
            .iter()
            .filter(|s| store.status_dir(**s).join(task.filename()).exists())
            .count();
        assert_eq!(copies, 1);
    }

    #[test]
    fn test_save_applies_defaults() {
        let (_dir, store) = store();
        let task = store.save_task(TaskMeta::new("Fix login"), "").unwrap();

        assert!(task.id().starts_with(id::TASK_ID_PREFIX));
        assert!(task.meta.has_status());
        assert_eq!(task.status(), TaskStatus::Open);
        assert_eq!(task.meta.priority(), Priority::Medium);
        assert!(task.meta.completed.is_none());
        assert_located(&store, &task);
    }

    #[test]
    fn test_save_uses_configured_defaults() {
        let dir = tempdir().unwrap();
        let mut settings = crate::config::Settings::default();
        settings.default_status = TaskStatus::InProgress;
        settings.default_priority = Priority::High;
        let store = Store::init(dir.path()).unwrap().with_settings(settings);

        let task = store.save_task(TaskMeta::new("x"), "").unwrap();
        assert_eq!(task.status(), TaskStatus::InProgress);
        assert_eq!(task.meta.priority(), Priority::High);
    }

    #[test]
    fn test_save_terminal_stamps_completed() {
        let (_dir, store) = store();
        let task = store
            .save_task(TaskMeta::new("x").with_status(TaskStatus::Done), "")
            .unwrap();
        assert!(task.meta.completed.is_some());
        assert_located(&store, &task);
    }

    #[test]
    fn test_open_to_done_moves_file_and_keeps_body() {
        let (_dir, store) = store();
        let task = store
            .save_task(dated("x"), "## Description\n\nKeep me.\n")
            .unwrap();
        let old_path = store.status_dir(TaskStatus::Open).join("2025-02-20_x.md");
        assert_eq!(task.path.as_deref(), Some(old_path.as_path()));

        let updated = store
            .update_task("2025-02-20_x", &[TaskField::Status(TaskStatus::Done)])
            .unwrap();

        let new_path = store.status_dir(TaskStatus::Done).join("2025-02-20_x.md");
        assert!(!old_path.exists());
        assert!(new_path.exists());
        assert_eq!(updated.path.as_deref(), Some(new_path.as_path()));
        assert!(updated.meta.completed.is_some());

        assert_eq!(task.body, "\n## Description\n\nKeep me.\n");
        assert_eq!(updated.body, task.body);
        let reloaded = Task::read(&new_path).unwrap();
        assert_eq!(reloaded.body, task.body);
        assert_eq!(reloaded.status(), TaskStatus::Done);
    }

    #[test]
    fn test_every_transition_keeps_one_copy_in_status_dir() {
        let (_dir, store) = store();
        store.save_task(dated("walk"), "").unwrap();

        for status in [
            TaskStatus::InProgress,
            TaskStatus::Done,
            TaskStatus::Cancelled,
            TaskStatus::Open,
            TaskStatus::Open,
        ] {
            let task = store.update_task("walk", &[TaskField::Status(status)]).unwrap();
            assert_eq!(task.status(), status);
            assert_located(&store, &task);
        }
    }

    #[test]
    fn test_non_status_update_stays_in_place() {
        let (_dir, store) = store();
        let task = store.save_task(dated("stay"), "").unwrap();

        let updated = store
            .update_task(
                "stay",
                &[
                    TaskField::Priority(Priority::Low),
                    TaskField::Assignee("sam".to_string()),
                    TaskField::Session("2025-02-20_auth.md".to_string()),
                ],
            )
            .unwrap();

        assert_eq!(updated.path, task.path);
        assert_eq!(updated.meta.priority(), Priority::Low);
        assert_eq!(updated.meta.assignee, "sam");
        assert_eq!(updated.meta.session, "2025-02-20_auth.md");
    }

    #[test]
    fn test_unknown_field_is_rejected_before_writing() {
        let (_dir, store) = store();
        let task = store.save_task(dated("x"), "").unwrap();
        let before = fs::read_to_string(task.path.as_ref().unwrap()).unwrap();

        let err = "owner=sam".parse::<TaskField>().unwrap_err();
        assert!(matches!(err, LogbookError::UnknownField { .. }));

        let after = fs::read_to_string(task.path.as_ref().unwrap()).unwrap();
        assert_eq!(before, after);
    }

    #[test]
    fn test_ambiguous_across_status_dirs() {
        let (_dir, store) = store();
        store.save_task(dated("login bug"), "").unwrap();
        store
            .save_task(dated("login flow").with_status(TaskStatus::Done), "")
            .unwrap();

        match store.get_task("login").unwrap_err() {
            LogbookError::Ambiguous { candidates, .. } => {
                assert_eq!(candidates.len(), 2);
            }
            other => panic!("expected ambiguous, got {other:?}"),
        }
        assert!(matches!(
            store.update_task("login", &[]).unwrap_err(),
            LogbookError::Ambiguous { .. }
        ));
        assert!(matches!(
            store.get_task("nothing").unwrap_err(),
            LogbookError::NotFound { .. }
        ));
    }

    #[test]
    fn test_missing_status_is_inferred_from_directory() {
        let (_dir, store) = store();
        let path = store.status_dir(TaskStatus::InProgress).join("2025-01-01_bare.md");
        fs::write(&path, "---\ntitle: bare\n---\n\nbody\n").unwrap();

        let tasks = store.load_tasks().unwrap().into_items();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].status(), TaskStatus::InProgress);
    }

    #[test]
    fn test_relocation_notifies_hook() {
        let dir = tempdir().unwrap();
        let hook = Arc::new(RecordingHook::default());
        let store = Store::init(dir.path()).unwrap().with_hook(hook.clone());

        let task = store.save_task(dated("x"), "").unwrap();
        let old_path = task.path.clone().unwrap();
        let moved = store
            .update_task("x", &[TaskField::Status(TaskStatus::Done)])
            .unwrap();

        let calls = hook.calls();
        assert!(calls.contains(&Call::Unstage(old_path)));
        assert_eq!(calls.last(), Some(&Call::Stage(moved.path.unwrap())));
    }

    #[test]
    fn test_delete_and_purge() {
        let (_dir, store) = store();
        store.save_task(dated("one"), "").unwrap();
        store
            .save_task(dated("two").with_status(TaskStatus::Done), "")
            .unwrap();
        store
            .save_task(dated("three").with_status(TaskStatus::Done), "")
            .unwrap();

        store.delete_task("one").unwrap();
        assert!(store.load_tasks_with_status(TaskStatus::Open).unwrap().items.is_empty());

        let report = store.purge_tasks(TaskStatus::Done).unwrap();
        assert_eq!(report.removed.len(), 2);
        assert!(store.load_tasks().unwrap().items.is_empty());
    }
}
