//! Task records
//!
//! A task's status is also its storage location: a task with status `done`
//! lives in `tasks/done/`. Status is therefore read-only outside this crate;
//! the store changes it and moves the file in the same step.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::document;
use crate::error::{LogbookError, Result};
use crate::id;
use crate::session::push_unique;

/// Task lifecycle status; each value names a storage subdirectory
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Not started
    #[default]
    Open,
    /// Being worked on
    InProgress,
    /// Finished
    Done,
    /// Abandoned
    Cancelled,
}

impl TaskStatus {
    /// Every status, in lifecycle order
    pub const ALL: [TaskStatus; 4] = [
        TaskStatus::Open,
        TaskStatus::InProgress,
        TaskStatus::Done,
        TaskStatus::Cancelled,
    ];

    /// Canonical name, also the subdirectory name
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Open => "open",
            TaskStatus::InProgress => "in_progress",
            TaskStatus::Done => "done",
            TaskStatus::Cancelled => "cancelled",
        }
    }

    /// Done or cancelled
    pub fn is_terminal(&self) -> bool {
        matches!(self, TaskStatus::Done | TaskStatus::Cancelled)
    }
}

impl FromStr for TaskStatus {
    type Err = LogbookError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "open" => Ok(TaskStatus::Open),
            "in_progress" => Ok(TaskStatus::InProgress),
            "done" => Ok(TaskStatus::Done),
            "cancelled" | "canceled" => Ok(TaskStatus::Cancelled),
            _ => Err(LogbookError::invalid_value(
                "status (expected: open, in_progress, done, cancelled)",
                s,
            )),
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Task priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    /// Used when neither the task nor the settings name one
    #[default]
    Medium,
    Low,
}

impl Priority {
    /// Lowercase name as written in metadata
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::High => "high",
            Priority::Medium => "medium",
            Priority::Low => "low",
        }
    }
}

impl FromStr for Priority {
    type Err = LogbookError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "high" => Ok(Priority::High),
            "medium" => Ok(Priority::Medium),
            "low" => Ok(Priority::Low),
            _ => Err(LogbookError::invalid_value(
                "priority (expected: high, medium, low)",
                s,
            )),
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Task metadata block
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskMeta {
    /// Identifier (`task-` prefixed), generated on save when empty
    #[serde(default)]
    pub id: String,
    /// Creation timestamp; `None` means unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<DateTime<Utc>>,
    /// Task title, also the filename slug source
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    status: Option<TaskStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    priority: Option<Priority>,
    /// Primary linked session filename
    #[serde(default)]
    pub session: String,
    /// Every linked session filename (never validated)
    #[serde(default)]
    pub sessions: Vec<String>,
    /// Related task filenames (never validated)
    #[serde(default)]
    pub related_tasks: Vec<String>,
    /// Case-sensitive tags
    #[serde(default)]
    pub tags: Vec<String>,
    /// Who the task is assigned to
    #[serde(default)]
    pub assignee: String,
    /// When the task reached done/cancelled
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed: Option<DateTime<Utc>>,
}

impl TaskMeta {
    /// Create metadata for a title, leaving ID, date, status and priority unset
    pub fn new(title: impl Into<String>) -> Self {
        TaskMeta {
            title: title.into(),
            ..Default::default()
        }
    }

    /// Set the initial status of an unsaved task
    pub fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Set the priority
    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Set the assignee
    pub fn with_assignee(mut self, assignee: impl Into<String>) -> Self {
        self.assignee = assignee.into();
        self
    }

    /// Link a session; the first one linked becomes the primary session
    pub fn with_session(mut self, session: impl Into<String>) -> Self {
        link_session(&mut self, session.into());
        self
    }

    /// Add tags, skipping ones already present
    pub fn with_tags(mut self, tags: impl IntoIterator<Item = impl Into<String>>) -> Self {
        for tag in tags {
            push_unique(&mut self.tags, tag.into());
        }
        self
    }

    /// Relate task filenames
    pub fn with_related(mut self, related: impl IntoIterator<Item = impl Into<String>>) -> Self {
        for task in related {
            push_unique(&mut self.related_tasks, task.into());
        }
        self
    }

    /// Current status (open when unset)
    pub fn status(&self) -> TaskStatus {
        self.status.unwrap_or_default()
    }

    /// Whether a status has been recorded
    pub fn has_status(&self) -> bool {
        self.status.is_some()
    }

    /// Current priority (medium when unset)
    pub fn priority(&self) -> Priority {
        self.priority.unwrap_or_default()
    }

    /// Whether a priority has been recorded
    pub fn has_priority(&self) -> bool {
        self.priority.is_some()
    }

    pub(crate) fn set_priority(&mut self, priority: Priority) {
        self.priority = Some(priority);
    }

    /// Fill an unset status from the directory the task was found in
    pub(crate) fn infer_status(&mut self, status: TaskStatus) {
        if self.status.is_none() {
            self.status = Some(status);
        }
    }

    /// Record a status change and keep `completed` in step with it.
    ///
    /// Entering done/cancelled from a non-terminal status stamps `completed`;
    /// returning to open/in_progress clears it.
    pub(crate) fn set_status(&mut self, status: TaskStatus, now: DateTime<Utc>) {
        let was_terminal = self.status.is_some_and(|s| s.is_terminal());
        if status.is_terminal() {
            if !was_terminal || self.completed.is_none() {
                self.completed = Some(now);
            }
        } else {
            self.completed = None;
        }
        self.status = Some(status);
    }
}

fn link_session(meta: &mut TaskMeta, session: String) {
    if meta.session.is_empty() {
        meta.session = session.clone();
    }
    push_unique(&mut meta.sessions, session);
}

/// A complete task (metadata + body)
#[derive(Debug, Clone, PartialEq)]
pub struct Task {
    /// Metadata block
    pub meta: TaskMeta,
    /// Markdown body after the metadata block
    pub body: String,
    /// Path of the file (if loaded from or written to disk)
    pub path: Option<PathBuf>,
}

impl Task {
    /// Create a new, unsaved task
    pub fn new(meta: TaskMeta, body: impl Into<String>) -> Self {
        Task {
            meta,
            body: body.into(),
            path: None,
        }
    }

    /// Parse a task document
    pub fn parse(content: &str, path: Option<PathBuf>) -> Result<Self> {
        let (meta, body) = document::parse(content, path.as_deref())?;
        Ok(Task { meta, body, path })
    }

    /// Read and parse a task file
    pub fn read(path: &Path) -> Result<Self> {
        let (meta, body) = document::read(path)?;
        Ok(Task {
            meta,
            body,
            path: Some(path.to_path_buf()),
        })
    }

    /// Serialize to document text
    pub fn to_document(&self) -> Result<String> {
        document::serialize(&self.meta, &self.body)
    }

    /// Task ID
    pub fn id(&self) -> &str {
        &self.meta.id
    }

    /// Task title
    pub fn title(&self) -> &str {
        &self.meta.title
    }

    /// Current status
    pub fn status(&self) -> TaskStatus {
        self.meta.status()
    }

    /// Filename derived from date and title
    pub fn canonical_filename(&self) -> String {
        id::filename(self.meta.date, &self.meta.title)
    }

    /// Name of the file on disk, or the canonical name if not yet written
    pub fn filename(&self) -> String {
        self.path
            .as_deref()
            .and_then(Path::file_name)
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.canonical_filename())
    }

    /// Bounded snippet of the given body section
    pub fn excerpt(&self, section: &str, max_chars: usize) -> String {
        document::excerpt(&self.body, section, max_chars)
    }

    /// Names a user might refer to this task by
    pub fn name_facets(&self) -> Vec<String> {
        let filename = self.filename();
        let stem = filename.trim_end_matches(".md").to_string();
        vec![filename, stem, self.meta.title.clone(), self.meta.id.clone()]
    }
}

/// A single task field assignment, as accepted by `update_task`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskField {
    /// Change status (moves the file)
    Status(TaskStatus),
    /// Change priority
    Priority(Priority),
    /// Replace the assignee
    Assignee(String),
    /// Link a session filename
    Session(String),
}

impl TaskField {
    /// Recognized field names
    pub const NAMES: &'static [&'static str] = &["status", "priority", "assignee", "session"];

    /// Parse a `name`/`value` pair
    pub fn parse(name: &str, value: &str) -> Result<Self> {
        match name.to_lowercase().as_str() {
            "status" => Ok(TaskField::Status(value.parse()?)),
            "priority" => Ok(TaskField::Priority(value.parse()?)),
            "assignee" => Ok(TaskField::Assignee(value.to_string())),
            "session" | "session-link" | "session_link" => {
                Ok(TaskField::Session(value.to_string()))
            }
            _ => Err(LogbookError::UnknownField {
                field: name.to_string(),
                expected: Self::NAMES.join(", "),
            }),
        }
    }

    /// Apply the assignment to task metadata
    pub(crate) fn apply(&self, meta: &mut TaskMeta, now: DateTime<Utc>) {
        match self {
            TaskField::Status(status) => meta.set_status(*status, now),
            TaskField::Priority(priority) => meta.set_priority(*priority),
            TaskField::Assignee(assignee) => meta.assignee = assignee.clone(),
            TaskField::Session(session) => link_session(meta, session.clone()),
        }
    }
}

impl FromStr for TaskField {
    type Err = LogbookError;

    /// Parse `name=value`
    fn from_str(s: &str) -> Result<Self> {
        let Some((name, value)) = s.split_once('=') else {
            crate::bail_invalid!("field assignment (expected name=value)", s);
        };
        Self::parse(name.trim(), value.trim())
    }
}

impl fmt::Display for TaskField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskField::Status(v) => write!(f, "status={}", v),
            TaskField::Priority(v) => write!(f, "priority={}", v),
            TaskField::Assignee(v) => write!(f, "assignee={}", v),
            TaskField::Session(v) => write!(f, "session={}", v),
        }
    }
}
