//! Session records
//!
//! A session is a dated write-up of one piece of work. Its filename is derived
//! from its date and topic; two sessions sharing both overwrite each other.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::document;
use crate::error::{LogbookError, Result};
use crate::id;

/// Session metadata block
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionMeta {
    /// Identifier, generated on save when empty
    #[serde(default)]
    pub id: String,
    /// Creation timestamp; `None` means unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<DateTime<Utc>>,
    /// Free-text topic, also the filename slug source
    #[serde(default)]
    pub topic: String,
    /// Case-sensitive tags
    #[serde(default)]
    pub tags: Vec<String>,
    /// Label of the human or agent that wrote the session
    #[serde(default)]
    pub agent: String,
    /// Filenames of related sessions (never validated)
    #[serde(default)]
    pub related_sessions: Vec<String>,
    /// Filenames of linked tasks (never validated)
    #[serde(default)]
    pub tasks: Vec<String>,
}

impl SessionMeta {
    /// Create metadata for a topic, leaving ID and date for the store to fill
    pub fn new(topic: impl Into<String>) -> Self {
        SessionMeta {
            topic: topic.into(),
            ..Default::default()
        }
    }

    /// Set the authoring agent
    pub fn with_agent(mut self, agent: impl Into<String>) -> Self {
        self.agent = agent.into();
        self
    }

    /// Add tags, skipping ones already present
    pub fn with_tags(mut self, tags: impl IntoIterator<Item = impl Into<String>>) -> Self {
        for tag in tags {
            push_unique(&mut self.tags, tag.into());
        }
        self
    }

    /// Link task filenames
    pub fn with_tasks(mut self, tasks: impl IntoIterator<Item = impl Into<String>>) -> Self {
        for task in tasks {
            push_unique(&mut self.tasks, task.into());
        }
        self
    }

    /// Relate session filenames
    pub fn with_related(mut self, related: impl IntoIterator<Item = impl Into<String>>) -> Self {
        for session in related {
            push_unique(&mut self.related_sessions, session.into());
        }
        self
    }
}

/// A complete session (metadata + body)
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    /// Metadata block
    pub meta: SessionMeta,
    /// Markdown body after the metadata block
    pub body: String,
    /// Path of the file (if loaded from or written to disk)
    pub path: Option<PathBuf>,
}

impl Session {
    /// Create a new, unsaved session
    pub fn new(meta: SessionMeta, body: impl Into<String>) -> Self {
        Session {
            meta,
            body: body.into(),
            path: None,
        }
    }

    /// Parse a session document
    pub fn parse(content: &str, path: Option<PathBuf>) -> Result<Self> {
        let (meta, body) = document::parse(content, path.as_deref())?;
        Ok(Session { meta, body, path })
    }

    /// Read and parse a session file
    pub fn read(path: &Path) -> Result<Self> {
        let (meta, body) = document::read(path)?;
        Ok(Session {
            meta,
            body,
            path: Some(path.to_path_buf()),
        })
    }

    /// Serialize to document text
    pub fn to_document(&self) -> Result<String> {
        document::serialize(&self.meta, &self.body)
    }

    /// Session ID
    pub fn id(&self) -> &str {
        &self.meta.id
    }

    /// Session topic
    pub fn topic(&self) -> &str {
        &self.meta.topic
    }

    /// Filename derived from date and topic
    pub fn canonical_filename(&self) -> String {
        id::filename(self.meta.date, &self.meta.topic)
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

    /// Names a user might refer to this session by
    pub fn name_facets(&self) -> Vec<String> {
        let filename = self.filename();
        let stem = filename.trim_end_matches(".md").to_string();
        vec![filename, stem, self.meta.topic.clone(), self.meta.id.clone()]
    }

    /// Age in whole days at `now`, if the date is set
    pub fn age_days(&self, now: DateTime<Utc>) -> Option<i64> {
        self.meta.date.map(|date| (now - date).num_days())
    }
}

/// A single session field assignment, as accepted by `update_session`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionField {
    /// Replace the authoring agent
    Agent(String),
    /// Add a tag
    Tag(String),
    /// Remove a tag
    Untag(String),
    /// Change the topic (renames the file)
    Topic(String),
    /// Link a task filename
    Task(String),
    /// Relate a session filename
    Related(String),
}

impl SessionField {
    /// Recognized field names
    pub const NAMES: &'static [&'static str] = &["agent", "tag", "untag", "topic", "task", "related"];

    /// Parse a `name`/`value` pair
    pub fn parse(name: &str, value: &str) -> Result<Self> {
        let value = value.to_string();
        match name.to_lowercase().as_str() {
            "agent" => Ok(SessionField::Agent(value)),
            "tag" => Ok(SessionField::Tag(value)),
            "untag" => Ok(SessionField::Untag(value)),
            "topic" => Ok(SessionField::Topic(value)),
            "task" => Ok(SessionField::Task(value)),
            "related" => Ok(SessionField::Related(value)),
            _ => Err(LogbookError::UnknownField {
                field: name.to_string(),
                expected: Self::NAMES.join(", "),
            }),
        }
    }

    /// Apply the assignment to session metadata
    pub fn apply(&self, meta: &mut SessionMeta) {
        match self {
            SessionField::Agent(agent) => meta.agent = agent.clone(),
            SessionField::Tag(tag) => push_unique(&mut meta.tags, tag.clone()),
            SessionField::Untag(tag) => meta.tags.retain(|t| t != tag),
            SessionField::Topic(topic) => meta.topic = topic.clone(),
            SessionField::Task(task) => push_unique(&mut meta.tasks, task.clone()),
            SessionField::Related(session) => push_unique(&mut meta.related_sessions, session.clone()),
        }
    }
}

impl FromStr for SessionField {
    type Err = LogbookError;

    /// Parse `name=value`
    fn from_str(s: &str) -> Result<Self> {
        let Some((name, value)) = s.split_once('=') else {
            crate::bail_invalid!("field assignment (expected name=value)", s);
        };
        Self::parse(name.trim(), value.trim())
    }
}

impl fmt::Display for SessionField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionField::Agent(v) => write!(f, "agent={}", v),
            SessionField::Tag(v) => write!(f, "tag={}", v),
            SessionField::Untag(v) => write!(f, "untag={}", v),
            SessionField::Topic(v) => write!(f, "topic={}", v),
            SessionField::Task(v) => write!(f, "task={}", v),
            SessionField::Related(v) => write!(f, "related={}", v),
        }
    }
}

pub(crate) fn push_unique(list: &mut Vec<String>, value: String) {
    if !list.contains(&value) {
        list.push(value);
    }
}
