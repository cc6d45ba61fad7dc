//! Summary records stored in the index files

use serde::{Deserialize, Serialize};

use crate::config::Settings;
use crate::session::{Session, SessionMeta};
use crate::task::{Task, TaskMeta};

/// One index line: every metadata field plus the derived filename and excerpt
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexEntry<M> {
    #[serde(flatten)]
    pub meta: M,
    pub filename: String,
    #[serde(default)]
    pub excerpt: String,
}

pub type SessionRecord = IndexEntry<SessionMeta>;
pub type TaskRecord = IndexEntry<TaskMeta>;

impl IndexEntry<SessionMeta> {
    pub fn from_session(session: &Session, settings: &Settings) -> Self {
        IndexEntry {
            meta: session.meta.clone(),
            filename: session.filename(),
            excerpt: session.excerpt(
                &settings.session_excerpt_section,
                settings.excerpt_max_chars,
            ),
        }
    }

    /// Case-insensitive substring search over names, tags and excerpt
    pub fn matches(&self, query: &str) -> bool {
        let fields = [
            self.meta.id.as_str(),
            self.meta.topic.as_str(),
            self.meta.agent.as_str(),
            self.filename.as_str(),
            self.excerpt.as_str(),
        ];
        contains_any(fields.into_iter().chain(self.meta.tags.iter().map(String::as_str)), query)
    }
}

impl IndexEntry<TaskMeta> {
    pub fn from_task(task: &Task, settings: &Settings) -> Self {
        IndexEntry {
            meta: task.meta.clone(),
            filename: task.filename(),
            excerpt: task.excerpt(&settings.task_excerpt_section, settings.excerpt_max_chars),
        }
    }

    /// Case-insensitive substring search over names, tags and excerpt
    pub fn matches(&self, query: &str) -> bool {
        let fields = [
            self.meta.id.as_str(),
            self.meta.title.as_str(),
            self.meta.assignee.as_str(),
            self.filename.as_str(),
            self.excerpt.as_str(),
        ];
        contains_any(fields.into_iter().chain(self.meta.tags.iter().map(String::as_str)), query)
    }
}

fn contains_any<'a>(fields: impl IntoIterator<Item = &'a str>, query: &str) -> bool {
    let query = query.to_lowercase();
    fields
        .into_iter()
        .any(|field| field.to_lowercase().contains(&query))
}
