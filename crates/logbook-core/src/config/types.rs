//! Configuration type definitions

use crate::task::{Priority, TaskStatus};
use serde::{Deserialize, Serialize};

/// Store settings, read from `config.json`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Status given to tasks saved without one
    #[serde(default)]
    pub default_status: TaskStatus,

    /// Priority given to tasks saved without one
    #[serde(default)]
    pub default_priority: Priority,

    /// Maximum excerpt length, in characters
    #[serde(default = "default_excerpt_max_chars")]
    pub excerpt_max_chars: usize,

    /// Body section a session excerpt is taken from
    #[serde(default = "default_session_excerpt_section")]
    pub session_excerpt_section: String,

    /// Body section a task excerpt is taken from
    #[serde(default = "default_task_excerpt_section")]
    pub task_excerpt_section: String,

    /// Section headings of a freshly created session body
    #[serde(default = "default_session_sections")]
    pub session_sections: Vec<String>,

    /// Section headings of a freshly created task body
    #[serde(default = "default_task_sections")]
    pub task_sections: Vec<String>,

    /// Sections shown by the session summary view (empty = full body)
    #[serde(default = "default_session_summary_sections")]
    pub session_summary_sections: Vec<String>,

    /// Sections shown by the task summary view (empty = full body)
    #[serde(default = "default_task_summary_sections")]
    pub task_summary_sections: Vec<String>,

    /// Retention thresholds
    #[serde(default)]
    pub gc: GcConfig,

    /// Version-control integration
    #[serde(default)]
    pub git: GitConfig,
}

/// Retention thresholds, in whole days
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GcConfig {
    /// Age at which a session with no linked tasks becomes a weak candidate
    #[serde(default = "default_orphan_threshold_days")]
    pub orphan_threshold_days: i64,

    /// Idle time after the last linked task closed before a session becomes a strong candidate
    #[serde(default = "default_linked_threshold_days")]
    pub linked_threshold_days: i64,
}

/// Version-control integration settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GitConfig {
    /// Stage written files and unstage removed ones with git
    #[serde(default)]
    pub auto_stage: bool,
}

fn default_excerpt_max_chars() -> usize {
    160
}

fn default_session_excerpt_section() -> String {
    "Summary".to_string()
}

fn default_task_excerpt_section() -> String {
    "Description".to_string()
}

fn default_session_sections() -> Vec<String> {
    ["Summary", "Decisions", "Open Questions", "Next Steps"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_task_sections() -> Vec<String> {
    ["Description", "Acceptance Criteria", "Notes"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_session_summary_sections() -> Vec<String> {
    ["Summary", "Decisions", "Next Steps"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_task_summary_sections() -> Vec<String> {
    ["Description", "Acceptance Criteria"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_orphan_threshold_days() -> i64 {
    30
}

fn default_linked_threshold_days() -> i64 {
    14
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            default_status: TaskStatus::default(),
            default_priority: Priority::default(),
            excerpt_max_chars: default_excerpt_max_chars(),
            session_excerpt_section: default_session_excerpt_section(),
            task_excerpt_section: default_task_excerpt_section(),
            session_sections: default_session_sections(),
            task_sections: default_task_sections(),
            session_summary_sections: default_session_summary_sections(),
            task_summary_sections: default_task_summary_sections(),
            gc: GcConfig::default(),
            git: GitConfig::default(),
        }
    }
}

impl Default for GcConfig {
    fn default() -> Self {
        GcConfig {
            orphan_threshold_days: default_orphan_threshold_days(),
            linked_threshold_days: default_linked_threshold_days(),
        }
    }
}
