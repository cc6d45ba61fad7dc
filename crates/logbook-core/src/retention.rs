//! Retention policy: which active sessions are stale enough to archive
//!
//! Each session is judged on its own:
//!
//! - no linked tasks: a *weak* candidate once it is older than the orphan
//!   threshold;
//! - linked tasks, any of them open or in progress: protected;
//! - linked tasks, all closed: a *strong* candidate once the latest
//!   completion (or the session date when none is recorded) is older than
//!   the linked threshold.
//!
//! A link that no longer resolves to exactly one task counts as closed.
//! The policy reads the documents directly, never the index.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::config::GcConfig;
use crate::error::Result;
use crate::session::Session;
use crate::store::{find_task, ArchiveOutcome, Store};
use crate::task::Task;

/// Age thresholds, in whole days
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetentionPolicy {
    /// Age at which a session with no linked tasks becomes a weak candidate
    pub orphan_threshold_days: i64,
    /// Idle time after the last completion before a fully closed session goes
    pub linked_threshold_days: i64,
}

impl From<&GcConfig> for RetentionPolicy {
    fn from(config: &GcConfig) -> Self {
        RetentionPolicy {
            orphan_threshold_days: config.orphan_threshold_days,
            linked_threshold_days: config.linked_threshold_days,
        }
    }
}

/// How sure the policy is that a session can go
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    /// Every linked task is closed
    Strong,
    /// No linked tasks; judged on age alone
    Weak,
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tier::Strong => f.write_str("strong"),
            Tier::Weak => f.write_str("weak"),
        }
    }
}

/// Classification of one session, with a human-readable reason
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "verdict", rename_all = "lowercase")]
pub enum Verdict {
    Retain { reason: String },
    Protected { reason: String },
    Candidate { tier: Tier, reason: String },
}

impl Verdict {
    pub fn is_candidate(&self) -> bool {
        matches!(self, Verdict::Candidate { .. })
    }

    pub fn reason(&self) -> &str {
        match self {
            Verdict::Retain { reason }
            | Verdict::Protected { reason }
            | Verdict::Candidate { reason, .. } => reason,
        }
    }
}

/// One classified session
#[derive(Debug, Clone, Serialize)]
pub struct PlanEntry {
    /// Session filename in the active directory
    pub filename: String,
    pub topic: String,
    #[serde(flatten)]
    pub verdict: Verdict,
}

/// Classification of every active session
#[derive(Debug, Clone, Default, Serialize)]
pub struct GcPlan {
    /// Every active session, in filename order
    pub entries: Vec<PlanEntry>,
}

impl GcPlan {
    pub fn candidates(&self) -> impl Iterator<Item = &PlanEntry> {
        self.entries.iter().filter(|e| e.verdict.is_candidate())
    }
}

impl RetentionPolicy {
    /// Classify one session against the loaded tasks
    pub fn classify(&self, session: &Session, tasks: &[Task], now: DateTime<Utc>) -> Verdict {
        let links = &session.meta.tasks;
        if links.is_empty() {
            return self.classify_orphan(session, now);
        }

        let mut resolved = Vec::new();
        let mut dangling = 0;
        for link in links {
            match find_task(link, tasks) {
                Ok(task) => resolved.push(task),
                Err(e) => {
                    tracing::debug!(session = %session.filename(), link, error = %e, "linked task does not resolve");
                    dangling += 1;
                }
            }
        }

        if let Some(active) = resolved.iter().find(|task| !task.status().is_terminal()) {
            return Verdict::Protected {
                reason: format!("linked task {} is {}", active.filename(), active.status()),
            };
        }

        let reference = resolved
            .iter()
            .filter_map(|task| task.meta.completed)
            .max()
            .or(session.meta.date);
        let Some(reference) = reference else {
            return Verdict::Retain {
                reason: "no completion time or date recorded".to_string(),
            };
        };

        let idle = (now - reference).num_days();
        let mut reason = format!(
            "{} linked task(s) closed; idle {} days (threshold {})",
            links.len(),
            idle,
            self.linked_threshold_days
        );
        if dangling > 0 {
            reason.push_str(&format!("; {} link(s) missing", dangling));
        }

        if idle >= self.linked_threshold_days {
            Verdict::Candidate {
                tier: Tier::Strong,
                reason,
            }
        } else {
            Verdict::Retain { reason }
        }
    }

    fn classify_orphan(&self, session: &Session, now: DateTime<Utc>) -> Verdict {
        let Some(age) = session.age_days(now) else {
            return Verdict::Retain {
                reason: "no linked tasks; no date recorded".to_string(),
            };
        };

        let reason = format!(
            "no linked tasks; {} days old (threshold {})",
            age, self.orphan_threshold_days
        );
        if age >= self.orphan_threshold_days {
            Verdict::Candidate {
                tier: Tier::Weak,
                reason,
            }
        } else {
            Verdict::Retain { reason }
        }
    }
}

/// Classify every active session in the store (dry run)
#[tracing::instrument(skip(store))]
pub fn plan(store: &Store, policy: &RetentionPolicy, now: DateTime<Utc>) -> Result<GcPlan> {
    let sessions = store.load_sessions()?.into_items();
    let tasks = store.load_tasks()?.into_items();

    let entries = sessions
        .iter()
        .map(|session| PlanEntry {
            filename: session.filename(),
            topic: session.topic().to_string(),
            verdict: policy.classify(session, &tasks, now),
        })
        .collect();

    Ok(GcPlan { entries })
}

/// Archive every candidate in the plan.
///
/// Individual failures are reported in the outcome; the call fails only
/// when every archive attempt failed.
pub fn apply(store: &Store, plan: &GcPlan) -> Result<ArchiveOutcome> {
    let filenames: Vec<&str> = plan.candidates().map(|e| e.filename.as_str()).collect();
    tracing::info!(candidates = filenames.len(), "archiving sessions");
    store.archive_sessions(filenames)
}
