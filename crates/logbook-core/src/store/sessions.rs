//! Session storage: one flat directory plus an archive subdirectory

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;

use super::scan::{self, LoadReport};
use super::{PurgeReport, Store};
use crate::document;
use crate::error::{LogbookError, Result};
use crate::id;
use crate::resolve;
use crate::session::{Session, SessionField, SessionMeta};

/// Outcome of archiving a batch of sessions
#[derive(Debug, Default)]
pub struct ArchiveOutcome {
    /// `(old path, new path)` for each archived session
    pub archived: Vec<(PathBuf, PathBuf)>,
    /// `(filename, reason)` for each session that could not be archived
    pub failures: Vec<(String, String)>,
}

impl Store {
    /// Save a new session.
    ///
    /// Fills in the ID and date when missing, writes the document under its
    /// canonical filename (replacing any session with the same date and topic)
    /// and appends it to the session index.
    #[tracing::instrument(skip(self, meta, body), fields(topic = %meta.topic))]
    pub fn save_session(&self, meta: SessionMeta, body: impl Into<String>) -> Result<Session> {
        let mut session = Session::new(meta, body);
        if session.meta.id.is_empty() {
            session.meta.id = id::session_id();
        }
        if session.meta.date.is_none() {
            session.meta.date = Some(Utc::now());
        }

        let path = self.sessions_dir().join(session.canonical_filename());
        self.write_session(&mut session, path, None)?;
        self.append_session_index(&session);

        tracing::debug!(id = %session.id(), path = ?session.path, "saved session");
        Ok(session)
    }

    /// Load every active session
    pub fn load_sessions(&self) -> Result<LoadReport<Session>> {
        Ok(scan::load_dir(&self.sessions_dir(), Session::read))
    }

    /// Load every archived session
    pub fn load_archived_sessions(&self) -> Result<LoadReport<Session>> {
        Ok(scan::load_dir(&self.archive_dir(), Session::read))
    }

    /// Find the single active session matching a partial name
    #[tracing::instrument(skip(self))]
    pub fn get_session(&self, query: &str) -> Result<Session> {
        let sessions = self.load_sessions()?.into_items();
        find_session(query, &sessions).cloned()
    }

    /// Apply field assignments to the session matching `query`.
    ///
    /// A topic change renames the file: the new file is written before the
    /// old one is removed.
    #[tracing::instrument(skip(self, fields))]
    pub fn update_session(&self, query: &str, fields: &[SessionField]) -> Result<Session> {
        let mut session = self.get_session(query)?;
        let old_path = session
            .path
            .clone()
            .ok_or_else(|| LogbookError::Other("loaded session has no path".to_string()))?;

        let old_topic = session.meta.topic.clone();
        for field in fields {
            field.apply(&mut session.meta);
        }

        let new_path = if session.meta.topic != old_topic {
            self.sessions_dir().join(session.canonical_filename())
        } else {
            old_path.clone()
        };

        self.write_session(&mut session, new_path, Some(&old_path))?;
        self.refresh_session_index();
        Ok(session)
    }

    /// Move an active session into the archive directory.
    ///
    /// Returns the new path.
    #[tracing::instrument(skip(self))]
    pub fn archive_session(&self, filename: &str) -> Result<PathBuf> {
        let source = self.sessions_dir().join(filename);
        if !source.is_file() {
            return Err(LogbookError::not_found("session", filename));
        }

        let archive_dir = self.archive_dir();
        fs::create_dir_all(&archive_dir)?;

        let target = archive_dir.join(filename);
        fs::rename(&source, &target)
            .map_err(|e| LogbookError::io_operation("archive", source.display(), e))?;

        tracing::debug!(from = %source.display(), to = %target.display(), "archived session");
        Ok(target)
    }

    /// Archive several sessions, continuing past individual failures.
    ///
    /// Fails only when every attempt failed. When at least one session moved,
    /// the session index is rebuilt and version control is told about the
    /// rebuilt index, the new archive paths and the vacated active paths.
    pub fn archive_sessions<'a>(
        &self,
        filenames: impl IntoIterator<Item = &'a str>,
    ) -> Result<ArchiveOutcome> {
        let mut outcome = ArchiveOutcome::default();

        for filename in filenames {
            let old_path = self.sessions_dir().join(filename);
            match self.archive_session(filename) {
                Ok(new_path) => outcome.archived.push((old_path, new_path)),
                Err(e) => {
                    tracing::warn!(filename, error = %e, "failed to archive session");
                    outcome.failures.push((filename.to_string(), e.to_string()));
                }
            }
        }

        if outcome.archived.is_empty() {
            if outcome.failures.is_empty() {
                return Ok(outcome);
            }
            let reasons: Vec<String> = outcome
                .failures
                .iter()
                .map(|(name, reason)| format!("{}: {}", name, reason))
                .collect();
            return Err(LogbookError::FailedOperation {
                operation: format!("archive {} session(s)", outcome.failures.len()),
                reason: reasons.join("; "),
            });
        }

        self.refresh_session_index();
        self.stage(&self.session_index_path());
        for (old_path, new_path) in &outcome.archived {
            self.stage(new_path);
            self.unstage(old_path);
        }

        Ok(outcome)
    }

    /// Permanently delete the active session matching `query`
    #[tracing::instrument(skip(self))]
    pub fn delete_session(&self, query: &str) -> Result<Session> {
        let session = self.get_session(query)?;
        let path = session
            .path
            .as_deref()
            .ok_or_else(|| LogbookError::Other("loaded session has no path".to_string()))?;

        fs::remove_file(path).map_err(|e| LogbookError::io_operation("delete", path.display(), e))?;
        self.unstage(path);
        self.refresh_session_index();

        Ok(session)
    }

    /// Permanently delete every archived session, continuing past failures
    pub fn purge_archived_sessions(&self) -> Result<PurgeReport> {
        let mut report = PurgeReport::default();

        for path in scan::document_files(&self.archive_dir()).into_items() {
            match fs::remove_file(&path) {
                Ok(()) => {
                    self.unstage(&path);
                    report.removed.push(path);
                }
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "failed to purge session");
                    report.failed.push((path, e.to_string()));
                }
            }
        }

        Ok(report)
    }

    /// Write a session to `path`, removing `previous` afterwards if it differs
    fn write_session(&self, session: &mut Session, path: PathBuf, previous: Option<&Path>) -> Result<()> {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }
        session.body = document::normalize_body(&session.body);
        fs::write(&path, session.to_document()?)?;
        self.stage(&path);

        if let Some(previous) = previous.filter(|p| *p != path.as_path()) {
            fs::remove_file(previous)
                .map_err(|e| LogbookError::io_operation("remove", previous.display(), e))?;
            self.unstage(previous);
        }

        session.path = Some(path);
        Ok(())
    }
}

/// Resolve a partial name against loaded sessions
pub fn find_session<'a>(query: &str, sessions: &'a [Session]) -> Result<&'a Session> {
    resolve::resolve_one("session", query, sessions, Session::name_facets, Session::filename)
}
