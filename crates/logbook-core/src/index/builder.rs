//! Index maintenance on the store
//!
//! Saves append one record. Everything else (moves, deletes, field edits,
//! archiving) rebuilds the whole file from the documents.

use std::time::Instant;

use super::records::{SessionRecord, TaskRecord};
use super::{IndexFile, IndexRead};
use crate::error::Result;
use crate::session::Session;
use crate::store::{LoadReport, ScanFailure, Store};
use crate::task::Task;
use crate::trace_time;

/// Outcome of a full index rebuild
#[derive(Debug, Default)]
pub struct RebuildReport {
    /// Records written
    pub records: usize,
    /// Documents that could not be read and were left out
    pub failures: Vec<ScanFailure>,
}

impl Store {
    pub fn session_index(&self) -> IndexFile<SessionRecord> {
        IndexFile::new(self.session_index_path())
    }

    pub fn task_index(&self) -> IndexFile<TaskRecord> {
        IndexFile::new(self.task_index_path())
    }

    /// Rewrite the session index from the active session documents
    #[tracing::instrument(skip(self))]
    pub fn rebuild_session_index(&self) -> Result<RebuildReport> {
        let start = Instant::now();
        let report = self.load_sessions()?;
        let records: Vec<SessionRecord> = report
            .items
            .iter()
            .map(|session| SessionRecord::from_session(session, self.settings()))
            .collect();

        self.session_index().write_all(&records)?;
        log_failures(&report);
        trace_time!(start, "rebuild_session_index", records = records.len());

        Ok(RebuildReport {
            records: records.len(),
            failures: report.failures,
        })
    }

    /// Rewrite the task index from every status directory
    #[tracing::instrument(skip(self))]
    pub fn rebuild_task_index(&self) -> Result<RebuildReport> {
        let start = Instant::now();
        let report = self.load_tasks()?;
        let records: Vec<TaskRecord> = report
            .items
            .iter()
            .map(|task| TaskRecord::from_task(task, self.settings()))
            .collect();

        self.task_index().write_all(&records)?;
        log_failures(&report);
        trace_time!(start, "rebuild_task_index", records = records.len());

        Ok(RebuildReport {
            records: records.len(),
            failures: report.failures,
        })
    }

    /// Session records for listing; a never-built index is built first
    pub fn session_records(&self) -> Result<IndexRead<SessionRecord>> {
        let index = self.session_index();
        if !index.exists() {
            self.rebuild_session_index()?;
        }
        index.read_all()
    }

    /// Task records for listing; a never-built index is built first
    pub fn task_records(&self) -> Result<IndexRead<TaskRecord>> {
        let index = self.task_index();
        if !index.exists() {
            self.rebuild_task_index()?;
        }
        index.read_all()
    }

    pub(crate) fn append_session_index(&self, session: &Session) {
        let record = SessionRecord::from_session(session, self.settings());
        if let Err(e) = self.session_index().append(&record) {
            tracing::warn!(error = %e, "failed to append to session index");
        }
    }

    pub(crate) fn append_task_index(&self, task: &Task) {
        let record = TaskRecord::from_task(task, self.settings());
        if let Err(e) = self.task_index().append(&record) {
            tracing::warn!(error = %e, "failed to append to task index");
        }
    }

    /// Rebuild after a mutation; the mutation already succeeded, so failures only warn
    pub(crate) fn refresh_session_index(&self) {
        if let Err(e) = self.rebuild_session_index() {
            tracing::warn!(error = %e, "failed to rebuild session index");
        }
    }

    pub(crate) fn refresh_task_index(&self) {
        if let Err(e) = self.rebuild_task_index() {
            tracing::warn!(error = %e, "failed to rebuild task index");
        }
    }
}

fn log_failures<T>(report: &LoadReport<T>) {
    if let Some(diagnostic) = report.diagnostic() {
        tracing::warn!("left out of index: {}", diagnostic);
    }
}
