//! Secondary index: one JSON-lines cache file per entity kind
//!
//! The index is advisory. It may lag behind the documents at any time and is
//! never consulted for mutation decisions, only for listing and search.
//! [`Store::rebuild_session_index`](crate::store::Store::rebuild_session_index)
//! and its task counterpart re-derive it from the documents.

pub mod builder;
pub mod records;

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{LogbookError, Result};

pub use builder::RebuildReport;
pub use records::{IndexEntry, SessionRecord, TaskRecord};

/// Records read from an index file
#[derive(Debug)]
pub struct IndexRead<R> {
    /// Every record before the first unreadable line
    pub records: Vec<R>,
    /// The first unreadable line, if any
    pub error: Option<LogbookError>,
}

/// Handle on one index file
#[derive(Debug, Clone)]
pub struct IndexFile<R> {
    path: PathBuf,
    _record: PhantomData<fn() -> R>,
}

impl<R> IndexFile<R>
where
    R: Serialize + DeserializeOwned,
{
    pub fn new(path: impl Into<PathBuf>) -> Self {
        IndexFile {
            path: path.into(),
            _record: PhantomData,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// A missing file means the index was never built
    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Read every record, skipping blank lines.
    ///
    /// Stops at the first line that does not decode; the records read so
    /// far are returned along with that error.
    pub fn read_all(&self) -> Result<IndexRead<R>> {
        let content = fs::read_to_string(&self.path)
            .map_err(|e| LogbookError::io_operation("read index", self.path.display(), e))?;

        let mut records = Vec::new();
        for (n, line) in content.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str(line) {
                Ok(record) => records.push(record),
                Err(e) => {
                    let error = LogbookError::malformed(&self.path, format!("line {}: {}", n + 1, e));
                    return Ok(IndexRead {
                        records,
                        error: Some(error),
                    });
                }
            }
        }

        Ok(IndexRead {
            records,
            error: None,
        })
    }

    /// Append one record, creating the file and its directory if needed
    pub fn append(&self, record: &R) -> Result<()> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir)?;
        }

        let mut line = serde_json::to_string(record)?;
        line.push('\n');

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        file.write_all(line.as_bytes())?;
        Ok(())
    }

    /// Replace the whole file; zero records still leave an empty file
    pub fn write_all(&self, records: &[R]) -> Result<()> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir)?;
        }

        let mut content = String::new();
        for record in records {
            content.push_str(&serde_json::to_string(record)?);
            content.push('\n');
        }
        fs::write(&self.path, content)?;
        Ok(())
    }
}
