//! Best-effort directory scans
//!
//! A scan never stops at a bad document: it returns every record that parsed
//! together with one failure entry per document that did not.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use super::paths::DOCUMENT_EXT;
use crate::error::{LogbookError, Result};

/// A document that could not be loaded
#[derive(Debug)]
pub struct ScanFailure {
    /// File that failed
    pub path: PathBuf,
    /// Why it failed
    pub error: LogbookError,
}

/// Records loaded by a scan, plus per-document failures
#[derive(Debug)]
pub struct LoadReport<T> {
    /// Successfully parsed records, in filename order
    pub items: Vec<T>,
    /// Documents that failed to load
    pub failures: Vec<ScanFailure>,
}

impl<T> Default for LoadReport<T> {
    fn default() -> Self {
        LoadReport {
            items: Vec::new(),
            failures: Vec::new(),
        }
    }
}

impl<T> LoadReport<T> {
    /// Combined description of every failure, if there were any
    pub fn diagnostic(&self) -> Option<String> {
        if self.failures.is_empty() {
            return None;
        }

        let mut out = format!("{} document(s) failed to load:", self.failures.len());
        for failure in &self.failures {
            out.push_str(&format!("\n  {}: {}", failure.path.display(), failure.error));
        }
        Some(out)
    }

    /// Take the records, logging each failure as a warning
    pub fn into_items(self) -> Vec<T> {
        for failure in &self.failures {
            tracing::warn!(
                path = %failure.path.display(),
                error = %failure.error,
                "skipping unreadable document"
            );
        }
        self.items
    }

    pub(crate) fn merge(&mut self, other: LoadReport<T>) {
        self.items.extend(other.items);
        self.failures.extend(other.failures);
    }
}

/// Markdown files directly inside `dir`, sorted by filename.
///
/// A missing directory has no files. Subdirectories are not descended into.
/// An entry that cannot be read (a dangling symlink, say) becomes a failure
/// and the walk carries on.
pub(crate) fn document_files(dir: &Path) -> LoadReport<PathBuf> {
    let mut report = LoadReport::default();
    if !dir.exists() {
        return report;
    }

    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .sort_by_file_name()
    {
        match entry {
            Ok(entry) => {
                let path = entry.path();
                if entry.file_type().is_file() && is_document(path) {
                    report.items.push(path.to_path_buf());
                }
            }
            Err(err) => {
                let path = err.path().map(Path::to_path_buf).unwrap_or_else(|| dir.to_path_buf());
                if err.path().is_some_and(|p| !is_document(p)) {
                    tracing::debug!(path = %path.display(), error = %err, "skipping unreadable entry");
                    continue;
                }
                report.failures.push(ScanFailure {
                    path,
                    error: LogbookError::Io(std::io::Error::from(err)),
                });
            }
        }
    }

    report
}

fn is_document(path: &Path) -> bool {
    path.extension().is_some_and(|e| e == DOCUMENT_EXT)
}

/// Parse every document in `dir`, collecting failures instead of aborting
pub(crate) fn load_dir<T, F>(dir: &Path, parse: F) -> LoadReport<T>
where
    F: Fn(&Path) -> Result<T>,
{
    let files = document_files(dir);
    let mut report = LoadReport {
        items: Vec::new(),
        failures: files.failures,
    };

    for path in files.items {
        match parse(&path) {
            Ok(item) => report.items.push(item),
            Err(error) => report.failures.push(ScanFailure { path, error }),
        }
    }

    report
}
