//! Document codec
//!
//! Every record is a markdown file that opens with a `---` line, carries a
//! YAML metadata block, closes it with another `---` line and continues with
//! a free-form body:
//!
//! ```text
//! ---
//! id: 3f9a1c0d2b7e
//! topic: auth rewrite
//! ---
//!
//! ## Summary
//! ...
//! ```

pub mod sections;

use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{LogbookError, Result};

pub use sections::{excerpt, extract_sections, parse_heading, Heading};

/// Metadata block delimiter line
pub const DELIMITER: &str = "---";

/// Split raw document text into its metadata block and body.
///
/// The body is returned verbatim, starting right after the closing delimiter line.
pub fn split<'a>(content: &'a str, path: Option<&Path>) -> Result<(&'a str, &'a str)> {
    let malformed = |reason: &str| {
        LogbookError::malformed(path.map(Path::to_path_buf).unwrap_or_default(), reason)
    };

    let (first, mut rest) = split_line(content);
    if !is_delimiter(first) {
        return Err(malformed("missing opening delimiter (---)"));
    }

    let meta_start = content.len() - rest.len();
    while !rest.is_empty() {
        let line_start = content.len() - rest.len();
        let (line, next) = split_line(rest);
        if is_delimiter(line) {
            return Ok((&content[meta_start..line_start], next));
        }
        rest = next;
    }

    Err(malformed("missing closing delimiter (---)"))
}

/// Parse a document into typed metadata and its body
#[tracing::instrument(skip(content), fields(path = ?path))]
pub fn parse<T: DeserializeOwned>(content: &str, path: Option<&Path>) -> Result<(T, String)> {
    let (meta, body) = split(content, path)?;

    let meta: T = serde_yaml::from_str(meta).map_err(|e| {
        LogbookError::malformed(path.map(Path::to_path_buf).unwrap_or_default(), e.to_string())
    })?;

    Ok((meta, body.to_string()))
}

/// Serialize metadata and body back into document text.
///
/// A body that does not already start with a newline gets one, so the
/// metadata block is always followed by a blank line.
pub fn serialize<T: Serialize>(meta: &T, body: &str) -> Result<String> {
    let yaml = serde_yaml::to_string(meta)?;

    let mut out = String::with_capacity(yaml.len() + body.len() + 10);
    out.push_str(DELIMITER);
    out.push('\n');
    out.push_str(&yaml);
    if !yaml.ends_with('\n') {
        out.push('\n');
    }
    out.push_str(DELIMITER);
    out.push('\n');
    out.push_str(&normalize_body(body));

    Ok(out)
}

/// The body exactly as [`serialize`] writes it and [`parse`] reads it back
pub fn normalize_body(body: &str) -> String {
    if body.starts_with('\n') {
        body.to_string()
    } else {
        format!("\n{}", body)
    }
}

/// Read and parse a document from disk
pub fn read<T: DeserializeOwned>(path: &Path) -> Result<(T, String)> {
    let content = std::fs::read_to_string(path)?;
    parse(&content, Some(path))
}

/// Path of a document file relative to `base`, for display and indexing
pub fn relative_to(path: &Path, base: &Path) -> PathBuf {
    path.strip_prefix(base).unwrap_or(path).to_path_buf()
}

fn split_line(s: &str) -> (&str, &str) {
    match s.find('\n') {
        Some(i) => (&s[..i], &s[i + 1..]),
        None => (s, ""),
    }
}

fn is_delimiter(line: &str) -> bool {
    line.trim_end_matches('\r') == DELIMITER
}
