//! Identifiers and canonical filenames
//!
//! - Session IDs: 12 random lowercase hex characters, e.g. `3f9a1c0d2b7e`
//! - Task IDs: the same with a `task-` prefix, e.g. `task-07be91aa4c3d`
//! - Filenames: `YYYY-MM-DD_<slug>.md`

use chrono::{DateTime, Utc};

/// Prefix distinguishing task IDs from session IDs
pub const TASK_ID_PREFIX: &str = "task-";

/// Slug used when a title has no permitted characters
pub const UNTITLED: &str = "untitled";

/// Number of random bytes in a generated ID
const ID_BYTES: usize = 6;

/// Random lowercase hex identifier.
///
/// Draws from the random component of a fresh ULID, so consecutive calls in
/// the same millisecond still differ.
pub fn random_hex() -> String {
    let random = ulid::Ulid::new().random().to_be_bytes();
    hex::encode(&random[random.len() - ID_BYTES..])
}

/// Generate a session ID
pub fn session_id() -> String {
    random_hex()
}

/// Generate a task ID
pub fn task_id() -> String {
    format!("{}{}", TASK_ID_PREFIX, random_hex())
}

/// Filesystem-safe form of a title.
///
/// Lower-cases, turns spaces into hyphens and drops every other character
/// that is not alphanumeric, `-` or `_`.
pub fn slugify(title: &str) -> String {
    let slug: String = title
        .to_lowercase()
        .chars()
        .filter_map(|c| match c {
            ' ' => Some('-'),
            '-' | '_' => Some(c),
            c if c.is_alphanumeric() => Some(c),
            _ => None,
        })
        .collect();

    if slug.is_empty() {
        UNTITLED.to_string()
    } else {
        slug
    }
}

/// Canonical filename for a record created at `date` with the given title
pub fn filename(date: Option<DateTime<Utc>>, title: &str) -> String {
    let date = date.unwrap_or_else(Utc::now);
    format!("{}_{}.md", date.format("%Y-%m-%d"), slugify(title))
}
