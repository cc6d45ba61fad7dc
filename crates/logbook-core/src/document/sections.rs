//! Heading parsing, excerpts and section slicing for document bodies

use std::sync::OnceLock;

use regex::Regex;

/// Marker appended to a truncated excerpt
pub const ELLIPSIS: &str = "...";

static HEADING_RE: OnceLock<Regex> = OnceLock::new();

fn heading_re() -> &'static Regex {
    // 1-6 hashes and a space; extra spaces end up trimmed from the title
    HEADING_RE.get_or_init(|| Regex::new(r"^(#{1,6}) (.*)$").expect("valid heading regex"))
}

/// An ATX-style markdown heading
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Heading {
    /// Number of leading `#` characters (1-6)
    pub level: usize,
    /// Trimmed heading text
    pub title: String,
}

impl Heading {
    fn is_named(&self, name: &str) -> bool {
        self.title.to_lowercase() == name.to_lowercase()
    }
}

/// Parse a single line as a heading, if it is one
pub fn parse_heading(line: &str) -> Option<Heading> {
    let line = line.trim_end_matches('\r');
    let caps = heading_re().captures(line)?;
    Some(Heading {
        level: caps[1].len(),
        title: caps[2].trim().to_string(),
    })
}

/// Text of the named section, without its heading line.
///
/// The section runs until the next heading at the same or a shallower level;
/// deeper headings stay inside it.
fn section_text(body: &str, name: &str) -> Option<String> {
    let mut level = None;
    let mut lines = Vec::new();

    for line in body.lines() {
        let heading = parse_heading(line);
        match (level, &heading) {
            (Some(current), Some(h)) if h.level <= current => break,
            (Some(_), _) => lines.push(line),
            (None, Some(h)) if h.is_named(name) => level = Some(h.level),
            (None, _) => {}
        }
    }

    level.map(|_| lines.join("\n").trim().to_string())
}

/// Bounded snippet of the named section.
///
/// Falls back to the whole trimmed body when the section is missing or empty.
pub fn excerpt(body: &str, section: &str, max_chars: usize) -> String {
    let text = section_text(body, section)
        .filter(|text| !text.is_empty())
        .unwrap_or_else(|| body.trim().to_string());
    truncate_chars(&text, max_chars)
}

/// Truncate to `max_chars` Unicode scalar values, appending an ellipsis when cut
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => format!("{}{}", &text[..byte_idx], ELLIPSIS),
        None => text.to_string(),
    }
}

/// Keep only the wanted sections (heading line included), in document order.
///
/// An empty `wanted` list returns the body unchanged. Names that match nothing
/// simply contribute nothing.
pub fn extract_sections(body: &str, wanted: &[String]) -> String {
    if wanted.is_empty() {
        return body.to_string();
    }

    let mut active: Option<usize> = None;
    let mut kept = Vec::new();

    for line in body.lines() {
        if let Some(heading) = parse_heading(line) {
            if active.is_some_and(|level| heading.level <= level) {
                active = None;
            }
            if active.is_none() && wanted.iter().any(|name| heading.is_named(name)) {
                active = Some(heading.level);
            }
        }
        if active.is_some() {
            kept.push(line);
        }
    }

    kept.join("\n").trim_end().to_string()
}
