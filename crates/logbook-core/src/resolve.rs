//! Fuzzy name resolution shared by sessions and tasks
//!
//! A query is compared, case-insensitively, against every name facet of every
//! candidate (filename, filename stem, title/topic, ID). A single exact match
//! wins outright; otherwise exact and partial matches are returned together
//! and the caller decides between "not found", "found" and "ambiguous".

use crate::error::{LogbookError, Result};

/// Candidates matching `query`, exact matches first.
///
/// Returns only the exact match when there is exactly one, even if other
/// candidates contain the query as a substring.
pub fn resolve<'a, T, F>(query: &str, candidates: &'a [T], facets: F) -> Vec<&'a T>
where
    F: Fn(&T) -> Vec<String>,
{
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return Vec::new();
    }

    let mut exact = Vec::new();
    let mut partial = Vec::new();

    for candidate in candidates {
        let names: Vec<String> = facets(candidate)
            .into_iter()
            .map(|name| name.to_lowercase())
            .collect();

        if names.iter().any(|name| *name == needle) {
            exact.push(candidate);
        } else if names.iter().any(|name| name.contains(&needle)) {
            partial.push(candidate);
        }
    }

    if exact.len() == 1 {
        return exact;
    }

    exact.extend(partial);
    exact
}

/// Resolve `query` to exactly one candidate.
///
/// `label` renders a candidate for the numbered list carried by
/// [`LogbookError::Ambiguous`].
pub fn resolve_one<'a, T, F, L>(
    kind: &str,
    query: &str,
    candidates: &'a [T],
    facets: F,
    label: L,
) -> Result<&'a T>
where
    F: Fn(&T) -> Vec<String>,
    L: Fn(&T) -> String,
{
    let mut matches = resolve(query, candidates, facets);
    match matches.len() {
        0 => Err(LogbookError::not_found(kind, query)),
        1 => Ok(matches.remove(0)),
        _ => Err(LogbookError::Ambiguous {
            kind: kind.to_string(),
            query: query.to_string(),
            candidates: matches.into_iter().map(label).collect(),
        }),
    }
}
