//! Shared output helpers for human and JSON rendering

use chrono::{DateTime, Utc};
use serde::Serialize;

use logbook_core::error::Result;
use logbook_core::store::PurgeReport;

use crate::cli::OutputFormat;
use crate::commands::dispatch::CommandContext;

/// Pretty-print a value as JSON on stdout
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Calendar date, or `-` when unset
pub fn format_date(date: Option<DateTime<Utc>>) -> String {
    date.map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "-".to_string())
}

/// Comma-separated list, or `-` when empty
pub fn join_or_dash(items: &[String]) -> String {
    if items.is_empty() {
        "-".to_string()
    } else {
        items.join(", ")
    }
}

/// Text or `-` when empty
pub fn or_dash(text: &str) -> &str {
    if text.is_empty() {
        "-"
    } else {
        text
    }
}

/// Left-aligned columns separated by two spaces
pub fn render_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            if let Some(width) = widths.get_mut(i) {
                *width = (*width).max(cell.chars().count());
            }
        }
    }

    let render_row = |cells: Vec<&str>| {
        let mut line = String::new();
        for (i, cell) in cells.iter().enumerate() {
            if i > 0 {
                line.push_str("  ");
            }
            line.push_str(cell);
            let width = widths.get(i).copied().unwrap_or(0);
            let pad = width.saturating_sub(cell.chars().count());
            line.push_str(&" ".repeat(pad));
        }
        line.trim_end().to_string()
    };

    let mut out = render_row(headers.to_vec());
    for row in rows {
        out.push('\n');
        out.push_str(&render_row(row.iter().map(String::as_str).collect()));
    }
    out
}

/// Print a table, or `empty` when there are no rows
pub fn print_table(ctx: &CommandContext, headers: &[&str], rows: &[Vec<String>], empty: &str) {
    if rows.is_empty() {
        if !ctx.cli.quiet {
            println!("{}", empty);
        }
        return;
    }
    println!("{}", render_table(headers, rows));
}

/// Report the outcome of a bulk delete
pub fn print_purge(ctx: &CommandContext, report: &PurgeReport, what: &str) -> Result<()> {
    for (path, reason) in &report.failed {
        eprintln!("warning: could not delete {}: {}", path.display(), reason);
    }

    match ctx.cli.format {
        OutputFormat::Json => {
            let failed: Vec<_> = report
                .failed
                .iter()
                .map(|(path, reason)| serde_json::json!({ "path": path, "reason": reason }))
                .collect();
            print_json(&serde_json::json!({
                "removed": report.removed.len(),
                "failed": failed,
            }))
        }
        OutputFormat::Human => {
            if !ctx.cli.quiet {
                println!("Purged {} {}", report.removed.len(), what);
            }
            Ok(())
        }
    }
}
