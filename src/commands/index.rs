//! `logbook index rebuild` - regenerate both index files from the documents

use logbook_core::error::Result;
use logbook_core::index::RebuildReport;

use crate::cli::{IndexCommands, OutputFormat};
use crate::commands::dispatch::CommandContext;
use crate::commands::format::print_json;

pub fn execute(ctx: &CommandContext, command: &IndexCommands) -> Result<()> {
    match command {
        IndexCommands::Rebuild => rebuild(ctx),
    }
}

fn rebuild(ctx: &CommandContext) -> Result<()> {
    let store = ctx.open_store()?;
    let sessions = store.rebuild_session_index()?;
    let tasks = store.rebuild_task_index()?;

    for failure in sessions.failures.iter().chain(&tasks.failures) {
        eprintln!("warning: skipped {}: {}", failure.path.display(), failure.error);
    }

    match ctx.cli.format {
        OutputFormat::Json => print_json(&serde_json::json!({
            "status": "ok",
            "sessions_indexed": sessions.records,
            "tasks_indexed": tasks.records,
            "skipped": skipped(&sessions) + skipped(&tasks),
        })),
        OutputFormat::Human => {
            if !ctx.cli.quiet {
                println!(
                    "Indexed {} session(s) and {} task(s)",
                    sessions.records, tasks.records
                );
            }
            Ok(())
        }
    }
}

fn skipped(report: &RebuildReport) -> usize {
    report.failures.len()
}
