//! `logbook gc` - find stale sessions and archive them
//!
//! Without `--apply` this is a dry run that only lists candidates.

use chrono::Utc;
use logbook_core::document::relative_to;
use logbook_core::error::Result;
use logbook_core::retention::{self, GcPlan, RetentionPolicy, Verdict};
use logbook_core::store::ArchiveOutcome;

use crate::cli::OutputFormat;
use crate::commands::dispatch::CommandContext;
use crate::commands::format::print_json;

pub fn execute(
    ctx: &CommandContext,
    apply: bool,
    orphan_days: Option<i64>,
    linked_days: Option<i64>,
) -> Result<()> {
    let store = ctx.open_store()?;

    let mut policy = RetentionPolicy::from(&store.settings().gc);
    if let Some(days) = orphan_days {
        policy.orphan_threshold_days = days;
    }
    if let Some(days) = linked_days {
        policy.linked_threshold_days = days;
    }

    let plan = retention::plan(&store, &policy, Utc::now())?;
    let outcome = if apply {
        Some(retention::apply(&store, &plan)?)
    } else {
        None
    };

    if let Some(outcome) = &outcome {
        for (filename, reason) in &outcome.failures {
            eprintln!("warning: could not archive {}: {}", filename, reason);
        }
    }

    match ctx.cli.format {
        OutputFormat::Json => print_json(&serde_json::json!({
            "apply": apply,
            "sessions": plan.entries,
            "archived": outcome
                .as_ref()
                .map(|o| o.archived.iter().map(|(_, to)| to.clone()).collect::<Vec<_>>())
                .unwrap_or_default(),
        })),
        OutputFormat::Human => {
            print_human(ctx, &plan, outcome.as_ref());
            Ok(())
        }
    }
}

fn print_human(ctx: &CommandContext, plan: &GcPlan, outcome: Option<&ArchiveOutcome>) {
    let candidates: Vec<_> = plan.candidates().collect();
    if candidates.is_empty() {
        if !ctx.cli.quiet {
            println!("No sessions to archive");
        }
        return;
    }

    for entry in &candidates {
        if let Verdict::Candidate { tier, reason } = &entry.verdict {
            println!("[{}] {}  {}", tier, entry.filename, reason);
        }
    }

    if ctx.cli.verbose {
        for entry in plan.entries.iter().filter(|e| !e.verdict.is_candidate()) {
            println!("[keep] {}  {}", entry.filename, entry.verdict.reason());
        }
    }

    if ctx.cli.quiet {
        return;
    }
    match outcome {
        Some(outcome) => {
            for (_, to) in &outcome.archived {
                println!("Archived {}", relative_to(to, &ctx.root).display());
            }
        }
        None => println!(
            "{} candidate(s); run with --apply to archive",
            candidates.len()
        ),
    }
}
