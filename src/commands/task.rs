//! `logbook task` - create, track and close tasks

use logbook_core::bail_usage;
use logbook_core::document::{extract_sections, relative_to};
use logbook_core::error::Result;
use logbook_core::index::TaskRecord;
use logbook_core::store::Store;
use logbook_core::task::{Task, TaskField, TaskMeta, TaskStatus};

use crate::cli::args::NewTaskArgs;
use crate::cli::{OutputFormat, TaskCommands};
use crate::commands::dispatch::CommandContext;
use crate::commands::format::{
    format_date, join_or_dash, or_dash, print_json, print_purge, print_table,
};
use crate::commands::io::read_body;

pub fn execute(ctx: &CommandContext, command: &TaskCommands) -> Result<()> {
    let store = ctx.open_store()?;

    match command {
        TaskCommands::New(args) => new(ctx, &store, args),
        TaskCommands::List {
            status,
            tag,
            search,
        } => list(ctx, &store, *status, tag.as_deref(), search.as_deref()),
        TaskCommands::Search { query } => list(ctx, &store, None, None, Some(query)),
        TaskCommands::Show { query, summary } => show(ctx, &store, query, *summary),
        TaskCommands::Update { query, fields } => {
            // Reject every bad assignment before touching the file
            let fields = fields
                .iter()
                .map(|f| f.parse::<TaskField>())
                .collect::<Result<Vec<_>>>()?;
            let task = store.update_task(query, &fields)?;
            print_done(ctx, "Updated", &task)
        }
        TaskCommands::Delete { query } => {
            let task = store.delete_task(query)?;
            print_done(ctx, "Deleted", &task)
        }
        TaskCommands::Purge { status, yes } => {
            if !yes {
                bail_usage!(format!(
                    "purge permanently deletes every {} task; pass --yes to confirm",
                    status
                ));
            }
            let report = store.purge_tasks(*status)?;
            print_purge(ctx, &report, &format!("{} task(s)", status))
        }
    }
}

fn new(ctx: &CommandContext, store: &Store, args: &NewTaskArgs) -> Result<()> {
    let mut meta = TaskMeta::new(&args.title)
        .with_tags(&args.tag)
        .with_related(&args.related);
    for session in &args.session {
        meta = meta.with_session(session);
    }
    if let Some(status) = args.status {
        meta = meta.with_status(status);
    }
    if let Some(priority) = args.priority {
        meta = meta.with_priority(priority);
    }
    if let Some(assignee) = &args.assignee {
        meta = meta.with_assignee(assignee);
    }
    if let Some(id) = &args.id {
        meta.id = id.clone();
    }

    let body = read_body(&args.body, || store.settings().task_template())?;
    let task = store.save_task(meta, body)?;
    print_done(ctx, "Created", &task)
}

fn list(
    ctx: &CommandContext,
    store: &Store,
    status: Option<TaskStatus>,
    tag: Option<&str>,
    search: Option<&str>,
) -> Result<()> {
    let read = store.task_records()?;
    if let Some(error) = read.error {
        tracing::warn!(error = %error, "task index is damaged; run `logbook index rebuild`");
    }

    let records: Vec<TaskRecord> = read
        .records
        .into_iter()
        .filter(|r| status.is_none_or(|s| r.meta.status() == s))
        .filter(|r| tag.is_none_or(|t| r.meta.tags.iter().any(|x| x == t)))
        .filter(|r| search.is_none_or(|q| r.matches(q)))
        .collect();

    match ctx.cli.format {
        OutputFormat::Json => print_json(&records),
        OutputFormat::Human => {
            let rows: Vec<Vec<String>> = records
                .iter()
                .map(|r| {
                    vec![
                        r.filename.clone(),
                        r.meta.status().to_string(),
                        r.meta.priority().to_string(),
                        r.meta.title.clone(),
                        or_dash(&r.meta.assignee).to_string(),
                    ]
                })
                .collect();
            print_table(
                ctx,
                &["FILENAME", "STATUS", "PRIORITY", "TITLE", "ASSIGNEE"],
                &rows,
                "No tasks",
            );
            Ok(())
        }
    }
}

fn show(ctx: &CommandContext, store: &Store, query: &str, summary: bool) -> Result<()> {
    let task = store.get_task(query)?;
    let body = if summary {
        extract_sections(&task.body, &store.settings().task_summary_sections)
    } else {
        task.body.clone()
    };
    let path = task
        .path
        .as_deref()
        .map(|p| relative_to(p, &ctx.root).display().to_string())
        .unwrap_or_default();

    match ctx.cli.format {
        OutputFormat::Json => {
            let mut value = serde_json::to_value(&task.meta)?;
            value["filename"] = serde_json::json!(task.filename());
            value["path"] = serde_json::json!(path);
            value["body"] = serde_json::json!(body);
            print_json(&value)
        }
        OutputFormat::Human => {
            let meta = &task.meta;
            println!("{}", task.filename());
            println!("id:        {}", or_dash(&meta.id));
            println!("date:      {}", format_date(meta.date));
            println!("title:     {}", or_dash(&meta.title));
            println!("status:    {}", meta.status());
            println!("priority:  {}", meta.priority());
            println!("assignee:  {}", or_dash(&meta.assignee));
            println!("sessions:  {}", join_or_dash(&meta.sessions));
            println!("related:   {}", join_or_dash(&meta.related_tasks));
            println!("tags:      {}", join_or_dash(&meta.tags));
            println!("completed: {}", format_date(meta.completed));
            println!("path:      {}", path);
            println!();
            println!("{}", body.trim_end());
            Ok(())
        }
    }
}

fn print_done(ctx: &CommandContext, verb: &str, task: &Task) -> Result<()> {
    match ctx.cli.format {
        OutputFormat::Json => print_json(&serde_json::json!({
            "id": task.id(),
            "filename": task.filename(),
            "status": task.status(),
            "path": task.path,
        })),
        OutputFormat::Human => {
            if !ctx.cli.quiet {
                println!("{} {} [{}]", verb, task.filename(), task.status());
            }
            Ok(())
        }
    }
}
