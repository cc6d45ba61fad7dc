//! `logbook session` - record, browse and retire work sessions

use logbook_core::bail_usage;
use logbook_core::document::{extract_sections, relative_to};
use logbook_core::error::Result;
use logbook_core::index::SessionRecord;
use logbook_core::session::{Session, SessionField, SessionMeta};
use logbook_core::store::{find_session, Store};

use crate::cli::args::NewSessionArgs;
use crate::cli::{OutputFormat, SessionCommands};
use crate::commands::dispatch::CommandContext;
use crate::commands::format::{
    format_date, join_or_dash, or_dash, print_json, print_purge, print_table,
};
use crate::commands::io::read_body;

pub fn execute(ctx: &CommandContext, command: &SessionCommands) -> Result<()> {
    let store = ctx.open_store()?;

    match command {
        SessionCommands::New(args) => new(ctx, &store, args),
        SessionCommands::List {
            tag,
            search,
            archived,
        } => list(ctx, &store, tag.as_deref(), search.as_deref(), *archived),
        SessionCommands::Search { query } => list(ctx, &store, None, Some(query), false),
        SessionCommands::Show { query, summary } => show(ctx, &store, query, *summary),
        SessionCommands::Update { query, fields } => update(ctx, &store, query, fields),
        SessionCommands::Archive { queries } => archive(ctx, &store, queries),
        SessionCommands::Delete { query } => {
            let session = store.delete_session(query)?;
            print_done(ctx, "Deleted", &session)
        }
        SessionCommands::Purge { yes } => {
            if !yes {
                bail_usage!("purge permanently deletes every archived session; pass --yes to confirm");
            }
            let report = store.purge_archived_sessions()?;
            print_purge(ctx, &report, "archived session(s)")
        }
    }
}

fn new(ctx: &CommandContext, store: &Store, args: &NewSessionArgs) -> Result<()> {
    let mut meta = SessionMeta::new(&args.topic)
        .with_tags(&args.tag)
        .with_tasks(&args.task)
        .with_related(&args.related);
    if let Some(agent) = &args.agent {
        meta = meta.with_agent(agent);
    }
    if let Some(id) = &args.id {
        meta.id = id.clone();
    }

    let body = read_body(&args.body, || store.settings().session_template())?;
    let session = store.save_session(meta, body)?;
    print_done(ctx, "Created", &session)
}

fn list(
    ctx: &CommandContext,
    store: &Store,
    tag: Option<&str>,
    search: Option<&str>,
    archived: bool,
) -> Result<()> {
    let records: Vec<SessionRecord> = if archived {
        store
            .load_archived_sessions()?
            .into_items()
            .iter()
            .map(|session| SessionRecord::from_session(session, store.settings()))
            .collect()
    } else {
        let read = store.session_records()?;
        if let Some(error) = read.error {
            tracing::warn!(error = %error, "session index is damaged; run `logbook index rebuild`");
        }
        read.records
    };

    let records: Vec<SessionRecord> = records
        .into_iter()
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
                        format_date(r.meta.date),
                        r.meta.topic.clone(),
                        join_or_dash(&r.meta.tags),
                    ]
                })
                .collect();
            print_table(ctx, &["FILENAME", "DATE", "TOPIC", "TAGS"], &rows, "No sessions");
            Ok(())
        }
    }
}

fn show(ctx: &CommandContext, store: &Store, query: &str, summary: bool) -> Result<()> {
    let session = store.get_session(query)?;
    let body = if summary {
        extract_sections(&session.body, &store.settings().session_summary_sections)
    } else {
        session.body.clone()
    };
    let path = session
        .path
        .as_deref()
        .map(|p| relative_to(p, &ctx.root).display().to_string())
        .unwrap_or_default();

    match ctx.cli.format {
        OutputFormat::Json => {
            let mut value = serde_json::to_value(&session.meta)?;
            value["filename"] = serde_json::json!(session.filename());
            value["path"] = serde_json::json!(path);
            value["body"] = serde_json::json!(body);
            print_json(&value)
        }
        OutputFormat::Human => {
            let meta = &session.meta;
            println!("{}", session.filename());
            println!("id:      {}", or_dash(&meta.id));
            println!("date:    {}", format_date(meta.date));
            println!("topic:   {}", or_dash(&meta.topic));
            println!("agent:   {}", or_dash(&meta.agent));
            println!("tags:    {}", join_or_dash(&meta.tags));
            println!("tasks:   {}", join_or_dash(&meta.tasks));
            println!("related: {}", join_or_dash(&meta.related_sessions));
            println!("path:    {}", path);
            println!();
            println!("{}", body.trim_end());
            Ok(())
        }
    }
}

fn update(ctx: &CommandContext, store: &Store, query: &str, fields: &[String]) -> Result<()> {
    // Reject every bad assignment before touching the file
    let fields = fields
        .iter()
        .map(|f| f.parse::<SessionField>())
        .collect::<Result<Vec<_>>>()?;

    let session = store.update_session(query, &fields)?;
    print_done(ctx, "Updated", &session)
}

fn archive(ctx: &CommandContext, store: &Store, queries: &[String]) -> Result<()> {
    // Resolve everything first so a typo archives nothing
    let sessions = store.load_sessions()?.into_items();
    let filenames = queries
        .iter()
        .map(|q| find_session(q, &sessions).map(Session::filename))
        .collect::<Result<Vec<_>>>()?;

    let outcome = store.archive_sessions(filenames.iter().map(String::as_str))?;
    for (filename, reason) in &outcome.failures {
        eprintln!("warning: could not archive {}: {}", filename, reason);
    }

    match ctx.cli.format {
        OutputFormat::Json => {
            let archived: Vec<_> = outcome
                .archived
                .iter()
                .map(|(from, to)| serde_json::json!({ "from": from, "to": to }))
                .collect();
            let failed: Vec<_> = outcome
                .failures
                .iter()
                .map(|(filename, reason)| serde_json::json!({ "filename": filename, "reason": reason }))
                .collect();
            print_json(&serde_json::json!({ "archived": archived, "failed": failed }))
        }
        OutputFormat::Human => {
            if !ctx.cli.quiet {
                for (_, to) in &outcome.archived {
                    println!("Archived {}", relative_to(to, &ctx.root).display());
                }
            }
            Ok(())
        }
    }
}

fn print_done(ctx: &CommandContext, verb: &str, session: &Session) -> Result<()> {
    match ctx.cli.format {
        OutputFormat::Json => print_json(&serde_json::json!({
            "id": session.id(),
            "filename": session.filename(),
            "path": session.path,
        })),
        OutputFormat::Human => {
            if !ctx.cli.quiet {
                println!("{} {}", verb, session.filename());
            }
            Ok(())
        }
    }
}
