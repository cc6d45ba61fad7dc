use clap::{Args, Subcommand};
use logbook_core::task::{Priority, TaskStatus};

use super::parse::{parse_priority, parse_status};

/// Where a new document's body comes from
#[derive(Args, Debug, Clone, Default)]
pub struct BodyArgs {
    /// Body text (defaults to the configured section template)
    #[arg(long, conflicts_with = "stdin")]
    pub body: Option<String>,

    /// Read the body from stdin
    #[arg(long)]
    pub stdin: bool,
}

#[derive(Args, Debug, Clone)]
pub struct NewSessionArgs {
    /// Session topic
    pub topic: String,

    /// Human or agent writing the session
    #[arg(long, short)]
    pub agent: Option<String>,

    /// Tags (can be specified multiple times)
    #[arg(long, short, action = clap::ArgAction::Append)]
    pub tag: Vec<String>,

    /// Linked task filenames (can be specified multiple times)
    #[arg(long, action = clap::ArgAction::Append)]
    pub task: Vec<String>,

    /// Related session filenames (can be specified multiple times)
    #[arg(long, action = clap::ArgAction::Append)]
    pub related: Vec<String>,

    /// Session ID (generated when omitted)
    #[arg(long)]
    pub id: Option<String>,

    #[command(flatten)]
    pub body: BodyArgs,
}

#[derive(Args, Debug, Clone)]
pub struct NewTaskArgs {
    /// Task title
    pub title: String,

    /// Initial status (defaults to the configured status)
    #[arg(long, short, value_parser = parse_status)]
    pub status: Option<TaskStatus>,

    /// Priority (defaults to the configured priority)
    #[arg(long, short, value_parser = parse_priority)]
    pub priority: Option<Priority>,

    /// Assignee
    #[arg(long)]
    pub assignee: Option<String>,

    /// Linked session filenames; the first is the primary session
    #[arg(long, action = clap::ArgAction::Append)]
    pub session: Vec<String>,

    /// Tags (can be specified multiple times)
    #[arg(long, short, action = clap::ArgAction::Append)]
    pub tag: Vec<String>,

    /// Related task filenames (can be specified multiple times)
    #[arg(long, action = clap::ArgAction::Append)]
    pub related: Vec<String>,

    /// Task ID (generated when omitted)
    #[arg(long)]
    pub id: Option<String>,

    #[command(flatten)]
    pub body: BodyArgs,
}

#[derive(Subcommand, Debug)]
pub enum SessionCommands {
    /// Record a new session
    New(NewSessionArgs),

    /// List sessions
    List {
        /// Filter by tag
        #[arg(long, short)]
        tag: Option<String>,

        /// Filter by text in names, tags and excerpt
        #[arg(long)]
        search: Option<String>,

        /// List archived sessions instead
        #[arg(long)]
        archived: bool,
    },

    /// Search sessions by names, tags and excerpt
    Search {
        /// Search text
        query: String,
    },

    /// Show a session
    Show {
        /// Filename, topic or ID (partial matches allowed)
        query: String,

        /// Only the configured summary sections
        #[arg(long)]
        summary: bool,
    },

    /// Change session fields (agent, tag, untag, topic, task, related)
    Update {
        /// Filename, topic or ID (partial matches allowed)
        query: String,

        /// Assignments as name=value
        #[arg(required = true)]
        fields: Vec<String>,
    },

    /// Move sessions into the archive
    Archive {
        /// Filenames, topics or IDs
        #[arg(required = true)]
        queries: Vec<String>,
    },

    /// Permanently delete an active session
    Delete {
        /// Filename, topic or ID (partial matches allowed)
        query: String,
    },

    /// Permanently delete every archived session
    Purge {
        /// Confirm the deletion
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Subcommand, Debug)]
pub enum TaskCommands {
    /// Create a task
    New(NewTaskArgs),

    /// List tasks
    List {
        /// Filter by status
        #[arg(long, short, value_parser = parse_status)]
        status: Option<TaskStatus>,

        /// Filter by tag
        #[arg(long, short)]
        tag: Option<String>,

        /// Filter by text in names, tags and excerpt
        #[arg(long)]
        search: Option<String>,
    },

    /// Search tasks by names, tags and excerpt
    Search {
        /// Search text
        query: String,
    },

    /// Show a task
    Show {
        /// Filename, title or ID (partial matches allowed)
        query: String,

        /// Only the configured summary sections
        #[arg(long)]
        summary: bool,
    },

    /// Change task fields (status, priority, assignee, session)
    Update {
        /// Filename, title or ID (partial matches allowed)
        query: String,

        /// Assignments as name=value
        #[arg(required = true)]
        fields: Vec<String>,
    },

    /// Permanently delete a task
    Delete {
        /// Filename, title or ID (partial matches allowed)
        query: String,
    },

    /// Permanently delete every task with the given status
    Purge {
        /// Status directory to empty
        #[arg(value_parser = parse_status)]
        status: TaskStatus,

        /// Confirm the deletion
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Subcommand, Debug)]
pub enum IndexCommands {
    /// Regenerate both index files from the documents
    Rebuild,
}
