//! CLI argument parsing for logbook
//!
//! Global flags: --root, --store, --format, --quiet, --verbose, --log-level, --log-json

pub mod args;
pub mod output;
pub mod parse;
pub mod paths;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub use args::{IndexCommands, SessionCommands, TaskCommands};
pub use output::OutputFormat;

/// Logbook - plain-file session and task log
#[derive(Parser, Debug)]
#[command(name = "logbook")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Base directory for resolving the store
    #[arg(long, global = true)]
    pub root: Option<PathBuf>,

    /// Explicit store root path
    #[arg(long, global = true, env = "LOGBOOK_STORE")]
    pub store: Option<PathBuf>,

    /// Output format
    #[arg(long, global = true, value_enum, default_value = "human")]
    pub format: OutputFormat,

    /// Suppress non-essential output
    #[arg(long, short, global = true)]
    pub quiet: bool,

    /// Debug-level logging
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Log level filter (error, warn, info, debug, trace)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize a new logbook store
    Init,

    /// Work sessions
    #[command(subcommand)]
    Session(SessionCommands),

    /// Tasks
    #[command(subcommand)]
    Task(TaskCommands),

    /// Secondary index maintenance
    #[command(subcommand)]
    Index(IndexCommands),

    /// Find stale sessions and archive them
    Gc {
        /// Archive the candidates instead of only listing them
        #[arg(long)]
        apply: bool,

        /// Override the orphan threshold (days)
        #[arg(long)]
        orphan_days: Option<i64>,

        /// Override the linked-task threshold (days)
        #[arg(long)]
        linked_days: Option<i64>,
    },
}
