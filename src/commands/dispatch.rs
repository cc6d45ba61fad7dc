//! Command dispatch logic for logbook

use std::path::PathBuf;
use std::time::Instant;

use logbook_core::error::Result;
use logbook_core::store::Store;
use tracing::debug;

use crate::cli::paths::{resolve_root_path, resolve_store_path};
use crate::cli::{Cli, Commands};
use crate::commands::{gc, index, init, session, task};

/// Shared context for command execution
pub struct CommandContext<'a> {
    pub cli: &'a Cli,
    pub root: PathBuf,
    pub start: Instant,
}

impl<'a> CommandContext<'a> {
    pub fn new(cli: &'a Cli, root: PathBuf, start: Instant) -> Self {
        Self { cli, root, start }
    }

    /// Explicit `--store` path, resolved against the root
    pub fn store_path(&self) -> Option<PathBuf> {
        self.cli
            .store
            .as_deref()
            .map(|path| resolve_store_path(path, &self.root))
    }

    /// Open the `--store` path, or discover a store above the root
    pub fn open_store(&self) -> Result<Store> {
        let store = match self.store_path() {
            Some(path) => Store::open(&path)?,
            None => Store::discover(&self.root)?,
        };
        debug!(elapsed = ?self.start.elapsed(), store = %store.root().display(), "open_store");
        Ok(store)
    }
}

pub fn run(cli: &Cli, start: Instant) -> Result<()> {
    let root = resolve_root_path(cli.root.clone());
    debug!(elapsed = ?start.elapsed(), "resolve_root");

    let ctx = CommandContext::new(cli, root, start);

    match &cli.command {
        None => {
            println!("logbook {}", env!("CARGO_PKG_VERSION"));
            println!();
            println!("A plain-file log of work sessions and tasks.");
            println!();
            println!("Run `logbook --help` for usage information.");
            Ok(())
        }
        Some(Commands::Init) => init::execute(&ctx),
        Some(Commands::Session(command)) => session::execute(&ctx, command),
        Some(Commands::Task(command)) => task::execute(&ctx, command),
        Some(Commands::Index(command)) => index::execute(&ctx, command),
        Some(Commands::Gc {
            apply,
            orphan_days,
            linked_days,
        }) => gc::execute(&ctx, *apply, *orphan_days, *linked_days),
    }
}
