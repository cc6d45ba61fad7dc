//! `logbook init` - create the store layout

use logbook_core::document::relative_to;
use logbook_core::error::Result;
use logbook_core::store::Store;

use crate::cli::OutputFormat;
use crate::commands::dispatch::CommandContext;
use crate::commands::format::print_json;

pub fn execute(ctx: &CommandContext) -> Result<()> {
    let store = match ctx.store_path() {
        Some(path) => Store::init_at(&path)?,
        None => Store::init(&ctx.root)?,
    };

    match ctx.cli.format {
        OutputFormat::Json => print_json(&serde_json::json!({
            "status": "ok",
            "store": store.root(),
        })),
        OutputFormat::Human => {
            if !ctx.cli.quiet {
                println!(
                    "Initialized logbook store at {}",
                    relative_to(store.root(), &ctx.root).display()
                );
            }
            Ok(())
        }
    }
}
