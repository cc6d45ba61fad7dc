//! Body input for new documents

use std::io::{self, Read};

use logbook_core::error::Result;

use crate::cli::args::BodyArgs;

/// Body from `--body`, stdin with `--stdin`, or the template otherwise
pub fn read_body(args: &BodyArgs, template: impl FnOnce() -> String) -> Result<String> {
    if let Some(body) = &args.body {
        return Ok(body.clone());
    }
    if args.stdin {
        let mut body = String::new();
        io::stdin().read_to_string(&mut body)?;
        return Ok(body);
    }
    Ok(template())
}
