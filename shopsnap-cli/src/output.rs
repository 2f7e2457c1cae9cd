//! Output helpers shared by the commands.

use anyhow::Result;
use serde::Serialize;

/// Prints a value as JSON, compact or pretty.
pub fn print_json<T: Serialize>(value: &T, pretty: bool) -> Result<()> {
    let rendered = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{rendered}");
    Ok(())
}
