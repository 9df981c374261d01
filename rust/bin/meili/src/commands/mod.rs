//! Subcommand implementations.

pub mod context;
pub mod docs;
pub mod index;
pub mod server;
pub mod task;
pub mod token;

use serde::Serialize;

/// Print a response body. Table output is pretty JSON for now.
pub fn print<T: Serialize>(value: &T, output_json: bool) -> anyhow::Result<()> {
    if output_json {
        println!("{}", serde_json::to_string(value)?);
    } else {
        println!("{}", serde_json::to_string_pretty(value)?);
    }
    Ok(())
}
