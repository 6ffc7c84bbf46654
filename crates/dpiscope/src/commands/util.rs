//! Shared output helpers.

use serde_json::Value;

use crate::error::CliError;

/// Print a JSON value pretty-printed to stdout.
pub fn print_json(value: &Value) -> Result<(), CliError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
