//! Command implementations.
//!
//! Each command returns the JSON document to print, so the commands can be
//! exercised without capturing stdout.

pub mod cart;
pub mod cms;
pub mod wishlist;

use serde_json::Value;

/// Result of a command: the JSON output on success.
pub type CommandResult = Result<Value, Box<dyn std::error::Error>>;

/// Print a command result to stdout.
pub fn print_json(value: &Value) -> Result<(), serde_json::Error> {
    let text = serde_json::to_string_pretty(value)?;
    #[allow(clippy::print_stdout)]
    {
        println!("{text}");
    }
    Ok(())
}
