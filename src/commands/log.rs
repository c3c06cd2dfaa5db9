//! # Log Command Implementation
//!
//! This module implements the `log` subcommand, which writes each message
//! through the same logger the rest of the tool uses. Shell scripts can use it
//! to produce log lines in a consistent format:
//!
//! ```bash
//! cascade-config log WARNING "disk almost full" "retrying"
//! ```
//!
//! Messages below `--log-level` (default `warn`) are suppressed.

use anyhow::{anyhow, Result};
use clap::Args;
use ::log::Level;

/// Write log messages at a given level
#[derive(Args, Debug)]
pub struct LogArgs {
    /// Level: CRITICAL, ERROR, WARNING, INFO, DEBUG or TRACE
    #[arg(value_name = "LEVEL")]
    pub level: String,

    /// Messages to write, one log record each
    #[arg(value_name = "MESSAGE")]
    pub messages: Vec<String>,
}

/// Map a level name to a `log` level
///
/// Case-insensitive. `CRITICAL` and `CRIT` map to `Error`, `WARNING` to
/// `Warn`.
pub fn parse_level(name: &str) -> Option<Level> {
    match name.to_ascii_uppercase().as_str() {
        "CRITICAL" | "CRIT" | "ERROR" => Some(Level::Error),
        "WARNING" | "WARN" => Some(Level::Warn),
        "INFO" => Some(Level::Info),
        "DEBUG" => Some(Level::Debug),
        "TRACE" => Some(Level::Trace),
        _ => None,
    }
}

/// Execute the `log` command.
pub fn execute(args: LogArgs) -> Result<()> {
    let level = parse_level(&args.level).ok_or_else(|| {
        anyhow!(
            "Unknown log level '{}' (expected CRITICAL, ERROR, WARNING, INFO, DEBUG or TRACE)",
            args.level
        )
    })?;

    for message in &args.messages {
        ::log::log!(level, "{}", message);
    }
    Ok(())
}
