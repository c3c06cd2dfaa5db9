//! # Cascade Config CLI
//!
//! This is the binary entry point for the `cascade-config` command-line tool.
//!
//! Its primary responsibilities are:
//! - Parsing command-line arguments using `clap`.
//! - Executing the appropriate command based on the parsed arguments.
//! - Reporting errors: a one-line summary by default, or the full cause chain
//!   with `--full-errors` / `CASCADE_CONFIG_FULL_ERRORS=true`.
//!
//! The resolution logic lives in the `cascade_config` library crate; the
//! binary is a thin wrapper around it.

mod cli;
mod commands;

use std::process::ExitCode;

use clap::Parser;

fn main() -> ExitCode {
    let cli = cli::Cli::parse();
    let full_errors = cli.full_errors();

    match cli.execute() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            if full_errors {
                eprintln!("error: {:?}", err);
            } else {
                eprintln!("error: {:#}", err);
            }
            ExitCode::FAILURE
        }
    }
}
