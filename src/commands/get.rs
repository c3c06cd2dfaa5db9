//! # Get Command Implementation
//!
//! This module implements `config get`, which prints the values found at one
//! or more query paths (`database.host`, `servers[0].name`, ...).
//!
//! With a single path the value itself is printed. With several paths the
//! values that were found are printed together as a sequence, so `--format
//! list` gives one value per line. The command fails when none of the paths
//! matched.

use anyhow::{bail, Result};
use clap::Args;
use serde_yaml::Value;

use cascade_config::output::format_value;

use super::options::{ConfigOptions, OutputFormat};

/// Print the values at one or more query paths
#[derive(Args, Debug)]
pub struct GetArgs {
    /// Query paths such as `database.host` or `servers[0].name`
    #[arg(required = true, value_name = "PATH")]
    pub paths: Vec<String>,

    #[command(flatten)]
    pub config: ConfigOptions,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::List)]
    pub format: OutputFormat,
}

/// Execute the `config get` command.
pub fn execute(args: GetArgs) -> Result<()> {
    println!("{}", render(&args)?);
    Ok(())
}

fn render(args: &GetArgs) -> Result<String> {
    let config = args.config.resolve()?;
    let found = config.find_all(&args.paths)?;

    let value = match found.as_slice() {
        [] => bail!("No value found for {}", args.paths.join(", ")),
        [single] if args.paths.len() == 1 => (*single).clone(),
        many => Value::Sequence(many.iter().map(|value| (*value).clone()).collect()),
    };
    Ok(format_value(&value, args.format.into())?)
}
