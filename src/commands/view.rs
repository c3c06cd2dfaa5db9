//! # View Command Implementation
//!
//! This module implements `config view`, which prints the configuration that
//! applies to a path after every level, import and environment overlay has
//! been merged.
//!
//! By default the reserved `import`, `environments` and `settings` keys are
//! left out; `--raw` keeps them.

use anyhow::Result;
use clap::Args;
use serde_yaml::Value;

use cascade_config::output::format_value;

use super::options::{ConfigOptions, OutputFormat};

/// Print the resolved configuration
#[derive(Args, Debug)]
pub struct ViewArgs {
    #[command(flatten)]
    pub config: ConfigOptions,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Yaml)]
    pub format: OutputFormat,

    /// Keep the reserved import, environments and settings keys
    #[arg(long)]
    pub raw: bool,
}

/// Execute the `config view` command.
pub fn execute(args: ViewArgs) -> Result<()> {
    println!("{}", render(&args)?);
    Ok(())
}

fn render(args: &ViewArgs) -> Result<String> {
    let config = args.config.resolve()?;
    let value = if args.raw {
        config.into_value()
    } else {
        Value::Mapping(config.effective())
    };
    Ok(format_value(&value, args.format.into())?)
}
