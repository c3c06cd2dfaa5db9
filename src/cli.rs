//! CLI argument parsing and command dispatch

use std::io::Write;

use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use log::{Level, LevelFilter};

use cascade_config::defaults::FULL_ERRORS_ENV;
use cascade_config::output::OutputConfig;

use crate::commands;

/// Cascade Config - Resolve configuration that cascades through directories
#[derive(Parser, Debug)]
#[command(name = "cascade-config")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Colorize output (always, never, auto)
    #[arg(long, global = true, value_name = "WHEN", default_value = "auto")]
    color: String,

    /// Set log level (off, error, warn, info, debug, trace)
    #[arg(long, global = true, value_name = "LEVEL", default_value = "info")]
    log_level: String,

    /// Print the full error report, including every cause
    #[arg(long, global = true, env = FULL_ERRORS_ENV)]
    full_errors: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Inspect the configuration that applies to a path
    #[command(subcommand)]
    Config(ConfigCommands),

    /// Write log messages at a given level
    Log(commands::log::LogArgs),

    /// Generate shell completion scripts
    Completions(commands::completions::CompletionsArgs),
}

#[derive(Subcommand, Debug)]
enum ConfigCommands {
    /// Print the resolved configuration
    View(commands::view::ViewArgs),

    /// Print the values at one or more query paths
    Get(commands::get::GetArgs),

    /// Show which directories and files contributed
    Sources(commands::sources::SourcesArgs),
}

impl Cli {
    /// Whether errors should be reported with their full cause chain
    pub fn full_errors(&self) -> bool {
        self.full_errors
    }

    /// Execute the CLI command
    pub fn execute(self) -> Result<()> {
        let output = OutputConfig::from_env_and_flag(&self.color);
        init_logging(level_filter(&self.log_level)?, &output);

        match self.command {
            Commands::Config(ConfigCommands::View(args)) => commands::view::execute(args),
            Commands::Config(ConfigCommands::Get(args)) => commands::get::execute(args),
            Commands::Config(ConfigCommands::Sources(args)) => {
                commands::sources::execute(args, &output)
            }
            Commands::Log(args) => commands::log::execute(args),
            Commands::Completions(args) => commands::completions::execute(args),
        }
    }
}

fn level_filter(name: &str) -> Result<LevelFilter> {
    if name.eq_ignore_ascii_case("off") {
        return Ok(LevelFilter::Off);
    }
    commands::log::parse_level(name)
        .map(|level| level.to_level_filter())
        .ok_or_else(|| anyhow!("Unknown log level '{}'", name))
}

/// Install the stderr logger
///
/// `RUST_LOG` directives take precedence over `--log-level`.
fn init_logging(level: LevelFilter, output: &OutputConfig) {
    let output = output.clone();
    let mut builder = env_logger::Builder::new();
    builder
        .filter_level(level)
        .parse_default_env()
        .format(move |buf, record| {
            let level = match record.level() {
                Level::Error => output.style(record.level()).red(),
                Level::Warn => output.style(record.level()).yellow(),
                Level::Info => output.style(record.level()).green(),
                Level::Debug => output.style(record.level()).blue(),
                Level::Trace => output.style(record.level()).dim(),
            };
            writeln!(buf, "[{}][{}] {}", buf.timestamp(), level, record.args())
        });
    // A logger may already be installed when running under a test harness.
    let _ = builder.try_init();
}
