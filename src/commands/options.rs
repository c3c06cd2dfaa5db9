//! Resolution options shared by the `config` subcommands

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};

use cascade_config::error::Error;
use cascade_config::output::PrintFormat;
use cascade_config::parser::{FileParser, Format};
use cascade_config::{ResolveOptions, ResolvedConfig, Resolver};

/// Format assumed for files without a known extension
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum InputFormat {
    Yaml,
    Json,
}

impl From<InputFormat> for Format {
    fn from(format: InputFormat) -> Self {
        match format {
            InputFormat::Yaml => Format::Yaml,
            InputFormat::Json => Format::Json,
        }
    }
}

/// Format used to print values
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// YAML document
    Yaml,
    /// Pretty-printed JSON
    Json,
    /// One item per line
    List,
    /// Shell-quoted items on one line
    Cli,
}

impl From<OutputFormat> for PrintFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Yaml => PrintFormat::Yaml,
            OutputFormat::Json => PrintFormat::Json,
            OutputFormat::List => PrintFormat::List,
            OutputFormat::Cli => PrintFormat::Cli,
        }
    }
}

/// Where and how to resolve configuration
#[derive(Args, Debug, Clone)]
pub struct ConfigOptions {
    /// Directory (or file) to resolve configuration for
    #[arg(
        long,
        visible_alias = "source-path",
        value_name = "PATH",
        default_value = "."
    )]
    pub cwd: PathBuf,

    /// Environment overlay to apply to every loaded file
    #[arg(short = 'e', long = "env", visible_alias = "environment", value_name = "NAME")]
    pub environment: Option<String>,

    /// Number of parent directories to include; -1 includes all of them
    #[arg(
        long,
        value_name = "N",
        default_value_t = -1,
        allow_negative_numbers = true,
        value_parser = clap::value_parser!(i64).range(-1..)
    )]
    pub inherit_depth: i64,

    /// Do not follow `import` declarations
    #[arg(long)]
    pub no_imports: bool,

    /// File name to look for in each directory (repeatable)
    ///
    /// Defaults to CASCADE_CONFIG_SEARCH_PATHS when set, else config.yaml and
    /// config.json.
    #[arg(long = "search-path", value_name = "NAME", value_delimiter = ',')]
    pub search_paths: Vec<String>,

    /// Format for files whose extension is not yaml, yml or json
    #[arg(long, value_enum, value_name = "FORMAT", default_value_t = InputFormat::Yaml)]
    pub default_format: InputFormat,

    /// Do not fail when no loaded file declares the requested environment
    #[arg(long)]
    pub ignore_missing_env: bool,
}

impl ConfigOptions {
    /// The library options these flags select
    pub fn resolve_options(&self) -> ResolveOptions {
        let search_paths: Vec<String> = self
            .search_paths
            .iter()
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty())
            .collect();

        let mut options = ResolveOptions::from_env();
        if !search_paths.is_empty() {
            options.search_paths = search_paths;
        }
        options.environment = self.environment.clone();
        options.max_inherit_depth = usize::try_from(self.inherit_depth).ok();
        options.load_imports = !self.no_imports;
        options
    }

    /// Resolve the configuration for `--cwd`
    ///
    /// Fails with `EnvironmentNotFound` when `--env` names an environment no
    /// loaded file declares, unless `--ignore-missing-env` is set.
    pub fn resolve(&self) -> Result<ResolvedConfig> {
        let resolver = Resolver::with_parser(
            FileParser::new(self.default_format.into()),
            self.resolve_options(),
        );
        let config = resolver.resolve(&self.cwd).with_context(|| {
            format!(
                "Failed to resolve configuration for {}",
                self.cwd.display()
            )
        })?;

        if let Some(name) = &self.environment {
            if !config.environment_applied() && !self.ignore_missing_env {
                return Err(Error::EnvironmentNotFound { name: name.clone() }.into());
            }
        }

        Ok(config)
    }
}
