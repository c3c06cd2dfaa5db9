//! # Output Formatting
//!
//! This module renders resolved configuration values for the CLI and
//! decides whether terminal output should be colored.
//!
//! ## Print Formats
//!
//! - `yaml` - a YAML document
//! - `json` - pretty-printed JSON
//! - `list` - one item per line; a mapping becomes `key`, `value`, ...
//!   and nested containers are written as compact JSON
//! - `cli` - the `list` items on one line, each quoted for a POSIX shell,
//!   ready to splice into a command line
//!
//! ## Respecting User Preferences
//!
//! Colors follow the `--color=never|always|auto` flag. In `auto` mode they
//! are disabled by:
//! - `NO_COLOR` (any value, per https://no-color.org/)
//! - `CLICOLOR=0`
//! - `TERM=dumb`
//! - stdout not being a TTY, unless `CLICOLOR_FORCE=1`
//!
//! ## Usage
//!
//! ```
//! use cascade_config::output::{format_value, PrintFormat};
//! use serde_yaml::Value;
//!
//! let value: Value = serde_yaml::from_str("[web, 'two words']").unwrap();
//! let line = format_value(&value, PrintFormat::Cli).unwrap();
//! assert_eq!(line, "web 'two words'");
//! ```

use std::env;
use std::fmt;
use std::str::FromStr;

use serde_yaml::Value;

use crate::error::{Error, Result};

/// Output configuration for controlling colors.
#[derive(Debug, Clone)]
pub struct OutputConfig {
    /// Whether colors should be used in output.
    pub use_color: bool,
}

impl OutputConfig {
    /// Create an output configuration from environment and CLI flag.
    ///
    /// # Arguments
    /// * `color_flag` - The value of the --color CLI flag: "always", "never", or "auto"
    pub fn from_env_and_flag(color_flag: &str) -> Self {
        let use_color = match color_flag.to_lowercase().as_str() {
            "always" => true,
            "never" => false,
            _ => Self::detect_color_support(),
        };

        Self { use_color }
    }

    /// Detect whether color output is supported based on environment.
    fn detect_color_support() -> bool {
        // The presence of NO_COLOR (even if empty) disables colors
        if env::var_os("NO_COLOR").is_some() {
            return false;
        }

        if env::var("CLICOLOR").is_ok_and(|v| v == "0") {
            return false;
        }

        if env::var("CLICOLOR_FORCE").is_ok_and(|v| v != "0" && !v.is_empty()) {
            return true;
        }

        if env::var("TERM").is_ok_and(|v| v == "dumb") {
            return false;
        }

        console::Term::stdout().features().colors_supported()
    }

    /// Create a configuration with colors always enabled.
    pub fn with_color() -> Self {
        Self { use_color: true }
    }

    /// Create a configuration with colors always disabled.
    pub fn without_color() -> Self {
        Self { use_color: false }
    }

    /// Apply this configuration's color choice to a styled value
    pub fn style<D>(&self, value: D) -> console::StyledObject<D> {
        console::style(value).force_styling(self.use_color)
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self::from_env_and_flag("auto")
    }
}

/// Format used to print configuration values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PrintFormat {
    #[default]
    Yaml,
    Json,
    List,
    Cli,
}

impl FromStr for PrintFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "yaml" | "yml" => Ok(PrintFormat::Yaml),
            "json" => Ok(PrintFormat::Json),
            "list" => Ok(PrintFormat::List),
            "cli" => Ok(PrintFormat::Cli),
            other => Err(format!(
                "unknown print format '{}' (expected yaml, json, list or cli)",
                other
            )),
        }
    }
}

impl fmt::Display for PrintFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PrintFormat::Yaml => "yaml",
            PrintFormat::Json => "json",
            PrintFormat::List => "list",
            PrintFormat::Cli => "cli",
        };
        f.write_str(name)
    }
}

/// Render `value` in the given format
///
/// The result has no trailing newline.
///
/// # Errors
///
/// Returns `Error::Render` when the value cannot be expressed in the format,
/// such as JSON output of a mapping with sequence keys.
pub fn format_value(value: &Value, format: PrintFormat) -> Result<String> {
    match format {
        PrintFormat::Yaml => serde_yaml::to_string(value)
            .map(|text| text.trim_end().to_string())
            .map_err(render_error),
        PrintFormat::Json => serde_json::to_string_pretty(value).map_err(render_error),
        PrintFormat::List => Ok(list_items(value)?.join("\n")),
        PrintFormat::Cli => Ok(list_items(value)?
            .iter()
            .map(|item| shell_quote(item))
            .collect::<Vec<_>>()
            .join(" ")),
    }
}

fn list_items(value: &Value) -> Result<Vec<String>> {
    match value {
        Value::Mapping(map) => {
            let mut items = Vec::with_capacity(map.len() * 2);
            for (key, value) in map {
                items.push(list_item(key)?);
                items.push(list_item(value)?);
            }
            Ok(items)
        }
        Value::Sequence(seq) => seq.iter().map(list_item).collect(),
        scalar => Ok(vec![list_item(scalar)?]),
    }
}

fn list_item(value: &Value) -> Result<String> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Null => Ok("null".to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Tagged(tagged) => list_item(&tagged.value),
        container => serde_json::to_string(container).map_err(render_error),
    }
}

/// Quote `word` for a POSIX shell
///
/// Words made only of characters that are never special are returned
/// unchanged; everything else is wrapped in single quotes.
pub fn shell_quote(word: &str) -> String {
    if word.is_empty() {
        return "''".to_string();
    }
    let safe = word
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || "@%+=:,./-_".contains(c));
    if safe {
        word.to_string()
    } else {
        format!("'{}'", word.replace('\'', r#"'"'"'"#))
    }
}

fn render_error(err: impl fmt::Display) -> Error {
    Error::Render {
        message: err.to_string(),
    }
}
