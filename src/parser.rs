//! Configuration file parsing
//!
//! Turns one file into a mapping. The format is chosen from the file
//! extension (`.yaml`, `.yml`, `.json`) and falls back to a configurable
//! default for anything else. The resolver only depends on the
//! [`ConfigParser`] trait, so callers can substitute their own parser (for
//! example an in-memory one in tests) without touching the cascade logic.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde_yaml::{Mapping, Value};

use crate::error::{Error, Result};
use crate::merge::type_name;

/// Supported configuration file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Format {
    #[default]
    Yaml,
    Json,
}

impl Format {
    /// Detect the format from a file extension
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?.to_ascii_lowercase();
        match extension.as_str() {
            "yaml" | "yml" => Some(Format::Yaml),
            "json" => Some(Format::Json),
            _ => None,
        }
    }
}

impl FromStr for Format {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "yaml" | "yml" => Ok(Format::Yaml),
            "json" => Ok(Format::Json),
            other => Err(format!("unsupported format '{}' (expected yaml or json)", other)),
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Format::Yaml => write!(f, "yaml"),
            Format::Json => write!(f, "json"),
        }
    }
}

/// Parses a configuration file into a mapping
pub trait ConfigParser {
    /// Read and decode the file at `path`
    fn parse(&self, path: &Path) -> Result<Mapping>;
}

impl<F> ConfigParser for F
where
    F: Fn(&Path) -> Result<Mapping>,
{
    fn parse(&self, path: &Path) -> Result<Mapping> {
        self(path)
    }
}

/// Reads YAML and JSON files from disk
#[derive(Debug, Clone, Copy, Default)]
pub struct FileParser {
    /// Format used when the extension is not recognised
    pub default_format: Format,
}

impl FileParser {
    pub fn new(default_format: Format) -> Self {
        Self { default_format }
    }
}

impl ConfigParser for FileParser {
    fn parse(&self, path: &Path) -> Result<Mapping> {
        let format = Format::from_path(path).unwrap_or(self.default_format);
        let text = std::fs::read_to_string(path).map_err(|err| Error::parse(path, err))?;
        parse_str(&text, format, path)
    }
}

/// Decode configuration text in the given format
///
/// Empty documents decode to an empty mapping. `path` is only used for
/// error reporting.
///
/// # Errors
///
/// Returns `Error::Parse` for malformed text and `Error::NotAMapping` when
/// the document is not a mapping.
pub fn parse_str(text: &str, format: Format, path: &Path) -> Result<Mapping> {
    if text.trim().is_empty() {
        return Ok(Mapping::new());
    }

    let mut value: Value = match format {
        Format::Yaml => serde_yaml::from_str(text).map_err(|err| Error::parse(path, err))?,
        Format::Json => serde_json::from_str(text).map_err(|err| Error::parse(path, err))?,
    };
    value
        .apply_merge()
        .map_err(|err| Error::parse(path, err))?;

    match value {
        Value::Mapping(map) => Ok(map),
        Value::Null => Ok(Mapping::new()),
        other => Err(Error::NotAMapping {
            path: path.to_path_buf(),
            found: type_name(&other),
        }),
    }
}
