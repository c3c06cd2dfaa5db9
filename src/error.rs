//! # Error Handling
//!
//! This module defines the centralized error type for `cascade-config`. It
//! uses the `thiserror` library to build one `Error` enum covering every
//! failure mode of a resolution, so callers of `resolve`, `find` and the
//! merge functions all see the same type.
//!
//! ## Key Components
//!
//! - **`Error`**: every failure the library can surface. Each variant carries
//!   the path, query or context needed to act on it.
//! - **`Result<T>`**: a type alias for `std::result::Result<T, Error>`.
//!
//! None of these errors are retried internally. A missing *optional* import
//! and a glob that matches nothing are normal outcomes, not errors; anything
//! listed here aborts the resolution that raised it.

use std::path::PathBuf;

use thiserror::Error;

/// Boxed cause attached to parse failures (I/O, YAML or JSON decoding).
pub type BoxedCause = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Main error type for cascade-config operations
#[derive(Error, Debug)]
pub enum Error {
    /// A configuration file could not be read or decoded.
    #[error("Configuration parsing error in {}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: BoxedCause,
    },

    /// A configuration file decoded to something other than a mapping.
    #[error("Configuration file must contain a mapping, found {found} in {}", path.display())]
    NotAMapping { path: PathBuf, found: &'static str },

    /// A required, non-glob import does not exist.
    #[error("Import not found: {}", path.display())]
    ImportNotFound { path: PathBuf },

    /// An import declaration is empty or malformed.
    #[error("Invalid import: {message}")]
    InvalidImport { message: String },

    /// The reserved `settings` key holds a value of the wrong type.
    #[error("Invalid settings in {}: {message}", path.display())]
    InvalidSettings { path: PathBuf, message: String },

    /// A merge or query hit a container of the wrong kind.
    #[error("Type mismatch in {context}: expected {expected}, found {found}")]
    TypeMismatch {
        context: String,
        expected: &'static str,
        found: &'static str,
    },

    /// A query path could not be parsed.
    #[error("Invalid query '{query}': {message}")]
    InvalidQuery { query: String, message: String },

    /// An environment was requested but no loaded file declares it.
    #[error("Environment '{name}' not found in any loaded configuration")]
    EnvironmentNotFound { name: String },

    /// A value could not be rendered in the requested print format.
    #[error("Cannot render output: {message}")]
    Render { message: String },

    /// The per-resolution file cap was exceeded.
    #[error("Loaded more than {limit} configuration files in a single resolution")]
    LoadLimit { limit: usize },

    /// A glob pattern error, wrapped from `glob::PatternError`.
    #[error("Glob pattern error: {0}")]
    Glob(#[from] glob::PatternError),

    /// An I/O error, wrapped from `std::io::Error`.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Build a `Parse` error from any decoding or I/O failure.
    pub fn parse(path: impl Into<PathBuf>, source: impl Into<BoxedCause>) -> Self {
        Error::Parse {
            path: path.into(),
            source: source.into(),
        }
    }
}

/// A convenient type alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
