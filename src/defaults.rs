//! Default values for cascade-config.
//!
//! This module provides centralized default values used by the resolver
//! and the CLI, ensuring consistency and avoiding duplication.

use std::env;

/// File names searched for in every directory level, in precedence order.
pub const DEFAULT_SEARCH_PATHS: [&str; 2] = ["config.yaml", "config.json"];

/// Environment variable overriding the search paths (comma separated).
pub const SEARCH_PATHS_ENV: &str = "CASCADE_CONFIG_SEARCH_PATHS";

/// Environment variable enabling full error reports in the CLI.
pub const FULL_ERRORS_ENV: &str = "CASCADE_CONFIG_FULL_ERRORS";

/// Returns the search paths to use when the caller does not provide any.
///
/// Reads `CASCADE_CONFIG_SEARCH_PATHS` when it is set and names at least
/// one file; otherwise returns [`DEFAULT_SEARCH_PATHS`].
pub fn search_paths() -> Vec<String> {
    env::var(SEARCH_PATHS_ENV)
        .ok()
        .map(|value| split_search_paths(&value))
        .filter(|paths| !paths.is_empty())
        .unwrap_or_else(|| DEFAULT_SEARCH_PATHS.iter().map(|s| s.to_string()).collect())
}

fn split_search_paths(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}
