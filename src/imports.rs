//! Import resolution
//!
//! Expands one [`ImportSpec`] into the concrete files it names. Literal
//! paths resolve to at most one file; glob patterns expand to every
//! matching regular file, sorted for reproducible precedence.

use std::path::{Path, PathBuf};

use glob::MatchOptions;
use log::{debug, warn};

use crate::config::ImportSpec;
use crate::error::{Error, Result};
use crate::path::{glob_pattern, is_glob, resolve_against};

/// Resolve an import declaration into absolute file paths
///
/// Relative paths are resolved against `search_from`, the directory of the
/// file that declared the import. Only the declared text is checked for
/// wildcards; `search_from` always matches literally.
///
/// # Errors
///
/// - `Error::InvalidImport` when the path is empty
/// - `Error::ImportNotFound` when a required literal path does not exist
/// - `Error::Glob` when the pattern is malformed
pub fn resolve_import(spec: &ImportSpec, search_from: &Path) -> Result<Vec<PathBuf>> {
    if spec.path.trim().is_empty() {
        return Err(Error::InvalidImport {
            message: "import path cannot be empty".to_string(),
        });
    }

    if is_glob(&spec.path) {
        return expand_glob(&glob_pattern(search_from, &spec.path, spec.recursive));
    }

    let path = resolve_against(search_from, &spec.path);
    Ok(resolve_literal(path, spec.required)?.into_iter().collect())
}

/// Check an exact file path
///
/// Returns the path when it names a regular file and `None` when it is
/// missing or not a file.
///
/// # Errors
///
/// Returns `Error::ImportNotFound` when `required` is set and nothing exists
/// at `path`.
pub fn resolve_literal(path: PathBuf, required: bool) -> Result<Option<PathBuf>> {
    if required && !path.exists() {
        return Err(Error::ImportNotFound { path });
    }
    Ok(path.is_file().then_some(path))
}

fn expand_glob(pattern: &str) -> Result<Vec<PathBuf>> {
    let options = MatchOptions {
        case_sensitive: true,
        require_literal_separator: true,
        require_literal_leading_dot: true,
    };

    let mut matches = Vec::new();
    for entry in glob::glob_with(pattern, options)? {
        match entry {
            Ok(found) if found.is_file() => matches.push(found),
            Ok(_) => {}
            Err(err) => warn!("Skipping unreadable glob entry for '{}': {}", pattern, err),
        }
    }
    matches.sort();

    debug!("Import pattern '{}' matched {} file(s)", pattern, matches.len());
    Ok(matches)
}
