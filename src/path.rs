//! Path manipulation utilities for cascade-config

use std::path::{Component, Path, PathBuf};

use glob::Pattern;

use crate::error::Result;

/// Characters that turn a declared import path into a glob pattern.
///
/// A `[` alone does not, so bracketed file names import literally.
const GLOB_CHARS: [char; 2] = ['*', '?'];

/// Lexically normalize a path, resolving `.` and `..` components
///
/// No filesystem access is performed, so symlinks are not followed. A `..`
/// at the root stays at the root.
pub fn normalize(path: &Path) -> PathBuf {
    let mut result = PathBuf::new();
    for component in path.components() {
        match component {
            Component::Prefix(_) | Component::RootDir => result.push(component.as_os_str()),
            Component::CurDir => {}
            Component::ParentDir => {
                let at_parent =
                    matches!(result.components().next_back(), Some(Component::ParentDir));
                if at_parent || (!result.pop() && !path.has_root()) {
                    result.push("..");
                }
            }
            Component::Normal(part) => result.push(part),
        }
    }
    result
}

/// Make a path absolute against the current directory and normalize it
pub fn absolute(path: &Path) -> Result<PathBuf> {
    if path.is_absolute() {
        return Ok(normalize(path));
    }
    let cwd = std::env::current_dir()?;
    Ok(normalize(&cwd.join(path)))
}

/// Resolve `path` against `base` unless it is already absolute
pub fn resolve_against(base: &Path, path: &str) -> PathBuf {
    let path = Path::new(path);
    if path.is_absolute() {
        normalize(path)
    } else {
        normalize(&base.join(path))
    }
}

/// Check whether an import path contains glob wildcards
pub fn is_glob(path: &str) -> bool {
    path.contains(GLOB_CHARS)
}

/// Build a `glob` crate pattern for an import declared relative to `base`
///
/// Only the declared text is a pattern. `base` is escaped so wildcard
/// characters in directory names match literally, after leading `..`
/// components of the declaration have been applied to it. The `glob` crate
/// always treats `**` as a recursive wildcard, so a non-recursive import
/// collapses it to `*` to match one component.
pub fn glob_pattern(base: &Path, declared: &str, recursive: bool) -> String {
    let mut declared = declared.to_string();
    if !recursive {
        while declared.contains("**") {
            declared = declared.replace("**", "*");
        }
    }

    let declared = Path::new(&declared);
    if declared.is_absolute() {
        return normalize(declared).to_string_lossy().into_owned();
    }

    let mut base = normalize(base);
    let mut rest = PathBuf::new();
    for component in normalize(declared).components() {
        match component {
            Component::ParentDir if rest.as_os_str().is_empty() => {
                base.pop();
            }
            other => rest.push(other),
        }
    }

    PathBuf::from(Pattern::escape(&base.to_string_lossy()))
        .join(rest)
        .to_string_lossy()
        .into_owned()
}
