//! Directory walk for the cascade
//!
//! Builds one [`SearchGroup`] per directory from the start directory up to
//! the filesystem root, closest first.

use std::path::{Path, PathBuf};

use crate::path::resolve_against;

/// Candidate files for one directory level
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchGroup {
    /// The directory this level represents
    pub directory: PathBuf,
    /// Candidate files in precedence order
    pub paths: Vec<PathBuf>,
}

/// List the search groups from `start_dir` to the root
///
/// Relative names are joined to each level's directory; absolute names are
/// used verbatim at every level.
pub fn search_groups<S: AsRef<str>>(start_dir: &Path, names: &[S]) -> Vec<SearchGroup> {
    start_dir
        .ancestors()
        .map(|directory| SearchGroup {
            directory: directory.to_path_buf(),
            paths: names
                .iter()
                .map(|name| resolve_against(directory, name.as_ref()))
                .collect(),
        })
        .collect()
}
