//! The result of a cascade resolution

use std::path::{Path, PathBuf};

use serde_yaml::{Mapping, Value};

use crate::config::{Settings, RESERVED_KEYS};
use crate::error::Result;
use crate::query;

/// The files loaded for one directory level
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelSummary {
    pub directory: PathBuf,
    /// Loaded files in load order
    pub files: Vec<PathBuf>,
}

/// The merged configuration for a start path
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedConfig {
    root: Value,
    settings: Settings,
    source_path: PathBuf,
    source_directory: PathBuf,
    levels: Vec<LevelSummary>,
    environment_applied: bool,
}

impl ResolvedConfig {
    pub(crate) fn new(
        data: Mapping,
        settings: Settings,
        source_path: PathBuf,
        source_directory: PathBuf,
        levels: Vec<LevelSummary>,
        environment_applied: bool,
    ) -> Self {
        Self {
            root: Value::Mapping(data),
            settings,
            source_path,
            source_directory,
            levels,
            environment_applied,
        }
    }

    /// The merged data, including the reserved `settings` and
    /// `environments` keys
    pub fn value(&self) -> &Value {
        &self.root
    }

    pub fn mapping(&self) -> Option<&Mapping> {
        self.root.as_mapping()
    }

    /// Look up a top-level key
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.root.get(key)
    }

    /// Find the value at a dotted query path such as `servers[0].host`
    pub fn find(&self, query: &str) -> Result<Option<&Value>> {
        query::find(&self.root, query)
    }

    /// Find the value at `query` and pass it to `action` with its parent
    ///
    /// The parent of a top-level key is the whole configuration.
    pub fn find_with<'a, T, F>(&'a self, query: &str, action: F) -> Result<Option<T>>
    where
        F: FnOnce(&'a Value, Option<&'a Value>) -> T,
    {
        query::find_with(&self.root, query, action)
    }

    /// Resolve several queries, keeping the ones that were found
    pub fn find_all<I, S>(&self, queries: I) -> Result<Vec<&Value>>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        query::find_all(&self.root, queries)
    }

    /// The configuration without the reserved keys
    pub fn effective(&self) -> Mapping {
        self.mapping()
            .map(|map| {
                map.iter()
                    .filter(|(key, _)| {
                        key.as_str()
                            .map_or(true, |key| !RESERVED_KEYS.contains(&key))
                    })
                    .map(|(key, value)| (key.clone(), value.clone()))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Settings of the merged result
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// The path resolution started from
    pub fn source_path(&self) -> &Path {
        &self.source_path
    }

    /// The directory of the closest level
    pub fn source_directory(&self) -> &Path {
        &self.source_directory
    }

    /// The levels that contributed, closest first
    pub fn levels(&self) -> &[LevelSummary] {
        &self.levels
    }

    /// Whether any loaded file declared the requested environment
    pub fn environment_applied(&self) -> bool {
        self.environment_applied
    }

    pub fn into_value(self) -> Value {
        self.root
    }
}
