//! # Configuration Nodes and Metadata
//!
//! This module defines the data structures for one loaded configuration file
//! and the metadata read from its reserved keys.
//!
//! ## Key Components
//!
//! - **`ConfigNode`**: the mapping parsed from one file, together with its
//!   source location and the typed metadata derived from it.
//! - **`ImportSpec`**: one import declaration, built from a path string or a
//!   `{path, recursive, required}` mapping.
//! - **`Settings`**: the inheritance flags read from the `settings` key.
//!
//! ## Reserved Keys
//!
//! Three top-level keys are structural rather than configuration values:
//!
//! ```yaml
//! import:                 # a path, a mapping, or a list of either
//!   - shared.yaml
//!   - path: "conf.d/**/*.yaml"
//!     required: false
//! environments:           # overlays selected by environment name
//!   test:
//!     database: {host: localhost}
//! settings:
//!   inherit: true         # also consult the parent directory
//!   inherit_siblings: true
//!   allow_imports: true
//!   use_deep_merge: true
//!   concatenate_lists: true
//! ```
//!
//! `Settings` and the import list are parsed once when a node is built and
//! again whenever its data is reshaped (see [`ConfigNode::refresh`]).

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_yaml::{Mapping, Value};

use crate::error::{Error, Result};
use crate::merge::{type_name, ListPolicy, MergePolicy};

/// Key holding a file's import declarations
pub const IMPORT_KEY: &str = "import";
/// Key holding named environment overlays
pub const ENVIRONMENTS_KEY: &str = "environments";
/// Key holding inheritance settings
pub const SETTINGS_KEY: &str = "settings";
/// All structural keys, which are not effective configuration values
pub const RESERVED_KEYS: [&str; 3] = [IMPORT_KEY, ENVIRONMENTS_KEY, SETTINGS_KEY];

/// A single import declaration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportSpec {
    /// File path or glob pattern, relative to the declaring file's directory
    pub path: String,
    /// Whether `**` in a glob matches across directories
    pub recursive: bool,
    /// Whether a missing non-glob path is an error
    pub required: bool,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawImport {
    path: Option<String>,
    recursive: Option<bool>,
    required: Option<bool>,
}

impl ImportSpec {
    /// Create an import with `recursive` derived from the path
    pub fn new(path: impl Into<String>, required: bool) -> Self {
        let path = path.into();
        Self {
            recursive: path.contains("**"),
            path,
            required,
        }
    }

    /// Build an import from a path string or a `{path, recursive, required}`
    /// mapping, filling unspecified fields from the defaults
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidImport` for an empty path, unknown fields, or a
    /// value that is neither a string nor a mapping.
    pub fn from_value(value: &Value, required_default: bool) -> Result<Self> {
        match value {
            Value::String(path) => {
                if path.trim().is_empty() {
                    return Err(empty_path());
                }
                Ok(Self::new(path.clone(), required_default))
            }
            Value::Mapping(_) => {
                let raw: RawImport =
                    serde_yaml::from_value(value.clone()).map_err(|err| Error::InvalidImport {
                        message: err.to_string(),
                    })?;
                let path = raw
                    .path
                    .filter(|path| !path.trim().is_empty())
                    .ok_or_else(empty_path)?;
                let mut spec = Self::new(path, raw.required.unwrap_or(required_default));
                if let Some(recursive) = raw.recursive {
                    spec.recursive = recursive;
                }
                Ok(spec)
            }
            other => Err(Error::InvalidImport {
                message: format!(
                    "expected a path or a mapping, found {}",
                    type_name(other)
                ),
            }),
        }
    }

    /// Build the import list declared under an `import` key
    ///
    /// Accepts a single declaration or a sequence of declarations; `null`
    /// means no imports.
    pub fn list_from_value(value: &Value, required_default: bool) -> Result<Vec<Self>> {
        match value {
            Value::Null => Ok(Vec::new()),
            Value::Sequence(items) => items
                .iter()
                .map(|item| Self::from_value(item, required_default))
                .collect(),
            single => Ok(vec![Self::from_value(single, required_default)?]),
        }
    }
}

/// Remove `key` from `map`, keeping the remaining entries in order
pub(crate) fn take_key(map: &mut Mapping, key: &str) -> Option<Value> {
    if !map.contains_key(key) {
        return None;
    }
    let mut taken = None;
    *map = std::mem::take(map)
        .into_iter()
        .filter_map(|(k, v)| {
            if taken.is_none() && k.as_str() == Some(key) {
                taken = Some(v);
                None
            } else {
                Some((k, v))
            }
        })
        .collect();
    taken
}

fn empty_path() -> Error {
    Error::InvalidImport {
        message: "import path cannot be empty".to_string(),
    }
}

/// Inheritance settings read from a node's `settings` key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Consult the parent directory level; unset means no
    pub inherit: Option<bool>,
    /// Keep loading later siblings at the same level
    pub inherit_siblings: bool,
    /// Load the imports this node declares
    pub allow_imports: bool,
    /// Merge recursively rather than replacing top-level keys
    pub use_deep_merge: bool,
    /// Concatenate sequences rather than merging them by index
    pub concatenate_lists: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            inherit: None,
            inherit_siblings: true,
            allow_imports: true,
            use_deep_merge: true,
            concatenate_lists: true,
        }
    }
}

impl Settings {
    /// Read the settings of a configuration mapping
    ///
    /// A missing or `null` settings key yields the defaults.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidSettings` when the key is not a mapping or a
    /// flag is not a boolean.
    pub fn from_mapping(data: &Mapping, source: &Path) -> Result<Self> {
        match data.get(SETTINGS_KEY) {
            None | Some(Value::Null) => Ok(Self::default()),
            Some(value @ Value::Mapping(_)) => {
                serde_yaml::from_value(value.clone()).map_err(|err| Error::InvalidSettings {
                    path: source.to_path_buf(),
                    message: err.to_string(),
                })
            }
            Some(other) => Err(Error::InvalidSettings {
                path: source.to_path_buf(),
                message: format!("expected a mapping, found {}", type_name(other)),
            }),
        }
    }

    /// Whether parent directory levels are consulted
    pub fn inherits(&self) -> bool {
        self.inherit.unwrap_or(false)
    }

    /// The merge policy these settings select
    pub fn merge_policy(&self) -> MergePolicy {
        if !self.use_deep_merge {
            MergePolicy::Shallow
        } else if self.concatenate_lists {
            MergePolicy::Deep(ListPolicy::Append)
        } else {
            MergePolicy::Deep(ListPolicy::ByIndex)
        }
    }
}

/// One loaded configuration file
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigNode {
    data: Mapping,
    settings: Settings,
    imports: Vec<ImportSpec>,
    source_path: PathBuf,
    source_directory: PathBuf,
}

impl ConfigNode {
    /// Wrap the mapping parsed from `source_path`
    ///
    /// # Errors
    ///
    /// Fails when the reserved `settings` or `import` keys are malformed.
    pub fn new(data: Mapping, source_path: impl Into<PathBuf>) -> Result<Self> {
        let source_path = source_path.into();
        let source_directory = source_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| source_path.clone());
        Self::with_location(data, source_path, source_directory)
    }

    /// Wrap a mapping that was not loaded from a single file
    ///
    /// Both source locations point at `directory`.
    pub fn synthetic(data: Mapping, directory: impl Into<PathBuf>) -> Result<Self> {
        let directory = directory.into();
        Self::with_location(data, directory.clone(), directory)
    }

    fn with_location(
        data: Mapping,
        source_path: PathBuf,
        source_directory: PathBuf,
    ) -> Result<Self> {
        let mut node = Self {
            data,
            settings: Settings::default(),
            imports: Vec::new(),
            source_path,
            source_directory,
        };
        node.refresh()?;
        Ok(node)
    }

    /// Re-derive settings and imports after the data was changed
    pub fn refresh(&mut self) -> Result<()> {
        self.settings = Settings::from_mapping(&self.data, &self.source_path)?;
        self.imports = match self.data.get(IMPORT_KEY) {
            Some(value) => ImportSpec::list_from_value(value, true)?,
            None => Vec::new(),
        };
        Ok(())
    }

    /// Remove the `import` key once the imports have been loaded
    pub fn strip_imports(&mut self) {
        take_key(&mut self.data, IMPORT_KEY);
        self.imports.clear();
    }

    /// The configuration data
    pub fn data(&self) -> &Mapping {
        &self.data
    }

    /// Mutable access to the configuration data
    ///
    /// Call [`ConfigNode::refresh`] after changing a reserved key.
    pub fn data_mut(&mut self) -> &mut Mapping {
        &mut self.data
    }

    /// Consume the node, returning its data
    pub fn into_data(self) -> Mapping {
        self.data
    }

    /// Look up a top-level key
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.data.get(key)
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn imports(&self) -> &[ImportSpec] {
        &self.imports
    }

    pub fn source_path(&self) -> &Path {
        &self.source_path
    }

    pub fn source_directory(&self) -> &Path {
        &self.source_directory
    }
}
