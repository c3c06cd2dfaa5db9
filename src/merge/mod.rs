//! Deep merge engine
//!
//! This module combines two or more structured values into one. It is the
//! engine behind every merge the cascade performs: environment overlays into
//! a node, sibling files into a level result, and level results into the
//! final configuration.
//!
//! ## Policies
//!
//! Mappings always merge key by key; sequences follow a [`ListPolicy`]:
//!
//! - `Append` - target elements, then each source's elements in order
//! - `Insert` - target elements, then the sources in reverse order
//! - `ByIndex` - element-wise merge, padding to the longer sequence
//!
//! [`MergePolicy`] adds the shallow mode a node selects with
//! `use_deep_merge: false`, where top-level keys are simply replaced.
//!
//! ## Example
//!
//! ```
//! use cascade_config::merge::{merge_values, ListPolicy};
//! use serde_yaml::Value;
//!
//! let target: Value = serde_yaml::from_str("list: [1, 2]\nname: base").unwrap();
//! let source: Value = serde_yaml::from_str("list: [3, 4]\nname: child").unwrap();
//!
//! let merged = merge_values(target, &[source], ListPolicy::Append).unwrap();
//! assert_eq!(merged["name"], Value::from("child"));
//! assert_eq!(merged["list"].as_sequence().unwrap().len(), 4);
//! ```

pub mod yaml;

use serde_yaml::{Mapping, Value};

use crate::error::{Error, Result};

pub use yaml::{merge_mappings, merge_sequences, type_name};

/// How sequences are combined when both sides hold one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ListPolicy {
    /// Concatenate target and sources in source order
    #[default]
    Append,
    /// Concatenate target and sources in reverse source order
    Insert,
    /// Merge element-wise by position
    ByIndex,
}

/// How a set of mappings is combined
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergePolicy {
    /// Recursive merge with the given list policy
    Deep(ListPolicy),
    /// Replace top-level keys without descending into values
    Shallow,
}

impl Default for MergePolicy {
    fn default() -> Self {
        MergePolicy::Deep(ListPolicy::Append)
    }
}

/// Merge `sources` into `target`, returning the combined value
///
/// `target` and every source must be of the same container kind: all
/// mappings or all sequences.
///
/// # Errors
///
/// Returns `Error::TypeMismatch` when `target` is a scalar or a source is a
/// different container kind than `target`.
pub fn merge_values(target: Value, sources: &[Value], policy: ListPolicy) -> Result<Value> {
    match target {
        Value::Mapping(map) => {
            let sources = sources
                .iter()
                .map(|source| {
                    source
                        .as_mapping()
                        .ok_or_else(|| mismatch("Mapping", source))
                })
                .collect::<Result<Vec<_>>>()?;
            Ok(Value::Mapping(merge_mappings(map, sources, policy)))
        }
        Value::Sequence(seq) => {
            let sources = sources
                .iter()
                .map(|source| {
                    source
                        .as_sequence()
                        .ok_or_else(|| mismatch("Sequence", source))
                })
                .collect::<Result<Vec<_>>>()?;
            Ok(Value::Sequence(merge_sequences(seq, sources, policy)))
        }
        other => Err(Error::TypeMismatch {
            context: "merge target".to_string(),
            expected: "Mapping or Sequence",
            found: type_name(&other),
        }),
    }
}

/// Merge mappings according to a node's [`MergePolicy`]
pub fn apply_policy<'a, I>(mut target: Mapping, sources: I, policy: MergePolicy) -> Mapping
where
    I: IntoIterator<Item = &'a Mapping>,
{
    match policy {
        MergePolicy::Deep(list_policy) => merge_mappings(target, sources, list_policy),
        MergePolicy::Shallow => {
            for source in sources {
                for (key, value) in source {
                    target.insert(key.clone(), value.clone());
                }
            }
            target
        }
    }
}

fn mismatch(expected: &'static str, found: &Value) -> Error {
    Error::TypeMismatch {
        context: "merge source".to_string(),
        expected,
        found: type_name(found),
    }
}
