//! Environment overlays
//!
//! A node may carry named overlays under `environments`. When the resolver
//! runs with an environment name, the matching overlay is merged into the
//! node right after parsing, so its values and imports take part in the
//! cascade like any other data.

use log::debug;
use serde_yaml::{Mapping, Value};

use crate::config::{take_key, ConfigNode, ENVIRONMENTS_KEY, IMPORT_KEY};
use crate::error::{Error, Result};
use crate::merge::{apply_policy, type_name};

/// Merge the overlay `environments.<name>` into `node`
///
/// The overlay's imports are placed ahead of the node's own so that, once
/// loaded, the node's imports override them. Overlay values override the
/// node's values according to the node's merge policy.
///
/// Returns `true` when the node declares the environment.
///
/// # Errors
///
/// Returns `Error::TypeMismatch` when `environments` or the selected overlay
/// is not a mapping, and propagates failures re-reading the node's metadata.
pub fn apply_environment(node: &mut ConfigNode, name: &str) -> Result<bool> {
    let Some(mut fragment) = environment_fragment(node, name)? else {
        return Ok(false);
    };

    let mut imports = import_entries(take_key(&mut fragment, IMPORT_KEY));
    imports.extend(import_entries(take_key(node.data_mut(), IMPORT_KEY)));

    let policy = node.settings().merge_policy();
    let data = std::mem::take(node.data_mut());
    let mut merged = apply_policy(data, [&fragment], policy);
    if !imports.is_empty() {
        merged.insert(Value::from(IMPORT_KEY), Value::Sequence(imports));
    }
    *node.data_mut() = merged;
    node.refresh()?;

    debug!(
        "Applied environment '{}' to {}",
        name,
        node.source_path().display()
    );
    Ok(true)
}

fn environment_fragment(node: &ConfigNode, name: &str) -> Result<Option<Mapping>> {
    let environments = match node.get(ENVIRONMENTS_KEY) {
        None | Some(Value::Null) => return Ok(None),
        Some(Value::Mapping(environments)) => environments,
        Some(other) => {
            return Err(Error::TypeMismatch {
                context: format!("'{}' in {}", ENVIRONMENTS_KEY, node.source_path().display()),
                expected: "Mapping",
                found: type_name(other),
            })
        }
    };

    match environments.get(name) {
        None => Ok(None),
        Some(Value::Null) => Ok(Some(Mapping::new())),
        Some(Value::Mapping(fragment)) => Ok(Some(fragment.clone())),
        Some(other) => Err(Error::TypeMismatch {
            context: format!(
                "environment '{}' in {}",
                name,
                node.source_path().display()
            ),
            expected: "Mapping",
            found: type_name(other),
        }),
    }
}

fn import_entries(value: Option<Value>) -> Vec<Value> {
    match value {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Sequence(entries)) => entries,
        Some(single) => vec![single],
    }
}
