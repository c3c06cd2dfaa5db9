//! Recursive merging of YAML values
//!
//! Mappings are merged key by key, recursing when both sides hold the same
//! container kind. Any other combination is an overwrite: the source value
//! replaces the target value. Sequences follow the [`ListPolicy`].

use log::trace;
use serde_yaml::{Mapping, Sequence, Value};

use super::ListPolicy;

/// Merge each source mapping into `target` in order
///
/// Later sources win for scalars and for values whose container kinds
/// differ.
pub fn merge_mappings<'a, I>(mut target: Mapping, sources: I, policy: ListPolicy) -> Mapping
where
    I: IntoIterator<Item = &'a Mapping>,
{
    for source in sources {
        merge_mapping_into(&mut target, source, policy);
    }
    target
}

/// Combine sequences according to `policy`
pub fn merge_sequences<'a, I>(mut target: Sequence, sources: I, policy: ListPolicy) -> Sequence
where
    I: IntoIterator<Item = &'a Sequence>,
{
    match policy {
        ListPolicy::Append => {
            for source in sources {
                target.extend(source.iter().cloned());
            }
        }
        ListPolicy::Insert => {
            let sources: Vec<&Sequence> = sources.into_iter().collect();
            for source in sources.into_iter().rev() {
                target.extend(source.iter().cloned());
            }
        }
        ListPolicy::ByIndex => {
            for source in sources {
                merge_by_index(&mut target, source);
            }
        }
    }
    target
}

fn merge_mapping_into(target: &mut Mapping, source: &Mapping, policy: ListPolicy) {
    for (key, value) in source {
        match target.get_mut(key) {
            Some(existing) => merge_value_into(existing, value, policy),
            None => {
                target.insert(key.clone(), value.clone());
            }
        }
    }
}

fn merge_value_into(existing: &mut Value, value: &Value, policy: ListPolicy) {
    match (existing, value) {
        (Value::Mapping(target), Value::Mapping(source)) => {
            merge_mapping_into(target, source, policy);
        }
        (Value::Sequence(target), Value::Sequence(source)) => {
            let merged = merge_sequences(std::mem::take(target), [source], policy);
            *target = merged;
        }
        (existing, value) => {
            if is_container(existing) || is_container(value) {
                trace!(
                    "Replacing {} with {} during merge",
                    type_name(existing),
                    type_name(value)
                );
            }
            *existing = value.clone();
        }
    }
}

fn merge_by_index(target: &mut Sequence, source: &Sequence) {
    for (index, item) in source.iter().enumerate() {
        if index < target.len() {
            merge_value_into(&mut target[index], item, ListPolicy::ByIndex);
        } else {
            target.push(item.clone());
        }
    }
}

fn is_container(value: &Value) -> bool {
    matches!(value, Value::Mapping(_) | Value::Sequence(_))
}

/// Get a human-readable type name for a YAML value
///
/// Used for logging and error messages to describe the type of a value.
pub fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "Null",
        Value::Bool(_) => "Bool",
        Value::Number(_) => "Number",
        Value::String(_) => "String",
        Value::Sequence(_) => "Sequence",
        Value::Mapping(_) => "Mapping",
        Value::Tagged(_) => "Tagged",
    }
}
