//! Path queries over nested configuration values
//!
//! A query is a dotted path whose components are an optional key followed by
//! zero or more bracketed indices:
//!
//! - `database.host`
//! - `servers[0].name`
//! - `[2]` (index into a top-level sequence)
//! - `matrix[1][0]`
//!
//! Empty components (`a..b`, a leading or trailing dot) are skipped, and an
//! empty query addresses the whole structure.
//!
//! ## Example
//!
//! ```
//! use cascade_config::query::find;
//! use serde_yaml::Value;
//!
//! let root: Value = serde_yaml::from_str("col:\n  a:\n    - b: source").unwrap();
//! assert_eq!(find(&root, "col.a[0].b").unwrap(), Some(&Value::from("source")));
//! assert_eq!(find(&root, "col.missing").unwrap(), None);
//! ```

use std::sync::LazyLock;

use regex::Regex;
use serde_yaml::Value;

use crate::error::{Error, Result};
use crate::merge::type_name;

static COMPONENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<key>[^\[\]]*)(?P<indices>(?:\[\d+\])*)$").expect("component regex is valid")
});

static INDEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[(\d+)\]").expect("index regex is valid"));

/// Represents a segment in a query path
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PathSegment {
    /// A named key for accessing mapping members
    Key(String),
    /// A numeric index for accessing sequence elements
    Index(usize),
}

/// Parse a query string into segments
///
/// # Errors
///
/// Returns `Error::InvalidQuery` when a component has unbalanced brackets
/// or a non-numeric index.
pub fn parse_query(query: &str) -> Result<Vec<PathSegment>> {
    let mut segments = Vec::new();

    for component in query.split('.').map(str::trim) {
        if component.is_empty() {
            continue;
        }

        let captures = COMPONENT
            .captures(component)
            .ok_or_else(|| Error::InvalidQuery {
                query: query.to_string(),
                message: format!(
                    "component '{}' must be a key followed by [N] indices",
                    component
                ),
            })?;

        let key = &captures["key"];
        if !key.is_empty() {
            segments.push(PathSegment::Key(key.to_string()));
        }

        for index in INDEX.captures_iter(&captures["indices"]) {
            let index = index[1].parse::<usize>().map_err(|err| Error::InvalidQuery {
                query: query.to_string(),
                message: format!("index in '{}' is out of range: {}", component, err),
            })?;
            segments.push(PathSegment::Index(index));
        }
    }

    Ok(segments)
}

/// Find the value at `query`
///
/// Returns `Ok(None)` when a key is missing or an index is out of bounds.
///
/// # Errors
///
/// Returns `Error::TypeMismatch` when a key is applied to a non-mapping or an
/// index to a non-sequence, and `Error::InvalidQuery` for malformed queries.
pub fn find<'a>(root: &'a Value, query: &str) -> Result<Option<&'a Value>> {
    find_with(root, query, |value, _parent| value)
}

/// Find the value at `query` and hand it to `action` with its parent
///
/// `action` receives the found value and the mapping or sequence that
/// directly contains it; the parent is `None` only for the empty query. The
/// result of `action` is returned in place of the raw value, which lets a
/// caller retrieve the containing structure instead of the leaf.
pub fn find_with<'a, T, F>(root: &'a Value, query: &str, action: F) -> Result<Option<T>>
where
    F: FnOnce(&'a Value, Option<&'a Value>) -> T,
{
    let segments = parse_query(query)?;
    let found = descend(root, None, &segments, query)?;
    Ok(found.map(|(value, parent)| action(value, parent)))
}

/// Resolve several queries, keeping only the ones that were found
pub fn find_all<'a, I, S>(root: &'a Value, queries: I) -> Result<Vec<&'a Value>>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut found = Vec::new();
    for query in queries {
        if let Some(value) = find(root, query.as_ref())? {
            found.push(value);
        }
    }
    Ok(found)
}

type Found<'a> = (&'a Value, Option<&'a Value>);

fn descend<'a>(
    current: &'a Value,
    parent: Option<&'a Value>,
    segments: &[PathSegment],
    query: &str,
) -> Result<Option<Found<'a>>> {
    let Some((segment, rest)) = segments.split_first() else {
        return Ok(Some((current, parent)));
    };

    let next = match segment {
        PathSegment::Key(key) => current
            .as_mapping()
            .ok_or_else(|| mismatch(query, "Mapping", current))?
            .get(key.as_str()),
        PathSegment::Index(index) => current
            .as_sequence()
            .ok_or_else(|| mismatch(query, "Sequence", current))?
            .get(*index),
    };

    match next {
        Some(value) => descend(value, Some(current), rest, query),
        None => Ok(None),
    }
}

fn mismatch(query: &str, expected: &'static str, found: &Value) -> Error {
    Error::TypeMismatch {
        context: format!("query '{}'", query),
        expected,
        found: type_name(found),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Value {
        serde_yaml::from_str(
            r#"
name: app
col:
  a:
    - b: source
    - b: other
matrix:
  - [1, 2]
  - [3, 4]
"#,
        )
        .unwrap()
    }

    #[test]
    fn test_parse_query_mixed() {
        let segments = parse_query("servers[0].host").unwrap();
        assert_eq!(
            segments,
            vec![
                PathSegment::Key("servers".to_string()),
                PathSegment::Index(0),
                PathSegment::Key("host".to_string()),
            ]
        );
    }

    #[test]
    fn test_parse_query_chained_and_bare_indices() {
        assert_eq!(
            parse_query("a[1][2]").unwrap(),
            vec![
                PathSegment::Key("a".to_string()),
                PathSegment::Index(1),
                PathSegment::Index(2),
            ]
        );
        assert_eq!(parse_query("[2]").unwrap(), vec![PathSegment::Index(2)]);
    }

    #[test]
    fn test_parse_query_skips_empty_components() {
        assert_eq!(
            parse_query(".a..b.").unwrap(),
            vec![
                PathSegment::Key("a".to_string()),
                PathSegment::Key("b".to_string()),
            ]
        );
        assert!(parse_query("").unwrap().is_empty());
    }

    #[test]
    fn test_parse_query_rejects_bad_index() {
        assert!(matches!(
            parse_query("a[x]"),
            Err(Error::InvalidQuery { .. })
        ));
        assert!(matches!(parse_query("a]"), Err(Error::InvalidQuery { .. })));
        assert!(matches!(
            parse_query("a[0]b"),
            Err(Error::InvalidQuery { .. })
        ));
    }

    #[test]
    fn test_find_nested_value() {
        let root = sample();
        assert_eq!(
            find(&root, "col.a[0].b").unwrap(),
            Some(&Value::from("source"))
        );
        assert_eq!(
            find(&root, "matrix[1][0]").unwrap(),
            Some(&Value::Number(3.into()))
        );
    }

    #[test]
    fn test_find_missing_is_not_found() {
        let root = sample();
        assert_eq!(find(&root, "col.missing").unwrap(), None);
        assert_eq!(find(&root, "col.a[5]").unwrap(), None);
    }

    #[test]
    fn test_find_type_mismatch() {
        let root = sample();
        assert!(matches!(
            find(&root, "name.first"),
            Err(Error::TypeMismatch {
                expected: "Mapping",
                ..
            })
        ));
        assert!(matches!(
            find(&root, "col[0]"),
            Err(Error::TypeMismatch {
                expected: "Sequence",
                ..
            })
        ));
    }

    #[test]
    fn test_find_empty_query_returns_root() {
        let root = sample();
        assert_eq!(find(&root, "").unwrap(), Some(&root));
    }

    #[test]
    fn test_find_with_returns_parent() {
        let root = sample();
        let parent = find_with(&root, "name", |_, parent| parent).unwrap();
        assert_eq!(parent, Some(Some(&root)));

        let parent = find_with(&root, "col.a[1]", |_, parent| parent).unwrap();
        let expected = find(&root, "col.a").unwrap();
        assert_eq!(parent, Some(expected));
    }

    #[test]
    fn test_find_with_skips_action_when_missing() {
        let root = sample();
        let mut called = false;
        let result = find_with(&root, "nope", |value, _| {
            called = true;
            value.clone()
        })
        .unwrap();
        assert!(result.is_none());
        assert!(!called);
    }

    #[test]
    fn test_find_all_skips_missing() {
        let root = sample();
        let found = find_all(&root, ["name", "missing", "col.a[1].b"]).unwrap();
        assert_eq!(found, vec![&Value::from("app"), &Value::from("other")]);
    }
}
