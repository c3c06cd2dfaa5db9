//! Property-based tests for path manipulation functions.
//!
//! These tests use proptest to generate random inputs and verify that
//! invariants hold for all possible inputs.

#[cfg(test)]
mod proptest_tests {
    use crate::path::{glob_pattern, is_glob, normalize, resolve_against};
    use proptest::prelude::*;
    use std::path::{Component, Path};

    // ============================================================================
    // normalize property tests
    // ============================================================================

    proptest! {
        /// Property: normalizing an absolute path never leaves `.` or `..`
        #[test]
        fn normalize_absolute_has_no_dot_components(
            parts in prop::collection::vec("(\\.|\\.\\.|[a-z]{1,6})", 0..8)
        ) {
            let path = format!("/{}", parts.join("/"));
            let normalized = normalize(Path::new(&path));
            prop_assert!(normalized.is_absolute());
            for component in normalized.components() {
                prop_assert!(
                    !matches!(component, Component::CurDir | Component::ParentDir),
                    "normalize left {:?} in {:?}",
                    component,
                    normalized
                );
            }
        }

        /// Property: normalize is idempotent
        #[test]
        fn normalize_is_idempotent(
            parts in prop::collection::vec("(\\.|\\.\\.|[a-z]{1,6})", 0..8)
        ) {
            let path = format!("/{}", parts.join("/"));
            let once = normalize(Path::new(&path));
            let twice = normalize(&once);
            prop_assert_eq!(once, twice);
        }

        /// Property: plain relative names resolve to a direct child of the base
        #[test]
        fn resolve_against_plain_name_is_child(name in "[a-z]{1,8}\\.yaml") {
            let base = Path::new("/base/dir");
            let resolved = resolve_against(base, &name);
            prop_assert_eq!(resolved.parent(), Some(base));
        }
    }

    // ============================================================================
    // glob property tests
    // ============================================================================

    proptest! {
        /// Property: names without wildcard characters are never globs
        #[test]
        fn plain_names_are_not_globs(name in "[a-zA-Z0-9_./\\[\\]-]+") {
            prop_assert!(!is_glob(&name));
        }

        /// Property: a non-recursive pattern never keeps a `**` marker
        #[test]
        fn non_recursive_pattern_has_no_double_star(
            parts in prop::collection::vec("(\\*{1,4}|[a-z]{1,5})", 1..6)
        ) {
            let pattern = glob_pattern(Path::new("/base"), &parts.join("/"), false);
            prop_assert!(!pattern.contains("**"));
        }

        /// Property: wildcard characters in the base directory match literally
        #[test]
        fn base_directory_matches_literally(dir in "[a-z]{1,4}[*?\\[\\]][a-z]{0,4}") {
            let base = Path::new("/srv").join(&dir);
            let pattern = glob_pattern(&base, "*.yaml", false);
            let matcher = glob::Pattern::new(&pattern).unwrap();
            prop_assert!(matcher.matches_path(&base.join("config.yaml")));
        }
    }
}
