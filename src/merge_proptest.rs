//! Property-based tests for the deep merge engine.
//!
//! Values are generated as small YAML trees mixing scalars, sequences and
//! mappings so that every merge branch is exercised.

#[cfg(test)]
mod proptest_tests {
    use crate::merge::{merge_mappings, merge_sequences, merge_values, ListPolicy};
    use proptest::prelude::*;
    use serde_yaml::{Mapping, Value};

    fn scalar() -> impl Strategy<Value = Value> {
        prop_oneof![
            Just(Value::Null),
            any::<bool>().prop_map(Value::Bool),
            any::<i64>().prop_map(|n| Value::Number(n.into())),
            "[a-z]{0,6}".prop_map(Value::String),
        ]
    }

    fn value() -> impl Strategy<Value = Value> {
        scalar().prop_recursive(3, 24, 4, |inner| {
            prop_oneof![
                prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Sequence),
                prop::collection::btree_map("[a-d]", inner, 0..4).prop_map(|entries| {
                    Value::Mapping(
                        entries
                            .into_iter()
                            .map(|(k, v)| (Value::String(k), v))
                            .collect(),
                    )
                }),
            ]
        })
    }

    fn mapping() -> impl Strategy<Value = Mapping> {
        prop::collection::btree_map("[a-d]", value(), 0..5).prop_map(|entries| {
            entries
                .into_iter()
                .map(|(k, v)| (Value::String(k), v))
                .collect()
        })
    }

    fn policy() -> impl Strategy<Value = ListPolicy> {
        prop_oneof![
            Just(ListPolicy::Append),
            Just(ListPolicy::Insert),
            Just(ListPolicy::ByIndex),
        ]
    }

    proptest! {
        /// Property: merging into an empty mapping reproduces the source
        #[test]
        fn empty_target_is_identity(a in mapping(), policy in policy()) {
            let merged = merge_mappings(Mapping::new(), [&a], policy);
            prop_assert_eq!(merged, a);
        }

        /// Property: merging a result with no sources changes nothing
        #[test]
        fn merge_without_sources_is_idempotent(
            a in mapping(),
            b in mapping(),
            policy in policy(),
        ) {
            let once = merge_mappings(a, [&b], policy);
            let again = merge_mappings(once.clone(), std::iter::empty(), policy);
            prop_assert_eq!(again, once);
        }

        /// Property: every source key is present in the result
        #[test]
        fn result_contains_all_keys(a in mapping(), b in mapping(), policy in policy()) {
            let merged = merge_mappings(a.clone(), [&b], policy);
            for key in a.keys().chain(b.keys()) {
                prop_assert!(merged.contains_key(key));
            }
        }

        /// Property: a scalar from the source always overrides the target
        #[test]
        fn source_scalars_win(a in mapping(), key in "[a-d]", s in scalar()) {
            let mut b = Mapping::new();
            b.insert(Value::String(key.clone()), s.clone());
            let merged = merge_mappings(a, [&b], ListPolicy::Append);
            prop_assert_eq!(merged.get(key.as_str()), Some(&s));
        }

        /// Property: append keeps every element in order
        #[test]
        fn append_concatenates(
            a in prop::collection::vec(scalar(), 0..6),
            b in prop::collection::vec(scalar(), 0..6),
        ) {
            let merged = merge_sequences(a.clone(), [&b], ListPolicy::Append);
            let mut expected = a;
            expected.extend(b);
            prop_assert_eq!(merged, expected);
        }

        /// Property: by-index merging yields the longer of the two lengths
        #[test]
        fn by_index_length_is_max(
            a in prop::collection::vec(value(), 0..6),
            b in prop::collection::vec(value(), 0..6),
        ) {
            let expected = a.len().max(b.len());
            let merged = merge_sequences(a, [&b], ListPolicy::ByIndex);
            prop_assert_eq!(merged.len(), expected);
        }

        /// Property: mixing a mapping target with a sequence source is rejected
        #[test]
        fn mismatched_top_level_kinds_fail(a in mapping(), b in prop::collection::vec(scalar(), 0..3)) {
            let result = merge_values(Value::Mapping(a), &[Value::Sequence(b)], ListPolicy::Append);
            prop_assert!(result.is_err());
        }
    }
}
