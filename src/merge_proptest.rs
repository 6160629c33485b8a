//! Property-based tests for the version merge rules.
//!
//! These tests use proptest to generate random per-version metadata and
//! verify that the stack-level fields follow the merge invariants for any
//! number and order of versions.

#[cfg(test)]
mod proptest_tests {
    use crate::devfile::DevfileMetadata;
    use crate::index::merge::backfill_meta;
    use crate::schema::EntryMeta;
    use proptest::prelude::*;
    use std::collections::BTreeSet;

    fn metadata() -> impl Strategy<Value = DevfileMetadata> {
        (
            prop::collection::vec("[a-d]", 0..4),
            prop::collection::vec(prop::sample::select(vec!["amd64", "arm64", "s390x"]), 0..3),
            prop::option::of("[a-z]{1,6}"),
        )
            .prop_map(|(tags, archs, provider)| DevfileMetadata {
                tags,
                architectures: archs.into_iter().map(str::to_string).collect(),
                provider: provider.unwrap_or_default(),
                ..DevfileMetadata::default()
            })
    }

    fn merge_all(versions: &[DevfileMetadata]) -> EntryMeta {
        versions
            .iter()
            .fold(EntryMeta::default(), |meta, version| backfill_meta(meta, version))
    }

    proptest! {
        /// Property: stack tags are the union of version tags, without duplicates
        #[test]
        fn tags_are_union_without_duplicates(versions in prop::collection::vec(metadata(), 0..5)) {
            let meta = merge_all(&versions);
            let expected: BTreeSet<&String> = versions.iter().flat_map(|v| &v.tags).collect();
            let actual: BTreeSet<&String> = meta.tags.iter().collect();
            prop_assert_eq!(actual.len(), meta.tags.len(), "duplicate tags in {:?}", meta.tags);
            prop_assert_eq!(actual, expected);
        }

        /// Property: the union does not depend on the order versions are merged in
        #[test]
        fn architectures_are_order_independent(versions in prop::collection::vec(metadata(), 0..5)) {
            let forward = merge_all(&versions);
            let mut reversed_versions = versions.clone();
            reversed_versions.reverse();
            let reversed = merge_all(&reversed_versions);

            let a: BTreeSet<_> = forward.architectures.into_iter().collect();
            let b: BTreeSet<_> = reversed.architectures.into_iter().collect();
            prop_assert_eq!(a, b);
        }

        /// Property: a scalar comes from the first version that supplies one
        #[test]
        fn provider_is_first_non_empty(versions in prop::collection::vec(metadata(), 0..5)) {
            let meta = merge_all(&versions);
            let expected = versions
                .iter()
                .map(|v| v.provider.clone())
                .find(|p| !p.is_empty())
                .unwrap_or_default();
            prop_assert_eq!(meta.provider, expected);
        }
    }
}
