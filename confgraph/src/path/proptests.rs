//! Property-based tests for document-relative path resolution.

use super::normalize::collapse_dots;
use super::resolver::PathResolver;
use proptest::prelude::*;
use std::path::PathBuf;

fn segment_strategy() -> impl Strategy<Value = String> {
    "[a-z0-9_-]{1,12}"
}

fn relative_path_strategy() -> impl Strategy<Value = PathBuf> {
    prop::collection::vec(segment_strategy(), 1..6).prop_map(|parts| parts.iter().collect())
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 2000,
        .. ProptestConfig::default()
    })]

    // Resolved paths always live under the base directory when no '..' is used
    #[test]
    fn resolved_relative_paths_stay_under_base(rel in relative_path_strategy()) {
        let resolver = PathResolver::new("/base/conf");
        let resolved = resolver.resolve(&rel).unwrap();
        prop_assert!(resolved.starts_with("/base/conf"));
        prop_assert!(resolved.ends_with(&rel));
    }

    // Collapsing is idempotent
    #[test]
    fn collapse_is_idempotent(rel in relative_path_strategy()) {
        let once = collapse_dots(&PathBuf::from("/r").join(&rel).join("..")).unwrap();
        let twice = collapse_dots(&once).unwrap();
        prop_assert_eq!(once, twice);
    }

    // Resolving an already-resolved path is a no-op
    #[test]
    fn resolution_is_idempotent(rel in relative_path_strategy()) {
        let resolver = PathResolver::new("/base");
        let once = resolver.resolve(&rel).unwrap();
        let twice = resolver.resolve(&once).unwrap();
        prop_assert_eq!(once, twice);
    }
}
