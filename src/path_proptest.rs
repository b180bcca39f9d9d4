//! Property-based tests for target path resolution.
//!
//! These tests use proptest to generate random target strings and verify
//! that resolution invariants hold for all of them.

#[cfg(all(test, unix))]
mod proptest_tests {
    use crate::path::{normalize_lexically, resolve_with_home};
    use proptest::prelude::*;
    use std::path::{Component, Path, PathBuf};

    // Roots that do not exist, so canonicalization stops at `/`
    const ROOT: &str = "/nonexistent-sharables-project";
    const HOME: &str = "/nonexistent-sharables-home";

    fn segments() -> impl Strategy<Value = Vec<String>> {
        prop::collection::vec("[a-zA-Z0-9_-]{1,8}", 1..6)
    }

    fn dotted_segments() -> impl Strategy<Value = Vec<String>> {
        prop::collection::vec(
            prop_oneof![
                3 => "[a-z]{1,6}".prop_map(String::from),
                1 => Just(".".to_string()),
                1 => Just("..".to_string()),
            ],
            1..8,
        )
    }

    proptest! {
        /// Property: resolution always yields an absolute path
        #[test]
        fn resolve_is_always_absolute(parts in dotted_segments()) {
            let raw = parts.join("/");
            let resolved = resolve_with_home(&raw, Path::new(ROOT), Some(Path::new(HOME))).unwrap();
            prop_assert!(resolved.is_absolute(), "{:?} is not absolute", resolved);
        }

        /// Property: resolution never leaves `.` or `..` components behind
        #[test]
        fn resolve_has_no_dot_components(parts in dotted_segments()) {
            let raw = parts.join("/");
            let resolved = resolve_with_home(&raw, Path::new(ROOT), Some(Path::new(HOME))).unwrap();
            for component in resolved.components() {
                prop_assert!(
                    !matches!(component, Component::CurDir | Component::ParentDir),
                    "{:?} still contains a dot component",
                    resolved
                );
            }
        }

        /// Property: resolution is deterministic
        #[test]
        fn resolve_is_deterministic(parts in dotted_segments()) {
            let raw = parts.join("/");
            let first = resolve_with_home(&raw, Path::new(ROOT), Some(Path::new(HOME))).unwrap();
            let second = resolve_with_home(&raw, Path::new(ROOT), Some(Path::new(HOME))).unwrap();
            prop_assert_eq!(first, second);
        }

        /// Property: plain relative targets land under the project root
        #[test]
        fn relative_targets_join_project_root(parts in segments()) {
            let raw = parts.join("/");
            let resolved = resolve_with_home(&raw, Path::new(ROOT), Some(Path::new(HOME))).unwrap();
            prop_assert_eq!(resolved, PathBuf::from(ROOT).join(&raw));
        }

        /// Property: home-relative targets ignore the project root
        #[test]
        fn home_targets_ignore_project_root(parts in segments(), root in segments()) {
            let raw = format!("~/{}", parts.join("/"));
            let project_root = PathBuf::from("/").join(root.join("/"));
            let resolved = resolve_with_home(&raw, &project_root, Some(Path::new(HOME))).unwrap();
            prop_assert_eq!(resolved, PathBuf::from(HOME).join(parts.join("/")));
        }

        /// Property: lexical normalization is idempotent
        #[test]
        fn normalize_is_idempotent(parts in dotted_segments()) {
            let path = PathBuf::from("/").join(parts.join("/"));
            let once = normalize_lexically(&path);
            let twice = normalize_lexically(&once);
            prop_assert_eq!(once, twice);
        }
    }
}
