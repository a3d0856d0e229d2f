use proptest::prelude::*;
use std::collections::HashSet;

use unfence_lib::classify::{ExtensionToken, classify};
use unfence_lib::naming::{BatchState, NameProbe, allocate};

/// Probe for a directory with nothing in it.
struct EmptyDir;

impl NameProbe for EmptyDir {
    fn exists(&self, _name: &str) -> bool {
        false
    }
}

/// Probe over a fixed set of names.
struct FixedDir(HashSet<String>);

impl NameProbe for FixedDir {
    fn exists(&self, name: &str) -> bool {
        self.0.contains(name)
    }
}

proptest! {
    #[test]
    fn classification_is_deterministic(content in r"\PC*", hint in proptest::option::of(r"[a-zA-Z+#]{0,10}")) {
        let first = classify(&content, hint.as_deref());
        let second = classify(&content, hint.as_deref());
        prop_assert_eq!(first, second);
    }

    #[test]
    fn python_hint_wins_for_any_content(content in r"\PC*") {
        prop_assert_eq!(classify(&content, Some("python")), ExtensionToken::Py);
    }

    #[test]
    fn dockerfile_hint_wins_for_any_content(content in r"\PC*") {
        prop_assert_eq!(classify(&content, Some("dockerfile")), ExtensionToken::Dockerfile);
    }

    #[test]
    fn surrounding_whitespace_never_changes_the_token(
        content in r"\PC*",
        left in r"[ \t\r\n]{0,6}",
        right in r"[ \t\r\n]{0,6}",
    ) {
        let padded = format!("{left}{content}{right}");
        prop_assert_eq!(classify(&padded, None), classify(&content, None));
    }

    #[test]
    fn any_hint_resolves_to_some_token(hint in r"[\x20-\x7e]{0,16}") {
        // Total over arbitrary printable hints, garbage included.
        let _ = classify("", Some(&hint));
    }

    #[test]
    fn repeated_identical_java_blocks_get_monotonic_suffixes(n in 1usize..8) {
        let mut state = BatchState::new();
        let mut seen = Vec::new();
        for _ in 0..n {
            seen.push(allocate(ExtensionToken::Java, "class Widget {}", &mut state, &EmptyDir));
        }
        let mut expected = vec!["Widget.java".to_string()];
        for i in 1..n {
            expected.push(format!("Widget_{i}.java"));
        }
        prop_assert_eq!(seen, expected);
    }

    #[test]
    fn allocation_avoids_every_preexisting_name(taken in proptest::collection::hash_set(r"extracted_code_1(_[1-9])?\.py", 0..6)) {
        let dir = FixedDir(taken.clone());
        let mut state = BatchState::new();
        let name = allocate(ExtensionToken::Py, "import os", &mut state, &dir);
        prop_assert!(!taken.contains(&name));
        prop_assert!(name.starts_with("extracted_code_1"));
        prop_assert!(name.ends_with(".py"));
    }

    #[test]
    fn allocated_names_within_a_run_are_all_distinct(tokens in proptest::collection::vec(0usize..4, 1..12)) {
        let choices = [
            ExtensionToken::Py,
            ExtensionToken::Java,
            ExtensionToken::Dockerfile,
            ExtensionToken::Txt,
        ];
        let mut state = BatchState::new();
        let mut seen = HashSet::new();
        for index in tokens {
            let name = allocate(choices[index], "class Widget {}", &mut state, &EmptyDir);
            prop_assert!(seen.insert(name));
            state.advance();
        }
    }
}
