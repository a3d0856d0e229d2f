//! Collision-free filename allocation for a batch of blocks.

use std::collections::HashSet;
use std::path::Path;

use crate::classify::{ExtensionToken, extract_type_name};

/// Existence check for candidate filenames in the target directory.
///
/// Allocation consults this before handing out a name, so tests can swap in
/// an in-memory probe and exercise collision handling without a filesystem.
pub trait NameProbe {
    fn exists(&self, name: &str) -> bool;
}

/// Probe backed by the real extraction directory.
pub struct DirectoryProbe<'a> {
    dir: &'a Path,
}

impl<'a> DirectoryProbe<'a> {
    pub fn new(dir: &'a Path) -> Self {
        Self { dir }
    }
}

impl NameProbe for DirectoryProbe<'_> {
    fn exists(&self, name: &str) -> bool {
        self.dir.join(name).exists()
    }
}

/// Mutable per-run allocation state.
///
/// Holds the names already handed out this run plus the 1-based block
/// counter that seeds generic base names. The counter tracks the block's
/// position in the document, so it advances for every scanned block,
/// including ones skipped as empty.
#[derive(Debug, Clone)]
pub struct BatchState {
    names: HashSet<String>,
    counter: usize,
}

impl BatchState {
    pub fn new() -> Self {
        Self {
            names: HashSet::new(),
            counter: 1,
        }
    }

    /// Position of the block currently being processed.
    pub fn counter(&self) -> usize {
        self.counter
    }

    /// Move to the next block position.
    pub fn advance(&mut self) {
        self.counter += 1;
    }

    /// Whether `name` was already allocated this run.
    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    /// Release a name whose write failed so a later block can take the slot.
    pub fn release(&mut self, name: &str) {
        self.names.remove(name);
    }
}

impl Default for BatchState {
    fn default() -> Self {
        Self::new()
    }
}

/// Derive a unique filename for a classified block and record it in `state`.
///
/// Java blocks are named after their declared type when one exists; named
/// files keep their bare token; everything else gets a counter-based generic
/// name. The result collides with neither the target directory nor any name
/// allocated earlier in this run.
pub fn allocate(
    token: ExtensionToken,
    content: &str,
    state: &mut BatchState,
    probe: &dyn NameProbe,
) -> String {
    let name = match token {
        ExtensionToken::Java => match extract_type_name(content) {
            Some(type_name) => unique_name(type_name, Some("java"), state, probe),
            None => {
                let base = format!("java_code_{}", state.counter());
                unique_name(&base, Some("java"), state, probe)
            }
        },
        _ if token.is_bare_filename() => unique_name(token.as_str(), None, state, probe),
        _ => {
            let base = format!("extracted_code_{}", state.counter());
            unique_name(&base, Some(token.as_str()), state, probe)
        }
    };
    state.names.insert(name.clone());
    name
}

/// Append `_1`, `_2`, ... between base and extension until the candidate is
/// clear of both the directory and the names already taken this run.
fn unique_name(
    base: &str,
    extension: Option<&str>,
    state: &BatchState,
    probe: &dyn NameProbe,
) -> String {
    let render = |suffix: &str| match extension {
        Some(ext) => format!("{base}{suffix}.{ext}"),
        None => format!("{base}{suffix}"),
    };
    let mut candidate = render("");
    let mut attempt = 1usize;
    while probe.exists(&candidate) || state.contains(&candidate) {
        log::debug!("name '{candidate}' taken, retrying");
        candidate = render(&format!("_{attempt}"));
        attempt += 1;
    }
    candidate
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    /// In-memory stand-in for the extraction directory.
    #[derive(Default)]
    struct FakeDir(HashSet<String>);

    impl FakeDir {
        fn with(names: &[&str]) -> Self {
            Self(names.iter().map(|n| n.to_string()).collect())
        }
    }

    impl NameProbe for FakeDir {
        fn exists(&self, name: &str) -> bool {
            self.0.contains(name)
        }
    }

    #[test]
    fn counter_starts_at_one() {
        let mut state = BatchState::new();
        assert_eq!(state.counter(), 1);
        state.advance();
        assert_eq!(state.counter(), 2);
    }

    #[test]
    fn generic_name_uses_counter_and_token() {
        let mut state = BatchState::new();
        let dir = FakeDir::default();
        assert_eq!(
            allocate(ExtensionToken::Py, "print('hi')", &mut state, &dir),
            "extracted_code_1.py"
        );
        state.advance();
        assert_eq!(
            allocate(ExtensionToken::Sql, "SELECT 1", &mut state, &dir),
            "extracted_code_2.sql"
        );
    }

    #[test]
    fn java_block_is_named_after_its_type() {
        let mut state = BatchState::new();
        let dir = FakeDir::default();
        let name = allocate(
            ExtensionToken::Java,
            "public class Greeter {}",
            &mut state,
            &dir,
        );
        assert_eq!(name, "Greeter.java");
    }

    #[test]
    fn java_without_a_type_gets_the_generic_java_name() {
        let mut state = BatchState::new();
        state.advance();
        state.advance();
        let dir = FakeDir::default();
        let name = allocate(ExtensionToken::Java, "System.out.println(1);", &mut state, &dir);
        assert_eq!(name, "java_code_3.java");
    }

    #[test]
    fn named_files_have_no_extension() {
        let mut state = BatchState::new();
        let dir = FakeDir::default();
        assert_eq!(
            allocate(ExtensionToken::Dockerfile, "FROM alpine", &mut state, &dir),
            "Dockerfile"
        );
        assert_eq!(
            allocate(ExtensionToken::Makefile, "all:", &mut state, &dir),
            "Makefile"
        );
    }

    #[test]
    fn batch_collisions_suffix_before_the_extension() {
        let mut state = BatchState::new();
        let dir = FakeDir::default();
        assert_eq!(
            allocate(ExtensionToken::Java, "class Widget {}", &mut state, &dir),
            "Widget.java"
        );
        assert_eq!(
            allocate(ExtensionToken::Java, "class Widget {}", &mut state, &dir),
            "Widget_1.java"
        );
        assert_eq!(
            allocate(ExtensionToken::Java, "class Widget {}", &mut state, &dir),
            "Widget_2.java"
        );
    }

    #[test]
    fn named_file_collisions_suffix_at_the_end() {
        let mut state = BatchState::new();
        let dir = FakeDir::default();
        assert_eq!(
            allocate(ExtensionToken::Dockerfile, "FROM a", &mut state, &dir),
            "Dockerfile"
        );
        assert_eq!(
            allocate(ExtensionToken::Dockerfile, "FROM b", &mut state, &dir),
            "Dockerfile_1"
        );
        assert_eq!(
            allocate(ExtensionToken::Dockerfile, "FROM c", &mut state, &dir),
            "Dockerfile_2"
        );
    }

    #[test]
    fn directory_collisions_count_too() {
        let mut state = BatchState::new();
        let dir = FakeDir::with(&["extracted_code_1.py", "extracted_code_1_1.py"]);
        assert_eq!(
            allocate(ExtensionToken::Py, "import os", &mut state, &dir),
            "extracted_code_1_2.py"
        );
    }

    #[test]
    fn released_name_can_be_taken_again() {
        let mut state = BatchState::new();
        let dir = FakeDir::default();
        let first = allocate(ExtensionToken::Java, "class App {}", &mut state, &dir);
        assert_eq!(first, "App.java");
        state.release(&first);
        let second = allocate(ExtensionToken::Java, "class App {}", &mut state, &dir);
        assert_eq!(second, "App.java");
    }

    #[test]
    fn same_counter_same_token_still_unique() {
        // The counter only advances between blocks, so repeated allocation at
        // one position must fall back to suffixing.
        let mut state = BatchState::new();
        let dir = FakeDir::default();
        let a = allocate(ExtensionToken::Txt, "one", &mut state, &dir);
        let b = allocate(ExtensionToken::Txt, "two", &mut state, &dir);
        assert_eq!(a, "extracted_code_1.txt");
        assert_eq!(b, "extracted_code_1_1.txt");
    }
}
