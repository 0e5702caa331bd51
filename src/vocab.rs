use std::collections::HashMap;

/// Deduplicating table of the strings hints refer to.
///
/// Replacement text is interned once and referenced by integer id from
/// patches, so a string repeated across thousands of candidates costs one
/// table entry. Ids are assigned in first-insertion order and stay stable
/// for the whole run.
///
/// Multi-file runs additionally record one path entry per input file. The
/// file region lives after the replacement entries on the wire, so a file's
/// serialized id is `file_id_base() + index` and is computed only at write
/// time; interning more replacements never invalidates a recorded index.
#[derive(Debug, Default)]
pub struct Vocabulary {
    entries: Vec<String>,
    index: HashMap<String, usize>,
    files: Vec<String>,
}

impl Vocabulary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Intern a replacement string, returning its stable id.
    ///
    /// Interning the same string again returns the same id.
    pub fn intern(&mut self, text: &str) -> usize {
        if let Some(&id) = self.index.get(text) {
            return id;
        }
        let id = self.entries.len();
        self.entries.push(text.to_string());
        self.index.insert(text.to_string(), id);
        id
    }

    /// Record one input file path, returning its 0-based file index.
    ///
    /// File paths are not deduplicated against replacement entries; the
    /// two regions are independent.
    pub fn add_file(&mut self, path: &str) -> usize {
        self.files.push(path.to_string());
        self.files.len() - 1
    }

    /// Replacement entries in id order.
    pub fn replacements(&self) -> &[String] {
        &self.entries
    }

    /// File path entries in file-index order.
    pub fn files(&self) -> &[String] {
        &self.files
    }

    /// First serialized id of the file region.
    pub fn file_id_base(&self) -> usize {
        self.entries.len()
    }

    /// Look up a replacement by id.
    pub fn replacement(&self, id: usize) -> Option<&str> {
        self.entries.get(id).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty() && self.files.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::HashSet;

    #[test]
    fn test_intern_deduplicates() {
        let mut vocab = Vocabulary::new();
        let a = vocab.intern(";");
        let b = vocab.intern("{}");
        let c = vocab.intern(";");
        assert_eq!(a, 0);
        assert_eq!(b, 1);
        assert_eq!(c, a);
        assert_eq!(vocab.replacements(), &[";".to_string(), "{}".to_string()]);
    }

    #[test]
    fn test_replacement_lookup() {
        let mut vocab = Vocabulary::new();
        let id = vocab.intern("return 0;");
        assert_eq!(vocab.replacement(id), Some("return 0;"));
        assert_eq!(vocab.replacement(id + 1), None);
    }

    #[test]
    fn test_files_are_a_separate_region() {
        let mut vocab = Vocabulary::new();
        vocab.intern(";");
        let first = vocab.add_file("a.h");
        let second = vocab.add_file("b.cpp");
        assert_eq!((first, second), (0, 1));
        assert_eq!(vocab.files(), &["a.h".to_string(), "b.cpp".to_string()]);
        // File indices do not collide with replacement ids.
        assert_eq!(vocab.replacements().len(), 1);
    }

    #[test]
    fn test_file_id_base_follows_replacements() {
        let mut vocab = Vocabulary::new();
        vocab.add_file("input.cpp");
        assert_eq!(vocab.file_id_base(), 0);
        vocab.intern(";");
        vocab.intern("{}");
        assert_eq!(vocab.file_id_base(), 2);
    }

    #[test]
    fn test_empty() {
        let mut vocab = Vocabulary::new();
        assert!(vocab.is_empty());
        vocab.add_file("x.c");
        assert!(!vocab.is_empty());
    }

    proptest! {
        #[test]
        fn intern_is_idempotent(words in proptest::collection::vec("[a-z;{}~]{0,6}", 0..32)) {
            let mut vocab = Vocabulary::new();
            let first: Vec<usize> = words.iter().map(|w| vocab.intern(w)).collect();
            let second: Vec<usize> = words.iter().map(|w| vocab.intern(w)).collect();
            prop_assert_eq!(&first, &second);

            let unique: HashSet<&String> = words.iter().collect();
            prop_assert_eq!(vocab.replacements().len(), unique.len());
        }
    }
}
