//! Candidate edits as hints: atomic groups of byte-range patches.

use crate::span::Span;
use crate::vocab::Vocabulary;

/// One atomic byte-range edit within a hint.
///
/// Replacement text is never stored inline; `value` points into the
/// vocabulary, and `None` deletes the range. A zero-length range is a pure
/// insertion at that offset. `file` carries the corpus file index in
/// multi-file runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Patch {
    pub start: usize,
    pub end: usize,
    pub value: Option<usize>,
    pub file: Option<usize>,
}

/// A group of patches applied together to produce one smaller candidate.
///
/// Hints are non-empty by construction. `kind` is an optional vocabulary id
/// that lets consumers tell hint flavors apart without understanding them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hint {
    pub kind: Option<usize>,
    pub patches: Vec<Patch>,
}

/// Everything one generation run produced: the committed hints plus the
/// vocabulary their ids point into.
#[derive(Debug, Default)]
pub struct HintBundle {
    pub vocab: Vocabulary,
    pub hints: Vec<Hint>,
}

/// Accumulates hints one scope at a time.
///
/// `scope()` opens the next hint; patches added through the returned guard
/// belong to it, and dropping the guard commits it. A scope that ends with
/// no patches is discarded rather than committed, so consumers never see an
/// empty hint. The exclusive borrow held by the guard rules out nested or
/// concurrent scopes.
#[derive(Debug, Default)]
pub struct HintsBuilder {
    vocab: Vocabulary,
    hints: Vec<Hint>,
    current: Option<Hint>,
    current_file: Option<usize>,
}

impl HintsBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open the scope for the next hint.
    pub fn scope(&mut self) -> HintScope<'_> {
        self.current = Some(Hint {
            kind: None,
            patches: Vec::new(),
        });
        HintScope { builder: self }
    }

    /// Intern a string without attaching it to a patch. Passes use this to
    /// fix vocabulary ids up front, before any candidate is realized.
    pub fn intern(&mut self, text: &str) -> usize {
        self.vocab.intern(text)
    }

    /// Record one corpus file path, returning its file index.
    pub fn add_file(&mut self, path: &str) -> usize {
        self.vocab.add_file(path)
    }

    /// Set the file index stamped onto subsequently added patches.
    pub fn set_current_file(&mut self, file: Option<usize>) {
        self.current_file = file;
    }

    pub fn current_file(&self) -> Option<usize> {
        self.current_file
    }

    /// Reverse the committed hint order, for passes that discover their
    /// edits back-to-front but must emit front-to-back.
    pub fn reverse(&mut self) {
        self.hints.reverse();
    }

    /// Number of committed hints.
    pub fn len(&self) -> usize {
        self.hints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hints.is_empty()
    }

    pub fn into_bundle(self) -> HintBundle {
        HintBundle {
            vocab: self.vocab,
            hints: self.hints,
        }
    }

    fn finish_current(&mut self) {
        if let Some(hint) = self.current.take() {
            if !hint.patches.is_empty() {
                self.hints.push(hint);
            }
        }
    }
}

/// Scoped accumulation of one hint's patches.
///
/// Degenerate input is absorbed silently rather than reported: zero-length
/// ranges, empty insertion text and patch-less hints are all no-ops. That
/// keeps pass code free of bookkeeping for edits that turn out to be
/// vacuous.
#[must_use = "the scope commits its hint when dropped; bind it to add patches"]
#[derive(Debug)]
pub struct HintScope<'a> {
    builder: &'a mut HintsBuilder,
}

impl HintScope<'_> {
    /// Add a patch replacing `span` with `replacement`; empty replacement
    /// text deletes the range. Zero-length spans are dropped (insertions go
    /// through [`HintScope::add_insertion`]).
    pub fn add_patch(&mut self, span: Span, replacement: &str) {
        let file = self.builder.current_file;
        self.add_patch_in(file, span, replacement);
    }

    /// Like [`HintScope::add_patch`] with an explicit file index, for hints
    /// assembled after per-file processing has moved on.
    pub fn add_patch_in(&mut self, file: Option<usize>, span: Span, replacement: &str) {
        if span.is_empty() {
            return;
        }
        let value = if replacement.is_empty() {
            None
        } else {
            Some(self.builder.vocab.intern(replacement))
        };
        self.push(span, value, file);
    }

    /// Delete `span` entirely.
    pub fn add_deletion(&mut self, span: Span) {
        self.add_patch(span, "");
    }

    /// Insert `text` at `offset` without removing anything. Empty text is
    /// dropped.
    pub fn add_insertion(&mut self, offset: usize, text: &str) {
        if text.is_empty() {
            return;
        }
        let value = Some(self.builder.vocab.intern(text));
        let file = self.builder.current_file;
        self.push(Span::at(offset), value, file);
    }

    /// Label the hint with a kind discriminator, itself a vocabulary entry.
    /// The label travels with the hint: if no patch ever lands, both are
    /// discarded together.
    pub fn set_kind(&mut self, label: &str) {
        let id = self.builder.vocab.intern(label);
        if let Some(hint) = self.builder.current.as_mut() {
            hint.kind = Some(id);
        }
    }

    fn push(&mut self, span: Span, value: Option<usize>, file: Option<usize>) {
        if let Some(hint) = self.builder.current.as_mut() {
            hint.patches.push(Patch {
                start: span.start,
                end: span.end,
                value,
                file,
            });
        }
    }
}

impl Drop for HintScope<'_> {
    fn drop(&mut self) {
        self.builder.finish_current();
    }
}
