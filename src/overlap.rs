//! Overlap resolution for tree-query matches.

use crate::span::Span;

/// Keeps only the most specific of overlapping matches.
///
/// Matches are offered in tree-traversal order, which visits enclosing
/// constructs before the constructs they contain. Whenever a new match
/// overlaps the most recently accepted one, the accepted one is evicted, so
/// the last overlapping match wins. Macro-heavy inputs trip grammars into
/// taking a class or namespace for a function; this discipline drops the
/// bogus enclosing match in favor of the real definitions inside it.
///
/// Only the back of the accepted list is ever compared, which keeps the
/// whole run amortized O(n).
#[derive(Debug)]
pub struct OverlapResolver<T> {
    accepted: Vec<(Span, T)>,
}

impl<T> OverlapResolver<T> {
    pub fn new() -> Self {
        Self {
            accepted: Vec::new(),
        }
    }

    /// Offer the next match in traversal order.
    pub fn offer(&mut self, span: Span, value: T) {
        while self
            .accepted
            .last()
            .is_some_and(|(prev, _)| prev.overlaps(&span))
        {
            self.accepted.pop();
        }
        self.accepted.push((span, value));
    }

    /// Surviving matches, still in traversal order.
    pub fn into_accepted(self) -> Vec<(Span, T)> {
        self.accepted
    }

    pub fn len(&self) -> usize {
        self.accepted.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accepted.is_empty()
    }
}

impl<T> Default for OverlapResolver<T> {
    fn default() -> Self {
        Self::new()
    }
}
