//! Tree-sitter frontend for C/C++ inputs.
//!
//! Inputs arrive mid-reduction and are routinely broken C++; the frontend
//! therefore never rejects a tree for containing ERROR nodes. Passes work
//! with whatever structure the grammar could recover.

mod parser;
mod query;

pub use parser::{CxxParser, SourceUnit};
pub use query::{QueryHit, SyntaxQuery};

use crate::counter::PassError;
use crate::span::Span;
use thiserror::Error;
use tree_sitter::Node;

#[derive(Debug, Error)]
pub enum SyntaxError {
    #[error("failed to configure the C/C++ grammar: {0}")]
    Language(#[from] tree_sitter::LanguageError),

    #[error("parser returned no tree")]
    ParseFailed,

    #[error("invalid syntax query: {message}")]
    InvalidQuery { message: String },

    #[error("query match is missing the '{name}' capture")]
    MissingCapture { name: &'static str },
}

impl From<SyntaxError> for PassError {
    fn from(err: SyntaxError) -> Self {
        PassError::Internal {
            message: err.to_string(),
        }
    }
}

/// Byte span covered by a node.
pub fn node_span(node: Node<'_>) -> Span {
    Span::new(node.start_byte(), node.end_byte())
}

/// Walk up through consecutive ancestors of `kind`, returning the
/// outermost one. `None` means the immediate parent is already something
/// else.
pub fn outermost_enclosing<'t>(node: Node<'t>, kind: &str) -> Option<Node<'t>> {
    let mut outermost = None;
    let mut current = node;
    while let Some(parent) = current.parent() {
        if parent.kind() != kind {
            break;
        }
        outermost = Some(parent);
        current = parent;
    }
    outermost
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outermost_enclosing_climbs_template_chains() {
        let mut parser = CxxParser::new().unwrap();
        let source = "template <class T> template <class U> void C<T>::f(U) {}\n";
        let unit = parser.parse(None, source).unwrap();

        // Descend to the function_definition nested under both templates.
        let outer = unit.root().child(0).unwrap();
        assert_eq!(outer.kind(), "template_declaration");
        let mut definition = outer;
        while definition.kind() != "function_definition" {
            definition = definition
                .named_child(definition.named_child_count() - 1)
                .unwrap();
        }

        let top = outermost_enclosing(definition, "template_declaration").unwrap();
        assert_eq!(top.id(), outer.id());
        assert_eq!(top.start_byte(), 0);
    }

    #[test]
    fn test_outermost_enclosing_is_none_without_matching_parent() {
        let mut parser = CxxParser::new().unwrap();
        let unit = parser.parse(None, "void f() {}\n").unwrap();
        let definition = unit.root().child(0).unwrap();
        assert_eq!(definition.kind(), "function_definition");
        assert!(outermost_enclosing(definition, "template_declaration").is_none());
    }

    #[test]
    fn test_node_span_matches_byte_range() {
        let mut parser = CxxParser::new().unwrap();
        let source = "int x;\n";
        let unit = parser.parse(None, source).unwrap();
        let declaration = unit.root().child(0).unwrap();
        assert_eq!(node_span(declaration), Span::new(0, 6));
    }
}
