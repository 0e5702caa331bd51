use crate::order::SiteKey;
use crate::syntax::SyntaxError;
use tree_sitter::{Node, Parser, Tree};

/// Tree-sitter parser wrapper for C/C++ source.
pub struct CxxParser {
    parser: Parser,
}

impl CxxParser {
    pub fn new() -> Result<Self, SyntaxError> {
        let mut parser = Parser::new();
        let language: tree_sitter::Language = tree_sitter_cpp::LANGUAGE.into();
        parser.set_language(&language)?;
        Ok(Self { parser })
    }

    /// Parse one corpus file.
    ///
    /// The tree is kept even when it contains ERROR nodes; partially
    /// recovered structure is still worth generating candidates from.
    pub fn parse<'a>(
        &mut self,
        file: Option<usize>,
        source: &'a str,
    ) -> Result<SourceUnit<'a>, SyntaxError> {
        let tree = self
            .parser
            .parse(source, None)
            .ok_or(SyntaxError::ParseFailed)?;
        Ok(SourceUnit { file, source, tree })
    }
}

/// One parsed corpus file: its text, its tree and its corpus file index
/// (`None` in single-file runs).
pub struct SourceUnit<'a> {
    pub file: Option<usize>,
    pub source: &'a str,
    tree: Tree,
}

impl<'a> SourceUnit<'a> {
    pub fn root(&self) -> Node<'_> {
        self.tree.root_node()
    }

    /// Text behind a node. The borrow is tied to the source, not to the
    /// unit, so extracted names outlive query iteration.
    pub fn text_of(&self, node: Node<'_>) -> &'a str {
        &self.source[node.byte_range()]
    }

    /// Corpus-wide location of a node.
    pub fn site_of(&self, node: Node<'_>) -> SiteKey {
        SiteKey {
            file: self.file,
            start: node.start_byte(),
            end: node.end_byte(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_well_formed_source() {
        let mut parser = CxxParser::new().unwrap();
        let unit = parser.parse(None, "namespace n { int x; }\n").unwrap();
        assert_eq!(unit.root().kind(), "translation_unit");
        assert!(!unit.root().has_error());
    }

    #[test]
    fn test_broken_source_still_yields_a_tree() {
        let mut parser = CxxParser::new().unwrap();
        let unit = parser.parse(None, "int broken(( {\n").unwrap();
        // Mid-reduction inputs are often invalid; the tree is used as-is.
        assert!(unit.root().has_error());
    }

    #[test]
    fn test_text_of_recovers_source_slices() {
        let mut parser = CxxParser::new().unwrap();
        let source = "void name_to_find();\n";
        let unit = parser.parse(None, source).unwrap();
        let declaration = unit.root().child(0).unwrap();
        assert_eq!(unit.text_of(declaration), "void name_to_find();");
    }

    #[test]
    fn test_site_of_carries_the_file_index() {
        let mut parser = CxxParser::new().unwrap();
        let unit = parser.parse(Some(2), "int x;\n").unwrap();
        let site = unit.site_of(unit.root().child(0).unwrap());
        assert_eq!(site.file, Some(2));
        assert_eq!((site.start, site.end), (0, 6));
    }
}
