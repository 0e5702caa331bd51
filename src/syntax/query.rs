use crate::syntax::parser::SourceUnit;
use crate::syntax::SyntaxError;
use std::collections::HashMap;
use tree_sitter::{Node, Query, QueryCursor, StreamingIterator};

/// A compiled S-expression query over the C/C++ grammar.
pub struct SyntaxQuery {
    query: Query,
    capture_names: Vec<String>,
}

/// One query match with its named captures.
///
/// A capture name can bind several nodes in a single match (quantified
/// patterns like `(type_qualifier)*`), so every name maps to the full node
/// list in capture order.
#[derive(Debug)]
pub struct QueryHit<'t> {
    captures: HashMap<String, Vec<Node<'t>>>,
}

impl<'t> QueryHit<'t> {
    /// First node bound to `name`, if the capture matched at all.
    pub fn node(&self, name: &str) -> Option<Node<'t>> {
        self.captures.get(name).and_then(|nodes| nodes.first()).copied()
    }

    /// Every node bound to `name`.
    pub fn nodes(&self, name: &str) -> &[Node<'t>] {
        self.captures.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Node bound to a capture the query guarantees; absence is a frontend
    /// inconsistency.
    pub fn require(&self, name: &'static str) -> Result<Node<'t>, SyntaxError> {
        self.node(name).ok_or(SyntaxError::MissingCapture { name })
    }
}

impl SyntaxQuery {
    /// Compile a query. Pass constructors call this once and reuse the
    /// compiled query for every file.
    pub fn new(source: &str) -> Result<Self, SyntaxError> {
        let language: tree_sitter::Language = tree_sitter_cpp::LANGUAGE.into();
        let query = Query::new(&language, source).map_err(|e| SyntaxError::InvalidQuery {
            message: e.to_string(),
        })?;
        let capture_names = query
            .capture_names()
            .iter()
            .map(|name| name.to_string())
            .collect();
        Ok(Self {
            query,
            capture_names,
        })
    }

    /// Run the query over the whole unit, returning hits in tree order.
    pub fn hits<'t>(&self, unit: &'t SourceUnit<'_>) -> Vec<QueryHit<'t>> {
        let mut cursor = QueryCursor::new();
        let mut matches = cursor.matches(&self.query, unit.root(), unit.source.as_bytes());

        let mut results = Vec::new();
        // tree-sitter 0.25 exposes matches through StreamingIterator.
        while let Some(m) = matches.next() {
            let mut captures: HashMap<String, Vec<Node<'t>>> = HashMap::new();
            for capture in m.captures {
                let name = self.capture_names[capture.index as usize].clone();
                captures.entry(name).or_default().push(capture.node);
            }
            results.push(QueryHit { captures });
        }
        results
    }
}
