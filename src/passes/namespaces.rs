//! Empties out namespace bodies.

use crate::counter::{PassError, Session};
use crate::passes::Transformation;
use crate::syntax::{node_span, SourceUnit, SyntaxError, SyntaxQuery};

// Only bodies with at least one named child are worth a candidate;
// already-empty namespaces would produce a no-op edit.
const QUERY: &str = r#"
  (namespace_definition
    body: (_ (_)) @body)
"#;

const EMPTY_BLOCK: &str = "{}";

/// Replaces non-empty namespace bodies with `{}`.
///
/// Nested namespaces each get their own candidate; the candidates overlap,
/// which is why this pass refuses batched counter ranges.
pub struct NamespaceEraser {
    query: SyntaxQuery,
}

impl NamespaceEraser {
    pub fn new() -> Result<Self, SyntaxError> {
        Ok(Self {
            query: SyntaxQuery::new(QUERY)?,
        })
    }
}

impl Transformation for NamespaceEraser {
    fn vocabulary(&self) -> &'static [&'static str] {
        &[EMPTY_BLOCK]
    }

    fn process_file(
        &mut self,
        unit: &SourceUnit<'_>,
        session: &mut Session,
    ) -> Result<(), PassError> {
        for hit in self.query.hits(unit) {
            if !session.next_candidate() {
                continue;
            }
            let body = hit.require("body")?;
            let mut hint = session.hint();
            hint.add_patch(node_span(body), EMPTY_BLOCK);
        }
        Ok(())
    }
}
