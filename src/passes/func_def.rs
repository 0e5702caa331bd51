//! Turns function definitions into bare declarations.

use crate::counter::{PassError, Session};
use crate::overlap::OverlapResolver;
use crate::passes::Transformation;
use crate::syntax::{node_span, outermost_enclosing, SourceUnit, SyntaxError, SyntaxQuery};

// The declarator must be a function_declarator directly under the
// definition; an optional qualified_identifier beneath it marks an
// out-of-line member. Qualifiers are captured wholesale and filtered by
// text, since the grammar folds them all into one node kind.
const QUERY: &str = r#"
  (function_definition
    (type_qualifier)* @qualifier
    declarator: (function_declarator
      declarator: (qualified_identifier)? @qualified)
    (field_initializer_list)? @initializers
    body: (_) @body) @definition
"#;

const SEMICOLON: &str = ";";
const KIND_REGULAR: &str = "regular";
const KIND_TEMPLATE: &str = "template-function";
const TEMPLATE_DECLARATION: &str = "template_declaration";

struct Candidate {
    semicolon: bool,
    template: bool,
}

/// Rewrites function definitions into declarations.
///
/// The basic case collapses the body to `;` in place. Out-of-line member
/// definitions cannot be re-declared at namespace scope, so they are
/// deleted wholesale, enclosing `template <...>` wrappers included.
/// Constructor initializer lists go together with the body. `constexpr`
/// functions are left alone, since a constexpr declaration without a
/// definition rarely survives compilation.
pub struct FuncDefReplacer {
    query: SyntaxQuery,
}

impl FuncDefReplacer {
    pub fn new() -> Result<Self, SyntaxError> {
        Ok(Self {
            query: SyntaxQuery::new(QUERY)?,
        })
    }
}

impl Transformation for FuncDefReplacer {
    fn vocabulary(&self) -> &'static [&'static str] {
        &[SEMICOLON, KIND_REGULAR, KIND_TEMPLATE]
    }

    fn process_file(
        &mut self,
        unit: &SourceUnit<'_>,
        session: &mut Session,
    ) -> Result<(), PassError> {
        let mut resolved = OverlapResolver::new();

        for hit in self.query.hits(unit) {
            if hit
                .nodes("qualifier")
                .iter()
                .any(|qualifier| unit.text_of(*qualifier) == "constexpr")
            {
                continue;
            }

            let definition = hit.require("definition")?;
            let body = hit.require("body")?;
            let template = outermost_enclosing(definition, TEMPLATE_DECLARATION);

            // Basic case: the body collapses into a semicolon.
            let mut span = node_span(body);
            let mut semicolon = true;
            if hit.node("qualified").is_some() {
                // Out-of-line members are deleted completely, starting from
                // the "template <" token for function templates and
                // template-class methods.
                span.start = template.unwrap_or(definition).start_byte();
                semicolon = false;
            } else if let Some(initializers) = hit.node("initializers") {
                span.start = initializers.start_byte();
            }

            // Macro expansions can make the grammar take a class or
            // namespace for a function; keep only the most detailed of
            // overlapping matches.
            resolved.offer(
                span,
                Candidate {
                    semicolon,
                    template: template.is_some(),
                },
            );
        }

        for (span, candidate) in resolved.into_accepted() {
            if !session.next_candidate() {
                continue;
            }
            let mut hint = session.hint();
            hint.set_kind(if candidate.template {
                KIND_TEMPLATE
            } else {
                KIND_REGULAR
            });
            if candidate.semicolon {
                hint.add_patch(span, SEMICOLON);
            } else {
                hint.add_deletion(span);
            }
        }
        Ok(())
    }
}
