//! Deletes whole functions by name, declarations and definitions alike.

use crate::counter::{PassError, Session};
use crate::order::CandidateGroups;
use crate::passes::Transformation;
use crate::span::Span;
use crate::syntax::{outermost_enclosing, SourceUnit, SyntaxError, SyntaxQuery};

// Captures the unqualified function name at every declaration site.
// Namespace and class qualifiers are looked through (one or two levels of
// qualified_identifier); destructor names are tagged separately so the
// grouping key can carry the "~".
const QUERY: &str = r#"
  [
    (function_definition
      declarator: (function_declarator
        declarator: [
          (identifier) @name
          (field_identifier) @name
          (destructor_name (identifier) @destructor)
          (qualified_identifier name: (identifier) @name)
          (qualified_identifier name: (qualified_identifier name: (identifier) @name))
        ]))
    (declaration
      declarator: (function_declarator
        declarator: (identifier) @name))
    (field_declaration
      declarator: (function_declarator
        declarator: (field_identifier) @name))
  ] @site
"#;

const TEMPLATE_DECLARATION: &str = "template_declaration";

/// Removes every declaration and definition of one function in a single
/// candidate.
///
/// Sites are grouped by unqualified name across the whole corpus, so a
/// header declaration and the out-of-line definition in another file
/// disappear together; overloads sharing a name fall into the same group.
/// Deleting a templated function takes the `template <...>` wrapper along.
pub struct FunctionRemover {
    query: SyntaxQuery,
    preserve: Option<String>,
    groups: CandidateGroups,
}

impl FunctionRemover {
    pub fn new(preserve: Option<String>) -> Result<Self, SyntaxError> {
        Ok(Self {
            query: SyntaxQuery::new(QUERY)?,
            preserve,
            groups: CandidateGroups::new(),
        })
    }
}

impl Transformation for FunctionRemover {
    fn process_file(
        &mut self,
        unit: &SourceUnit<'_>,
        _session: &mut Session,
    ) -> Result<(), PassError> {
        for hit in self.query.hits(unit) {
            let site = hit.require("site")?;
            let name = match hit.node("destructor") {
                Some(inner) => format!("~{}", unit.text_of(inner)),
                None => unit.text_of(hit.require("name")?).to_string(),
            };
            if self.preserve.as_deref() == Some(name.as_str()) {
                continue;
            }
            let to_remove = outermost_enclosing(site, TEMPLATE_DECLARATION).unwrap_or(site);
            self.groups.add(&name, unit.site_of(to_remove));
        }
        Ok(())
    }

    fn finalize(&mut self, session: &mut Session) -> Result<(), PassError> {
        // Candidates are whole name-groups, emitted in bisection-friendly
        // order once every file has reported in.
        for (_, sites) in std::mem::take(&mut self.groups).into_ordered() {
            if !session.next_candidate() {
                continue;
            }
            let mut hint = session.hint();
            for site in sites {
                hint.add_patch_in(site.file, Span::new(site.start, site.end), "");
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::counter::{RunReport, Selection};
    use crate::syntax::CxxParser;

    fn run_with(source: &str, selection: Selection, preserve: Option<&str>) -> RunReport {
        let mut parser = CxxParser::new().unwrap();
        let unit = parser.parse(None, source).unwrap();
        let mut pass = FunctionRemover::new(preserve.map(str::to_string)).unwrap();
        let mut session = Session::new(selection);
        pass.process_file(&unit, &mut session).unwrap();
        pass.finalize(&mut session).unwrap();
        session.finish().unwrap()
    }

    fn run(source: &str, selection: Selection) -> RunReport {
        run_with(source, selection, None)
    }

    #[test]
    fn test_declaration_and_definition_group_into_one_candidate() {
        let source = "void foo();\nvoid foo() { }\n";
        let report = run(source, Selection::All);

        assert_eq!(report.candidates, 1);
        let hint = &report.bundle.hints[0];
        assert_eq!(hint.patches.len(), 2);
        assert_eq!(hint.patches[0].start, 0);
        assert_eq!(hint.patches[1].start, source.find("void foo() {").unwrap());
        // Pure deletions: no vocabulary entries at all.
        assert!(hint.patches.iter().all(|patch| patch.value.is_none()));
        assert!(report.bundle.vocab.replacements().is_empty());

        let rewritten = crate::apply::apply_hints(source, &report.bundle).unwrap();
        assert_eq!(rewritten, "\n\n");
    }

    #[test]
    fn test_overloads_share_a_group() {
        let source = "void f(int);\nvoid f(double);\n";
        let report = run(source, Selection::All);
        assert_eq!(report.candidates, 1);
        assert_eq!(report.bundle.hints[0].patches.len(), 2);
    }

    #[test]
    fn test_groups_emit_in_site_order_not_name_order() {
        let source = "void zeta() { }\nvoid alpha() { }\n";
        let report = run(source, Selection::All);

        assert_eq!(report.candidates, 2);
        let first = &report.bundle.hints[0].patches[0];
        let second = &report.bundle.hints[1].patches[0];
        assert_eq!(first.start, 0);
        assert!(second.start > first.start);
    }

    #[test]
    fn test_out_of_line_member_groups_with_its_name() {
        let source = "struct S { void m(); };\nvoid S::m() { }\n";
        let report = run(source, Selection::All);

        // The in-class declaration and the qualified definition both key
        // on the unqualified name.
        assert_eq!(report.candidates, 1);
        assert_eq!(report.bundle.hints[0].patches.len(), 2);
    }

    #[test]
    fn test_destructor_is_keyed_with_tilde() {
        let source = "struct T { int x; ~T() { } void go(); };\n";
        let report = run(source, Selection::All);

        // Two groups: "~T" and "go". The destructor body sits earlier in
        // the input, so its group comes first.
        assert_eq!(report.candidates, 2);
        let dtor = &report.bundle.hints[0].patches[0];
        assert_eq!(dtor.start, source.find("~T()").unwrap());
    }

    #[test]
    fn test_template_wrapper_is_removed_with_the_function() {
        let source = "template <class T> T pick(T a) { return a; }\nint other() { return 1; }\n";
        let report = run(source, Selection::All);

        assert_eq!(report.candidates, 2);
        let templated = &report.bundle.hints[0].patches[0];
        assert_eq!(templated.start, 0);
        assert_eq!(templated.end, source.find("\nint other").unwrap());
    }

    #[test]
    fn test_preserved_name_is_skipped() {
        let source = "int main() { return 0; }\nvoid helper() { }\n";
        let all = run(source, Selection::All);
        assert_eq!(all.candidates, 2);

        let preserved = run_with(source, Selection::All, Some("main"));
        assert_eq!(preserved.candidates, 1);
        assert_eq!(
            preserved.bundle.hints[0].patches[0].start,
            source.find("void helper").unwrap()
        );
    }

    #[test]
    fn test_counter_selects_one_group() {
        let source = "void a() { }\nvoid b() { }\n";
        let report = run(source, Selection::Single(2));
        assert_eq!(report.candidates, 2);
        assert_eq!(report.bundle.hints.len(), 1);
        assert_eq!(
            report.bundle.hints[0].patches[0].start,
            source.find("void b").unwrap()
        );
    }
}
