//! Diagnostics for Event-B sources.
//!
//! This crate turns grammar-engine failures into positioned, hinted
//! diagnostics and runs the structural checks that do not depend on parse
//! success. Validation is a pure function: each call parses fresh, returns
//! a new diagnostic list, and keeps no state between calls.
//!
//! # Example
//!
//! ```
//! use eventb_analysis::{check, Severity};
//! use eventb_syntax::SourceKind;
//!
//! let diagnostics = check("machine m\nend\n", SourceKind::Machine);
//! // Parses fine, but has no INITIALISATION event.
//! assert_eq!(diagnostics.len(), 1);
//! assert_eq!(diagnostics[0].severity, Severity::Warning);
//! ```

pub mod diagnostics;
pub mod hints;
pub mod structure;

pub use diagnostics::{translate, Diagnostic, Severity};
pub use hints::{hint_for, HintContext, HintRule, HINT_RULES};

use eventb_syntax::{normalize, parse_context, parse_machine, SourceKind};

/// Validate one document and return all diagnostics for it.
///
/// Syntax failures yield at most one Error (the grammar engines stop at the
/// first failure); machine files additionally get the initialisation scan,
/// which can add one Warning.
#[must_use]
pub fn check(source: &str, kind: SourceKind) -> Vec<Diagnostic> {
    let normalized = normalize(source);
    let mut diagnostics = Vec::new();

    let failure = match kind {
        SourceKind::Machine => parse_machine(normalized.text()).err(),
        SourceKind::Context => parse_context(normalized.text()).err(),
    };
    if let Some(error) = failure {
        diagnostics.push(translate(&error, source, &normalized));
    }

    if kind == SourceKind::Machine {
        if let Some(warning) = structure::missing_initialisation(normalized.text()) {
            diagnostics.push(warning);
        }
    }

    diagnostics
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_machine_with_initialisation_is_clean() {
        let source = "\
machine m
variables x
invariants
  @inv1 x > 0
events
  event INITIALISATION
  then
    @act1 x := 1
  end
end
";
        assert!(check(source, SourceKind::Machine).is_empty());
    }

    #[test]
    fn machine_without_initialisation_gets_exactly_one_warning() {
        let source = "machine m\nevents\nevent foo then @act1 x := 1 end\nend\n";
        let diagnostics = check(source, SourceKind::Machine);
        let warnings: Vec<_> = diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Warning)
            .collect();
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].range.start, 0);
        assert_eq!(warnings[0].range.end, 0);
    }

    #[test]
    fn adding_initialisation_removes_the_warning() {
        let source = "\
machine m
events
  event INITIALISATION
  then
    @act1 x := 1
  end
  event foo
  then
    @act1 x := 2
  end
end
";
        let diagnostics = check(source, SourceKind::Machine);
        assert!(diagnostics.iter().all(|d| d.severity != Severity::Warning));
    }

    #[test]
    fn syntax_error_and_warning_can_coexist() {
        let source = "machine m\nvariables\nend\n";
        let diagnostics = check(source, SourceKind::Machine);
        assert_eq!(diagnostics.len(), 2);
        assert_eq!(diagnostics[0].severity, Severity::Error);
        assert_eq!(diagnostics[1].severity, Severity::Warning);
    }

    #[test]
    fn contexts_never_get_the_initialisation_warning() {
        let diagnostics = check("context c\nend\n", SourceKind::Context);
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn missing_end_gets_the_hint() {
        let diagnostics = check("machine m\nvariables x", SourceKind::Machine);
        let error = &diagnostics[0];
        assert_eq!(error.severity, Severity::Error);
        assert_eq!(error.hint.as_deref(), Some("a closing 'end' may be missing"));
    }

    #[test]
    fn validation_is_stateless() {
        let source = "machine m\nvariables\nend\n";
        assert_eq!(
            check(source, SourceKind::Machine),
            check(source, SourceKind::Machine)
        );
    }
}
