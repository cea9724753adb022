//! Translation of parse failures into positioned diagnostics.
//!
//! A [`ParseError`] carries an offset into the *normalized* text; the
//! translator maps it back to the original buffer, extracts the word at the
//! failure point, renders the generic "expected X but found Y" message, and
//! runs the hint table over the result.

use eventb_syntax::{Normalized, ParseError, Span, CATEGORIES};

use crate::hints::{hint_for, HintContext};

/// Diagnostic severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// A problem that blocks compilation of the file.
    Error,
    /// A problem that coexists with successful compilation.
    Warning,
}

/// A positioned, human-readable problem report.
///
/// Diagnostics are produced fresh on every validation pass and never
/// mutated; the next pass supersedes them wholesale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// Byte range in the *original* text.
    pub range: Span,
    /// Severity level.
    pub severity: Severity,
    /// The base message.
    pub message: String,
    /// Optional heuristic hint from the fixed decision table.
    pub hint: Option<String>,
}

/// Translate a parse failure into a diagnostic anchored in the original
/// text.
#[must_use]
pub fn translate(error: &ParseError, original: &str, normalized: &Normalized) -> Diagnostic {
    let start = normalized.to_original(error.offset);
    let word = current_word(original, start);
    let end = start + word.len();

    let found = if word.is_empty() {
        "end of input".to_string()
    } else {
        format!("'{word}'")
    };
    let message = format!(
        "expected {} but found {}",
        render_expected(&error.expected),
        found
    );

    let hint = hint_for(&HintContext {
        message: &message,
        expected: &error.expected,
        found: word,
    });

    Diagnostic {
        range: Span::new(start as u32, end as u32),
        severity: Severity::Error,
        message,
        hint,
    }
}

/// The word at `offset`: everything up to the next whitespace boundary.
/// End of input counts as a boundary, so the word may be empty.
fn current_word(text: &str, offset: usize) -> &str {
    let rest = &text[offset.min(text.len())..];
    let end = rest
        .find(char::is_whitespace)
        .unwrap_or(rest.len());
    &rest[..end]
}

/// Render an expectation set: categories stay bare, keywords are quoted.
fn render_expected(expected: &[&'static str]) -> String {
    let rendered: Vec<String> = expected
        .iter()
        .map(|&name| {
            if CATEGORIES.contains(&name) {
                name.to_string()
            } else {
                format!("'{name}'")
            }
        })
        .collect();
    match rendered.as_slice() {
        [] => "valid input".to_string(),
        [single] => single.clone(),
        [init @ .., last] => format!("{} or {}", init.join(", "), last),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use eventb_syntax::{normalize, parse_machine};

    fn diagnose(source: &str) -> Diagnostic {
        let normalized = normalize(source);
        let error = parse_machine(normalized.text()).unwrap_err();
        translate(&error, source, &normalized)
    }

    #[test]
    fn range_points_into_the_original_text() {
        // The assignment symbol in the preceding action widens the
        // normalized text, so the reported range must be translated back.
        let source = "machine m\nevents\nevent e\nthen\n@act1 x := 1\n@act2 @oops\nend\nend\n";
        let diagnostic = diagnose(source);
        let start = diagnostic.range.start as usize;
        let end = diagnostic.range.end as usize;
        assert_eq!(&source[start..end], "@oops");
        assert!(diagnostic.message.contains("'@oops'"));
    }

    #[test]
    fn message_uses_the_expected_but_found_template() {
        let diagnostic = diagnose("machine m variables end");
        assert_eq!(diagnostic.message, "expected identifier but found 'end'");
        assert_eq!(diagnostic.severity, Severity::Error);
    }

    #[test]
    fn end_of_input_reads_as_such() {
        let source = "machine m\nvariables x";
        let diagnostic = diagnose(source);
        assert!(diagnostic.message.contains("but found end of input"));
        assert_eq!(diagnostic.range.start as usize, source.len());
    }

    #[test]
    fn keywords_are_quoted_and_joined() {
        assert_eq!(render_expected(&["end"]), "'end'");
        assert_eq!(
            render_expected(&["identifier", "events", "end"]),
            "identifier, 'events' or 'end'"
        );
        assert_eq!(render_expected(&[]), "valid input");
    }

    #[test]
    fn current_word_stops_at_whitespace() {
        assert_eq!(current_word("foo bar", 0), "foo");
        assert_eq!(current_word("foo bar", 4), "bar");
        assert_eq!(current_word("foo", 3), "");
        assert_eq!(current_word("foo", 10), "");
    }
}
