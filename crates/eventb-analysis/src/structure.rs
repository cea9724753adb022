//! Structural shape checks, independent of parse success.

use once_cell::sync::Lazy;
use regex::Regex;

use eventb_syntax::Span;

use crate::diagnostics::{Diagnostic, Severity};

/// Matches an initialisation event block of the `event … then … end`
/// shape, by name or by the anonymous `_` marker.
static INITIALISATION_BLOCK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)\bevent\s+(INITIALISATION|_)\b.*?\bthen\b.*?\bend\b")
        .expect("initialisation pattern is valid")
});

/// Scan normalized machine text for an initialisation event.
///
/// Absence yields one Warning anchored at offset 0. The scan is a pattern
/// match, not a parse: it runs even when the grammar engine failed, and a
/// machine that parses cleanly can still trip it.
#[must_use]
pub fn missing_initialisation(normalized_text: &str) -> Option<Diagnostic> {
    if INITIALISATION_BLOCK.is_match(normalized_text) {
        return None;
    }
    Some(Diagnostic {
        range: Span::point(0),
        severity: Severity::Warning,
        message: "machine has no INITIALISATION event".to_string(),
        hint: Some("declare an INITIALISATION event to give every variable an initial value".to_string()),
    })
}
