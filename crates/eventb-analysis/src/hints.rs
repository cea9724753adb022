//! Heuristic hint table.
//!
//! Each entry pairs a predicate over the rendered message and the words
//! involved with a fixed hint string. The table is evaluated top to bottom
//! and the first match wins, so entries are mutually exclusive by
//! construction. Hints are developer-experience sugar: false positives and
//! negatives are acceptable and nothing downstream depends on them.

/// Inputs available to a hint rule.
#[derive(Debug, Clone, Copy)]
pub struct HintContext<'a> {
    /// The rendered "expected X but found Y" message.
    pub message: &'a str,
    /// The raw expectation set from the parse error.
    pub expected: &'a [&'static str],
    /// The word extracted at the failure offset; empty at end of input.
    pub found: &'a str,
}

/// One entry in the ordered decision table.
pub struct HintRule {
    /// Stable rule name, for tests and logging.
    pub name: &'static str,
    /// Whether this rule applies to the given failure.
    pub applies: fn(&HintContext<'_>) -> bool,
    /// The hint text.
    pub hint: &'static str,
}

/// The fixed, ordered decision table. First match wins.
pub const HINT_RULES: &[HintRule] = &[
    HintRule {
        name: "missing-end",
        applies: |ctx| ctx.message.contains("end of input") && ctx.expected.contains(&"end"),
        hint: "a closing 'end' may be missing",
    },
    HintRule {
        name: "empty-block",
        applies: |ctx| ctx.expected.contains(&"label") && ctx.found == "end",
        hint: "at least one labelled clause is required in this block",
    },
    HintRule {
        name: "bare-label",
        applies: |ctx| {
            ctx.found.starts_with('@')
                && ["label", "predicate", "assignment"]
                    .iter()
                    .any(|category| ctx.expected.contains(category))
        },
        hint: "an expression seems to be missing after the previous label",
    },
];

/// Run the table over a failure and return the first matching hint.
#[must_use]
pub fn hint_for(ctx: &HintContext<'_>) -> Option<String> {
    HINT_RULES
        .iter()
        .find(|rule| (rule.applies)(ctx))
        .map(|rule| rule.hint.to_string())
}
