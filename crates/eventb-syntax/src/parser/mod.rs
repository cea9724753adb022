//! Recursive-descent grammar engines for machine and context files.
//!
//! Both grammars share the scanner defined here. Parsing follows PEG
//! ordered-choice semantics: alternatives are tried in declaration order,
//! the first success wins, and a failed alternative backtracks the input
//! position. The scanner separately remembers the furthest offset any
//! alternative reached together with the expectations active there, so a
//! failed parse reports the deepest failure point rather than the position
//! of the outermost rule.
//!
//! The engines perform no recovery: a parse either yields a complete AST or
//! a single [`ParseError`]. There is no partial-document production.

mod context;
mod machine;

pub use context::parse_context;
pub use machine::parse_machine;

use thiserror::Error;

use crate::ast::{LabeledAssignment, LabeledPredicate};

/// Reserved words, rejected wherever an identifier is expected.
pub const KEYWORDS: &[&str] = &[
    "machine",
    "context",
    "refines",
    "sees",
    "extends",
    "variables",
    "invariants",
    "events",
    "event",
    "any",
    "where",
    "with",
    "then",
    "end",
    "sets",
    "constants",
    "axioms",
    "extended",
    "ordinary",
    "convergent",
    "anticipated",
    "theorem",
];

/// Expectation names that denote token categories rather than literal
/// keywords. Anything else in [`ParseError::expected`] is a keyword.
pub const CATEGORIES: &[&str] = &[
    "identifier",
    "label",
    "predicate",
    "assignment",
    "end of input",
];

/// A parse failure, reported at the furthest offset reached by any
/// attempted alternative.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("syntax error at byte {offset}: expected {expected:?}, found {found:?}")]
pub struct ParseError {
    /// Byte offset into the *normalized* text where the furthest
    /// alternative failed.
    pub offset: usize,
    /// Token or category names that would have allowed progress, in the
    /// order they were attempted, deduplicated.
    pub expected: Vec<&'static str>,
    /// The whitespace-delimited token at `offset`, or `end of input`.
    pub found: String,
}

/// Marker for a failed alternative. The failure details live in the
/// scanner's furthest-failure state, not in this value.
pub(crate) struct Fail;

pub(crate) type PResult<T> = Result<T, Fail>;

/// Cursor over normalized source text with furthest-failure bookkeeping.
pub(crate) struct Scanner<'a> {
    text: &'a str,
    pos: usize,
    furthest: usize,
    expected: Vec<&'static str>,
}

impl<'a> Scanner<'a> {
    pub(crate) fn new(text: &'a str) -> Self {
        Self {
            text,
            pos: 0,
            furthest: 0,
            expected: Vec::new(),
        }
    }

    /// Record a failure expecting `expectation` at the current position and
    /// return the failure marker.
    pub(crate) fn fail<T>(&mut self, expectation: &'static str) -> PResult<T> {
        if self.pos > self.furthest {
            self.furthest = self.pos;
            self.expected.clear();
        }
        if self.pos == self.furthest && !self.expected.contains(&expectation) {
            self.expected.push(expectation);
        }
        Err(Fail)
    }

    /// Skip whitespace and `//` line comments.
    fn skip_trivia(&mut self) {
        let bytes = self.text.as_bytes();
        loop {
            while self.pos < bytes.len() && bytes[self.pos].is_ascii_whitespace() {
                self.pos += 1;
            }
            if bytes[self.pos..].starts_with(b"//") {
                while self.pos < bytes.len() && bytes[self.pos] != b'\n' {
                    self.pos += 1;
                }
                continue;
            }
            break;
        }
    }

    /// Length of the whitespace-delimited word at the current position.
    fn peek_word_len(&self) -> usize {
        self.text[self.pos..]
            .bytes()
            .take_while(|b| !b.is_ascii_whitespace())
            .count()
    }

    /// Match a literal keyword with a word boundary after it.
    pub(crate) fn keyword(&mut self, keyword: &'static str) -> PResult<()> {
        self.skip_trivia();
        let rest = &self.text[self.pos..];
        let bounded = rest.starts_with(keyword)
            && !rest.as_bytes().get(keyword.len()).copied().is_some_and(is_word_byte);
        if bounded {
            self.pos += keyword.len();
            Ok(())
        } else {
            self.fail(keyword)
        }
    }

    /// Match an identifier: `[A-Za-z_][A-Za-z0-9_]*`, excluding reserved
    /// words.
    pub(crate) fn ident(&mut self) -> PResult<String> {
        self.skip_trivia();
        let bytes = self.text[self.pos..].as_bytes();
        let starts = bytes
            .first()
            .is_some_and(|&b| b.is_ascii_alphabetic() || b == b'_');
        if !starts {
            return self.fail("identifier");
        }
        let len = bytes.iter().take_while(|&&b| is_word_byte(b)).count();
        let word = &self.text[self.pos..self.pos + len];
        if KEYWORDS.contains(&word) {
            return self.fail("identifier");
        }
        let owned = word.to_string();
        self.pos += len;
        Ok(owned)
    }

    /// Match an `@tag` label and return the tag without the `@`.
    pub(crate) fn label(&mut self) -> PResult<String> {
        self.skip_trivia();
        let bytes = self.text[self.pos..].as_bytes();
        if bytes.first() != Some(&b'@') {
            return self.fail("label");
        }
        let len = bytes[1..].iter().take_while(|&&b| is_word_byte(b)).count();
        if len == 0 {
            return self.fail("label");
        }
        let tag = self.text[self.pos + 1..self.pos + 1 + len].to_string();
        self.pos += 1 + len;
        Ok(tag)
    }

    /// Capture an opaque formula: one or more whitespace-delimited words up
    /// to the next reserved word, label, or end of input. Words are joined
    /// with single spaces so interleaved trivia never leaks into the text.
    pub(crate) fn formula(&mut self, category: &'static str) -> PResult<String> {
        let mut words: Vec<String> = Vec::new();
        loop {
            self.skip_trivia();
            let start = self.pos;
            let len = self.peek_word_len();
            if len == 0 {
                break;
            }
            let word = &self.text[start..start + len];
            if word.starts_with('@') || KEYWORDS.contains(&word) {
                break;
            }
            words.push(word.to_string());
            self.pos = start + len;
        }
        if words.is_empty() {
            return self.fail(category);
        }
        Ok(words.join(" "))
    }

    /// Try an alternative, backtracking the position on failure. The
    /// furthest-failure state is deliberately not rolled back.
    pub(crate) fn opt<T>(&mut self, f: impl FnOnce(&mut Self) -> PResult<T>) -> Option<T> {
        let checkpoint = self.pos;
        match f(self) {
            Ok(value) => Some(value),
            Err(Fail) => {
                self.pos = checkpoint;
                None
            }
        }
    }

    /// Match one or more repetitions of an alternative.
    pub(crate) fn many1<T>(
        &mut self,
        mut f: impl FnMut(&mut Self) -> PResult<T>,
    ) -> PResult<Vec<T>> {
        let mut items = vec![f(self)?];
        while let Some(item) = self.opt(&mut f) {
            items.push(item);
        }
        Ok(items)
    }

    /// Require that only trivia remains.
    pub(crate) fn expect_eof(&mut self) -> PResult<()> {
        self.skip_trivia();
        if self.pos < self.text.len() {
            return self.fail("end of input");
        }
        Ok(())
    }

    /// Consume the scanner into the furthest-failure error.
    pub(crate) fn into_error(self) -> ParseError {
        let word: String = self.text[self.furthest..]
            .chars()
            .take_while(|c| !c.is_whitespace())
            .collect();
        let found = if word.is_empty() {
            "end of input".to_string()
        } else {
            word
        };
        ParseError {
            offset: self.furthest,
            expected: self.expected,
            found,
        }
    }
}

const fn is_word_byte(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || byte == b'_'
}

/// `LABEL ("theorem")? PREDICATE` — shared by invariants, guards, and
/// axioms.
pub(crate) fn labeled_predicate(s: &mut Scanner) -> PResult<LabeledPredicate> {
    let label = s.label()?;
    let is_theorem = s.opt(|s| s.keyword("theorem")).is_some();
    let predicate = s.formula("predicate")?;
    Ok(LabeledPredicate {
        label,
        predicate,
        is_theorem,
    })
}

/// `LABEL ASSIGNMENT` — shared by actions and witnesses.
pub(crate) fn labeled_assignment(s: &mut Scanner) -> PResult<LabeledAssignment> {
    let label = s.label()?;
    let assignment = s.formula("assignment")?;
    Ok(LabeledAssignment { label, assignment })
}
