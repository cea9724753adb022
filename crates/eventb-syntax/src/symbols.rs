//! ASCII-to-mathematical-symbol normalization.
//!
//! Event-B sources are typed with plain ASCII operators, while the grammar
//! (and the Rodin artifacts built from it) work on the canonical Unicode
//! codepoints. Normalization rewrites a fixed, ordered table of patterns,
//! left to right and non-overlapping, with multi-character patterns matched
//! before their single-character components:
//!
//! | pattern | replacement | codepoint |
//! |---|---|---|
//! | `:=` | `≔` | U+2254 COLON EQUALS |
//! | `..` (not adjacent to a third `.`) | `‥` | U+2025 TWO DOT LEADER |
//! | `+` | `+` | U+002B (identity) |
//! | `-` | `−` | U+2212 MINUS SIGN |
//! | `*` | `∗` | U+2217 ASTERISK OPERATOR |
//! | `\|` | `∣` | U+2223 DIVIDES |
//! | `/` (not adjacent to another `/`) | `÷` | U+00F7 DIVISION SIGN |
//!
//! The `/` rule leaves `//` untouched so line comments survive. Text that
//! matches no pattern passes through unchanged, and normalization cannot
//! fail.
//!
//! Replacements change byte lengths, so [`Normalized`] also records an
//! offset map translating normalized byte offsets back into the original
//! buffer. Diagnostics are always reported against the original text.

/// One applied substitution, remembered for offset translation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Substitution {
    /// Start of the replacement symbol in the normalized text.
    norm_start: u32,
    /// End of the replacement symbol in the normalized text.
    norm_end: u32,
    /// Start of the matched pattern in the original text.
    orig_start: u32,
    /// End of the matched pattern in the original text.
    orig_end: u32,
}

/// Normalized source text plus the bookkeeping needed to map offsets back
/// to the original buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Normalized {
    text: String,
    substitutions: Vec<Substitution>,
}

impl Normalized {
    /// The normalized text.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Translate a byte offset in the normalized text back to the original
    /// text. Offsets inside a replacement symbol map to the start of the
    /// pattern it replaced; offsets past the end of the text clamp to the
    /// original length.
    #[must_use]
    pub fn to_original(&self, offset: usize) -> usize {
        let offset = offset.min(self.text.len()) as u32;
        let idx = self
            .substitutions
            .partition_point(|s| s.norm_start <= offset);
        let original = match idx.checked_sub(1).map(|i| self.substitutions[i]) {
            None => offset,
            Some(sub) if offset < sub.norm_end => sub.orig_start,
            Some(sub) => sub.orig_end + (offset - sub.norm_end),
        };
        original as usize
    }
}

/// Rewrite ASCII operator spellings into canonical symbols.
#[must_use]
pub fn normalize(source: &str) -> Normalized {
    let bytes = source.as_bytes();
    let mut text = String::with_capacity(source.len());
    let mut substitutions = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        let (pattern_len, symbol) = match bytes[i] {
            b':' if bytes.get(i + 1) == Some(&b'=') => (2, "≔"),
            b'.' if bytes.get(i + 1) == Some(&b'.')
                && bytes.get(i + 2) != Some(&b'.')
                && (i == 0 || bytes[i - 1] != b'.') =>
            {
                (2, "‥")
            }
            // `+` maps to itself; the identity arm keeps the table total.
            b'+' => (1, "+"),
            b'-' => (1, "−"),
            b'*' => (1, "∗"),
            b'|' => (1, "∣"),
            b'/' if bytes.get(i + 1) != Some(&b'/') && (i == 0 || bytes[i - 1] != b'/') => {
                (1, "÷")
            }
            _ => (0, ""),
        };

        if pattern_len == 0 {
            let rest = &source[i..];
            let ch = rest.chars().next().unwrap_or('\u{fffd}');
            text.push(ch);
            i += ch.len_utf8();
            continue;
        }

        if pattern_len == symbol.len() {
            // Length-preserving replacement needs no map entry.
            text.push_str(symbol);
            i += pattern_len;
            continue;
        }

        let norm_start = text.len() as u32;
        text.push_str(symbol);
        substitutions.push(Substitution {
            norm_start,
            norm_end: text.len() as u32,
            orig_start: i as u32,
            orig_end: (i + pattern_len) as u32,
        });
        i += pattern_len;
    }

    Normalized {
        text,
        substitutions,
    }
}
