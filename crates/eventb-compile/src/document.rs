//! Ordered element trees for Rodin document artifacts.
//!
//! The target schema is order-sensitive: the external tool consumes both
//! child order and attribute order, so attributes live in an
//! insertion-ordered map and children in a plain vector.

use indexmap::IndexMap;

/// A single node in a document tree: a kind tag, ordered attributes, and
/// ordered children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    /// The element type tag.
    pub kind: &'static str,
    /// Attributes, serialized in insertion order.
    pub attrs: IndexMap<&'static str, String>,
    /// Child elements, serialized in insertion order.
    pub children: Vec<Element>,
}

impl Element {
    /// Create an element with no attributes or children.
    #[must_use]
    pub fn new(kind: &'static str) -> Self {
        Self {
            kind,
            attrs: IndexMap::new(),
            children: Vec::new(),
        }
    }

    /// Add an attribute, builder style.
    #[must_use]
    pub fn attr(mut self, key: &'static str, value: impl Into<String>) -> Self {
        self.attrs.insert(key, value.into());
        self
    }

    /// Append a child element.
    pub fn push(&mut self, child: Element) {
        self.children.push(child);
    }

    /// Visit this element and all descendants in document (pre-)order.
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a Element)) {
        visit(self);
        for child in &self.children {
            child.walk(visit);
        }
    }
}

/// Counter backing the synthetic `name` attribute.
///
/// The counter is owned by a single emission call and starts at 1, so the
/// `name` sequence of a document is exactly `1..=N` in document order and
/// concurrent compiles can never interfere.
#[derive(Debug, Default)]
pub(crate) struct NameCounter(u32);

impl NameCounter {
    /// The next index, as the attribute string.
    pub(crate) fn next_name(&mut self) -> String {
        self.0 += 1;
        self.0.to_string()
    }
}
