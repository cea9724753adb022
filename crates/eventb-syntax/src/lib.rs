//! Event-B syntax: symbol normalization, grammar engines, and typed AST.
//!
//! This crate provides:
//! - Normalization of ASCII operator spellings into canonical mathematical
//!   symbols, with offset translation back to the original buffer
//! - Two recursive-descent grammar engines (machine files, context files)
//!   with PEG-style furthest-failure error reporting
//! - The typed AST shared between the parsers and the document emitter
//!
//! # Example
//!
//! ```
//! use eventb_syntax::{normalize, parse_machine};
//!
//! let source = "machine counter\nvariables count\ninvariants @inv1 count > 0\nend\n";
//!
//! let normalized = normalize(source);
//! let machine = parse_machine(normalized.text()).unwrap();
//! assert_eq!(machine.name, "counter");
//! assert_eq!(machine.invariants[0].predicate, "count > 0");
//! ```

pub mod ast;
pub mod parser;
pub mod span;
pub mod symbols;

pub use ast::*;
pub use parser::{parse_context, parse_machine, ParseError, CATEGORIES, KEYWORDS};
pub use span::Span;
pub use symbols::{normalize, Normalized};
