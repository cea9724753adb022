//! Typed AST for Event-B machine and context files.
//!
//! The AST is the intermediate form between the grammar engines and the
//! document emitter. Optional sections are explicit `Option`/`Vec` fields,
//! and every sequence preserves declaration order: the emitter assigns
//! sequential element identifiers from it, so order is semantically
//! significant.
//!
//! Predicate and assignment bodies are opaque strings. The Rodin artifact
//! stores them verbatim, so their internals are never modeled here.

use std::path::Path;

/// The event name that initializes a machine's variables.
pub const INITIALISATION: &str = "INITIALISATION";

/// Placeholder name for an anonymous initialisation event.
pub const ANONYMOUS_EVENT: &str = "_";

/// The two source file kinds, distinguished by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceKind {
    /// A `.bm` machine file: variables, invariants, events.
    Machine,
    /// A `.bc` context file: sets, constants, axioms.
    Context,
}

impl SourceKind {
    /// Detect the file kind from a path's extension.
    #[must_use]
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()? {
            "bm" => Some(Self::Machine),
            "bc" => Some(Self::Context),
            _ => None,
        }
    }

    /// The source file extension for this kind.
    #[must_use]
    pub const fn source_extension(self) -> &'static str {
        match self {
            Self::Machine => "bm",
            Self::Context => "bc",
        }
    }
}

/// A parsed machine file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Machine {
    /// The machine name.
    pub name: String,
    /// Name of the machine this one refines, if any.
    pub refines: Option<String>,
    /// Name of the context this machine sees, if any.
    pub sees: Option<String>,
    /// Declared variables, in declaration order.
    pub variables: Vec<String>,
    /// Invariants, in declaration order.
    pub invariants: Vec<LabeledPredicate>,
    /// Events, in declaration order.
    pub events: Vec<Event>,
}

/// A parsed context file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Context {
    /// The context name.
    pub name: String,
    /// Name of the context this one extends, if any.
    pub extends: Option<String>,
    /// Carrier sets, in declaration order.
    pub sets: Vec<String>,
    /// Constants, in declaration order.
    pub constants: Vec<String>,
    /// Axioms, in declaration order.
    pub axioms: Vec<LabeledPredicate>,
}

/// A single event within a machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    /// The event name.
    pub name: String,
    /// Whether the event extends its abstract counterpart.
    pub extended: bool,
    /// Convergence classification.
    pub convergence: Convergence,
    /// Name of the abstract event this one refines, if any.
    pub refines: Option<String>,
    /// Parameters introduced by `any`, in declaration order.
    pub parameters: Vec<String>,
    /// Guards introduced by `where`, in declaration order.
    pub guards: Vec<LabeledPredicate>,
    /// Witnesses introduced by `with`, in declaration order.
    pub witnesses: Vec<LabeledAssignment>,
    /// Actions introduced by `then`, in declaration order.
    pub actions: Vec<LabeledAssignment>,
}

impl Event {
    /// Whether this is the (possibly anonymous) initialisation event.
    ///
    /// Initialisation events never refine a named abstract event, even when
    /// the surrounding machine refines another machine.
    #[must_use]
    pub fn is_initialisation(&self) -> bool {
        self.name == INITIALISATION || self.name == ANONYMOUS_EVENT
    }
}

/// Convergence classification of an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Convergence {
    /// No variant obligation (the default).
    #[default]
    Ordinary,
    /// Must decrease the variant.
    Convergent,
    /// Must not increase the variant.
    Anticipated,
}

/// A labelled predicate: an invariant, guard, or axiom.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabeledPredicate {
    /// The `@label` tag, without the `@`.
    pub label: String,
    /// The predicate text, captured verbatim.
    pub predicate: String,
    /// Whether the predicate is marked `theorem`.
    pub is_theorem: bool,
}

/// A labelled assignment: an action or witness.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabeledAssignment {
    /// The `@label` tag, without the `@`.
    pub label: String,
    /// The assignment text, captured verbatim.
    pub assignment: String,
}
