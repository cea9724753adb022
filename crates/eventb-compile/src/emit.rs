//! AST to Rodin document emission.
//!
//! A single pre-order pass over the AST builds the element tree. Nodes are
//! emitted in declaration order, each non-root element takes its `name`
//! attribute from a counter owned by the emission call, and within an event
//! the child order is fixed: refines, parameters, guards, witnesses,
//! actions.

use eventb_syntax::{Context, Convergence, Event, Machine};

use crate::document::{Element, NameCounter};

// Rodin element types.
const MACHINE_FILE: &str = "org.eventb.core.machineFile";
const CONTEXT_FILE: &str = "org.eventb.core.contextFile";
const REFINES_MACHINE: &str = "org.eventb.core.refinesMachine";
const SEES_CONTEXT: &str = "org.eventb.core.seesContext";
const VARIABLE: &str = "org.eventb.core.variable";
const INVARIANT: &str = "org.eventb.core.invariant";
const EVENT: &str = "org.eventb.core.event";
const REFINES_EVENT: &str = "org.eventb.core.refinesEvent";
const PARAMETER: &str = "org.eventb.core.parameter";
const GUARD: &str = "org.eventb.core.guard";
const WITNESS: &str = "org.eventb.core.witness";
const ACTION: &str = "org.eventb.core.action";
const EXTENDS_CONTEXT: &str = "org.eventb.core.extendsContext";
const CARRIER_SET: &str = "org.eventb.core.carrierSet";
const CONSTANT: &str = "org.eventb.core.constant";
const AXIOM: &str = "org.eventb.core.axiom";

// Rodin attribute keys.
const NAME: &str = "name";
const VERSION: &str = "version";
const CONFIGURATION: &str = "org.eventb.core.configuration";
const GENERATED: &str = "org.eventb.core.generated";
const TARGET: &str = "org.eventb.core.target";
const IDENTIFIER: &str = "org.eventb.core.identifier";
const LABEL: &str = "org.eventb.core.label";
const PREDICATE: &str = "org.eventb.core.predicate";
const THEOREM: &str = "org.eventb.core.theorem";
const ASSIGNMENT: &str = "org.eventb.core.assignment";
const CONVERGENCE: &str = "org.eventb.core.convergence";
const EXTENDED: &str = "org.eventb.core.extended";
const SYMBOLIC: &str = "de.prob.symbolic.symbolicAttribute";

const MACHINE_VERSION: &str = "5";
const CONTEXT_VERSION: &str = "3";
const MACHINE_CONFIGURATION: &str = "org.eventb.core.fwd";
const CONTEXT_CONFIGURATION: &str = "org.eventb.core.fwd;de.prob.symbolic.ctxBase";

/// Emit the document tree for a machine.
#[must_use]
pub fn emit_machine(machine: &Machine) -> Element {
    let mut names = NameCounter::default();
    let mut root = Element::new(MACHINE_FILE)
        .attr(VERSION, MACHINE_VERSION)
        .attr(CONFIGURATION, MACHINE_CONFIGURATION)
        .attr(GENERATED, "false");

    if let Some(target) = &machine.refines {
        root.push(
            Element::new(REFINES_MACHINE)
                .attr(NAME, names.next_name())
                .attr(TARGET, target.as_str()),
        );
    }
    if let Some(target) = &machine.sees {
        root.push(
            Element::new(SEES_CONTEXT)
                .attr(NAME, names.next_name())
                .attr(TARGET, target.as_str()),
        );
    }
    for variable in &machine.variables {
        root.push(
            Element::new(VARIABLE)
                .attr(NAME, names.next_name())
                .attr(GENERATED, "false")
                .attr(IDENTIFIER, variable.as_str()),
        );
    }
    for invariant in &machine.invariants {
        root.push(
            Element::new(INVARIANT)
                .attr(NAME, names.next_name())
                .attr(GENERATED, "false")
                .attr(LABEL, invariant.label.as_str())
                .attr(PREDICATE, invariant.predicate.as_str())
                .attr(THEOREM, invariant.is_theorem.to_string()),
        );
    }
    for event in &machine.events {
        root.push(emit_event(event, &mut names));
    }
    root
}

/// Emit the document tree for a context.
#[must_use]
pub fn emit_context(context: &Context) -> Element {
    let mut names = NameCounter::default();
    let mut root = Element::new(CONTEXT_FILE)
        .attr(VERSION, CONTEXT_VERSION)
        .attr(CONFIGURATION, CONTEXT_CONFIGURATION)
        .attr(GENERATED, "false");

    if let Some(target) = &context.extends {
        root.push(
            Element::new(EXTENDS_CONTEXT)
                .attr(NAME, names.next_name())
                .attr(TARGET, target.as_str()),
        );
    }
    for set in &context.sets {
        root.push(
            Element::new(CARRIER_SET)
                .attr(NAME, names.next_name())
                .attr(IDENTIFIER, set.as_str()),
        );
    }
    for constant in &context.constants {
        root.push(
            Element::new(CONSTANT)
                .attr(NAME, names.next_name())
                .attr(IDENTIFIER, constant.as_str())
                .attr(SYMBOLIC, "false"),
        );
    }
    for axiom in &context.axioms {
        root.push(
            Element::new(AXIOM)
                .attr(NAME, names.next_name())
                .attr(LABEL, axiom.label.as_str())
                .attr(PREDICATE, axiom.predicate.as_str())
                .attr(THEOREM, axiom.is_theorem.to_string()),
        );
    }
    root
}

fn emit_event(event: &Event, names: &mut NameCounter) -> Element {
    let mut element = Element::new(EVENT)
        .attr(NAME, names.next_name())
        .attr(GENERATED, "false")
        .attr(CONVERGENCE, convergence_code(event.convergence))
        .attr(EXTENDED, event.extended.to_string())
        .attr(LABEL, event.name.as_str());

    // Initialisation events never refine a named abstract event, even when
    // the surrounding machine refines another machine.
    if let Some(target) = &event.refines {
        if !event.is_initialisation() {
            element.push(
                Element::new(REFINES_EVENT)
                    .attr(NAME, names.next_name())
                    .attr(TARGET, target.as_str()),
            );
        }
    }
    for parameter in &event.parameters {
        element.push(
            Element::new(PARAMETER)
                .attr(NAME, names.next_name())
                .attr(GENERATED, "false")
                .attr(IDENTIFIER, parameter.as_str()),
        );
    }
    for guard in &event.guards {
        element.push(
            Element::new(GUARD)
                .attr(NAME, names.next_name())
                .attr(GENERATED, "false")
                .attr(LABEL, guard.label.as_str())
                .attr(PREDICATE, guard.predicate.as_str())
                .attr(THEOREM, guard.is_theorem.to_string()),
        );
    }
    for witness in &event.witnesses {
        element.push(
            Element::new(WITNESS)
                .attr(NAME, names.next_name())
                .attr(GENERATED, "false")
                .attr(LABEL, witness.label.as_str())
                .attr(PREDICATE, witness.assignment.as_str()),
        );
    }
    for action in &event.actions {
        element.push(
            Element::new(ACTION)
                .attr(NAME, names.next_name())
                .attr(GENERATED, "false")
                .attr(LABEL, action.label.as_str())
                .attr(ASSIGNMENT, action.assignment.as_str()),
        );
    }
    element
}

/// `ordinary → "0"`, `convergent → "1"`, `anticipated → "2"`.
///
/// The match is total over the three-variant enum, so an unknown
/// convergence value cannot reach emission.
const fn convergence_code(convergence: Convergence) -> &'static str {
    match convergence {
        Convergence::Ordinary => "0",
        Convergence::Convergent => "1",
        Convergence::Anticipated => "2",
    }
}
