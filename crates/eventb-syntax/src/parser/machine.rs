//! Grammar engine for machine files.
//!
//! ```text
//! machine := "machine" IDENT
//!            ("refines" IDENT)?
//!            ("sees" IDENT)?
//!            ("variables" IDENT+)?
//!            ("invariants" LABELED_PRED+)?
//!            ("events" EVENT+)?
//!            "end"
//! EVENT   := ("extended")? CONVERGENCE? "event" IDENT
//!            ("refines" IDENT)?
//!            ("any" IDENT+)?
//!            ("where" LABELED_PRED+)?
//!            ("with" LABELED_ASSIGN+)?
//!            ("then" LABELED_ASSIGN+)?
//!            "end"
//! ```

use crate::ast::{Convergence, Event, Machine};

use super::{labeled_assignment, labeled_predicate, Fail, PResult, ParseError, Scanner};

/// Parse normalized machine source into its AST.
///
/// # Errors
///
/// Returns the furthest-failure [`ParseError`] when the text does not match
/// the machine grammar. No partial AST is produced.
pub fn parse_machine(text: &str) -> Result<Machine, ParseError> {
    let mut scanner = Scanner::new(text);
    match machine(&mut scanner) {
        Ok(ast) => Ok(ast),
        Err(Fail) => Err(scanner.into_error()),
    }
}

fn machine(s: &mut Scanner) -> PResult<Machine> {
    s.keyword("machine")?;
    let name = s.ident()?;
    let refines = s.opt(|s| {
        s.keyword("refines")?;
        s.ident()
    });
    let sees = s.opt(|s| {
        s.keyword("sees")?;
        s.ident()
    });
    let variables = s
        .opt(|s| {
            s.keyword("variables")?;
            s.many1(Scanner::ident)
        })
        .unwrap_or_default();
    let invariants = s
        .opt(|s| {
            s.keyword("invariants")?;
            s.many1(labeled_predicate)
        })
        .unwrap_or_default();
    let events = s
        .opt(|s| {
            s.keyword("events")?;
            s.many1(event)
        })
        .unwrap_or_default();
    s.keyword("end")?;
    s.expect_eof()?;
    Ok(Machine {
        name,
        refines,
        sees,
        variables,
        invariants,
        events,
    })
}

fn event(s: &mut Scanner) -> PResult<Event> {
    let extended = s.opt(|s| s.keyword("extended")).is_some();
    let convergence = s.opt(convergence).unwrap_or_default();
    s.keyword("event")?;
    let name = s.ident()?;
    let refines = s.opt(|s| {
        s.keyword("refines")?;
        s.ident()
    });
    let parameters = s
        .opt(|s| {
            s.keyword("any")?;
            s.many1(Scanner::ident)
        })
        .unwrap_or_default();
    let guards = s
        .opt(|s| {
            s.keyword("where")?;
            s.many1(labeled_predicate)
        })
        .unwrap_or_default();
    let witnesses = s
        .opt(|s| {
            s.keyword("with")?;
            s.many1(labeled_assignment)
        })
        .unwrap_or_default();
    let actions = s
        .opt(|s| {
            s.keyword("then")?;
            s.many1(labeled_assignment)
        })
        .unwrap_or_default();
    s.keyword("end")?;
    Ok(Event {
        name,
        extended,
        convergence,
        refines,
        parameters,
        guards,
        witnesses,
        actions,
    })
}

fn convergence(s: &mut Scanner) -> PResult<Convergence> {
    if s.opt(|s| s.keyword("ordinary")).is_some() {
        return Ok(Convergence::Ordinary);
    }
    if s.opt(|s| s.keyword("convergent")).is_some() {
        return Ok(Convergence::Convergent);
    }
    if s.opt(|s| s.keyword("anticipated")).is_some() {
        return Ok(Convergence::Anticipated);
    }
    Err(Fail)
}
