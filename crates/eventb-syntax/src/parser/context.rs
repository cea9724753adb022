//! Grammar engine for context files.
//!
//! ```text
//! context := "context" IDENT
//!            ("extends" IDENT)?
//!            ("sets" IDENT+)?
//!            ("constants" IDENT+)?
//!            ("axioms" LABELED_PRED+)?
//!            "end"
//! ```

use crate::ast::Context;

use super::{labeled_predicate, Fail, PResult, ParseError, Scanner};

/// Parse normalized context source into its AST.
///
/// # Errors
///
/// Returns the furthest-failure [`ParseError`] when the text does not match
/// the context grammar. No partial AST is produced.
pub fn parse_context(text: &str) -> Result<Context, ParseError> {
    let mut scanner = Scanner::new(text);
    match context(&mut scanner) {
        Ok(ast) => Ok(ast),
        Err(Fail) => Err(scanner.into_error()),
    }
}

fn context(s: &mut Scanner) -> PResult<Context> {
    s.keyword("context")?;
    let name = s.ident()?;
    let extends = s.opt(|s| {
        s.keyword("extends")?;
        s.ident()
    });
    let sets = s
        .opt(|s| {
            s.keyword("sets")?;
            s.many1(Scanner::ident)
        })
        .unwrap_or_default();
    let constants = s
        .opt(|s| {
            s.keyword("constants")?;
            s.many1(Scanner::ident)
        })
        .unwrap_or_default();
    let axioms = s
        .opt(|s| {
            s.keyword("axioms")?;
            s.many1(labeled_predicate)
        })
        .unwrap_or_default();
    s.keyword("end")?;
    s.expect_eof()?;
    Ok(Context {
        name,
        extends,
        sets,
        constants,
        axioms,
    })
}
