use pest::Parser;
use pest_derive::Parser;

use crate::error::EvalError;

#[derive(Parser)]
#[grammar = "grammar.pest"] // relative to project `src`
pub struct ExpressionGrammar;

/// Checks that `input` has the shape of an expression before it is
/// tokenized.
///
/// Numbers and binary operators must alternate, and unary minus may only
/// appear at the start or directly after `(`. Parenthesis balance is not
/// checked here.
pub fn validate(input: &str) -> Result<(), EvalError> {
    ExpressionGrammar::parse(Rule::calculation, input)?;
    Ok(())
}
