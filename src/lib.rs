//! Infix arithmetic expression parser/evaluator.
//!
//! Expressions are made of non-negative decimal literals, `+ - * /`,
//! parentheses and unary minus. Evaluation runs in a fixed pipeline:
//!
//! 1. the input is checked against a [`pest`] grammar,
//! 2. whitespace is removed and the text is split into lexemes,
//! 3. lexemes are classified into [`Token`]s, telling unary from binary
//!    minus by the token before it,
//! 4. the tokens are reordered into postfix with the shunting-yard
//!    algorithm,
//! 5. the postfix sequence is reduced on a value stack.
//!
//! Arithmetic happens in one numeric kind per [`Calculator`], chosen by its
//! type parameter: `i32`, `i64`, `BigInt` (with the `bigint` feature), `f32`
//! or `f64`. Call [`evaluate_as`] to pick the kind at run time instead.
//!
//! # Example
//!
//! ```rust
//! use rpn_expr::*;
//!
//! let int = Calculator::<i64>::new();
//! assert_eq!(int.evaluate("3 + 4 * 2").unwrap(), 11);
//! assert_eq!(int.evaluate("-7 / 2").unwrap(), -3);
//!
//! let float = Calculator::<f64>::new();
//! assert_eq!(float.evaluate("7 / 2").unwrap(), 3.5);
//!
//! let kind: NumericKind = "i32".parse().unwrap();
//! assert_eq!(evaluate_as(kind, "3-(-5)").unwrap(), Number::Int32(8));
//!
//! assert!(matches!(int.evaluate("(1+2"), Err(EvalError::UnbalancedParentheses)));
//! ```

mod error;
mod evaluate;
mod lex;
mod numeric;
mod rpn;
mod token;
mod validate;

/// Uses the [`pest`] parsing expression grammar language.
///
/// ```text
#[doc = include_str!("grammar.pest")]
/// ```
pub mod grammar_doc {}

pub use error::*;
pub use evaluate::*;
pub use lex::{tokenize, Lexeme};
pub use numeric::*;
pub use rpn::to_rpn;
pub use token::*;
pub use validate::{validate, Rule};

#[cfg(feature = "bigint")]
pub use num_bigint::BigInt;

/// Evaluates `input` in the numeric kind named by `kind`.
pub fn evaluate_as(kind: NumericKind, input: &str) -> Result<Number, EvalError> {
    match kind {
        NumericKind::Int32 => evaluate::<i32>(input).map(Number::Int32),
        NumericKind::Int64 => evaluate::<i64>(input).map(Number::Int64),
        #[cfg(feature = "bigint")]
        NumericKind::BigInt => evaluate::<BigInt>(input).map(Number::BigInt),
        NumericKind::Float32 => evaluate::<f32>(input).map(Number::Float32),
        NumericKind::Float64 => evaluate::<f64>(input).map(Number::Float64),
    }
}
