use crate::numeric::NumericKind;
use crate::validate::Rule;

/// The input did not match the expression grammar.
pub type FormatError = pest::error::Error<Rule>;

/// Every way an evaluation can fail.
#[derive(Debug, thiserror::Error)]
pub enum EvalError {
    #[error("malformed expression: {0}")]
    Format(Box<FormatError>),

    #[error(transparent)]
    NumberParse(#[from] NumberParseError),

    #[error("unbalanced parentheses")]
    UnbalancedParentheses,

    /// The postfix sequence could not be reduced to a single value. The
    /// converter never produces such a sequence.
    #[error("malformed postfix expression: {0}")]
    MalformedRpn(&'static str),

    #[error(transparent)]
    Arithmetic(#[from] ArithmeticError),

    /// No lexeme could be matched at `offset` of the whitespace-free input.
    /// Validated input never triggers this.
    #[error("unexpected text at offset {offset}: {text:?}")]
    Lexeme { offset: usize, text: String },
}

impl From<FormatError> for EvalError {
    fn from(error: FormatError) -> Self {
        Self::Format(Box::new(error))
    }
}

/// A numeric literal that the selected [`NumericKind`] cannot represent.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("cannot read {lexeme:?} as {kind}: {reason}")]
pub struct NumberParseError {
    pub lexeme: String,
    pub kind: NumericKind,
    pub reason: String,
}

impl NumberParseError {
    pub fn new(lexeme: &str, kind: NumericKind, reason: impl ToString) -> Self {
        Self {
            lexeme: lexeme.to_string(),
            kind,
            reason: reason.to_string(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ArithmeticError {
    #[error("division by zero")]
    DivisionByZero,

    #[error("numeric overflow")]
    Overflow,
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("unknown numeric kind {0:?}, expected one of i32, i64, bigint, f32, f64")]
pub struct UnknownKind(pub String);
