use crate::error::{ArithmeticError, EvalError};
use crate::lex::tokenize;
use crate::numeric::Numeric;
use crate::rpn::to_rpn;
use crate::token::{classify_all, render_postfix, OperatorKind, Token};
use crate::validate::validate;

#[cfg(feature = "rayon")]
use rayon::prelude::{IntoParallelRefIterator, ParallelIterator};

type BinaryFn<N> = fn(N, N) -> Result<N, ArithmeticError>;
type UnaryFn<N> = fn(N) -> Result<N, ArithmeticError>;

/// Operator implementations of one numeric kind, resolved once.
struct OperatorTable<N> {
    add: BinaryFn<N>,
    subtract: BinaryFn<N>,
    multiply: BinaryFn<N>,
    divide: BinaryFn<N>,
    negate: UnaryFn<N>,
}

impl<N: Numeric> OperatorTable<N> {
    fn new() -> Self {
        Self {
            add: N::add,
            subtract: N::subtract,
            multiply: N::multiply,
            divide: N::divide,
            negate: N::negate,
        }
    }
}

impl<N> OperatorTable<N> {
    fn binary(&self, kind: OperatorKind) -> Option<BinaryFn<N>> {
        match kind {
            OperatorKind::Add => Some(self.add),
            OperatorKind::Subtract => Some(self.subtract),
            OperatorKind::Multiply => Some(self.multiply),
            OperatorKind::Divide => Some(self.divide),
            OperatorKind::OpenParen | OperatorKind::CloseParen | OperatorKind::Negate => None,
        }
    }
}

// Function pointers are `Copy` whatever `N` is.
impl<N> Clone for OperatorTable<N> {
    fn clone(&self) -> Self {
        *self
    }
}
impl<N> Copy for OperatorTable<N> {}

/// Expression engine for one numeric kind.
///
/// A calculator holds no mutable state, so one instance can be shared
/// across threads and reused for any number of expressions.
///
/// ```rust
/// use rpn_expr::Calculator;
///
/// let calculator = Calculator::<i64>::new();
/// assert_eq!(calculator.evaluate("-(3 + 2) * 2").unwrap(), -10);
/// assert_eq!(calculator.evaluate("7 / 2").unwrap(), 3);
/// ```
pub struct Calculator<N> {
    operators: OperatorTable<N>,
}

impl<N> Clone for Calculator<N> {
    fn clone(&self) -> Self {
        *self
    }
}
impl<N> Copy for Calculator<N> {}

impl<N: Numeric> Default for Calculator<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N: Numeric> Calculator<N> {
    pub fn new() -> Self {
        Self {
            operators: OperatorTable::new(),
        }
    }

    /// Validates, tokenizes, converts and evaluates `input`.
    pub fn evaluate(&self, input: &str) -> Result<N, EvalError> {
        let rpn = self.to_postfix(input)?;
        let value = self.evaluate_rpn(rpn)?;
        log::trace!("{input:?} = {} ({})", value.render(), N::KIND);
        Ok(value)
    }

    /// Runs every stage up to and including the shunting-yard conversion.
    pub fn to_postfix(&self, input: &str) -> Result<Vec<Token<N>>, EvalError> {
        validate(input)?;
        let lexemes = tokenize(input)?;
        let rpn = to_rpn(classify_all(&lexemes)?)?;
        log::trace!("postfix: {}", render_postfix(&rpn));
        Ok(rpn)
    }

    /// Reduces a postfix sequence to a single value.
    pub fn evaluate_rpn(&self, rpn: Vec<Token<N>>) -> Result<N, EvalError> {
        let mut stack: Vec<N> = Vec::with_capacity(rpn.len());
        for token in rpn {
            match token {
                Token::Operand(value) => stack.push(value),
                Token::Operator(OperatorKind::Negate, _) => {
                    let only = stack
                        .pop()
                        .ok_or(EvalError::MalformedRpn("negation without an operand"))?;
                    stack.push((self.operators.negate)(only)?);
                }
                Token::Operator(kind, _) => {
                    let op = self
                        .operators
                        .binary(kind)
                        .ok_or(EvalError::MalformedRpn("parenthesis in postfix sequence"))?;
                    // The right operand is on top.
                    let (Some(rhs), Some(lhs)) = (stack.pop(), stack.pop()) else {
                        return Err(EvalError::MalformedRpn(
                            "binary operator without two operands",
                        ));
                    };
                    stack.push(op(lhs, rhs)?);
                }
            }
        }

        let result = stack
            .pop()
            .ok_or(EvalError::MalformedRpn("no value left on the stack"))?;
        if !stack.is_empty() {
            return Err(EvalError::MalformedRpn(
                "more than one value left on the stack",
            ));
        }
        Ok(result)
    }

    /// Evaluates each input independently, keeping input order. Runs in
    /// parallel with the `rayon` feature.
    pub fn evaluate_batch<S: AsRef<str> + Sync>(
        &self,
        inputs: &[S],
    ) -> Vec<Result<N, EvalError>> {
        #[cfg(feature = "rayon")]
        {
            inputs
                .par_iter()
                .map(|input| self.evaluate(input.as_ref()))
                .collect()
        }
        #[cfg(not(feature = "rayon"))]
        {
            inputs
                .iter()
                .map(|input| self.evaluate(input.as_ref()))
                .collect()
        }
    }
}

/// Shorthand for `Calculator::<N>::new().evaluate(input)`.
pub fn evaluate<N: Numeric>(input: &str) -> Result<N, EvalError> {
    Calculator::<N>::new().evaluate(input)
}
