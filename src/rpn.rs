use crate::error::EvalError;
use crate::token::{OperatorKind, Rank, Token};

/// Reorders an infix token sequence into postfix (RPN) with the
/// shunting-yard algorithm.
///
/// An operator pops every stacked operator of greater or equal rank before it
/// is pushed. Equal ranks therefore associate to the left, while unary minus,
/// which outranks everything, stays bound to the operand that follows it.
/// Parentheses never reach the output.
pub fn to_rpn<N>(tokens: Vec<Token<N>>) -> Result<Vec<Token<N>>, EvalError> {
    let mut output = Vec::with_capacity(tokens.len());
    let mut operators: Vec<(OperatorKind, Rank)> = Vec::new();

    for token in tokens {
        match token {
            Token::Operand(_) => output.push(token),
            Token::Operator(OperatorKind::OpenParen, rank) => {
                operators.push((OperatorKind::OpenParen, rank));
            }
            Token::Operator(OperatorKind::CloseParen, _) => loop {
                match operators.pop() {
                    Some((OperatorKind::OpenParen, _)) => break,
                    Some((kind, rank)) => output.push(Token::Operator(kind, rank)),
                    None => return Err(EvalError::UnbalancedParentheses),
                }
            },
            Token::Operator(kind, rank) => {
                while let Some(&(top_kind, top_rank)) = operators.last() {
                    if top_rank < rank {
                        break;
                    }
                    operators.pop();
                    output.push(Token::Operator(top_kind, top_rank));
                }
                operators.push((kind, rank));
            }
        }
    }

    while let Some((kind, rank)) = operators.pop() {
        if kind == OperatorKind::OpenParen {
            return Err(EvalError::UnbalancedParentheses);
        }
        output.push(Token::Operator(kind, rank));
    }
    Ok(output)
}
