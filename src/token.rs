use std::collections::HashMap;
use std::fmt;

use once_cell::sync::Lazy;

use crate::error::EvalError;
use crate::lex::Lexeme;
use crate::numeric::Numeric;

/// A classified lexeme.
#[derive(Clone, Debug, PartialEq)]
pub enum Token<N> {
    Operand(N),
    Operator(OperatorKind, Rank),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OperatorKind {
    OpenParen,
    CloseParen,
    /// Unary minus.
    Negate,
    Add,
    Subtract,
    Multiply,
    Divide,
}

/// Operator precedence. Higher ranks bind tighter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Rank {
    Parentheses = 0,
    Additive = 1,
    Multiplicative = 2,
    UnaryMinus = 3,
}

impl OperatorKind {
    pub const fn rank(self) -> Rank {
        match self {
            Self::OpenParen | Self::CloseParen => Rank::Parentheses,
            Self::Add | Self::Subtract => Rank::Additive,
            Self::Multiply | Self::Divide => Rank::Multiplicative,
            Self::Negate => Rank::UnaryMinus,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Self::OpenParen => "(",
            Self::CloseParen => ")",
            Self::Negate => "neg",
            Self::Add => "+",
            Self::Subtract => "-",
            Self::Multiply => "*",
            Self::Divide => "/",
        }
    }
}

impl<N> Token<N> {
    pub fn operator(kind: OperatorKind) -> Self {
        Self::Operator(kind, kind.rank())
    }

    fn is_open_paren(&self) -> bool {
        matches!(self, Self::Operator(OperatorKind::OpenParen, _))
    }
}

impl<N: Numeric> fmt::Display for Token<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Operand(value) => f.write_str(&value.render()),
            Self::Operator(kind, _) => f.write_str(kind.symbol()),
        }
    }
}

/// Joins a token sequence with single spaces, e.g. `3 4 2 * +`.
pub fn render_postfix<N: Numeric>(tokens: &[Token<N>]) -> String {
    tokens
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}

#[derive(Clone, Copy, Debug)]
enum Symbol {
    Fixed(OperatorKind),
    /// `-` is either [`OperatorKind::Negate`] or [`OperatorKind::Subtract`]
    /// depending on what precedes it.
    Minus,
}

static SYMBOLS: Lazy<HashMap<&'static str, Symbol>> = Lazy::new(|| {
    use OperatorKind::*;

    HashMap::from([
        ("(", Symbol::Fixed(OpenParen)),
        (")", Symbol::Fixed(CloseParen)),
        ("+", Symbol::Fixed(Add)),
        ("*", Symbol::Fixed(Multiply)),
        ("/", Symbol::Fixed(Divide)),
        ("-", Symbol::Minus),
    ])
});

/// Classifies one lexeme given the token before it.
///
/// A `-` with nothing before it, or right after `(`, is unary.
pub fn classify<N: Numeric>(
    lexeme: &Lexeme,
    previous: Option<&Token<N>>,
) -> Result<Token<N>, EvalError> {
    if let Some(symbol) = SYMBOLS.get(lexeme.text.as_str()) {
        let kind = match symbol {
            Symbol::Fixed(kind) => *kind,
            Symbol::Minus => match previous {
                None => OperatorKind::Negate,
                Some(token) if token.is_open_paren() => OperatorKind::Negate,
                Some(_) => OperatorKind::Subtract,
            },
        };
        return Ok(Token::operator(kind));
    }
    if lexeme.text.starts_with(|c: char| c.is_ascii_digit()) {
        return Ok(Token::Operand(N::parse(&lexeme.text)?));
    }
    Err(EvalError::Lexeme {
        offset: lexeme.start,
        text: lexeme.text.clone(),
    })
}

/// Classifies a lexeme sequence in order.
pub fn classify_all<N: Numeric>(lexemes: &[Lexeme]) -> Result<Vec<Token<N>>, EvalError> {
    let mut tokens: Vec<Token<N>> = Vec::with_capacity(lexemes.len());
    for lexeme in lexemes {
        let token = classify(lexeme, tokens.last())?;
        tokens.push(token);
    }
    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lex::tokenize;

    fn classified(input: &str) -> Vec<Token<i64>> {
        classify_all(&tokenize(input).unwrap()).unwrap()
    }

    fn op<N>(kind: OperatorKind) -> Token<N> {
        Token::operator(kind)
    }

    #[test]
    fn leading_minus_is_unary() {
        assert_eq!(
            classified("-3+5"),
            [
                op(OperatorKind::Negate),
                Token::Operand(3),
                op(OperatorKind::Add),
                Token::Operand(5),
            ]
        );
    }

    #[test]
    fn minus_after_open_paren_is_unary() {
        assert_eq!(
            classified("3-(-5)"),
            [
                Token::Operand(3),
                op(OperatorKind::Subtract),
                op(OperatorKind::OpenParen),
                op(OperatorKind::Negate),
                Token::Operand(5),
                op(OperatorKind::CloseParen),
            ]
        );
    }

    #[test]
    fn minus_after_close_paren_is_binary() {
        let tokens = classified("(1)-2");
        assert_eq!(tokens[3], op(OperatorKind::Subtract));
    }

    #[test]
    fn minus_after_an_operator_is_binary() {
        // The grammar rejects this, but the classifier still follows the
        // previous-token rule.
        let tokens = classified("2*-3");
        assert_eq!(
            tokens[2],
            Token::Operator(OperatorKind::Subtract, Rank::Additive)
        );
    }

    #[test]
    fn ranks_are_ordered() {
        assert!(Rank::Parentheses < Rank::Additive);
        assert!(Rank::Additive < Rank::Multiplicative);
        assert!(Rank::Multiplicative < Rank::UnaryMinus);
        assert_eq!(OperatorKind::Negate.rank(), Rank::UnaryMinus);
        assert_eq!(OperatorKind::Divide.rank(), Rank::Multiplicative);
        assert_eq!(OperatorKind::CloseParen.rank(), Rank::Parentheses);
    }

    #[test]
    fn out_of_range_literal_fails_to_parse() {
        let lexemes = tokenize("2147483648").unwrap();
        assert!(matches!(
            classify_all::<i32>(&lexemes),
            Err(EvalError::NumberParse(err)) if err.lexeme == "2147483648"
        ));
    }

    #[test]
    fn unknown_lexeme_is_rejected() {
        let lexeme = Lexeme {
            text: "^".to_string(),
            start: 4,
            end: 5,
        };
        assert!(matches!(
            classify::<f64>(&lexeme, None),
            Err(EvalError::Lexeme { offset: 4, .. })
        ));
    }

    #[test]
    fn postfix_rendering() {
        let tokens: Vec<Token<f64>> = vec![
            Token::Operand(3.5),
            op(OperatorKind::Negate),
            Token::Operand(2.0),
            op(OperatorKind::Multiply),
        ];
        assert_eq!(render_postfix(&tokens), "3.5 neg 2 *");
    }
}
