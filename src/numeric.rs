use std::fmt;
use std::str::FromStr;

use num_traits::{CheckedAdd, CheckedDiv, CheckedMul, CheckedNeg, CheckedSub, Float, Zero};

#[cfg(feature = "bigint")]
use num_bigint::BigInt;

use crate::error::{ArithmeticError, NumberParseError, UnknownKind};

/// The capability set an expression engine needs from its value type.
///
/// Every evaluation works on exactly one implementor, so values of different
/// kinds can never meet in a single operation.
pub trait Numeric: Clone + fmt::Debug + fmt::Display + Send + Sync + 'static {
    const KIND: NumericKind;

    /// Reads a numeric lexeme (`digit+ ('.' digit+)?`).
    fn parse(lexeme: &str) -> Result<Self, NumberParseError>;

    fn add(self, rhs: Self) -> Result<Self, ArithmeticError>;

    fn subtract(self, rhs: Self) -> Result<Self, ArithmeticError>;

    fn multiply(self, rhs: Self) -> Result<Self, ArithmeticError>;

    /// Integer kinds truncate toward zero and reject a zero divisor. Float
    /// kinds follow IEEE 754, so a zero divisor gives an infinity or NaN.
    fn divide(self, rhs: Self) -> Result<Self, ArithmeticError>;

    fn negate(self) -> Result<Self, ArithmeticError>;

    fn render(&self) -> String {
        self.to_string()
    }
}

/// Runtime name of a [`Numeric`] implementation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NumericKind {
    Int32,
    Int64,
    #[cfg(feature = "bigint")]
    BigInt,
    Float32,
    Float64,
}

impl NumericKind {
    #[cfg(feature = "bigint")]
    pub const ALL: &'static [NumericKind] = &[
        Self::Int32,
        Self::Int64,
        Self::BigInt,
        Self::Float32,
        Self::Float64,
    ];
    #[cfg(not(feature = "bigint"))]
    pub const ALL: &'static [NumericKind] =
        &[Self::Int32, Self::Int64, Self::Float32, Self::Float64];

    pub fn name(self) -> &'static str {
        match self {
            Self::Int32 => "i32",
            Self::Int64 => "i64",
            #[cfg(feature = "bigint")]
            Self::BigInt => "bigint",
            Self::Float32 => "f32",
            Self::Float64 => "f64",
        }
    }

    pub fn is_integer(self) -> bool {
        !matches!(self, Self::Float32 | Self::Float64)
    }
}

impl fmt::Display for NumericKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for NumericKind {
    type Err = UnknownKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| UnknownKind(s.to_string()))
    }
}

/// A result tagged with the kind it was computed in.
#[derive(Clone, Debug, PartialEq)]
pub enum Number {
    Int32(i32),
    Int64(i64),
    #[cfg(feature = "bigint")]
    BigInt(BigInt),
    Float32(f32),
    Float64(f64),
}

impl Number {
    pub fn kind(&self) -> NumericKind {
        match self {
            Self::Int32(_) => NumericKind::Int32,
            Self::Int64(_) => NumericKind::Int64,
            #[cfg(feature = "bigint")]
            Self::BigInt(_) => NumericKind::BigInt,
            Self::Float32(_) => NumericKind::Float32,
            Self::Float64(_) => NumericKind::Float64,
        }
    }

    pub fn render(&self) -> String {
        match self {
            Self::Int32(v) => v.render(),
            Self::Int64(v) => v.render(),
            #[cfg(feature = "bigint")]
            Self::BigInt(v) => v.render(),
            Self::Float32(v) => v.render(),
            Self::Float64(v) => v.render(),
        }
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

fn parse_with<T>(lexeme: &str, kind: NumericKind) -> Result<T, NumberParseError>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    lexeme
        .parse()
        .map_err(|e| NumberParseError::new(lexeme, kind, e))
}

fn checked_add<T: CheckedAdd>(lhs: T, rhs: T) -> Result<T, ArithmeticError> {
    CheckedAdd::checked_add(&lhs, &rhs).ok_or(ArithmeticError::Overflow)
}

fn checked_sub<T: CheckedSub>(lhs: T, rhs: T) -> Result<T, ArithmeticError> {
    CheckedSub::checked_sub(&lhs, &rhs).ok_or(ArithmeticError::Overflow)
}

fn checked_mul<T: CheckedMul>(lhs: T, rhs: T) -> Result<T, ArithmeticError> {
    CheckedMul::checked_mul(&lhs, &rhs).ok_or(ArithmeticError::Overflow)
}

// `checked_div` also returns `None` for a zero divisor, so zero is tested
// first to tell the two failures apart.
fn checked_div<T: CheckedDiv + Zero>(lhs: T, rhs: T) -> Result<T, ArithmeticError> {
    if rhs.is_zero() {
        return Err(ArithmeticError::DivisionByZero);
    }
    CheckedDiv::checked_div(&lhs, &rhs).ok_or(ArithmeticError::Overflow)
}

macro_rules! impl_fixed_integer {
    ($t:ty, $kind:expr) => {
        impl Numeric for $t {
            const KIND: NumericKind = $kind;

            fn parse(lexeme: &str) -> Result<Self, NumberParseError> {
                parse_with(lexeme, Self::KIND)
            }

            fn add(self, rhs: Self) -> Result<Self, ArithmeticError> {
                checked_add(self, rhs)
            }

            fn subtract(self, rhs: Self) -> Result<Self, ArithmeticError> {
                checked_sub(self, rhs)
            }

            fn multiply(self, rhs: Self) -> Result<Self, ArithmeticError> {
                checked_mul(self, rhs)
            }

            fn divide(self, rhs: Self) -> Result<Self, ArithmeticError> {
                checked_div(self, rhs)
            }

            fn negate(self) -> Result<Self, ArithmeticError> {
                CheckedNeg::checked_neg(&self).ok_or(ArithmeticError::Overflow)
            }
        }
    };
}

impl_fixed_integer!(i32, NumericKind::Int32);
impl_fixed_integer!(i64, NumericKind::Int64);

#[cfg(feature = "bigint")]
impl Numeric for BigInt {
    const KIND: NumericKind = NumericKind::BigInt;

    fn parse(lexeme: &str) -> Result<Self, NumberParseError> {
        parse_with(lexeme, Self::KIND)
    }

    fn add(self, rhs: Self) -> Result<Self, ArithmeticError> {
        Ok(self + rhs)
    }

    fn subtract(self, rhs: Self) -> Result<Self, ArithmeticError> {
        Ok(self - rhs)
    }

    fn multiply(self, rhs: Self) -> Result<Self, ArithmeticError> {
        Ok(self * rhs)
    }

    fn divide(self, rhs: Self) -> Result<Self, ArithmeticError> {
        checked_div(self, rhs)
    }

    fn negate(self) -> Result<Self, ArithmeticError> {
        Ok(-self)
    }
}

// A literal too large for the type parses to infinity rather than failing.
fn parse_finite<F>(lexeme: &str, kind: NumericKind) -> Result<F, NumberParseError>
where
    F: Float + FromStr,
    F::Err: fmt::Display,
{
    let value: F = parse_with(lexeme, kind)?;
    if !value.is_finite() {
        return Err(NumberParseError::new(lexeme, kind, "out of range"));
    }
    Ok(value)
}

macro_rules! impl_float {
    ($t:ty, $kind:expr) => {
        impl Numeric for $t {
            const KIND: NumericKind = $kind;

            fn parse(lexeme: &str) -> Result<Self, NumberParseError> {
                parse_finite(lexeme, Self::KIND)
            }

            fn add(self, rhs: Self) -> Result<Self, ArithmeticError> {
                Ok(self + rhs)
            }

            fn subtract(self, rhs: Self) -> Result<Self, ArithmeticError> {
                Ok(self - rhs)
            }

            fn multiply(self, rhs: Self) -> Result<Self, ArithmeticError> {
                Ok(self * rhs)
            }

            fn divide(self, rhs: Self) -> Result<Self, ArithmeticError> {
                Ok(self / rhs)
            }

            fn negate(self) -> Result<Self, ArithmeticError> {
                Ok(-self)
            }
        }
    };
}

impl_float!(f32, NumericKind::Float32);
impl_float!(f64, NumericKind::Float64);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integer_division_truncates_toward_zero() {
        assert_eq!(Numeric::divide(7i32, 2), Ok(3));
        assert_eq!(Numeric::divide(-7i32, 2), Ok(-3));
        assert_eq!(Numeric::divide(7i64, -2), Ok(-3));
    }

    #[test]
    fn integer_division_by_zero() {
        assert_eq!(
            Numeric::divide(1i32, 0),
            Err(ArithmeticError::DivisionByZero)
        );
        assert_eq!(
            Numeric::divide(0i64, 0),
            Err(ArithmeticError::DivisionByZero)
        );
    }

    #[test]
    fn fixed_width_overflow_is_reported() {
        assert_eq!(Numeric::add(i32::MAX, 1), Err(ArithmeticError::Overflow));
        assert_eq!(
            Numeric::subtract(i64::MIN, 1),
            Err(ArithmeticError::Overflow)
        );
        assert_eq!(
            Numeric::multiply(i32::MAX, 2),
            Err(ArithmeticError::Overflow)
        );
        assert_eq!(
            Numeric::divide(i32::MIN, -1),
            Err(ArithmeticError::Overflow)
        );
        assert_eq!(i64::MIN.negate(), Err(ArithmeticError::Overflow));
    }

    #[test]
    fn integer_kinds_reject_fractions() {
        let err = <i32 as Numeric>::parse("1.5").unwrap_err();
        assert_eq!(err.lexeme, "1.5");
        assert_eq!(err.kind, NumericKind::Int32);
        assert!(<i64 as Numeric>::parse("2.0").is_err());
    }

    #[test]
    fn parse_range_depends_on_kind() {
        assert!(<i32 as Numeric>::parse("2147483648").is_err());
        assert_eq!(<i64 as Numeric>::parse("2147483648"), Ok(2147483648));
        assert_eq!(<i32 as Numeric>::parse("007"), Ok(7));
    }

    #[test]
    fn float_literal_out_of_range() {
        let f32_max_exceeded = format!("1{}", "0".repeat(40));
        let err = <f32 as Numeric>::parse(&f32_max_exceeded).unwrap_err();
        assert_eq!(err.kind, NumericKind::Float32);
        assert_eq!(err.reason, "out of range");
        assert_eq!(<f64 as Numeric>::parse(&f32_max_exceeded), Ok(1e40));

        let f64_max_exceeded = format!("1{}", "0".repeat(400));
        assert!(<f64 as Numeric>::parse(&f64_max_exceeded).is_err());
    }

    #[test]
    fn float_division_by_zero_follows_ieee() {
        assert_eq!(Numeric::divide(1.0f64, 0.0), Ok(f64::INFINITY));
        assert_eq!(Numeric::divide(-1.0f32, 0.0), Ok(f32::NEG_INFINITY));
        assert!(Numeric::divide(0.0f64, 0.0).unwrap().is_nan());
    }

    #[cfg(feature = "bigint")]
    #[test]
    fn bigint_exceeds_fixed_width() {
        let big = <BigInt as Numeric>::parse("9223372036854775808").unwrap();
        let doubled = Numeric::multiply(big.clone(), BigInt::from(2)).unwrap();
        assert_eq!(doubled.render(), "18446744073709551616");
        assert_eq!(
            Numeric::divide(big, BigInt::from(0)),
            Err(ArithmeticError::DivisionByZero)
        );
        assert_eq!(
            Numeric::divide(BigInt::from(-7), BigInt::from(2)),
            Ok(BigInt::from(-3))
        );
    }

    #[test]
    fn kind_names_round_trip() {
        for kind in NumericKind::ALL {
            assert_eq!(kind.name().parse::<NumericKind>(), Ok(*kind));
        }
        assert_eq!(
            "u8".parse::<NumericKind>(),
            Err(UnknownKind("u8".to_string()))
        );
    }

    #[test]
    fn number_reports_its_kind() {
        assert_eq!(Number::Int64(3).kind(), NumericKind::Int64);
        assert_eq!(Number::Float64(3.5).to_string(), "3.5");
        assert!(!NumericKind::Float32.is_integer());
        assert!(NumericKind::Int32.is_integer());
    }
}
