use strum::{Display, EnumIter};

use crate::errors::EvalError;
use crate::token::TokenType;

/// A binary operator the evaluator may split an expression on.
///
/// Operators are tried in declaration order, which is why the variant order of
/// the implementing enums matters.
pub trait BinaryOperator: Copy + std::fmt::Display {
    type Output;

    fn token_type(self) -> TokenType;

    fn apply(self, left: i64, right: i64, expression: &str) -> Result<Self::Output, EvalError>;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter, Display)]
pub enum ArithmeticOperator {
    #[strum(to_string = "+")]
    Plus,
    #[strum(to_string = "-")]
    Minus,
    #[strum(to_string = "*")]
    Asterisk,
    #[strum(to_string = "/")]
    Slash,
    #[strum(to_string = "%")]
    Percent,
}

impl BinaryOperator for ArithmeticOperator {
    type Output = i64;

    fn token_type(self) -> TokenType {
        match self {
            ArithmeticOperator::Plus => TokenType::Plus,
            ArithmeticOperator::Minus => TokenType::Minus,
            ArithmeticOperator::Asterisk => TokenType::Asterisk,
            ArithmeticOperator::Slash => TokenType::Slash,
            ArithmeticOperator::Percent => TokenType::Percent,
        }
    }

    fn apply(self, left: i64, right: i64, expression: &str) -> Result<i64, EvalError> {
        let result = match self {
            ArithmeticOperator::Plus => left.checked_add(right),
            ArithmeticOperator::Minus => left.checked_sub(right),
            ArithmeticOperator::Asterisk => left.checked_mul(right),
            ArithmeticOperator::Slash | ArithmeticOperator::Percent if right == 0 => {
                return Err(EvalError::DivisionByZero(expression.to_string()));
            }
            ArithmeticOperator::Slash => left.checked_div(right),
            ArithmeticOperator::Percent => left.checked_rem(right),
        };

        result.ok_or_else(|| EvalError::IntegerOverflow(expression.to_string()))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter, Display)]
pub enum ComparisonOperator {
    #[strum(to_string = "==")]
    IsEqual,
    #[strum(to_string = "!=")]
    NotEqual,
    #[strum(to_string = "<=")]
    LessThanEqual,
    #[strum(to_string = ">=")]
    GreaterThanEqual,
    #[strum(to_string = "<")]
    LessThan,
    #[strum(to_string = ">")]
    GreaterThan,
}

impl BinaryOperator for ComparisonOperator {
    type Output = bool;

    fn token_type(self) -> TokenType {
        match self {
            ComparisonOperator::IsEqual => TokenType::IsEqual,
            ComparisonOperator::NotEqual => TokenType::NotEqual,
            ComparisonOperator::LessThanEqual => TokenType::LessThanEqual,
            ComparisonOperator::GreaterThanEqual => TokenType::GreaterThanEqual,
            ComparisonOperator::LessThan => TokenType::LessThan,
            ComparisonOperator::GreaterThan => TokenType::GreaterThan,
        }
    }

    fn apply(self, left: i64, right: i64, _expression: &str) -> Result<bool, EvalError> {
        Ok(match self {
            ComparisonOperator::IsEqual => left == right,
            ComparisonOperator::NotEqual => left != right,
            ComparisonOperator::LessThanEqual => left <= right,
            ComparisonOperator::GreaterThanEqual => left >= right,
            ComparisonOperator::LessThan => left < right,
            ComparisonOperator::GreaterThan => left > right,
        })
    }
}

#[cfg(test)]
mod tests {
    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn priority_order_follows_declaration_order() {
        let arithmetic: Vec<String> =
            ArithmeticOperator::iter().map(|op| op.to_string()).collect();
        assert_eq!(arithmetic, ["+", "-", "*", "/", "%"]);

        let comparison: Vec<String> =
            ComparisonOperator::iter().map(|op| op.to_string()).collect();
        assert_eq!(comparison, ["==", "!=", "<=", ">=", "<", ">"]);
    }

    #[test]
    fn division_truncates_toward_zero() {
        assert_eq!(ArithmeticOperator::Slash.apply(-7, 2, "-7/2"), Ok(-3));
        assert_eq!(ArithmeticOperator::Percent.apply(-7, 2, "-7%2"), Ok(-1));
    }

    #[test]
    fn zero_divisor_is_rejected_for_both_division_operators() {
        assert_eq!(
            ArithmeticOperator::Slash.apply(1, 0, "1/0"),
            Err(EvalError::DivisionByZero("1/0".into()))
        );
        assert_eq!(
            ArithmeticOperator::Percent.apply(1, 0, "1%0"),
            Err(EvalError::DivisionByZero("1%0".into()))
        );
    }

    #[test]
    fn overflow_is_reported() {
        assert!(matches!(
            ArithmeticOperator::Asterisk.apply(i64::MAX, 2, "big"),
            Err(EvalError::IntegerOverflow(_))
        ));
    }
}
