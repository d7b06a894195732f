use std::sync::LazyLock;

use regex::Regex;
use strum::IntoEnumIterator;

use crate::environment::Environment;
use crate::errors::EvalError;
use crate::operator::{ArithmeticOperator, BinaryOperator, ComparisonOperator};
use crate::primitive::Primitive;
use crate::scanner;
use crate::token::{Token, TokenType};

static INTEGER_LITERAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^-?[0-9]+$").expect("integer pattern is valid"));
static TEXT_LITERAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"^"(.*)"$"#).expect("text pattern is valid"));

pub fn is_integer_literal(text: &str) -> bool {
    INTEGER_LITERAL.is_match(text)
}

/// Evaluates `left OP right` over `+ - * / %`.
///
/// The first operator in priority order that occurs exactly once, with tokens
/// on both sides, is the split point. There is no precedence: `1+2*3` splits
/// on `+` and then fails on the operand `2*3`.
pub fn eval_arith(text: &str, environment: &Environment) -> Result<i64, EvalError> {
    evaluate_split::<ArithmeticOperator>(text, environment)
}

/// Evaluates `left OP right` over `== != <= >= < >`.
pub fn eval_compare(text: &str, environment: &Environment) -> Result<bool, EvalError> {
    evaluate_split::<ComparisonOperator>(text, environment)
}

/// Turns the right-hand side of an assignment (or a print argument) into a value.
///
/// Integer literals and double-quoted text are taken as-is; anything else must
/// be an arithmetic expression.
pub fn resolve_expression(text: &str, environment: &Environment) -> Result<Primitive, EvalError> {
    let text = text.trim();

    if is_integer_literal(text) {
        return parse_integer(text).map(Primitive::Integer);
    }

    if let Some(captures) = TEXT_LITERAL.captures(text) {
        return Ok(Primitive::Text(captures[1].to_string()));
    }

    eval_arith(text, environment).map(Primitive::Integer)
}

/// Resolves a single operand: a variable holding an integer, or an integer literal.
pub fn resolve_operand(text: &str, environment: &Environment) -> Result<i64, EvalError> {
    let tokens = scanner::scan(text);
    resolve_tokens(&tokens, text, environment)
}

fn evaluate_split<O>(text: &str, environment: &Environment) -> Result<O::Output, EvalError>
where
    O: BinaryOperator + IntoEnumIterator,
{
    let tokens = scanner::scan(text);

    for operator in O::iter() {
        let Some(position) = split_point(&tokens, &operator.token_type()) else {
            continue;
        };

        let left = resolve_tokens(&tokens[..position], text, environment)?;
        let right = resolve_tokens(&tokens[position + 1..], text, environment)?;
        tracing::trace!(%operator, left, right, "applying operator");
        return operator.apply(left, right, text.trim());
    }

    Err(EvalError::UnsupportedExpression(text.trim().to_string()))
}

fn split_point(tokens: &[Token], operator: &TokenType) -> Option<usize> {
    let mut positions = tokens
        .iter()
        .enumerate()
        .filter(|(_, token)| &token.token_type == operator)
        .map(|(position, _)| position);

    let position = positions.next()?;
    if positions.next().is_some() {
        return None;
    }

    (position > 0 && position + 1 < tokens.len()).then_some(position)
}

fn resolve_tokens(
    tokens: &[Token],
    text: &str,
    environment: &Environment,
) -> Result<i64, EvalError> {
    match tokens {
        [
            Token {
                token_type: TokenType::Identifier(name),
                ..
            },
        ] => {
            let value = environment.get(name)?;
            value.as_integer().ok_or_else(|| EvalError::TypeMismatch {
                expected: "integer",
                found: value.type_name(),
                operand: name.clone(),
            })
        }
        [
            Token {
                token_type: TokenType::Integer(digits),
                ..
            },
        ] => parse_integer(digits),
        [
            Token {
                token_type: TokenType::Minus,
                span: sign,
            },
            Token {
                token_type: TokenType::Integer(digits),
                span: number,
            },
        ] if sign.end_byte == number.start_byte => parse_integer(&format!("-{}", digits)),
        _ => Err(EvalError::InvalidOperand(operand_text(tokens, text))),
    }
}

fn parse_integer(literal: &str) -> Result<i64, EvalError> {
    literal
        .parse::<i64>()
        .map_err(|_| EvalError::InvalidOperand(literal.to_string()))
}

fn operand_text(tokens: &[Token], text: &str) -> String {
    match (tokens.first(), tokens.last()) {
        (Some(first), Some(last)) => text[first.span.start_byte..last.span.end_byte].to_string(),
        _ => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn environment_with(bindings: &[(&str, Primitive)]) -> Environment {
        let mut environment = Environment::new();
        for (name, value) in bindings {
            environment.declare_or_set(name, value.clone()).unwrap();
        }
        environment
    }

    #[test]
    fn evaluates_basic_arithmetic() {
        let environment = Environment::new();
        assert_eq!(eval_arith("3+4", &environment), Ok(7));
        assert_eq!(eval_arith("10 - 4", &environment), Ok(6));
        assert_eq!(eval_arith("6*7", &environment), Ok(42));
        assert_eq!(eval_arith("7/2", &environment), Ok(3));
        assert_eq!(eval_arith("7 % 3", &environment), Ok(1));
        assert_eq!(eval_arith("-5+3", &environment), Ok(-2));
        assert_eq!(eval_arith("5*-2", &environment), Err(EvalError::InvalidOperand("5*".into())));
    }

    #[test]
    fn rejects_zero_divisors() {
        let environment = Environment::new();
        assert_eq!(
            eval_arith("10/0", &environment),
            Err(EvalError::DivisionByZero("10/0".into()))
        );
        assert_eq!(
            eval_arith("7%0", &environment),
            Err(EvalError::DivisionByZero("7%0".into()))
        );
    }

    #[test]
    fn splits_on_first_operator_in_priority_order() {
        let environment = Environment::new();
        assert_eq!(
            eval_arith("1+2*3", &environment),
            Err(EvalError::InvalidOperand("2*3".into()))
        );
        assert_eq!(
            eval_arith("2*3-1", &environment),
            Err(EvalError::InvalidOperand("2*3".into()))
        );
    }

    #[test]
    fn chained_expressions_are_unsupported() {
        let environment = Environment::new();
        assert_eq!(
            eval_arith("1+2+3", &environment),
            Err(EvalError::UnsupportedExpression("1+2+3".into()))
        );
        assert_eq!(
            eval_arith("42", &environment),
            Err(EvalError::UnsupportedExpression("42".into()))
        );
        assert_eq!(
            eval_arith("+3", &environment),
            Err(EvalError::UnsupportedExpression("+3".into()))
        );
    }

    #[test]
    fn resolves_variables_in_operands() {
        let environment = environment_with(&[
            ("x", Primitive::Integer(9)),
            ("s", Primitive::Text("hi".into())),
        ]);
        assert_eq!(eval_arith("x + 1", &environment), Ok(10));
        assert_eq!(
            eval_arith("s + 1", &environment),
            Err(EvalError::TypeMismatch {
                expected: "integer",
                found: "text",
                operand: "s".into(),
            })
        );
        assert_eq!(
            eval_arith("y + 1", &environment),
            Err(EvalError::UndefinedVariable("y".into()))
        );
        assert_eq!(
            eval_arith("x + 1a", &environment),
            Err(EvalError::InvalidOperand("1a".into()))
        );
    }

    #[test]
    fn evaluates_comparisons() {
        let environment = environment_with(&[("x", Primitive::Integer(3))]);
        assert_eq!(eval_compare("5<=5", &environment), Ok(true));
        assert_eq!(eval_compare("5>=6", &environment), Ok(false));
        assert_eq!(eval_compare("x == 3", &environment), Ok(true));
        assert_eq!(eval_compare("x != 3", &environment), Ok(false));
        assert_eq!(eval_compare("x < 10", &environment), Ok(true));
        assert_eq!(eval_compare("x > -1", &environment), Ok(true));
    }

    #[test]
    fn comparison_reports_undefined_and_text_operands() {
        let environment = environment_with(&[("s", Primitive::Text("a".into()))]);
        assert_eq!(
            eval_compare("x<10", &environment),
            Err(EvalError::UndefinedVariable("x".into()))
        );
        assert!(matches!(
            eval_compare("s == 1", &environment),
            Err(EvalError::TypeMismatch { .. })
        ));
        assert_eq!(
            eval_compare("x = 1", &environment),
            Err(EvalError::UnsupportedExpression("x = 1".into()))
        );
    }

    #[test]
    fn resolves_literals_before_arithmetic() {
        let environment = Environment::new();
        assert_eq!(resolve_expression("-12", &environment), Ok(Primitive::Integer(-12)));
        assert_eq!(
            resolve_expression("\"1+2\"", &environment),
            Ok(Primitive::Text("1+2".into()))
        );
        assert_eq!(
            resolve_expression("\"\"", &environment),
            Ok(Primitive::Text(String::new()))
        );
        assert_eq!(resolve_expression(" 2 * 8 ", &environment), Ok(Primitive::Integer(16)));
        assert!(matches!(
            resolve_expression("99999999999999999999", &environment),
            Err(EvalError::InvalidOperand(_))
        ));
    }

    #[test]
    fn sign_must_touch_the_digits() {
        let environment = Environment::new();
        assert_eq!(
            resolve_operand("- 5", &environment),
            Err(EvalError::InvalidOperand("- 5".into()))
        );
        assert_eq!(resolve_operand("-5", &environment), Ok(-5));
    }
}
