pub mod number;

use thiserror::Error;

use crate::primitive::Primitive;

pub type BuiltinResult = Result<Primitive, BuiltinError>;

/// Failures a builtin reports about itself. The registry attaches the name.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BuiltinError {
    #[error("expected {expected} argument(s), got {found}")]
    Arity { expected: usize, found: usize },
    #[error("result does not fit in an integer")]
    Overflow,
}

/// Destructures the argument vector of a builtin, returning an arity error from
/// the enclosing function when the count does not match.
macro_rules! args {
    ($args:expr; $($name:ident),+ $(,)?) => {{
        let arguments: Vec<i64> = $args;
        let expected = [$(stringify!($name)),+].len();
        if arguments.len() != expected {
            return Err($crate::std_lib::BuiltinError::Arity {
                expected,
                found: arguments.len(),
            });
        }

        let mut iter = arguments.into_iter();
        ($({
            let $name = iter.next().unwrap_or_default();
            $name
        }),+)
    }};
}

pub(crate) use args;

pub(crate) fn checked(value: Option<i64>) -> Result<i64, BuiltinError> {
    value.ok_or(BuiltinError::Overflow)
}
