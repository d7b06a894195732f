use thiserror::Error;

/// Every way a single line can fail. None of them end the session.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EvalError {
    #[error("Invalid variable name: '{0}'")]
    InvalidName(String),
    #[error("Variable '{0}' does not exist.")]
    UndefinedVariable(String),
    #[error("Type mismatch: expected {expected}, found {found} in '{operand}'")]
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
        operand: String,
    },
    #[error("Invalid operand: {0}")]
    InvalidOperand(String),
    #[error("Unsupported expression: {0}")]
    UnsupportedExpression(String),
    #[error("Cannot divide by zero: {0}")]
    DivisionByZero(String),
    #[error("Integer overflow: {0}")]
    IntegerOverflow(String),
    #[error("Syntax error: {0}")]
    SyntaxError(String),
    #[error("Unknown function: {0}")]
    UnknownFunction(String),
    #[error("Function '{name}' expects {expected} argument(s), got {found}")]
    ArityMismatch {
        name: String,
        expected: usize,
        found: usize,
    },
    #[error("Unknown command: {0}")]
    UnknownCommand(String),
    #[error("Loop stopped after {0} iterations")]
    IterationLimitExceeded(u64),
    #[error("Execution interrupted")]
    Interrupted,
}

impl EvalError {
    pub fn syntax(message: impl Into<String>) -> Self {
        EvalError::SyntaxError(message.into())
    }
}
