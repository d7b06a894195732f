use std::collections::BTreeMap;

use crate::errors::EvalError;
use crate::primitive::Primitive;
use crate::std_lib::{BuiltinError, BuiltinResult};

pub type BuiltinFunction = fn(Vec<i64>) -> BuiltinResult;

#[derive(Clone, Copy)]
pub struct BuiltinEntry {
    pub description: &'static str,
    pub func: BuiltinFunction,
}

/// Named numeric utilities callable from script text as `name(args)`.
#[derive(Clone, Default)]
pub struct BuiltinRegistry {
    functions: BTreeMap<String, BuiltinEntry>,
}

impl BuiltinRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding every function submitted with `#[builtin]`.
    pub fn with_registered() -> Self {
        let mut registry = Self::new();
        crate::register_builtins(&mut registry);
        registry
    }

    pub fn register(&mut self, name: &str, description: &'static str, func: BuiltinFunction) {
        if self
            .functions
            .insert(name.to_string(), BuiltinEntry { description, func })
            .is_some()
        {
            tracing::warn!(name, "builtin registered twice; keeping the latest");
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.functions.contains_key(name)
    }

    /// Registered names with their descriptions, sorted by name.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &'static str)> {
        self.functions
            .iter()
            .map(|(name, entry)| (name.as_str(), entry.description))
    }

    pub fn call(&self, name: &str, args: &[i64]) -> Result<Primitive, EvalError> {
        let entry = self
            .functions
            .get(name)
            .ok_or_else(|| EvalError::UnknownFunction(name.to_string()))?;

        (entry.func)(args.to_vec()).map_err(|error| match error {
            BuiltinError::Arity { expected, found } => EvalError::ArityMismatch {
                name: name.to_string(),
                expected,
                found,
            },
            BuiltinError::Overflow => EvalError::IntegerOverflow(format!(
                "{}({})",
                name,
                args.iter()
                    .map(i64::to_string)
                    .collect::<Vec<_>>()
                    .join(", ")
            )),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn double(arguments: Vec<i64>) -> BuiltinResult {
        let value = arguments.first().copied().unwrap_or_default();
        Ok(Primitive::Integer(value * 2))
    }

    #[test]
    fn collects_annotated_functions() {
        let registry = BuiltinRegistry::with_registered();
        for name in [
            "sumOfNumbers",
            "factorial",
            "gcd",
            "reverse",
            "primeChecker",
            "palindromeChecker",
            "largestDigit",
            "sumOfDigits",
            "multiplicationTable",
            "fibonacciPos",
        ] {
            assert!(registry.contains(name), "missing builtin {}", name);
        }
    }

    #[test]
    fn calls_by_name() {
        let mut registry = BuiltinRegistry::new();
        registry.register("double", "Doubles a number.", double);
        assert_eq!(registry.call("double", &[21]), Ok(Primitive::Integer(42)));
        assert_eq!(
            registry.entries().collect::<Vec<_>>(),
            vec![("double", "Doubles a number.")]
        );
    }

    #[test]
    fn reports_unknown_names_and_arity() {
        let registry = BuiltinRegistry::with_registered();
        assert_eq!(
            registry.call("frobnicate", &[3]),
            Err(EvalError::UnknownFunction("frobnicate".into()))
        );
        assert_eq!(
            registry.call("gcd", &[3]),
            Err(EvalError::ArityMismatch {
                name: "gcd".into(),
                expected: 2,
                found: 1,
            })
        );
        assert_eq!(
            registry.call("factorial", &[25]),
            Err(EvalError::IntegerOverflow("factorial(25)".into()))
        );
    }
}
