use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;

use crate::errors::EvalError;
use crate::primitive::Primitive;

static IDENTIFIER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("identifier pattern is valid")
});

pub fn is_valid_identifier(name: &str) -> bool {
    IDENTIFIER.is_match(name)
}

/// Variable bindings for one session.
///
/// Bindings keep the position of their first declaration so listings come out
/// in the order the script introduced them.
#[derive(Debug, Default)]
pub struct Environment {
    values: Vec<(String, Primitive)>,
    index: HashMap<String, usize>,
}

impl Environment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn declare_or_set(&mut self, name: &str, value: Primitive) -> Result<(), EvalError> {
        if !is_valid_identifier(name) {
            return Err(EvalError::InvalidName(name.to_string()));
        }

        match self.index.get(name) {
            Some(&slot) => self.values[slot].1 = value,
            None => {
                self.index.insert(name.to_string(), self.values.len());
                self.values.push((name.to_string(), value));
            }
        }

        Ok(())
    }

    pub fn get(&self, name: &str) -> Result<Primitive, EvalError> {
        self.lookup(name)
            .cloned()
            .ok_or_else(|| EvalError::UndefinedVariable(name.to_string()))
    }

    pub fn has(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn snapshot(&self) -> Vec<(String, Primitive)> {
        self.values.clone()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn clear(&mut self) {
        self.values.clear();
        self.index.clear();
    }

    fn lookup(&self, name: &str) -> Option<&Primitive> {
        self.index.get(name).map(|&slot| &self.values[slot].1)
    }
}
