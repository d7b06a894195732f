use std::fmt;

use crate::environment::Environment;
use crate::errors::EvalError;
use crate::expression::{eval_compare, resolve_expression, resolve_operand};
use crate::interpreter::Runtime;
use crate::parser;

/// Session-level commands the surrounding program acts on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    List,
    Help,
    Methods,
    Exit,
}

#[derive(Debug, PartialEq, Eq)]
pub enum StatementResult {
    None,
    Command(Command),
}

pub trait Statement: fmt::Debug {
    fn execute(
        &self,
        environment: &mut Environment,
        runtime: &mut Runtime<'_>,
    ) -> Result<StatementResult, EvalError>;
}

#[derive(Debug)]
pub struct EmptyStatement;

impl Statement for EmptyStatement {
    fn execute(
        &self,
        _environment: &mut Environment,
        _runtime: &mut Runtime<'_>,
    ) -> Result<StatementResult, EvalError> {
        Ok(StatementResult::None)
    }
}

/// Both `var name = expr` and `name = expr`; either one creates the name when
/// it is not bound yet.
#[derive(Debug)]
pub struct AssignmentStatement {
    identifier: String,
    expression: String,
}

impl AssignmentStatement {
    pub fn new(identifier: String, expression: String) -> Self {
        Self {
            identifier,
            expression,
        }
    }
}

impl Statement for AssignmentStatement {
    fn execute(
        &self,
        environment: &mut Environment,
        _runtime: &mut Runtime<'_>,
    ) -> Result<StatementResult, EvalError> {
        let value = resolve_expression(&self.expression, environment)?;
        tracing::debug!(identifier = %self.identifier, %value, "assigning");
        environment.declare_or_set(&self.identifier, value)?;
        Ok(StatementResult::None)
    }
}

#[derive(Debug)]
pub struct PrintStatement {
    argument: String,
}

impl PrintStatement {
    pub fn new(argument: String) -> Self {
        Self { argument }
    }
}

impl Statement for PrintStatement {
    fn execute(
        &self,
        environment: &mut Environment,
        runtime: &mut Runtime<'_>,
    ) -> Result<StatementResult, EvalError> {
        let value = if environment.has(&self.argument) {
            environment.get(&self.argument)?
        } else {
            resolve_expression(&self.argument, environment)?
        };
        runtime.emit(value.to_string());
        Ok(StatementResult::None)
    }
}

/// `if(cond){ body } else clause`.
///
/// Each branch is a single statement kept as text and dispatched only when
/// taken, so a malformed branch that is never selected is never reported.
#[derive(Debug)]
pub struct IfStatement {
    condition: String,
    then_body: String,
    else_body: Option<String>,
}

impl IfStatement {
    pub fn new(condition: String, then_body: String, else_body: Option<String>) -> Self {
        Self {
            condition,
            then_body,
            else_body,
        }
    }
}

impl Statement for IfStatement {
    fn execute(
        &self,
        environment: &mut Environment,
        runtime: &mut Runtime<'_>,
    ) -> Result<StatementResult, EvalError> {
        let branch = if eval_compare(&self.condition, environment)? {
            Some(&self.then_body)
        } else {
            self.else_body.as_ref()
        };

        match branch {
            Some(body) => parser::parse_line(body)?.execute(environment, runtime),
            None => Ok(StatementResult::None),
        }
    }
}

/// `while(cond){ step; step; ... }`.
///
/// The condition text is re-evaluated against the current environment before
/// every iteration. Steps are prints or assignments.
#[derive(Debug)]
pub struct WhileStatement {
    condition: String,
    body: String,
}

impl WhileStatement {
    pub fn new(condition: String, body: String) -> Self {
        Self { condition, body }
    }
}

impl Statement for WhileStatement {
    fn execute(
        &self,
        environment: &mut Environment,
        runtime: &mut Runtime<'_>,
    ) -> Result<StatementResult, EvalError> {
        let mut steps: Option<Vec<Box<dyn Statement>>> = None;
        let mut completed: u64 = 0;

        while eval_compare(&self.condition, environment)? {
            runtime.guard.check(completed)?;
            tracing::trace!(
                condition = %self.condition,
                iteration = completed + 1,
                "loop iteration"
            );

            if steps.is_none() {
                steps = Some(parser::parse_loop_body(&self.body)?);
            }
            for step in steps.iter().flatten() {
                step.execute(environment, runtime)?;
            }

            completed += 1;
        }

        tracing::debug!(condition = %self.condition, iterations = completed, "loop finished");
        Ok(StatementResult::None)
    }
}

#[derive(Debug)]
pub struct BuiltinCallStatement {
    name: String,
    arguments: Vec<String>,
}

impl BuiltinCallStatement {
    pub fn new(name: String, arguments: Vec<String>) -> Self {
        Self { name, arguments }
    }
}

impl Statement for BuiltinCallStatement {
    fn execute(
        &self,
        environment: &mut Environment,
        runtime: &mut Runtime<'_>,
    ) -> Result<StatementResult, EvalError> {
        let arguments = self
            .arguments
            .iter()
            .map(|argument| resolve_operand(argument, environment))
            .collect::<Result<Vec<_>, _>>()?;

        let result = runtime.builtins.call(&self.name, &arguments)?;
        runtime.emit(result.to_string());
        Ok(StatementResult::None)
    }
}

#[derive(Debug)]
pub struct CommandStatement {
    command: Command,
}

impl CommandStatement {
    pub fn new(command: Command) -> Self {
        Self { command }
    }
}

impl Statement for CommandStatement {
    fn execute(
        &self,
        _environment: &mut Environment,
        _runtime: &mut Runtime<'_>,
    ) -> Result<StatementResult, EvalError> {
        Ok(StatementResult::Command(self.command))
    }
}
