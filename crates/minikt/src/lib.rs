pub mod builtins;
pub mod commands;
pub mod config;
pub mod environment;
pub mod errors;
pub mod expression;
pub mod interpreter;
pub mod logging;
pub mod operator;
pub mod parser;
pub mod primitive;
pub mod scanner;
pub mod statement;
pub mod std_lib;
pub mod token;

extern crate self as minikt;

#[doc(hidden)]
pub use inventory;

use std::sync::Arc;
use std::sync::atomic::AtomicBool;

use crate::{
    builtins::{BuiltinFunction, BuiltinRegistry},
    config::SessionConfig,
    environment::Environment,
    errors::EvalError,
    interpreter::{LoopGuard, Runtime},
    statement::{Command, StatementResult},
};

pub struct BuiltinRegistration {
    pub name: &'static str,
    pub description: &'static str,
    pub func: BuiltinFunction,
}

inventory::collect!(BuiltinRegistration);

#[macro_export]
macro_rules! submit_builtin {
    ($name:expr, $description:expr, $func:path) => {
        $crate::inventory::submit!($crate::BuiltinRegistration {
            name: $name,
            description: $description,
            func: $func,
        });
    };
}

pub fn register_builtins(registry: &mut BuiltinRegistry) {
    for registration in inventory::iter::<BuiltinRegistration> {
        registry.register(registration.name, registration.description, registration.func);
    }
}

/// What a successfully executed line produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Output {
    /// Lines printed by `print` statements and builtin calls, in order.
    Printed(Vec<String>),
    Command(Command),
}

/// One interpreter session: its variables, builtins and loop bounds.
///
/// Sessions share nothing, so independent sessions may run on separate threads.
pub struct Session {
    environment: Environment,
    builtins: BuiltinRegistry,
    guard: LoopGuard,
}

impl Session {
    pub fn new(config: &SessionConfig) -> Self {
        Self::with_builtins(config, BuiltinRegistry::with_registered())
    }

    pub fn with_builtins(config: &SessionConfig, builtins: BuiltinRegistry) -> Self {
        Self {
            environment: Environment::new(),
            builtins,
            guard: LoopGuard::new(config.max_loop_iterations),
        }
    }

    pub fn environment(&self) -> &Environment {
        &self.environment
    }

    pub fn builtins(&self) -> &BuiltinRegistry {
        &self.builtins
    }

    /// Raising this flag stops the running loop with `EvalError::Interrupted`.
    ///
    /// The flag is cleared whenever a new line starts, so raising it while no
    /// line is executing has no effect on later lines.
    pub fn interrupt_handle(&self) -> Arc<AtomicBool> {
        self.guard.interrupt_handle()
    }

    pub fn reset(&mut self) {
        self.environment.clear();
    }

    /// Executes one line and collects everything it printed.
    ///
    /// On error the lines printed before the failure are dropped; use
    /// [`Session::execute_line_with`] to see them as they are produced.
    pub fn execute_line(&mut self, line: &str) -> Result<Option<Output>, EvalError> {
        let mut printed = vec![];
        let command = self.execute_line_with(line, &mut |text| printed.push(text))?;

        Ok(match command {
            Some(command) => Some(Output::Command(command)),
            None if printed.is_empty() => None,
            None => Some(Output::Printed(printed)),
        })
    }

    /// Executes one line, handing every printed line to `emit` immediately.
    pub fn execute_line_with(
        &mut self,
        line: &str,
        emit: &mut dyn FnMut(String),
    ) -> Result<Option<Command>, EvalError> {
        tracing::debug!(line, "executing");
        self.guard.clear_interrupt();

        let mut runtime = Runtime::new(&self.builtins, &self.guard, emit);
        let result = parser::parse_line(line)
            .and_then(|statement| statement.execute(&mut self.environment, &mut runtime));

        match result {
            Ok(StatementResult::None) => Ok(None),
            Ok(StatementResult::Command(command)) => Ok(Some(command)),
            Err(error) => {
                tracing::warn!(line, %error, "line failed");
                Err(error)
            }
        }
    }
}
