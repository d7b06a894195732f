use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::builtins::BuiltinRegistry;
use crate::errors::EvalError;

/// Bounds `while` loops on behalf of the embedding program.
///
/// Without a cap a loop whose condition never turns false runs forever; the
/// interrupt flag lets another thread stop it instead.
#[derive(Debug, Default)]
pub struct LoopGuard {
    max_iterations: Option<u64>,
    interrupt: Arc<AtomicBool>,
}

impl LoopGuard {
    pub fn new(max_iterations: Option<u64>) -> Self {
        Self {
            max_iterations,
            interrupt: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn interrupt_handle(&self) -> Arc<AtomicBool> {
        self.interrupt.clone()
    }

    /// Drops an interrupt raised while no loop was running.
    pub fn clear_interrupt(&self) {
        self.interrupt.store(false, Ordering::SeqCst);
    }

    /// Called before running iteration number `completed + 1`.
    pub fn check(&self, completed: u64) -> Result<(), EvalError> {
        if self.interrupt.swap(false, Ordering::SeqCst) {
            return Err(EvalError::Interrupted);
        }

        match self.max_iterations {
            Some(max) if completed >= max => Err(EvalError::IterationLimitExceeded(max)),
            _ => Ok(()),
        }
    }
}

/// Everything a statement needs besides the environment.
pub struct Runtime<'a> {
    pub builtins: &'a BuiltinRegistry,
    pub guard: &'a LoopGuard,
    emit: &'a mut dyn FnMut(String),
}

impl<'a> Runtime<'a> {
    pub fn new(
        builtins: &'a BuiltinRegistry,
        guard: &'a LoopGuard,
        emit: &'a mut dyn FnMut(String),
    ) -> Self {
        Self {
            builtins,
            guard,
            emit,
        }
    }

    pub fn emit(&mut self, line: String) {
        (self.emit)(line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unbounded_guard_never_trips() {
        let guard = LoopGuard::new(None);
        assert_eq!(guard.check(u64::MAX - 1), Ok(()));
    }

    #[test]
    fn cap_trips_once_reached() {
        let guard = LoopGuard::new(Some(3));
        assert_eq!(guard.check(2), Ok(()));
        assert_eq!(guard.check(3), Err(EvalError::IterationLimitExceeded(3)));
    }

    #[test]
    fn interrupt_is_consumed_when_observed() {
        let guard = LoopGuard::new(None);
        guard.interrupt_handle().store(true, Ordering::SeqCst);
        assert_eq!(guard.check(0), Err(EvalError::Interrupted));
        assert_eq!(guard.check(1), Ok(()));
    }

    #[test]
    fn cleared_interrupt_is_not_observed() {
        let guard = LoopGuard::new(None);
        guard.interrupt_handle().store(true, Ordering::SeqCst);
        guard.clear_interrupt();
        assert_eq!(guard.check(0), Ok(()));
    }
}
