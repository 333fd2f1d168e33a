// src/exec/backend.rs

//! Pluggable action executor abstraction.
//!
//! The dispatcher talks to an `ActionExecutor` instead of spawning processes
//! itself. Production uses [`ProcessExecutor`]; tests provide their own
//! implementation that records commands and simulates outcomes.

use std::future::Future;
use std::pin::Pin;

use super::command::{run_action, ActionError};

/// Combined stdout/stderr bytes of a finished action.
pub type ActionOutput = Vec<u8>;

/// Trait abstracting how a single action command is executed.
///
/// The returned future resolves once the action has finished. The dispatcher
/// awaits it before handling anything else.
pub trait ActionExecutor: Send {
    fn execute<'a>(
        &'a mut self,
        command: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<ActionOutput, ActionError>> + Send + 'a>>;
}

/// Executor that runs each action as a child process.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessExecutor;

impl ProcessExecutor {
    pub fn new() -> Self {
        Self
    }
}

impl ActionExecutor for ProcessExecutor {
    fn execute<'a>(
        &'a mut self,
        command: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<ActionOutput, ActionError>> + Send + 'a>> {
        Box::pin(run_action(command))
    }
}
