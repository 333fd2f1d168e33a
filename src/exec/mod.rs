// src/exec/mod.rs

//! Action execution layer.
//!
//! - [`command`] spawns a single action with `tokio::process::Command` and
//!   captures stdout and stderr as one interleaved byte stream.
//! - [`backend`] provides the `ActionExecutor` trait and the
//!   `ProcessExecutor` the dispatcher uses in production, which tests can
//!   replace with a fake implementation.

pub mod backend;
pub mod command;

pub use backend::{ActionExecutor, ActionOutput, ProcessExecutor};
pub use command::{run_action, ActionError};
