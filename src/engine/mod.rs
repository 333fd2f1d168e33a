// src/engine/mod.rs

//! Dispatch engine for watchhook.
//!
//! The dispatcher multiplexes three sources onto one loop:
//! - change notifications from the subscription
//! - subscription errors
//! - the shutdown request
//!
//! The pure core state machine lives in [`core`]; the async/IO shell that
//! owns the subscription, waits on the sources and runs actions is
//! implemented in [`runtime`].

use crate::watch::{ChangeNotification, SubscriptionError};

/// Events flowing into the dispatch core.
#[derive(Debug, Clone)]
pub enum DispatchEvent {
    /// Something changed under a registered path.
    Changed(ChangeNotification),
    /// The subscription reported an error while running.
    SubscriptionFailed(SubscriptionError),
    /// Graceful shutdown requested (SIGTERM).
    ShutdownRequested,
}

/// Lifecycle of the dispatch loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    /// Registering rule paths with the subscription.
    Starting,
    /// Waiting on events and handling them one at a time.
    Running,
    /// Shutdown acknowledged; leaving the loop.
    Draining,
    /// Loop exited and subscription handed back for closing.
    Stopped,
}

pub mod core;
pub mod runtime;

pub use self::core::{CoreCommand, CoreStep, DispatchCore};
pub use runtime::Dispatcher;
