// src/watch/subscription.rs

use std::path::{Path, PathBuf};

use bitflags::bitflags;
use notify::event::{EventKind, ModifyKind};
use thiserror::Error;
use tokio::sync::mpsc;

bitflags! {
    /// Kind of change reported for a path. The primitive may combine kinds.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Operation: u8 {
        const CREATE = 1;
        const WRITE = 1 << 1;
        const REMOVE = 1 << 2;
        const RENAME = 1 << 3;
        const OTHER = 1 << 4;
    }
}

impl Operation {
    /// Only creations and writes trigger actions.
    pub fn is_relevant(self) -> bool {
        self.intersects(Operation::CREATE | Operation::WRITE)
    }
}

impl From<&EventKind> for Operation {
    fn from(kind: &EventKind) -> Self {
        match kind {
            EventKind::Create(_) => Operation::CREATE,
            EventKind::Modify(ModifyKind::Name(_)) => Operation::RENAME,
            EventKind::Modify(ModifyKind::Metadata(_)) => Operation::OTHER,
            EventKind::Modify(_) => Operation::WRITE,
            EventKind::Remove(_) => Operation::REMOVE,
            _ => Operation::OTHER,
        }
    }
}

/// A single change seen by the subscription.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeNotification {
    pub path: PathBuf,
    pub operation: Operation,
}

impl ChangeNotification {
    pub fn new(path: impl Into<PathBuf>, operation: Operation) -> Self {
        Self {
            path: path.into(),
            operation,
        }
    }
}

/// Errors raised by a subscription, either while setting it up or while it
/// is running.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SubscriptionError {
    #[error("{reason}")]
    Init { reason: String },

    #[error("{reason}")]
    Register { path: PathBuf, reason: String },

    #[error("{details}")]
    Watch { details: String },

    #[error("subscription already closed")]
    Closed,
}

impl From<notify::Error> for SubscriptionError {
    fn from(e: notify::Error) -> Self {
        SubscriptionError::Watch {
            details: e.to_string(),
        }
    }
}

/// Receiving ends of a subscription's two event streams.
///
/// For [`super::NotifySubscription`] both streams end once the subscription
/// is closed.
#[derive(Debug)]
pub struct SubscriptionChannels {
    pub notifications: mpsc::UnboundedReceiver<ChangeNotification>,
    pub errors: mpsc::UnboundedReceiver<SubscriptionError>,
}

/// Control side of a filesystem subscription.
pub trait Subscription: Send {
    /// Start receiving notifications for `path`.
    fn register(&mut self, path: &Path) -> Result<(), SubscriptionError>;

    /// Release the OS resources behind the subscription.
    fn close(&mut self) -> Result<(), SubscriptionError>;
}
