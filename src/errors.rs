// src/errors.rs

//! Crate-wide error type for the startup path.
//!
//! Only these errors may terminate the process. Per-rule, per-event and
//! per-action failures never surface here; the dispatcher reports them and
//! keeps going.

use std::path::PathBuf;

use thiserror::Error;

use crate::watch::SubscriptionError;

#[derive(Error, Debug)]
pub enum WatchhookError {
    #[error("could not open config file {path:?}, got: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not parse config file at {path:?}, got: {reason}")]
    ConfigParse { path: PathBuf, reason: String },

    #[error("could not create a filesystem watcher, got: {0}")]
    Subscription(#[from] SubscriptionError),

    #[error("could not listen for the shutdown signal, got: {0}")]
    Signal(#[source] std::io::Error),
}

pub type Result<T> = std::result::Result<T, WatchhookError>;
