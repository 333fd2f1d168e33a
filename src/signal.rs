// src/signal.rs

//! Shutdown signal plumbing.
//!
//! The process listens for exactly one signal (SIGTERM on unix, Ctrl-C
//! elsewhere) and turns it into a cancelled [`CancellationToken`]. The
//! dispatcher only looks at that token while waiting for its next event.

use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::errors::{Result, WatchhookError};

/// Install the shutdown listener and return the token it cancels.
///
/// Must be called from within a Tokio runtime.
#[cfg(unix)]
pub fn shutdown_token() -> Result<CancellationToken> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut term = signal(SignalKind::terminate()).map_err(WatchhookError::Signal)?;
    let token = CancellationToken::new();
    let trigger = token.clone();

    tokio::spawn(async move {
        if term.recv().await.is_some() {
            info!("SIGTERM received, requesting shutdown");
            trigger.cancel();
        }
    });

    Ok(token)
}

#[cfg(not(unix))]
pub fn shutdown_token() -> Result<CancellationToken> {
    let token = CancellationToken::new();
    let trigger = token.clone();

    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("Ctrl-C received, requesting shutdown");
                trigger.cancel();
            }
            Err(e) => tracing::error!(error = %e, "failed to listen for Ctrl-C"),
        }
    });

    Ok(token)
}
