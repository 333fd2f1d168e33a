// src/watch/notify_backend.rs

use std::path::Path;

use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::watch::subscription::{
    ChangeNotification, Operation, Subscription, SubscriptionChannels, SubscriptionError,
};

/// Subscription backed by the platform's recommended `notify` watcher.
///
/// The notify callback runs on notify's own thread and forwards everything
/// into two unbounded channels. Dropping the inner watcher (see
/// [`Subscription::close`]) drops the senders too, which ends both streams.
pub struct NotifySubscription {
    watcher: Option<RecommendedWatcher>,
}

impl std::fmt::Debug for NotifySubscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotifySubscription")
            .field("open", &self.watcher.is_some())
            .finish()
    }
}

impl NotifySubscription {
    pub fn new() -> Result<(Self, SubscriptionChannels), SubscriptionError> {
        let (notification_tx, notifications) = mpsc::unbounded_channel::<ChangeNotification>();
        let (error_tx, errors) = mpsc::unbounded_channel::<SubscriptionError>();

        let watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| match res {
                Ok(event) => {
                    for notification in notifications_from_event(event) {
                        // A closed receiver means the dispatcher is gone.
                        let _ = notification_tx.send(notification);
                    }
                }
                Err(err) => {
                    let _ = error_tx.send(SubscriptionError::from(err));
                }
            },
            Config::default(),
        )
        .map_err(|e| SubscriptionError::Init {
            reason: e.to_string(),
        })?;

        debug!("notify watcher created");

        Ok((
            Self {
                watcher: Some(watcher),
            },
            SubscriptionChannels {
                notifications,
                errors,
            },
        ))
    }
}

impl Subscription for NotifySubscription {
    fn register(&mut self, path: &Path) -> Result<(), SubscriptionError> {
        let watcher = self.watcher.as_mut().ok_or(SubscriptionError::Closed)?;
        watcher
            .watch(path, RecursiveMode::NonRecursive)
            .map_err(|e| SubscriptionError::Register {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })
    }

    fn close(&mut self) -> Result<(), SubscriptionError> {
        match self.watcher.take() {
            Some(watcher) => {
                drop(watcher);
                info!("filesystem watcher closed");
                Ok(())
            }
            None => Err(SubscriptionError::Closed),
        }
    }
}

/// One notification per path carried by the event.
fn notifications_from_event(event: Event) -> Vec<ChangeNotification> {
    let operation = Operation::from(&event.kind);
    event
        .paths
        .into_iter()
        .map(|path| ChangeNotification { path, operation })
        .collect()
}
