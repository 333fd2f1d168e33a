// src/watch/mock.rs

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use tokio::sync::mpsc;

use super::subscription::{
    ChangeNotification, Operation, Subscription, SubscriptionChannels, SubscriptionError,
};

#[derive(Debug, Default)]
struct MockState {
    registered: Vec<PathBuf>,
    failing: HashSet<PathBuf>,
    close_calls: usize,
}

/// In-memory subscription for tests.
///
/// Registration is recorded rather than performed; paths added with
/// [`MockSubscription::fail_registration_for`] are rejected. Events are
/// injected through the paired [`MockSubscriptionHandle`].
#[derive(Debug)]
pub struct MockSubscription {
    state: Arc<Mutex<MockState>>,
    senders: Option<Senders>,
}

#[derive(Debug, Clone)]
struct Senders {
    notifications: mpsc::UnboundedSender<ChangeNotification>,
    errors: mpsc::UnboundedSender<SubscriptionError>,
}

/// Test-side view of a [`MockSubscription`]: injects events and inspects
/// what the dispatcher did with the subscription.
#[derive(Debug, Clone)]
pub struct MockSubscriptionHandle {
    state: Arc<Mutex<MockState>>,
    senders: Senders,
}

impl MockSubscription {
    pub fn new() -> (Self, SubscriptionChannels, MockSubscriptionHandle) {
        let (notification_tx, notifications) = mpsc::unbounded_channel();
        let (error_tx, errors) = mpsc::unbounded_channel();
        let senders = Senders {
            notifications: notification_tx,
            errors: error_tx,
        };
        let state = Arc::new(Mutex::new(MockState::default()));

        let handle = MockSubscriptionHandle {
            state: Arc::clone(&state),
            senders: senders.clone(),
        };

        (
            Self {
                state,
                senders: Some(senders),
            },
            SubscriptionChannels {
                notifications,
                errors,
            },
            handle,
        )
    }

    /// Make `register(path)` fail for this exact path.
    pub fn fail_registration_for(&self, path: impl Into<PathBuf>) {
        self.state.lock().unwrap().failing.insert(path.into());
    }
}

impl Subscription for MockSubscription {
    fn register(&mut self, path: &Path) -> Result<(), SubscriptionError> {
        if self.senders.is_none() {
            return Err(SubscriptionError::Closed);
        }
        let mut state = self.state.lock().unwrap();
        if state.failing.contains(path) {
            return Err(SubscriptionError::Register {
                path: path.to_path_buf(),
                reason: "no such file or directory".to_string(),
            });
        }
        state.registered.push(path.to_path_buf());
        Ok(())
    }

    fn close(&mut self) -> Result<(), SubscriptionError> {
        self.state.lock().unwrap().close_calls += 1;
        match self.senders.take() {
            Some(_) => Ok(()),
            None => Err(SubscriptionError::Closed),
        }
    }
}

impl MockSubscriptionHandle {
    /// Inject a notification. Returns false if the dispatcher side is gone.
    pub fn notify(&self, path: impl Into<PathBuf>, operation: Operation) -> bool {
        self.senders
            .notifications
            .send(ChangeNotification::new(path, operation))
            .is_ok()
    }

    /// Inject a watcher error. Returns false if the dispatcher side is gone.
    pub fn fail(&self, details: impl Into<String>) -> bool {
        self.senders
            .errors
            .send(SubscriptionError::Watch {
                details: details.into(),
            })
            .is_ok()
    }

    /// Paths successfully registered so far, in call order.
    pub fn registered(&self) -> Vec<PathBuf> {
        self.state.lock().unwrap().registered.clone()
    }

    pub fn close_calls(&self) -> usize {
        self.state.lock().unwrap().close_calls
    }
}
