// src/watch/mod.rs

//! Filesystem subscriptions.
//!
//! The dispatcher never talks to the OS directly. It goes through the
//! [`Subscription`] trait plus a pair of channels ([`SubscriptionChannels`])
//! carrying change notifications and watcher errors.
//!
//! - [`notify_backend`] is the production implementation on top of `notify`.
//! - [`mock`] is an in-memory implementation used by tests.

pub mod mock;
pub mod notify_backend;
pub mod subscription;

pub use notify_backend::NotifySubscription;
pub use subscription::{
    ChangeNotification, Operation, Subscription, SubscriptionChannels, SubscriptionError,
};
