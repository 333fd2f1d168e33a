// src/engine/runtime.rs

use std::fmt;
use std::path::Path;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::exec::ActionExecutor;
use crate::registry::Registry;
use crate::report::Reporter;
use crate::watch::{Subscription, SubscriptionChannels};

use super::core::DispatchCore;
use super::{CoreCommand, DispatchEvent, LoopState};

/// Drives the dispatch core from a filesystem subscription and runs the
/// resulting actions through an `ActionExecutor`.
///
/// This is the IO shell around [`DispatchCore`]: it owns the subscription
/// and its channels, waits on them together with the shutdown token, and
/// carries out the commands the core returns. Actions run inline, so a slow
/// action holds up every later event.
pub struct Dispatcher<S, E, R> {
    core: DispatchCore,
    subscription: S,
    channels: SubscriptionChannels,
    executor: E,
    reporter: R,
    state: LoopState,
}

impl<S, E, R> fmt::Debug for Dispatcher<S, E, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher")
            .field("core", &self.core)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl<S, E, R> Dispatcher<S, E, R>
where
    S: Subscription,
    E: ActionExecutor,
    R: Reporter,
{
    pub fn new(
        registry: Registry,
        subscription: S,
        channels: SubscriptionChannels,
        executor: E,
        reporter: R,
    ) -> Self {
        Self {
            core: DispatchCore::new(registry),
            subscription,
            channels,
            executor,
            reporter,
            state: LoopState::Starting,
        }
    }

    /// Register every rule path, then handle events until `shutdown` fires.
    ///
    /// Shutdown is only observed while waiting for the next event; an action
    /// that is already running always completes first. Notifications already
    /// queued at that point compete with shutdown on equal terms, so some may
    /// still be handled. Returns the subscription so the caller can close it.
    pub async fn run(mut self, shutdown: CancellationToken) -> S {
        self.register_all();
        self.transition(LoopState::Running);

        loop {
            // No `biased;`: when several sources are ready at once, tokio
            // picks one at random.
            let event = tokio::select! {
                Some(notification) = self.channels.notifications.recv() => {
                    DispatchEvent::Changed(notification)
                }
                Some(err) = self.channels.errors.recv() => {
                    DispatchEvent::SubscriptionFailed(err)
                }
                _ = shutdown.cancelled() => DispatchEvent::ShutdownRequested,
            };

            debug!(?event, "dispatcher received event");

            let step = self.core.step(event);
            for command in step.commands {
                self.execute_command(command).await;
            }

            if !step.keep_running {
                self.transition(LoopState::Draining);
                break;
            }
        }

        self.transition(LoopState::Stopped);
        self.subscription
    }

    /// Register each rule's path once. Failures are reported and the rule
    /// stays inert; registration carries on with the next rule.
    fn register_all(&mut self) {
        for rule in self.core.registry().iter() {
            match self.subscription.register(Path::new(rule.path())) {
                Ok(()) => {
                    debug!(path = %rule.path(), "watch registered");
                    self.reporter.watch_added(rule.path());
                }
                Err(err) => {
                    info!(path = %rule.path(), error = %err, "watch registration failed");
                    self.reporter.watch_failed(rule.path(), &err);
                }
            }
        }
    }

    async fn execute_command(&mut self, command: CoreCommand) {
        match command {
            CoreCommand::ReportChange(path) => {
                self.reporter.change_detected(&path);
            }
            CoreCommand::RunAction { rule, command } => {
                match self.executor.execute(&command).await {
                    Ok(output) => {
                        debug!(rule = %rule, cmd = %command, "action succeeded");
                        self.reporter.action_succeeded(&command, &output);
                    }
                    Err(err) => {
                        info!(rule = %rule, cmd = %command, error = %err, "action failed");
                        self.reporter.action_failed(&command, &err);
                    }
                }
            }
            CoreCommand::ReportSubscriptionError(err) => {
                info!(error = %err, "subscription error");
                self.reporter.subscription_error(&err);
            }
        }
    }

    fn transition(&mut self, next: LoopState) {
        info!(from = ?self.state, to = ?next, "dispatcher state change");
        self.state = next;
    }
}
