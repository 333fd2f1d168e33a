// src/engine/core.rs

//! Pure core of the dispatch loop.
//!
//! [`DispatchCore`] consumes [`DispatchEvent`]s and produces the list of
//! commands the IO shell has to carry out, in order. It owns the registry,
//! performs rule matching, and does no IO.

use std::path::PathBuf;

use tracing::{debug, trace};

use crate::engine::DispatchEvent;
use crate::registry::Registry;
use crate::watch::{ChangeNotification, SubscriptionError};

/// Command produced by the core, to be executed by the outer IO shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoreCommand {
    /// Tell the operator a relevant change was seen.
    ReportChange(PathBuf),
    /// Run one action of a matched rule and wait for it.
    RunAction { rule: String, command: String },
    /// Tell the operator the subscription failed.
    ReportSubscriptionError(SubscriptionError),
}

/// Decision returned by the core after handling a single event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreStep {
    pub commands: Vec<CoreCommand>,
    pub keep_running: bool,
}

impl CoreStep {
    fn continue_with(commands: Vec<CoreCommand>) -> Self {
        Self {
            commands,
            keep_running: true,
        }
    }
}

#[derive(Debug)]
pub struct DispatchCore {
    registry: Registry,
}

impl DispatchCore {
    pub fn new(registry: Registry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Handle a single event and return the resulting commands.
    pub fn step(&self, event: DispatchEvent) -> CoreStep {
        match event {
            DispatchEvent::Changed(notification) => self.handle_change(notification),
            DispatchEvent::SubscriptionFailed(err) => {
                CoreStep::continue_with(vec![CoreCommand::ReportSubscriptionError(err)])
            }
            DispatchEvent::ShutdownRequested => CoreStep {
                commands: Vec::new(),
                keep_running: false,
            },
        }
    }

    /// Creations and writes fan out to every matching rule's actions, in
    /// registry order and then declaration order. Anything else is dropped.
    fn handle_change(&self, notification: ChangeNotification) -> CoreStep {
        if !notification.operation.is_relevant() {
            trace!(
                path = ?notification.path,
                operation = ?notification.operation,
                "ignoring change"
            );
            return CoreStep::continue_with(Vec::new());
        }

        let changed = notification.path.to_string_lossy();
        let mut commands = vec![CoreCommand::ReportChange(notification.path.clone())];

        for rule in self.registry.matching(&changed) {
            debug!(rule = %rule.path(), path = %changed, "rule matched");
            commands.extend(rule.actions().iter().map(|action| CoreCommand::RunAction {
                rule: rule.path().to_string(),
                command: action.clone(),
            }));
        }

        CoreStep::continue_with(commands)
    }
}
