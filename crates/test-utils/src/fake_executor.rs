use std::collections::{HashMap, HashSet};
use std::future::Future;
use std::io;
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::mpsc;
use watchhook::exec::{ActionError, ActionExecutor, ActionOutput};

/// What the fake did for one action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecutionRecord {
    Started(String),
    Finished(String),
}

/// A fake executor that:
/// - records when each action starts and finishes
/// - fails actions listed via `fail`, as if the command did not exist
/// - optionally sleeps for actions listed via `delay`
/// - answers everything else with a canned output (`output`, default empty)
#[derive(Debug, Clone, Default)]
pub struct RecordingExecutor {
    log: Arc<Mutex<Vec<ExecutionRecord>>>,
    failing: HashSet<String>,
    delays: HashMap<String, Duration>,
    outputs: HashMap<String, Vec<u8>>,
    started_tx: Option<mpsc::UnboundedSender<String>>,
}

impl RecordingExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail(mut self, command: &str) -> Self {
        self.failing.insert(command.to_string());
        self
    }

    pub fn delay(mut self, command: &str, delay: Duration) -> Self {
        self.delays.insert(command.to_string(), delay);
        self
    }

    pub fn output(mut self, command: &str, output: &[u8]) -> Self {
        self.outputs.insert(command.to_string(), output.to_vec());
        self
    }

    /// Receive each command name as soon as its execution starts.
    pub fn started_channel(&mut self) -> mpsc::UnboundedReceiver<String> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.started_tx = Some(tx);
        rx
    }

    /// Shared view of the execution log; stays valid after the executor is
    /// moved into a dispatcher.
    pub fn log(&self) -> Arc<Mutex<Vec<ExecutionRecord>>> {
        Arc::clone(&self.log)
    }

    /// Names of actions that ran to completion, in order.
    pub fn finished(log: &Arc<Mutex<Vec<ExecutionRecord>>>) -> Vec<String> {
        log.lock()
            .unwrap()
            .iter()
            .filter_map(|r| match r {
                ExecutionRecord::Finished(c) => Some(c.clone()),
                ExecutionRecord::Started(_) => None,
            })
            .collect()
    }
}

impl ActionExecutor for RecordingExecutor {
    fn execute<'a>(
        &'a mut self,
        command: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<ActionOutput, ActionError>> + Send + 'a>> {
        Box::pin(async move {
            self.log
                .lock()
                .unwrap()
                .push(ExecutionRecord::Started(command.to_string()));
            if let Some(tx) = &self.started_tx {
                let _ = tx.send(command.to_string());
            }

            if let Some(delay) = self.delays.get(command) {
                tokio::time::sleep(*delay).await;
            }

            self.log
                .lock()
                .unwrap()
                .push(ExecutionRecord::Finished(command.to_string()));

            if self.failing.contains(command) {
                return Err(ActionError::Spawn {
                    command: command.to_string(),
                    source: io::Error::new(io::ErrorKind::NotFound, "executable file not found"),
                });
            }

            Ok(self.outputs.get(command).cloned().unwrap_or_default())
        })
    }
}
