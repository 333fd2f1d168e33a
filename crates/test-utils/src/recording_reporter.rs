use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use watchhook::exec::ActionError;
use watchhook::report::Reporter;
use watchhook::watch::SubscriptionError;

/// One operator-facing report, as seen by the dispatcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Report {
    WatchAdded(String),
    WatchFailed(String),
    Change(PathBuf),
    ActionOk { command: String, output: String },
    ActionFailed { command: String, error: String },
    SubscriptionError(String),
}

/// Reporter that keeps every report in a shared list.
#[derive(Debug, Clone, Default)]
pub struct RecordingReporter {
    reports: Arc<Mutex<Vec<Report>>>,
}

impl RecordingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reports(&self) -> Vec<Report> {
        self.reports.lock().unwrap().clone()
    }

    fn push(&self, report: Report) {
        self.reports.lock().unwrap().push(report);
    }
}

impl Reporter for RecordingReporter {
    fn watch_added(&mut self, path: &str) {
        self.push(Report::WatchAdded(path.to_string()));
    }

    fn watch_failed(&mut self, path: &str, _err: &SubscriptionError) {
        self.push(Report::WatchFailed(path.to_string()));
    }

    fn change_detected(&mut self, path: &Path) {
        self.push(Report::Change(path.to_path_buf()));
    }

    fn action_succeeded(&mut self, command: &str, output: &[u8]) {
        self.push(Report::ActionOk {
            command: command.to_string(),
            output: String::from_utf8_lossy(output).into_owned(),
        });
    }

    fn action_failed(&mut self, command: &str, err: &ActionError) {
        self.push(Report::ActionFailed {
            command: command.to_string(),
            error: err.to_string(),
        });
    }

    fn subscription_error(&mut self, err: &SubscriptionError) {
        self.push(Report::SubscriptionError(err.to_string()));
    }
}
