// src/report.rs

//! Operator-facing output.
//!
//! Everything an operator needs to see (registrations, detected changes,
//! action results, watcher errors) goes through a [`Reporter`]. These lines
//! are the program's user interface and are independent of the `tracing`
//! log level.

use std::io::{self, Write};
use std::path::Path;

use crate::exec::ActionError;
use crate::watch::SubscriptionError;

pub trait Reporter: Send {
    fn watch_added(&mut self, path: &str);
    fn watch_failed(&mut self, path: &str, err: &SubscriptionError);
    fn change_detected(&mut self, path: &Path);
    fn action_succeeded(&mut self, command: &str, output: &[u8]);
    fn action_failed(&mut self, command: &str, err: &ActionError);
    fn subscription_error(&mut self, err: &SubscriptionError);
}

/// Writes successes to `out` and failures to `err`.
#[derive(Debug)]
pub struct StreamReporter<O, E> {
    out: O,
    err: E,
}

/// The reporter used by the binary: stdout and stderr.
pub type StdReporter = StreamReporter<io::Stdout, io::Stderr>;

impl StdReporter {
    pub fn stdio() -> Self {
        Self::new(io::stdout(), io::stderr())
    }
}

impl<O: Write, E: Write> StreamReporter<O, E> {
    pub fn new(out: O, err: E) -> Self {
        Self { out, err }
    }

    pub fn into_inner(self) -> (O, E) {
        (self.out, self.err)
    }
}

// A broken output stream has nowhere left to be reported, so write errors
// are dropped.
impl<O: Write + Send, E: Write + Send> Reporter for StreamReporter<O, E> {
    fn watch_added(&mut self, path: &str) {
        let _ = writeln!(self.out, "added filesystem watcher for {path}");
    }

    fn watch_failed(&mut self, path: &str, err: &SubscriptionError) {
        let _ = writeln!(self.err, "could not watch directory {path}, got: {err}");
    }

    fn change_detected(&mut self, path: &Path) {
        let _ = writeln!(self.out, "got a change event for {}", path.display());
    }

    fn action_succeeded(&mut self, command: &str, output: &[u8]) {
        let _ = writeln!(
            self.out,
            "ran action {command}, got: {}",
            String::from_utf8_lossy(output)
        );
    }

    fn action_failed(&mut self, command: &str, err: &ActionError) {
        let _ = writeln!(self.err, "error running the action '{command}', got: {err}");
    }

    fn subscription_error(&mut self, err: &SubscriptionError) {
        let _ = writeln!(self.err, "received a file system watcher error: {err}");
    }
}
