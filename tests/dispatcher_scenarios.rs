// tests/dispatcher_scenarios.rs

use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use watchhook::engine::Dispatcher;
use watchhook::exec::{ActionExecutor, ProcessExecutor};
use watchhook::registry::Registry;
use watchhook::watch::mock::{MockSubscription, MockSubscriptionHandle};
use watchhook::watch::{Operation, Subscription};
use watchhook_test_utils::builders::ConfigFileBuilder;
use watchhook_test_utils::fake_executor::{ExecutionRecord, RecordingExecutor};
use watchhook_test_utils::recording_reporter::{RecordingReporter, Report};
use watchhook_test_utils::{init_tracing, with_timeout};

struct Harness {
    handle: MockSubscriptionHandle,
    reporter: RecordingReporter,
    shutdown: CancellationToken,
    task: JoinHandle<MockSubscription>,
}

impl Harness {
    /// Cancel the loop and wait for it to hand back the subscription.
    async fn stop(self) -> (MockSubscriptionHandle, RecordingReporter, MockSubscription) {
        self.shutdown.cancel();
        let sub = with_timeout(self.task).await.expect("dispatcher panicked");
        (self.handle, self.reporter, sub)
    }

    async fn wait_for(&self, pred: impl Fn(&[Report]) -> bool) {
        with_timeout(async {
            loop {
                if pred(self.reporter.reports().as_slice()) {
                    return;
                }
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        })
        .await
    }
}

fn start<E>(registry: Registry, executor: E, failing: &[&str]) -> Harness
where
    E: ActionExecutor + 'static,
{
    init_tracing();

    let (sub, channels, handle) = MockSubscription::new();
    for path in failing {
        sub.fail_registration_for(*path);
    }

    let reporter = RecordingReporter::new();
    let shutdown = CancellationToken::new();
    let dispatcher = Dispatcher::new(registry, sub, channels, executor, reporter.clone());
    let task = tokio::spawn(dispatcher.run(shutdown.clone()));

    Harness {
        handle,
        reporter,
        shutdown,
        task,
    }
}

fn ok(command: &str) -> Report {
    Report::ActionOk {
        command: command.to_string(),
        output: String::new(),
    }
}

fn count_actions(reports: &[Report]) -> usize {
    reports
        .iter()
        .filter(|r| matches!(r, Report::ActionOk { .. } | Report::ActionFailed { .. }))
        .count()
}

fn finished(log: &Arc<Mutex<Vec<ExecutionRecord>>>) -> Vec<String> {
    RecordingExecutor::finished(log)
}

#[tokio::test]
async fn write_under_watched_path_runs_action_once() {
    let registry = ConfigFileBuilder::new()
        .watcher("/tmp/watch", &["/bin/true"])
        .registry();
    let executor = RecordingExecutor::new();
    let log = executor.log();

    let h = start(registry, executor, &[]);
    assert!(h.handle.notify("/tmp/watch/file.txt", Operation::WRITE));
    h.wait_for(|r| count_actions(r) == 1).await;

    let (handle, reporter, mut sub) = h.stop().await;

    assert_eq!(finished(&log), vec!["/bin/true".to_string()]);
    assert_eq!(
        reporter.reports(),
        vec![
            Report::WatchAdded("/tmp/watch".into()),
            Report::Change(PathBuf::from("/tmp/watch/file.txt")),
            ok("/bin/true"),
        ]
    );
    assert_eq!(handle.registered(), vec![PathBuf::from("/tmp/watch")]);

    // The loop hands the subscription back unclosed; closing is the owner's job.
    assert_eq!(handle.close_calls(), 0);
    sub.close().unwrap();
    assert_eq!(handle.close_calls(), 1);
}

#[tokio::test]
async fn two_matching_rules_fire_in_declaration_order() {
    let registry = ConfigFileBuilder::new()
        .watcher("/tmp/watch", &["first"])
        .watcher("/tmp", &["second"])
        .registry();
    let executor = RecordingExecutor::new();
    let log = executor.log();

    let h = start(registry, executor, &[]);
    h.handle.notify("/tmp/watch/x", Operation::CREATE);
    h.wait_for(|r| count_actions(r) == 2).await;
    h.stop().await;

    assert_eq!(finished(&log), vec!["first".to_string(), "second".to_string()]);
}

#[tokio::test]
async fn actions_within_a_rule_run_in_declared_order() {
    let registry = ConfigFileBuilder::new()
        .watcher("/src", &["c", "a", "b"])
        .registry();
    let executor = RecordingExecutor::new();
    let log = executor.log();

    let h = start(registry, executor, &[]);
    h.handle.notify("/src/lib.rs", Operation::WRITE);
    h.wait_for(|r| count_actions(r) == 3).await;
    h.stop().await;

    assert_eq!(finished(&log), vec!["c", "a", "b"]);
}

#[tokio::test]
async fn remove_and_rename_run_nothing_and_report_nothing() {
    let registry = ConfigFileBuilder::new()
        .watcher("/tmp/watch", &["/bin/true"])
        .registry();
    let executor = RecordingExecutor::new();
    let log = executor.log();

    let h = start(registry, executor, &[]);
    h.handle.notify("/tmp/watch/gone", Operation::REMOVE);
    h.handle.notify("/tmp/watch/moved", Operation::RENAME);
    // Notifications are handled in arrival order, so once this one shows up
    // the two above have been dealt with.
    h.handle.notify("/unwatched/sentinel", Operation::WRITE);
    h.wait_for(|r| r.contains(&Report::Change("/unwatched/sentinel".into())))
        .await;

    let (_, reporter, _) = h.stop().await;

    assert!(log.lock().unwrap().is_empty());
    assert_eq!(
        reporter.reports(),
        vec![
            Report::WatchAdded("/tmp/watch".into()),
            Report::Change("/unwatched/sentinel".into()),
        ]
    );
}

#[tokio::test]
async fn failing_action_does_not_stop_the_rest() {
    let registry = ConfigFileBuilder::new()
        .watcher("/w", &["broken", "after-broken"])
        .watcher("/w/sub", &["later-rule"])
        .registry();
    let executor = RecordingExecutor::new().fail("broken");
    let log = executor.log();

    let h = start(registry, executor, &[]);
    h.handle.notify("/w/sub/file", Operation::WRITE);
    h.wait_for(|r| count_actions(r) == 3).await;
    let (_, reporter, _) = h.stop().await;

    assert_eq!(finished(&log), vec!["broken", "after-broken", "later-rule"]);
    let reports = reporter.reports();
    assert!(reports.contains(&Report::ActionFailed {
        command: "broken".into(),
        error: "executable file not found".into(),
    }));
    assert!(reports.contains(&ok("after-broken")));
    assert!(reports.contains(&ok("later-rule")));
}

#[tokio::test]
async fn registration_failure_does_not_stop_later_registrations() {
    let registry = ConfigFileBuilder::new()
        .watcher("/missing", &["a"])
        .watcher("/present", &["b"])
        .watcher("/also-missing", &["c"])
        .watcher("/present-too", &["d"])
        .registry();

    let h = start(registry, RecordingExecutor::new(), &["/missing", "/also-missing"]);
    h.wait_for(|r| r.len() == 4).await;
    let (handle, reporter, _) = h.stop().await;

    assert_eq!(
        reporter.reports(),
        vec![
            Report::WatchFailed("/missing".into()),
            Report::WatchAdded("/present".into()),
            Report::WatchFailed("/also-missing".into()),
            Report::WatchAdded("/present-too".into()),
        ]
    );
    assert_eq!(
        handle.registered(),
        vec![PathBuf::from("/present"), PathBuf::from("/present-too")]
    );
}

#[tokio::test]
async fn subscription_errors_are_reported_and_loop_keeps_running() {
    let registry = ConfigFileBuilder::new()
        .watcher("/data", &["sync"])
        .registry();
    let executor = RecordingExecutor::new();
    let log = executor.log();

    let h = start(registry, executor, &[]);
    h.handle.fail("event queue overflow");
    h.wait_for(|r| r.contains(&Report::SubscriptionError("event queue overflow".into())))
        .await;

    h.handle.notify("/data/file", Operation::WRITE);
    h.wait_for(|r| count_actions(r) == 1).await;
    h.stop().await;

    assert_eq!(finished(&log), vec!["sync"]);
}

#[tokio::test]
async fn shutdown_waits_for_in_flight_action() {
    let registry = ConfigFileBuilder::new()
        .watcher("/w", &["slow", "next"])
        .registry();
    let mut executor = RecordingExecutor::new().delay("slow", Duration::from_millis(300));
    let mut started = executor.started_channel();
    let log = executor.log();

    let h = start(registry, executor, &[]);
    h.handle.notify("/w/file", Operation::WRITE);

    let first = with_timeout(started.recv()).await;
    assert_eq!(first.as_deref(), Some("slow"));

    // Shutdown arrives while "slow" is still running.
    let (handle, reporter, _) = h.stop().await;

    // The whole event completed before the loop stopped.
    assert_eq!(finished(&log), vec!["slow", "next"]);
    assert!(reporter.reports().contains(&ok("next")));

    // The loop is gone; nothing new can be delivered.
    assert!(!handle.notify("/w/another", Operation::WRITE));
    assert_eq!(finished(&log).len(), 2);
}

#[tokio::test]
async fn queued_notifications_at_shutdown_are_handled_whole_or_not_at_all() {
    let registry = ConfigFileBuilder::new()
        .watcher("/w", &["slow", "tail"])
        .registry();
    let mut executor = RecordingExecutor::new().delay("slow", Duration::from_millis(100));
    let mut started = executor.started_channel();
    let log = executor.log();

    let h = start(registry, executor, &[]);
    for name in ["a", "b", "c"] {
        h.handle.notify(format!("/w/{name}"), Operation::WRITE);
    }
    with_timeout(started.recv()).await;

    // "b" and "c" are still queued when shutdown fires; either may win.
    let (_, reporter, _) = h.stop().await;

    let changes = reporter
        .reports()
        .iter()
        .filter(|r| matches!(r, Report::Change(_)))
        .count();
    assert!((1..=3).contains(&changes), "changes: {changes}");

    let expected: Vec<_> = std::iter::repeat(["slow", "tail"])
        .take(changes)
        .flatten()
        .collect();
    assert_eq!(finished(&log), expected);
}

#[tokio::test]
async fn shutdown_before_any_event_stops_cleanly() {
    let registry = ConfigFileBuilder::new().watcher("/w", &["x"]).registry();
    let executor = RecordingExecutor::new();
    let log = executor.log();

    let h = start(registry, executor, &[]);
    let (handle, reporter, mut sub) = h.stop().await;

    assert!(log.lock().unwrap().is_empty());
    assert_eq!(reporter.reports(), vec![Report::WatchAdded("/w".into())]);
    assert!(sub.close().is_ok());
    assert_eq!(handle.close_calls(), 1);
}

#[cfg(unix)]
#[tokio::test]
async fn missing_command_is_reported_and_loop_stays_responsive() {
    let registry = ConfigFileBuilder::new()
        .watcher("/w", &["/no/such/command", "/bin/true"])
        .registry();

    let h = start(registry, ProcessExecutor::new(), &[]);
    h.handle.notify("/w/a", Operation::WRITE);
    h.wait_for(|r| count_actions(r) == 2).await;

    let reports = h.reporter.reports();
    match &reports[2] {
        Report::ActionFailed { command, error } => {
            assert_eq!(command, "/no/such/command");
            assert!(!error.is_empty());
        }
        other => panic!("expected ActionFailed, got {other:?}"),
    }
    assert_eq!(reports[3], ok("/bin/true"));

    h.handle.notify("/w/b", Operation::CREATE);
    h.wait_for(|r| count_actions(r) == 4).await;
    h.stop().await;
}
