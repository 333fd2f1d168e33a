// src/lib.rs

pub mod cli;
pub mod config;
pub mod engine;
pub mod errors;
pub mod exec;
pub mod logging;
pub mod registry;
pub mod report;
pub mod signal;
pub mod watch;

use tracing::{debug, info};

use crate::cli::CliArgs;
use crate::config::load_from_path;
use crate::engine::Dispatcher;
use crate::errors::Result;
use crate::exec::ProcessExecutor;
use crate::registry::Registry;
use crate::report::StdReporter;
use crate::watch::{NotifySubscription, Subscription};

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading into the watch registry
/// - the SIGTERM listener
/// - the notify subscription
/// - the dispatcher, and closing the subscription once it stops
///
/// Every error returned from here is a startup failure.
pub async fn run(args: CliArgs) -> Result<()> {
    let cfg = load_from_path(&args.config)?;
    let registry = Registry::from_config(&cfg);
    info!(config = %args.config, rules = registry.len(), "configuration loaded");

    if args.dry_run {
        print_dry_run(&registry);
        return Ok(());
    }

    let shutdown = signal::shutdown_token()?;
    let (subscription, channels) = NotifySubscription::new()?;

    let dispatcher = Dispatcher::new(
        registry,
        subscription,
        channels,
        ProcessExecutor::new(),
        StdReporter::stdio(),
    );

    let mut subscription = dispatcher.run(shutdown).await;
    if let Err(err) = subscription.close() {
        info!(error = %err, "closing filesystem watcher failed");
    }

    info!("shutdown complete");
    Ok(())
}

/// Simple dry-run output: print rules and their actions.
fn print_dry_run(registry: &Registry) {
    println!("watchhook dry-run");
    println!();

    println!("watchers ({}):", registry.len());
    for rule in registry.iter() {
        println!("  - {}", rule.path());
        for action in rule.actions() {
            println!("      action: {action}");
        }
    }

    debug!("dry-run complete (nothing watched)");
}
