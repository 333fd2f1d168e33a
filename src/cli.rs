// src/cli.rs

//! CLI argument parsing using `clap`.

use clap::{Parser, ValueEnum};

/// Command-line arguments for `watchhook`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "watchhook",
    version,
    about = "Run commands when files under watched paths are created or written.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the config file (YAML, or TOML when the extension is `.toml`).
    #[arg(short = 'c', long, value_name = "PATH")]
    pub config: String,

    /// Logging level for diagnostics (error, warn, info, debug, trace).
    ///
    /// If omitted, `WATCHHOOK_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Load the config, print the watch rules, but don't watch anything.
    #[arg(long)]
    pub dry_run: bool,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Parse the process arguments.
///
/// Usage errors (including a missing `--config`) are printed to stderr and
/// terminate the process with exit code 1. `--help` and `--version` keep
/// clap's behaviour and exit 0.
pub fn parse() -> CliArgs {
    match CliArgs::try_parse() {
        Ok(args) => args,
        Err(err) if err.use_stderr() => {
            let _ = err.print();
            std::process::exit(1);
        }
        Err(err) => err.exit(),
    }
}
