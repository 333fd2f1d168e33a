// src/config/model.rs

use serde::Deserialize;

/// Top-level configuration as read from the config file.
///
/// ```yaml
/// watchers:
///   - path: /tmp/watch
///     actions:
///       - /usr/local/bin/rebuild
///       - /usr/local/bin/notify-done
/// ```
///
/// The same shape is accepted from TOML as `[[watchers]]` tables.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ConfigFile {
    /// Watch rules, in the order they appear in the file.
    #[serde(default)]
    pub watchers: Vec<WatcherConfig>,
}

/// One `watchers` entry: a path prefix and the commands to run for it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct WatcherConfig {
    /// Path to register with the filesystem subscription. Also used as a
    /// literal string prefix when matching change notifications.
    #[serde(default)]
    pub path: String,

    /// Commands to run, in order, when a change under `path` is seen.
    #[serde(default)]
    pub actions: Vec<String>,
}
