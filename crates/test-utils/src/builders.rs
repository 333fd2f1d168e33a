use watchhook::config::{ConfigFile, WatcherConfig};
use watchhook::registry::{Registry, WatchRule};

/// Builder for `ConfigFile` / `Registry` to simplify test setup.
#[derive(Debug, Default)]
pub struct ConfigFileBuilder {
    config: ConfigFile,
}

impl ConfigFileBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a watcher with the given path and actions, after any existing ones.
    pub fn watcher(mut self, path: &str, actions: &[&str]) -> Self {
        self.config.watchers.push(WatcherConfig {
            path: path.to_string(),
            actions: actions.iter().map(|a| a.to_string()).collect(),
        });
        self
    }

    pub fn build(self) -> ConfigFile {
        self.config
    }

    pub fn registry(self) -> Registry {
        Registry::from_config(&self.config)
    }
}

/// Shorthand for a single rule.
pub fn rule(path: &str, actions: &[&str]) -> WatchRule {
    WatchRule::new(path, actions.iter().map(|a| a.to_string()).collect())
}
