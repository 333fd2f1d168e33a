// src/registry.rs

//! Watch rules and the immutable, ordered registry that holds them.

use crate::config::model::ConfigFile;

/// A path prefix and the commands to run for changes under it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchRule {
    path: String,
    actions: Vec<String>,
}

impl WatchRule {
    pub fn new(path: impl Into<String>, actions: Vec<String>) -> Self {
        Self {
            path: path.into(),
            actions,
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn actions(&self) -> &[String] {
        &self.actions
    }

    /// Whether a change at `changed` falls under this rule.
    ///
    /// This is a literal string prefix test. Paths are not normalized and
    /// separator boundaries are not checked, so a rule for `/a/b` also
    /// matches `/a/bc`. Existing configurations may rely on that, so it
    /// stays.
    pub fn matches(&self, changed: &str) -> bool {
        changed.starts_with(self.path.as_str())
    }
}

/// Ordered set of watch rules, fixed for the lifetime of the process.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    rules: Vec<WatchRule>,
}

impl Registry {
    /// Build a registry from rules in their declared order.
    ///
    /// No validation happens here: a rule whose path does not exist or whose
    /// actions cannot be run only fails later, at registration or execution.
    pub fn load(rules: Vec<WatchRule>) -> Self {
        Self { rules }
    }

    pub fn from_config(cfg: &ConfigFile) -> Self {
        Self::load(
            cfg.watchers
                .iter()
                .map(|w| WatchRule::new(w.path.clone(), w.actions.clone()))
                .collect(),
        )
    }

    pub fn iter(&self) -> impl Iterator<Item = &WatchRule> {
        self.rules.iter()
    }

    /// Every rule matching `changed`, in registry order.
    pub fn matching<'a>(&'a self, changed: &'a str) -> impl Iterator<Item = &'a WatchRule> + 'a {
        self.rules.iter().filter(move |rule| rule.matches(changed))
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
