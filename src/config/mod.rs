// src/config/mod.rs

//! Configuration loading for watchhook.
//!
//! Responsibilities:
//! - Define the serde-backed data model (`model.rs`).
//! - Load a config file from disk, picking YAML or TOML by extension
//!   (`loader.rs`).
//!
//! Nothing here checks that watched paths or action commands exist; those
//! problems only show up once the dispatcher registers paths and runs actions.

pub mod loader;
pub mod model;

pub use loader::{load_from_path, ConfigFormat};
pub use model::{ConfigFile, WatcherConfig};
