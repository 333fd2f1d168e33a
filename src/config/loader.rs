// src/config/loader.rs

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::config::model::ConfigFile;
use crate::errors::{Result, WatchhookError};

/// On-disk format of a config file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Yaml,
    Toml,
}

impl ConfigFormat {
    /// `.toml` files are TOML; everything else is treated as YAML.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("toml") => ConfigFormat::Toml,
            _ => ConfigFormat::Yaml,
        }
    }
}

/// Read and deserialize a configuration file.
///
/// An empty (or whitespace-only) file yields an empty configuration.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<ConfigFile> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path).map_err(|source| WatchhookError::ConfigRead {
        path: path.to_path_buf(),
        source,
    })?;

    let format = ConfigFormat::from_path(path);
    debug!(?path, ?format, bytes = contents.len(), "read config file");

    parse_str(&contents, format).map_err(|reason| WatchhookError::ConfigParse {
        path: path.to_path_buf(),
        reason,
    })
}

/// Deserialize config contents in the given format.
pub fn parse_str(contents: &str, format: ConfigFormat) -> std::result::Result<ConfigFile, String> {
    if contents.trim().is_empty() {
        return Ok(ConfigFile::default());
    }

    match format {
        ConfigFormat::Yaml => serde_yaml_ng::from_str(contents).map_err(|e| e.to_string()),
        ConfigFormat::Toml => toml::from_str(contents).map_err(|e| e.to_string()),
    }
}
