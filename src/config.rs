//! Editor configuration loaded from TOML.
//!
//! - `default_config()` - defaults embedded in the binary
//! - `load_config(path)` - an override file; missing keys fall back to the
//!   defaults

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::error::ConfigError;

/// Defaults embedded at compile time from `config/editor.toml`.
const DEFAULT_CONFIG: &str = include_str!("../config/editor.toml");

/// Which key-value backend holds the local document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Memory,
    #[default]
    File,
    Sqlite,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    /// Overrides the platform data directory.
    pub data_dir: Option<PathBuf>,
    pub legacy_key_fallback: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::File,
            data_dir: None,
            legacy_key_fallback: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AutosaveConfig {
    pub debounce_ms: u64,
}

impl Default for AutosaveConfig {
    fn default() -> Self {
        Self { debounce_ms: 1000 }
    }
}

impl AutosaveConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    pub storage: StorageConfig,
    pub autosave: AutosaveConfig,
}

/// The embedded default configuration.
///
/// # Panics
/// Panics if the embedded TOML is invalid (a build-time bug, covered by tests).
pub fn default_config() -> EditorConfig {
    toml::from_str(DEFAULT_CONFIG).expect("embedded editor.toml must be valid TOML")
}

/// Load a configuration file.
pub fn load_config(path: &Path) -> Result<EditorConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
        path: path.to_path_buf(),
        source: e,
    })?;
    Ok(toml::from_str(&content)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config_loads() {
        let config = default_config();
        assert_eq!(config.storage.backend, StorageBackend::File);
        assert!(config.storage.legacy_key_fallback);
        assert!(config.storage.data_dir.is_none());
        assert_eq!(config.autosave.debounce(), Duration::from_millis(1000));
    }

    #[test]
    fn test_embedded_matches_struct_defaults() {
        assert_eq!(default_config(), EditorConfig::default());
    }

    #[test]
    fn test_load_partial_override() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("editor.toml");
        std::fs::write(
            &path,
            "[storage]\nbackend = \"sqlite\"\ndata_dir = \"/tmp/pf\"\n",
        )
        .unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(config.storage.backend, StorageBackend::Sqlite);
        assert_eq!(config.storage.data_dir, Some(PathBuf::from("/tmp/pf")));
        assert!(config.storage.legacy_key_fallback);
        assert_eq!(config.autosave.debounce_ms, 1000);
    }

    #[test]
    fn test_load_missing_file() {
        let err = load_config(Path::new("/nonexistent/editor.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn test_load_invalid_backend() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("editor.toml");
        std::fs::write(&path, "[storage]\nbackend = \"redis\"\n").unwrap();
        assert!(matches!(load_config(&path).unwrap_err(), ConfigError::Parse(_)));
    }
}
