//! Synchronizer configuration via `keel.toml`
//!
//! Nothing reads the file implicitly. Bootstrap code loads it with
//! [`SyncConfig::from_file`] and hands the result to the synchronizers
//! and registry sets it builds.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::error::ConfigError;

/// Conventional config file name.
pub const CONFIG_FILE_NAME: &str = "keel.toml";

/// Write-through configuration.
///
/// # Example
///
/// ```toml
/// write_cache = true
/// slow_hook_warn_ms = 250
/// initial_capacity = 1024
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Run the cache steps of each pathway. When false the cache hooks are
    /// never called.
    #[serde(default = "default_write_cache")]
    pub write_cache: bool,
    /// Hooks slower than this many milliseconds are logged at warn level.
    /// `0` disables the check.
    #[serde(default = "default_slow_hook_warn_ms")]
    pub slow_hook_warn_ms: u64,
    /// Pre-sized capacity for registries created by a `RegistrySet`.
    #[serde(default)]
    pub initial_capacity: usize,
}

fn default_write_cache() -> bool {
    true
}

fn default_slow_hook_warn_ms() -> u64 {
    250
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            write_cache: default_write_cache(),
            slow_hook_warn_ms: default_slow_hook_warn_ms(),
            initial_capacity: 0,
        }
    }
}

impl SyncConfig {
    /// Slow-hook threshold, if enabled.
    pub fn slow_hook_threshold(&self) -> Option<Duration> {
        (self.slow_hook_warn_ms > 0).then(|| Duration::from_millis(self.slow_hook_warn_ms))
    }

    /// Returns the default config file content with comments.
    pub fn default_toml() -> &'static str {
        r#"# Keel write-through configuration
#
# Run cache_insert / cache_update / cache_remove as part of each pathway.
# Set to false for deployments without a cache tier.
write_cache = true

# Persistence hooks slower than this (milliseconds) are logged at warn level.
# 0 disables the check.
slow_hook_warn_ms = 250

# Initial capacity of each entity registry.
initial_capacity = 0
"#
    }

    /// Parse config from TOML text.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not valid TOML or has fields of the
    /// wrong type.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Read and parse config from a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Write the default config file if it does not already exist.
    ///
    /// Returns `Ok(())` whether the file was created or already existed.
    pub fn write_default_if_missing(path: &Path) -> Result<(), ConfigError> {
        if !path.exists() {
            std::fs::write(path, Self::default_toml()).map_err(|source| ConfigError::Io {
                path: path.to_path_buf(),
                source,
            })?;
        }
        Ok(())
    }

    /// Serialize this config to TOML and write it to the given path.
    pub fn write_to_file(&self, path: &Path) -> Result<(), ConfigError> {
        let content =
            toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))?;
        std::fs::write(path, content).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_config_writes_cache() {
        let config = SyncConfig::default();
        assert!(config.write_cache);
        assert_eq!(config.slow_hook_warn_ms, 250);
        assert_eq!(config.initial_capacity, 0);
    }

    #[test]
    fn empty_toml_uses_defaults() {
        let config = SyncConfig::from_toml_str("").unwrap();
        assert_eq!(config, SyncConfig::default());
    }

    #[test]
    fn parse_partial_config() {
        let config = SyncConfig::from_toml_str("write_cache = false").unwrap();
        assert!(!config.write_cache);
        assert_eq!(config.slow_hook_warn_ms, 250);
    }

    #[test]
    fn parse_wrong_type_returns_error() {
        let err = SyncConfig::from_toml_str("write_cache = \"sometimes\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn default_toml_parses_correctly() {
        let config = SyncConfig::from_toml_str(SyncConfig::default_toml()).unwrap();
        assert_eq!(config, SyncConfig::default());
    }

    #[test]
    fn slow_hook_threshold_disabled_at_zero() {
        let config = SyncConfig {
            slow_hook_warn_ms: 0,
            ..SyncConfig::default()
        };
        assert_eq!(config.slow_hook_threshold(), None);
        assert_eq!(
            SyncConfig::default().slow_hook_threshold(),
            Some(Duration::from_millis(250))
        );
    }

    #[test]
    fn write_default_creates_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        assert!(!path.exists());

        SyncConfig::write_default_if_missing(&path).unwrap();
        assert!(path.exists());

        let config = SyncConfig::from_file(&path).unwrap();
        assert!(config.write_cache);
    }

    #[test]
    fn write_default_does_not_overwrite() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);

        std::fs::write(&path, "write_cache = false\n").unwrap();
        SyncConfig::write_default_if_missing(&path).unwrap();

        let config = SyncConfig::from_file(&path).unwrap();
        assert!(!config.write_cache);
    }

    #[test]
    fn write_to_file_roundtrip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        let config = SyncConfig {
            write_cache: false,
            slow_hook_warn_ms: 10,
            initial_capacity: 64,
        };
        config.write_to_file(&path).unwrap();
        assert_eq!(SyncConfig::from_file(&path).unwrap(), config);
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = TempDir::new().unwrap();
        let err = SyncConfig::from_file(&dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
        assert!(err.to_string().contains("absent.toml"));
    }
}
