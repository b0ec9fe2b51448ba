//! Console configuration

use crate::error::{ConsoleError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default gateway used to build links to uploaded content
pub const DEFAULT_GATEWAY_HOST: &str = "w3s.link";

/// Default shard size for the dry-run uploader (1 MiB)
pub const DEFAULT_SHARD_SIZE: u64 = 1024 * 1024;

/// Log level for the console
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl Default for LogLevel {
    fn default() -> Self {
        LogLevel::Info
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogLevel::Trace => write!(f, "trace"),
            LogLevel::Debug => write!(f, "debug"),
            LogLevel::Info => write!(f, "info"),
            LogLevel::Warn => write!(f, "warn"),
            LogLevel::Error => write!(f, "error"),
        }
    }
}

impl From<LogLevel> for log::LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => log::LevelFilter::Trace,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Error => log::LevelFilter::Error,
        }
    }
}

/// Configuration for the upload console
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct ConsoleConfig {
    /// Gateway host used for links to uploaded content (default: w3s.link)
    pub gateway_host: String,

    /// Log level (default: info)
    pub log_level: LogLevel,

    /// Shard size in bytes for the dry-run uploader (default: 1 MiB)
    pub shard_size: u64,

    /// Whether single files are wrapped in a directory by default (default: true)
    pub wrap_in_directory: bool,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            gateway_host: DEFAULT_GATEWAY_HOST.to_string(),
            log_level: LogLevel::default(),
            shard_size: DEFAULT_SHARD_SIZE,
            wrap_in_directory: true,
        }
    }
}

impl ConsoleConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn gateway_host(mut self, host: impl Into<String>) -> Self {
        self.gateway_host = host.into();
        self
    }

    pub fn log_level(mut self, level: LogLevel) -> Self {
        self.log_level = level;
        self
    }

    pub fn shard_size(mut self, size: u64) -> Self {
        self.shard_size = size;
        self
    }

    pub fn wrap_in_directory(mut self, wrap: bool) -> Self {
        self.wrap_in_directory = wrap;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.gateway_host.trim().is_empty() {
            return Err(ConsoleError::config_error("gateway-host cannot be empty"));
        }

        if self.gateway_host.contains("://") || self.gateway_host.contains('/') {
            return Err(ConsoleError::config_error(format!(
                "gateway-host must be a bare host name, got '{}'",
                self.gateway_host
            )));
        }

        if self.shard_size == 0 {
            return Err(ConsoleError::config_error(
                "shard-size must be greater than 0",
            ));
        }

        Ok(())
    }

    /// Load a configuration from a JSON file. Missing keys take their defaults.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            ConsoleError::config_error(format!("Failed to read {}: {}", path.display(), e))
        })?;
        let config: ConsoleConfig = serde_json::from_str(&content)?;
        config.validate()?;
        log::debug!("Loaded console config from {}", path.display());
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let config = ConsoleConfig::default();
        assert_eq!(config.gateway_host, "w3s.link");
        assert_eq!(config.log_level, LogLevel::Info);
        assert_eq!(config.shard_size, 1024 * 1024);
        assert!(config.wrap_in_directory);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_builder() {
        let config = ConsoleConfig::new()
            .gateway_host("dweb.link")
            .log_level(LogLevel::Debug)
            .shard_size(4096)
            .wrap_in_directory(false);

        assert_eq!(config.gateway_host, "dweb.link");
        assert_eq!(config.log_level, LogLevel::Debug);
        assert_eq!(config.shard_size, 4096);
        assert!(!config.wrap_in_directory);
    }

    #[test]
    fn test_config_validation() {
        assert!(ConsoleConfig::new().gateway_host("").validate().is_err());
        assert!(ConsoleConfig::new()
            .gateway_host("https://w3s.link")
            .validate()
            .is_err());
        assert!(ConsoleConfig::new().shard_size(0).validate().is_err());
    }

    #[test]
    fn test_config_json_keys() {
        let json = ConsoleConfig::default().to_json().unwrap();
        assert!(json.contains("\"gateway-host\""));
        assert!(json.contains("\"shard-size\""));
        assert!(json.contains("\"wrap-in-directory\""));
        assert!(json.contains("\"info\""));
    }

    #[test]
    fn test_config_file_roundtrip_with_partial_keys() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("console.json");
        std::fs::write(&path, r#"{ "gateway-host": "nftstorage.link", "log-level": "warn" }"#)
            .unwrap();

        let config = ConsoleConfig::from_file(&path).unwrap();
        assert_eq!(config.gateway_host, "nftstorage.link");
        assert_eq!(config.log_level, LogLevel::Warn);
        assert_eq!(config.shard_size, DEFAULT_SHARD_SIZE);

        let saved = dir.path().join("saved.json");
        config.save(&saved).unwrap();
        assert_eq!(ConsoleConfig::from_file(&saved).unwrap(), config);
    }

    #[test]
    fn test_config_missing_file() {
        let result = ConsoleConfig::from_file("/definitely/not/here.json");
        assert!(matches!(result, Err(ConsoleError::ConfigError { .. })));
    }

    #[test]
    fn test_log_level_filter() {
        assert_eq!(log::LevelFilter::from(LogLevel::Warn), log::LevelFilter::Warn);
        assert_eq!(LogLevel::Trace.to_string(), "trace");
    }
}
