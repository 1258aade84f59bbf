//! Application configuration structures.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Object store selection and layout
    #[serde(default)]
    pub storage: StorageConfig,

    /// Request handling settings
    #[serde(default)]
    pub service: ServiceConfig,

    /// Log output settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            tracing::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Override values from environment variables, when set.
    ///
    /// - `STORAGE_BACKEND`: `local`, `s3` or `memory`
    /// - `STORAGE_ROOT`: root directory for the local backend
    /// - `S3_BUCKET`: bucket for the S3 backend
    /// - `REQUEST_TIMEOUT_SECS`: per-request deadline
    pub fn apply_env(&mut self) {
        self.apply_overrides(|name| std::env::var(name).ok());
    }

    /// Apply overrides from any name-to-value source.
    ///
    /// Unparseable values are logged and leave the current setting in place.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(backend) = lookup("STORAGE_BACKEND") {
            match backend.parse() {
                Ok(backend) => self.storage.backend = backend,
                Err(e) => tracing::warn!("Ignoring STORAGE_BACKEND: {}", e),
            }
        }

        if let Some(root) = lookup("STORAGE_ROOT") {
            self.storage.local_root = root;
        }

        if let Some(bucket) = lookup("S3_BUCKET") {
            self.storage.bucket = bucket;
        }

        if let Some(timeout) = lookup("REQUEST_TIMEOUT_SECS") {
            match timeout.trim().parse::<u64>() {
                Ok(secs) => self.service.request_timeout_secs = secs,
                Err(e) => tracing::warn!("Ignoring REQUEST_TIMEOUT_SECS={:?}: {}", timeout, e),
            }
        }
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        match self.storage.backend {
            StorageBackend::Local if self.storage.local_root.trim().is_empty() => {
                return Err(AppError::validation("storage.local_root is empty"));
            }
            StorageBackend::S3 if self.storage.bucket.trim().is_empty() => {
                return Err(AppError::validation("storage.bucket is empty"));
            }
            _ => {}
        }
        if self.storage.page_size == 0 {
            return Err(AppError::validation("storage.page_size must be > 0"));
        }
        if self.logging.level.trim().is_empty() {
            return Err(AppError::validation("logging.level is empty"));
        }
        Ok(())
    }
}

/// Which object store backs the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    Local,
    S3,
    Memory,
}

impl std::str::FromStr for StorageBackend {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "s3" => Ok(Self::S3),
            "memory" => Ok(Self::Memory),
            other => Err(AppError::config(format!("Unknown storage backend '{other}'"))),
        }
    }
}

/// Object store settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default)]
    pub backend: StorageBackend,

    /// Root directory for the local backend
    #[serde(default = "defaults::local_root")]
    pub local_root: String,

    /// Bucket name for the S3 backend
    #[serde(default = "defaults::bucket")]
    pub bucket: String,

    /// Keys requested per listing page
    #[serde(default = "defaults::page_size")]
    pub page_size: usize,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::default(),
            local_root: defaults::local_root(),
            bucket: defaults::bucket(),
            page_size: defaults::page_size(),
        }
    }
}

/// Request handling settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Deadline for a whole ingest or listing call; 0 disables it
    #[serde(default = "defaults::request_timeout")]
    pub request_timeout_secs: u64,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            request_timeout_secs: defaults::request_timeout(),
        }
    }
}

/// Log output settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "defaults::level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: defaults::level(),
        }
    }
}

mod defaults {
    pub fn local_root() -> String {
        "storage".into()
    }
    pub fn bucket() -> String {
        "fiuba-reviews-siu".into()
    }
    pub fn page_size() -> usize {
        1000
    }
    pub fn request_timeout() -> u64 {
        30
    }
    pub fn level() -> String {
        "info".into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_default_config_ok() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn validate_rejects_zero_page_size() {
        let mut config = Config::default();
        config.storage.page_size = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_empty_bucket_for_s3() {
        let mut config = Config::default();
        config.storage.backend = StorageBackend::S3;
        config.storage.bucket = " ".to_string();
        assert!(config.validate().is_err());

        config.storage.backend = StorageBackend::Local;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn parses_partial_toml() {
        let config: Config = toml::from_str(
            r#"
            [storage]
            backend = "s3"
            bucket = "planes-test"
            "#,
        )
        .unwrap();
        assert_eq!(config.storage.backend, StorageBackend::S3);
        assert_eq!(config.storage.bucket, "planes-test");
        assert_eq!(config.storage.page_size, 1000);
        assert_eq!(config.service.request_timeout_secs, 30);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn backend_from_str() {
        assert_eq!("S3".parse::<StorageBackend>().unwrap(), StorageBackend::S3);
        assert_eq!(
            " memory ".parse::<StorageBackend>().unwrap(),
            StorageBackend::Memory
        );
        assert!("gcs".parse::<StorageBackend>().is_err());
    }

    #[test]
    fn load_or_default_falls_back() {
        let config = Config::load_or_default("does/not/exist.toml");
        assert_eq!(config.storage.backend, StorageBackend::Local);
    }

    fn overrides(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: std::collections::HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn overrides_apply_valid_values() {
        let mut config = Config::default();
        config.apply_overrides(overrides(&[
            ("STORAGE_BACKEND", "memory"),
            ("S3_BUCKET", "otro-bucket"),
            ("REQUEST_TIMEOUT_SECS", " 5 "),
        ]));
        assert_eq!(config.storage.backend, StorageBackend::Memory);
        assert_eq!(config.storage.bucket, "otro-bucket");
        assert_eq!(config.service.request_timeout_secs, 5);
    }

    #[test]
    fn overrides_ignore_unparseable_values() {
        let mut config = Config::default();
        config.apply_overrides(overrides(&[
            ("STORAGE_BACKEND", "gcs"),
            ("REQUEST_TIMEOUT_SECS", "treinta"),
        ]));
        assert_eq!(config.storage.backend, StorageBackend::Local);
        assert_eq!(config.service.request_timeout_secs, 30);
    }
}
