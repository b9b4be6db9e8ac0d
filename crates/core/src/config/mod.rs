//! Application configuration with layered loading.
//!
//! This module provides configuration management using figment for layered
//! configuration loading from multiple sources:
//!
//! 1. Environment variables (CONTACT_BOOK_*)
//! 2. TOML config file (if CONTACT_BOOK_CONFIG_FILE set)
//! 3. Built-in defaults

use std::net::SocketAddr;
use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

use crate::cache::DEFAULT_CAPACITY;

mod validation;

pub use validation::ConfigError;

/// Environment variable prefix for every setting.
pub const ENV_PREFIX: &str = "CONTACT_BOOK_";

/// Environment variable naming an optional TOML config file.
pub const CONFIG_FILE_ENV: &str = "CONTACT_BOOK_CONFIG_FILE";

/// Application configuration with layered loading.
///
/// Loading precedence (highest wins):
/// 1. Environment variables (CONTACT_BOOK_*)
/// 2. TOML config file (if CONTACT_BOOK_CONFIG_FILE set)
/// 3. Built-in defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Path to the SQLite contacts database.
    ///
    /// Set via CONTACT_BOOK_DB_PATH environment variable.
    #[serde(default = "default_db_path")]
    pub db_path: PathBuf,

    /// Address the HTTP server listens on.
    ///
    /// Set via CONTACT_BOOK_BIND_ADDRESS environment variable.
    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    /// Maximum number of cached searches.
    #[serde(default = "default_cache_capacity")]
    pub cache_capacity: usize,

    /// Lifetime of a cached search in seconds.
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,

    /// Clear the search cache after every successful write.
    #[serde(default)]
    pub invalidate_cache_on_write: bool,

    /// Debug mode: verbose logging and no log file.
    #[serde(default)]
    pub debug: bool,

    /// Log file written alongside console output when not in debug mode.
    #[serde(default)]
    pub log_file: Option<PathBuf>,

    /// Emit console logs as JSON lines.
    #[serde(default)]
    pub log_json: bool,
}

fn default_db_path() -> PathBuf {
    PathBuf::from("./contacts.db")
}

fn default_bind_address() -> String {
    "127.0.0.1:5000".into()
}

fn default_cache_capacity() -> usize {
    DEFAULT_CAPACITY.get()
}

fn default_cache_ttl_secs() -> u64 {
    30
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
            bind_address: default_bind_address(),
            cache_capacity: default_cache_capacity(),
            cache_ttl_secs: default_cache_ttl_secs(),
            invalidate_cache_on_write: false,
            debug: false,
            log_file: None,
            log_json: false,
        }
    }
}

impl AppConfig {
    /// Cache TTL as Duration.
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    /// Cache capacity, falling back to the default for a zero value.
    pub fn cache_capacity(&self) -> NonZeroUsize {
        NonZeroUsize::new(self.cache_capacity).unwrap_or(DEFAULT_CAPACITY)
    }

    /// Parsed listen address.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if `bind_address` is not `host:port`.
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        self.bind_address.parse().map_err(|e: std::net::AddrParseError| ConfigError::Invalid {
            field: "bind_address".into(),
            reason: e.to_string(),
        })
    }

    /// Default log filter directive for the configured mode.
    pub fn log_level(&self) -> &'static str {
        if self.debug { "debug" } else { "info" }
    }

    /// Load configuration from all sources with layered precedence.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - Configuration file cannot be read
    /// - Environment variables cannot be parsed
    /// - Validation fails after loading
    pub fn load() -> Result<Self, ConfigError> {
        let config: Self = Self::figment()
            .extract()
            .map_err(|e| ConfigError::LoadFailed(e.to_string()))?;

        config.validate()?;

        Ok(config)
    }

    /// The layered provider stack used by [`AppConfig::load`].
    pub fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Ok(config_path) = std::env::var(CONFIG_FILE_ENV) {
            figment = figment.merge(Toml::file(&config_path));
        }

        figment.merge(
            Env::prefixed(ENV_PREFIX)
                .map(|key| key.as_str().to_lowercase().into())
                .split("__"),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.db_path, PathBuf::from("./contacts.db"));
        assert_eq!(config.bind_address, "127.0.0.1:5000");
        assert_eq!(config.cache_capacity, 100);
        assert_eq!(config.cache_ttl_secs, 30);
        assert!(!config.invalidate_cache_on_write);
        assert!(!config.debug);
        assert!(config.log_file.is_none());
        assert!(!config.log_json);
    }

    #[test]
    fn test_cache_settings() {
        let config = AppConfig::default();
        assert_eq!(config.cache_ttl(), Duration::from_secs(30));
        assert_eq!(config.cache_capacity().get(), 100);

        let config = AppConfig { cache_capacity: 0, ..Default::default() };
        assert_eq!(config.cache_capacity(), DEFAULT_CAPACITY);
    }

    #[test]
    fn test_socket_addr() {
        let config = AppConfig::default();
        assert_eq!(config.socket_addr().unwrap().port(), 5000);

        let config = AppConfig { bind_address: "nowhere".into(), ..Default::default() };
        assert!(matches!(config.socket_addr(), Err(ConfigError::Invalid { field, .. }) if field == "bind_address"));
    }

    #[test]
    fn test_log_level() {
        assert_eq!(AppConfig::default().log_level(), "info");
        assert_eq!(AppConfig { debug: true, ..Default::default() }.log_level(), "debug");
    }

    #[test]
    fn test_layered_loading() {
        figment::Jail::expect_with(|jail| {
            jail.create_file("contact-book.toml", "cache_ttl_secs = 5\ndebug = true\n")?;
            jail.set_env("CONTACT_BOOK_CONFIG_FILE", "contact-book.toml");
            jail.set_env("CONTACT_BOOK_CACHE_TTL_SECS", "10");
            jail.set_env("CONTACT_BOOK_DB_PATH", "/tmp/other.db");

            let config = AppConfig::load().map_err(|e| e.to_string())?;
            assert_eq!(config.cache_ttl_secs, 10);
            assert!(config.debug);
            assert_eq!(config.db_path, PathBuf::from("/tmp/other.db"));
            assert_eq!(config.cache_capacity, 100);
            Ok(())
        });
    }

    #[test]
    fn test_load_rejects_invalid_values() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("CONTACT_BOOK_CACHE_CAPACITY", "0");
            let result = AppConfig::load();
            assert!(matches!(result, Err(ConfigError::Invalid { field, .. }) if field == "cache_capacity"));
            Ok(())
        });
    }
}
