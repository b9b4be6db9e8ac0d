//! Configuration validation rules.
//!
//! This module provides validation logic for `AppConfig` values
//! after they have been loaded from environment, files, or defaults.

use crate::config::AppConfig;
use thiserror::Error;

/// Largest accepted search cache capacity.
const MAX_CACHE_CAPACITY: usize = 100_000;

/// Longest accepted search cache TTL (one day).
const MAX_CACHE_TTL_SECS: u64 = 86_400;

/// Configuration validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    LoadFailed(String),

    #[error("invalid configuration: {field} - {reason}")]
    Invalid { field: String, reason: String },
}

impl AppConfig {
    /// Validate configuration values after loading.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if:
    /// - `db_path` is empty
    /// - `bind_address` is not a socket address
    /// - `cache_capacity` is 0 or exceeds 100000
    /// - `cache_ttl_secs` is 0 or exceeds one day
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.db_path.as_os_str().is_empty() {
            return Err(ConfigError::Invalid { field: "db_path".into(), reason: "must not be empty".into() });
        }

        self.socket_addr()?;

        if self.cache_capacity == 0 {
            return Err(ConfigError::Invalid {
                field: "cache_capacity".into(),
                reason: "must be greater than 0".into(),
            });
        }
        if self.cache_capacity > MAX_CACHE_CAPACITY {
            return Err(ConfigError::Invalid {
                field: "cache_capacity".into(),
                reason: format!("must not exceed {MAX_CACHE_CAPACITY}"),
            });
        }

        if self.cache_ttl_secs == 0 {
            return Err(ConfigError::Invalid { field: "cache_ttl_secs".into(), reason: "must be at least 1s".into() });
        }
        if self.cache_ttl_secs > MAX_CACHE_TTL_SECS {
            return Err(ConfigError::Invalid {
                field: "cache_ttl_secs".into(),
                reason: "must not exceed one day (86400s)".into(),
            });
        }

        if self.debug && self.log_file.is_some() {
            tracing::warn!("log_file is ignored in debug mode; logging to console only");
        }

        Ok(())
    }
}
