//! Configuration validation rules.
//!
//! This module provides validation logic for `AppConfig` values
//! after they have been loaded from environment, files, or defaults.

use crate::config::AppConfig;
use thiserror::Error;

/// Widest `first_year..=last_year` span a term grid may cover.
pub const MAX_YEAR_SPAN: i64 = 100;

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
    /// - `cache_ttl_ms` is 0
    /// - `pacing_delay_ms` exceeds one minute
    /// - `timeout_ms` is less than 100ms or exceeds 5 minutes
    /// - `user_agent` is empty
    /// - `catalog_base_url` is not an http(s) URL
    /// - `first_year` is after `last_year`, or the span exceeds [`MAX_YEAR_SPAN`] years
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.cache_ttl_ms == 0 {
            return Err(ConfigError::Invalid { field: "cache_ttl_ms".into(), reason: "must be greater than 0".into() });
        }
        if i64::try_from(self.cache_ttl_ms).is_err() {
            return Err(ConfigError::Invalid { field: "cache_ttl_ms".into(), reason: "is out of range".into() });
        }

        if self.pacing_delay_ms > 60_000 {
            return Err(ConfigError::Invalid {
                field: "pacing_delay_ms".into(),
                reason: "must not exceed 1 minute (60000ms)".into(),
            });
        }

        if self.timeout_ms < 100 {
            return Err(ConfigError::Invalid { field: "timeout_ms".into(), reason: "must be at least 100ms".into() });
        }
        if self.timeout_ms > 300_000 {
            return Err(ConfigError::Invalid {
                field: "timeout_ms".into(),
                reason: "must not exceed 5 minutes (300000ms)".into(),
            });
        }

        if self.user_agent.is_empty() {
            return Err(ConfigError::Invalid { field: "user_agent".into(), reason: "must not be empty".into() });
        }

        match url::Url::parse(&self.catalog_base_url) {
            Ok(u) if matches!(u.scheme(), "http" | "https") => {}
            Ok(u) => {
                return Err(ConfigError::Invalid {
                    field: "catalog_base_url".into(),
                    reason: format!("unsupported scheme: {}", u.scheme()),
                });
            }
            Err(e) => {
                return Err(ConfigError::Invalid { field: "catalog_base_url".into(), reason: e.to_string() });
            }
        }

        if self.first_year > self.last_year {
            return Err(ConfigError::Invalid {
                field: "first_year".into(),
                reason: format!("{} is after last_year {}", self.first_year, self.last_year),
            });
        }

        let span = i64::from(self.last_year) - i64::from(self.first_year) + 1;
        if span > MAX_YEAR_SPAN {
            return Err(ConfigError::Invalid {
                field: "first_year".into(),
                reason: format!("year range covers {span} years, max {MAX_YEAR_SPAN}"),
            });
        }

        if self.pacing_delay_ms == 0 {
            tracing::warn!("pacing_delay_ms is 0; cache-miss probes will not be throttled");
        }

        Ok(())
    }
}
