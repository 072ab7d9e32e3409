//! Application configuration with layered loading.
//!
//! This module provides configuration management using figment for layered
//! configuration loading from multiple sources:
//!
//! 1. Environment variables (COURSE_NAV_*)
//! 2. TOML config file (if COURSE_NAV_CONFIG_FILE set)
//! 3. Built-in defaults

use std::path::PathBuf;
use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

mod validation;

pub use validation::{ConfigError, MAX_YEAR_SPAN};

/// Seven days, the validity window of an availability entry.
pub const DEFAULT_CACHE_TTL_MS: u64 = 7 * 24 * 60 * 60 * 1000;

/// Delay inserted before each cache-miss probe.
pub const DEFAULT_PACING_DELAY_MS: u64 = 100;

/// How probes are spaced during a sweep.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PacingMode {
    /// Sleep the full delay before every probe.
    #[default]
    Fixed,
    /// Sleep only for whatever remains of the delay since the previous probe.
    Interval,
}

/// Application configuration with layered loading.
///
/// Loading precedence (highest wins):
/// 1. Environment variables (COURSE_NAV_*)
/// 2. TOML config file (if COURSE_NAV_CONFIG_FILE set)
/// 3. Built-in defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Path to the SQLite database holding the availability slot.
    ///
    /// Set via COURSE_NAV_DB_PATH environment variable.
    #[serde(default = "default_db_path")]
    pub db_path: PathBuf,

    /// Validity window of a cached availability entry, in milliseconds.
    ///
    /// Set via COURSE_NAV_CACHE_TTL_MS environment variable.
    #[serde(default = "default_cache_ttl_ms")]
    pub cache_ttl_ms: u64,

    /// Delay before each cache-miss probe, in milliseconds.
    ///
    /// Set via COURSE_NAV_PACING_DELAY_MS environment variable.
    #[serde(default = "default_pacing_delay_ms")]
    pub pacing_delay_ms: u64,

    /// Pacing strategy: "fixed" or "interval".
    ///
    /// Set via COURSE_NAV_PACING_MODE environment variable.
    #[serde(default)]
    pub pacing_mode: PacingMode,

    /// User-Agent string for probe requests.
    ///
    /// Set via COURSE_NAV_USER_AGENT environment variable.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// HTTP request timeout in milliseconds.
    ///
    /// Set via COURSE_NAV_TIMEOUT_MS environment variable.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Origin that term URLs are generated against.
    ///
    /// Set via COURSE_NAV_CATALOG_BASE_URL environment variable.
    #[serde(default = "default_catalog_base_url")]
    pub catalog_base_url: String,

    /// Oldest year shown in the term grid.
    #[serde(default = "default_first_year")]
    pub first_year: i32,

    /// Newest year shown in the term grid.
    #[serde(default = "default_last_year")]
    pub last_year: i32,
}

fn default_db_path() -> PathBuf {
    PathBuf::from("./course-nav-cache.sqlite")
}

fn default_cache_ttl_ms() -> u64 {
    DEFAULT_CACHE_TTL_MS
}

fn default_pacing_delay_ms() -> u64 {
    DEFAULT_PACING_DELAY_MS
}

fn default_user_agent() -> String {
    "course-nav/0.1".into()
}

fn default_timeout_ms() -> u64 {
    20_000
}

fn default_catalog_base_url() -> String {
    "https://classes.berkeley.edu".into()
}

fn default_first_year() -> i32 {
    2016
}

fn default_last_year() -> i32 {
    2026
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
            cache_ttl_ms: default_cache_ttl_ms(),
            pacing_delay_ms: default_pacing_delay_ms(),
            pacing_mode: PacingMode::default(),
            user_agent: default_user_agent(),
            timeout_ms: default_timeout_ms(),
            catalog_base_url: default_catalog_base_url(),
            first_year: default_first_year(),
            last_year: default_last_year(),
        }
    }
}

impl AppConfig {
    /// Timeout as Duration for use with reqwest/tokio.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Cache TTL as Duration.
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_millis(self.cache_ttl_ms)
    }

    /// Pacing delay as Duration.
    pub fn pacing_delay(&self) -> Duration {
        Duration::from_millis(self.pacing_delay_ms)
    }

    /// Load configuration from all sources with layered precedence.
    ///
    /// Priority (highest wins):
    /// 1. Environment variables prefixed with `COURSE_NAV_`
    /// 2. TOML file from `COURSE_NAV_CONFIG_FILE` (if set)
    /// 3. Built-in defaults via `Default::default()`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - Configuration file cannot be read
    /// - Environment variables cannot be parsed
    /// - Validation fails after loading
    pub fn load() -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Ok(config_path) = std::env::var("COURSE_NAV_CONFIG_FILE") {
            figment = figment.merge(Toml::file(&config_path));
        }

        figment = figment.merge(
            Env::prefixed("COURSE_NAV_")
                .ignore(&["CONFIG_FILE"])
                .map(|key| key.as_str().to_lowercase().into())
                .split("__"),
        );

        let config: Self = figment.extract().map_err(|e| ConfigError::LoadFailed(e.to_string()))?;

        config.validate()?;

        Ok(config)
    }
}
