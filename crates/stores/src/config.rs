//! Store configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All optional; each falls back to the default listed below.
//!
//! - `PEACHSTAND_PAGE_SIZE` - products fetched per listing page (default: 8)
//! - `PEACHSTAND_MAX_LINE_COUNT` - per-line quantity cap in the cart
//!   (default: 10)
//! - `PEACHSTAND_TOAST_TIMEOUT_MS` - toast auto-dismiss window in
//!   milliseconds (default: 2000)
//! - `PEACHSTAND_DEBOUNCE_MS` - filter input quiescence window in
//!   milliseconds (default: 300)
//! - `PEACHSTAND_DATA_DIR` - directory for durable cart snapshots and the
//!   persisted credential (default: `.peachstand`)

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Default products per listing page.
pub const DEFAULT_PAGE_SIZE: u32 = 8;
/// Default per-line quantity cap.
pub const DEFAULT_MAX_LINE_COUNT: u32 = 10;
/// Default toast auto-dismiss window.
pub const DEFAULT_TOAST_TIMEOUT: Duration = Duration::from_millis(2000);
/// Default filter-input debounce window.
pub const DEFAULT_DEBOUNCE_WINDOW: Duration = Duration::from_millis(300);

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Tunable knobs owned by the state layer.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Products fetched per listing page.
    pub page_size: u32,
    /// Cumulative per-line quantity cap enforced by the cart store.
    pub max_line_count: u32,
    /// Toast auto-dismiss window.
    pub toast_timeout: Duration,
    /// Quiescence window for debounced filter inputs.
    pub debounce_window: Duration,
    /// Directory for durable cart snapshots and the persisted credential.
    pub data_dir: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            max_line_count: DEFAULT_MAX_LINE_COUNT,
            toast_timeout: DEFAULT_TOAST_TIMEOUT,
            debounce_window: DEFAULT_DEBOUNCE_WINDOW,
            data_dir: PathBuf::from(".peachstand"),
        }
    }
}

impl StoreConfig {
    /// Load configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidEnvVar` if a variable is present but
    /// does not parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        Ok(Self {
            page_size: parse_env("PEACHSTAND_PAGE_SIZE", defaults.page_size)?,
            max_line_count: parse_env("PEACHSTAND_MAX_LINE_COUNT", defaults.max_line_count)?,
            toast_timeout: Duration::from_millis(parse_env(
                "PEACHSTAND_TOAST_TIMEOUT_MS",
                u64::try_from(defaults.toast_timeout.as_millis()).unwrap_or(2000),
            )?),
            debounce_window: Duration::from_millis(parse_env(
                "PEACHSTAND_DEBOUNCE_MS",
                u64::try_from(defaults.debounce_window.as_millis()).unwrap_or(300),
            )?),
            data_dir: std::env::var("PEACHSTAND_DATA_DIR")
                .map_or(defaults.data_dir, PathBuf::from),
        })
    }
}

/// Parse an optional environment variable, falling back to a default.
fn parse_env<T: std::str::FromStr>(name: &str, default: T) -> Result<T, ConfigError> {
    match std::env::var(name) {
        Ok(value) => value
            .parse()
            .map_err(|_| ConfigError::InvalidEnvVar(name.to_owned(), value)),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = StoreConfig::default();
        assert_eq!(config.page_size, DEFAULT_PAGE_SIZE);
        assert_eq!(config.max_line_count, DEFAULT_MAX_LINE_COUNT);
        assert_eq!(config.toast_timeout, Duration::from_millis(2000));
        assert_eq!(config.debounce_window, Duration::from_millis(300));
    }

    #[test]
    fn test_from_env_uses_defaults_when_unset() {
        // Variables are not set in the test environment
        let config = StoreConfig::from_env().unwrap();
        assert_eq!(config.page_size, DEFAULT_PAGE_SIZE);
    }
}
