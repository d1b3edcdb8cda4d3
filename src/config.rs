//! Environment-driven configuration.
//!
//! Every knob has a working default; `.env` files are honored via dotenv.

use std::time::Duration;
use thiserror::Error;

use crate::api::DateUnit;

/// Transaction listing endpoint used when `TXVIEW_BASE_URL` is unset
pub const DEFAULT_BASE_URL: &str = "https://assignment.alza.app/transactions";

const DEFAULT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid TXVIEW_DATE_UNIT: {0}")]
    InvalidDateUnit(String),
    #[error("Invalid TXVIEW_TIMEOUT_SECS: {0:?} (expected whole seconds)")]
    InvalidTimeout(String),
}

#[derive(Debug, Clone)]
pub struct Config {
    /// Transaction listing endpoint (`TXVIEW_BASE_URL`)
    pub base_url: String,
    /// Wire unit for date bounds (`TXVIEW_DATE_UNIT`, `seconds` or `millis`)
    pub date_unit: DateUnit,
    /// Per-request timeout (`TXVIEW_TIMEOUT_SECS`, default 10)
    pub timeout: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let base_url =
            std::env::var("TXVIEW_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());

        let date_unit = match std::env::var("TXVIEW_DATE_UNIT") {
            Ok(raw) => raw.parse().map_err(ConfigError::InvalidDateUnit)?,
            Err(_) => DateUnit::default(),
        };

        let timeout = match std::env::var("TXVIEW_TIMEOUT_SECS") {
            Ok(raw) => {
                let secs: u64 = raw
                    .parse()
                    .map_err(|_| ConfigError::InvalidTimeout(raw.clone()))?;
                Duration::from_secs(secs)
            }
            Err(_) => Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        };

        Ok(Self {
            base_url,
            date_unit,
            timeout,
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            date_unit: DateUnit::default(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.date_unit, DateUnit::Seconds);
        assert_eq!(config.timeout, Duration::from_secs(10));
    }
}
