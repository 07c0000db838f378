//! Configuration for the booking client.
//!
//! Loads from environment variables with sensible defaults.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Client configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Base URL of the booking API (no trailing slash)
    pub api_base_url: String,
    /// Where the bearer token is persisted between runs
    pub token_path: PathBuf,
    /// Interval between background list refreshes
    pub poll_interval: Duration,
    /// Simulated gateway processing delay before a payment call
    pub payment_delay: Duration,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// | Variable                       | Default                  |
    /// |--------------------------------|--------------------------|
    /// | `CONCIERGE_API_BASE_URL`       | `http://localhost:8000`  |
    /// | `CONCIERGE_TOKEN_PATH`         | `.concierge-token`       |
    /// | `CONCIERGE_POLL_INTERVAL_SECS` | `30`                     |
    /// | `CONCIERGE_PAYMENT_DELAY_MS`   | `1000`                   |
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            api_base_url: env::var("CONCIERGE_API_BASE_URL")
                .unwrap_or_else(|_| "http://localhost:8000".to_string()),
            token_path: env::var("CONCIERGE_TOKEN_PATH")
                .map_or_else(|_| PathBuf::from(".concierge-token"), PathBuf::from),
            poll_interval: Duration::from_secs(
                env::var("CONCIERGE_POLL_INTERVAL_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(30),
            ),
            payment_delay: Duration::from_millis(
                env::var("CONCIERGE_PAYMENT_DELAY_MS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(1000),
            ),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:8000".to_string(),
            token_path: PathBuf::from(".concierge-token"),
            poll_interval: Duration::from_secs(30),
            payment_delay: Duration::from_millis(1000),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let config = Config::default();
        assert_eq!(config.api_base_url, "http://localhost:8000");
        assert_eq!(config.poll_interval, Duration::from_secs(30));
        assert_eq!(config.payment_delay, Duration::from_millis(1000));
    }
}
