//! Poller configuration
//!
//! Defaults come from `constants`; `from_env` lets a deployment override
//! them without a config file.

use crate::{
    constants::{
        DEFAULT_TOKEN_ADDRESS, DEXSCREENER_API_URL, MAX_IN_FLIGHT_REQUESTS, POLL_INTERVAL_MS,
        REQUEST_TIMEOUT_SECS,
    },
    error::ConfigError,
};
use std::time::Duration;

pub const ENV_TOKEN_ADDRESS: &str = "TICKER_TOKEN_ADDRESS";
pub const ENV_API_URL: &str = "TICKER_API_URL";
pub const ENV_POLL_INTERVAL_MS: &str = "TICKER_POLL_INTERVAL_MS";
pub const ENV_REQUEST_TIMEOUT_SECS: &str = "TICKER_REQUEST_TIMEOUT_SECS";
pub const ENV_MAX_IN_FLIGHT: &str = "TICKER_MAX_IN_FLIGHT";

/// Settings for a `MarketDataPoller`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollerConfig {
    /// Token to track
    pub token_address: String,
    /// Base URL of the DexScreener API
    pub api_url: String,
    /// Time between poll ticks
    pub poll_interval: Duration,
    /// Per-request timeout
    pub request_timeout: Duration,
    /// Requests allowed in flight before ticks are skipped
    pub max_in_flight: usize,
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            token_address: DEFAULT_TOKEN_ADDRESS.to_string(),
            api_url: DEXSCREENER_API_URL.to_string(),
            poll_interval: Duration::from_millis(POLL_INTERVAL_MS),
            request_timeout: Duration::from_secs(REQUEST_TIMEOUT_SECS),
            max_in_flight: MAX_IN_FLIGHT_REQUESTS,
        }
    }
}

impl PollerConfig {
    /// Builds a config from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from an arbitrary key lookup, starting from defaults
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(address) = lookup(ENV_TOKEN_ADDRESS) {
            config.token_address = address;
        }
        if let Some(url) = lookup(ENV_API_URL) {
            config.api_url = url;
        }
        if let Some(raw) = lookup(ENV_POLL_INTERVAL_MS) {
            config.poll_interval = Duration::from_millis(parse_u64(ENV_POLL_INTERVAL_MS, &raw)?);
        }
        if let Some(raw) = lookup(ENV_REQUEST_TIMEOUT_SECS) {
            config.request_timeout =
                Duration::from_secs(parse_u64(ENV_REQUEST_TIMEOUT_SECS, &raw)?);
        }
        if let Some(raw) = lookup(ENV_MAX_IN_FLIGHT) {
            config.max_in_flight = parse_u64(ENV_MAX_IN_FLIGHT, &raw)? as usize;
        }

        config.validate()?;
        Ok(config)
    }

    /// Rejects settings the poller cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.token_address.trim().is_empty() {
            return Err(ConfigError::invalid(
                ENV_TOKEN_ADDRESS,
                self.token_address.clone(),
                "must not be empty",
            ));
        }
        if !(self.api_url.starts_with("http://") || self.api_url.starts_with("https://")) {
            return Err(ConfigError::invalid(
                ENV_API_URL,
                self.api_url.clone(),
                "must be an http(s) URL",
            ));
        }
        if self.poll_interval.is_zero() {
            return Err(ConfigError::invalid(ENV_POLL_INTERVAL_MS, "0", "must be positive"));
        }
        if self.request_timeout.is_zero() {
            return Err(ConfigError::invalid(ENV_REQUEST_TIMEOUT_SECS, "0", "must be positive"));
        }
        if self.max_in_flight == 0 {
            return Err(ConfigError::invalid(ENV_MAX_IN_FLIGHT, "0", "must be at least 1"));
        }
        Ok(())
    }
}

fn parse_u64(key: &str, raw: &str) -> Result<u64, ConfigError> {
    raw.trim()
        .parse::<u64>()
        .map_err(|_| ConfigError::invalid(key, raw, "not a non-negative integer"))
}
