//! Error types for the token ticker

use thiserror::Error;

/// Errors that can occur when fetching a snapshot from a provider
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Network request failed
    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    /// Timeout waiting for response
    #[error("Request timeout")]
    Timeout,

    /// Rate limit exceeded
    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    /// Provider answered with a non-success status
    #[error("Provider API error: {0}")]
    ApiError(String),

    /// Body could not be decoded or lacks a required object
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// The token has no trading pair listed
    #[error("Token pair data not found for {0}")]
    PairNotFound(String),
}

impl ProviderError {
    /// Maps a reqwest error, pulling timeouts out into their own variant
    pub fn from_request(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else {
            Self::NetworkError(err)
        }
    }

    /// Creates an InvalidResponse error
    pub fn invalid_response(msg: impl Into<String>) -> Self {
        Self::InvalidResponse(msg.into())
    }

    /// Creates a PairNotFound error
    pub fn pair_not_found(token_address: &str) -> Self {
        Self::PairNotFound(token_address.to_string())
    }
}

/// Errors raised while building a configuration
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A setting carried a value that cannot be used
    #[error("Invalid value {value:?} for {key}: {reason}")]
    InvalidValue {
        key: String,
        value: String,
        reason: String,
    },
}

impl ConfigError {
    /// Creates an InvalidValue error
    pub fn invalid(key: &str, value: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            key: key.to_string(),
            value: value.into(),
            reason: reason.into(),
        }
    }
}

/// Errors raised while building a poller
#[derive(Debug, Error)]
pub enum PollerError {
    /// The configuration was rejected by `PollerConfig::validate`
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    /// The HTTP client could not be built
    #[error(transparent)]
    Provider(#[from] ProviderError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_message() {
        let err = ConfigError::invalid("TICKER_POLL_INTERVAL_MS", "abc", "not an integer");
        assert_eq!(
            err.to_string(),
            "Invalid value \"abc\" for TICKER_POLL_INTERVAL_MS: not an integer"
        );
    }

    #[test]
    fn test_pair_not_found_message() {
        let err = ProviderError::pair_not_found("abc123");
        assert_eq!(err.to_string(), "Token pair data not found for abc123");
    }
}
