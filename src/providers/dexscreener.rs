//! DexScreener snapshot provider implementation

use crate::{
    constants::{DEXSCREENER_API_URL, DEXSCREENER_TOKENS_ENDPOINT, REQUEST_TIMEOUT_SECS, USER_AGENT},
    error::ProviderError,
    provider::SnapshotProvider,
    types::TokenSnapshot,
};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;

/// DexScreener API response for token lookups
///
/// `pairs` comes back as `null` for tokens without any listed pair. Pairs
/// stay raw JSON; only the first one is ever read, so malformed pairs
/// further down the list cannot fail the lookup.
#[derive(Debug, Deserialize)]
struct TokenPairsResponse {
    #[serde(default)]
    pairs: Option<Vec<Value>>,
}

/// DexScreener snapshot provider
pub struct DexScreenerProvider {
    client: Client,
    base_url: String,
}

impl DexScreenerProvider {
    /// Creates a new DexScreener provider against the public API
    pub fn new() -> Result<Self, ProviderError> {
        Self::with_options(
            DEXSCREENER_API_URL,
            Duration::from_secs(REQUEST_TIMEOUT_SECS),
        )
    }

    /// Creates a provider against `base_url` with a per-request timeout
    pub fn with_options(base_url: &str, timeout: Duration) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(ProviderError::NetworkError)?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Builds the DexScreener API URL for a token
    fn build_url(&self, token_address: &str) -> String {
        format!(
            "{}{}/{}",
            self.base_url, DEXSCREENER_TOKENS_ENDPOINT, token_address
        )
    }
}

/// Parses a DexScreener token response body into a snapshot
///
/// Uses the first listed pair only. A missing pair, or a pair without its
/// `volume` / `priceChange` objects, is an error; any individual value that
/// is not a finite number becomes zero.
pub fn parse_response(body: &str, token_address: &str) -> Result<TokenSnapshot, ProviderError> {
    let response: TokenPairsResponse = serde_json::from_str(body).map_err(|e| {
        ProviderError::invalid_response(format!("Failed to parse DexScreener response: {}", e))
    })?;

    let pair = response
        .pairs
        .and_then(|pairs| pairs.into_iter().next())
        .filter(|pair| !pair.is_null())
        .ok_or_else(|| ProviderError::pair_not_found(token_address))?;

    let volume = windowed(&pair, "volume")?;
    let price_change = windowed(&pair, "priceChange")?;

    Ok(TokenSnapshot::new(
        field_number(&pair, "priceUsd"),
        field_number(&pair, "fdv"),
        field_number(volume, "h24"),
        field_number(price_change, "h24"),
    ))
}

/// Looks up a per-window object such as `volume`; absent or `null` is a
/// shape failure, anything else is handed on and read leniently
fn windowed<'a>(pair: &'a Value, key: &str) -> Result<&'a Value, ProviderError> {
    match pair.get(key) {
        None | Some(Value::Null) => Err(ProviderError::invalid_response(format!(
            "pair is missing `{}`",
            key
        ))),
        Some(value) => Ok(value),
    }
}

/// Reads `key` from a JSON object as a number, zero if absent or unusable
fn field_number(object: &Value, key: &str) -> f64 {
    object.get(key).map(coerce_number).unwrap_or(0.0)
}

/// Reads a JSON number or numeric string, falling back to zero
fn coerce_number(value: &Value) -> f64 {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };

    parsed.filter(|v| v.is_finite()).unwrap_or(0.0)
}

#[async_trait]
impl SnapshotProvider for DexScreenerProvider {
    async fn fetch_snapshot(&self, token_address: &str) -> Result<TokenSnapshot, ProviderError> {
        let url = self.build_url(token_address);
        tracing::debug!(%url, "Fetching token pairs from DexScreener");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(ProviderError::from_request)?;

        // Check for rate limiting
        if response.status().as_u16() == 429 {
            return Err(ProviderError::RateLimitExceeded);
        }

        // Check for other errors
        if !response.status().is_success() {
            return Err(ProviderError::ApiError(format!(
                "HTTP {}: {}",
                response.status(),
                response.text().await.unwrap_or_default()
            )));
        }

        let body = response.text().await.map_err(ProviderError::from_request)?;
        tracing::trace!(body = %body, "Raw DexScreener response");

        parse_response(&body, token_address)
    }

    fn provider_name(&self) -> &'static str {
        "dexscreener"
    }
}
