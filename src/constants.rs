//! Constants for the token ticker
//!
//! Defaults for every setting live here. `PollerConfig::from_env` can
//! override them at runtime, but nothing else reads the environment.

/// Token tracked by default (the $DEADSTOOL mint on Solana)
pub const DEFAULT_TOKEN_ADDRESS: &str = "3cc8hXHqZdvsbvw5azbLdk4Rxse1KERtL4HaquDVpump";

/// DexScreener API base URL
pub const DEXSCREENER_API_URL: &str = "https://api.dexscreener.com";

/// DexScreener endpoint for token pair lookups, followed by the token address
pub const DEXSCREENER_TOKENS_ENDPOINT: &str = "/latest/dex/tokens";

/// How often to poll the endpoint (in milliseconds)
pub const POLL_INTERVAL_MS: u64 = 3000;

/// HTTP request timeout when fetching a snapshot (in seconds)
pub const REQUEST_TIMEOUT_SECS: u64 = 10;

/// Requests allowed in flight at once before ticks start being skipped
pub const MAX_IN_FLIGHT_REQUESTS: usize = 1;

/// How long before a snapshot is reported as stale by the health check (in seconds)
pub const STALE_THRESHOLD_SECS: u64 = 30;

/// Capacity of the tick event broadcast channel
pub const EVENT_CHANNEL_CAPACITY: usize = 64;

/// Prices below this are shown in exponential notation
pub const EXPONENTIAL_PRICE_THRESHOLD: f64 = 0.00001;

/// User agent for HTTP requests
pub const USER_AGENT: &str = "token-ticker/0.1.0";
