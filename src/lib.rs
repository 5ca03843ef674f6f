//! # Token Ticker
//!
//! Keeps a live market snapshot (price, market cap, 24h volume, 24h change)
//! of a single token by polling the DexScreener token endpoint, and formats
//! it for display.
//!
//! ## Usage
//!
//! The view owns a `SnapshotStore`, starts a poller that writes into it,
//! and cancels the poller when it goes away:
//!
//! ```no_run
//! use std::sync::Arc;
//! use token_ticker::{LiveStats, MarketDataPoller, PollerConfig, SnapshotStore};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let poller = MarketDataPoller::new(PollerConfig::from_env()?)?;
//! let store = Arc::new(SnapshotStore::new());
//!
//! let sink = store.clone();
//! let handle = poller.start(move |snapshot| {
//!     sink.update(snapshot);
//! });
//!
//! println!("{}", LiveStats::from_snapshot(&store.snapshot()));
//!
//! handle.cancel();
//! store.dispose();
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! MarketDataPoller::start
//!     ↓
//! Poll loop (first tick immediate, then every 3s)
//!     ↓
//! SnapshotProvider (DexScreener)
//!     ↓
//! on_update callback → SnapshotStore
//!     ↓
//! LiveStats (format_price, format_large_number)
//! ```
//!
//! ## Error Handling
//!
//! Fetch failures never reach the callback. They are logged, broadcast as
//! `TickerEvent::FetchFailed`, and the previous snapshot stays in place
//! until the next tick succeeds.

pub mod config;
pub mod constants;
pub mod error;
pub mod format;
pub mod metrics;
pub mod poller;
pub mod provider;
pub mod providers;
pub mod store;
pub mod types;
pub mod view;

// Re-export commonly used types
pub use config::PollerConfig;
pub use error::{ConfigError, PollerError, ProviderError};
pub use format::{format_change_percent, format_large_number, format_price};
pub use metrics::ProviderMetrics;
pub use poller::{MarketDataPoller, PollHandle};
pub use provider::SnapshotProvider;
pub use store::SnapshotStore;
pub use types::{ChangeDirection, ComponentHealth, HealthStatus, TickerEvent, TokenSnapshot};
pub use view::LiveStats;
