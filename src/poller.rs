//! Market data poller
//!
//! Drives a fixed-interval fetch of one token's snapshot and hands every
//! successful result to the caller's `on_update` callback.

use crate::{
    config::PollerConfig,
    constants::{EVENT_CHANNEL_CAPACITY, STALE_THRESHOLD_SECS},
    error::{ConfigError, PollerError, ProviderError},
    metrics::{MetricsCollector, ProviderMetrics},
    provider::SnapshotProvider,
    providers::DexScreenerProvider,
    types::{ComponentHealth, HealthStatus, TickerEvent, TokenSnapshot},
};
use chrono::{DateTime, Utc};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Instant;
use tokio::sync::{broadcast, RwLock};
use tokio::task::{JoinHandle, JoinSet};
use tokio::time::{self, MissedTickBehavior};
use uuid::Uuid;

type UpdateCallback = Box<dyn Fn(TokenSnapshot) + Send + Sync>;

/// Market Data Poller
///
/// Polls a `SnapshotProvider` for one token on a fixed interval. Failures
/// are logged and skipped; the interval itself is the retry policy.
///
/// # Example
/// ```no_run
/// use std::sync::Arc;
/// use token_ticker::{MarketDataPoller, PollerConfig, SnapshotStore};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let poller = MarketDataPoller::new(PollerConfig::default())?;
/// let store = Arc::new(SnapshotStore::new());
///
/// let sink = store.clone();
/// let handle = poller.start(move |snapshot| {
///     sink.update(snapshot);
/// });
///
/// // ... render `store.snapshot()` as needed ...
///
/// handle.cancel();
/// store.dispose();
/// # Ok(())
/// # }
/// ```
pub struct MarketDataPoller {
    provider: Arc<dyn SnapshotProvider>,
    config: PollerConfig,
    metrics: Arc<MetricsCollector>,
    events: broadcast::Sender<TickerEvent>,
    last_success: Arc<RwLock<Option<DateTime<Utc>>>>,
}

impl MarketDataPoller {
    /// Creates a poller backed by the DexScreener API
    ///
    /// Fails if `config` does not pass `PollerConfig::validate`.
    pub fn new(config: PollerConfig) -> Result<Self, PollerError> {
        config.validate()?;
        let provider =
            DexScreenerProvider::with_options(&config.api_url, config.request_timeout)?;
        Ok(Self::with_provider(Arc::new(provider), config)?)
    }

    /// Creates a poller with a custom provider
    ///
    /// This is primarily for testing with mock providers.
    pub fn with_provider(
        provider: Arc<dyn SnapshotProvider>,
        config: PollerConfig,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let metrics = Arc::new(MetricsCollector::new(provider.provider_name()));
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);

        Ok(Self {
            provider,
            config,
            metrics,
            events,
            last_success: Arc::new(RwLock::new(None)),
        })
    }

    pub fn config(&self) -> &PollerConfig {
        &self.config
    }

    /// Returns the name of the current provider
    pub fn provider_name(&self) -> &str {
        self.provider.provider_name()
    }

    /// Starts polling
    ///
    /// Fires one fetch right away and then one per interval. Each successful
    /// fetch calls `on_update` with the complete new snapshot. A tick is
    /// skipped while `max_in_flight` fetches are still outstanding.
    ///
    /// With `max_in_flight > 1`, fetches may complete out of order and the
    /// last one to complete wins, even if it was issued earlier.
    ///
    /// The returned handle must be cancelled (or dropped) when the consumer
    /// goes away. `on_update` must not cancel its own handle.
    pub fn start<F>(&self, on_update: F) -> PollHandle
    where
        F: Fn(TokenSnapshot) + Send + Sync + 'static,
    {
        let gate = Arc::new(PublishGate::new(Box::new(on_update)));
        let ctx = TickContext {
            provider: self.provider.clone(),
            token_address: self.config.token_address.clone(),
            metrics: self.metrics.clone(),
            events: self.events.clone(),
            last_success: self.last_success.clone(),
            gate: gate.clone(),
        };
        let interval = self.config.poll_interval;
        let max_in_flight = self.config.max_in_flight.max(1);

        let task = tokio::spawn(async move {
            tracing::info!(
                token = %ctx.token_address,
                provider = ctx.provider.provider_name(),
                interval_ms = interval.as_millis() as u64,
                "Starting market data poller"
            );

            let mut ticker = time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            let mut in_flight = JoinSet::new();

            loop {
                tokio::select! {
                    biased;

                    Some(joined) = in_flight.join_next() => {
                        if let Err(e) = joined {
                            if e.is_panic() {
                                tracing::error!(error = %e, "Poll tick panicked");
                            }
                        }
                    }

                    _ = ticker.tick() => {
                        if in_flight.len() >= max_in_flight {
                            tracing::debug!(
                                in_flight = in_flight.len(),
                                "Fetch still in flight, skipping tick"
                            );
                            ctx.metrics.record_skipped_tick().await;
                            continue;
                        }
                        in_flight.spawn(ctx.clone().run_tick());
                    }
                }
            }
        });

        PollHandle { gate, task }
    }

    /// Fetches one snapshot immediately, outside of any polling loop
    pub async fn fetch_once(&self) -> Result<TokenSnapshot, ProviderError> {
        let snapshot = fetch_and_record(
            self.provider.as_ref(),
            &self.config.token_address,
            &self.metrics,
        )
        .await?;
        *self.last_success.write().await = Some(Utc::now());
        Ok(snapshot)
    }

    /// Subscribes to per-tick outcome events
    pub fn subscribe_events(&self) -> broadcast::Receiver<TickerEvent> {
        self.events.subscribe()
    }

    /// Gets fetch metrics including latency percentiles and success rate
    pub async fn provider_metrics(&self) -> ProviderMetrics {
        self.metrics.get_metrics().await
    }

    /// When the last fetch succeeded, if ever
    pub async fn last_success(&self) -> Option<DateTime<Utc>> {
        *self.last_success.read().await
    }

    /// Perform a health check on the poller
    ///
    /// # Returns
    /// ComponentHealth describing how fresh the last successful fetch is
    pub async fn health_check(&self) -> ComponentHealth {
        let mut details = std::collections::HashMap::new();
        let metrics = self.provider_metrics().await;
        let last_success = self.last_success().await;

        details.insert(
            "provider_name".to_string(),
            serde_json::json!(self.provider_name()),
        );
        details.insert(
            "token_address".to_string(),
            serde_json::json!(self.config.token_address),
        );
        details.insert(
            "total_requests".to_string(),
            serde_json::json!(metrics.total_requests),
        );
        details.insert(
            "success_rate".to_string(),
            serde_json::json!(metrics.success_rate),
        );
        details.insert(
            "last_success".to_string(),
            serde_json::json!(last_success.map(|at| at.to_rfc3339())),
        );

        let status = match last_success {
            None => HealthStatus::Unhealthy,
            Some(at)
                if Utc::now().signed_duration_since(at).num_seconds()
                    > STALE_THRESHOLD_SECS as i64 =>
            {
                HealthStatus::Degraded
            }
            Some(_) => HealthStatus::Healthy,
        };

        let message = match status {
            HealthStatus::Healthy => "Market data poller is receiving fresh data".to_string(),
            HealthStatus::Degraded => format!(
                "No successful fetch in the last {} seconds",
                STALE_THRESHOLD_SECS
            ),
            HealthStatus::Unhealthy => "No successful fetch yet".to_string(),
        };

        ComponentHealth {
            name: "market_data_poller".to_string(),
            status,
            message: Some(message),
            details,
            last_checked: Utc::now(),
        }
    }
}

/// Cancel handle returned by `MarketDataPoller::start`
///
/// Cancelling stops the timer, aborts outstanding fetches and guarantees
/// that no `on_update` call begins afterwards. Dropping the handle cancels.
pub struct PollHandle {
    gate: Arc<PublishGate>,
    task: JoinHandle<()>,
}

impl PollHandle {
    /// Stops polling. Safe to call more than once.
    pub fn cancel(&self) {
        if self.gate.close() {
            tracing::info!("Market data poller cancelled");
        }
        self.task.abort();
    }

    pub fn is_cancelled(&self) -> bool {
        self.gate.is_closed()
    }
}

impl Drop for PollHandle {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Serializes callback invocations against cancellation
struct PublishGate {
    closed: Mutex<bool>,
    on_update: UpdateCallback,
}

impl PublishGate {
    fn new(on_update: UpdateCallback) -> Self {
        Self {
            closed: Mutex::new(false),
            on_update,
        }
    }

    /// Invokes the callback unless the gate is closed
    fn publish(&self, snapshot: TokenSnapshot) -> bool {
        let closed = self.closed.lock().unwrap_or_else(PoisonError::into_inner);
        if *closed {
            return false;
        }
        (self.on_update)(snapshot);
        true
    }

    /// Closes the gate, returning true on the first call
    fn close(&self) -> bool {
        let mut closed = self.closed.lock().unwrap_or_else(PoisonError::into_inner);
        !std::mem::replace(&mut *closed, true)
    }

    fn is_closed(&self) -> bool {
        *self.closed.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Everything one tick needs, cloned into its task
#[derive(Clone)]
struct TickContext {
    provider: Arc<dyn SnapshotProvider>,
    token_address: String,
    metrics: Arc<MetricsCollector>,
    events: broadcast::Sender<TickerEvent>,
    last_success: Arc<RwLock<Option<DateTime<Utc>>>>,
    gate: Arc<PublishGate>,
}

impl TickContext {
    async fn run_tick(self) {
        let id = Uuid::new_v4();

        match fetch_and_record(self.provider.as_ref(), &self.token_address, &self.metrics).await {
            Ok(snapshot) => {
                if !self.gate.publish(snapshot) {
                    return;
                }
                let now = Utc::now();
                *self.last_success.write().await = Some(now);

                tracing::debug!(
                    tick_id = %id,
                    price = snapshot.price,
                    market_cap = snapshot.market_cap,
                    volume_24h = snapshot.volume_24h,
                    price_change_24h = snapshot.price_change_24h,
                    "Published token snapshot"
                );
                let _ = self.events.send(TickerEvent::SnapshotUpdated {
                    id,
                    snapshot,
                    timestamp: now,
                });
            }
            Err(e) => {
                tracing::warn!(
                    tick_id = %id,
                    provider = self.provider.provider_name(),
                    error = %e,
                    "Failed to fetch token snapshot"
                );
                let _ = self.events.send(TickerEvent::FetchFailed {
                    id,
                    error_message: e.to_string(),
                    timestamp: Utc::now(),
                });
            }
        }
    }
}

/// Runs one fetch and records its latency and outcome
async fn fetch_and_record(
    provider: &dyn SnapshotProvider,
    token_address: &str,
    metrics: &MetricsCollector,
) -> Result<TokenSnapshot, ProviderError> {
    let start = Instant::now();
    let result = provider.fetch_snapshot(token_address).await;
    metrics.record_request(start.elapsed(), result.is_ok()).await;
    result
}
