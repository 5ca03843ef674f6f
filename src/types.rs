//! Types for the token ticker

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Latest known market figures for the tracked token
///
/// All fields start at zero and are only ever replaced as a group, so a
/// snapshot never carries values from two different responses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TokenSnapshot {
    /// Unit price in USD
    pub price: f64,

    /// Fully-diluted valuation in USD
    pub market_cap: f64,

    /// Trailing 24h traded volume in USD
    pub volume_24h: f64,

    /// 24h price change, in percent
    pub price_change_24h: f64,
}

impl TokenSnapshot {
    /// Create a new snapshot
    pub fn new(price: f64, market_cap: f64, volume_24h: f64, price_change_24h: f64) -> Self {
        Self {
            price,
            market_cap,
            volume_24h,
            price_change_24h,
        }
    }

    /// Direction of the 24h change, used to pick the display treatment
    pub fn change_direction(&self) -> ChangeDirection {
        ChangeDirection::from_change(self.price_change_24h)
    }
}

/// Whether the 24h change is shown as a gain or a loss
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeDirection {
    /// Change is zero or positive
    Up,
    /// Change is negative
    Down,
}

impl ChangeDirection {
    pub fn from_change(change: f64) -> Self {
        if change >= 0.0 || change.is_nan() {
            ChangeDirection::Up
        } else {
            ChangeDirection::Down
        }
    }
}

/// Outcome of a single poll tick, broadcast to event subscribers
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TickerEvent {
    /// A fetch succeeded and the snapshot was published
    SnapshotUpdated {
        id: Uuid,
        snapshot: TokenSnapshot,
        timestamp: DateTime<Utc>,
    },

    /// A fetch failed; the previous snapshot stays in place
    FetchFailed {
        id: Uuid,
        error_message: String,
        timestamp: DateTime<Utc>,
    },
}

impl TickerEvent {
    /// Get the event ID
    pub fn id(&self) -> Uuid {
        match self {
            TickerEvent::SnapshotUpdated { id, .. } => *id,
            TickerEvent::FetchFailed { id, .. } => *id,
        }
    }

    /// Get the event type as string
    pub fn event_type(&self) -> &'static str {
        match self {
            TickerEvent::SnapshotUpdated { .. } => "SNAPSHOT_UPDATED",
            TickerEvent::FetchFailed { .. } => "FETCH_FAILED",
        }
    }
}

impl std::fmt::Display for TickerEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TickerEvent::SnapshotUpdated { snapshot, .. } => {
                write!(
                    f,
                    "Snapshot updated: price={} change={:.2}%",
                    snapshot.price, snapshot.price_change_24h
                )
            }
            TickerEvent::FetchFailed { error_message, .. } => {
                write!(f, "Fetch failed: {}", error_message)
            }
        }
    }
}

/// Overall poller health status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HealthStatus {
    /// A recent fetch succeeded
    Healthy,
    /// Data exists but has not been refreshed within the stale threshold
    Degraded,
    /// No fetch has succeeded yet
    Unhealthy,
}

/// Component health information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentHealth {
    /// Component name
    pub name: String,
    /// Component status
    pub status: HealthStatus,
    /// Optional status message
    pub message: Option<String>,
    /// Component-specific details
    pub details: std::collections::HashMap<String, serde_json::Value>,
    /// Last checked timestamp
    pub last_checked: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_snapshot_is_zero() {
        let snapshot = TokenSnapshot::default();
        assert_eq!(snapshot, TokenSnapshot::new(0.0, 0.0, 0.0, 0.0));
        assert_eq!(snapshot.change_direction(), ChangeDirection::Up);
    }

    #[test]
    fn test_change_direction() {
        assert_eq!(ChangeDirection::from_change(4.2), ChangeDirection::Up);
        assert_eq!(ChangeDirection::from_change(0.0), ChangeDirection::Up);
        assert_eq!(ChangeDirection::from_change(-0.01), ChangeDirection::Down);
    }

    #[test]
    fn test_event_serialization_tag() {
        let event = TickerEvent::FetchFailed {
            id: Uuid::new_v4(),
            error_message: "boom".to_string(),
            timestamp: Utc::now(),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "FETCH_FAILED");
        assert_eq!(event.event_type(), "FETCH_FAILED");
        assert_eq!(event.to_string(), "Fetch failed: boom");
    }
}
