//! In-memory snapshot store owned by the consuming view

use crate::{constants::STALE_THRESHOLD_SECS, types::TokenSnapshot};
use chrono::{DateTime, Utc};
use std::sync::{PoisonError, RwLock};

#[derive(Debug, Default)]
struct StoreState {
    snapshot: TokenSnapshot,
    last_updated: Option<DateTime<Utc>>,
    disposed: bool,
}

/// Holds the most recent snapshot for one view
///
/// Created with a zero snapshot, replaced wholesale by `update`, and
/// frozen by `dispose` once the view goes away. The snapshot and its
/// timestamp sit behind one lock so readers never observe a mix of two
/// updates.
#[derive(Debug, Default)]
pub struct SnapshotStore {
    state: RwLock<StoreState>,
}

impl SnapshotStore {
    /// Creates a store holding the zero snapshot
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the current snapshot
    ///
    /// # Returns
    /// False if the store has been disposed and the update was dropped
    pub fn update(&self, snapshot: TokenSnapshot) -> bool {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        if state.disposed {
            tracing::debug!("Dropping snapshot update for disposed store");
            return false;
        }

        state.snapshot = snapshot;
        state.last_updated = Some(Utc::now());
        true
    }

    /// Returns the current snapshot
    pub fn snapshot(&self) -> TokenSnapshot {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .snapshot
    }

    /// When the snapshot was last replaced, if ever
    pub fn last_updated(&self) -> Option<DateTime<Utc>> {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .last_updated
    }

    /// True if no update has landed within the stale threshold
    pub fn is_stale(&self) -> bool {
        self.is_stale_after(STALE_THRESHOLD_SECS)
    }

    /// True if no update has landed within `threshold_secs`
    pub fn is_stale_after(&self, threshold_secs: u64) -> bool {
        match self.last_updated() {
            Some(at) => Utc::now().signed_duration_since(at).num_seconds() > threshold_secs as i64,
            None => true,
        }
    }

    /// Stops accepting updates. Calling it again is a no-op.
    pub fn dispose(&self) {
        self.state
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .disposed = true;
    }

    pub fn is_disposed(&self) -> bool {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .disposed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_at_zero() {
        let store = SnapshotStore::new();
        assert_eq!(store.snapshot(), TokenSnapshot::default());
        assert!(store.last_updated().is_none());
        assert!(store.is_stale());
    }

    #[test]
    fn test_update_replaces_whole_snapshot() {
        let store = SnapshotStore::new();
        let first = TokenSnapshot::new(1.0, 2.0, 3.0, 4.0);
        let second = TokenSnapshot::new(5.0, 6.0, 7.0, -8.0);

        assert!(store.update(first));
        assert_eq!(store.snapshot(), first);
        assert!(store.update(second));
        assert_eq!(store.snapshot(), second);
        assert!(!store.is_stale());
    }

    #[test]
    fn test_dispose_freezes_store() {
        let store = SnapshotStore::new();
        let snapshot = TokenSnapshot::new(1.0, 2.0, 3.0, 4.0);
        store.update(snapshot);

        store.dispose();
        store.dispose();
        assert!(store.is_disposed());
        assert!(!store.update(TokenSnapshot::new(9.0, 9.0, 9.0, 9.0)));
        assert_eq!(store.snapshot(), snapshot);
    }

    #[test]
    fn test_concurrent_readers_never_see_mixed_fields() {
        use std::sync::Arc;

        let store = Arc::new(SnapshotStore::new());
        let writer = {
            let store = store.clone();
            std::thread::spawn(move || {
                for i in 1..=2000 {
                    let v = i as f64;
                    store.update(TokenSnapshot::new(v, v, v, v));
                }
            })
        };

        for _ in 0..2000 {
            let s = store.snapshot();
            assert_eq!(s.price, s.market_cap);
            assert_eq!(s.price, s.volume_24h);
            assert_eq!(s.price, s.price_change_24h);
        }
        writer.join().unwrap();
    }
}
