//! Availability cache.

use std::sync::Arc;

use tokio::sync::watch;

use super::model::{AvailabilityRecord, AvailabilitySnapshot};

/// Holds the latest [`AvailabilitySnapshot`].
///
/// Single writer (the refresh scheduler), many readers. Readers take an
/// `Arc` to the current snapshot and iterate it without locking; `replace`
/// swaps the whole snapshot in one step.
pub struct AvailabilityCache {
    tx: watch::Sender<Arc<AvailabilitySnapshot>>,
}

impl AvailabilityCache {
    /// Create a cache holding an empty snapshot.
    pub fn new() -> Self {
        let (tx, _) = watch::channel(Arc::new(AvailabilitySnapshot::empty()));
        Self { tx }
    }

    /// Replace the current snapshot and notify subscribers.
    pub fn replace(&self, snapshot: AvailabilitySnapshot) -> Arc<AvailabilitySnapshot> {
        let snapshot = Arc::new(snapshot);
        self.tx.send_replace(Arc::clone(&snapshot));
        tracing::debug!(records = snapshot.len(), "Availability snapshot replaced");
        snapshot
    }

    /// Current snapshot.
    pub fn snapshot(&self) -> Arc<AvailabilitySnapshot> {
        Arc::clone(&self.tx.borrow())
    }

    /// Availability of one facility in the current snapshot.
    pub fn get(&self, facility_id: &str) -> Option<AvailabilityRecord> {
        self.tx.borrow().get(facility_id).cloned()
    }

    /// Subscribe to snapshot replacements.
    ///
    /// The receiver observes the current snapshot on its first `changed()`
    /// call. Dropping it unsubscribes.
    pub fn subscribe(&self) -> watch::Receiver<Arc<AvailabilitySnapshot>> {
        let mut rx = self.tx.subscribe();
        rx.mark_changed();
        rx
    }
}

impl Default for AvailabilityCache {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::availability::{LotAvailability, LotType};

    fn snapshot_with(id: &str, available: u32, total: u32) -> AvailabilitySnapshot {
        AvailabilitySnapshot::new(
            vec![AvailabilityRecord::new(
                id,
                vec![LotAvailability::new(LotType::Car, available, total)],
                "2024-03-01T10:00:00",
            )],
            None,
        )
    }

    #[test]
    fn test_starts_empty() {
        let cache = AvailabilityCache::new();
        assert!(cache.snapshot().is_empty());
        assert!(cache.get("F1").is_none());
    }

    #[test]
    fn test_replace_is_wholesale() {
        let cache = AvailabilityCache::new();
        cache.replace(snapshot_with("F1", 5, 10));
        let held = cache.snapshot();

        cache.replace(snapshot_with("F2", 1, 2));
        assert!(cache.get("F1").is_none());
        assert_eq!(cache.get("F2").unwrap().car().unwrap().available, 1);

        // A reader holding the old snapshot still sees it intact
        assert_eq!(held.get("F1").unwrap().car().unwrap().available, 5);
    }

    #[tokio::test]
    async fn test_subscribers_see_current_then_replacements() {
        let cache = AvailabilityCache::new();
        cache.replace(snapshot_with("F1", 5, 10));

        let mut rx = cache.subscribe();
        rx.changed().await.unwrap();
        assert!(rx.borrow_and_update().get("F1").is_some());

        cache.replace(snapshot_with("F2", 1, 2));
        rx.changed().await.unwrap();
        assert!(rx.borrow_and_update().get("F2").is_some());
    }
}
