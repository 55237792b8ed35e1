//! Latest-snapshot hand-off between the tick thread and readers.
//!
//! The tick thread is the only writer. It replaces the held snapshot
//! after every successful tick, and readers clone the `Arc` out under a
//! short lock. A reader keeps its snapshot alive for as long as it
//! needs; the next publication never waits on it.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use eddy_grid::FieldSnapshot;

/// Holds the most recently published [`FieldSnapshot`].
#[derive(Debug, Default)]
pub struct SnapshotSlot {
    latest: Mutex<Option<Arc<FieldSnapshot>>>,
    published: AtomicU64,
}

const _: fn() = || {
    fn assert<T: Send + Sync>() {}
    assert::<SnapshotSlot>();
};

impl SnapshotSlot {
    /// An empty slot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the held snapshot. Single writer only.
    pub fn publish(&self, snapshot: Arc<FieldSnapshot>) {
        // The slot holds plain data; a poisoned lock still holds a valid value.
        let mut latest = self.latest.lock().unwrap_or_else(PoisonError::into_inner);
        debug_assert!(
            latest.as_ref().is_none_or(|prev| prev.tick() < snapshot.tick()),
            "snapshots must be published in tick order"
        );
        *latest = Some(snapshot);
        self.published.fetch_add(1, Ordering::Release);
    }

    /// The most recently published snapshot, or `None` before the first.
    pub fn latest(&self) -> Option<Arc<FieldSnapshot>> {
        self.latest
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of snapshots published into this slot.
    pub fn published(&self) -> u64 {
        self.published.load(Ordering::Acquire)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use eddy_core::{GridDims, SampleBoundary};
    use eddy_grid::FieldStore;

    fn snap(tick: u64) -> Arc<FieldSnapshot> {
        let store = FieldStore::new(GridDims::new(4, 4), SampleBoundary::Clamp).unwrap();
        Arc::new(store.snapshot(tick))
    }

    #[test]
    fn empty_until_first_publish() {
        let slot = SnapshotSlot::new();
        assert!(slot.latest().is_none());
        assert_eq!(slot.published(), 0);
    }

    #[test]
    fn latest_replaces_previous() {
        let slot = SnapshotSlot::new();
        slot.publish(snap(1));
        slot.publish(snap(2));
        assert_eq!(slot.latest().unwrap().tick(), 2);
        assert_eq!(slot.published(), 2);
    }

    #[test]
    fn reader_keeps_its_snapshot_across_publishes() {
        let slot = SnapshotSlot::new();
        slot.publish(snap(1));
        let held = slot.latest().unwrap();
        slot.publish(snap(2));
        assert_eq!(held.tick(), 1);
        assert_eq!(Arc::strong_count(&held), 1);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "tick order")]
    fn stale_publish_is_rejected() {
        let slot = SnapshotSlot::new();
        slot.publish(snap(3));
        slot.publish(snap(3));
    }
}
