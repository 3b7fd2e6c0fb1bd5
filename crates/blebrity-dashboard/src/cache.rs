//! Latest dashboard snapshot with lock-free reads

use arc_swap::ArcSwapOption;
use blebrity_metrics::DashboardSnapshot;
use std::sync::Arc;

/// Holds the most recent snapshot; readers never block the refresh loop
#[derive(Default)]
pub struct SnapshotCache {
    snapshot: ArcSwapOption<DashboardSnapshot>,
}

impl SnapshotCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current snapshot, `None` before the first refresh
    pub fn get(&self) -> Option<Arc<DashboardSnapshot>> {
        self.snapshot.load_full()
    }

    /// Replace the snapshot atomically
    pub fn update(&self, snapshot: Arc<DashboardSnapshot>) {
        self.snapshot.store(Some(snapshot));
    }
}
