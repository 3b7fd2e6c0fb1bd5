//! Fetch, aggregate and publish on a fixed cadence

use crate::cache::SnapshotCache;
use blebrity_common::{now, BlebrityError, Result, Timestamp};
use blebrity_metrics::{DashboardAggregator, DashboardSnapshot};
use blebrity_store::EventSource;
use std::future::Future;
use std::io::Write;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info, instrument, warn};

/// Where each snapshot is written
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputTarget {
    /// Pretty JSON on stdout
    Stdout,
    /// Pretty JSON file, replaced atomically on every refresh
    File(PathBuf),
    /// Keep the snapshot in memory only
    Discard,
}

impl From<Option<PathBuf>> for OutputTarget {
    fn from(path: Option<PathBuf>) -> Self {
        path.map_or(Self::Stdout, Self::File)
    }
}

/// Runs the fetch-then-aggregate pipeline
pub struct RefreshService {
    source: Arc<dyn EventSource>,
    aggregator: DashboardAggregator,
    cache: Arc<SnapshotCache>,
    output: OutputTarget,
    cycles: AtomicU64,
}

impl RefreshService {
    pub fn new(
        source: Arc<dyn EventSource>,
        aggregator: DashboardAggregator,
        output: OutputTarget,
    ) -> Self {
        Self {
            source,
            aggregator,
            cache: Arc::new(SnapshotCache::new()),
            output,
            cycles: AtomicU64::new(0),
        }
    }

    /// Shared handle to the latest snapshot
    pub fn cache(&self) -> Arc<SnapshotCache> {
        self.cache.clone()
    }

    /// Completed refresh cycles
    pub fn cycles(&self) -> u64 {
        self.cycles.load(Ordering::Relaxed)
    }

    /// One refresh: fetch, aggregate, publish
    ///
    /// A failed fetch is logged and aggregated as an empty batch, so the
    /// dashboard always has a well-formed snapshot. Only writing the output
    /// can fail.
    #[instrument(skip(self, now))]
    pub async fn run_cycle(&self, now: Timestamp) -> Result<Arc<DashboardSnapshot>> {
        let events = match self.source.fetch_events().await {
            Ok(events) => {
                debug!("Fetched {} events from {}", events.len(), self.source.describe());
                events
            }
            Err(e) => {
                error!("Failed to fetch events from {}: {}", self.source.describe(), e);
                Vec::new()
            }
        };

        let snapshot = Arc::new(self.aggregator.aggregate(&events, now));
        self.cache.update(snapshot.clone());
        self.cycles.fetch_add(1, Ordering::Relaxed);

        write_snapshot(&snapshot, &self.output)?;
        Ok(snapshot)
    }

    /// Refresh every `period` until `shutdown` resolves
    ///
    /// The first cycle runs immediately. A cycle whose output cannot be
    /// written is logged and the loop carries on. Shutdown also interrupts a
    /// cycle in flight, including one waiting out retry backoff; the
    /// interrupted cycle publishes nothing.
    pub async fn run<F>(&self, period: Duration, shutdown: F)
    where
        F: Future<Output = ()>,
    {
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        tokio::pin!(shutdown);

        info!("Refreshing dashboard every {}s", period.as_secs());
        loop {
            tokio::select! {
                _ = &mut shutdown => {
                    info!("Shutdown requested after {} refresh cycles", self.cycles());
                    break;
                }
                _ = ticker.tick() => {}
            }

            tokio::select! {
                _ = &mut shutdown => {
                    warn!("Shutdown requested during a refresh cycle, abandoning it");
                    break;
                }
                result = self.run_cycle(now()) => {
                    if let Err(e) = result {
                        error!("Refresh cycle failed: {}", e);
                    }
                }
            }
        }
    }
}

/// Write a snapshot as pretty JSON
pub fn write_snapshot(snapshot: &DashboardSnapshot, output: &OutputTarget) -> Result<()> {
    match output {
        OutputTarget::Discard => Ok(()),
        OutputTarget::Stdout => {
            let json = serde_json::to_string_pretty(snapshot)?;
            let mut stdout = std::io::stdout().lock();
            writeln!(stdout, "{json}")?;
            Ok(())
        }
        OutputTarget::File(path) => {
            let json = serde_json::to_string_pretty(snapshot)?;
            let dir = match path.parent() {
                Some(parent) if !parent.as_os_str().is_empty() => parent,
                _ => std::path::Path::new("."),
            };

            let mut file = tempfile::NamedTempFile::new_in(dir)?;
            file.write_all(json.as_bytes())?;
            file.persist(path).map_err(|e| {
                BlebrityError::with_source(format!("Failed to write {}", path.display()), e.error)
            })?;

            debug!("Wrote snapshot to {}", path.display());
            Ok(())
        }
    }
}
