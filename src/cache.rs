//! Last-fetched statistics cache.
//!
//! One process-wide slot holding the most recent statistics bundle, reused
//! by the diagnostic re-render command. Writes are wholesale last-write-wins
//! with no invalidation policy; the lock only guards against torn
//! overwrites. The handle is injectable so tests can drive it directly.

use crate::core::stats::StatisticsSnapshot;
use crate::notion::types::{BlockChildren, DataSource, Page};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;

/// Everything the statistics command fetched for one tracker, kept so the
/// diagnostic command can re-render without refetching.
#[derive(Debug, Clone)]
pub struct CachedStatistics {
    /// Tracker page id the bundle was fetched for
    pub page_id: String,
    /// The tracker page (title, icon, public URL)
    pub page: Page,
    /// The page's child blocks (description callout)
    pub blocks: BlockChildren,
    /// The backing data source (status option schema)
    pub data_source: DataSource,
    /// The per-status record partition
    pub snapshot: StatisticsSnapshot,
    /// When the bundle was fetched
    pub fetched_at: DateTime<Utc>,
}

/// Shared handle to the statistics cache slot.
#[derive(Debug, Clone, Default)]
pub struct StatisticsCache {
    slot: Arc<RwLock<Option<CachedStatistics>>>,
}

impl StatisticsCache {
    /// Empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the current slot contents.
    pub async fn get(&self) -> Option<CachedStatistics> {
        self.slot.read().await.clone()
    }

    /// Overwrites the slot wholesale.
    pub async fn set(&self, value: CachedStatistics) {
        info!(
            "caching statistics for page {} ({} records)",
            value.page_id,
            value.snapshot.total_records()
        );
        *self.slot.write().await = Some(value);
    }

    /// Empties the slot.
    pub async fn clear(&self) {
        *self.slot.write().await = None;
    }
}
