//! Statistics aggregation.
//!
//! A snapshot is the five-way partition of a tracker's records by status,
//! fetched at one point in time. Everything derived from it here is a pure
//! function: counts per status in canonical order, and the per-language
//! breakdown that drives the stacked language-support chart.

use crate::core::record::TrackingRecord;
use crate::core::status::{ALL_STATUSES, Status};
use crate::errors::Result;
use crate::notion::types::Page;
use std::collections::{BTreeMap, HashMap};

/// Per-status record partition for one tracking source.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatisticsSnapshot {
    by_status: HashMap<Status, Vec<TrackingRecord>>,
}

impl StatisticsSnapshot {
    /// Empty snapshot.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a snapshot from per-status query results, parsing every raw
    /// page.
    ///
    /// # Errors
    /// Fails on the first malformed row; a snapshot is never partially
    /// built.
    pub fn from_pages(parts: Vec<(Status, Vec<Page>)>) -> Result<Self> {
        let mut snapshot = Self::new();
        for (status, pages) in parts {
            let records = pages
                .iter()
                .map(TrackingRecord::from_page)
                .collect::<Result<Vec<_>>>()?;
            snapshot.insert_partition(status, records);
        }
        Ok(snapshot)
    }

    /// Replaces the partition for one status.
    pub fn insert_partition(&mut self, status: Status, records: Vec<TrackingRecord>) {
        self.by_status.insert(status, records);
    }

    /// Records filed under the given status; empty for absent partitions.
    #[must_use]
    pub fn records(&self, status: Status) -> &[TrackingRecord] {
        self.by_status
            .get(&status)
            .map_or(&[], |records| records.as_slice())
    }

    /// All records across every partition, in canonical status order.
    pub fn iter_records(&self) -> impl Iterator<Item = &TrackingRecord> {
        ALL_STATUSES
            .into_iter()
            .flat_map(|status| self.records(status).iter())
    }

    /// Total record count across all partitions.
    #[must_use]
    pub fn total_records(&self) -> usize {
        self.by_status.values().map(Vec::len).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.total_records() == 0
    }
}

/// Record counts per status, always iterated in canonical order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatusCounts {
    counts: [usize; 5],
}

impl StatusCounts {
    /// All-zero counts.
    #[must_use]
    pub const fn zeroed() -> Self {
        Self { counts: [0; 5] }
    }

    /// Count for one status.
    #[must_use]
    pub const fn get(&self, status: Status) -> usize {
        self.counts[status.index()]
    }

    /// Increments the bucket for one status.
    pub fn increment(&mut self, status: Status) {
        self.counts[status.index()] += 1;
    }

    /// `(status, count)` pairs in canonical order, independent of how the
    /// counts were produced.
    pub fn iter(&self) -> impl Iterator<Item = (Status, usize)> + '_ {
        ALL_STATUSES.into_iter().map(|status| (status, self.get(status)))
    }

    /// Sum of all buckets.
    #[must_use]
    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }
}

/// Counts per language per status, keyed by language in sorted order (the
/// bar chart lays languages out alphabetically).
pub type LanguageBreakdown = BTreeMap<String, StatusCounts>;

/// Counts the snapshot's partitions.
///
/// Output follows canonical status order regardless of the snapshot's
/// internal map order; statuses with no partition count zero.
#[must_use]
pub fn status_counts(snapshot: &StatisticsSnapshot) -> StatusCounts {
    let mut counts = StatusCounts::zeroed();
    for status in ALL_STATUSES {
        for _ in snapshot.records(status) {
            counts.increment(status);
        }
    }
    counts
}

/// Buckets every record by language, then by the record's own status.
///
/// Every language present in the snapshot gets all five statuses (zero
/// where empty). The record's own status is what counts here, not the
/// partition it was fetched under.
#[must_use]
pub fn language_breakdown(snapshot: &StatisticsSnapshot) -> LanguageBreakdown {
    let mut breakdown = LanguageBreakdown::new();
    for record in snapshot.iter_records() {
        breakdown.entry(record.language.clone()).or_default();
    }
    for record in snapshot.iter_records() {
        if let Some(counts) = breakdown.get_mut(&record.language) {
            counts.increment(record.status);
        }
    }
    breakdown
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(library: &str, language: &str, status: Status) -> TrackingRecord {
        TrackingRecord {
            id: format!("page-{library}"),
            library: library.to_string(),
            language: language.to_string(),
            status,
            pull_request_or_commit: None,
            released_version: None,
            notes: None,
            last_modified_by: None,
            created_at: None,
            last_edited_at: None,
        }
    }

    #[test]
    fn test_status_counts_example() {
        // {NotStarted: [r1], InProgress: [], InReview: [r2, r3],
        //  ReadyForRelease: [], Released: [r4]}
        let mut snapshot = StatisticsSnapshot::new();
        snapshot.insert_partition(
            Status::NotStarted,
            vec![record("a", "Rust", Status::NotStarted)],
        );
        snapshot.insert_partition(Status::InProgress, vec![]);
        snapshot.insert_partition(
            Status::InReview,
            vec![
                record("b", "Go", Status::InReview),
                record("c", "C#", Status::InReview),
            ],
        );
        snapshot.insert_partition(Status::ReadyForRelease, vec![]);
        snapshot.insert_partition(Status::Released, vec![record("d", "Rust", Status::Released)]);

        let counts = status_counts(&snapshot);
        assert_eq!(counts.get(Status::NotStarted), 1);
        assert_eq!(counts.get(Status::InProgress), 0);
        assert_eq!(counts.get(Status::InReview), 2);
        assert_eq!(counts.get(Status::ReadyForRelease), 0);
        assert_eq!(counts.get(Status::Released), 1);
    }

    #[test]
    fn test_status_counts_total_matches_snapshot() {
        let mut snapshot = StatisticsSnapshot::new();
        snapshot.insert_partition(
            Status::Released,
            vec![
                record("a", "Rust", Status::Released),
                record("b", "Go", Status::Released),
            ],
        );
        snapshot.insert_partition(Status::InProgress, vec![record("c", "C", Status::InProgress)]);

        assert_eq!(status_counts(&snapshot).total(), snapshot.total_records());
    }

    #[test]
    fn test_status_counts_order_is_canonical_regardless_of_insertion() {
        // Insert partitions back to front; iteration order must not change.
        let mut snapshot = StatisticsSnapshot::new();
        for status in Status::ordered_reversed() {
            snapshot.insert_partition(status, vec![record(status.as_str(), "Rust", status)]);
        }

        let order: Vec<Status> = status_counts(&snapshot)
            .iter()
            .map(|(status, _)| status)
            .collect();
        assert_eq!(order, Status::ordered().to_vec());
    }

    #[test]
    fn test_empty_snapshot_counts_all_zero() {
        let counts = status_counts(&StatisticsSnapshot::new());
        assert_eq!(counts.total(), 0);
        for (_, count) in counts.iter() {
            assert_eq!(count, 0);
        }
    }

    #[test]
    fn test_language_breakdown_example() {
        // r1(Rust, Released), r2(Rust, InProgress), r3(Go, Released)
        let mut snapshot = StatisticsSnapshot::new();
        snapshot.insert_partition(
            Status::Released,
            vec![
                record("a", "Rust", Status::Released),
                record("b", "Go", Status::Released),
            ],
        );
        snapshot.insert_partition(
            Status::InProgress,
            vec![record("c", "Rust", Status::InProgress)],
        );

        let breakdown = language_breakdown(&snapshot);
        assert_eq!(breakdown.len(), 2);

        let rust = &breakdown["Rust"];
        assert_eq!(rust.get(Status::NotStarted), 0);
        assert_eq!(rust.get(Status::InProgress), 1);
        assert_eq!(rust.get(Status::InReview), 0);
        assert_eq!(rust.get(Status::ReadyForRelease), 0);
        assert_eq!(rust.get(Status::Released), 1);

        let go = &breakdown["Go"];
        assert_eq!(go.get(Status::Released), 1);
        assert_eq!(go.total(), 1);
    }

    #[test]
    fn test_breakdown_buckets_bounded_by_language_totals() {
        let mut snapshot = StatisticsSnapshot::new();
        snapshot.insert_partition(
            Status::InReview,
            vec![
                record("a", "Python", Status::InReview),
                record("b", "Python", Status::InReview),
                record("c", "Ruby", Status::InReview),
            ],
        );

        let breakdown = language_breakdown(&snapshot);
        for (language, counts) in &breakdown {
            let language_total = snapshot
                .iter_records()
                .filter(|record| &record.language == language)
                .count();
            for (_, count) in counts.iter() {
                assert!(count <= language_total);
            }
            assert_eq!(counts.total(), language_total);
        }
    }

    #[test]
    fn test_breakdown_uses_record_status_not_partition_key() {
        // A row fetched under one partition but carrying another status
        // counts under its own status.
        let mut snapshot = StatisticsSnapshot::new();
        snapshot.insert_partition(Status::Released, vec![record("a", "Dart", Status::InReview)]);

        let breakdown = language_breakdown(&snapshot);
        assert_eq!(breakdown["Dart"].get(Status::InReview), 1);
        assert_eq!(breakdown["Dart"].get(Status::Released), 0);
    }

    #[test]
    fn test_languages_sorted() {
        let mut snapshot = StatisticsSnapshot::new();
        snapshot.insert_partition(
            Status::Released,
            vec![
                record("a", "Rust", Status::Released),
                record("b", "C#", Status::Released),
                record("c", "Python", Status::Released),
            ],
        );

        let breakdown = language_breakdown(&snapshot);
        let languages: Vec<&String> = breakdown.keys().collect();
        assert_eq!(languages, ["C#", "Python", "Rust"]);
    }

    #[test]
    fn test_derivations_are_idempotent() {
        let mut snapshot = StatisticsSnapshot::new();
        snapshot.insert_partition(
            Status::InProgress,
            vec![record("a", "Kotlin", Status::InProgress)],
        );

        assert_eq!(status_counts(&snapshot), status_counts(&snapshot));
        assert_eq!(language_breakdown(&snapshot), language_breakdown(&snapshot));
    }
}
