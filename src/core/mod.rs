//! Core aggregation logic - framework-agnostic status and statistics
//! derivation.
//!
//! Everything in this module is a pure function of already-fetched data; the
//! Notion gateway and the Discord layer live elsewhere.

/// Tracking record parsed from a raw Notion page
pub mod record;
/// Canonical status enumeration, ordering, and chart colors
pub mod status;
/// Snapshot partitioning, status counts, and language breakdowns
pub mod stats;
