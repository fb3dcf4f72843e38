//! Notion REST integration.
//!
//! The tracker's persistent state lives entirely in Notion; this module is
//! the only place that talks to it. `types` mirrors the slice of the API
//! surface the bot consumes, `client` wraps the HTTP calls.

/// REST client for pages, blocks, data-source search/query, and updates
pub mod client;
/// Serde models for the Notion payloads the bot reads and writes
pub mod types;

pub use client::NotionClient;
