//! Unified error type for the tracker bot.
//!
//! Data-shape violations (unknown status names, missing properties, missing
//! records) are hard errors: aggregation never silently drops records, since
//! a chart with missing counts is worse than no chart.

use thiserror::Error;

/// All failure modes surfaced by the crate.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Configuration error: {message}")]
    Config {
        /// What went wrong while loading or validating configuration
        message: String,
    },

    #[error("Environment variable error: {0}")]
    EnvVar(#[from] std::env::VarError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP transport error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Notion API error (HTTP {status}): {body}")]
    NotionApi {
        /// HTTP status code returned by Notion
        status: u16,
        /// Raw response body, kept for operator diagnostics
        body: String,
    },

    #[error("unknown status name: {value:?}")]
    UnknownStatus {
        /// The status string that matched none of the canonical names
        value: String,
    },

    #[error("page {page_id} is missing the {property:?} property")]
    MissingProperty {
        /// Notion page id of the malformed record
        page_id: String,
        /// Name of the absent or empty property
        property: &'static str,
    },

    #[error("no tracking record found for library {library:?}")]
    MissingRecord {
        /// Library name that was expected to have a row in the data source
        library: String,
    },

    #[error("no data source configured for page {page_id}")]
    UnknownTracker {
        /// The page id that has no tracker entry in config.toml
        page_id: String,
    },

    #[error("Chart rendering error: {0}")]
    Chart(String),

    #[error("Background fetch task failed: {0}")]
    Join(#[from] tokio::task::JoinError),

    #[error("Message formatting error: {0}")]
    Fmt(#[from] std::fmt::Error),

    #[error("Serenity/Poise framework error: {0}")]
    Framework(Box<poise::serenity_prelude::Error>),
}

impl From<poise::serenity_prelude::Error> for Error {
    fn from(value: poise::serenity_prelude::Error) -> Self {
        Error::Framework(Box::new(value))
    }
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
