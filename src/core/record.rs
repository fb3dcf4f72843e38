//! Tracking records - the domain view of one data-source row.
//!
//! A record is one (library, page) pair. Construction from a raw Notion page
//! is the crate's data-shape boundary: missing Library/Language/Status or a
//! status name outside the canonical set fails here, before any aggregation
//! or rendering can observe the malformed row.

use crate::core::status::Status;
use crate::errors::{Error, Result};
use crate::notion::types::{Page, concat_rich_text_opt};
use chrono::{DateTime, Utc};

/// One library's implementation-status row in a tracking data source.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackingRecord {
    /// Opaque Notion page id; record identity
    pub id: String,
    /// Library name (the row's title)
    pub library: String,
    /// Implementation language, joined from its rich-text segments
    pub language: String,
    /// Current implementation status
    pub status: Status,
    /// Pull request or commit implementing the change
    pub pull_request_or_commit: Option<String>,
    /// Version the change shipped in
    pub released_version: Option<String>,
    /// Free-form maintainer notes
    pub notes: Option<String>,
    /// Discord user id of the last editor, as recorded by the bot
    pub last_modified_by: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub last_edited_at: Option<DateTime<Utc>>,
}

impl TrackingRecord {
    /// Builds a record from a raw data-source row.
    ///
    /// # Errors
    /// - [`Error::MissingProperty`] when Library, Language, or Status is
    ///   absent or empty.
    /// - [`Error::UnknownStatus`] when the status name is outside the
    ///   canonical set.
    pub fn from_page(page: &Page) -> Result<Self> {
        let props = &page.properties;

        let library = props
            .library
            .as_ref()
            .and_then(|title| concat_rich_text_opt(&title.title))
            .ok_or(Error::MissingProperty {
                page_id: page.id.clone(),
                property: "Library",
            })?;

        let language = props
            .language
            .as_ref()
            .and_then(|language| concat_rich_text_opt(&language.rich_text))
            .ok_or(Error::MissingProperty {
                page_id: page.id.clone(),
                property: "Language",
            })?;

        let status_name = props
            .status
            .as_ref()
            .and_then(|status| status.status.as_ref())
            .map(|value| value.name.as_str())
            .ok_or(Error::MissingProperty {
                page_id: page.id.clone(),
                property: "Status",
            })?;
        let status: Status = status_name.parse()?;

        let pull_request_or_commit = props
            .pull_request_commit
            .as_ref()
            .and_then(|property| property.url.clone());
        let released_version = props
            .released_in_version
            .as_ref()
            .and_then(|property| concat_rich_text_opt(&property.rich_text));
        let notes = props
            .notes
            .as_ref()
            .and_then(|property| concat_rich_text_opt(&property.rich_text));
        let last_modified_by = props
            .modified_by
            .as_ref()
            .and_then(|property| concat_rich_text_opt(&property.rich_text));

        Ok(Self {
            id: page.id.clone(),
            library,
            language,
            status,
            pull_request_or_commit,
            released_version,
            notes,
            last_modified_by,
            created_at: page.created_time,
            last_edited_at: page.last_edited_time,
        })
    }

    /// Most recent timestamp available for display: last edit, falling back
    /// to creation.
    #[must_use]
    pub fn last_touched(&self) -> Option<DateTime<Utc>> {
        self.last_edited_at.or(self.created_at)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row(library: &str, language_segments: &[&str], status: &str) -> Page {
        let segments: Vec<serde_json::Value> = language_segments
            .iter()
            .map(|content| json!({"type": "text", "text": {"content": content}}))
            .collect();
        serde_json::from_value(json!({
            "id": format!("page-{library}"),
            "created_time": "2025-07-01T08:00:00.000Z",
            "last_edited_time": "2025-08-01T08:00:00.000Z",
            "properties": {
                "Library": {"title": [{"text": {"content": library}}]},
                "Language": {"rich_text": segments},
                "Status": {"status": {"id": "opt", "name": status}},
                "Pull Request / Commit": {"url": "https://example.com/pr/7"},
                "Released In Version": {"rich_text": [{"text": {"content": "3.1"}}]},
                "Notes": {"rich_text": []},
                "Modified By": {"rich_text": [{"text": {"content": "42"}}]}
            }
        }))
        .unwrap()
    }

    #[test]
    fn test_from_page_full_row() {
        let record = TrackingRecord::from_page(&row("serenity", &["Rust"], "Released")).unwrap();
        assert_eq!(record.library, "serenity");
        assert_eq!(record.language, "Rust");
        assert_eq!(record.status, Status::Released);
        assert_eq!(
            record.pull_request_or_commit.as_deref(),
            Some("https://example.com/pr/7")
        );
        assert_eq!(record.released_version.as_deref(), Some("3.1"));
        assert_eq!(record.notes, None);
        assert_eq!(record.last_modified_by.as_deref(), Some("42"));
        assert_eq!(record.last_touched(), record.last_edited_at);
    }

    #[test]
    fn test_language_joined_across_segments() {
        let record =
            TrackingRecord::from_page(&row("oceanic", &["Java", "script"], "In Progress")).unwrap();
        assert_eq!(record.language, "Javascript");
    }

    #[test]
    fn test_unknown_status_is_rejected() {
        let err = TrackingRecord::from_page(&row("nostrum", &["Elixir"], "Unknown")).unwrap_err();
        assert!(matches!(err, Error::UnknownStatus { value } if value == "Unknown"));
    }

    #[test]
    fn test_missing_language_is_rejected() {
        let err = TrackingRecord::from_page(&row("discordgo", &[], "Released")).unwrap_err();
        assert!(matches!(
            err,
            Error::MissingProperty {
                property: "Language",
                ..
            }
        ));
    }

    #[test]
    fn test_missing_status_is_rejected() {
        let page: Page = serde_json::from_value(json!({
            "id": "page-x",
            "properties": {
                "Library": {"title": [{"text": {"content": "x"}}]},
                "Language": {"rich_text": [{"text": {"content": "Go"}}]},
                "Status": {"status": null}
            }
        }))
        .unwrap();
        let err = TrackingRecord::from_page(&page).unwrap_err();
        assert!(matches!(
            err,
            Error::MissingProperty {
                property: "Status",
                ..
            }
        ));
    }
}
