//! Serde models for the Notion API payloads the bot consumes and produces.
//!
//! Only the properties the tracker template defines are modeled; everything
//! else in Notion's (large) response envelopes is ignored. Rich-text valued
//! properties are stored by Notion as a sequence of formatted segments, so a
//! logical string value is always the in-order concatenation of its
//! segments.

use crate::errors::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One rich-text segment of a formatted Notion value.
#[derive(Debug, Clone, Deserialize)]
pub struct RichText {
    /// Plain-text rendering of the segment
    #[serde(default)]
    pub plain_text: Option<String>,
    /// Raw text content of the segment
    #[serde(default)]
    pub text: Option<TextContent>,
}

/// Raw text content of a rich-text segment.
#[derive(Debug, Clone, Deserialize)]
pub struct TextContent {
    /// The segment's literal text
    pub content: String,
}

/// Joins rich-text segments in source order into one logical string.
///
/// Segments are concatenated, never deduplicated or reordered; a value split
/// across formatting runs must round-trip to the same string.
#[must_use]
pub fn concat_rich_text(segments: &[RichText]) -> String {
    segments
        .iter()
        .map(|segment| {
            segment
                .text
                .as_ref()
                .map(|text| text.content.as_str())
                .or(segment.plain_text.as_deref())
                .unwrap_or_default()
        })
        .collect()
}

/// Joins rich-text segments, treating an all-empty result as absent.
#[must_use]
pub fn concat_rich_text_opt(segments: &[RichText]) -> Option<String> {
    let joined = concat_rich_text(segments);
    if joined.trim().is_empty() { None } else { Some(joined) }
}

/// Emoji icon attached to a page or callout block.
#[derive(Debug, Clone, Deserialize)]
pub struct Icon {
    /// Unicode emoji, when the icon is emoji-typed
    #[serde(default)]
    pub emoji: Option<String>,
}

/// Envelope of a data-source query response.
#[derive(Debug, Clone, Deserialize)]
pub struct QueryResponse {
    /// Matching pages
    #[serde(default)]
    pub results: Vec<Page>,
    /// Whether further pages exist beyond this response
    #[serde(default)]
    pub has_more: bool,
}

/// A Notion page: either a tracker page or one data-source row.
#[derive(Debug, Clone, Deserialize)]
pub struct Page {
    /// Opaque page id
    pub id: String,
    #[serde(default)]
    pub created_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub last_edited_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub icon: Option<Icon>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub public_url: Option<String>,
    #[serde(default)]
    pub properties: PageProperties,
}

impl Page {
    /// Page title, trimmed; `None` when the title property is absent or
    /// empty (e.g. on data-source rows).
    #[must_use]
    pub fn title(&self) -> Option<String> {
        let segments = &self.properties.title.as_ref()?.title;
        let joined = concat_rich_text(segments);
        let trimmed = joined.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    }
}

/// Properties of a page, covering both tracker pages (`title`) and
/// data-source rows (the template's columns).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageProperties {
    #[serde(default)]
    pub title: Option<TitleProperty>,
    #[serde(rename = "Library", default)]
    pub library: Option<TitleProperty>,
    #[serde(rename = "Language", default)]
    pub language: Option<RichTextProperty>,
    #[serde(rename = "Status", default)]
    pub status: Option<StatusProperty>,
    #[serde(rename = "Pull Request / Commit", default)]
    pub pull_request_commit: Option<UrlProperty>,
    #[serde(rename = "Released In Version", default)]
    pub released_in_version: Option<RichTextProperty>,
    #[serde(rename = "Notes", default)]
    pub notes: Option<RichTextProperty>,
    #[serde(rename = "Modified By", default)]
    pub modified_by: Option<RichTextProperty>,
}

/// A title-typed property value.
#[derive(Debug, Clone, Deserialize)]
pub struct TitleProperty {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub title: Vec<RichText>,
}

/// A rich-text-typed property value.
#[derive(Debug, Clone, Deserialize)]
pub struct RichTextProperty {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub rich_text: Vec<RichText>,
}

/// A url-typed property value.
#[derive(Debug, Clone, Deserialize)]
pub struct UrlProperty {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

/// A status-typed property value.
#[derive(Debug, Clone, Deserialize)]
pub struct StatusProperty {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub status: Option<StatusValue>,
}

/// The selected option of a status property.
#[derive(Debug, Clone, Deserialize)]
pub struct StatusValue {
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
}

/// Envelope of a block-children listing.
#[derive(Debug, Clone, Deserialize)]
pub struct BlockChildren {
    #[serde(default)]
    pub results: Vec<Block>,
}

impl BlockChildren {
    /// First callout block among the children, which the tracker template
    /// uses for the page description.
    #[must_use]
    pub fn first_callout(&self) -> Option<&Callout> {
        self.results
            .iter()
            .find(|block| block.block_type == "callout")
            .and_then(|block| block.callout.as_ref())
    }
}

/// One child block of a page.
#[derive(Debug, Clone, Deserialize)]
pub struct Block {
    #[serde(rename = "type", default)]
    pub block_type: String,
    #[serde(default)]
    pub callout: Option<Callout>,
}

/// A callout block's content.
#[derive(Debug, Clone, Deserialize)]
pub struct Callout {
    #[serde(default)]
    pub rich_text: Vec<RichText>,
    #[serde(default)]
    pub icon: Option<Icon>,
}

impl Callout {
    /// Concatenated callout text.
    #[must_use]
    pub fn text(&self) -> String {
        concat_rich_text(&self.rich_text)
    }

    /// Emoji of the callout icon, if emoji-typed.
    #[must_use]
    pub fn emoji(&self) -> Option<&str> {
        self.icon.as_ref()?.emoji.as_deref()
    }
}

/// Envelope of a search response filtered to data sources.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub results: Vec<DataSource>,
}

/// One data source (the queryable backing store of a tracker database).
#[derive(Debug, Clone, Deserialize)]
pub struct DataSource {
    /// Opaque data source id
    pub id: String,
    #[serde(default)]
    pub properties: DataSourceProperties,
}

/// Schema slice of a data source: only the Status property matters to the
/// bot (for its option set).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DataSourceProperties {
    #[serde(rename = "Status", default)]
    pub status: Option<StatusSchema>,
}

/// Schema of the Status property, including its option set.
#[derive(Debug, Clone, Deserialize)]
pub struct StatusSchema {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub status: Option<StatusOptions>,
}

/// Option list of a status property schema.
#[derive(Debug, Clone, Deserialize)]
pub struct StatusOptions {
    #[serde(default)]
    pub options: Vec<StatusOption>,
}

/// One selectable status option (id is what page updates reference).
#[derive(Debug, Clone, Deserialize)]
pub struct StatusOption {
    pub id: String,
    pub name: String,
}

impl DataSource {
    /// Status options declared by this data source's schema.
    #[must_use]
    pub fn status_options(&self) -> &[StatusOption] {
        self.properties
            .status
            .as_ref()
            .and_then(|schema| schema.status.as_ref())
            .map_or(&[], |options| options.options.as_slice())
    }

    /// Parses the schema's status options into canonical statuses, in
    /// canonical order.
    ///
    /// # Errors
    /// Returns [`Error::UnknownStatus`] when the schema carries an option
    /// outside the canonical set; a misconfigured tracker must not be
    /// charted with silently dropped buckets.
    pub fn canonical_statuses(&self) -> Result<Vec<crate::core::status::Status>> {
        let mut statuses = self
            .status_options()
            .iter()
            .map(|option| option.name.parse())
            .collect::<Result<Vec<crate::core::status::Status>>>()?;
        statuses.sort_unstable();
        statuses.dedup();
        Ok(statuses)
    }
}

/// PATCH body for a tracking-record update.
#[derive(Debug, Serialize)]
pub struct UpdatePagePayload {
    pub properties: UpdateProperties,
}

/// The properties written back on a status update.
#[derive(Debug, Serialize)]
pub struct UpdateProperties {
    /// Always serialized; `url: null` clears the property in Notion
    #[serde(rename = "Pull Request / Commit")]
    pub pull_request_commit: UrlUpdate,
    #[serde(rename = "Status")]
    pub status: StatusUpdate,
    #[serde(rename = "Released In Version")]
    pub released_in_version: RichTextUpdate,
    #[serde(rename = "Notes")]
    pub notes: RichTextUpdate,
    #[serde(rename = "Modified By")]
    pub modified_by: RichTextUpdate,
}

/// Url property write; `None` serializes as an explicit null.
#[derive(Debug, Serialize)]
pub struct UrlUpdate {
    pub url: Option<String>,
}

/// Status property write, by option id.
#[derive(Debug, Serialize)]
pub struct StatusUpdate {
    pub status: StatusRef,
}

/// Reference to a status option.
#[derive(Debug, Serialize)]
pub struct StatusRef {
    pub id: String,
}

/// Rich-text property write; an empty segment list clears the property.
#[derive(Debug, Serialize)]
pub struct RichTextUpdate {
    pub rich_text: Vec<RichTextInput>,
}

impl RichTextUpdate {
    /// One segment for `Some(non-blank)`, an empty (clearing) list otherwise.
    #[must_use]
    pub fn from_value(value: Option<&str>) -> Self {
        let rich_text = match value {
            Some(text) if !text.trim().is_empty() => vec![RichTextInput {
                text: TextContentInput {
                    content: text.to_string(),
                },
            }],
            _ => Vec::new(),
        };
        Self { rich_text }
    }
}

/// One rich-text segment of a property write.
#[derive(Debug, Serialize)]
pub struct RichTextInput {
    pub text: TextContentInput,
}

/// Text content of a written segment.
#[derive(Debug, Serialize)]
pub struct TextContentInput {
    pub content: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn segment(content: &str) -> RichText {
        RichText {
            plain_text: Some(content.to_string()),
            text: Some(TextContent {
                content: content.to_string(),
            }),
        }
    }

    #[test]
    fn test_concat_preserves_segment_order() {
        let segments = [segment("Type"), segment("Script"), segment(" (Deno)")];
        assert_eq!(concat_rich_text(&segments), "TypeScript (Deno)");
    }

    #[test]
    fn test_concat_opt_blank_is_none() {
        assert_eq!(concat_rich_text_opt(&[]), None);
        assert_eq!(concat_rich_text_opt(&[segment("  ")]), None);
        assert_eq!(
            concat_rich_text_opt(&[segment("1.2.0")]),
            Some("1.2.0".to_string())
        );
    }

    #[test]
    fn test_deserialize_query_result_page() {
        let value = json!({
            "object": "page",
            "id": "page-1",
            "created_time": "2025-08-01T10:00:00.000Z",
            "last_edited_time": "2025-08-02T11:30:00.000Z",
            "properties": {
                "Library": {
                    "id": "title",
                    "type": "title",
                    "title": [{"type": "text", "text": {"content": "DisCatSharp"}, "plain_text": "DisCatSharp"}]
                },
                "Language": {
                    "id": "lang",
                    "type": "rich_text",
                    "rich_text": [{"type": "text", "text": {"content": "C#"}, "plain_text": "C#"}]
                },
                "Status": {
                    "id": "stat",
                    "type": "status",
                    "status": {"id": "opt-released", "name": "Released", "color": "green"}
                },
                "Pull Request / Commit": {"id": "pr", "type": "url", "url": "https://example.com/pr/1"},
                "Released In Version": {"id": "ver", "type": "rich_text", "rich_text": []},
                "Notes": {"id": "notes", "type": "rich_text", "rich_text": []}
            }
        });

        let page: Page = serde_json::from_value(value).unwrap();
        assert_eq!(page.id, "page-1");
        let props = &page.properties;
        assert_eq!(
            concat_rich_text(&props.library.as_ref().unwrap().title),
            "DisCatSharp"
        );
        assert_eq!(
            props.status.as_ref().unwrap().status.as_ref().unwrap().name,
            "Released"
        );
        assert_eq!(
            props.pull_request_commit.as_ref().unwrap().url.as_deref(),
            Some("https://example.com/pr/1")
        );
        assert!(page.created_time.is_some());
    }

    #[test]
    fn test_first_callout_skips_other_blocks() {
        let value = json!({
            "results": [
                {"type": "heading_1"},
                {"type": "callout", "callout": {
                    "rich_text": [{"type": "text", "text": {"content": "Tracking the rollout"}}],
                    "icon": {"type": "emoji", "emoji": "📦"}
                }}
            ]
        });
        let blocks: BlockChildren = serde_json::from_value(value).unwrap();
        let callout = blocks.first_callout().unwrap();
        assert_eq!(callout.text(), "Tracking the rollout");
        assert_eq!(callout.emoji(), Some("📦"));
    }

    #[test]
    fn test_data_source_status_options() {
        let value = json!({
            "id": "ds-1",
            "properties": {
                "Status": {
                    "id": "st%3Aid",
                    "type": "status",
                    "status": {"options": [
                        {"id": "o1", "name": "Not Started"},
                        {"id": "o2", "name": "Released"}
                    ]}
                }
            }
        });
        let source: DataSource = serde_json::from_value(value).unwrap();
        assert_eq!(source.status_options().len(), 2);

        use crate::core::status::Status;
        let statuses = source.canonical_statuses().unwrap();
        assert_eq!(statuses, vec![Status::NotStarted, Status::Released]);
    }

    #[test]
    fn test_canonical_statuses_rejects_unconfigured_option() {
        let value = json!({
            "id": "ds-2",
            "properties": {
                "Status": {"id": "st", "status": {"options": [
                    {"id": "o1", "name": "Released"},
                    {"id": "o2", "name": "Abandoned"}
                ]}}
            }
        });
        let source: DataSource = serde_json::from_value(value).unwrap();
        assert!(matches!(
            source.canonical_statuses(),
            Err(crate::errors::Error::UnknownStatus { value } ) if value == "Abandoned"
        ));
    }

    #[test]
    fn test_update_payload_shape() {
        let payload = UpdatePagePayload {
            properties: UpdateProperties {
                pull_request_commit: UrlUpdate { url: None },
                status: StatusUpdate {
                    status: StatusRef {
                        id: "opt-1".to_string(),
                    },
                },
                released_in_version: RichTextUpdate::from_value(Some("2.0.0")),
                notes: RichTextUpdate::from_value(None),
                modified_by: RichTextUpdate::from_value(Some("123456789")),
            },
        };

        let value = serde_json::to_value(&payload).unwrap();
        let props = &value["properties"];
        // Clearing the URL must serialize an explicit null, not omit the key.
        assert!(props["Pull Request / Commit"].get("url").is_some());
        assert!(props["Pull Request / Commit"]["url"].is_null());
        assert_eq!(props["Status"]["status"]["id"], "opt-1");
        assert_eq!(
            props["Released In Version"]["rich_text"][0]["text"]["content"],
            "2.0.0"
        );
        // Absent notes clear with an empty array.
        assert_eq!(props["Notes"]["rich_text"].as_array().unwrap().len(), 0);
        assert_eq!(
            props["Modified By"]["rich_text"][0]["text"]["content"],
            "123456789"
        );
    }
}
