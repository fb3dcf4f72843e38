//! Notion REST client.
//!
//! One method per endpoint the bot consumes, plus the two composite fetches:
//! the concurrent per-library fan-out used by the update flow, and the
//! sequential per-status sweep that builds a statistics snapshot. The client
//! never retries; failures carry the HTTP status and body for the operator.

use crate::core::record::TrackingRecord;
use crate::core::stats::StatisticsSnapshot;
use crate::core::status::Status;
use crate::errors::{Error, Result};
use crate::notion::types::{
    BlockChildren, DataSource, Page, QueryResponse, RichTextUpdate, SearchResponse, StatusRef,
    StatusUpdate, UpdatePagePayload, UpdateProperties, UrlUpdate,
};
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use serde_json::json;
use std::collections::HashMap;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

const NOTION_API_BASE: &str = "https://api.notion.com/v1";
const USER_AGENT: &str = concat!("library-tracker/", env!("CARGO_PKG_VERSION"));

/// HTTP client for the Notion API, cheap to clone.
#[derive(Debug, Clone)]
pub struct NotionClient {
    http: reqwest::Client,
    base_url: String,
}

impl NotionClient {
    /// Creates a client against the real Notion API.
    ///
    /// # Errors
    /// Fails when the token or API version cannot form valid headers, or
    /// the underlying HTTP client cannot be built.
    pub fn new(token: &str, api_version: &str) -> Result<Self> {
        Self::with_base_url(token, api_version, NOTION_API_BASE)
    }

    /// Creates a client against an arbitrary base URL (used by tests to
    /// point at a mock server).
    ///
    /// # Errors
    /// Same conditions as [`NotionClient::new`].
    pub fn with_base_url(token: &str, api_version: &str, base_url: &str) -> Result<Self> {
        let mut headers = HeaderMap::new();
        let mut auth =
            HeaderValue::from_str(&format!("Bearer {token}")).map_err(|e| Error::Config {
                message: format!("Notion token is not a valid header value: {e}"),
            })?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);
        headers.insert(
            "Notion-Version",
            HeaderValue::from_str(api_version).map_err(|e| Error::Config {
                message: format!("Notion API version is not a valid header value: {e}"),
            })?,
        );

        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Maps non-2xx responses to [`Error::NotionApi`], keeping the body.
    async fn check(response: reqwest::Response) -> Result<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            Ok(response)
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(Error::NotionApi {
                status: status.as_u16(),
                body,
            })
        }
    }

    /// Fetches a tracker page (title, icon, public URL).
    pub async fn get_page(&self, page_id: &str) -> Result<Page> {
        debug!("fetching notion page {page_id}");
        let response = self
            .http
            .get(format!("{}/pages/{page_id}", self.base_url))
            .send()
            .await?;
        Ok(Self::check(response).await?.json().await?)
    }

    /// Fetches a page's child blocks (the description callout lives here).
    pub async fn get_block_children(&self, page_id: &str) -> Result<BlockChildren> {
        debug!("fetching block children of {page_id}");
        let response = self
            .http
            .get(format!("{}/blocks/{page_id}/children", self.base_url))
            .send()
            .await?;
        Ok(Self::check(response).await?.json().await?)
    }

    /// Searches the workspace's data sources for the one with the given id.
    ///
    /// Returns `None` when the search results contain no data source with a
    /// matching id (compared case-insensitively, as Notion is inconsistent
    /// about id casing across endpoints).
    pub async fn find_data_source(&self, data_source_id: &str) -> Result<Option<DataSource>> {
        debug!("searching for data source {data_source_id}");
        let payload = json!({
            "query": "Libraries",
            "filter": {"value": "data_source", "property": "object"}
        });
        let response = self
            .http
            .post(format!("{}/search", self.base_url))
            .json(&payload)
            .send()
            .await?;
        let search: SearchResponse = Self::check(response).await?.json().await?;
        Ok(search
            .results
            .into_iter()
            .find(|source| source.id.eq_ignore_ascii_case(data_source_id)))
    }

    /// Queries a data source for one library's row by exact title match.
    pub async fn query_by_library(
        &self,
        data_source_id: &str,
        library: &str,
    ) -> Result<Option<Page>> {
        let payload = json!({
            "filter": {"property": "Library", "title": {"equals": library}}
        });
        let response = self
            .http
            .post(format!(
                "{}/data_sources/{data_source_id}/query",
                self.base_url
            ))
            .json(&payload)
            .send()
            .await?;
        let result: QueryResponse = Self::check(response).await?.json().await?;
        Ok(result.results.into_iter().next())
    }

    /// Fetches the current record of every given library concurrently and
    /// joins the results into a map keyed by library name.
    ///
    /// All fetches must complete before this returns (join, not
    /// first-completed); arrival order is irrelevant because of the keyed
    /// join. Libraries without a row are simply absent from the map.
    ///
    /// # Errors
    /// Any failed fetch or malformed row aborts the whole join.
    pub async fn fetch_current_records(
        &self,
        data_source_id: &str,
        libraries: &[String],
    ) -> Result<HashMap<String, TrackingRecord>> {
        let mut tasks: JoinSet<Result<(String, Option<Page>)>> = JoinSet::new();
        for library in libraries {
            let client = self.clone();
            let data_source_id = data_source_id.to_string();
            let library = library.clone();
            tasks.spawn(async move {
                debug!("fetching current data for {library}");
                let page = client.query_by_library(&data_source_id, &library).await?;
                Ok((library, page))
            });
        }

        let mut records = HashMap::new();
        while let Some(joined) = tasks.join_next().await {
            let (library, page) = joined??;
            match page {
                Some(page) => {
                    records.insert(library, TrackingRecord::from_page(&page)?);
                }
                None => warn!("no tracking record found for library {library}"),
            }
        }
        Ok(records)
    }

    /// Builds a statistics snapshot: one filtered query per status, all
    /// completed before the snapshot is assembled.
    ///
    /// # Errors
    /// Any failed query or malformed row aborts the snapshot; it is never
    /// partially built.
    pub async fn fetch_statistics(
        &self,
        data_source_id: &str,
        statuses: &[Status],
    ) -> Result<StatisticsSnapshot> {
        info!("fetching statistics from data source {data_source_id}");
        let mut parts = Vec::with_capacity(statuses.len());
        for &status in statuses {
            debug!("querying records with status {status}");
            let payload = json!({
                "filter": {"property": "Status", "status": {"equals": status.as_str()}}
            });
            let response = self
                .http
                .post(format!(
                    "{}/data_sources/{data_source_id}/query",
                    self.base_url
                ))
                .json(&payload)
                .send()
                .await?;
            let result: QueryResponse = Self::check(response).await?.json().await?;
            parts.push((status, result.results));
        }
        StatisticsSnapshot::from_pages(parts)
    }

    /// Patches one tracking record: status by option id, URL set or cleared
    /// with an explicit null, version/notes set or cleared with an empty
    /// segment list, and the editor's Discord user id stamped into
    /// Modified By.
    pub async fn update_page(
        &self,
        page_id: &str,
        editor_user_id: &str,
        status_option_id: &str,
        pull_request_or_commit: Option<&str>,
        released_version: Option<&str>,
        notes: Option<&str>,
    ) -> Result<()> {
        info!("updating notion page {page_id} to status option {status_option_id}");
        let payload = UpdatePagePayload {
            properties: UpdateProperties {
                pull_request_commit: UrlUpdate {
                    url: pull_request_or_commit
                        .filter(|url| !url.trim().is_empty())
                        .map(ToString::to_string),
                },
                status: StatusUpdate {
                    status: StatusRef {
                        id: status_option_id.to_string(),
                    },
                },
                released_in_version: RichTextUpdate::from_value(released_version),
                notes: RichTextUpdate::from_value(notes),
                modified_by: RichTextUpdate::from_value(Some(editor_user_id)),
            },
        };
        let response = self
            .http
            .patch(format!("{}/pages/{page_id}", self.base_url))
            .json(&payload)
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }
}
