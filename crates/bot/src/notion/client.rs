//! Notion API client.
//!
//! Read-only access to one database via the query endpoint, with
//! exhaustive cursor-following pagination.

use std::sync::Arc;

use reqwest::header::{HeaderMap, HeaderValue};
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, instrument};

use super::error::NotionError;
use super::query::{Filter, QueryRequest, Sort};
use super::types::{Page, QueryResponse};

/// Notion API base URL.
const API_BASE: &str = "https://api.notion.com/v1";

/// Notion API version header value.
const NOTION_VERSION: &str = "2022-06-28";

/// The server caps query pages at 100 records.
pub const MAX_PAGE_SIZE: u32 = 100;

/// How much of an error body to keep in error messages.
const ERROR_BODY_LIMIT: usize = 500;

/// Notion database query client.
///
/// Cheap to clone; all clones share one HTTP connection pool.
#[derive(Clone)]
pub struct NotionClient {
    inner: Arc<NotionClientInner>,
}

struct NotionClientInner {
    client: reqwest::Client,
    base_url: String,
    database_id: String,
}

impl std::fmt::Debug for NotionClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotionClient")
            .field("database_id", &self.inner.database_id)
            .field("token", &"[REDACTED]")
            .finish_non_exhaustive()
    }
}

impl NotionClient {
    /// Create a new client for one database.
    ///
    /// # Errors
    ///
    /// Returns error if the token cannot be encoded as a header or the
    /// HTTP client fails to build.
    pub fn new(token: &SecretString, database_id: impl Into<String>) -> Result<Self, NotionError> {
        Self::with_base_url(token, database_id, API_BASE)
    }

    /// Create a client against a non-default base URL (tests, proxies).
    ///
    /// # Errors
    ///
    /// Returns error if the token cannot be encoded as a header or the
    /// HTTP client fails to build.
    pub fn with_base_url(
        token: &SecretString,
        database_id: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Result<Self, NotionError> {
        let mut headers = HeaderMap::new();

        let auth_value = format!("Bearer {}", token.expose_secret());
        let mut auth_header = HeaderValue::from_str(&auth_value)
            .map_err(|e| NotionError::Config(format!("Invalid token format: {e}")))?;
        auth_header.set_sensitive(true);
        headers.insert("Authorization", auth_header);

        headers.insert("Notion-Version", HeaderValue::from_static(NOTION_VERSION));

        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .default_headers(headers)
            .build()?;

        Ok(Self {
            inner: Arc::new(NotionClientInner {
                client,
                base_url: base_url.into().trim_end_matches('/').to_string(),
                database_id: database_id.into(),
            }),
        })
    }

    /// Execute a single query request (one page of results).
    ///
    /// # Errors
    ///
    /// Returns `NotionError::Api` on a non-success status,
    /// `NotionError::RateLimited` on 429, and `NotionError::Parse` if the
    /// body is not a valid query response.
    #[instrument(skip(self, request))]
    pub async fn query_page(&self, request: &QueryRequest) -> Result<QueryResponse, NotionError> {
        let url = format!(
            "{}/databases/{}/query",
            self.inner.base_url, self.inner.database_id
        );

        let response = self.inner.client.post(&url).json(request).send().await?;

        if response.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse().ok())
                .unwrap_or(60);
            return Err(NotionError::RateLimited(retry_after));
        }

        let status = response.status();
        if !status.is_success() {
            let body: String = response
                .text()
                .await
                .unwrap_or_default()
                .chars()
                .take(ERROR_BODY_LIMIT)
                .collect();
            return Err(NotionError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        response
            .json::<QueryResponse>()
            .await
            .map_err(|e| NotionError::Parse(e.to_string()))
    }

    /// Fetch every record matching a filter, following the continuation
    /// cursor until the server signals no further pages.
    ///
    /// All pages are concatenated before returning; a failure on any page
    /// propagates instead of returning a truncated set, so a transient
    /// network blip can never be mistaken for a smaller database.
    ///
    /// # Errors
    ///
    /// Returns the first page-level error encountered.
    #[instrument(skip(self, filter, sorts))]
    pub async fn query_all(
        &self,
        filter: Option<Filter>,
        sorts: Vec<Sort>,
    ) -> Result<Vec<Page>, NotionError> {
        let mut pages = Vec::new();
        let mut cursor: Option<String> = None;

        loop {
            let request = QueryRequest {
                filter: filter.clone(),
                sorts: sorts.clone(),
                page_size: Some(MAX_PAGE_SIZE),
                start_cursor: cursor,
            };

            let response = self.query_page(&request).await?;
            pages.extend(response.results);

            match (response.has_more, response.next_cursor) {
                (true, Some(next)) => cursor = Some(next),
                _ => break,
            }
        }

        debug!(count = pages.len(), "fetched all query pages");

        Ok(pages)
    }

    /// Single-shot point query that never follows cursors.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails.
    #[instrument(skip(self, filter, sorts))]
    pub async fn query_one(
        &self,
        filter: Option<Filter>,
        sorts: Vec<Sort>,
    ) -> Result<Vec<Page>, NotionError> {
        let request = QueryRequest {
            filter,
            sorts,
            page_size: Some(MAX_PAGE_SIZE),
            start_cursor: None,
        };

        Ok(self.query_page(&request).await?.results)
    }
}
