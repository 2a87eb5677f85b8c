//! HTTP client for the Notion API.
//!
//! Wraps a pooled reqwest client carrying the integration secret and the
//! pinned API version header. Each operation logs its failure at the point
//! it occurs and propagates the error unchanged; nothing here retries.

use std::time::Duration;

use daybook_core::{ContentBlock, DiaryEntry, DiaryError, FieldSet, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, error, info, warn};

/// Property used to sort diary entries by recency.
const SORT_PROPERTY: &str = "Entry date";
/// Number of entries requested when looking for the most recent one.
const QUERY_PAGE_SIZE: u32 = 5;
/// Longest response-body slice quoted in error messages.
const MAX_ERROR_BODY: usize = 512;

/// Configuration for the Notion API client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Integration secret presented as a bearer token.
    pub api_key: String,
    /// API base URL; overridable so tests can point at a local server.
    pub base_url: String,
    /// Timeout applied to each API call.
    pub timeout: Duration,
    /// User agent string for requests.
    pub user_agent: String,
    /// Value of the `Notion-Version` header.
    pub notion_version: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: "https://api.notion.com".to_string(),
            timeout: Duration::from_secs(30),
            user_agent: "Daybook/0.3".to_string(),
            notion_version: "2022-06-28".to_string(),
        }
    }
}

/// Authenticated handle to the Notion API.
///
/// Cheap to clone; the underlying reqwest client pools connections. A new
/// handle is constructed per request in the HTTP layer, mirroring the
/// per-invocation client factory of the workflow.
#[derive(Debug, Clone)]
pub struct NotionClient {
    client: reqwest::Client,
    config: ClientConfig,
}

#[derive(Debug, Serialize)]
struct QueryRequest {
    page_size: u32,
    sorts: Vec<Sort>,
}

#[derive(Debug, Serialize)]
struct Sort {
    property: &'static str,
    direction: &'static str,
}

#[derive(Debug, Deserialize)]
struct QueryResponse {
    results: Option<Vec<DiaryEntry>>,
}

#[derive(Debug, Serialize)]
struct CreateRequest<'a> {
    parent: Parent<'a>,
    properties: &'a FieldSet,
    children: &'a [ContentBlock],
}

#[derive(Debug, Serialize)]
struct Parent<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    database_id: &'a str,
}

impl NotionClient {
    /// Creates an authenticated client.
    ///
    /// This is a pure precondition check plus client construction; no call
    /// is made to the API.
    ///
    /// # Errors
    ///
    /// Returns `DiaryError::Configuration` when the API secret is missing
    /// or empty, and `DiaryError::Remote` when the HTTP client cannot be
    /// built from the given settings.
    pub fn new(config: ClientConfig) -> Result<Self> {
        if config.api_key.is_empty() {
            error!("NOTION_API_KEY is missing");
            return Err(DiaryError::configuration("NOTION_API_KEY is missing"));
        }

        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()
            .map_err(|e| DiaryError::remote(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { client, config })
    }

    /// Queries the diary database for its most recent entry.
    ///
    /// Requests up to five entries sorted descending by entry date and
    /// returns the first.
    ///
    /// # Errors
    ///
    /// Returns `DiaryError::NotFound` when the database holds no entries
    /// and `DiaryError::Remote` when the query itself fails.
    pub async fn find_most_recent_entry(&self, database_id: &str) -> Result<DiaryEntry> {
        let url = format!("{}/v1/databases/{database_id}/query", self.config.base_url);
        let body = QueryRequest {
            page_size: QUERY_PAGE_SIZE,
            sorts: vec![Sort { property: SORT_PROPERTY, direction: "descending" }],
        };

        debug!(database_id, "querying diary database");

        let payload = match self.execute(self.client.post(&url).json(&body), "database query").await
        {
            Ok(payload) => payload,
            Err(e) => {
                error!(database_id, error = %e, "error querying diary database");
                return Err(e);
            },
        };

        let response: QueryResponse = decode(payload, "database query")?;
        let Some(mut results) = response.results.filter(|results| !results.is_empty()) else {
            error!(database_id, "diary database query returned no entries");
            return Err(DiaryError::not_found("No diary entries found."));
        };

        let entry = results.remove(0);
        info!(database_id, entry_id = %entry.id, "found most recent diary entry");
        Ok(entry)
    }

    /// Lists the child content blocks of an entry, in document order.
    ///
    /// A single listing call is made. When the response reports further
    /// pages a warning is logged and only the first page is returned.
    ///
    /// # Errors
    ///
    /// Returns `DiaryError::Remote` when the call fails or the response
    /// carries no result container at all (distinct from a valid empty
    /// block list).
    pub async fn list_children(&self, entry_id: &str) -> Result<Vec<ContentBlock>> {
        let url = format!("{}/v1/blocks/{entry_id}/children", self.config.base_url);

        debug!(entry_id, "listing entry blocks");

        let payload = match self.execute(self.client.get(&url), "block listing").await {
            Ok(payload) => payload,
            Err(e) => {
                error!(entry_id, error = %e, "error listing blocks for entry");
                return Err(e);
            },
        };

        if payload.get("has_more").and_then(Value::as_bool) == Some(true) {
            warn!(entry_id, "entry has more blocks than a single listing returns");
        }

        match payload.get("results").and_then(Value::as_array) {
            Some(results) => Ok(results.clone()),
            None => {
                error!(entry_id, "block listing returned no result container");
                Err(DiaryError::remote("Could not retrieve blocks"))
            },
        }
    }

    /// Creates a new entry in the diary database with the given fields and
    /// body blocks, preserving block order.
    ///
    /// Returns the created entry's identifier, used by callers for logging
    /// only.
    ///
    /// # Errors
    ///
    /// Returns `DiaryError::Remote` when the call fails or the response
    /// does not describe a created object.
    pub async fn create_entry(
        &self,
        database_id: &str,
        properties: &FieldSet,
        children: &[ContentBlock],
    ) -> Result<String> {
        let url = format!("{}/v1/pages", self.config.base_url);
        let body = CreateRequest {
            parent: Parent { kind: "database_id", database_id },
            properties,
            children,
        };

        debug!(database_id, block_count = children.len(), "creating diary entry");

        let payload = match self.execute(self.client.post(&url).json(&body), "entry creation").await
        {
            Ok(payload) => payload,
            Err(e) => {
                error!(database_id, error = %e, "error creating diary entry");
                return Err(e);
            },
        };

        if payload.get("object").is_none() {
            error!(database_id, "entry creation response carries no object");
            return Err(DiaryError::remote(format!(
                "Failed to create a new entry in database {database_id}"
            )));
        }

        Ok(payload.get("id").and_then(Value::as_str).unwrap_or_default().to_string())
    }

    /// Sends a request with auth and version headers, maps transport and
    /// HTTP-status failures to `DiaryError::Remote`, and decodes the JSON
    /// body.
    async fn execute(&self, request: reqwest::RequestBuilder, operation: &str) -> Result<Value> {
        let response = request
            .bearer_auth(&self.config.api_key)
            .header("Notion-Version", &self.config.notion_version)
            .send()
            .await
            .map_err(|e| DiaryError::remote(format!("{operation} failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DiaryError::remote(format!(
                "{operation} failed: HTTP {}: {}",
                status.as_u16(),
                snippet(&body)
            )));
        }

        response
            .json()
            .await
            .map_err(|e| DiaryError::remote(format!("{operation} returned an invalid body: {e}")))
    }
}

/// Decodes an API payload into the expected response type.
fn decode<T: serde::de::DeserializeOwned>(payload: Value, operation: &str) -> Result<T> {
    serde_json::from_value(payload)
        .map_err(|e| DiaryError::remote(format!("{operation} returned an unexpected shape: {e}")))
}

/// Truncates a response body for inclusion in an error message.
fn snippet(body: &str) -> &str {
    let end = body
        .char_indices()
        .take_while(|(index, _)| *index < MAX_ERROR_BODY)
        .last()
        .map_or(0, |(index, c)| index + c.len_utf8());
    &body[..end]
}
