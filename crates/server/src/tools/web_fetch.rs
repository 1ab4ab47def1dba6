//! web_fetch tool implementation.
//!
//! Fetches a URL (or resumes a continuation) through the client pipeline
//! and returns the page as Markdown.

use std::time::Duration;

use rmcp::{
    ErrorData as McpError,
    model::{CallToolResult, Content},
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use webfetch_client::{FetchRequest, FetchResult, HeadingSelector, WebFetcher};
use webfetch_core::Error;

/// Input parameters for the web_fetch tool.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct WebFetchParams {
    /// The URL to fetch. Required unless continuation_token is given.
    #[serde(default)]
    pub url: Option<String>,

    /// Character budget for the returned Markdown (200 to 200000, default 10000).
    #[serde(default)]
    pub max_chars: Option<usize>,

    /// Keep only the sections under these headings. Numbers are 1-based
    /// positions in the table of contents; strings match heading text
    /// case-insensitively.
    #[serde(default)]
    pub headings: Vec<HeadingParam>,

    /// Token from a previous truncated response. Takes precedence over url.
    #[serde(default)]
    pub continuation_token: Option<String>,

    /// Fetch timeout in milliseconds.
    #[serde(default)]
    pub timeout_ms: Option<u64>,

    /// User-Agent header override.
    #[serde(default)]
    pub user_agent: Option<String>,

    /// Maximum response body size in bytes.
    #[serde(default)]
    pub max_body_size_bytes: Option<usize>,
}

/// A heading picked by position or by text.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum HeadingParam {
    Index(i64),
    Text(String),
}

impl From<HeadingParam> for HeadingSelector {
    fn from(param: HeadingParam) -> Self {
        match param {
            HeadingParam::Index(n) => HeadingSelector::Index(n),
            HeadingParam::Text(text) => HeadingSelector::Text(text),
        }
    }
}

impl From<WebFetchParams> for FetchRequest {
    fn from(params: WebFetchParams) -> Self {
        FetchRequest {
            url: params.url,
            continuation_token: params.continuation_token,
            max_chars: params.max_chars,
            headings: params.headings.into_iter().map(HeadingSelector::from).collect(),
            timeout: params.timeout_ms.map(Duration::from_millis),
            user_agent: params.user_agent,
            max_body_bytes: params.max_body_size_bytes,
        }
    }
}

/// Output structure for the web_fetch tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct WebFetchOutput {
    /// Page title.
    pub title: String,
    /// The URL actually fetched, after viewer-URL rewriting.
    pub url: String,
    /// Markdown content, ending in a truncation notice when more remains.
    pub markdown: String,
    /// Indented outline of the page headings; null on continuation pages.
    pub toc: Option<String>,
    /// Pass back to read the next part; null when the content is complete
    /// or was filtered by headings.
    pub continuation_token: Option<String>,
    /// Extraction method that produced the content.
    pub method: String,
}

impl From<FetchResult> for WebFetchOutput {
    fn from(result: FetchResult) -> Self {
        Self {
            title: result.title,
            url: result.url,
            markdown: result.markdown,
            toc: result.toc,
            continuation_token: result.continuation_token,
            method: result.method,
        }
    }
}

/// Implementation of the web_fetch tool.
pub async fn fetch_impl(fetcher: &WebFetcher, params: WebFetchParams) -> Result<CallToolResult, McpError> {
    let request = FetchRequest::from(params);
    let output = WebFetchOutput::from(fetcher.fetch(&request).await?);

    let json = serde_json::to_string_pretty(&output)
        .map_err(|e| Error::InvalidInput(format!("Failed to serialize output: {e}")))?;

    Ok(CallToolResult::success(vec![Content::text(json)]))
}
