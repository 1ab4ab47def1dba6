//! clear_continuations tool implementation.
//!
//! Drops every pending continuation token.

use rmcp::{
    ErrorData as McpError,
    model::{CallToolResult, Content},
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use webfetch_client::WebFetcher;
use webfetch_core::Error;

/// Parameters for the clear_continuations tool. Takes none.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct ClearContinuationsParams {}

/// Output from the clear_continuations tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ClearContinuationsOutput {
    /// Number of continuations removed.
    pub cleared: usize,
}

/// Implementation of the clear_continuations tool.
pub async fn clear_impl(fetcher: &WebFetcher, _params: ClearContinuationsParams) -> Result<CallToolResult, McpError> {
    let output = ClearContinuationsOutput { cleared: fetcher.clear_cache().await };
    let json = serde_json::to_string_pretty(&output)
        .map_err(|e| Error::InvalidInput(format!("Failed to serialize output: {e}")))?;

    Ok(CallToolResult::success(vec![Content::text(json)]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::test_support::{fetcher_serving, long_page, result_text};
    use webfetch_client::FetchRequest;

    #[tokio::test]
    async fn test_clear_empty_store() {
        let fetcher = fetcher_serving("<p>x</p>");
        let result = clear_impl(&fetcher, ClearContinuationsParams::default()).await.unwrap();
        let output: ClearContinuationsOutput = serde_json::from_str(&result_text(&result)).unwrap();
        assert_eq!(output.cleared, 0);
    }

    #[tokio::test]
    async fn test_clear_reports_count_and_invalidates() {
        let fetcher = fetcher_serving(&long_page());
        let first = fetcher
            .fetch(&FetchRequest::url("https://example.com/a").with_max_chars(200))
            .await
            .unwrap();
        fetcher
            .fetch(&FetchRequest::url("https://example.com/b").with_max_chars(200))
            .await
            .unwrap();

        let result = clear_impl(&fetcher, ClearContinuationsParams::default()).await.unwrap();
        let output: ClearContinuationsOutput = serde_json::from_str(&result_text(&result)).unwrap();
        assert_eq!(output.cleared, 2);

        let token = first.continuation_token.unwrap();
        assert!(fetcher.fetch(&FetchRequest::continuation(token)).await.is_err());
    }
}
