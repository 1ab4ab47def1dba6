//! MCP tool implementations.
//!
//! This module contains all tools exposed by the mcp-webfetch server.

pub mod cache;
pub mod web_fetch;

/// Fixed-response transport for tool tests.
#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use rmcp::model::CallToolResult;
    use webfetch_client::{Transport, TransportRequest, TransportResponse, WebFetcher};
    use webfetch_core::Error;

    pub struct StaticTransport {
        pub body: String,
        pub calls: Arc<AtomicUsize>,
    }

    struct StaticResponse {
        body: Option<String>,
    }

    #[async_trait]
    impl TransportResponse for StaticResponse {
        fn ok(&self) -> bool {
            true
        }

        fn status(&self) -> u16 {
            200
        }

        fn status_text(&self) -> String {
            "OK".into()
        }

        fn header(&self, name: &str) -> Option<String> {
            name.eq_ignore_ascii_case("content-type")
                .then(|| "text/html; charset=utf-8".to_string())
        }

        async fn text(&mut self) -> Result<String, Error> {
            self.body.take().ok_or_else(|| Error::HttpError("body consumed".into()))
        }
    }

    #[async_trait]
    impl Transport for StaticTransport {
        async fn get(&self, _request: &TransportRequest) -> Result<Box<dyn TransportResponse>, Error> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(Box::new(StaticResponse { body: Some(self.body.clone()) }))
        }
    }

    pub fn fetcher_with_counter(body: &str) -> (WebFetcher, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let transport = StaticTransport { body: body.to_string(), calls: Arc::clone(&calls) };
        let fetcher = WebFetcher::builder()
            .transport(transport)
            .build()
            .expect("transport is set");
        (fetcher, calls)
    }

    pub fn fetcher_serving(body: &str) -> WebFetcher {
        fetcher_with_counter(body).0
    }

    /// A page long enough to need several 200-character pages.
    pub fn long_page() -> String {
        let chapters: String = (1..=10)
            .map(|i| {
                format!(
                    "<h2>Chapter {i}</h2><p>{}</p>",
                    format!("Chapter {i} covers one more topic at length.\n").repeat(6)
                )
            })
            .collect();
        format!("<html><head><title>Handbook</title></head><body><article>{chapters}</article></body></html>")
    }

    /// Text payload of the first content item.
    pub fn result_text(result: &CallToolResult) -> String {
        let value = serde_json::to_value(&result.content[0]).expect("content serializes");
        value
            .get("text")
            .and_then(|v| v.as_str())
            .expect("Expected text field in content")
            .to_string()
    }
}
