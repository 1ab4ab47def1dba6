//! HTTP transport capability and response gates.
//!
//! ### Transport Capability
//! - `Transport` is the injectable seam: anything that can issue a GET and
//!   hand back a `TransportResponse` (status, headers, body text).
//! - `ReqwestTransport` is the production implementation.
//!
//! ### Gates
//! - Content-Type must be text-like (HTML, XHTML, plain text, JSON, XML).
//! - Body size is checked against the byte limit before any parsing.
//! - Oversized bodies are rejected, never truncated.

pub mod url;

use async_trait::async_trait;
use reqwest::{Client, header};
use std::time::Duration;

pub use url::{UrlError, canonicalize, normalize_viewer_url};

use webfetch_core::Error;

/// Content types accepted verbatim.
const ACCEPTED_CONTENT_TYPES: &[&str] = &["text/html", "application/xhtml+xml", "text/plain"];

/// Generic markers accepted anywhere in the content type.
const ACCEPTED_CONTENT_MARKERS: &[&str] = &["text", "json", "xml"];

/// Configuration for the reqwest transport.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// Maximum number of redirects to follow (default: 5)
    pub max_redirects: usize,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self { max_redirects: 5 }
    }
}

/// A single GET issued through a [`Transport`].
#[derive(Debug, Clone)]
pub struct TransportRequest {
    pub url: String,
    pub user_agent: String,
    pub timeout: Duration,
}

/// Response handed back by a [`Transport`].
#[async_trait]
pub trait TransportResponse: Send {
    /// Whether the status is in the success range.
    fn ok(&self) -> bool;

    fn status(&self) -> u16;

    fn status_text(&self) -> String;

    /// Look up a header value by case-insensitive name.
    fn header(&self, name: &str) -> Option<String>;

    /// Read the full body as text. Consumes the body; later calls fail.
    async fn text(&mut self) -> Result<String, Error>;
}

/// Injectable HTTP capability used by the fetch pipeline.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get(&self, request: &TransportRequest) -> Result<Box<dyn TransportResponse>, Error>;
}

/// Transport backed by a shared reqwest client.
pub struct ReqwestTransport {
    http: Client,
}

impl ReqwestTransport {
    /// Create a new transport with the given configuration.
    pub fn new(config: FetchConfig) -> Result<Self, Error> {
        let http = Client::builder()
            .redirect(reqwest::redirect::Policy::limited(config.max_redirects))
            .use_rustls_tls()
            .gzip(true)
            .brotli(true)
            .deflate(true)
            .build()
            .map_err(|e| Error::HttpError(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self { http })
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn get(&self, request: &TransportRequest) -> Result<Box<dyn TransportResponse>, Error> {
        let url = canonicalize(&request.url).map_err(|e| Error::InvalidUrl(e.to_string()))?;

        let response = self
            .http
            .get(url.as_str())
            .header(header::USER_AGENT, &request.user_agent)
            .header(
                header::ACCEPT,
                "text/html,application/xhtml+xml,application/xml;q=0.9,text/plain;q=0.8,*/*;q=0.5",
            )
            .timeout(request.timeout)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    Error::FetchTimeout(format!("{} after {}ms", url, request.timeout.as_millis()))
                } else {
                    Error::HttpError(format!("network error: {}", e))
                }
            })?;

        tracing::debug!("fetched {} -> {} ({})", url, response.url(), response.status());

        Ok(Box::new(ReqwestResponse {
            status: response.status(),
            headers: response.headers().clone(),
            body: Some(response),
        }))
    }
}

struct ReqwestResponse {
    status: reqwest::StatusCode,
    headers: header::HeaderMap,
    body: Option<reqwest::Response>,
}

#[async_trait]
impl TransportResponse for ReqwestResponse {
    fn ok(&self) -> bool {
        self.status.is_success()
    }

    fn status(&self) -> u16 {
        self.status.as_u16()
    }

    fn status_text(&self) -> String {
        self.status.canonical_reason().unwrap_or_default().to_string()
    }

    fn header(&self, name: &str) -> Option<String> {
        self.headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string())
    }

    async fn text(&mut self) -> Result<String, Error> {
        let response = self
            .body
            .take()
            .ok_or_else(|| Error::HttpError("response body already consumed".into()))?;

        response.text().await.map_err(|e| {
            if e.is_timeout() {
                Error::FetchTimeout(format!("reading body: {}", e))
            } else {
                Error::HttpError(format!("failed to read response: {}", e))
            }
        })
    }
}

/// Reject responses whose content type is not text-like.
///
/// A missing Content-Type header is rejected as well.
pub fn check_content_type(content_type: Option<&str>) -> Result<(), Error> {
    let raw = content_type.unwrap_or_default();
    let lowered = raw.to_ascii_lowercase();

    let accepted = ACCEPTED_CONTENT_TYPES.iter().any(|t| lowered.contains(t))
        || ACCEPTED_CONTENT_MARKERS.iter().any(|m| lowered.contains(m));

    if accepted {
        Ok(())
    } else if raw.is_empty() {
        Err(Error::UnsupportedContentType("response has no content type".into()))
    } else {
        Err(Error::UnsupportedContentType(raw.to_string()))
    }
}

/// Reject a declared `Content-Length` above `max_bytes`.
pub fn check_declared_length(content_length: Option<&str>, max_bytes: usize) -> Result<(), Error> {
    if let Some(len) = content_length.and_then(|v| v.trim().parse::<u64>().ok())
        && len > max_bytes as u64
    {
        return Err(Error::FetchTooLarge(format!("{} bytes exceeds {}", len, max_bytes)));
    }
    Ok(())
}

/// Reject a body longer than `max_bytes`.
pub fn check_body_size(body: &str, max_bytes: usize) -> Result<(), Error> {
    if body.len() > max_bytes {
        return Err(Error::FetchTooLarge(format!("{} bytes exceeds {}", body.len(), max_bytes)));
    }
    Ok(())
}
