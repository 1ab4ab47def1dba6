//! Unified error types for webfetch.
//!
//! Every variant renders with a stable code prefix so callers can tell the
//! failure classes apart from the message alone.

use rmcp::model::{ErrorCode, ErrorData as McpError};

/// Message carried by every continuation miss.
pub const CONTINUATION_INVALID_MSG: &str = "continuation token expired or invalid";

/// Unified error types for the webfetch pipeline.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Invalid input parameters (e.g., missing URL, `max_chars` out of range).
    #[error("INVALID_INPUT: {0}")]
    InvalidInput(String),

    /// Invalid URL.
    #[error("INVALID_URL: {0}")]
    InvalidUrl(String),

    /// Fetch exceeded its wall-clock budget.
    #[error("FETCH_TIMEOUT: {0}")]
    FetchTimeout(String),

    /// Fetch response too large.
    #[error("FETCH_TOO_LARGE: {0}")]
    FetchTooLarge(String),

    /// Non-success HTTP status or network failure.
    #[error("HTTP_ERROR: {0}")]
    HttpError(String),

    /// Response content type is not a text-like format.
    #[error("UNSUPPORTED_CONTENT_TYPE: {0}")]
    UnsupportedContentType(String),

    /// Content extraction or conversion failed.
    #[error("EXTRACT_FAILED: {0}")]
    ExtractFailed(String),

    /// Continuation token unknown or expired.
    #[error("CONTINUATION_INVALID: {CONTINUATION_INVALID_MSG}")]
    ContinuationInvalid,
}

impl From<Error> for McpError {
    fn from(err: Error) -> Self {
        let (code, message) = match &err {
            Error::InvalidInput(msg) => (-32602, msg.clone()),
            Error::ExtractFailed(msg) => (-32000, msg.clone()),
            Error::ContinuationInvalid => (-32001, CONTINUATION_INVALID_MSG.to_string()),
            Error::InvalidUrl(msg) => (-32003, msg.clone()),
            Error::FetchTimeout(msg) => (-32006, msg.clone()),
            Error::FetchTooLarge(msg) => (-32007, msg.clone()),
            Error::HttpError(msg) => (-32008, msg.clone()),
            Error::UnsupportedContentType(msg) => (-32013, msg.clone()),
        };

        McpError { code: ErrorCode(code), message: message.into(), data: None }
    }
}
