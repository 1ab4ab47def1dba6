//! Fetch, extract and paginate web pages as Markdown.
//!
//! The pipeline runs URL normalization, an injectable HTTP transport,
//! tiered main-content extraction, heading indexing and section filtering,
//! Markdown conversion and character-budget pagination. Long documents are
//! parked in the continuation store from `webfetch-core`.

pub mod convert;
pub mod extract;
pub mod fetch;
pub mod paginate;
pub mod pipeline;

pub use convert::{CodeFence, ConvertOptions, MarkdownConverter};
pub use extract::{ExtractedContent, ExtractionMethod, ExtractionTier, Extractor, Heading, HeadingSelector};
pub use fetch::{FetchConfig, ReqwestTransport, Transport, TransportRequest, TransportResponse};
pub use paginate::{Page, TRUNCATION_MARKER, paginate};
pub use pipeline::{FetchDefaults, FetchRequest, FetchResult, WebFetcher, WebFetcherBuilder};
