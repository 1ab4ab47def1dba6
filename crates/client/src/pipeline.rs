//! The fetch-or-continue pipeline.
//!
//! First call: normalize URL, fetch, extract, index headings, filter
//! sections, convert, paginate. When more text remains, the converted
//! document is parked in the continuation store and a token is returned.
//!
//! Continuation call: resolve the token, paginate from the stored offset,
//! and mint a fresh token if text still remains. No network I/O.

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use webfetch_core::config::{MAX_MAX_CHARS, MIN_MAX_CHARS};
use webfetch_core::{AppConfig, ContinuationEntry, ContinuationStore, Error};

use crate::convert::{ConvertOptions, MarkdownConverter};
use crate::extract::{Extractor, HeadingSelector, filter_sections, index_headings, render_toc};
use crate::fetch::{
    Transport, TransportRequest, check_body_size, check_content_type, check_declared_length, normalize_viewer_url,
};
use crate::paginate::paginate;

/// A fetch-or-continue request.
///
/// `continuation_token` wins when both it and `url` are set. Unset options
/// fall back to the fetcher's [`FetchDefaults`].
#[derive(Debug, Clone, Default)]
pub struct FetchRequest {
    pub url: Option<String>,
    pub continuation_token: Option<String>,
    pub max_chars: Option<usize>,
    pub headings: Vec<HeadingSelector>,
    pub timeout: Option<Duration>,
    pub user_agent: Option<String>,
    pub max_body_bytes: Option<usize>,
}

impl FetchRequest {
    /// Request for the first page of `url`.
    pub fn url(url: impl Into<String>) -> Self {
        Self { url: Some(url.into()), ..Default::default() }
    }

    /// Request for the page behind `token`.
    pub fn continuation(token: impl Into<String>) -> Self {
        Self { continuation_token: Some(token.into()), ..Default::default() }
    }

    pub fn with_max_chars(mut self, max_chars: usize) -> Self {
        self.max_chars = Some(max_chars);
        self
    }

    pub fn with_headings(mut self, headings: Vec<HeadingSelector>) -> Self {
        self.headings = headings;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// What a fetch-or-continue call hands back.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchResult {
    pub title: String,
    pub url: String,
    pub markdown: String,
    /// Outline of the extracted fragment; `None` without headings and on
    /// continuation pages.
    pub toc: Option<String>,
    /// Set only when text remains and no heading filter was applied.
    pub continuation_token: Option<String>,
    pub method: String,
}

/// Per-request defaults.
#[derive(Debug, Clone)]
pub struct FetchDefaults {
    pub user_agent: String,
    pub timeout: Duration,
    pub max_body_bytes: usize,
    pub max_chars: usize,
}

impl Default for FetchDefaults {
    fn default() -> Self {
        Self::from(&AppConfig::default())
    }
}

impl From<&AppConfig> for FetchDefaults {
    fn from(config: &AppConfig) -> Self {
        Self {
            user_agent: config.user_agent.clone(),
            timeout: config.timeout(),
            max_body_bytes: config.max_body_bytes,
            max_chars: config.default_max_chars,
        }
    }
}

/// Converted document ready for pagination.
struct PreparedDocument {
    title: String,
    method: String,
    markdown: String,
    toc: Option<String>,
    filtered: bool,
}

/// Fetch, extract and paginate web pages.
pub struct WebFetcher {
    transport: Arc<dyn Transport>,
    store: ContinuationStore,
    extractor: Extractor,
    convert_options: ConvertOptions,
    defaults: FetchDefaults,
}

/// Builder for [`WebFetcher`]; a transport is required.
#[derive(Default)]
pub struct WebFetcherBuilder {
    transport: Option<Arc<dyn Transport>>,
    store: Option<ContinuationStore>,
    extractor: Option<Extractor>,
    convert_options: Option<ConvertOptions>,
    defaults: Option<FetchDefaults>,
}

impl WebFetcherBuilder {
    pub fn transport(mut self, transport: impl Transport + 'static) -> Self {
        self.transport = Some(Arc::new(transport));
        self
    }

    pub fn store(mut self, store: ContinuationStore) -> Self {
        self.store = Some(store);
        self
    }

    pub fn extractor(mut self, extractor: Extractor) -> Self {
        self.extractor = Some(extractor);
        self
    }

    pub fn convert_options(mut self, options: ConvertOptions) -> Self {
        self.convert_options = Some(options);
        self
    }

    pub fn defaults(mut self, defaults: FetchDefaults) -> Self {
        self.defaults = Some(defaults);
        self
    }

    /// Take defaults and store TTL from application config.
    pub fn config(self, config: &AppConfig) -> Self {
        let with_store = if self.store.is_none() {
            self.store(ContinuationStore::new(config.continuation_ttl()))
        } else {
            self
        };
        with_store.defaults(FetchDefaults::from(config))
    }

    pub fn build(self) -> Result<WebFetcher, Error> {
        let transport = self
            .transport
            .ok_or_else(|| Error::InvalidInput("a transport is required".into()))?;

        Ok(WebFetcher {
            transport,
            store: self.store.unwrap_or_default(),
            extractor: self.extractor.unwrap_or_default(),
            convert_options: self.convert_options.unwrap_or_default(),
            defaults: self.defaults.unwrap_or_default(),
        })
    }
}

impl WebFetcher {
    pub fn builder() -> WebFetcherBuilder {
        WebFetcherBuilder::default()
    }

    pub fn store(&self) -> &ContinuationStore {
        &self.store
    }

    pub fn defaults(&self) -> &FetchDefaults {
        &self.defaults
    }

    /// Drop every parked continuation. Returns how many were removed.
    pub async fn clear_cache(&self) -> usize {
        let removed = self.store.clear().await;
        tracing::debug!(removed, "cleared continuation store");
        removed
    }

    /// Serve one fetch-or-continue request.
    pub async fn fetch(&self, request: &FetchRequest) -> Result<FetchResult, Error> {
        let max_chars = request.max_chars.unwrap_or(self.defaults.max_chars);
        if !(MIN_MAX_CHARS..=MAX_MAX_CHARS).contains(&max_chars) {
            return Err(Error::InvalidInput(format!(
                "max_chars must be between {MIN_MAX_CHARS} and {MAX_MAX_CHARS}, got {max_chars}"
            )));
        }

        if let Some(token) = request.continuation_token.as_deref().filter(|t| !t.trim().is_empty()) {
            return self.continue_from(token, max_chars).await;
        }

        match request.url.as_deref().map(str::trim).filter(|u| !u.is_empty()) {
            Some(url) => self.fetch_url(url, request, max_chars).await,
            None => Err(Error::InvalidInput("url is required unless continuation_token is given".into())),
        }
    }

    async fn continue_from(&self, token: &str, max_chars: usize) -> Result<FetchResult, Error> {
        let entry = self.store.get(token).await?;
        let page = paginate(&entry.full_markdown, max_chars, entry.offset);

        let continuation_token = if page.has_more {
            let next = ContinuationEntry::new(
                Arc::clone(&entry.full_markdown),
                page.next_offset,
                entry.source_url.clone(),
                entry.title.clone(),
                entry.method.clone(),
            );
            Some(self.store.put(next).await)
        } else {
            None
        };

        tracing::debug!(
            offset = entry.offset,
            next_offset = page.next_offset,
            has_more = page.has_more,
            "continued {}",
            entry.source_url
        );

        Ok(FetchResult {
            title: entry.title,
            url: entry.source_url,
            markdown: page.content,
            toc: None,
            continuation_token,
            method: entry.method,
        })
    }

    async fn fetch_url(&self, url: &str, request: &FetchRequest, max_chars: usize) -> Result<FetchResult, Error> {
        let target = normalize_viewer_url(url);
        if target != url {
            tracing::debug!("rewrote {} -> {}", url, target);
        }

        let timeout = request.timeout.unwrap_or(self.defaults.timeout);
        let max_body_bytes = request.max_body_bytes.unwrap_or(self.defaults.max_body_bytes);
        let transport_request = TransportRequest {
            url: target.clone(),
            user_agent: request.user_agent.clone().unwrap_or_else(|| self.defaults.user_agent.clone()),
            timeout,
        };

        let body = tokio::time::timeout(timeout, self.download(&transport_request, max_body_bytes))
            .await
            .map_err(|_| Error::FetchTimeout(format!("{} after {}ms", target, timeout.as_millis())))??;

        let document = self.prepare(&body, &target, &request.headings)?;
        let page = paginate(&document.markdown, max_chars, 0);

        let continuation_token = if page.has_more && !document.filtered {
            let entry = ContinuationEntry::new(
                Arc::from(document.markdown),
                page.next_offset,
                target.clone(),
                document.title.clone(),
                document.method.clone(),
            );
            Some(self.store.put(entry).await)
        } else {
            None
        };

        Ok(FetchResult {
            title: document.title,
            url: target,
            markdown: page.content,
            toc: document.toc,
            continuation_token,
            method: document.method,
        })
    }

    async fn download(&self, request: &TransportRequest, max_body_bytes: usize) -> Result<String, Error> {
        let mut response = self.transport.get(request).await?;

        if !response.ok() {
            return Err(Error::HttpError(format!("status {} {}", response.status(), response.status_text())));
        }

        check_content_type(response.header("content-type").as_deref())?;
        check_declared_length(response.header("content-length").as_deref(), max_body_bytes)?;

        let body = response.text().await?;
        check_body_size(&body, max_body_bytes)?;

        Ok(body)
    }

    /// Extract, outline, filter and convert a fetched page.
    fn prepare(&self, body: &str, url: &str, selectors: &[HeadingSelector]) -> Result<PreparedDocument, Error> {
        let content = self.extractor.extract(body, url);
        let headings = index_headings(&content.html);
        let toc = render_toc(&headings);

        let filtered = if selectors.is_empty() { None } else { filter_sections(&content.html, &headings, selectors) };
        let is_filtered = filtered.is_some();
        let html = filtered.as_deref().unwrap_or(&content.html);

        let markdown = MarkdownConverter::new(self.convert_options).convert(html)?;

        tracing::debug!(
            method = %content.method,
            headings = headings.len(),
            filtered = is_filtered,
            chars = markdown.chars().count(),
            "prepared {}",
            url
        );

        Ok(PreparedDocument {
            title: content.title,
            method: content.method.to_string(),
            markdown,
            toc,
            filtered: is_filtered,
        })
    }
}
