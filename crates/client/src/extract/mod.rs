//! Main-content extraction with an ordered fallback chain.
//!
//! ### Tiers
//! 1. Readability scoring over a private copy of the markup; accepted only
//!    above [`MIN_CONTENT_CHARS`] characters of text.
//! 2. Common content containers (`main`, `article`, `#content`, `.content`,
//!    `.main`); the first one above the same threshold wins.
//! 3. Basic clean: the document minus scripts, styles and comments.
//!
//! A tier that errors is treated as having produced nothing. The caller never
//! sees tier failures; basic clean always answers, possibly with an empty
//! fragment.
//!
//! ### Stable Abstraction
//! - Tiers implement [`ExtractionTier`] so the chain can be reordered or
//!   extended without touching the pipeline.

pub mod headings;
pub mod sections;
pub mod tiers;

use std::fmt;

use scraper::{ElementRef, Html, Selector};
use webfetch_core::Error;

pub use headings::{Heading, index_headings, render_toc};
pub use sections::{HeadingSelector, filter_sections};
pub use tiers::{BasicCleanTier, ReadabilityTier, SelectorTier};

/// Minimum text length, in characters, a tier must exceed to be accepted.
pub const MIN_CONTENT_CHARS: usize = 300;

/// Title used when neither the tier nor the document names one.
pub const UNTITLED: &str = "Untitled";

/// Which tier produced an [`ExtractedContent`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractionMethod {
    Readability,
    Selector(&'static str),
    BasicClean,
}

impl fmt::Display for ExtractionMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Readability => f.write_str("readability"),
            Self::Selector(name) => write!(f, "selector:{name}"),
            Self::BasicClean => f.write_str("basic-clean"),
        }
    }
}

/// Best-effort main content of a page.
#[derive(Debug, Clone)]
pub struct ExtractedContent {
    /// Content HTML fragment; empty when the page has no visible body.
    pub html: String,
    pub title: String,
    pub excerpt: Option<String>,
    pub method: ExtractionMethod,
}

/// What a single tier hands back before title resolution.
#[derive(Debug, Clone)]
pub struct TierOutput {
    pub html: String,
    pub title: Option<String>,
    pub excerpt: Option<String>,
    pub method: ExtractionMethod,
}

/// A parsed page plus the raw markup it came from.
pub struct SourceDocument<'a> {
    pub raw: &'a str,
    pub url: &'a str,
    pub parsed: Html,
}

impl<'a> SourceDocument<'a> {
    pub fn parse(raw: &'a str, url: &'a str) -> Self {
        Self { raw, url, parsed: Html::parse_document(raw) }
    }

    /// Text of the document's `<title>`, if present and non-empty.
    pub fn title(&self) -> Option<String> {
        let selector = Selector::parse("title").ok()?;
        self.parsed
            .select(&selector)
            .next()
            .map(|el| collapse_whitespace(&el.text().collect::<String>()))
            .filter(|t| !t.is_empty())
    }

    /// Content of the page's description meta tag, if present.
    pub fn description(&self) -> Option<String> {
        ["meta[name=\"description\"]", "meta[property=\"og:description\"]"]
            .iter()
            .filter_map(|s| Selector::parse(s).ok())
            .find_map(|selector| {
                self.parsed
                    .select(&selector)
                    .filter_map(|el| el.value().attr("content"))
                    .map(collapse_whitespace)
                    .find(|d| !d.is_empty())
            })
    }
}

/// One strategy in the fallback chain.
///
/// `Ok(None)` means "nothing usable here"; errors are treated the same way
/// by [`Extractor`].
pub trait ExtractionTier: Send + Sync {
    fn name(&self) -> &'static str;

    fn extract(&self, doc: &SourceDocument<'_>) -> Result<Option<TierOutput>, Error>;
}

/// Ordered chain of extraction tiers; the first non-empty result wins.
pub struct Extractor {
    tiers: Vec<Box<dyn ExtractionTier>>,
}

impl Default for Extractor {
    fn default() -> Self {
        Self::new(vec![Box::new(ReadabilityTier::default()), Box::new(SelectorTier::default()), Box::new(BasicCleanTier)])
    }
}

impl Extractor {
    pub fn new(tiers: Vec<Box<dyn ExtractionTier>>) -> Self {
        Self { tiers }
    }

    /// Run the chain over `html` fetched from `url`.
    ///
    /// Never fails: the last tier's output is taken as is, even when empty,
    /// and a chain that yields nothing at all produces an empty basic-clean
    /// result.
    pub fn extract(&self, html: &str, url: &str) -> ExtractedContent {
        let doc = SourceDocument::parse(html, url);
        let last = self.tiers.len().saturating_sub(1);

        let output = self.tiers.iter().enumerate().find_map(|(i, tier)| match tier.extract(&doc) {
            Ok(Some(output)) if i == last || !output.html.trim().is_empty() => Some(output),
            Ok(_) => {
                tracing::debug!(tier = tier.name(), "extraction tier produced nothing");
                None
            }
            Err(e) => {
                tracing::debug!(tier = tier.name(), "extraction tier failed: {e}");
                None
            }
        });

        let output = output.unwrap_or_else(|| {
            tracing::debug!("no extraction tier produced content for {}", url);
            TierOutput { html: String::new(), title: None, excerpt: None, method: ExtractionMethod::BasicClean }
        });

        let title = output
            .title
            .map(|t| collapse_whitespace(&t))
            .filter(|t| !t.is_empty())
            .or_else(|| doc.title())
            .unwrap_or_else(|| UNTITLED.to_string());

        tracing::debug!(method = %output.method, "extracted content from {}", url);

        ExtractedContent { html: output.html.trim().to_string(), title, excerpt: output.excerpt, method: output.method }
    }
}

/// Length in characters of the visible text under `element`.
///
/// Text inside `script`, `style`, `noscript` and `template` is ignored.
pub fn visible_text_len(element: ElementRef<'_>) -> usize {
    let mut text = String::new();
    for node in element.descendants() {
        let Some(fragment) = node.value().as_text() else { continue };
        let hidden = node.ancestors().any(|ancestor| {
            ancestor
                .value()
                .as_element()
                .is_some_and(|el| matches!(el.name(), "script" | "style" | "noscript" | "template"))
        });
        if !hidden {
            text.push_str(fragment);
        }
    }
    text.trim().chars().count()
}

fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}
