//! The three built-in extraction tiers.

use std::sync::LazyLock;

use readabilityrs::{Readability, ReadabilityOptions};
use regex::Regex;
use scraper::Selector;
use webfetch_core::Error;

use super::{ExtractionMethod, ExtractionTier, MIN_CONTENT_CHARS, SourceDocument, TierOutput, visible_text_len};

/// Content containers probed by [`SelectorTier`], in order.
pub const CONTENT_SELECTORS: &[&str] = &["main", "article", "#content", ".content", ".main"];

static SCRIPT_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<script\b[^>]*>.*?</script\s*>").expect("valid regex"));

static STYLE_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<style\b[^>]*>.*?</style\s*>").expect("valid regex"));

static COMMENT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)<!--.*?-->").expect("valid regex"));

static BODY: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?is)<body\b[^>]*>(.*)</body\s*>").expect("valid regex"));

/// Readability scoring over a private copy of the document.
pub struct ReadabilityTier {
    min_chars: usize,
}

impl Default for ReadabilityTier {
    fn default() -> Self {
        Self { min_chars: MIN_CONTENT_CHARS }
    }
}

impl ExtractionTier for ReadabilityTier {
    fn name(&self) -> &'static str {
        "readability"
    }

    fn extract(&self, doc: &SourceDocument<'_>) -> Result<Option<TierOutput>, Error> {
        let readability = Readability::new(doc.raw, Some(doc.url), Some(ReadabilityOptions::default()))
            .map_err(|e| Error::ExtractFailed(format!("readability setup failed: {}", e)))?;

        let Some(article) = readability.parse() else {
            return Ok(None);
        };

        if article.length <= self.min_chars {
            tracing::debug!(length = article.length, "readability result below threshold");
            return Ok(None);
        }

        let Some(content) = article.content.filter(|c| !c.trim().is_empty()) else {
            return Ok(None);
        };

        Ok(Some(TierOutput {
            html: content,
            title: article.title,
            excerpt: article.excerpt.or_else(|| doc.description()),
            method: ExtractionMethod::Readability,
        }))
    }
}

/// Probe well-known content containers in a fixed order.
pub struct SelectorTier {
    selectors: &'static [&'static str],
    min_chars: usize,
}

impl Default for SelectorTier {
    fn default() -> Self {
        Self { selectors: CONTENT_SELECTORS, min_chars: MIN_CONTENT_CHARS }
    }
}

impl ExtractionTier for SelectorTier {
    fn name(&self) -> &'static str {
        "selector"
    }

    fn extract(&self, doc: &SourceDocument<'_>) -> Result<Option<TierOutput>, Error> {
        for &name in self.selectors {
            let selector =
                Selector::parse(name).map_err(|e| Error::ExtractFailed(format!("bad selector {name}: {e}")))?;

            let Some(element) = doc.parsed.select(&selector).next() else {
                continue;
            };

            if visible_text_len(element) > self.min_chars {
                return Ok(Some(TierOutput {
                    html: element.inner_html(),
                    title: None,
                    excerpt: None,
                    method: ExtractionMethod::Selector(name),
                }));
            }
        }

        Ok(None)
    }
}

/// Terminal fallback: the page body without scripts, styles and comments.
pub struct BasicCleanTier;

impl ExtractionTier for BasicCleanTier {
    fn name(&self) -> &'static str {
        "basic-clean"
    }

    fn extract(&self, doc: &SourceDocument<'_>) -> Result<Option<TierOutput>, Error> {
        let cleaned = strip_noise(doc.raw);
        let html = match BODY.captures(&cleaned).and_then(|c| c.get(1)) {
            Some(body) => body.as_str().trim().to_string(),
            None => cleaned.trim().to_string(),
        };

        Ok(Some(TierOutput { html, title: None, excerpt: None, method: ExtractionMethod::BasicClean }))
    }
}

/// Remove `<script>` and `<style>` blocks and HTML comments.
pub fn strip_noise(html: &str) -> String {
    let html = COMMENT.replace_all(html, "");
    let html = SCRIPT_BLOCK.replace_all(&html, "");
    STYLE_BLOCK.replace_all(&html, "").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filler(sentences: usize) -> String {
        "This sentence is filler text that pads the paragraph with readable words. ".repeat(sentences)
    }

    #[test]
    fn test_strip_noise() {
        let html = r#"<p>keep</p><script type="text/javascript">alert(1)</script><STYLE>p{}</STYLE><!-- gone
            across lines --><p>also keep</p>"#;
        let cleaned = strip_noise(html);
        assert_eq!(cleaned, "<p>keep</p><p>also keep</p>");
    }

    #[test]
    fn test_selector_tier_prefers_main() {
        let html = format!(
            "<html><body><nav>menu</nav><main><p>{}</p></main><article><p>{}</p></article></body></html>",
            filler(8),
            filler(8)
        );
        let doc = SourceDocument::parse(&html, "https://example.com");
        let output = SelectorTier::default().extract(&doc).unwrap().unwrap();
        assert_eq!(output.method, ExtractionMethod::Selector("main"));
        assert!(!output.html.contains("menu"));
    }

    #[test]
    fn test_selector_tier_skips_short_containers() {
        let html = format!(
            "<html><body><main><p>short</p></main><div id=\"content\"><p>{}</p></div></body></html>",
            filler(8)
        );
        let doc = SourceDocument::parse(&html, "https://example.com");
        let output = SelectorTier::default().extract(&doc).unwrap().unwrap();
        assert_eq!(output.method, ExtractionMethod::Selector("#content"));
    }

    #[test]
    fn test_selector_tier_nothing_long_enough() {
        let html = "<html><body><main>short</main><div class=\"content\">tiny</div></body></html>";
        let doc = SourceDocument::parse(html, "https://example.com");
        assert!(SelectorTier::default().extract(&doc).unwrap().is_none());
    }

    #[test]
    fn test_basic_clean_takes_body() {
        let html = "<html><head><title>T</title></head><body class=\"x\"><p>Body text</p><script>x()</script></body></html>";
        let doc = SourceDocument::parse(html, "https://example.com");
        let output = BasicCleanTier.extract(&doc).unwrap().unwrap();
        assert_eq!(output.html, "<p>Body text</p>");
        assert_eq!(output.method, ExtractionMethod::BasicClean);
    }

    #[test]
    fn test_basic_clean_without_body_tag() {
        let doc = SourceDocument::parse("plain text body", "https://example.com");
        let output = BasicCleanTier.extract(&doc).unwrap().unwrap();
        assert_eq!(output.html, "plain text body");
    }

    #[test]
    fn test_readability_tier_on_article() {
        let html = format!(
            r#"<html><head><title>Readable Article</title>
            <meta name="description" content="About things"></head>
            <body><div class="sidebar"><a href="/">Home</a></div>
            <article><h1>Readable Article</h1><p>{}</p><p>{}</p><p>{}</p></article></body></html>"#,
            filler(6),
            filler(6),
            filler(6)
        );
        let doc = SourceDocument::parse(&html, "https://example.com/post");
        let output = ReadabilityTier::default().extract(&doc).unwrap().unwrap();
        assert_eq!(output.method, ExtractionMethod::Readability);
        assert!(output.html.contains("filler text"));
        assert_eq!(output.excerpt.as_deref(), Some("About things"));
    }
}
