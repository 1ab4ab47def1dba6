//! HTML to Markdown conversion.

use htmd::HtmlToMarkdown;
use htmd::options::{CodeBlockFence, CodeBlockStyle, HeadingStyle, LinkStyle, Options};
use webfetch_core::Error;

/// Fence used for code blocks. Headings are always ATX.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CodeFence {
    #[default]
    Backticks,
    Tildes,
}

/// Style knobs passed through to the converter.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConvertOptions {
    pub code_fence: CodeFence,
}

/// Converts extracted HTML fragments to Markdown.
pub struct MarkdownConverter {
    inner: HtmlToMarkdown,
}

impl Default for MarkdownConverter {
    fn default() -> Self {
        Self::new(ConvertOptions::default())
    }
}

impl MarkdownConverter {
    pub fn new(options: ConvertOptions) -> Self {
        let options = Options {
            heading_style: HeadingStyle::Atx,
            code_block_style: CodeBlockStyle::Fenced,
            code_block_fence: match options.code_fence {
                CodeFence::Backticks => CodeBlockFence::Backticks,
                CodeFence::Tildes => CodeBlockFence::Tildes,
            },
            link_style: LinkStyle::Inlined,
            ..Default::default()
        };
        let inner = HtmlToMarkdown::builder()
            .options(options)
            .skip_tags(vec!["script", "style", "noscript"])
            .build();
        Self { inner }
    }

    pub fn convert(&self, html: &str) -> Result<String, Error> {
        self.inner
            .convert(html)
            .map_err(|e| Error::ExtractFailed(format!("markdown conversion failed: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_convert_atx_headings() {
        let md = MarkdownConverter::default()
            .convert("<h1>Title</h1><h2>Sub</h2><p>Body text</p>")
            .unwrap();
        assert!(md.contains("# Title"));
        assert!(md.contains("## Sub"));
        assert!(md.contains("Body text"));
    }

    #[test]
    fn test_convert_fenced_code() {
        let md = MarkdownConverter::default()
            .convert("<pre><code>let x = 1;</code></pre>")
            .unwrap();
        assert!(md.contains("```"));
        assert!(md.contains("let x = 1;"));
    }

    #[test]
    fn test_convert_tilde_fence() {
        let md = MarkdownConverter::new(ConvertOptions { code_fence: CodeFence::Tildes })
            .convert("<pre><code>fn main() {}</code></pre>")
            .unwrap();
        assert!(md.contains("~~~"));
    }

    #[test]
    fn test_convert_skips_scripts() {
        let md = MarkdownConverter::default()
            .convert("<p>visible</p><script>hidden()</script>")
            .unwrap();
        assert!(md.contains("visible"));
        assert!(!md.contains("hidden"));
    }
}
