//! Heading index and table of contents.
//!
//! Headings are found by scanning the serialized fragment: an `<hN>` opening
//! tag paired with the nearest `</hN>` of the same level, for N in 1..=3.

use std::sync::LazyLock;

use regex::Regex;

static HEADING_PATTERNS: LazyLock<[(u8, Regex); 3]> = LazyLock::new(|| {
    [1u8, 2, 3].map(|level| {
        let pattern = format!(r"(?is)<h{level}\b[^>]*>(.*?)</h{level}\s*>");
        (level, Regex::new(&pattern).expect("valid regex"))
    })
});

static TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)<[^>]*>").expect("valid regex"));

/// A level 1-3 heading found in an HTML fragment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Heading {
    pub level: u8,
    pub text: String,
    /// Byte offset of the opening tag in the fragment.
    pub position: usize,
}

/// Find every non-empty level 1-3 heading in `html`, in document order.
pub fn index_headings(html: &str) -> Vec<Heading> {
    let mut headings: Vec<Heading> = HEADING_PATTERNS
        .iter()
        .flat_map(|(level, pattern)| {
            pattern.captures_iter(html).filter_map(move |caps| {
                let whole = caps.get(0)?;
                let inner = caps.get(1)?;
                let text = TAG.replace_all(inner.as_str(), "").trim().to_string();
                (!text.is_empty()).then(|| Heading { level: *level, text, position: whole.start() })
            })
        })
        .collect();

    headings.sort_by_key(|h| h.position);
    headings
}

/// Render an indented outline, one `- text` line per heading.
///
/// Returns `None` when there are no headings.
pub fn render_toc(headings: &[Heading]) -> Option<String> {
    if headings.is_empty() {
        return None;
    }

    let lines: Vec<String> = headings
        .iter()
        .map(|h| format!("{}- {}", "  ".repeat(usize::from(h.level.saturating_sub(1))), h.text))
        .collect();

    Some(lines.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_document_order() {
        let html = "<h2>Second level</h2><p>a</p><h1>Top</h1><h3>Deep</h3>";
        let headings = index_headings(html);

        assert_eq!(headings.len(), 3);
        assert_eq!(headings[0], Heading { level: 2, text: "Second level".into(), position: 0 });
        assert_eq!(headings[1].level, 1);
        assert_eq!(headings[1].text, "Top");
        assert_eq!(headings[1].position, html.find("<h1>").unwrap());
        assert_eq!(headings[2].level, 3);
    }

    #[test]
    fn test_strips_nested_markup() {
        let html = r##"<h1 id="intro" class="title">  <a href="#intro">Intro</a> <em>part</em>
            </h1>"##;
        let headings = index_headings(html);
        assert_eq!(headings.len(), 1);
        assert_eq!(headings[0].text, "Intro part");
    }

    #[test]
    fn test_skips_empty_and_deeper_headings() {
        let html = "<h1>  </h1><h2><span></span></h2><h4>Too deep</h4><h1>Kept</h1>";
        let headings = index_headings(html);
        assert_eq!(headings.len(), 1);
        assert_eq!(headings[0].text, "Kept");
    }

    #[test]
    fn test_requires_matching_close_tag() {
        let html = "<h1>Open</h2><p>body</p><h2>Real</h2>";
        let headings = index_headings(html);
        assert_eq!(headings.len(), 1);
        assert_eq!(headings[0].level, 2);
        assert_eq!(headings[0].text, "Real");
    }

    #[test]
    fn test_does_not_match_header_tag() {
        let html = "<header>Site</header><h1>Title</h1>";
        let headings = index_headings(html);
        assert_eq!(headings.len(), 1);
        assert_eq!(headings[0].text, "Title");
    }

    #[test]
    fn test_render_toc() {
        let headings = index_headings("<h1>One</h1><h2>Two</h2><h3>Three</h3><h2>Four</h2>");
        let toc = render_toc(&headings).unwrap();
        assert_eq!(toc, "- One\n  - Two\n    - Three\n  - Four");
    }

    #[test]
    fn test_render_toc_empty() {
        assert!(render_toc(&[]).is_none());
        assert!(render_toc(&index_headings("<p>no headings</p>")).is_none());
    }
}
