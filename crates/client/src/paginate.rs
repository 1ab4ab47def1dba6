//! Character-budget truncation with resumable offsets.
//!
//! Offsets are byte offsets into the converted text and always land on a
//! char boundary. Concatenating consecutive pages (minus the marker)
//! reproduces the input exactly.

/// Appended to every page that stops short of the end of the text.
pub const TRUNCATION_MARKER: &str = "\n\n[Content truncated. Pass the continuation token to retrieve more.]";

/// Fraction of the window, from its end, searched for a newline to cut at.
const NEWLINE_SLACK_DIVISOR: usize = 5;

/// One page of a paginated text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    /// The page text, followed by [`TRUNCATION_MARKER`] when `has_more`.
    pub content: String,
    pub has_more: bool,
    /// Byte offset the next page starts at.
    pub next_offset: usize,
}

impl Page {
    /// The page text without the truncation marker.
    pub fn body(&self) -> &str {
        if self.has_more { self.content.strip_suffix(TRUNCATION_MARKER).unwrap_or(&self.content) } else { &self.content }
    }
}

/// Take at most `max_chars` characters of `text` starting at byte `offset`.
///
/// When the window stops short of the end and a newline falls within its
/// last fifth, the page ends just after that newline. An offset at or past
/// the end yields an empty final page.
pub fn paginate(text: &str, max_chars: usize, offset: usize) -> Page {
    if offset >= text.len() {
        return Page { content: String::new(), has_more: false, next_offset: text.len() };
    }

    let mut start = offset;
    while !text.is_char_boundary(start) {
        start += 1;
    }

    let max_chars = max_chars.max(1);
    let rest = &text[start..];
    let window_end = rest.char_indices().nth(max_chars).map_or(rest.len(), |(i, _)| i);

    if window_end == rest.len() {
        return Page { content: rest.to_string(), has_more: false, next_offset: text.len() };
    }

    let window = &rest[..window_end];
    let min_newline_chars = max_chars - max_chars / NEWLINE_SLACK_DIVISOR;
    let cut = match window.rfind('\n') {
        Some(nl) if window[..nl].chars().count() >= min_newline_chars => nl + 1,
        _ => window_end,
    };

    let mut content = String::with_capacity(cut + TRUNCATION_MARKER.len());
    content.push_str(&rest[..cut]);
    content.push_str(TRUNCATION_MARKER);

    Page { content, has_more: true, next_offset: start + cut }
}
