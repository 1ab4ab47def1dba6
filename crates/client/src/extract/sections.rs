//! Section filtering by heading selectors.
//!
//! A section runs from its heading's opening tag up to the next heading of
//! equal or shallower level, or to the end of the fragment.

use serde::{Deserialize, Serialize};

use super::headings::Heading;

/// Picks one heading out of an indexed fragment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum HeadingSelector {
    /// 1-based position in document order.
    Index(i64),
    /// Case-insensitive substring of the heading text; first match wins.
    Text(String),
}

impl HeadingSelector {
    /// Index into `headings` this selector resolves to, if any.
    pub fn resolve(&self, headings: &[Heading]) -> Option<usize> {
        match self {
            Self::Index(n) => {
                let index = usize::try_from(*n).ok()?.checked_sub(1)?;
                (index < headings.len()).then_some(index)
            }
            Self::Text(needle) => {
                let needle = needle.to_lowercase();
                headings.iter().position(|h| h.text.to_lowercase().contains(&needle))
            }
        }
    }
}

impl From<i64> for HeadingSelector {
    fn from(n: i64) -> Self {
        Self::Index(n)
    }
}

impl From<&str> for HeadingSelector {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

/// Byte range of the section opened by `headings[index]`.
fn section_span(html: &str, headings: &[Heading], index: usize) -> (usize, usize) {
    let heading = &headings[index];
    let end = headings[index + 1..]
        .iter()
        .find(|next| next.level <= heading.level)
        .map_or(html.len(), |next| next.position);
    (heading.position, end)
}

/// Concatenate the sections picked by `selectors`, in selector order.
///
/// Each section is trimmed and sections are joined with a blank line.
/// Returns `None` when no selector resolves; callers then keep the
/// unfiltered fragment.
pub fn filter_sections(html: &str, headings: &[Heading], selectors: &[HeadingSelector]) -> Option<String> {
    let sections: Vec<&str> = selectors
        .iter()
        .filter_map(|selector| selector.resolve(headings))
        .map(|index| {
            let (start, end) = section_span(html, headings, index);
            html[start..end].trim()
        })
        .collect();

    if sections.is_empty() {
        tracing::debug!(selectors = selectors.len(), "no matching headings found");
        return None;
    }

    Some(sections.join("\n\n"))
}
