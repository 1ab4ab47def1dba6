//! URL canonicalization and viewer-URL rewriting.

/// Code-hosting domain whose blob views are rewritten.
const CODE_HOST: &str = "github.com";

/// Raw-content host serving the files behind [`CODE_HOST`] blob views.
const RAW_CONTENT_HOST: &str = "raw.githubusercontent.com";

/// Error type for URL canonicalization failures.
#[derive(Debug, Clone, thiserror::Error)]
pub enum UrlError {
    #[error("empty URL")]
    Empty,

    #[error("unsupported scheme: {0}")]
    UnsupportedScheme(String),

    #[error("invalid URL: {0}")]
    InvalidUrl(String),
}

/// Canonicalize a URL string before handing it to the HTTP client.
///
/// Normalization steps:
/// 1. Trim leading/trailing whitespace
/// 2. Default scheme to https:// if missing
/// 3. Lowercase the host
/// 4. Remove fragment (#...)
/// 5. Keep query string intact (do not reorder)
pub fn canonicalize(input: &str) -> Result<url::Url, UrlError> {
    let trimmed = input.trim();

    if trimmed.is_empty() {
        return Err(UrlError::Empty);
    }

    let url_str = if trimmed.contains("://") { trimmed.to_string() } else { format!("https://{trimmed}") };

    let mut parsed = url::Url::parse(&url_str).map_err(|e| UrlError::InvalidUrl(e.to_string()))?;

    match parsed.scheme() {
        "http" | "https" => {}
        scheme => return Err(UrlError::UnsupportedScheme(scheme.to_string())),
    }

    if let Some(host) = parsed.host_str().map(str::to_lowercase) {
        parsed
            .set_host(Some(&host))
            .map_err(|e| UrlError::InvalidUrl(e.to_string()))?;
    }

    parsed.set_fragment(None);

    Ok(parsed)
}

/// Rewrite a known "viewer" URL to its raw-content equivalent.
///
/// `https://github.com/{user}/{repo}/blob/{branch}/{path...}` becomes
/// `https://raw.githubusercontent.com/{user}/{repo}/{branch}/{path...}`.
/// Anything else, malformed input included, is returned unchanged.
pub fn normalize_viewer_url(input: &str) -> String {
    let Ok(parsed) = url::Url::parse(input.trim()) else {
        return input.to_string();
    };

    let is_code_host = parsed
        .host_str()
        .is_some_and(|host| host.eq_ignore_ascii_case(CODE_HOST) || host.eq_ignore_ascii_case("www.github.com"));
    if !is_code_host {
        return input.to_string();
    }

    let segments: Vec<&str> = match parsed.path_segments() {
        Some(segments) => segments.collect(),
        None => return input.to_string(),
    };

    match segments.as_slice() {
        [user, repo, "blob", branch, path @ ..]
            if !user.is_empty() && !repo.is_empty() && !branch.is_empty() && path.iter().any(|s| !s.is_empty()) =>
        {
            format!("https://{RAW_CONTENT_HOST}/{user}/{repo}/{branch}/{}", path.join("/"))
        }
        _ => input.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonicalize_basic() {
        let url = canonicalize("https://example.com").unwrap();
        assert_eq!(url.scheme(), "https");
        assert_eq!(url.host_str(), Some("example.com"));
    }

    #[test]
    fn test_canonicalize_default_scheme() {
        let url = canonicalize("example.com").unwrap();
        assert_eq!(url.scheme(), "https");
    }

    #[test]
    fn test_canonicalize_lowercase_host() {
        let url = canonicalize("https://EXAMPLE.COM").unwrap();
        assert_eq!(url.host_str(), Some("example.com"));
    }

    #[test]
    fn test_canonicalize_remove_fragment() {
        let url = canonicalize("https://example.com/path?query=value#fragment").unwrap();
        assert_eq!(url.path(), "/path");
        assert_eq!(url.query(), Some("query=value"));
        assert_eq!(url.fragment(), None);
    }

    #[test]
    fn test_canonicalize_unsupported_scheme() {
        let result = canonicalize("file:///etc/passwd");
        assert!(matches!(result, Err(UrlError::UnsupportedScheme(_))));
    }

    #[test]
    fn test_canonicalize_empty() {
        assert!(matches!(canonicalize("   "), Err(UrlError::Empty)));
    }

    #[test]
    fn test_normalize_blob_url() {
        let normalized = normalize_viewer_url("https://github.com/user/repo/blob/main/README.md");
        assert_eq!(normalized, "https://raw.githubusercontent.com/user/repo/main/README.md");
    }

    #[test]
    fn test_normalize_nested_path() {
        let normalized = normalize_viewer_url("https://github.com/rust-lang/rust/blob/master/src/doc/guide.md");
        assert_eq!(normalized, "https://raw.githubusercontent.com/rust-lang/rust/master/src/doc/guide.md");
        assert!(!normalized.contains("/blob/"));
    }

    #[test]
    fn test_normalize_drops_query_and_fragment() {
        let normalized = normalize_viewer_url("https://github.com/user/repo/blob/main/lib.rs?plain=1#L10");
        assert_eq!(normalized, "https://raw.githubusercontent.com/user/repo/main/lib.rs");
    }

    #[test]
    fn test_normalize_leaves_other_github_pages() {
        let tree = "https://github.com/user/repo/tree/main/src";
        assert_eq!(normalize_viewer_url(tree), tree);

        let repo = "https://github.com/user/repo";
        assert_eq!(normalize_viewer_url(repo), repo);

        let missing_path = "https://github.com/user/repo/blob/main";
        assert_eq!(normalize_viewer_url(missing_path), missing_path);
    }

    #[test]
    fn test_normalize_leaves_other_hosts() {
        let url = "https://gitlab.com/user/repo/blob/main/README.md";
        assert_eq!(normalize_viewer_url(url), url);
    }

    #[test]
    fn test_normalize_malformed_unchanged() {
        assert_eq!(normalize_viewer_url("not a url"), "not a url");
        assert_eq!(normalize_viewer_url(""), "");
    }
}
