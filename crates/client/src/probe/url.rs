//! Identifier canonicalization so equivalent URLs share one cache entry.

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

/// Canonicalize a URL string for use as a cache key and probe target.
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

    let with_scheme = if trimmed.contains("://") { trimmed.to_string() } else { format!("https://{trimmed}") };
    let mut parsed = url::Url::parse(&with_scheme).map_err(|e| UrlError::InvalidUrl(e.to_string()))?;

    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(UrlError::UnsupportedScheme(parsed.scheme().to_string()));
    }

    let host = parsed
        .host_str()
        .map(str::to_lowercase)
        .ok_or_else(|| UrlError::InvalidUrl(format!("missing host in {trimmed}")))?;
    parsed
        .set_host(Some(&host))
        .map_err(|e| UrlError::InvalidUrl(e.to_string()))?;
    parsed.set_fragment(None);

    Ok(parsed)
}

/// Canonical string form of `input`, or the trimmed input when it cannot be parsed.
pub fn cache_key(input: &str) -> String {
    canonicalize(input)
        .map(String::from)
        .unwrap_or_else(|_| input.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonicalize_default_scheme() {
        let url = canonicalize("classes.berkeley.edu/content/2024-fall-compsci-61a-lec-001").unwrap();
        assert_eq!(url.scheme(), "https");
        assert_eq!(url.path(), "/content/2024-fall-compsci-61a-lec-001");
    }

    #[test]
    fn test_canonicalize_lowercase_host() {
        let url = canonicalize("https://Classes.Berkeley.EDU/content/x").unwrap();
        assert_eq!(url.host_str(), Some("classes.berkeley.edu"));
    }

    #[test]
    fn test_canonicalize_remove_fragment_keep_query() {
        let url = canonicalize("https://example.edu/content/x?term=1#top").unwrap();
        assert_eq!(url.fragment(), None);
        assert_eq!(url.query(), Some("term=1"));
    }

    #[test]
    fn test_canonicalize_rejects() {
        assert!(matches!(canonicalize("   "), Err(UrlError::Empty)));
        assert!(matches!(canonicalize("file:///etc/passwd"), Err(UrlError::UnsupportedScheme(_))));
        assert!(matches!(canonicalize("https://"), Err(UrlError::InvalidUrl(_))));
    }

    #[test]
    fn test_cache_key_collapses_equivalents() {
        let a = cache_key(" https://EXAMPLE.edu/content/x#frag ");
        let b = cache_key("example.edu/content/x");
        assert_eq!(a, b);
        assert_eq!(a, "https://example.edu/content/x");
    }

    #[test]
    fn test_cache_key_falls_back_to_trimmed_input() {
        assert_eq!(cache_key("  mailto:someone  "), "mailto:someone");
    }
}
