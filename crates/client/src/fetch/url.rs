//! Target URL canonicalization.

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

/// Canonicalize the configured target URL.
///
/// - Trims surrounding whitespace
/// - Defaults the scheme to `https://` when missing
/// - Accepts only `http` and `https`
/// - Drops the fragment, which is never sent to the server
///
/// Host lowercasing is done by the `url` parser.
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

    parsed.set_fragment(None);

    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonicalize_target() {
        let url = canonicalize("https://ai-radar.xyz/").unwrap();
        assert_eq!(url.as_str(), "https://ai-radar.xyz/");
    }

    #[test]
    fn test_canonicalize_default_scheme_and_case() {
        let url = canonicalize("  AI-Radar.xyz  ").unwrap();
        assert_eq!(url.as_str(), "https://ai-radar.xyz/");
    }

    #[test]
    fn test_canonicalize_drops_fragment_keeps_query() {
        let url = canonicalize("http://127.0.0.1:8080/page?v=2#list").unwrap();
        assert_eq!(url.as_str(), "http://127.0.0.1:8080/page?v=2");
    }

    #[test]
    fn test_canonicalize_rejects() {
        assert!(matches!(canonicalize("   "), Err(UrlError::Empty)));
        assert!(matches!(canonicalize("file:///etc/passwd"), Err(UrlError::UnsupportedScheme(_))));
        assert!(matches!(canonicalize("https://"), Err(UrlError::InvalidUrl(_))));
    }
}
