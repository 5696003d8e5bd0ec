//! Page retrieval from URLs and local files.
//!
//! This module produces the [`RawPage`] consumed by the extractor: either by a
//! single HTTP GET against the requested URL, or by reading a local HTML file
//! that is attributed to a URL.

use std::fs;
use std::path::Path;
use std::time::Duration;

use reqwest::Client;
use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE};
use tracing::debug;
use url::Url;

use crate::error::FetchCause;
use crate::{BlogLdError, Result};

/// HTTP client configuration for fetching web pages.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// Request timeout in seconds.
    pub timeout: u64,
    /// Custom User-Agent string.
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self { timeout: 30, user_agent: "Mozilla/5.0 (compatible; blogld/0.1; +https://schema.org/BlogPosting)".to_string() }
    }
}

/// A fetched HTML document.
///
/// `requested_url` is the URL the caller asked for; `base_url` is where the
/// document actually came from after redirects and is used to resolve
/// relative links.
#[derive(Debug, Clone)]
pub struct RawPage {
    pub html: String,
    pub base_url: Url,
    pub requested_url: String,
}

/// Checks that `url` is an absolute http(s) URL with a host.
pub fn validate_url(url: &str) -> Result<Url> {
    let invalid = |reason: String| BlogLdError::InvalidUrl { url: url.to_string(), reason };

    let parsed = Url::parse(url).map_err(|e| invalid(e.to_string()))?;

    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(invalid(format!("unsupported scheme '{}', expected http or https", parsed.scheme())));
    }
    if parsed.host_str().is_none_or(str::is_empty) {
        return Err(invalid("URL has no host".to_string()));
    }

    Ok(parsed)
}

/// Fetches HTML content from a URL.
///
/// Performs exactly one GET request bounded by `config.timeout`. Non-success
/// statuses, transport failures and timeouts all become
/// [`BlogLdError::Fetch`] carrying the requested URL. Nothing is retried.
#[tracing::instrument(skip(config), fields(timeout = config.timeout))]
pub async fn fetch_url(url: &str, config: &FetchConfig) -> Result<RawPage> {
    let parsed_url = validate_url(url)?;
    let fetch_error = |cause: FetchCause| BlogLdError::Fetch { url: url.to_string(), cause };
    let classify = |e: reqwest::Error| {
        if e.is_timeout() { FetchCause::Timeout { secs: config.timeout } } else { FetchCause::Request(e) }
    };

    let client = Client::builder()
        .timeout(Duration::from_secs(config.timeout))
        .user_agent(&config.user_agent)
        .build()
        .map_err(|e| fetch_error(FetchCause::Request(e)))?;

    let response = client
        .get(parsed_url)
        .header(ACCEPT, "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8")
        .header(ACCEPT_LANGUAGE, "en-US,en;q=0.9")
        .send()
        .await
        .map_err(|e| fetch_error(classify(e)))?;

    let status = response.status();
    if !status.is_success() {
        return Err(fetch_error(FetchCause::Status(status)));
    }

    let base_url = response.url().clone();
    let html = response.text().await.map_err(|e| fetch_error(classify(e)))?;

    debug!(bytes = html.len(), %base_url, "fetched page");

    Ok(RawPage { html, base_url, requested_url: url.to_string() })
}

/// Reads HTML content from a local file and attributes it to `url`.
///
/// The URL is validated the same way as for [`fetch_url`] so that the
/// resulting page has a usable base URL.
pub fn read_file(path: impl AsRef<Path>, url: &str) -> Result<RawPage> {
    let base_url = validate_url(url)?;
    let path = path.as_ref();

    if !path.exists() {
        return Err(BlogLdError::FileNotFound(path.to_path_buf()));
    }

    let html = fs::read_to_string(path)?;
    debug!(bytes = html.len(), path = %path.display(), "read page from file");

    Ok(RawPage { html, base_url, requested_url: url.to_string() })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_config_default() {
        let config = FetchConfig::default();
        assert_eq!(config.timeout, 30);
        assert!(config.user_agent.contains("blogld"));
    }

    #[test]
    fn test_validate_url() {
        assert!(validate_url("http://example.com").is_ok());
        assert!(validate_url("https://example.com/post?id=1").is_ok());
        assert!(matches!(validate_url("example.com"), Err(BlogLdError::InvalidUrl { .. })));
        assert!(matches!(validate_url("ftp://example.com/file"), Err(BlogLdError::InvalidUrl { .. })));
        assert!(matches!(validate_url("/relative/path"), Err(BlogLdError::InvalidUrl { .. })));
    }

    #[test]
    fn test_fetch_url_invalid() {
        let config = FetchConfig::default();
        let result = tokio::runtime::Runtime::new()
            .unwrap()
            .block_on(fetch_url("not-a-url", &config));

        assert!(matches!(result, Err(BlogLdError::InvalidUrl { .. })));
    }

    #[test]
    fn test_read_file_not_found() {
        let result = read_file("/nonexistent/path/file.html", "https://example.com/post");
        assert!(matches!(result, Err(BlogLdError::FileNotFound(_))));
    }

    #[test]
    fn test_read_file_rejects_bad_url_first() {
        let result = read_file("/nonexistent/path/file.html", "nope");
        assert!(matches!(result, Err(BlogLdError::InvalidUrl { .. })));
    }
}
