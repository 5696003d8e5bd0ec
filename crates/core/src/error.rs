//! Error types for blogld operations.
//!
//! This module defines [`BlogLdError`], the fatal error type returned by the
//! pipeline stages. Problems with AI keyword generation are not errors: they
//! are reported as [`AnalysisWarning`](crate::AnalysisWarning) values carried
//! alongside an otherwise complete result.
//!
//! # Example
//!
//! ```rust
//! use blogld_core::{BlogLdError, Result};
//!
//! fn require_markup(html: &str) -> Result<()> {
//!     if !html.contains('<') {
//!         return Err(BlogLdError::Parse("no markup found".to_string()));
//!     }
//!     Ok(())
//! }
//! ```

use std::fmt;
use std::path::PathBuf;

use reqwest::StatusCode;
use thiserror::Error;

/// Main error type for pipeline operations.
///
/// Every variant is fatal: the pipeline stops at the stage that produced it
/// and no partial schema is emitted.
#[derive(Error, Debug)]
pub enum BlogLdError {
    /// The input is not an absolute http(s) URL.
    ///
    /// Returned before any network request is made.
    #[error("Invalid URL {url}: {reason}")]
    InvalidUrl { url: String, reason: String },

    /// The page could not be retrieved.
    ///
    /// Carries the requested URL and the underlying cause (timeout, non-success
    /// status, or transport failure).
    #[error("Failed to fetch {url}: {cause}")]
    Fetch { url: String, cause: FetchCause },

    /// Local HTML file does not exist.
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    /// File read or write errors.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The document cannot be treated as HTML at all.
    #[error("Failed to parse HTML: {0}")]
    Parse(String),

    /// The schema object could not be assembled or serialized.
    #[error("Failed to build schema: {0}")]
    Build(String),
}

/// Underlying cause of a [`BlogLdError::Fetch`].
#[derive(Debug)]
pub enum FetchCause {
    /// The request exceeded the configured timeout.
    Timeout { secs: u64 },
    /// The server answered with a non-success status.
    Status(StatusCode),
    /// Connection, TLS, redirect or body read failure.
    Request(reqwest::Error),
}

impl fmt::Display for FetchCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchCause::Timeout { secs } => write!(f, "request timed out after {} seconds", secs),
            FetchCause::Status(status) => write!(f, "server returned {}", status),
            FetchCause::Request(err) => write!(f, "{}", err),
        }
    }
}

impl From<serde_json::Error> for BlogLdError {
    fn from(err: serde_json::Error) -> Self {
        BlogLdError::Build(err.to_string())
    }
}

/// Result type alias for BlogLdError.
pub type Result<T> = std::result::Result<T, BlogLdError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = BlogLdError::InvalidUrl { url: "not a url".to_string(), reason: "relative URL".to_string() };
        assert!(err.to_string().contains("Invalid URL"));
        assert!(err.to_string().contains("not a url"));
    }

    #[test]
    fn test_fetch_error_carries_url() {
        let err = BlogLdError::Fetch {
            url: "https://example.com/post".to_string(),
            cause: FetchCause::Status(StatusCode::NOT_FOUND),
        };
        let message = err.to_string();
        assert!(message.contains("https://example.com/post"));
        assert!(message.contains("404"));
    }

    #[test]
    fn test_timeout_cause() {
        let cause = FetchCause::Timeout { secs: 30 };
        assert!(cause.to_string().contains("30"));
    }

    #[test]
    fn test_json_error_maps_to_build() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: BlogLdError = json_err.into();
        assert!(matches!(err, BlogLdError::Build(_)));
    }
}
