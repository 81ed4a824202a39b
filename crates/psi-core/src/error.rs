//! Error taxonomy.
//!
//! [`ErrorType`] tags a single URL's failure inside an `AnalysisResult`; it
//! never stops a batch. [`PsiError`] is reserved for failures that are fatal
//! to a whole operation (bad credential, nothing to analyze, unreadable
//! sitemap).

use serde::{Deserialize, Serialize};
use std::fmt;

/// Classification attached to a failed per-URL analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorType {
    /// Input could not be normalized, or the host is not allowed for analysis.
    InvalidUrl,
    /// Pre-flight probe saw a non-HTML resource.
    InvalidContentType,
    /// The API reported that the page is not HTML.
    NotHtml,
    /// Missing or rejected API key.
    AuthenticationError,
    /// Daily quota or billing limit reached.
    QuotaExceeded,
    /// Too many requests; back off and try again.
    RateLimited,
    Timeout,
    /// DNS, connect or transfer failure before a response arrived.
    NetworkError,
    /// Any other 4xx response from the API.
    ApiError,
    Unknown,
}

impl ErrorType {
    /// Kinds the retry client tries again before giving up.
    pub fn is_retryable(self) -> bool {
        matches!(
            self,
            ErrorType::Timeout
                | ErrorType::NetworkError
                | ErrorType::RateLimited
                | ErrorType::Unknown
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ErrorType::InvalidUrl => "INVALID_URL",
            ErrorType::InvalidContentType => "INVALID_CONTENT_TYPE",
            ErrorType::NotHtml => "NOT_HTML",
            ErrorType::AuthenticationError => "AUTHENTICATION_ERROR",
            ErrorType::QuotaExceeded => "QUOTA_EXCEEDED",
            ErrorType::RateLimited => "RATE_LIMITED",
            ErrorType::Timeout => "TIMEOUT",
            ErrorType::NetworkError => "NETWORK_ERROR",
            ErrorType::ApiError => "API_ERROR",
            ErrorType::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for ErrorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Operation-level failure. Returned to the caller instead of a result list.
#[derive(Debug, thiserror::Error)]
pub enum PsiError {
    #[error("missing PageSpeed API key (set PAGESPEED_API_KEY or api_key in config.toml)")]
    MissingApiKey,

    /// Every later request would fail the same way, so the run stops.
    #[error("authentication failed while analyzing {url}: {message}")]
    Authentication { url: String, message: String },

    #[error("no URLs to analyze: {0}")]
    NoUrlsToAnalyze(String),

    #[error("invalid URL {input:?}: {reason}")]
    InvalidUrl { input: String, reason: String },

    #[error("sitemap {url}: {message}")]
    Sitemap { url: String, message: String },

    /// Options that cannot produce a valid request (e.g. no categories).
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("analysis task join: {0}")]
    Join(#[from] tokio::task::JoinError),
}
