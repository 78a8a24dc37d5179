//! Error types for the quizbot-search crate.
//!
//! All errors use stable string messages suitable for display to users
//! and programmatic handling. No credentials or query text appear in
//! error messages.

/// Errors that can occur while talking to the search backend.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    /// The backend refused the request because of a rate limit or quota.
    ///
    /// This is an expected condition: [`crate::SearchProvider`] absorbs it
    /// into an empty hit list instead of failing the pipeline.
    #[error("search rate limited: {0}")]
    RateLimited(String),

    /// The backend answered with an unexpected, non-rate-limit failure.
    #[error("search backend error: {0}")]
    Backend(String),

    /// An HTTP request to the search backend failed at the transport level.
    #[error("HTTP error: {0}")]
    Http(String),

    /// Failed to parse the search backend response.
    #[error("parse error: {0}")]
    Parse(String),

    /// Invalid search configuration.
    #[error("config error: {0}")]
    Config(String),
}

impl SearchError {
    /// Returns `true` for the rate-limit failure mode.
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, Self::RateLimited(_))
    }
}

/// Why a single page could not be fetched.
///
/// Fetch failures never abort retrieval; the orchestrator turns them into
/// the [`crate::types::PAGE_LOAD_ERROR`] sentinel.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchFailure {
    /// The request did not complete within the fetch timeout.
    #[error("fetch timed out: {0}")]
    Timeout(String),

    /// The connection could not be established.
    #[error("connection failed: {0}")]
    Connect(String),

    /// The server answered with a non-2xx status.
    #[error("bad status: {0}")]
    Status(u16),

    /// Any other request failure (invalid URL, redirect loop, TLS).
    #[error("request failed: {0}")]
    Request(String),

    /// The response body could not be read as text.
    #[error("body read failed: {0}")]
    Body(String),
}

/// Convenience type alias for quizbot-search results.
pub type Result<T> = std::result::Result<T, SearchError>;
