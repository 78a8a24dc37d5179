//! Retrieval configuration with sensible defaults.
//!
//! [`SearchConfig`] controls how many search hits are used, how much of each
//! page is kept, timeouts and fetch concurrency. It deserializes from the
//! `[search]` table of the application config file.

use crate::error::SearchError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for one retrieval run.
///
/// Use [`Default::default()`] for sensible defaults, or construct with
/// field overrides for custom behaviour.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Maximum number of search hits (and therefore sources) per query.
    pub num_cites: usize,
    /// Maximum number of `<p>` paragraphs kept from each fetched page.
    pub num_paragraphs: usize,
    /// Per-page fetch timeout in seconds.
    pub fetch_timeout_seconds: u64,
    /// Search backend request timeout in seconds.
    pub search_timeout_seconds: u64,
    /// How many page fetches may be in flight at once.
    ///
    /// `1` fetches strictly one page at a time.
    pub max_concurrent_fetches: usize,
    /// Whether to request safe search filtering from the backend.
    pub safe_search: bool,
    /// Custom User-Agent string. If `None`, rotates through a built-in list
    /// of realistic browser User-Agents.
    pub user_agent: Option<String>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            num_cites: 3,
            num_paragraphs: 3,
            fetch_timeout_seconds: 5,
            search_timeout_seconds: 8,
            max_concurrent_fetches: 4,
            safe_search: false,
            user_agent: None,
        }
    }
}

impl SearchConfig {
    /// Validates this configuration, returning an error if any field is invalid.
    ///
    /// Checks:
    /// - `fetch_timeout_seconds` must be greater than 0
    /// - `search_timeout_seconds` must be greater than 0
    /// - `max_concurrent_fetches` must be greater than 0
    ///
    /// `num_cites` and `num_paragraphs` may be 0: retrieval then degrades to
    /// no sources or to sentinel-only snippets.
    pub fn validate(&self) -> Result<(), SearchError> {
        if self.fetch_timeout_seconds == 0 {
            return Err(SearchError::Config(
                "fetch_timeout_seconds must be greater than 0".into(),
            ));
        }
        if self.search_timeout_seconds == 0 {
            return Err(SearchError::Config(
                "search_timeout_seconds must be greater than 0".into(),
            ));
        }
        if self.max_concurrent_fetches == 0 {
            return Err(SearchError::Config(
                "max_concurrent_fetches must be greater than 0".into(),
            ));
        }
        Ok(())
    }

    /// Page fetch timeout as a [`Duration`].
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_seconds)
    }

    /// Search backend timeout as a [`Duration`].
    pub fn search_timeout(&self) -> Duration {
        Duration::from_secs(self.search_timeout_seconds)
    }
}
