//! # quizbot-search
//!
//! Web retrieval for quizbot: turns a question into an ordered list of
//! `(url, text)` snippets that can be pasted into a prompt.
//!
//! ## Design
//!
//! - Searches DuckDuckGo's HTML endpoint, no API key required
//! - Fetches every hit with a bounded timeout on a bounded task pool
//! - Keeps only `<p>` text, stripped of citation markers and extra whitespace
//! - Snippets always come back in search order, one per hit
//! - Graceful degradation: a rate-limited search yields no sources, an
//!   unreachable page yields a sentinel snippet
//!
//! ## Privacy
//!
//! - Queries are logged only at trace level
//! - No state is shared between retrieval runs

pub mod config;
pub mod content;
pub mod engines;
pub mod error;
pub mod fetch;
pub mod http;
pub mod provider;
pub mod retrieve;
pub mod types;

pub use config::SearchConfig;
pub use engines::DuckDuckGoBackend;
pub use error::{FetchFailure, Result, SearchError};
pub use fetch::{HttpPageFetcher, PageFetcher};
pub use provider::{SearchBackend, SearchProvider};
pub use retrieve::Retriever;
pub use types::{
    NO_ADDITIONAL_INFORMATION, PAGE_LOAD_ERROR, RetrievalContext, SearchHit, Snippet,
};

/// Retrieve web context for `query` with the default DuckDuckGo backend.
///
/// Searches for up to `config.num_cites` hits, fetches each page and keeps
/// up to `config.num_paragraphs` paragraphs of it.
///
/// # Errors
///
/// Returns [`SearchError::Config`] for an invalid config and any
/// non-rate-limit search backend failure. Rate limits and page fetch
/// failures degrade the result instead of failing.
///
/// # Examples
///
/// ```no_run
/// # async fn example() -> quizbot_search::Result<()> {
/// let config = quizbot_search::SearchConfig::default();
/// let context = quizbot_search::retrieve("When was ITMO founded?", &config).await?;
/// for snippet in context.snippets() {
///     println!("{}: {}", snippet.url, snippet.text);
/// }
/// # Ok(())
/// # }
/// ```
pub async fn retrieve(query: &str, config: &SearchConfig) -> Result<RetrievalContext> {
    Retriever::from_config(config)?.retrieve(query).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn retrieve_validates_config_zero_timeout() {
        let config = SearchConfig {
            fetch_timeout_seconds: 0,
            ..Default::default()
        };
        let result = retrieve("test", &config).await;
        assert!(result.unwrap_err().to_string().contains("timeout"));
    }

    #[tokio::test]
    async fn retrieve_with_zero_cites_skips_network() {
        let config = SearchConfig {
            num_cites: 0,
            ..Default::default()
        };
        let context = retrieve("test", &config).await.expect("no network needed");
        assert!(context.is_empty());
    }
}
