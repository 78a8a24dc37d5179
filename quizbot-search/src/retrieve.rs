//! Retrieval orchestrator: search, then fetch and extract every hit.
//!
//! Fetch+extract pairs run on a bounded pool of tokio tasks. Each task is
//! tagged with the index of its hit and results are written back into that
//! slot, so the returned snippets follow search order no matter which page
//! finishes first. Dropping the retrieval future aborts every in-flight
//! fetch.

use crate::config::SearchConfig;
use crate::content;
use crate::engines::DuckDuckGoBackend;
use crate::error::SearchError;
use crate::fetch::{HttpPageFetcher, PageFetcher};
use crate::provider::{SearchBackend, SearchProvider};
use crate::types::{RetrievalContext, SearchHit, Snippet};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::Instrument;

/// Composes a [`SearchProvider`], a [`PageFetcher`] and paragraph extraction
/// into an ordered [`RetrievalContext`].
pub struct Retriever<B, F> {
    provider: SearchProvider<B>,
    fetcher: Arc<F>,
    num_cites: usize,
    num_paragraphs: usize,
    workers: usize,
}

impl Retriever<DuckDuckGoBackend, HttpPageFetcher> {
    /// Build the default DuckDuckGo + HTTP retriever.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Config`] if `config` is invalid, or
    /// [`SearchError::Http`] if an HTTP client cannot be built.
    pub fn from_config(config: &SearchConfig) -> Result<Self, SearchError> {
        config.validate()?;
        Ok(Self::new(
            DuckDuckGoBackend::new(config)?,
            HttpPageFetcher::new(config)?,
            config,
        ))
    }
}

impl<B, F> Retriever<B, F>
where
    B: SearchBackend,
    F: PageFetcher + 'static,
{
    pub fn new(backend: B, fetcher: F, config: &SearchConfig) -> Self {
        Self {
            provider: SearchProvider::new(backend),
            fetcher: Arc::new(fetcher),
            num_cites: config.num_cites,
            num_paragraphs: config.num_paragraphs,
            workers: config.max_concurrent_fetches.max(1),
        }
    }

    /// Retrieve context for `query`.
    ///
    /// # Pipeline
    ///
    /// 1. Search for up to `num_cites` hits (rate limits give zero hits)
    /// 2. Fetch every hit with at most `max_concurrent_fetches` in flight
    /// 3. Extract up to `num_paragraphs` paragraphs from each fetched page;
    ///    failed fetches get the page-load-error sentinel
    /// 4. Reassemble snippets by hit index
    ///
    /// # Errors
    ///
    /// Only non-rate-limit search failures. Fetch failures never fail
    /// retrieval.
    pub async fn retrieve(&self, query: &str) -> Result<RetrievalContext, SearchError> {
        let hits = self.provider.search(query, self.num_cites).await?;
        if hits.is_empty() {
            return Ok(RetrievalContext::empty());
        }

        let snippets = self.fetch_all(hits).await;
        let fallbacks = snippets.iter().filter(|s| s.is_sentinel()).count();
        tracing::debug!(sources = snippets.len(), fallbacks, "retrieval complete");

        Ok(RetrievalContext::from_snippets(snippets))
    }

    async fn fetch_all(&self, hits: Vec<SearchHit>) -> Vec<Snippet> {
        let urls: Vec<String> = hits.into_iter().map(|hit| hit.url).collect();
        let permits = Arc::new(Semaphore::new(self.workers));
        let mut tasks = JoinSet::new();

        for (index, url) in urls.iter().cloned().enumerate() {
            let fetcher = Arc::clone(&self.fetcher);
            let permits = Arc::clone(&permits);
            let max_paragraphs = self.num_paragraphs;
            tasks.spawn(
                async move {
                    let _permit = permits.acquire_owned().await;
                    let snippet = snippet_for(fetcher.as_ref(), url, max_paragraphs).await;
                    (index, snippet)
                }
                .in_current_span(),
            );
        }

        let mut slots: Vec<Option<Snippet>> = vec![None; urls.len()];
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((index, snippet)) => slots[index] = Some(snippet),
                Err(err) => tracing::error!(error = %err, "fetch task did not complete"),
            }
        }

        slots
            .into_iter()
            .zip(urls)
            .map(|(slot, url)| slot.unwrap_or_else(|| Snippet::page_load_error(url)))
            .collect()
    }
}

/// Fetch one page and turn it into a snippet.
async fn snippet_for<F: PageFetcher>(fetcher: &F, url: String, max_paragraphs: usize) -> Snippet {
    match fetcher.fetch(&url).await {
        Ok(html) => {
            let text = content::extract_paragraphs(&html, max_paragraphs);
            Snippet { url, text }
        }
        Err(failure) => {
            tracing::warn!(%url, error = %failure, "page fetch failed");
            Snippet::page_load_error(url)
        }
    }
}
