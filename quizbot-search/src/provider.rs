//! Search provider: a pluggable backend plus the rate-limit policy.
//!
//! A [`SearchBackend`] knows how to talk to one search service. The
//! [`SearchProvider`] wraps it with the retrieval contract: results are capped
//! at `limit`, a rate-limited backend yields an empty list, and every other
//! backend failure is returned to the caller.

use crate::error::SearchError;
use crate::types::SearchHit;
use std::future::Future;

/// A pluggable search backend.
///
/// Implementors handle their own URL construction, HTTP request and response
/// parsing. A rate limit or quota refusal must be reported as
/// [`SearchError::RateLimited`] so it can be told apart from real failures.
///
/// All implementations must be `Send + Sync` so retrieval can run inside
/// multi-threaded request handlers.
pub trait SearchBackend: Send + Sync {
    /// Query the backend for up to `limit` hits, in backend rank order.
    ///
    /// Backends may return more than `limit` hits; the provider truncates.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError`] if the request fails, the response cannot be
    /// parsed, or the backend is rate limiting.
    fn query(
        &self,
        query: &str,
        limit: usize,
    ) -> impl Future<Output = Result<Vec<SearchHit>, SearchError>> + Send;

    /// Human-readable backend name, used in logs.
    fn name(&self) -> &'static str;
}

/// Applies the retrieval contract on top of a [`SearchBackend`].
#[derive(Debug, Clone)]
pub struct SearchProvider<B> {
    backend: B,
}

impl<B: SearchBackend> SearchProvider<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Search for up to `limit` hits.
    ///
    /// `limit == 0` returns an empty list without contacting the backend.
    /// No retries are attempted.
    ///
    /// # Errors
    ///
    /// Any backend error other than [`SearchError::RateLimited`]. A rate
    /// limit is logged and absorbed into `Ok(vec![])`.
    pub async fn search(&self, query: &str, limit: usize) -> Result<Vec<SearchHit>, SearchError> {
        if limit == 0 {
            return Ok(Vec::new());
        }

        tracing::trace!(query, limit, backend = self.backend.name(), "search");

        match self.backend.query(query, limit).await {
            Ok(mut hits) => {
                hits.truncate(limit);
                tracing::debug!(backend = self.backend.name(), count = hits.len(), "search hits");
                Ok(hits)
            }
            Err(SearchError::RateLimited(reason)) => {
                tracing::warn!(
                    backend = self.backend.name(),
                    %reason,
                    "search backend rate limited, continuing without sources"
                );
                Ok(Vec::new())
            }
            Err(err) => {
                tracing::warn!(backend = self.backend.name(), error = %err, "search failed");
                Err(err)
            }
        }
    }
}
