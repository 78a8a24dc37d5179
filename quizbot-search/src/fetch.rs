//! Page fetcher: one bounded GET per source URL.

use crate::config::SearchConfig;
use crate::error::{FetchFailure, SearchError};
use crate::http;
use std::future::Future;
use std::time::Duration;

/// Retrieves raw HTML for a URL.
///
/// Implementations classify every failure as a [`FetchFailure`]; nothing is
/// raised past the fetcher.
pub trait PageFetcher: Send + Sync {
    /// Fetch the page body as text.
    fn fetch(&self, url: &str) -> impl Future<Output = Result<String, FetchFailure>> + Send;
}

/// [`PageFetcher`] backed by `reqwest`.
#[derive(Debug, Clone)]
pub struct HttpPageFetcher {
    client: reqwest::Client,
    timeout: Duration,
}

impl HttpPageFetcher {
    /// Build a fetcher with `config.fetch_timeout_seconds` as the per-request
    /// timeout.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Http`] if the HTTP client cannot be built.
    pub fn new(config: &SearchConfig) -> Result<Self, SearchError> {
        let timeout = config.fetch_timeout();
        let client = http::build_client(config.user_agent.as_deref(), timeout)?;
        Ok(Self { client, timeout })
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

impl PageFetcher for HttpPageFetcher {
    async fn fetch(&self, url: &str) -> Result<String, FetchFailure> {
        let response = self
            .client
            .get(url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(classify)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchFailure::Status(status.as_u16()));
        }

        response.text().await.map_err(|e| {
            if e.is_timeout() {
                FetchFailure::Timeout(e.to_string())
            } else {
                FetchFailure::Body(e.to_string())
            }
        })
    }
}

/// Map a `reqwest` send error to a [`FetchFailure`].
fn classify(err: reqwest::Error) -> FetchFailure {
    if err.is_timeout() {
        FetchFailure::Timeout(err.to_string())
    } else if err.is_connect() {
        FetchFailure::Connect(err.to_string())
    } else if let Some(status) = err.status() {
        FetchFailure::Status(status.as_u16())
    } else {
        FetchFailure::Request(err.to_string())
    }
}
