//! DuckDuckGo search backend.
//!
//! Uses the HTML-only version at `https://html.duckduckgo.com/html/`
//! which requires no JavaScript and no API key.

use crate::config::SearchConfig;
use crate::error::SearchError;
use crate::http;
use crate::provider::SearchBackend;
use crate::types::SearchHit;
use reqwest::StatusCode;
use scraper::{Html, Selector};
use url::Url;

/// Default HTML endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://html.duckduckgo.com/html/";

/// Markers DuckDuckGo puts in the bot-challenge page it serves when throttling.
const CHALLENGE_MARKERS: &[&str] = &["anomaly-modal", "challenge-form"];

/// DuckDuckGo HTML search scraper.
#[derive(Debug, Clone)]
pub struct DuckDuckGoBackend {
    client: reqwest::Client,
    endpoint: String,
    safe_search: bool,
}

impl DuckDuckGoBackend {
    /// Build a backend using the timeout, User-Agent and safe search settings
    /// from `config`.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Http`] if the HTTP client cannot be built.
    pub fn new(config: &SearchConfig) -> Result<Self, SearchError> {
        let client = http::build_client(config.user_agent.as_deref(), config.search_timeout())?;
        Ok(Self {
            client,
            endpoint: DEFAULT_ENDPOINT.to_owned(),
            safe_search: config.safe_search,
        })
    }

    /// Point the backend at a different endpoint (mirrors, tests).
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Extract the actual URL from DuckDuckGo's redirect wrapper.
    ///
    /// DDG wraps URLs like: `//duckduckgo.com/l/?uddg=https%3A%2F%2Fexample.com&rut=...`
    /// We parse out the `uddg` query parameter and URL-decode it.
    fn extract_url(href: &str) -> Option<String> {
        let full_href = if href.starts_with("//") {
            format!("https:{href}")
        } else {
            href.to_string()
        };

        let parsed = Url::parse(&full_href).ok()?;

        if parsed.host_str() == Some("duckduckgo.com") && parsed.path().starts_with("/l/") {
            parsed
                .query_pairs()
                .find(|(key, _)| key == "uddg")
                .map(|(_, value)| value.into_owned())
        } else {
            Some(full_href)
        }
    }
}

impl SearchBackend for DuckDuckGoBackend {
    async fn query(&self, query: &str, limit: usize) -> Result<Vec<SearchHit>, SearchError> {
        tracing::trace!(query, "DuckDuckGo search");

        let mut params = vec![("q", query)];
        if self.safe_search {
            params.push(("kp", "1"));
        }

        let response = self
            .client
            .post(&self.endpoint)
            .form(&params)
            .header("Accept-Language", "en-US,en;q=0.9")
            .send()
            .await
            .map_err(|e| SearchError::Http(format!("DuckDuckGo request failed: {e}")))?;

        let status = response.status();
        if let Some(err) = classify_status(status) {
            return Err(err);
        }

        let html = response
            .text()
            .await
            .map_err(|e| SearchError::Http(format!("DuckDuckGo response read failed: {e}")))?;

        tracing::trace!(bytes = html.len(), "DuckDuckGo response received");

        if is_challenge_page(&html) {
            return Err(SearchError::RateLimited(
                "DuckDuckGo served a bot challenge".into(),
            ));
        }

        parse_duckduckgo_html(&html, limit)
    }

    fn name(&self) -> &'static str {
        "DuckDuckGo"
    }
}

/// Map a response status to an error, or `None` for a usable response.
///
/// DuckDuckGo answers throttled clients with 202 (empty body), 403 or 429.
fn classify_status(status: StatusCode) -> Option<SearchError> {
    match status {
        StatusCode::ACCEPTED | StatusCode::FORBIDDEN | StatusCode::TOO_MANY_REQUESTS => Some(
            SearchError::RateLimited(format!("DuckDuckGo HTTP {}", status.as_u16())),
        ),
        s if s.is_success() => None,
        s => Some(SearchError::Backend(format!(
            "DuckDuckGo HTTP {}",
            s.as_u16()
        ))),
    }
}

fn is_challenge_page(html: &str) -> bool {
    CHALLENGE_MARKERS.iter().any(|marker| html.contains(marker))
}

/// Parse DuckDuckGo HTML response into search hits, in page order.
///
/// Extracted as a separate function for testability with mock HTML.
pub(crate) fn parse_duckduckgo_html(
    html: &str,
    max_results: usize,
) -> Result<Vec<SearchHit>, SearchError> {
    let document = Html::parse_document(html);

    let result_sel = Selector::parse(
        ".result.results_links.results_links_deep:not(.result--ad), .web-result:not(.result--ad)",
    )
    .map_err(|e| SearchError::Parse(format!("invalid result selector: {e:?}")))?;
    let link_sel = Selector::parse(".result__a")
        .map_err(|e| SearchError::Parse(format!("invalid link selector: {e:?}")))?;

    let mut hits = Vec::new();

    for element in document.select(&result_sel) {
        if hits.len() >= max_results {
            break;
        }

        let Some(href) = element
            .select(&link_sel)
            .next()
            .and_then(|el| el.value().attr("href"))
        else {
            continue;
        };

        if let Some(url) = DuckDuckGoBackend::extract_url(href) {
            hits.push(SearchHit { url });
        }
    }

    tracing::debug!(count = hits.len(), "DuckDuckGo results parsed");
    Ok(hits)
}
