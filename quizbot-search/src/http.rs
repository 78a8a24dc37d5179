//! Shared HTTP client construction with User-Agent rotation.
//!
//! Both the search backend and the page fetcher use a [`reqwest::Client`]
//! with browser-like headers, cookie support and a rotating User-Agent.

use crate::error::SearchError;
use rand::seq::SliceRandom;
use std::time::Duration;

/// Realistic browser User-Agent strings, one picked per client.
const USER_AGENTS: &[&str] = &[
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36",
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:133.0) Gecko/20100101 Firefox/133.0",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10.15; rv:133.0) Gecko/20100101 Firefox/133.0",
];

/// Build a [`reqwest::Client`] for scraping.
///
/// The client has:
/// - Cookie store enabled
/// - The given request timeout
/// - `user_agent` if set, otherwise a random one from the rotation list
/// - At most 10 redirects
///
/// # Errors
///
/// Returns [`SearchError::Http`] if the client cannot be constructed.
pub fn build_client(
    user_agent: Option<&str>,
    timeout: Duration,
) -> Result<reqwest::Client, SearchError> {
    let ua = user_agent.map_or_else(|| random_user_agent().to_owned(), str::to_owned);

    reqwest::Client::builder()
        .cookie_store(true)
        .timeout(timeout)
        .user_agent(ua)
        .redirect(reqwest::redirect::Policy::limited(10))
        .build()
        .map_err(|e| SearchError::Http(format!("failed to build HTTP client: {e}")))
}

/// Select a random User-Agent string from the rotation list.
pub fn random_user_agent() -> &'static str {
    let mut rng = rand::thread_rng();
    USER_AGENTS
        .choose(&mut rng)
        .copied()
        // USER_AGENTS is a non-empty const array, choose only returns None on empty slices
        .unwrap_or(USER_AGENTS[0])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn random_user_agent_returns_valid_ua() {
        let ua = random_user_agent();
        assert!(USER_AGENTS.contains(&ua));
        assert!(ua.contains("Mozilla/5.0"));
    }

    #[test]
    fn build_client_with_rotating_ua() {
        let client = build_client(None, Duration::from_secs(5));
        assert!(client.is_ok());
    }

    #[test]
    fn build_client_with_custom_ua() {
        let client = build_client(Some("QuizBot/1.0"), Duration::from_secs(5));
        assert!(client.is_ok());
    }

    #[test]
    fn build_client_with_borrowed_ua() {
        let configured = format!("QuizBot/{}", env!("CARGO_PKG_VERSION"));
        let client = build_client(Some(configured.as_str()), Duration::from_secs(5));
        assert!(client.is_ok());
    }
}
