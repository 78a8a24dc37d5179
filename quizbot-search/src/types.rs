//! Core retrieval types: search hits, snippets and the ordered context.

use serde::{Deserialize, Serialize};

/// Snippet text used when a fetched page contains no paragraphs.
pub const NO_ADDITIONAL_INFORMATION: &str = "no additional information";

/// Snippet text used when a page could not be fetched.
pub const PAGE_LOAD_ERROR: &str = "page load error";

/// A single search hit. Only the URL is used downstream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchHit {
    /// The URL of the hit.
    pub url: String,
}

impl SearchHit {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

/// Cleaned text retrieved for one hit, or a sentinel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snippet {
    /// The URL the text came from.
    pub url: String,
    /// Extracted paragraph text, [`NO_ADDITIONAL_INFORMATION`] or
    /// [`PAGE_LOAD_ERROR`].
    pub text: String,
}

impl Snippet {
    pub fn new(url: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            text: text.into(),
        }
    }

    /// Snippet for a page that failed to load.
    pub fn page_load_error(url: impl Into<String>) -> Self {
        Self::new(url, PAGE_LOAD_ERROR)
    }

    /// Returns `true` if the text is one of the two sentinels.
    pub fn is_sentinel(&self) -> bool {
        self.text == PAGE_LOAD_ERROR || self.text == NO_ADDITIONAL_INFORMATION
    }
}

/// The ordered result of one retrieval run.
///
/// Holds exactly one [`Snippet`] per search hit, in search order, plus the
/// hit URLs in the same order. Both sequences always have equal length.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetrievalContext {
    snippets: Vec<Snippet>,
    urls: Vec<String>,
}

impl RetrievalContext {
    /// Build a context from snippets already in search order.
    pub fn from_snippets(snippets: Vec<Snippet>) -> Self {
        let urls = snippets.iter().map(|s| s.url.clone()).collect();
        Self { snippets, urls }
    }

    /// A context with no sources.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn snippets(&self) -> &[Snippet] {
        &self.snippets
    }

    /// Hit URLs in original search order.
    pub fn urls(&self) -> &[String] {
        &self.urls
    }

    /// Consume the context, returning the URL list.
    pub fn into_urls(self) -> Vec<String> {
        self.urls
    }

    pub fn len(&self) -> usize {
        self.snippets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snippets.is_empty()
    }
}
