//! Search backend implementations.
//!
//! Each module provides a struct implementing [`crate::provider::SearchBackend`].

pub mod duckduckgo;

pub use duckduckgo::DuckDuckGoBackend;
