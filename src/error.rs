//! Error types for the quizbot pipeline.

use quizbot_search::SearchError;

/// Top-level error type for answering a question.
///
/// Most failures inside the pipeline are absorbed into sentinel values; the
/// ones that reach a caller of [`crate::AnswerService::answer`] are
/// [`BotError::Search`] and [`BotError::Cancelled`].
#[derive(Debug, thiserror::Error)]
pub enum BotError {
    /// Configuration error.
    #[error("config error: {0}")]
    Config(String),

    /// Non-rate-limit search backend failure.
    #[error("search error: {0}")]
    Search(#[from] SearchError),

    /// The request was cancelled before an answer was produced.
    #[error("request cancelled")]
    Cancelled,

    /// Inbound endpoint error (bind, serve).
    #[error("server error: {0}")]
    Server(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience result type.
pub type Result<T> = std::result::Result<T, BotError>;
