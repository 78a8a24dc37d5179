//! quizbot: answers multiple-choice questions with web context.
//!
//! # Architecture
//!
//! Each question runs through a fixed pipeline:
//! - **Retrieval**: search the web and pull paragraph text from each hit
//!   (`quizbot-search`)
//! - **Prompt**: system prompt, question and snippets rendered into one string
//! - **Generation**: one call to a hosted text-generation endpoint
//! - **Parsing**: option number and reasoning read from the generated text
//! - **Assembly**: attribution header, `"null"` sentinel and source list added
//!
//! Failures degrade the answer rather than abort it, except for a search
//! backend that fails for a reason other than rate limiting.

pub mod answer;
pub mod config;
pub mod error;
pub mod generation;
pub mod pipeline;
pub mod prompt;
pub mod server;

pub use answer::{AnswerParser, AnswerValue, FinalAnswer, ParsedAnswer};
pub use config::{AnswerFormat, ApiConfig, AppConfig, ServerConfig};
pub use error::{BotError, Result};
pub use generation::{GenerationClient, GenerationResult};
pub use pipeline::{AnswerService, DefaultAnswerService, Query};
pub use prompt::GenerationRequest;
pub use server::AnswerServer;
