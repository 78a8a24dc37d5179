//! Client for the hosted text-generation endpoint.
//!
//! The endpoint takes `{"inputs": "<prompt>"}` with a bearer token and
//! answers with either `[{"generated_text": ...}]` or
//! `{"generated_text": ...}`. Both shapes are decoded into
//! [`GenerationResponse`]; anything else is an unexpected format.
//!
//! [`GenerationClient::generate`] never fails: transport, status and format
//! problems are logged and turned into an empty [`GenerationResult`]. No
//! retries are attempted.

use crate::config::ApiConfig;
use crate::error::{BotError, Result};
use crate::prompt::GenerationRequest;
use serde::{Deserialize, Serialize};

/// Longest response excerpt included in error messages.
const BODY_EXCERPT_CHARS: usize = 200;

/// Why a generation call produced no text.
#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    /// The request could not be sent or the body could not be read.
    #[error("generation request failed: {0}")]
    Transport(String),

    /// The endpoint answered with a non-2xx status.
    #[error("generation endpoint returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// The body matched neither known response shape.
    #[error("unexpected generation response format: {0}")]
    Format(String),
}

/// Request body sent to the endpoint.
#[derive(Debug, Serialize)]
struct InferenceRequest<'a> {
    inputs: &'a str,
}

/// One generated sequence. Extra fields are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct GeneratedText {
    pub generated_text: String,
}

/// The response shapes the endpoint is known to return.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum GenerationResponse {
    /// `[{"generated_text": ...}, ...]`; the first element is used.
    Batch(Vec<GeneratedText>),
    /// `{"generated_text": ...}`
    Single(GeneratedText),
    /// Any other JSON value.
    Unrecognized(serde_json::Value),
}

impl GenerationResponse {
    /// Extract the generated text.
    ///
    /// # Errors
    ///
    /// [`GenerationError::Format`] for an empty batch or an unrecognized shape.
    pub fn into_text(self) -> std::result::Result<String, GenerationError> {
        match self {
            Self::Batch(items) => items
                .into_iter()
                .next()
                .map(|item| item.generated_text)
                .ok_or_else(|| GenerationError::Format("empty response list".into())),
            Self::Single(item) => Ok(item.generated_text),
            Self::Unrecognized(value) => {
                Err(GenerationError::Format(excerpt(&value.to_string())))
            }
        }
    }
}

/// Text produced by one generation call; empty when generation failed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerationResult {
    pub text: String,
}

impl GenerationResult {
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// Authenticated client for the generation endpoint.
#[derive(Debug, Clone)]
pub struct GenerationClient {
    client: reqwest::Client,
    url: String,
    api_key: String,
}

impl GenerationClient {
    /// Build a client for `config.url` with `config.timeout_seconds` as the
    /// request timeout.
    ///
    /// # Errors
    ///
    /// Returns [`BotError::Config`] if the HTTP client cannot be built.
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| BotError::Config(format!("failed to build generation client: {e}")))?;
        Ok(Self {
            client,
            url: config.url.clone(),
            api_key: config.key.clone(),
        })
    }

    /// Run one generation, absorbing every failure into an empty result.
    pub async fn generate(&self, request: &GenerationRequest) -> GenerationResult {
        match self.try_generate(request).await {
            Ok(text) => {
                tracing::debug!(chars = text.len(), "generation complete");
                GenerationResult { text }
            }
            Err(err @ GenerationError::Format(_)) => {
                tracing::error!(error = %err, "unexpected generation response format");
                GenerationResult::default()
            }
            Err(err) => {
                tracing::error!(error = %err, "generation request failed");
                GenerationResult::default()
            }
        }
    }

    /// Run one generation, returning the classified failure.
    ///
    /// # Errors
    ///
    /// [`GenerationError::Transport`], [`GenerationError::Status`] or
    /// [`GenerationError::Format`].
    pub async fn try_generate(
        &self,
        request: &GenerationRequest,
    ) -> std::result::Result<String, GenerationError> {
        let mut builder = self.client.post(&self.url).json(&InferenceRequest {
            inputs: &request.payload,
        });
        if !self.api_key.is_empty() {
            builder = builder.header("Authorization", format!("Bearer {}", self.api_key));
        }

        let response = builder
            .send()
            .await
            .map_err(|e| GenerationError::Transport(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| GenerationError::Transport(format!("body read failed: {e}")))?;

        if !status.is_success() {
            return Err(GenerationError::Status {
                status: status.as_u16(),
                body: excerpt(&body),
            });
        }

        let decoded: GenerationResponse = serde_json::from_str(&body)
            .map_err(|e| GenerationError::Format(format!("invalid JSON ({e}): {}", excerpt(&body))))?;
        decoded.into_text()
    }
}

fn excerpt(text: &str) -> String {
    if text.chars().count() <= BODY_EXCERPT_CHARS {
        return text.to_owned();
    }
    let mut cut: String = text.chars().take(BODY_EXCERPT_CHARS).collect();
    cut.push('…');
    cut
}
