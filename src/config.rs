//! Configuration types for quizbot.
//!
//! [`AppConfig`] is loaded once at startup from a TOML file and passed by
//! reference into each component's constructor. Every section has defaults,
//! so a file only needs the fields it changes.

use crate::error::{BotError, Result};
use quizbot_search::SearchConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Environment variable that overrides `api.key`.
pub const API_KEY_ENV: &str = "QUIZBOT_API_KEY";

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Retrieval settings (`num_cites`, `num_paragraphs`, timeouts).
    pub search: SearchConfig,
    /// Generation backend settings.
    pub api: ApiConfig,
    /// Labels used to parse generated text and attribute answers.
    pub answer: AnswerFormat,
    /// Inbound endpoint settings.
    pub server: ServerConfig,
}

/// Hosted generation backend configuration.
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Endpoint receiving `POST {"inputs": ...}`.
    pub url: String,
    /// Bearer token. Overridden by `QUIZBOT_API_KEY` when set.
    pub key: String,
    /// Model name shown in the attribution header.
    pub model_name: String,
    /// Instructions placed before the question. Also stripped from generated
    /// text when the backend echoes the prompt.
    pub system_prompt: String,
    /// Generation request timeout in seconds.
    pub timeout_seconds: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            url: "https://api-inference.huggingface.co/models/mistralai/Mistral-7B-Instruct-v0.3"
                .to_owned(),
            key: String::new(),
            model_name: "Mistral-7B-Instruct-v0.3".to_owned(),
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_owned(),
            timeout_seconds: 60,
        }
    }
}

impl std::fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiConfig")
            .field("url", &self.url)
            .field("key", &if self.key.is_empty() { "" } else { "<redacted>" })
            .field("model_name", &self.model_name)
            .field("system_prompt", &self.system_prompt)
            .field("timeout_seconds", &self.timeout_seconds)
            .finish()
    }
}

const DEFAULT_SYSTEM_PROMPT: &str = "You answer multiple-choice questions. \
Use the additional information if it is relevant. Reply in exactly this format:\n\
Correct answer: <option number>\n\
Reasoning: <short explanation>";

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    fn validate(&self) -> Result<()> {
        if self.url.trim().is_empty() {
            return Err(BotError::Config("api.url must not be empty".into()));
        }
        if self.timeout_seconds == 0 {
            return Err(BotError::Config(
                "api.timeout_seconds must be greater than 0".into(),
            ));
        }
        Ok(())
    }
}

/// Labels the generation model is asked to use, and the attribution header.
///
/// Defaults are English; deployments prompting in another language set their
/// own labels to match their system prompt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnswerFormat {
    /// Label preceding the answer number.
    pub answer_label: String,
    /// Label preceding the free-text reasoning.
    pub reasoning_label: String,
    /// Header prepended to every reasoning. `{model}` is replaced with
    /// `api.model_name`.
    pub attribution: String,
}

impl Default for AnswerFormat {
    fn default() -> Self {
        Self {
            answer_label: "Correct answer:".to_owned(),
            reasoning_label: "Reasoning:".to_owned(),
            attribution: "Answer generated by model {model}. ".to_owned(),
        }
    }
}

impl AnswerFormat {
    /// Render the attribution header for `model_name`.
    pub fn attribution_header(&self, model_name: &str) -> String {
        self.attribution.replace("{model}", model_name)
    }

    fn validate(&self) -> Result<()> {
        if self.answer_label.is_empty() || self.reasoning_label.is_empty() {
            return Err(BotError::Config("answer labels must not be empty".into()));
        }
        Ok(())
    }
}

/// Inbound endpoint configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host address to bind to.
    pub host: String,
    /// Port to listen on (0 = auto-assign).
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_owned(),
            port: 8080,
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file, falling back to defaults for
    /// missing fields, then apply the `QUIZBOT_API_KEY` override and validate.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed or validated.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content).map_err(|e| BotError::Config(e.to_string()))?;
        let config = config.with_api_key_override(std::env::var(API_KEY_ENV).ok());
        config.validate()?;
        Ok(config)
    }

    /// Replace `api.key` with `key` when it is present and non-empty.
    pub fn with_api_key_override(mut self, key: Option<String>) -> Self {
        if let Some(key) = key.filter(|k| !k.is_empty()) {
            self.api.key = key;
        }
        self
    }

    /// Check every section.
    ///
    /// # Errors
    ///
    /// Returns [`BotError::Config`] naming the first invalid field.
    pub fn validate(&self) -> Result<()> {
        self.search
            .validate()
            .map_err(|e| BotError::Config(e.to_string()))?;
        self.api.validate()?;
        self.answer.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]

    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.api.timeout(), Duration::from_secs(60));
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let toml_str = r#"
            [search]
            num_cites = 5

            [api]
            model_name = "test-model"
        "#;
        let config: AppConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.search.num_cites, 5);
        assert_eq!(config.search.num_paragraphs, 3);
        assert_eq!(config.api.model_name, "test-model");
        assert!(!config.api.url.is_empty());
        assert_eq!(config.answer, AnswerFormat::default());
    }

    #[test]
    fn from_file_loads_all_sections() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("quizbot.toml");
        std::fs::write(
            &path,
            r#"
            [search]
            num_cites = 2
            num_paragraphs = 4

            [api]
            url = "http://localhost:9000/generate"
            key = "file-key"
            model_name = "local"
            system_prompt = "Answer."

            [answer]
            answer_label = "Правильный ответ:"
            reasoning_label = "Рассуждения:"
            attribution = "Ответ сгенерирован моделью {model}. "

            [server]
            port = 0
            "#,
        )
        .unwrap();

        let config = AppConfig::from_file(&path).unwrap();
        assert_eq!(config.search.num_cites, 2);
        assert_eq!(config.api.url, "http://localhost:9000/generate");
        assert_eq!(config.answer.answer_label, "Правильный ответ:");
        assert_eq!(config.server.port, 0);
    }

    #[test]
    fn example_config_matches_defaults() {
        let config: AppConfig =
            toml::from_str(include_str!("../configs/quizbot.example.toml")).unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.api.url, AppConfig::default().api.url);
        assert_eq!(config.answer, AnswerFormat::default());
        assert_eq!(config.server.port, 8080);
    }

    #[test]
    fn from_file_rejects_invalid_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("quizbot.toml");
        std::fs::write(&path, "[search]\nmax_concurrent_fetches = 0\n").unwrap();

        let err = AppConfig::from_file(&path).unwrap_err();
        assert!(err.to_string().contains("max_concurrent_fetches"));
    }

    #[test]
    fn from_file_rejects_malformed_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("quizbot.toml");
        std::fs::write(&path, "[search\nnum_cites = ").unwrap();

        let err = AppConfig::from_file(&path).unwrap_err();
        assert!(matches!(err, BotError::Config(_)));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = AppConfig::from_file(Path::new("/nonexistent/quizbot.toml")).unwrap_err();
        assert!(matches!(err, BotError::Io(_)));
    }

    #[test]
    fn empty_url_rejected() {
        let mut config = AppConfig::default();
        config.api.url = "  ".into();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("api.url"));
    }

    #[test]
    fn zero_api_timeout_rejected() {
        let mut config = AppConfig::default();
        config.api.timeout_seconds = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn api_key_override_applies_only_when_set() {
        let mut config = AppConfig::default();
        config.api.key = "from-file".into();

        let kept = config.clone().with_api_key_override(None);
        assert_eq!(kept.api.key, "from-file");

        let kept = config.clone().with_api_key_override(Some(String::new()));
        assert_eq!(kept.api.key, "from-file");

        let replaced = config.with_api_key_override(Some("from-env".into()));
        assert_eq!(replaced.api.key, "from-env");
    }

    #[test]
    fn debug_redacts_api_key() {
        let mut api = ApiConfig::default();
        api.key = "hf_secret".into();
        let debug = format!("{api:?}");
        assert!(!debug.contains("hf_secret"));
        assert!(debug.contains("<redacted>"));
    }

    #[test]
    fn attribution_header_substitutes_model() {
        let format = AnswerFormat::default();
        assert_eq!(
            format.attribution_header("Mistral-7B"),
            "Answer generated by model Mistral-7B. "
        );
    }
}
