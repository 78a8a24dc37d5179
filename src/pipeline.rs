//! The answer pipeline: retrieve → compose → generate → parse → assemble.

use crate::answer::{self, AnswerParser, FinalAnswer};
use crate::config::AppConfig;
use crate::error::{BotError, Result};
use crate::generation::GenerationClient;
use crate::prompt;
use quizbot_search::{DuckDuckGoBackend, HttpPageFetcher, PageFetcher, Retriever, SearchBackend};
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

/// One inbound question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Query {
    pub id: i64,
    /// Question text with its numbered options.
    #[serde(rename = "query")]
    pub text: String,
}

impl Query {
    pub fn new(id: i64, text: impl Into<String>) -> Self {
        Self {
            id,
            text: text.into(),
        }
    }
}

/// Answers questions end to end.
///
/// Holds only read-only configuration and clients; every call owns its own
/// retrieval context and prompt, so one service can serve concurrent
/// requests without locking.
pub struct AnswerService<B, F> {
    retriever: Retriever<B, F>,
    generator: GenerationClient,
    parser: AnswerParser,
    system_prompt: String,
    header: String,
}

/// The production service: DuckDuckGo search and HTTP page fetches.
pub type DefaultAnswerService = AnswerService<DuckDuckGoBackend, HttpPageFetcher>;

impl DefaultAnswerService {
    /// Build the production service from `config`.
    ///
    /// # Errors
    ///
    /// Returns [`BotError::Config`] for invalid configuration or an HTTP
    /// client that cannot be built.
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        config.validate()?;
        let retriever =
            Retriever::from_config(&config.search).map_err(|e| BotError::Config(e.to_string()))?;
        Self::with_retriever(retriever, config)
    }
}

impl<B, F> AnswerService<B, F>
where
    B: SearchBackend,
    F: PageFetcher + 'static,
{
    /// Build a service around an existing retriever.
    ///
    /// # Errors
    ///
    /// Returns [`BotError::Config`] if the generation client cannot be built.
    pub fn with_retriever(retriever: Retriever<B, F>, config: &AppConfig) -> Result<Self> {
        Ok(Self {
            retriever,
            generator: GenerationClient::new(&config.api)?,
            parser: AnswerParser::new(&config.answer, config.api.system_prompt.clone()),
            system_prompt: config.api.system_prompt.clone(),
            header: config.answer.attribution_header(&config.api.model_name),
        })
    }

    /// Answer `query`.
    ///
    /// Always yields a well-formed [`FinalAnswer`] when retrieval succeeds:
    /// fetch, generation and parse failures show up as sentinel snippets,
    /// a `"null"` answer or a header-only reasoning.
    ///
    /// # Errors
    ///
    /// [`BotError::Search`] when the search backend fails for a reason other
    /// than rate limiting.
    #[tracing::instrument(name = "answer", skip_all, fields(query_id = query.id))]
    pub async fn answer(&self, query: &Query) -> Result<FinalAnswer> {
        tracing::trace!(query = %query.text, "answering");

        let context = self.retriever.retrieve(&query.text).await?;
        let request = prompt::compose(&self.system_prompt, &query.text, &context);
        let generated = self.generator.generate(&request).await;
        let parsed = self.parser.parse(&generated.text);
        let answer = answer::assemble(query.id, parsed, &self.header, context.into_urls());

        tracing::info!(
            sources = answer.sources.len(),
            answered = !answer.answer.is_null(),
            generated = !generated.is_empty(),
            "answer ready"
        );
        Ok(answer)
    }

    /// Answer `query` unless `cancel` fires first.
    ///
    /// Cancellation drops the pipeline, aborting any in-flight page fetches.
    /// No partial answer is returned.
    ///
    /// # Errors
    ///
    /// [`BotError::Cancelled`], or anything [`Self::answer`] returns.
    pub async fn answer_with_cancel(
        &self,
        query: &Query,
        cancel: &CancellationToken,
    ) -> Result<FinalAnswer> {
        tokio::select! {
            biased;
            () = cancel.cancelled() => {
                tracing::info!(query_id = query.id, "answer cancelled");
                Err(BotError::Cancelled)
            }
            result = self.answer(query) => result,
        }
    }
}
