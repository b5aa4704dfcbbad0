//! Answer pipeline: FAQ match first, hosted model second.
//!
//! ```text
//!  text ──▶ empty? ──yes──▶ EmptyQuestion (400)
//!             │no
//!             ▼
//!        FaqMatcher::find ──hit──▶ { answer, source: "sss" }
//!             │miss
//!             ▼
//!   CompletionFallback::answer ──▶ { answer, source: "openai" }
//! ```
//!
//! Every request is handled in a single pass; nothing is kept between
//! requests apart from the matcher's question index.

use std::sync::Arc;
use thiserror::Error;

use hr_faq_core::models::{AnswerSource, AskResponse};

use crate::completion::{CompletionError, CompletionFallback, Completer, OpenAICompleter};
use crate::config::Config;
use crate::data::HrData;
use crate::embedding::{create_provider, Embedder};
use crate::matcher::FaqMatcher;

#[derive(Debug, Error)]
pub enum AskError {
    #[error("question text must not be empty")]
    EmptyQuestion,
    #[error("{0} is not set")]
    MissingCredential(&'static str),
    #[error(transparent)]
    Upstream(#[from] anyhow::Error),
}

impl From<CompletionError> for AskError {
    fn from(err: CompletionError) -> Self {
        match err {
            CompletionError::MissingCredential(var) => AskError::MissingCredential(var),
            CompletionError::Request(e) => AskError::Upstream(e),
        }
    }
}

pub struct AskService {
    matcher: FaqMatcher,
    fallback: CompletionFallback,
}

impl AskService {
    pub fn new(matcher: FaqMatcher, fallback: CompletionFallback) -> Self {
        Self { matcher, fallback }
    }

    /// Wires the service from settings and loaded data, using the configured
    /// embedding provider and the OpenAI completion endpoint.
    pub fn from_config(config: &Config, data: &HrData) -> anyhow::Result<Self> {
        let embedder = create_provider(&config.embedding)?;
        let completer: Arc<dyn Completer> = Arc::new(OpenAICompleter::new(&config.completion)?);
        Ok(Self::with_providers(config, data, embedder, completer))
    }

    pub fn with_providers(
        config: &Config,
        data: &HrData,
        embedder: Arc<dyn Embedder>,
        completer: Arc<dyn Completer>,
    ) -> Self {
        let matcher = FaqMatcher::new(data.faq.clone(), embedder, config.matcher.threshold);
        let fallback = CompletionFallback::new(completer, &config.completion, &data.config);
        Self::new(matcher, fallback)
    }

    pub fn matcher(&self) -> &FaqMatcher {
        &self.matcher
    }

    /// Answers one question.
    pub async fn ask(&self, text: &str) -> Result<AskResponse, AskError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(AskError::EmptyQuestion);
        }
        tracing::info!(question = %text, "question received");

        if let Some(hit) = self.matcher.find(text).await? {
            tracing::info!(faq = %hit.entry.question, "answered from FAQ");
            return Ok(AskResponse {
                answer: hit.entry.answer.clone(),
                source: AnswerSource::Faq,
            });
        }

        tracing::info!("no FAQ match, asking the completion model");
        let answer = self.fallback.answer(text).await?;
        Ok(AskResponse {
            answer,
            source: AnswerSource::Model,
        })
    }
}
