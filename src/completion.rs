//! Hosted chat-completion fallback.
//!
//! When no FAQ entry is close enough, the question goes to a chat model
//! together with a system prompt carrying the company's canonical facts.
//! Each call is a single turn (system + user message); nothing is
//! remembered between calls.
//!
//! # Failure behaviour
//!
//! | Situation | Result |
//! |-----------|--------|
//! | `OPENAI_API_KEY` unset | [`CompletionError::MissingCredential`] |
//! | Connect / timeout error | [`CompletionError::Request`] |
//! | Non-2xx status, unparsable body, no content | the configured fallback answer |

use anyhow::Context;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

use hr_faq_core::models::HrConfig;
use hr_faq_core::prompt::{render_system_prompt, DEFAULT_SYSTEM_PROMPT};

use crate::config::{api_key, CompletionConfig, API_KEY_ENV};

#[derive(Debug, Error)]
pub enum CompletionError {
    #[error("{0} is not set")]
    MissingCredential(&'static str),
    #[error(transparent)]
    Request(#[from] anyhow::Error),
}

/// A chat model that answers a single system + user turn.
#[async_trait]
pub trait Completer: Send + Sync {
    fn model_name(&self) -> &str;

    /// Returns the model's answer, or `None` if it produced no usable content.
    async fn complete(&self, system: &str, user: &str) -> Result<Option<String>, CompletionError>;
}

/// Completer backed by an OpenAI-compatible `POST /chat/completions` endpoint.
pub struct OpenAICompleter {
    model: String,
    endpoint: String,
    key_var: &'static str,
    temperature: f32,
    max_tokens: u32,
    client: reqwest::Client,
}

impl OpenAICompleter {
    pub fn new(config: &CompletionConfig) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            model: config.model.clone(),
            endpoint: format!(
                "{}/chat/completions",
                config.base_url.trim_end_matches('/')
            ),
            key_var: API_KEY_ENV,
            temperature: config.temperature,
            max_tokens: config.max_tokens,
            client,
        })
    }
}

#[async_trait]
impl Completer for OpenAICompleter {
    fn model_name(&self) -> &str {
        &self.model
    }

    async fn complete(&self, system: &str, user: &str) -> Result<Option<String>, CompletionError> {
        let key = api_key(self.key_var).ok_or(CompletionError::MissingCredential(self.key_var))?;

        let body = serde_json::json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": system },
                { "role": "user", "content": user },
            ],
            "temperature": self.temperature,
            "max_tokens": self.max_tokens,
        });

        let response = self
            .client
            .post(&self.endpoint)
            .header("Authorization", format!("Bearer {}", key))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .context("chat completion request failed")?;

        let status = response.status();
        tracing::info!(%status, model = %self.model, "completion response");

        let json = match response.json::<serde_json::Value>().await {
            Ok(v) => v,
            Err(e) => {
                tracing::warn!(error = %e, "completion body is not valid JSON");
                serde_json::Value::Null
            }
        };

        if !status.is_success() {
            tracing::warn!(%status, body = %json, "completion endpoint returned an error");
        }

        Ok(extract_answer(&json))
    }
}

/// Extracts `choices[0].message.content`, trimmed; empty content counts as absent.
fn extract_answer(json: &serde_json::Value) -> Option<String> {
    json.pointer("/choices/0/message/content")
        .and_then(|c| c.as_str())
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(str::to_string)
}

/// The completion step of the answer pipeline.
///
/// The system prompt is rendered once at construction; config data is
/// immutable for the life of the process.
pub struct CompletionFallback {
    completer: Arc<dyn Completer>,
    system_prompt: String,
    fallback_answer: String,
}

impl CompletionFallback {
    pub fn new(completer: Arc<dyn Completer>, config: &CompletionConfig, hr: &HrConfig) -> Self {
        let template = config
            .system_prompt
            .as_deref()
            .unwrap_or(DEFAULT_SYSTEM_PROMPT);
        Self {
            completer,
            system_prompt: render_system_prompt(template, hr),
            fallback_answer: config.fallback_answer.clone(),
        }
    }

    #[cfg(test)]
    pub fn system_prompt(&self) -> &str {
        &self.system_prompt
    }

    pub async fn answer(&self, question: &str) -> Result<String, CompletionError> {
        match self.completer.complete(&self.system_prompt, question).await? {
            Some(answer) => Ok(answer),
            None => {
                tracing::warn!(
                    model = self.completer.model_name(),
                    "empty completion, using fallback answer"
                );
                Ok(self.fallback_answer.clone())
            }
        }
    }
}
