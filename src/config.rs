//! Application settings (TOML).
//!
//! The settings file names the JSON data files and carries every tunable of
//! the answer pipeline. Model parameters default to the values the assistant
//! has always shipped with; relative data paths resolve against the
//! directory of the settings file.
//!
//! ```toml
//! [server]
//! bind = "127.0.0.1:3001"
//!
//! [data]
//! config = "../data/config.json"
//! faq = "../data/sss.tr.json"
//!
//! [matcher]
//! threshold = 0.8
//!
//! [embedding]
//! provider = "openai"
//! model = "text-embedding-3-small"
//!
//! [completion]
//! model = "gpt-4o-mini"
//! temperature = 0.2
//! max_tokens = 200
//! ```

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Environment variable holding the hosted-model credential.
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

/// Environment variable that, when set, overrides the bind port.
pub const PORT_ENV: &str = "PORT";

/// Reads the credential in `var`. Unset and blank values both count as missing.
pub fn api_key(var: &str) -> Option<String> {
    std::env::var(var).ok().filter(|k| !k.trim().is_empty())
}

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    pub data: DataConfig,
    #[serde(default)]
    pub matcher: MatcherConfig,
    #[serde(default)]
    pub embedding: EmbeddingConfig,
    #[serde(default)]
    pub completion: CompletionConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

fn default_bind() -> String {
    "127.0.0.1:3001".to_string()
}

impl ServerConfig {
    /// The address to listen on. A `PORT` environment variable wins over the
    /// configured address and binds on all interfaces, as hosting platforms
    /// expect.
    pub fn bind_addr(&self) -> String {
        match std::env::var(PORT_ENV) {
            Ok(port) if !port.trim().is_empty() => format!("0.0.0.0:{}", port.trim()),
            _ => self.bind.clone(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct DataConfig {
    /// Brand, links, whitelist, and facts (JSON).
    pub config: PathBuf,
    /// FAQ entries (JSON array of `{ "q", "a" }`).
    pub faq: PathBuf,
}

#[derive(Debug, Deserialize, Clone)]
pub struct MatcherConfig {
    /// Minimum cosine similarity (exclusive) for an FAQ answer to be used.
    #[serde(default = "default_threshold")]
    pub threshold: f32,
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            threshold: default_threshold(),
        }
    }
}

fn default_threshold() -> f32 {
    0.8
}

#[derive(Debug, Deserialize, Clone)]
pub struct EmbeddingConfig {
    /// `openai`, `ollama`, `local`, or `disabled`.
    #[serde(default = "default_provider")]
    pub provider: String,
    #[serde(default = "default_embedding_model")]
    pub model: Option<String>,
    /// Base URL of an OpenAI-compatible API.
    #[serde(default = "default_openai_base_url")]
    pub base_url: String,
    /// Ollama server URL.
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
    #[serde(default)]
    pub max_retries: u32,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            model: default_embedding_model(),
            base_url: default_openai_base_url(),
            url: None,
            batch_size: default_batch_size(),
            max_retries: 0,
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_provider() -> String {
    "openai".to_string()
}
fn default_embedding_model() -> Option<String> {
    Some("text-embedding-3-small".to_string())
}
fn default_openai_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}
fn default_batch_size() -> usize {
    64
}
fn default_timeout_secs() -> u64 {
    30
}

#[derive(Debug, Deserialize, Clone)]
pub struct CompletionConfig {
    #[serde(default = "default_completion_model")]
    pub model: String,
    #[serde(default = "default_openai_base_url")]
    pub base_url: String,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Answer returned when the model yields no usable content.
    #[serde(default = "default_fallback_answer")]
    pub fallback_answer: String,
    /// Overrides the built-in system prompt template.
    #[serde(default)]
    pub system_prompt: Option<String>,
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            model: default_completion_model(),
            base_url: default_openai_base_url(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            timeout_secs: default_timeout_secs(),
            fallback_answer: default_fallback_answer(),
            system_prompt: None,
        }
    }
}

fn default_completion_model() -> String {
    "gpt-4o-mini".to_string()
}
fn default_temperature() -> f32 {
    0.2
}
fn default_max_tokens() -> u32 {
    200
}
fn default_fallback_answer() -> String {
    "Yanıt alınamadı.".to_string()
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let mut config: Config =
        toml::from_str(&content).with_context(|| "Failed to parse config file")?;

    let base = path.parent().unwrap_or_else(|| Path::new("."));
    config.data.config = resolve(base, &config.data.config);
    config.data.faq = resolve(base, &config.data.faq);

    validate(&config)?;

    Ok(config)
}

fn resolve(base: &Path, p: &Path) -> PathBuf {
    if p.is_absolute() {
        p.to_path_buf()
    } else {
        base.join(p)
    }
}

fn validate(config: &Config) -> Result<()> {
    if !(0.0..=1.0).contains(&config.matcher.threshold) {
        anyhow::bail!("matcher.threshold must be in [0.0, 1.0]");
    }

    if !(0.0..=2.0).contains(&config.completion.temperature) {
        anyhow::bail!("completion.temperature must be in [0.0, 2.0]");
    }
    if config.completion.max_tokens == 0 {
        anyhow::bail!("completion.max_tokens must be > 0");
    }
    if config.completion.model.trim().is_empty() {
        anyhow::bail!("completion.model must not be empty");
    }

    match config.embedding.provider.as_str() {
        "openai" | "ollama" => {
            if config.embedding.model.as_deref().map_or(true, str::is_empty) {
                anyhow::bail!(
                    "embedding.model must be specified when provider is '{}'",
                    config.embedding.provider
                );
            }
        }
        "disabled" | "local" => {}
        other => anyhow::bail!(
            "Unknown embedding provider: '{}'. Must be openai, ollama, local, or disabled.",
            other
        ),
    }

    Ok(())
}
