//! Terminal chat client.
//!
//! Talks to a running server the way the browser chat page does: it fetches
//! `/api/config` once, keeps the conversation history locally, and sends
//! only the latest question to `/api/ask`. Sensitive questions are answered
//! locally with a redirect to HR and never reach the backend. Backend
//! answers are post-processed (canonical facts, then link whitelisting)
//! before they are shown.

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};

use hr_faq_core::chat::{ChatHistory, ChatMessage, Role, TYPING_INDICATOR};
use hr_faq_core::facts::apply_canonical_facts;
use hr_faq_core::guard::pre_guard;
use hr_faq_core::links::LinkPolicy;
use hr_faq_core::models::{AskRequest, HrConfig};

/// The server side of a chat session.
#[async_trait]
pub trait AskBackend: Send + Sync {
    /// Returns the answer text for `text`.
    async fn ask(&self, text: &str) -> Result<String>;
}

/// [`AskBackend`] over HTTP.
pub struct HttpBackend {
    base_url: String,
    client: reqwest::Client,
}

impl HttpBackend {
    pub fn new(base_url: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(60))
            .build()?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    pub async fn fetch_config(&self) -> Result<HrConfig> {
        let url = format!("{}/api/config", self.base_url);
        let config: HrConfig = self
            .client
            .get(&url)
            .send()
            .await
            .with_context(|| format!("cannot reach {}", url))?
            .error_for_status()?
            .json()
            .await
            .context("invalid config from server")?;
        Ok(config)
    }
}

#[async_trait]
impl AskBackend for HttpBackend {
    async fn ask(&self, text: &str) -> Result<String> {
        let resp = self
            .client
            .post(format!("{}/api/ask", self.base_url))
            .json(&AskRequest {
                text: text.to_string(),
            })
            .send()
            .await?;

        let ok = resp.status().is_success();
        let json: serde_json::Value = resp.json().await?;
        parse_ask_body(ok, &json)
    }
}

/// Interprets an `/api/ask` response body.
fn parse_ask_body(ok: bool, json: &serde_json::Value) -> Result<String> {
    if !ok {
        let msg = json
            .get("error")
            .and_then(|e| e.as_str())
            .unwrap_or("Bilinmeyen hata oluştu");
        bail!("{}", msg);
    }
    match json.get("answer").and_then(|a| a.as_str()) {
        Some(a) if !a.is_empty() => Ok(a.to_string()),
        _ => bail!("Boş yanıt döndü"),
    }
}

/// One conversation: history plus the reply pipeline.
pub struct ChatSession<B> {
    backend: B,
    config: HrConfig,
    links: LinkPolicy,
    history: ChatHistory,
}

impl<B: AskBackend> ChatSession<B> {
    /// # Errors
    ///
    /// Fails if the config's whitelist patterns do not compile.
    pub fn new(backend: B, config: HrConfig) -> Result<Self> {
        let links = LinkPolicy::new(&config.whitelist)?;
        Ok(Self {
            backend,
            config,
            links,
            history: ChatHistory::with_greeting(),
        })
    }

    pub fn history(&self) -> &ChatHistory {
        &self.history
    }

    pub fn config(&self) -> &HrConfig {
        &self.config
    }

    /// Handles one line of user input and returns the assistant reply.
    ///
    /// Blank input is ignored and returns `None`.
    pub async fn send(&mut self, input: &str) -> Option<&ChatMessage> {
        let text = input.trim();
        if text.is_empty() {
            return None;
        }

        self.history.push(ChatMessage::user(text));

        let contact = self.config.contact().unwrap_or_default();
        if let Some(redirect) = pre_guard(text, contact) {
            tracing::debug!("sensitive question answered locally");
            return Some(self.history.push(ChatMessage::assistant(redirect)));
        }

        let reply = match self.backend.ask(text).await {
            Ok(answer) => ChatMessage::assistant(self.post_process(&answer)),
            Err(e) => ChatMessage::error(e),
        };
        Some(self.history.push(reply))
    }

    /// Canonical fact substitution, then link whitelisting.
    pub fn post_process(&self, answer: &str) -> String {
        let fixed = apply_canonical_facts(answer, &self.config);
        self.links.sanitize(&fixed)
    }
}

/// Runs an interactive chat against the server at `base_url`.
pub async fn run_chat(base_url: &str) -> Result<()> {
    let backend = HttpBackend::new(base_url)?;
    let config = backend.fetch_config().await?;
    let mut session = ChatSession::new(backend, config)?;

    print_header(session.config());
    for message in session.history().messages() {
        print_message(message);
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line == "/quit" || line == "/exit" {
            break;
        }
        eprintln!("{}", TYPING_INDICATOR);
        if let Some(reply) = session.send(line).await {
            print_message(reply);
        }
    }

    Ok(())
}

fn print_header(config: &HrConfig) {
    println!("{}", config.brand);
    println!(
        "Başvurular için: {} • Staj: {}",
        config.link("careers_tr").unwrap_or("-"),
        config.link("intern_tr").unwrap_or("-")
    );
    println!();
}

fn print_message(message: &ChatMessage) {
    let who = match message.role {
        Role::User => "Siz",
        Role::Assistant => "İK",
    };
    println!("{}: {}", who, message.content);
}
