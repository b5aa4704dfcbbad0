//! Core data models.
//!
//! These types describe the static data the assistant is built from
//! ([`HrConfig`], [`FaqEntry`]) and the JSON bodies exchanged between the
//! HTTP server and chat clients ([`AskRequest`], [`AskResponse`],
//! [`ErrorResponse`]).

use std::collections::BTreeMap;
use std::fmt;

use anyhow::{bail, Result};
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::links::LinkPolicy;

/// Key of the link that users are redirected to for official answers.
pub const CONTACT_LINK: &str = "contact";

/// A curated question/answer pair.
///
/// The on-disk format uses the short keys `q` and `a`; the long names are
/// accepted as aliases.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FaqEntry {
    #[serde(rename = "q", alias = "question")]
    pub question: String,
    #[serde(rename = "a", alias = "answer")]
    pub answer: String,
}

impl FaqEntry {
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
        }
    }
}

/// A canonical fact value: either a single string or a list of strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FactValue {
    Text(String),
    List(Vec<String>),
}

impl FactValue {
    /// Renders the value as a single line; list items are joined by `", "`.
    pub fn joined(&self) -> String {
        match self {
            FactValue::Text(s) => s.clone(),
            FactValue::List(items) => items.join(", "),
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            FactValue::Text(s) => Some(s),
            FactValue::List(_) => None,
        }
    }
}

/// Named facts in the order they appear in the config file.
///
/// A repeated key keeps its first position and takes the last value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Facts(Vec<(String, FactValue)>);

impl Facts {
    pub fn get(&self, key: &str) -> Option<&FactValue> {
        self.0.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: FactValue) {
        let key = key.into();
        match self.0.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.0.push((key, value)),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FactValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Serialize for Facts {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (k, v) in &self.0 {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Facts {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct FactsVisitor;

        impl<'de> Visitor<'de> for FactsVisitor {
            type Value = Facts;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of fact names to strings or string lists")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> std::result::Result<Facts, A::Error> {
                let mut facts = Facts::default();
                while let Some((key, value)) = access.next_entry::<String, FactValue>()? {
                    facts.insert(key, value);
                }
                Ok(facts)
            }
        }

        deserializer.deserialize_map(FactsVisitor)
    }
}

/// Brand strings, links, link whitelist, and canonical company facts.
///
/// Loaded once at startup and read-only afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HrConfig {
    pub brand: String,
    #[serde(default)]
    pub links: BTreeMap<String, String>,
    /// Regex patterns; a URL is allowed if any pattern matches it.
    #[serde(default)]
    pub whitelist: Vec<String>,
    #[serde(default)]
    pub facts: Facts,
}

impl HrConfig {
    pub fn link(&self, name: &str) -> Option<&str> {
        self.links.get(name).map(String::as_str)
    }

    pub fn contact(&self) -> Option<&str> {
        self.link(CONTACT_LINK)
    }

    /// Checks the invariants the rest of the system relies on.
    ///
    /// # Errors
    ///
    /// Fails if the brand is blank, the contact link is missing, or any
    /// whitelist pattern is not a valid regex.
    pub fn validate(&self) -> Result<()> {
        if self.brand.trim().is_empty() {
            bail!("brand must not be empty");
        }
        match self.contact() {
            Some(c) if !c.trim().is_empty() => {}
            _ => bail!("links.{} must be set", CONTACT_LINK),
        }
        LinkPolicy::new(&self.whitelist)?;
        Ok(())
    }
}

/// Validates a loaded FAQ list: every entry needs a question and an answer.
pub fn validate_faq(entries: &[FaqEntry]) -> Result<()> {
    for (i, entry) in entries.iter().enumerate() {
        if entry.question.trim().is_empty() {
            bail!("FAQ entry #{} has an empty question", i);
        }
        if entry.answer.trim().is_empty() {
            bail!("FAQ entry #{} ('{}') has an empty answer", i, entry.question);
        }
    }
    Ok(())
}

/// Where an answer came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AnswerSource {
    /// A curated FAQ entry.
    #[serde(rename = "sss")]
    Faq,
    /// The hosted completion model.
    #[serde(rename = "openai")]
    Model,
}

impl AnswerSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnswerSource::Faq => "sss",
            AnswerSource::Model => "openai",
        }
    }
}

/// Body of `POST /api/ask`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AskRequest {
    #[serde(default)]
    pub text: String,
}

/// Successful response of `POST /api/ask`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AskResponse {
    pub answer: String,
    pub source: AnswerSource,
}

/// Error body returned by every endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}
