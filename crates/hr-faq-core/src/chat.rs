//! Client-side conversation history.
//!
//! The history is display state only: the backend is stateless and each
//! ask call carries just the latest user text.

use serde::{Deserialize, Serialize};

/// First assistant message of every conversation.
pub const GREETING: &str = "Merhaba! İK asistanıyım. Nasıl yardımcı olabilirim?";

/// Shown while waiting for the backend.
pub const TYPING_INDICATOR: &str = "Yazıyor…";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }

    /// An assistant bubble reporting a failure.
    pub fn error(message: impl std::fmt::Display) -> Self {
        Self::assistant(format!("Error: {}", message))
    }
}

/// Ordered, append-only list of messages.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatHistory {
    messages: Vec<ChatMessage>,
}

impl ChatHistory {
    /// A history that starts with the assistant greeting.
    pub fn with_greeting() -> Self {
        let mut history = Self::default();
        history.push(ChatMessage::assistant(GREETING));
        history
    }

    pub fn push(&mut self, message: ChatMessage) -> &ChatMessage {
        self.messages.push(message);
        &self.messages[self.messages.len() - 1]
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_history_starts_with_greeting() {
        let h = ChatHistory::with_greeting();
        assert_eq!(h.len(), 1);
        assert_eq!(h.messages()[0], ChatMessage::assistant(GREETING));
    }

    #[test]
    fn test_history_keeps_insertion_order() {
        let mut h = ChatHistory::default();
        assert!(h.is_empty());
        h.push(ChatMessage::user("a"));
        h.push(ChatMessage::assistant("b"));
        h.push(ChatMessage::user("c"));
        let contents: Vec<&str> = h.messages().iter().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, vec!["a", "b", "c"]);
        assert_eq!(h.messages().last().map(|m| m.role), Some(Role::User));
    }

    #[test]
    fn test_error_message_prefix() {
        let m = ChatMessage::error("boom");
        assert_eq!(m.role, Role::Assistant);
        assert_eq!(m.content, "Error: boom");
    }

    #[test]
    fn test_role_wire_format() {
        let v = serde_json::to_value(ChatMessage::user("x")).unwrap();
        assert_eq!(v["role"], "user");
    }
}
