//! Chat messages and the JSON bodies exchanged with the backend.

use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

/// Author of a transcript message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    #[serde(alias = "assistant")]
    Bot,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Bot => "bot",
        }
    }
}

/// A message in the transcript. Immutable once appended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub role: Role,
    pub text: String,
    /// Creation time, milliseconds since the Unix epoch.
    pub timestamp: u64,
}

impl ChatMessage {
    pub fn new(role: Role, text: impl Into<String>) -> Self {
        Self {
            role,
            text: text.into(),
            timestamp: now_millis(),
        }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self::new(Role::User, text)
    }

    pub fn bot(text: impl Into<String>) -> Self {
        Self::new(Role::Bot, text)
    }
}

/// Body posted to the chat endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatRequest {
    pub message: String,
    pub role: Role,
}

impl ChatRequest {
    pub fn user(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            role: Role::User,
        }
    }
}

/// Body returned by the non-streaming chat endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatReply {
    pub message: String,
    pub role: Role,
    #[serde(default)]
    pub timestamp: Option<u64>,
}

impl From<ChatReply> for ChatMessage {
    fn from(reply: ChatReply) -> Self {
        Self {
            role: reply.role,
            text: reply.message,
            timestamp: reply.timestamp.unwrap_or_else(now_millis),
        }
    }
}

fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_default()
}
