use chrono::{DateTime, Utc};
use colloquy_llm::Content;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Thread title shown until the server confirms a generated one.
pub const PLACEHOLDER_TITLE: &str = "New Chat";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// Client-side mirror of one message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageView {
    pub id: String,
    pub role: Role,
    pub content: Content,
    pub timestamp: DateTime<Utc>,
}

impl MessageView {
    /// Synthesize a local message with a temporary id for optimistic display.
    pub fn local(role: Role, content: impl Into<Content>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            role,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }
}

/// Client-side mirror of one thread
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThreadView {
    pub id: String,
    pub title: String,
    pub messages: Vec<MessageView>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
