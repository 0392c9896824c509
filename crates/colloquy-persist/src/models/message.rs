use chrono::{DateTime, Utc};
use colloquy_llm::types::content::{content_or_empty, Content};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

/// One turn in a thread
///
/// The stored content of an image turn is the plain text only; the
/// multimodal part list exists solely on the outbound request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredMessage {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub role: MessageRole,
    #[serde(default, deserialize_with = "content_or_empty")]
    pub content: Content,
    #[serde(with = "bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Assistant,
}

impl StoredMessage {
    pub fn user(content: impl Into<Content>) -> Self {
        Self::with_role(MessageRole::User, content)
    }

    pub fn assistant(content: impl Into<Content>) -> Self {
        Self::with_role(MessageRole::Assistant, content)
    }

    fn with_role(role: MessageRole, content: impl Into<Content>) -> Self {
        Self {
            id: ObjectId::new(),
            role,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }
}
