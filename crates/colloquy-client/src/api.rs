use async_trait::async_trait;
use thiserror::Error;

use crate::models::ThreadView;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Failure message reported by the service
    #[error("{0}")]
    Service(String),
}

pub type Result<T> = std::result::Result<T, ClientError>;

/// One outbound user turn
#[derive(Debug, Clone)]
pub struct SendMessage {
    pub thread_id: String,
    pub message: String,
    pub image_base64: Option<String>,
}

/// Server reply to a turn
#[derive(Debug, Clone)]
pub struct TurnReply {
    pub thread_id: String,
    pub user_message: String,
    pub assistant_message: String,
}

/// Remote gateway to the conversation service
///
/// Mirrors the HTTP surface one-to-one so the reconciler can be exercised
/// against a scripted implementation.
#[async_trait]
pub trait ThreadsApi: Send + Sync {
    async fn list_threads(&self) -> Result<Vec<ThreadView>>;

    async fn create_thread(&self, title: &str) -> Result<ThreadView>;

    async fn fetch_thread(&self, thread_id: &str) -> Result<ThreadView>;

    async fn delete_thread(&self, thread_id: &str) -> Result<ThreadView>;

    async fn update_title(&self, thread_id: &str, title: &str) -> Result<ThreadView>;

    async fn send_message(&self, message: &SendMessage) -> Result<TurnReply>;
}
