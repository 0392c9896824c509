use async_trait::async_trait;
use chrono::{DateTime, Utc};
use colloquy_llm::Content;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::api::{ClientError, Result, SendMessage, ThreadsApi, TurnReply};
use crate::models::{MessageView, Role, ThreadView};

/// reqwest-backed gateway speaking the service's JSON envelope
pub struct HttpThreadsApi {
    http: reqwest::Client,
    base_url: String,
}

impl HttpThreadsApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn unwrap_envelope<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
        let status = response.status();

        if !status.is_success() {
            let message = response
                .json::<Envelope<serde_json::Value>>()
                .await
                .ok()
                .filter(|envelope| !envelope.message.is_empty())
                .map(|envelope| envelope.message)
                .unwrap_or_else(|| format!("Request failed with status {status}"));
            return Err(ClientError::Service(message));
        }

        let envelope: Envelope<T> = response.json().await?;
        envelope
            .data
            .ok_or_else(|| ClientError::Service("Response carried no data".to_string()))
    }
}

#[async_trait]
impl ThreadsApi for HttpThreadsApi {
    async fn list_threads(&self) -> Result<Vec<ThreadView>> {
        let response = self.http.get(self.url("/threads/get")).send().await?;
        let threads: Vec<ThreadDto> = Self::unwrap_envelope(response).await?;
        Ok(threads.into_iter().map(ThreadView::from).collect())
    }

    async fn create_thread(&self, title: &str) -> Result<ThreadView> {
        let response = self
            .http
            .post(self.url("/threads/add"))
            .json(&TitleBody { title })
            .send()
            .await?;
        let thread: ThreadDto = Self::unwrap_envelope(response).await?;
        Ok(thread.into())
    }

    async fn fetch_thread(&self, thread_id: &str) -> Result<ThreadView> {
        let response = self
            .http
            .get(self.url(&format!("/threads/{thread_id}")))
            .send()
            .await?;
        let thread: ThreadDto = Self::unwrap_envelope(response).await?;
        Ok(thread.into())
    }

    async fn delete_thread(&self, thread_id: &str) -> Result<ThreadView> {
        let response = self
            .http
            .delete(self.url(&format!("/threads/{thread_id}")))
            .send()
            .await?;
        let thread: ThreadDto = Self::unwrap_envelope(response).await?;
        Ok(thread.into())
    }

    async fn update_title(&self, thread_id: &str, title: &str) -> Result<ThreadView> {
        let response = self
            .http
            .patch(self.url(&format!("/threads/{thread_id}")))
            .json(&TitleBody { title })
            .send()
            .await?;
        let thread: ThreadDto = Self::unwrap_envelope(response).await?;
        Ok(thread.into())
    }

    async fn send_message(&self, message: &SendMessage) -> Result<TurnReply> {
        let response = self
            .http
            .post(self.url("/chat/message"))
            .json(&SendMessageBody {
                message: &message.message,
                thread_id: &message.thread_id,
                image_base64: message.image_base64.as_deref(),
            })
            .send()
            .await?;
        let turn: TurnDto = Self::unwrap_envelope(response).await?;
        Ok(TurnReply {
            thread_id: turn.thread_id,
            user_message: turn.user_message,
            assistant_message: turn.assistant_message,
        })
    }
}

// ============================================================================
// WIRE TYPES
// ============================================================================

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    #[allow(dead_code)]
    #[serde(default)]
    success: bool,
    #[serde(default = "Option::default")]
    data: Option<T>,
    #[serde(default)]
    message: String,
}

#[derive(Debug, Serialize)]
struct TitleBody<'a> {
    title: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SendMessageBody<'a> {
    message: &'a str,
    thread_id: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    image_base64: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ThreadDto {
    id: String,
    title: String,
    #[serde(default)]
    messages: Vec<MessageDto>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
struct MessageDto {
    id: String,
    role: Role,
    #[serde(default)]
    content: Content,
    timestamp: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TurnDto {
    thread_id: String,
    user_message: String,
    assistant_message: String,
}

impl From<ThreadDto> for ThreadView {
    fn from(dto: ThreadDto) -> Self {
        Self {
            id: dto.id,
            title: dto.title,
            messages: dto.messages.into_iter().map(MessageView::from).collect(),
            created_at: dto.created_at,
            updated_at: dto.updated_at,
        }
    }
}

impl From<MessageDto> for MessageView {
    fn from(dto: MessageDto) -> Self {
        Self {
            id: dto.id,
            role: dto.role,
            content: dto.content,
            timestamp: dto.timestamp,
        }
    }
}
