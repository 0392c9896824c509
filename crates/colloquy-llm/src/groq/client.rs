// Groq-specific client implementation (OpenAI-compatible chat completions)

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::traits::{ChatClient, ChatRequest, ChatResponse, TokenUsage};

const GROQ_API_BASE: &str = "https://api.groq.com/openai/v1";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);
const DEFAULT_MAX_RETRIES: u32 = 2;

/// Groq client (HTTP direct, no SDK)
///
/// Every request carries the client-level deadline; transport failures are
/// retried a bounded number of times, HTTP-level API errors never are.
pub struct GroqClient {
    http_client: reqwest::Client,
    base_url: String,
    max_retries: u32,
}

impl GroqClient {
    /// Create new client with API key
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::with_timeout(api_key, DEFAULT_TIMEOUT)
    }

    /// Create new client with an explicit request deadline
    pub fn with_timeout(api_key: impl Into<String>, timeout: Duration) -> Result<Self> {
        let api_key = api_key.into();

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", api_key))
                .context("Invalid API key format")?,
        );

        let http_client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            http_client,
            base_url: GROQ_API_BASE.to_string(),
            max_retries: DEFAULT_MAX_RETRIES,
        })
    }

    /// Override the API base URL (gateways, tests)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Bound transport-level retries (0 disables)
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Build chat completion request payload
    fn build_chat_request(&self, request: &ChatRequest) -> Result<Value> {
        let mut payload = serde_json::json!({
            "model": request.model,
            "messages": request.messages,
            "stream": false,
        });

        let obj = payload.as_object_mut().unwrap();
        let options = &request.options;

        if let Some(temp) = options.temperature {
            obj.insert("temperature".to_string(), serde_json::json!(temp));
        }
        if let Some(top_p) = options.top_p {
            obj.insert("top_p".to_string(), serde_json::json!(top_p));
        }
        if let Some(max_tokens) = options.max_completion_tokens {
            obj.insert(
                "max_completion_tokens".to_string(),
                serde_json::json!(max_tokens),
            );
        }

        Ok(payload)
    }

    /// POST the payload, retrying connect/timeout failures only.
    async fn post_chat(&self, payload: &Value) -> Result<reqwest::Response> {
        let url = format!("{}/chat/completions", self.base_url);
        let mut attempt = 0;

        loop {
            match self.http_client.post(&url).json(payload).send().await {
                Ok(response) => return Ok(response),
                Err(err) if attempt < self.max_retries && (err.is_timeout() || err.is_connect()) => {
                    attempt += 1;
                    tracing::warn!(
                        attempt,
                        error = %err,
                        "transport error calling completion API, retrying"
                    );
                    tokio::time::sleep(Duration::from_millis(200 * u64::from(attempt))).await;
                }
                Err(err) => return Err(err).context("Failed to send request"),
            }
        }
    }
}

#[async_trait]
impl ChatClient for GroqClient {
    async fn chat(&self, request: ChatRequest) -> Result<ChatResponse> {
        let payload = self.build_chat_request(&request)?;

        let response = self.post_chat(&payload).await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            anyhow::bail!("Groq API error ({}): {}", status, error_text);
        }

        let raw: GroqChatResponse = response
            .json()
            .await
            .context("Failed to parse response")?;

        // Convert to provider-agnostic response
        let choice = raw.choices.first();
        Ok(ChatResponse {
            content: choice.and_then(|c| c.message.content.clone()),
            finish_reason: choice.and_then(|c| c.finish_reason.clone()),
            usage: raw.usage.as_ref().map(|u| TokenUsage {
                prompt_tokens: u.prompt_tokens,
                completion_tokens: u.completion_tokens,
                total_tokens: u.total_tokens,
            }),
            raw: serde_json::to_value(raw)?,
        })
    }
}

// ============================================================================
// GROQ-SPECIFIC RESPONSE TYPES (for Chat Completions)
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
struct GroqChatResponse {
    pub id: String,
    pub model: String,
    pub choices: Vec<Choice>,
    pub usage: Option<Usage>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Choice {
    pub index: u32,
    pub message: ResponseMessage,
    pub finish_reason: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ResponseMessage {
    pub role: String,
    pub content: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::ChatOptions;
    use crate::types::{ChatMessage, Content, ContentPart};

    fn client() -> GroqClient {
        GroqClient::new("test-key").unwrap()
    }

    #[test]
    fn chat_payload_carries_sampling_options() {
        let request = ChatRequest::new("test-model", vec![ChatMessage::user("hi")]).with_options(
            ChatOptions::new()
                .temperature(0.7)
                .top_p(1.0)
                .max_completion_tokens(1024),
        );

        let payload = client().build_chat_request(&request).unwrap();

        assert_eq!(payload["model"], "test-model");
        assert_eq!(payload["stream"], false);
        // f32 options widen to f64 on the wire
        let temperature = payload["temperature"].as_f64().unwrap();
        assert!((temperature - 0.7).abs() < 1e-6);
        assert_eq!(payload["top_p"], 1.0);
        assert_eq!(payload["max_completion_tokens"], 1024);
        assert_eq!(payload["messages"][0]["role"], "user");
        assert_eq!(payload["messages"][0]["content"], "hi");
    }

    #[test]
    fn chat_payload_omits_unset_options() {
        let request = ChatRequest::new("test-model", vec![ChatMessage::user("hi")]);

        let payload = client().build_chat_request(&request).unwrap();

        assert!(payload.get("temperature").is_none());
        assert!(payload.get("top_p").is_none());
        assert!(payload.get("max_completion_tokens").is_none());
    }

    #[test]
    fn multipart_message_serializes_in_openai_shape() {
        let message = ChatMessage::user(Content::Parts(vec![
            ContentPart::text("look at this"),
            ContentPart::image_url("data:image/png;base64,AAAA"),
        ]));
        let request = ChatRequest::new("test-model", vec![message]);

        let payload = client().build_chat_request(&request).unwrap();
        let content = &payload["messages"][0]["content"];

        assert_eq!(content[0]["type"], "text");
        assert_eq!(content[0]["text"], "look at this");
        assert_eq!(content[1]["type"], "image_url");
        assert_eq!(content[1]["image_url"]["url"], "data:image/png;base64,AAAA");
    }
}
