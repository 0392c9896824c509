use std::sync::Arc;

use chrono::Utc;
use colloquy_llm::{ChatClient, ChatMessage, ChatOptions, ChatRequest, Content, ContentPart};
use colloquy_persist::{MessageRole, StoredMessage, Thread, ThreadStore};

use crate::error::{EngineError, Result};
use crate::locks::ThreadLocks;
use crate::title::TitleGenerator;

/// Default completion model; overridable per turn
pub const DEFAULT_MODEL: &str = "meta-llama/llama-4-scout-17b-16e-instruct";

const TEMPERATURE: f32 = 0.7;
const TOP_P: f32 = 1.0;
const MAX_COMPLETION_TOKENS: u32 = 1024;

/// One user turn against a thread
#[derive(Debug, Clone, Default)]
pub struct TurnRequest {
    pub thread_id: Option<String>,
    pub message: Option<String>,
    pub image_base64: Option<String>,
    pub model: Option<String>,
}

/// What a completed turn hands back for display
#[derive(Debug, Clone)]
pub struct TurnOutcome {
    pub thread_id: String,
    pub user_message: String,
    pub assistant_message: String,
}

/// Owns the authoritative per-thread message log.
///
/// Each turn resolves or creates its thread, appends the user message,
/// assembles the outbound request, calls the completion service and persists
/// the thread in one terminal write. A completion failure therefore leaves
/// no trace in the store.
pub struct ChatEngine {
    store: Arc<dyn ThreadStore>,
    llm: Arc<dyn ChatClient>,
    titler: TitleGenerator,
    default_model: String,
    locks: ThreadLocks,
}

impl ChatEngine {
    pub fn new(store: Arc<dyn ThreadStore>, llm: Arc<dyn ChatClient>) -> Self {
        Self::with_default_model(store, llm, DEFAULT_MODEL)
    }

    pub fn with_default_model(
        store: Arc<dyn ThreadStore>,
        llm: Arc<dyn ChatClient>,
        default_model: impl Into<String>,
    ) -> Self {
        let default_model = default_model.into();
        let titler = TitleGenerator::new(llm.clone(), default_model.clone());

        Self {
            store,
            llm,
            titler,
            default_model,
            locks: ThreadLocks::default(),
        }
    }

    pub async fn handle_turn(&self, request: TurnRequest) -> Result<TurnOutcome> {
        let text = request.message.clone().unwrap_or_default();
        if text.is_empty() && request.image_base64.is_none() {
            return Err(EngineError::EmptyTurn);
        }

        // Existing threads serialize here; a new thread has no id to contend on.
        let _guard = match &request.thread_id {
            Some(thread_id) => Some(self.locks.acquire(thread_id).await),
            None => None,
        };

        let mut thread = match &request.thread_id {
            Some(thread_id) => {
                let mut thread = self
                    .store
                    .get_thread(thread_id)
                    .await?
                    .ok_or_else(|| EngineError::ThreadNotFound(thread_id.clone()))?;

                // A thread created empty gets its title on the first turn.
                if thread.messages.is_empty() {
                    thread.title = self.titler.generate(&text).await?;
                }
                thread
            }
            None => Thread::new(self.titler.generate(&text).await?),
        };

        thread.messages.push(StoredMessage::user(text.clone()));

        let messages =
            outbound_messages(&thread.messages, &text, request.image_base64.as_deref());
        let model = request
            .model
            .clone()
            .unwrap_or_else(|| self.default_model.clone());
        let chat_request = ChatRequest::new(model, messages).with_options(
            ChatOptions::new()
                .temperature(TEMPERATURE)
                .top_p(TOP_P)
                .max_completion_tokens(MAX_COMPLETION_TOKENS),
        );

        let response = self
            .llm
            .chat(chat_request)
            .await
            .map_err(EngineError::Completion)?;
        let assistant_text = response.content.unwrap_or_default();

        thread
            .messages
            .push(StoredMessage::assistant(assistant_text.clone()));
        thread.updated_at = Utc::now();

        self.store.save_thread(&thread).await?;

        tracing::debug!(
            thread_id = %thread.id,
            messages = thread.messages.len(),
            "turn persisted"
        );

        Ok(TurnOutcome {
            thread_id: thread.id.to_hex(),
            user_message: text,
            assistant_message: assistant_text,
        })
    }
}

/// Map the stored log into the canonical outbound shape.
///
/// Every message passes through the normalizer; when an attachment is
/// present the final (current) turn is overridden with an explicit
/// text + image pair. The attachment never enters the stored log.
fn outbound_messages(
    messages: &[StoredMessage],
    current_text: &str,
    image_base64: Option<&str>,
) -> Vec<ChatMessage> {
    let last = messages.len().saturating_sub(1);

    messages
        .iter()
        .enumerate()
        .map(|(idx, message)| {
            let content = match image_base64 {
                Some(image) if idx == last => Content::Parts(vec![
                    ContentPart::text(current_text),
                    ContentPart::image_url(image),
                ]),
                _ => Content::Parts(message.content.clone().normalize()),
            };

            match message.role {
                MessageRole::User => ChatMessage::user(content),
                MessageRole::Assistant => ChatMessage::assistant(content),
            }
        })
        .collect()
}
