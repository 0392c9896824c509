use std::sync::Arc;

use colloquy_llm::{ChatClient, ChatMessage, ChatRequest};

use crate::error::{EngineError, Result};

const TITLE_INSTRUCTIONS: &str = "Turn the message below into a conversation title. \
Reply with one short title on a single line, at most ten words. \
Do not offer alternatives and do not explain.\n\
\n\
Example:\n\
message: give me the list of science fiction movies released this year\n\
title: Latest Sci-Fi Releases\n\
\n\
message: ";

/// Derives a short thread title from the seed message.
pub struct TitleGenerator {
    llm: Arc<dyn ChatClient>,
    model: String,
}

impl TitleGenerator {
    pub fn new(llm: Arc<dyn ChatClient>, model: impl Into<String>) -> Self {
        Self {
            llm,
            model: model.into(),
        }
    }

    /// One constrained completion call; the reply is stored verbatim.
    pub async fn generate(&self, seed: &str) -> Result<String> {
        let prompt = format!("{TITLE_INSTRUCTIONS}{seed}");
        let request = ChatRequest::new(&self.model, vec![ChatMessage::user(prompt)]);

        let response = self
            .llm
            .chat(request)
            .await
            .map_err(EngineError::Completion)?;

        Ok(response.content.unwrap_or_default())
    }
}
