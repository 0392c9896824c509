pub mod groq;
pub mod traits;
pub mod types;

pub use traits::{
    ChatClient,
    ChatOptions, ChatRequest, ChatResponse,
    TokenUsage,
};

pub use groq::GroqClient;
pub use types::{ChatMessage, Content, ContentPart, ImageUrl};
