pub mod content;
pub mod message;

pub use content::{Content, ContentPart, ImageUrl};
pub use message::ChatMessage;
