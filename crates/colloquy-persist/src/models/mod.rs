pub mod message;
pub mod thread;

pub use message::{MessageRole, StoredMessage};
pub use thread::{Thread, DEFAULT_TITLE};
