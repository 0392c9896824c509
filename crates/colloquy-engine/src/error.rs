use colloquy_persist::PersistError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    /// The turn carried neither text nor an image
    #[error("Message content or an image is required.")]
    EmptyTurn,

    #[error("Thread not found: {0}")]
    ThreadNotFound(String),

    #[error("Completion service error: {0}")]
    Completion(#[source] anyhow::Error),

    #[error("Storage error: {0}")]
    Store(#[from] PersistError),
}

pub type Result<T> = std::result::Result<T, EngineError>;
