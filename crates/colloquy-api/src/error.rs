use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use colloquy_engine::EngineError;
use colloquy_persist::PersistError;
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("Thread not found.")]
    ThreadNotFound,

    #[error("Storage error: {0}")]
    Persist(PersistError),

    #[error("Completion service error: {0}")]
    Completion(anyhow::Error),
}

impl From<PersistError> for ApiError {
    fn from(err: PersistError) -> Self {
        match err {
            PersistError::InvalidObjectId(_) => {
                ApiError::BadRequest("Invalid thread ID format".to_string())
            }
            other => ApiError::Persist(other),
        }
    }
}

impl From<EngineError> for ApiError {
    fn from(err: EngineError) -> Self {
        match err {
            EngineError::EmptyTurn => {
                ApiError::BadRequest("Message content or an image is required.".to_string())
            }
            EngineError::ThreadNotFound(_) => ApiError::ThreadNotFound,
            EngineError::Completion(err) => ApiError::Completion(err),
            EngineError::Store(err) => err.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        // 4xx carry their message; 5xx log the cause and answer generically.
        let (status, message) = match self {
            ApiError::BadRequest(message) => (StatusCode::BAD_REQUEST, message),
            ApiError::ThreadNotFound => (StatusCode::NOT_FOUND, self.to_string()),
            ApiError::Persist(ref err) => {
                tracing::error!("Storage error: {}", err);
                (StatusCode::INTERNAL_SERVER_ERROR, "Storage error".to_string())
            }
            ApiError::Completion(ref err) => {
                tracing::error!("Completion service error: {:#}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Processing error".to_string(),
                )
            }
        };

        let body = Json(json!({
            "success": false,
            "message": message,
        }));

        (status, body).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
