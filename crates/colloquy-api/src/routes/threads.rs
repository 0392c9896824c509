use axum::extract::{Path, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

use colloquy_llm::Content;
use colloquy_persist::{MessageRole, StoredMessage, Thread, DEFAULT_TITLE};

use crate::error::{ApiError, ApiResult};
use crate::response::ApiResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateThreadRequest {
    #[serde(default)]
    pub title: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateThreadRequest {
    #[serde(default)]
    pub title: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ThreadResponse {
    pub id: String,
    pub title: String,
    pub messages: Vec<MessageResponse>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    pub id: String,
    #[schema(value_type = String)]
    pub role: MessageRole,
    #[schema(value_type = Object)]
    pub content: Content,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// List every thread, newest activity first
#[utoipa::path(
    get,
    path = "/threads/get",
    responses(
        (status = 200, description = "Ordered list of threads", body = [ThreadResponse])
    ),
    tag = "threads"
)]
pub async fn list_threads(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<ApiResponse<Vec<ThreadResponse>>>> {
    let threads = state.store.list_threads().await?;
    let data: Vec<ThreadResponse> = threads.into_iter().map(thread_to_response).collect();

    Ok(ApiResponse::ok(data, "Threads fetched successfully"))
}

/// Create an empty thread
#[utoipa::path(
    post,
    path = "/threads/add",
    request_body = CreateThreadRequest,
    responses(
        (status = 200, description = "Thread created", body = ThreadResponse)
    ),
    tag = "threads"
)]
pub async fn add_thread(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateThreadRequest>,
) -> ApiResult<Json<ApiResponse<ThreadResponse>>> {
    let title = req.title.unwrap_or_else(|| DEFAULT_TITLE.to_string());
    let thread = state.store.create_thread(&title).await?;

    Ok(ApiResponse::ok(
        thread_to_response(thread),
        "Thread created successfully",
    ))
}

/// Get a specific thread by ID
#[utoipa::path(
    get,
    path = "/threads/{thread_id}",
    params(
        ("thread_id" = String, Path, description = "Thread ID")
    ),
    responses(
        (status = 200, description = "Thread details", body = ThreadResponse),
        (status = 404, description = "Thread not found")
    ),
    tag = "threads"
)]
pub async fn get_thread(
    State(state): State<Arc<AppState>>,
    Path(thread_id): Path<String>,
) -> ApiResult<Json<ApiResponse<ThreadResponse>>> {
    let thread = state
        .store
        .get_thread(&thread_id)
        .await?
        .ok_or(ApiError::ThreadNotFound)?;

    Ok(ApiResponse::ok(
        thread_to_response(thread),
        "Thread fetched successfully",
    ))
}

/// Delete a thread
#[utoipa::path(
    delete,
    path = "/threads/{thread_id}",
    params(
        ("thread_id" = String, Path, description = "Thread ID")
    ),
    responses(
        (status = 200, description = "Deleted thread", body = ThreadResponse),
        (status = 404, description = "Thread not found")
    ),
    tag = "threads"
)]
pub async fn delete_thread(
    State(state): State<Arc<AppState>>,
    Path(thread_id): Path<String>,
) -> ApiResult<Json<ApiResponse<ThreadResponse>>> {
    let thread = state
        .store
        .delete_thread(&thread_id)
        .await?
        .ok_or(ApiError::ThreadNotFound)?;

    Ok(ApiResponse::ok(
        thread_to_response(thread),
        "Thread deleted successfully",
    ))
}

/// Rename a thread
#[utoipa::path(
    patch,
    path = "/threads/{thread_id}",
    params(
        ("thread_id" = String, Path, description = "Thread ID")
    ),
    request_body = UpdateThreadRequest,
    responses(
        (status = 200, description = "Updated thread", body = ThreadResponse),
        (status = 400, description = "Missing title"),
        (status = 404, description = "Thread not found")
    ),
    tag = "threads"
)]
pub async fn update_thread(
    State(state): State<Arc<AppState>>,
    Path(thread_id): Path<String>,
    Json(req): Json<UpdateThreadRequest>,
) -> ApiResult<Json<ApiResponse<ThreadResponse>>> {
    let Some(title) = req.title.filter(|title| !title.is_empty()) else {
        return Err(ApiError::BadRequest(
            "Title is required for update.".to_string(),
        ));
    };

    let thread = state
        .store
        .update_title(&thread_id, &title)
        .await?
        .ok_or(ApiError::ThreadNotFound)?;

    Ok(ApiResponse::ok(
        thread_to_response(thread),
        "Thread updated successfully.",
    ))
}

pub(crate) fn thread_to_response(thread: Thread) -> ThreadResponse {
    ThreadResponse {
        id: thread.id.to_hex(),
        title: thread.title,
        messages: thread.messages.into_iter().map(message_to_response).collect(),
        created_at: thread.created_at,
        updated_at: thread.updated_at,
    }
}

fn message_to_response(message: StoredMessage) -> MessageResponse {
    MessageResponse {
        id: message.id.to_hex(),
        role: message.role,
        content: message.content,
        timestamp: message.timestamp,
    }
}
