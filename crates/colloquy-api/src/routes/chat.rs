use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

use colloquy_engine::TurnRequest;

use crate::error::ApiResult;
use crate::response::ApiResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessageRequest {
    #[serde(default)]
    pub thread_id: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub image_base64: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessageResponse {
    pub thread_id: String,
    pub user_message: String,
    pub assistant_message: String,
}

/// Run one user turn: resolve or create the thread, call the model, persist
#[utoipa::path(
    post,
    path = "/chat/message",
    request_body = ChatMessageRequest,
    responses(
        (status = 200, description = "Turn processed", body = ChatMessageResponse),
        (status = 400, description = "Neither message nor image provided"),
        (status = 404, description = "Thread not found")
    ),
    tag = "chat"
)]
pub async fn send_message(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ChatMessageRequest>,
) -> ApiResult<Json<ApiResponse<ChatMessageResponse>>> {
    let outcome = state
        .engine
        .handle_turn(TurnRequest {
            thread_id: req.thread_id,
            message: req.message,
            image_base64: req.image_base64,
            model: req.model,
        })
        .await?;

    Ok(ApiResponse::ok(
        ChatMessageResponse {
            thread_id: outcome.thread_id,
            user_message: outcome.user_message,
            assistant_message: outcome.assistant_message,
        },
        "Message processed successfully.",
    ))
}
