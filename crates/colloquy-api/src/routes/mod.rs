pub mod chat;
pub mod health;
pub mod threads;

use axum::routing::{delete, get, patch, post};
use axum::Router;
use std::sync::Arc;

use crate::docs;
use crate::state::AppState;

/// API route table (middleware is layered on in `main`)
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        // Health & docs
        .route("/health", get(health::health_check))
        .route("/api/docs/openapi.json", get(docs::openapi_json))
        // Threads
        .route("/threads/get", get(threads::list_threads))
        .route("/threads/add", post(threads::add_thread))
        .route("/threads/:thread_id", get(threads::get_thread))
        .route("/threads/:thread_id", delete(threads::delete_thread))
        .route("/threads/:thread_id", patch(threads::update_thread))
        // Chat
        .route("/chat/message", post(chat::send_message))
        .with_state(state)
}
