use axum::Json;
use utoipa::OpenApi;

/// OpenAPI document for the HTTP surface
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health::health_check,
        crate::routes::threads::list_threads,
        crate::routes::threads::add_thread,
        crate::routes::threads::get_thread,
        crate::routes::threads::delete_thread,
        crate::routes::threads::update_thread,
        crate::routes::chat::send_message,
    ),
    components(schemas(
        crate::routes::threads::CreateThreadRequest,
        crate::routes::threads::UpdateThreadRequest,
        crate::routes::threads::ThreadResponse,
        crate::routes::threads::MessageResponse,
        crate::routes::chat::ChatMessageRequest,
        crate::routes::chat::ChatMessageResponse,
        crate::routes::health::HealthResponse,
    )),
    tags(
        (name = "threads", description = "Thread lifecycle"),
        (name = "chat", description = "Conversation turns"),
        (name = "health", description = "Service health")
    )
)]
pub struct ApiDoc;

pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
