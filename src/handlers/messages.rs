use axum::{
    extract::{Path, Query, State},
    response::Json,
    routing::{get, put},
    Router,
};
use uuid::Uuid;

use crate::{
    errors::ServiceError,
    handlers::common::PaginationParams,
    services::messages::{MessageListResponse, MessageResponse, MessageService},
    tenant::TenantScope,
    ApiResponse, AppState,
};

/// Build the messages Router scoped under `/api/v1/messages`
pub fn message_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_messages))
        .route("/:id/read", put(mark_message_read))
}

#[utoipa::path(
    get,
    path = "/api/v1/messages",
    params(PaginationParams),
    responses(
        (status = 200, description = "Inbox for the caller's salon", body = ApiResponse<MessageListResponse>)
    ),
    security(("bearer_auth" = [])),
    tag = "Messages"
)]
pub async fn list_messages(
    State(state): State<AppState>,
    scope: TenantScope,
    Query(pagination): Query<PaginationParams>,
) -> Result<Json<ApiResponse<MessageListResponse>>, ServiceError> {
    let service = MessageService::new(state.db.clone(), state.event_sender.clone());
    let pagination = pagination.capped();
    let inbox = service
        .list_messages(&scope, pagination.page, pagination.per_page)
        .await?;
    Ok(Json(ApiResponse::success(inbox)))
}

#[utoipa::path(
    put,
    path = "/api/v1/messages/{id}/read",
    params(("id" = Uuid, Path, description = "Message id")),
    responses(
        (status = 200, description = "Message marked read", body = ApiResponse<MessageResponse>),
        (status = 403, description = "Message belongs to another salon", body = crate::errors::ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Messages"
)]
pub async fn mark_message_read(
    State(state): State<AppState>,
    scope: TenantScope,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<MessageResponse>>, ServiceError> {
    let service = MessageService::new(state.db.clone(), state.event_sender.clone());
    let message = service.mark_read(&scope, id).await?;
    Ok(Json(ApiResponse::success(message)))
}
