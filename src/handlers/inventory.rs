use axum::{
    extract::{Path, State},
    response::Json,
    routing::{get, post},
    Router,
};
use uuid::Uuid;

use crate::{
    errors::ServiceError,
    services::inventory::{
        AdjustInventoryRequest, CreateInventoryItemRequest, InventoryItemResponse, InventoryService,
    },
    tenant::TenantScope,
    ApiResponse, AppState,
};

/// Build the inventory Router scoped under `/api/v1/inventory`
pub fn inventory_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_items).post(create_item))
        .route("/:id", axum::routing::delete(delete_item))
        .route("/:id/adjust", post(adjust_item))
}

#[utoipa::path(
    post,
    path = "/api/v1/inventory",
    request_body = CreateInventoryItemRequest,
    responses(
        (status = 200, description = "Inventory item created", body = ApiResponse<InventoryItemResponse>)
    ),
    security(("bearer_auth" = [])),
    tag = "Inventory"
)]
pub async fn create_item(
    State(state): State<AppState>,
    scope: TenantScope,
    Json(request): Json<CreateInventoryItemRequest>,
) -> Result<Json<ApiResponse<InventoryItemResponse>>, ServiceError> {
    let service = InventoryService::new(state.db.clone(), state.event_sender.clone());
    let created = service.create_item(&scope, request).await?;
    Ok(Json(ApiResponse::success(created)))
}

#[utoipa::path(
    get,
    path = "/api/v1/inventory",
    responses(
        (status = 200, description = "Stock for the caller's salon", body = ApiResponse<Vec<InventoryItemResponse>>)
    ),
    security(("bearer_auth" = [])),
    tag = "Inventory"
)]
pub async fn list_items(
    State(state): State<AppState>,
    scope: TenantScope,
) -> Result<Json<ApiResponse<Vec<InventoryItemResponse>>>, ServiceError> {
    let service = InventoryService::new(state.db.clone(), state.event_sender.clone());
    let items = service.list_items(&scope).await?;
    Ok(Json(ApiResponse::success(items)))
}

#[utoipa::path(
    post,
    path = "/api/v1/inventory/{id}/adjust",
    params(("id" = Uuid, Path, description = "Inventory item id")),
    request_body = AdjustInventoryRequest,
    responses(
        (status = 200, description = "Quantity adjusted", body = ApiResponse<InventoryItemResponse>),
        (status = 400, description = "Adjustment would take stock below zero", body = crate::errors::ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Inventory"
)]
pub async fn adjust_item(
    State(state): State<AppState>,
    scope: TenantScope,
    Path(id): Path<Uuid>,
    Json(request): Json<AdjustInventoryRequest>,
) -> Result<Json<ApiResponse<InventoryItemResponse>>, ServiceError> {
    let service = InventoryService::new(state.db.clone(), state.event_sender.clone());
    let updated = service.adjust_quantity(&scope, id, request).await?;
    Ok(Json(ApiResponse::success(updated)))
}

#[utoipa::path(
    delete,
    path = "/api/v1/inventory/{id}",
    params(("id" = Uuid, Path, description = "Inventory item id")),
    responses(
        (status = 200, description = "Inventory item deleted", body = ApiResponse<String>)
    ),
    security(("bearer_auth" = [])),
    tag = "Inventory"
)]
pub async fn delete_item(
    State(state): State<AppState>,
    scope: TenantScope,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<String>>, ServiceError> {
    let service = InventoryService::new(state.db.clone(), state.event_sender.clone());
    service.delete_item(&scope, id).await?;
    Ok(Json(ApiResponse::success("Inventory item deleted".to_string())))
}
