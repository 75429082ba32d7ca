use axum::{
    extract::{Path, State},
    response::Json,
    routing::get,
    Router,
};
use uuid::Uuid;

use crate::{
    errors::ServiceError,
    services::staff::{CreateStaffRequest, StaffResponse, StaffService, UpdateStaffRequest},
    tenant::TenantScope,
    ApiResponse, AppState,
};

/// Build the staff Router scoped under `/api/v1/staff`
pub fn staff_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_staff).post(create_staff))
        .route("/:id", axum::routing::put(update_staff).delete(delete_staff))
}

#[utoipa::path(
    post,
    path = "/api/v1/staff",
    request_body = CreateStaffRequest,
    responses(
        (status = 200, description = "Staff member created", body = ApiResponse<StaffResponse>)
    ),
    security(("bearer_auth" = [])),
    tag = "Staff"
)]
pub async fn create_staff(
    State(state): State<AppState>,
    scope: TenantScope,
    Json(request): Json<CreateStaffRequest>,
) -> Result<Json<ApiResponse<StaffResponse>>, ServiceError> {
    let service = StaffService::new(state.db.clone());
    let created = service.create_staff(&scope, request).await?;
    Ok(Json(ApiResponse::success(created)))
}

#[utoipa::path(
    get,
    path = "/api/v1/staff",
    responses(
        (status = 200, description = "Roster for the caller's salon", body = ApiResponse<Vec<StaffResponse>>)
    ),
    security(("bearer_auth" = [])),
    tag = "Staff"
)]
pub async fn list_staff(
    State(state): State<AppState>,
    scope: TenantScope,
) -> Result<Json<ApiResponse<Vec<StaffResponse>>>, ServiceError> {
    let service = StaffService::new(state.db.clone());
    let roster = service.list_staff(&scope).await?;
    Ok(Json(ApiResponse::success(roster)))
}

#[utoipa::path(
    put,
    path = "/api/v1/staff/{id}",
    params(("id" = Uuid, Path, description = "Staff id")),
    request_body = UpdateStaffRequest,
    responses(
        (status = 200, description = "Staff member updated", body = ApiResponse<StaffResponse>),
        (status = 403, description = "Staff member belongs to another salon", body = crate::errors::ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Staff"
)]
pub async fn update_staff(
    State(state): State<AppState>,
    scope: TenantScope,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateStaffRequest>,
) -> Result<Json<ApiResponse<StaffResponse>>, ServiceError> {
    let service = StaffService::new(state.db.clone());
    let updated = service.update_staff(&scope, id, request).await?;
    Ok(Json(ApiResponse::success(updated)))
}

#[utoipa::path(
    delete,
    path = "/api/v1/staff/{id}",
    params(("id" = Uuid, Path, description = "Staff id")),
    responses(
        (status = 200, description = "Staff member deleted", body = ApiResponse<String>),
        (status = 403, description = "Staff member belongs to another salon", body = crate::errors::ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Staff"
)]
pub async fn delete_staff(
    State(state): State<AppState>,
    scope: TenantScope,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<String>>, ServiceError> {
    let service = StaffService::new(state.db.clone());
    service.delete_staff(&scope, id).await?;
    Ok(Json(ApiResponse::success("Staff member deleted".to_string())))
}
