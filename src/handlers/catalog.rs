use axum::{
    extract::{Path, State},
    response::Json,
    routing::get,
    Router,
};
use uuid::Uuid;

use crate::{
    errors::ServiceError,
    services::catalog::{
        CatalogService, CreateServiceRequest, ServiceResponse, UpdateServiceRequest,
    },
    tenant::TenantScope,
    ApiResponse, AppState,
};

/// Build the catalog Router scoped under `/api/v1/services`
pub fn catalog_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_services).post(create_service))
        .route("/:id", get(get_service).put(update_service).delete(delete_service))
}

#[utoipa::path(
    post,
    path = "/api/v1/services",
    request_body = CreateServiceRequest,
    responses(
        (status = 200, description = "Service created", body = ApiResponse<ServiceResponse>),
        (status = 400, description = "Invalid service data", body = crate::errors::ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Catalog"
)]
pub async fn create_service(
    State(state): State<AppState>,
    scope: TenantScope,
    Json(request): Json<CreateServiceRequest>,
) -> Result<Json<ApiResponse<ServiceResponse>>, ServiceError> {
    let service = CatalogService::new(state.db.clone());
    let created = service.create_service(&scope, request).await?;
    Ok(Json(ApiResponse::success(created)))
}

#[utoipa::path(
    get,
    path = "/api/v1/services",
    responses(
        (status = 200, description = "Catalog for the caller's salon", body = ApiResponse<Vec<ServiceResponse>>)
    ),
    security(("bearer_auth" = [])),
    tag = "Catalog"
)]
pub async fn list_services(
    State(state): State<AppState>,
    scope: TenantScope,
) -> Result<Json<ApiResponse<Vec<ServiceResponse>>>, ServiceError> {
    let service = CatalogService::new(state.db.clone());
    let services = service.list_services(&scope).await?;
    Ok(Json(ApiResponse::success(services)))
}

#[utoipa::path(
    get,
    path = "/api/v1/services/{id}",
    params(("id" = Uuid, Path, description = "Service id")),
    responses(
        (status = 200, description = "Service found", body = ApiResponse<ServiceResponse>),
        (status = 403, description = "Service belongs to another salon", body = crate::errors::ErrorResponse),
        (status = 404, description = "Service not found", body = crate::errors::ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Catalog"
)]
pub async fn get_service(
    State(state): State<AppState>,
    scope: TenantScope,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<ServiceResponse>>, ServiceError> {
    let service = CatalogService::new(state.db.clone());
    let found = service.get_service(&scope, id).await?;
    Ok(Json(ApiResponse::success(found)))
}

#[utoipa::path(
    put,
    path = "/api/v1/services/{id}",
    params(("id" = Uuid, Path, description = "Service id")),
    request_body = UpdateServiceRequest,
    responses(
        (status = 200, description = "Service updated", body = ApiResponse<ServiceResponse>),
        (status = 403, description = "Service belongs to another salon", body = crate::errors::ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Catalog"
)]
pub async fn update_service(
    State(state): State<AppState>,
    scope: TenantScope,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateServiceRequest>,
) -> Result<Json<ApiResponse<ServiceResponse>>, ServiceError> {
    let service = CatalogService::new(state.db.clone());
    let updated = service.update_service(&scope, id, request).await?;
    Ok(Json(ApiResponse::success(updated)))
}

#[utoipa::path(
    delete,
    path = "/api/v1/services/{id}",
    params(("id" = Uuid, Path, description = "Service id")),
    responses(
        (status = 200, description = "Service deleted", body = ApiResponse<String>),
        (status = 403, description = "Service belongs to another salon", body = crate::errors::ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Catalog"
)]
pub async fn delete_service(
    State(state): State<AppState>,
    scope: TenantScope,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<String>>, ServiceError> {
    let service = CatalogService::new(state.db.clone());
    service.delete_service(&scope, id).await?;
    Ok(Json(ApiResponse::success("Service deleted".to_string())))
}
