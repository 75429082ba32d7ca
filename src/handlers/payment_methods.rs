use axum::{
    extract::{Path, State},
    response::Json,
    routing::{get, put},
    Router,
};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    errors::ServiceError,
    services::payment_methods::{
        CreatePaymentMethodRequest, PaymentMethodResponse, PaymentMethodService,
    },
    tenant::TenantScope,
    ApiResponse, AppState,
};

/// Build the payment methods Router scoped under `/api/v1/payment-methods`
pub fn payment_method_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_methods).post(create_method))
        .route("/:id", axum::routing::delete(delete_method))
        .route("/:id/enabled", put(set_method_enabled))
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct SetEnabledRequest {
    pub enabled: bool,
}

#[utoipa::path(
    post,
    path = "/api/v1/payment-methods",
    request_body = CreatePaymentMethodRequest,
    responses(
        (status = 200, description = "Payment method created", body = ApiResponse<PaymentMethodResponse>)
    ),
    security(("bearer_auth" = [])),
    tag = "PaymentMethods"
)]
pub async fn create_method(
    State(state): State<AppState>,
    scope: TenantScope,
    Json(request): Json<CreatePaymentMethodRequest>,
) -> Result<Json<ApiResponse<PaymentMethodResponse>>, ServiceError> {
    let service = PaymentMethodService::new(state.db.clone());
    let created = service.create_method(&scope, request).await?;
    Ok(Json(ApiResponse::success(created)))
}

#[utoipa::path(
    get,
    path = "/api/v1/payment-methods",
    responses(
        (status = 200, description = "Payment methods for the caller's salon", body = ApiResponse<Vec<PaymentMethodResponse>>)
    ),
    security(("bearer_auth" = [])),
    tag = "PaymentMethods"
)]
pub async fn list_methods(
    State(state): State<AppState>,
    scope: TenantScope,
) -> Result<Json<ApiResponse<Vec<PaymentMethodResponse>>>, ServiceError> {
    let service = PaymentMethodService::new(state.db.clone());
    let methods = service.list_methods(&scope).await?;
    Ok(Json(ApiResponse::success(methods)))
}

#[utoipa::path(
    put,
    path = "/api/v1/payment-methods/{id}/enabled",
    params(("id" = Uuid, Path, description = "Payment method id")),
    request_body = SetEnabledRequest,
    responses(
        (status = 200, description = "Payment method toggled", body = ApiResponse<PaymentMethodResponse>),
        (status = 403, description = "Payment method belongs to another salon", body = crate::errors::ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "PaymentMethods"
)]
pub async fn set_method_enabled(
    State(state): State<AppState>,
    scope: TenantScope,
    Path(id): Path<Uuid>,
    Json(request): Json<SetEnabledRequest>,
) -> Result<Json<ApiResponse<PaymentMethodResponse>>, ServiceError> {
    let service = PaymentMethodService::new(state.db.clone());
    let updated = service.set_enabled(&scope, id, request.enabled).await?;
    Ok(Json(ApiResponse::success(updated)))
}

#[utoipa::path(
    delete,
    path = "/api/v1/payment-methods/{id}",
    params(("id" = Uuid, Path, description = "Payment method id")),
    responses(
        (status = 200, description = "Payment method deleted", body = ApiResponse<String>)
    ),
    security(("bearer_auth" = [])),
    tag = "PaymentMethods"
)]
pub async fn delete_method(
    State(state): State<AppState>,
    scope: TenantScope,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<String>>, ServiceError> {
    let service = PaymentMethodService::new(state.db.clone());
    service.delete_method(&scope, id).await?;
    Ok(Json(ApiResponse::success("Payment method deleted".to_string())))
}
