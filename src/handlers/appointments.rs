use axum::{
    extract::{Path, Query, State},
    response::Json,
    routing::{get, post, put},
    Router,
};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    errors::ServiceError,
    handlers::common::PaginationParams,
    services::appointments::{
        AppointmentFilter, AppointmentListResponse, AppointmentResponse, AppointmentService,
        CreateAppointmentRequest, RescheduleAppointmentRequest, UpdateAppointmentStatusRequest,
    },
    tenant::TenantScope,
    ApiResponse, AppState,
};

/// Build the appointments Router scoped under `/api/v1/appointments`
pub fn appointment_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_appointment).get(list_appointments))
        .route("/:id", get(get_appointment))
        .route("/:id/status", put(update_appointment_status))
        .route("/:id/reschedule", put(reschedule_appointment))
        .route("/:id/cancel", post(cancel_appointment))
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CancelAppointmentRequest {
    pub reason: Option<String>,
}

#[utoipa::path(
    post,
    path = "/api/v1/appointments",
    request_body = CreateAppointmentRequest,
    responses(
        (status = 200, description = "Appointment booked", body = ApiResponse<AppointmentResponse>),
        (status = 400, description = "Invalid appointment data", body = crate::errors::ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Appointments"
)]
pub async fn create_appointment(
    State(state): State<AppState>,
    scope: TenantScope,
    Json(request): Json<CreateAppointmentRequest>,
) -> Result<Json<ApiResponse<AppointmentResponse>>, ServiceError> {
    let service = AppointmentService::new(state.db.clone(), state.event_sender.clone());
    let appointment = service.create_appointment(&scope, request).await?;
    Ok(Json(ApiResponse::success(appointment)))
}

#[utoipa::path(
    get,
    path = "/api/v1/appointments/{id}",
    params(("id" = Uuid, Path, description = "Appointment id")),
    responses(
        (status = 200, description = "Appointment found", body = ApiResponse<AppointmentResponse>),
        (status = 403, description = "Appointment belongs to another salon", body = crate::errors::ErrorResponse),
        (status = 404, description = "Appointment not found", body = crate::errors::ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Appointments"
)]
pub async fn get_appointment(
    State(state): State<AppState>,
    scope: TenantScope,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<AppointmentResponse>>, ServiceError> {
    let service = AppointmentService::new(state.db.clone(), state.event_sender.clone());
    let appointment = service.get_appointment(&scope, id).await?;
    Ok(Json(ApiResponse::success(appointment)))
}

#[derive(Debug, Deserialize)]
pub struct ListAppointmentsQuery {
    pub page: Option<u64>,
    pub per_page: Option<u64>,
    pub status: Option<crate::entities::appointment::AppointmentStatus>,
    pub from: Option<chrono::NaiveDate>,
    pub to: Option<chrono::NaiveDate>,
}

#[utoipa::path(
    get,
    path = "/api/v1/appointments",
    params(PaginationParams),
    responses(
        (status = 200, description = "Appointments for the caller's salon", body = ApiResponse<AppointmentListResponse>)
    ),
    security(("bearer_auth" = [])),
    tag = "Appointments"
)]
pub async fn list_appointments(
    State(state): State<AppState>,
    scope: TenantScope,
    Query(query): Query<ListAppointmentsQuery>,
) -> Result<Json<ApiResponse<AppointmentListResponse>>, ServiceError> {
    let service = AppointmentService::new(state.db.clone(), state.event_sender.clone());
    let pagination = PaginationParams {
        page: query.page.unwrap_or(1),
        per_page: query.per_page.unwrap_or(20),
    }
    .capped();
    let filter = AppointmentFilter {
        status: query.status,
        from: query.from,
        to: query.to,
    };
    let list = service
        .list_appointments(&scope, filter, pagination.page, pagination.per_page)
        .await?;
    Ok(Json(ApiResponse::success(list)))
}

#[utoipa::path(
    put,
    path = "/api/v1/appointments/{id}/status",
    params(("id" = Uuid, Path, description = "Appointment id")),
    request_body = UpdateAppointmentStatusRequest,
    responses(
        (status = 200, description = "Status updated", body = ApiResponse<AppointmentResponse>),
        (status = 403, description = "Appointment belongs to another salon", body = crate::errors::ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Appointments"
)]
pub async fn update_appointment_status(
    State(state): State<AppState>,
    scope: TenantScope,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateAppointmentStatusRequest>,
) -> Result<Json<ApiResponse<AppointmentResponse>>, ServiceError> {
    let service = AppointmentService::new(state.db.clone(), state.event_sender.clone());
    let appointment = service.update_status(&scope, id, request).await?;
    Ok(Json(ApiResponse::success(appointment)))
}

#[utoipa::path(
    put,
    path = "/api/v1/appointments/{id}/reschedule",
    params(("id" = Uuid, Path, description = "Appointment id")),
    request_body = RescheduleAppointmentRequest,
    responses(
        (status = 200, description = "Appointment rescheduled", body = ApiResponse<AppointmentResponse>),
        (status = 400, description = "Appointment cannot be rescheduled", body = crate::errors::ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Appointments"
)]
pub async fn reschedule_appointment(
    State(state): State<AppState>,
    scope: TenantScope,
    Path(id): Path<Uuid>,
    Json(request): Json<RescheduleAppointmentRequest>,
) -> Result<Json<ApiResponse<AppointmentResponse>>, ServiceError> {
    let service = AppointmentService::new(state.db.clone(), state.event_sender.clone());
    let appointment = service.reschedule(&scope, id, request).await?;
    Ok(Json(ApiResponse::success(appointment)))
}

#[utoipa::path(
    post,
    path = "/api/v1/appointments/{id}/cancel",
    params(("id" = Uuid, Path, description = "Appointment id")),
    request_body = CancelAppointmentRequest,
    responses(
        (status = 200, description = "Appointment cancelled", body = ApiResponse<AppointmentResponse>)
    ),
    security(("bearer_auth" = [])),
    tag = "Appointments"
)]
pub async fn cancel_appointment(
    State(state): State<AppState>,
    scope: TenantScope,
    Path(id): Path<Uuid>,
    Json(request): Json<CancelAppointmentRequest>,
) -> Result<Json<ApiResponse<AppointmentResponse>>, ServiceError> {
    let service = AppointmentService::new(state.db.clone(), state.event_sender.clone());
    let appointment = service.cancel(&scope, id, request.reason).await?;
    Ok(Json(ApiResponse::success(appointment)))
}
