use axum::{
    extract::{Path, State},
    response::Json,
    routing::{get, post},
    Router,
};
use chrono::{NaiveDate, NaiveTime};
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};
use serde::{Deserialize, Serialize};
use tracing::error;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    entities::{salon, service},
    errors::ServiceError,
    services::{
        appointments::{AppointmentResponse, AppointmentService, CreateAppointmentRequest},
        catalog::{CatalogService, ServiceResponse},
        messages::{MessageResponse, MessageService, SubmitMessageRequest},
    },
    tenant::TenantScope,
    ApiResponse, AppState,
};

/// Build the unauthenticated public Router scoped under `/public`.
/// Every operation starts from a slug-resolved salon; writes are stamped
/// with that salon's id, never with caller-supplied owner fields.
pub fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/salons/:slug", get(get_salon_page))
        .route("/salons/:slug/services", get(list_salon_services))
        .route("/salons/:slug/appointments", post(book_appointment))
        .route("/salons/:slug/messages", post(submit_message))
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SalonPageResponse {
    pub name: String,
    pub slug: String,
    pub about: Option<String>,
    pub phone: Option<String>,
    pub services: Vec<ServiceResponse>,
}

/// Client booking payload. The service is referenced by catalog id so
/// the price recorded on the appointment comes from the salon's catalog,
/// not from the client.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct PublicBookingRequest {
    #[validate(length(min = 1, max = 120, message = "Name is required"))]
    pub client_name: String,
    #[validate(email(message = "Email must be valid"))]
    pub client_email: String,
    pub service_id: Uuid,
    pub scheduled_date: NaiveDate,
    pub start_time: NaiveTime,
    pub notes: Option<String>,
}

async fn find_salon_by_slug(state: &AppState, slug: &str) -> Result<salon::Model, ServiceError> {
    let db = &*state.db;
    salon::Entity::find()
        .filter(salon::Column::Slug.eq(slug))
        .one(db)
        .await
        .map_err(|e| {
            error!(error = %e, slug, "Failed to look up salon by slug");
            ServiceError::DatabaseError(e)
        })?
        .ok_or_else(|| ServiceError::NotFound("Salon not found".to_string()))
}

#[utoipa::path(
    get,
    path = "/public/salons/{slug}",
    params(("slug" = String, Path, description = "Salon slug")),
    responses(
        (status = 200, description = "Public salon page", body = ApiResponse<SalonPageResponse>),
        (status = 404, description = "Salon not found", body = crate::errors::ErrorResponse)
    ),
    tag = "Public"
)]
pub async fn get_salon_page(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<ApiResponse<SalonPageResponse>>, ServiceError> {
    let salon = find_salon_by_slug(&state, &slug).await?;
    let scope = TenantScope::new(salon.id);
    let catalog = CatalogService::new(state.db.clone());
    let services = catalog.list_active_services(&scope).await?;
    Ok(Json(ApiResponse::success(SalonPageResponse {
        name: salon.name,
        slug: salon.slug,
        about: salon.about,
        phone: salon.phone,
        services,
    })))
}

#[utoipa::path(
    get,
    path = "/public/salons/{slug}/services",
    params(("slug" = String, Path, description = "Salon slug")),
    responses(
        (status = 200, description = "Active services of the salon", body = ApiResponse<Vec<ServiceResponse>>),
        (status = 404, description = "Salon not found", body = crate::errors::ErrorResponse)
    ),
    tag = "Public"
)]
pub async fn list_salon_services(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<ApiResponse<Vec<ServiceResponse>>>, ServiceError> {
    let salon = find_salon_by_slug(&state, &slug).await?;
    let scope = TenantScope::new(salon.id);
    let catalog = CatalogService::new(state.db.clone());
    let services = catalog.list_active_services(&scope).await?;
    Ok(Json(ApiResponse::success(services)))
}

#[utoipa::path(
    post,
    path = "/public/salons/{slug}/appointments",
    params(("slug" = String, Path, description = "Salon slug")),
    request_body = PublicBookingRequest,
    responses(
        (status = 200, description = "Appointment booked", body = ApiResponse<AppointmentResponse>),
        (status = 400, description = "Invalid booking", body = crate::errors::ErrorResponse),
        (status = 404, description = "Salon or service not found", body = crate::errors::ErrorResponse)
    ),
    tag = "Public"
)]
pub async fn book_appointment(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Json(request): Json<PublicBookingRequest>,
) -> Result<Json<ApiResponse<AppointmentResponse>>, ServiceError> {
    request.validate()?;

    let salon = find_salon_by_slug(&state, &slug).await?;
    let db = &*state.db;

    // The booking is stamped with the slug-resolved salon id
    let scope = TenantScope::new(salon.id);

    let offer = scope
        .scoped(service::Entity::find_by_id(request.service_id))
        .filter(service::Column::Active.eq(true))
        .one(db)
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to look up service for booking");
            ServiceError::DatabaseError(e)
        })?
        .ok_or_else(|| ServiceError::NotFound("Service not found".to_string()))?;
    let appointments = AppointmentService::new(state.db.clone(), state.event_sender.clone());
    let appointment = appointments
        .create_appointment(
            &scope,
            CreateAppointmentRequest {
                client_name: request.client_name,
                client_email: request.client_email,
                service_name: offer.name,
                staff_id: None,
                scheduled_date: request.scheduled_date,
                start_time: request.start_time,
                total_price: offer.price,
                notes: request.notes,
            },
        )
        .await?;

    Ok(Json(ApiResponse::success(appointment)))
}

#[utoipa::path(
    post,
    path = "/public/salons/{slug}/messages",
    params(("slug" = String, Path, description = "Salon slug")),
    request_body = SubmitMessageRequest,
    responses(
        (status = 200, description = "Message delivered", body = ApiResponse<MessageResponse>),
        (status = 404, description = "Salon not found", body = crate::errors::ErrorResponse)
    ),
    tag = "Public"
)]
pub async fn submit_message(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Json(request): Json<SubmitMessageRequest>,
) -> Result<Json<ApiResponse<MessageResponse>>, ServiceError> {
    let salon = find_salon_by_slug(&state, &slug).await?;
    let messages = MessageService::new(state.db.clone(), state.event_sender.clone());
    let message = messages.submit_message(salon.id, request).await?;
    Ok(Json(ApiResponse::success(message)))
}
