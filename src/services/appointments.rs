use crate::{
    db::DbPool,
    entities::appointment::{
        self, ActiveModel as AppointmentActiveModel, AppointmentStatus, Entity as AppointmentEntity,
        Model as AppointmentModel,
    },
    errors::ServiceError,
    events::{Event, EventSender},
    tenant::TenantScope,
};
use chrono::{NaiveDate, NaiveTime, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info, instrument, warn};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// Request/Response types for the appointment service
#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateAppointmentRequest {
    #[validate(length(min = 1, max = 120, message = "Client name is required"))]
    pub client_name: String,
    #[validate(email(message = "Client email must be valid"))]
    pub client_email: String,
    #[validate(length(min = 1, max = 120, message = "Service name is required"))]
    pub service_name: String,
    pub staff_id: Option<Uuid>,
    pub scheduled_date: NaiveDate,
    pub start_time: NaiveTime,
    pub total_price: Decimal,
    pub notes: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateAppointmentStatusRequest {
    pub status: AppointmentStatus,
    pub notes: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct RescheduleAppointmentRequest {
    pub scheduled_date: NaiveDate,
    pub start_time: NaiveTime,
}

#[derive(Debug, Deserialize, Default, ToSchema)]
pub struct AppointmentFilter {
    pub status: Option<AppointmentStatus>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AppointmentResponse {
    pub id: Uuid,
    pub client_name: String,
    pub client_email: String,
    pub service_name: String,
    pub staff_id: Option<Uuid>,
    pub scheduled_date: NaiveDate,
    pub start_time: NaiveTime,
    pub status: String,
    pub total_price: Decimal,
    pub notes: Option<String>,
    pub created_at: chrono::DateTime<Utc>,
    pub updated_at: Option<chrono::DateTime<Utc>>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AppointmentListResponse {
    pub appointments: Vec<AppointmentResponse>,
    pub total: u64,
    pub page: u64,
    pub per_page: u64,
}

/// Service for managing appointments. Every operation runs inside a
/// tenant scope: listings are filtered to the scope's salon and by-id
/// access is ownership-checked before anything is returned or mutated.
#[derive(Clone)]
pub struct AppointmentService {
    db_pool: Arc<DbPool>,
    event_sender: Option<Arc<EventSender>>,
}

impl AppointmentService {
    pub fn new(db_pool: Arc<DbPool>, event_sender: Option<Arc<EventSender>>) -> Self {
        Self {
            db_pool,
            event_sender,
        }
    }

    /// Books a new appointment for the scoped salon
    #[instrument(skip(self, request), fields(salon_id = %scope.salon_id(), client = %request.client_name))]
    pub async fn create_appointment(
        &self,
        scope: &TenantScope,
        request: CreateAppointmentRequest,
    ) -> Result<AppointmentResponse, ServiceError> {
        request.validate()?;

        let db = &*self.db_pool;
        let now = Utc::now();
        let appointment_id = Uuid::new_v4();

        let active_model = AppointmentActiveModel {
            id: Set(appointment_id),
            salon_id: Set(scope.salon_id()),
            client_name: Set(request.client_name.clone()),
            client_email: Set(request.client_email),
            service_name: Set(request.service_name),
            staff_id: Set(request.staff_id),
            scheduled_date: Set(request.scheduled_date),
            start_time: Set(request.start_time),
            status: Set(AppointmentStatus::Pending.to_string()),
            total_price: Set(request.total_price),
            notes: Set(request.notes),
            created_at: Set(now),
            updated_at: Set(Some(now)),
        };

        let model = active_model.insert(db).await.map_err(|e| {
            error!(error = %e, appointment_id = %appointment_id, "Failed to create appointment");
            ServiceError::DatabaseError(e)
        })?;

        info!(appointment_id = %appointment_id, "Appointment created");

        if let Some(event_sender) = &self.event_sender {
            if let Err(e) = event_sender
                .send(Event::AppointmentBooked {
                    salon_id: scope.salon_id(),
                    appointment_id,
                })
                .await
            {
                warn!(error = %e, appointment_id = %appointment_id, "Failed to send booked event");
            }
        }

        Ok(model_to_response(model))
    }

    /// Retrieves an appointment by ID, rejecting cross-salon access
    #[instrument(skip(self), fields(salon_id = %scope.salon_id(), appointment_id = %appointment_id))]
    pub async fn get_appointment(
        &self,
        scope: &TenantScope,
        appointment_id: Uuid,
    ) -> Result<AppointmentResponse, ServiceError> {
        let model = self.find_owned(scope, appointment_id).await?;
        Ok(model_to_response(model))
    }

    /// Lists appointments of the scoped salon with pagination and filters
    #[instrument(skip(self, filter), fields(salon_id = %scope.salon_id()))]
    pub async fn list_appointments(
        &self,
        scope: &TenantScope,
        filter: AppointmentFilter,
        page: u64,
        per_page: u64,
    ) -> Result<AppointmentListResponse, ServiceError> {
        let db = &*self.db_pool;

        let mut query = scope.select::<AppointmentEntity>();
        if let Some(status) = filter.status {
            query = query.filter(appointment::Column::Status.eq(status.to_string()));
        }
        if let Some(from) = filter.from {
            query = query.filter(appointment::Column::ScheduledDate.gte(from));
        }
        if let Some(to) = filter.to {
            query = query.filter(appointment::Column::ScheduledDate.lte(to));
        }

        let paginator = query
            .order_by_desc(appointment::Column::ScheduledDate)
            .order_by_desc(appointment::Column::StartTime)
            .paginate(db, per_page);

        let total = paginator.num_items().await.map_err(|e| {
            error!(error = %e, "Failed to count appointments");
            ServiceError::DatabaseError(e)
        })?;

        let rows = paginator.fetch_page(page.saturating_sub(1)).await.map_err(|e| {
            error!(error = %e, page, per_page, "Failed to fetch appointments page");
            ServiceError::DatabaseError(e)
        })?;

        Ok(AppointmentListResponse {
            appointments: rows.into_iter().map(model_to_response).collect(),
            total,
            page,
            per_page,
        })
    }

    /// Updates an appointment's status
    #[instrument(skip(self, request), fields(salon_id = %scope.salon_id(), appointment_id = %appointment_id, new_status = %request.status))]
    pub async fn update_status(
        &self,
        scope: &TenantScope,
        appointment_id: Uuid,
        request: UpdateAppointmentStatusRequest,
    ) -> Result<AppointmentResponse, ServiceError> {
        let db = &*self.db_pool;
        let model = self.find_owned(scope, appointment_id).await?;
        let old_status = model.status.clone();
        let new_status = request.status.to_string();

        let mut active_model: AppointmentActiveModel = model.into();
        active_model.status = Set(new_status.clone());
        active_model.updated_at = Set(Some(Utc::now()));
        if let Some(notes) = request.notes {
            active_model.notes = Set(Some(notes));
        }

        let updated = active_model.update(db).await.map_err(|e| {
            error!(error = %e, appointment_id = %appointment_id, "Failed to update appointment status");
            ServiceError::DatabaseError(e)
        })?;

        info!(appointment_id = %appointment_id, %old_status, %new_status, "Appointment status updated");

        if let Some(event_sender) = &self.event_sender {
            if let Err(e) = event_sender
                .send(Event::AppointmentStatusChanged {
                    salon_id: scope.salon_id(),
                    appointment_id,
                    old_status,
                    new_status,
                })
                .await
            {
                warn!(error = %e, appointment_id = %appointment_id, "Failed to send status changed event");
            }
        }

        Ok(model_to_response(updated))
    }

    /// Moves an appointment to a new date and time
    #[instrument(skip(self, request), fields(salon_id = %scope.salon_id(), appointment_id = %appointment_id))]
    pub async fn reschedule(
        &self,
        scope: &TenantScope,
        appointment_id: Uuid,
        request: RescheduleAppointmentRequest,
    ) -> Result<AppointmentResponse, ServiceError> {
        let db = &*self.db_pool;
        let model = self.find_owned(scope, appointment_id).await?;

        if model.status == AppointmentStatus::CANCELLED {
            return Err(ServiceError::BadRequest(
                "Cancelled appointments cannot be rescheduled".to_string(),
            ));
        }

        let mut active_model: AppointmentActiveModel = model.into();
        active_model.scheduled_date = Set(request.scheduled_date);
        active_model.start_time = Set(request.start_time);
        active_model.updated_at = Set(Some(Utc::now()));

        let updated = active_model.update(db).await.map_err(|e| {
            error!(error = %e, appointment_id = %appointment_id, "Failed to reschedule appointment");
            ServiceError::DatabaseError(e)
        })?;

        info!(appointment_id = %appointment_id, date = %request.scheduled_date, "Appointment rescheduled");

        if let Some(event_sender) = &self.event_sender {
            if let Err(e) = event_sender
                .send(Event::AppointmentRescheduled {
                    salon_id: scope.salon_id(),
                    appointment_id,
                    scheduled_date: request.scheduled_date,
                })
                .await
            {
                warn!(error = %e, appointment_id = %appointment_id, "Failed to send rescheduled event");
            }
        }

        Ok(model_to_response(updated))
    }

    /// Cancels an appointment
    #[instrument(skip(self), fields(salon_id = %scope.salon_id(), appointment_id = %appointment_id))]
    pub async fn cancel(
        &self,
        scope: &TenantScope,
        appointment_id: Uuid,
        reason: Option<String>,
    ) -> Result<AppointmentResponse, ServiceError> {
        let response = self
            .update_status(
                scope,
                appointment_id,
                UpdateAppointmentStatusRequest {
                    status: AppointmentStatus::Cancelled,
                    notes: reason,
                },
            )
            .await?;

        if let Some(event_sender) = &self.event_sender {
            if let Err(e) = event_sender
                .send(Event::AppointmentCancelled {
                    salon_id: scope.salon_id(),
                    appointment_id,
                })
                .await
            {
                warn!(error = %e, appointment_id = %appointment_id, "Failed to send cancelled event");
            }
        }

        Ok(response)
    }

    /// Fetches by primary key and verifies salon ownership. A hit owned
    /// by a different salon is Forbidden, not NotFound.
    async fn find_owned(
        &self,
        scope: &TenantScope,
        appointment_id: Uuid,
    ) -> Result<AppointmentModel, ServiceError> {
        let db = &*self.db_pool;
        let model = AppointmentEntity::find_by_id(appointment_id)
            .one(db)
            .await
            .map_err(|e| {
                error!(error = %e, appointment_id = %appointment_id, "Failed to fetch appointment");
                ServiceError::DatabaseError(e)
            })?
            .ok_or_else(|| {
                warn!(appointment_id = %appointment_id, "Appointment not found");
                ServiceError::NotFound("Appointment not found".to_string())
            })?;
        scope.assert_owns::<AppointmentEntity>(&model)?;
        Ok(model)
    }
}

/// Converts an appointment model to response format
pub fn model_to_response(model: AppointmentModel) -> AppointmentResponse {
    AppointmentResponse {
        id: model.id,
        client_name: model.client_name,
        client_email: model.client_email,
        service_name: model.service_name,
        staff_id: model.staff_id,
        scheduled_date: model.scheduled_date,
        start_time: model.start_time,
        status: model.status,
        total_price: model.total_price,
        notes: model.notes,
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn sample_model(salon_id: Uuid) -> AppointmentModel {
        AppointmentModel {
            id: Uuid::new_v4(),
            salon_id,
            client_name: "Ana".into(),
            client_email: "ana@example.com".into(),
            service_name: "Haircut".into(),
            staff_id: None,
            scheduled_date: NaiveDate::from_ymd_opt(2025, 6, 2).unwrap(),
            start_time: NaiveTime::from_hms_opt(10, 30, 0).unwrap(),
            status: "pending".into(),
            total_price: dec!(45.00),
            notes: None,
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    #[test]
    fn model_to_response_preserves_fields() {
        let salon_id = Uuid::new_v4();
        let model = sample_model(salon_id);
        let id = model.id;
        let response = model_to_response(model);
        assert_eq!(response.id, id);
        assert_eq!(response.client_name, "Ana");
        assert_eq!(response.total_price, dec!(45.00));
        assert_eq!(response.status, "pending");
    }

    #[test]
    fn create_request_rejects_bad_email() {
        let request = CreateAppointmentRequest {
            client_name: "Ana".into(),
            client_email: "not-an-email".into(),
            service_name: "Haircut".into(),
            staff_id: None,
            scheduled_date: NaiveDate::from_ymd_opt(2025, 6, 2).unwrap(),
            start_time: NaiveTime::from_hms_opt(10, 30, 0).unwrap(),
            total_price: dec!(45.00),
            notes: None,
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn status_enum_round_trips_through_strings() {
        assert_eq!(AppointmentStatus::Completed.to_string(), "completed");
        assert_eq!(
            "cancelled".parse::<AppointmentStatus>().unwrap(),
            AppointmentStatus::Cancelled
        );
        assert!("archived".parse::<AppointmentStatus>().is_err());
    }
}
