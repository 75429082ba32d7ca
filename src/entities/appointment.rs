use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use uuid::Uuid;
use validator::Validate;

/// A booked appointment. Client identity is denormalized (name/email)
/// rather than a foreign key to a client table; analytics group on it.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize, Validate)]
#[sea_orm(table_name = "appointments")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    /// Owning salon; stamped by the tenant scope, never caller-supplied
    pub salon_id: Uuid,

    #[validate(length(min = 1, max = 120, message = "Client name is required"))]
    pub client_name: String,

    #[validate(email(message = "Client email must be valid"))]
    pub client_email: String,

    #[validate(length(min = 1, max = 120, message = "Service name is required"))]
    pub service_name: String,

    pub staff_id: Option<Uuid>,
    pub scheduled_date: NaiveDate,
    pub start_time: NaiveTime,
    pub status: String,
    pub total_price: Decimal,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Closed status set; unknown strings are rejected at the API boundary.
#[derive(
    Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, utoipa::ToSchema,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum AppointmentStatus {
    Pending,
    Confirmed,
    Completed,
    Cancelled,
}

impl AppointmentStatus {
    pub const COMPLETED: &'static str = "completed";
    pub const CANCELLED: &'static str = "cancelled";
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::salon::Entity",
        from = "Column::SalonId",
        to = "super::salon::Column::Id"
    )]
    Salon,
}

impl Related<super::salon::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Salon.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
