use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// A bookable catalog entry (haircut, coloring, manicure, ...)
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize, Validate)]
#[sea_orm(table_name = "services")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    pub salon_id: Uuid,

    #[validate(length(min = 1, max = 120, message = "Service name is required"))]
    pub name: String,

    pub description: Option<String>,
    pub duration_minutes: i32,
    pub price: Decimal,
    pub active: bool,
    pub created_at: DateTime<Utc>,
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
