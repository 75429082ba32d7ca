use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Retail/consumable stock tracked per salon (shampoo, dye, ...)
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "inventory_items")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    pub salon_id: Uuid,
    pub name: String,
    pub quantity: i32,
    pub unit_cost: Option<Decimal>,
    pub low_stock_threshold: i32,
    pub updated_at: Option<DateTime<Utc>>,
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
