use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A payment option a salon accepts at checkout (cash, card, transfer, ...)
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "payment_methods")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    pub salon_id: Uuid,
    pub label: String,
    pub kind: String,
    pub enabled: bool,
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
