use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Inbound client message submitted from a salon's public page
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "messages")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    pub salon_id: Uuid,
    pub client_name: String,
    pub client_email: String,
    pub body: String,
    pub is_read: bool,
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
