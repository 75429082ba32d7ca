use crate::{
    db::DbPool,
    entities::inventory_item::{
        self, ActiveModel as ItemActiveModel, Entity as ItemEntity, Model as ItemModel,
    },
    errors::ServiceError,
    events::{Event, EventSender},
    tenant::TenantScope,
};
use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, EntityTrait, QueryOrder, Set};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info, instrument, warn};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateInventoryItemRequest {
    #[validate(length(min = 1, max = 120, message = "Item name is required"))]
    pub name: String,
    #[validate(range(min = 0, message = "Quantity cannot be negative"))]
    pub quantity: i32,
    pub unit_cost: Option<Decimal>,
    #[validate(range(min = 0, message = "Threshold cannot be negative"))]
    pub low_stock_threshold: i32,
}

/// Relative stock adjustment; negative delta consumes stock
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AdjustInventoryRequest {
    pub delta: i32,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct InventoryItemResponse {
    pub id: Uuid,
    pub name: String,
    pub quantity: i32,
    pub unit_cost: Option<Decimal>,
    pub low_stock_threshold: i32,
    pub low_stock: bool,
}

/// Per-salon stock tracking
#[derive(Clone)]
pub struct InventoryService {
    db_pool: Arc<DbPool>,
    event_sender: Option<Arc<EventSender>>,
}

impl InventoryService {
    pub fn new(db_pool: Arc<DbPool>, event_sender: Option<Arc<EventSender>>) -> Self {
        Self {
            db_pool,
            event_sender,
        }
    }

    #[instrument(skip(self, request), fields(salon_id = %scope.salon_id(), name = %request.name))]
    pub async fn create_item(
        &self,
        scope: &TenantScope,
        request: CreateInventoryItemRequest,
    ) -> Result<InventoryItemResponse, ServiceError> {
        request.validate()?;

        let db = &*self.db_pool;
        let item_id = Uuid::new_v4();

        let model = ItemActiveModel {
            id: Set(item_id),
            salon_id: Set(scope.salon_id()),
            name: Set(request.name),
            quantity: Set(request.quantity),
            unit_cost: Set(request.unit_cost),
            low_stock_threshold: Set(request.low_stock_threshold),
            updated_at: Set(Some(Utc::now())),
        }
        .insert(db)
        .await
        .map_err(|e| {
            error!(error = %e, item_id = %item_id, "Failed to create inventory item");
            ServiceError::DatabaseError(e)
        })?;

        info!(item_id = %item_id, "Inventory item created");
        Ok(model_to_response(model))
    }

    #[instrument(skip(self), fields(salon_id = %scope.salon_id()))]
    pub async fn list_items(
        &self,
        scope: &TenantScope,
    ) -> Result<Vec<InventoryItemResponse>, ServiceError> {
        let db = &*self.db_pool;
        let rows = scope
            .select::<ItemEntity>()
            .order_by_asc(inventory_item::Column::Name)
            .all(db)
            .await
            .map_err(|e| {
                error!(error = %e, "Failed to list inventory");
                ServiceError::DatabaseError(e)
            })?;
        Ok(rows.into_iter().map(model_to_response).collect())
    }

    /// Applies a relative quantity adjustment. Stock never goes below
    /// zero; an over-consuming delta is rejected.
    #[instrument(skip(self, request), fields(salon_id = %scope.salon_id(), item_id = %item_id, delta = request.delta))]
    pub async fn adjust_quantity(
        &self,
        scope: &TenantScope,
        item_id: Uuid,
        request: AdjustInventoryRequest,
    ) -> Result<InventoryItemResponse, ServiceError> {
        let db = &*self.db_pool;
        let model = self.find_owned(scope, item_id).await?;

        let new_quantity = apply_delta(model.quantity, request.delta)?;

        let mut active_model: ItemActiveModel = model.into();
        active_model.quantity = Set(new_quantity);
        active_model.updated_at = Set(Some(Utc::now()));

        let updated = active_model.update(db).await.map_err(|e| {
            error!(error = %e, item_id = %item_id, "Failed to adjust inventory");
            ServiceError::DatabaseError(e)
        })?;

        info!(item_id = %item_id, quantity = new_quantity, "Inventory adjusted");

        if let Some(event_sender) = &self.event_sender {
            if let Err(e) = event_sender
                .send(Event::InventoryAdjusted {
                    salon_id: scope.salon_id(),
                    item_id,
                    quantity: new_quantity,
                })
                .await
            {
                warn!(error = %e, item_id = %item_id, "Failed to send inventory event");
            }
        }

        Ok(model_to_response(updated))
    }

    #[instrument(skip(self), fields(salon_id = %scope.salon_id(), item_id = %item_id))]
    pub async fn delete_item(
        &self,
        scope: &TenantScope,
        item_id: Uuid,
    ) -> Result<(), ServiceError> {
        let db = &*self.db_pool;
        let model = self.find_owned(scope, item_id).await?;
        ItemEntity::delete_by_id(model.id)
            .exec(db)
            .await
            .map_err(|e| {
                error!(error = %e, item_id = %item_id, "Failed to delete inventory item");
                ServiceError::DatabaseError(e)
            })?;
        info!(item_id = %item_id, "Inventory item deleted");
        Ok(())
    }

    async fn find_owned(
        &self,
        scope: &TenantScope,
        item_id: Uuid,
    ) -> Result<ItemModel, ServiceError> {
        let db = &*self.db_pool;
        let model = ItemEntity::find_by_id(item_id)
            .one(db)
            .await
            .map_err(|e| {
                error!(error = %e, item_id = %item_id, "Failed to fetch inventory item");
                ServiceError::DatabaseError(e)
            })?
            .ok_or_else(|| {
                warn!(item_id = %item_id, "Inventory item not found");
                ServiceError::NotFound("Inventory item not found".to_string())
            })?;
        scope.assert_owns::<ItemEntity>(&model)?;
        Ok(model)
    }
}

/// Applies a relative adjustment to a stock count. Overflowing and
/// over-consuming deltas are both rejected.
fn apply_delta(quantity: i32, delta: i32) -> Result<i32, ServiceError> {
    let new_quantity = delta.checked_add(quantity).ok_or_else(|| {
        ServiceError::BadRequest(format!("Adjustment of {delta} overflows the stock counter"))
    })?;
    if new_quantity < 0 {
        return Err(ServiceError::BadRequest(format!(
            "Cannot consume {} units, only {quantity} in stock",
            delta.unsigned_abs()
        )));
    }
    Ok(new_quantity)
}

fn model_to_response(model: ItemModel) -> InventoryItemResponse {
    let low_stock = model.quantity <= model.low_stock_threshold;
    InventoryItemResponse {
        id: model.id,
        name: model.name,
        quantity: model.quantity,
        unit_cost: model.unit_cost,
        low_stock_threshold: model.low_stock_threshold,
        low_stock,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn low_stock_flag_uses_threshold() {
        let model = ItemModel {
            id: Uuid::new_v4(),
            salon_id: Uuid::new_v4(),
            name: "Shampoo".into(),
            quantity: 3,
            unit_cost: None,
            low_stock_threshold: 5,
            updated_at: None,
        };
        assert!(model_to_response(model).low_stock);
    }

    #[test]
    fn delta_adjusts_within_bounds() {
        assert_eq!(apply_delta(10, -4).unwrap(), 6);
        assert_eq!(apply_delta(0, 25).unwrap(), 25);
    }

    #[test]
    fn over_consuming_delta_is_rejected() {
        let err = apply_delta(3, -4).unwrap_err();
        assert!(matches!(err, ServiceError::BadRequest(_)));
    }

    #[test]
    fn overflowing_delta_is_rejected() {
        let err = apply_delta(1, i32::MAX).unwrap_err();
        assert!(matches!(err, ServiceError::BadRequest(_)));
        let err = apply_delta(0, i32::MIN).unwrap_err();
        assert!(matches!(err, ServiceError::BadRequest(_)));
    }
}
