use crate::{
    db::DbPool,
    entities::payment_method::{
        self, ActiveModel as MethodActiveModel, Entity as MethodEntity, Model as MethodModel,
    },
    errors::ServiceError,
    tenant::TenantScope,
};
use sea_orm::{ActiveModelTrait, EntityTrait, QueryOrder, Set};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info, instrument, warn};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreatePaymentMethodRequest {
    #[validate(length(min = 1, max = 80, message = "Label is required"))]
    pub label: String,
    #[validate(length(min = 1, max = 40, message = "Kind is required"))]
    pub kind: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PaymentMethodResponse {
    pub id: Uuid,
    pub label: String,
    pub kind: String,
    pub enabled: bool,
}

/// Payment options a salon accepts at checkout
#[derive(Clone)]
pub struct PaymentMethodService {
    db_pool: Arc<DbPool>,
}

impl PaymentMethodService {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self { db_pool }
    }

    #[instrument(skip(self, request), fields(salon_id = %scope.salon_id(), label = %request.label))]
    pub async fn create_method(
        &self,
        scope: &TenantScope,
        request: CreatePaymentMethodRequest,
    ) -> Result<PaymentMethodResponse, ServiceError> {
        request.validate()?;

        let db = &*self.db_pool;
        let method_id = Uuid::new_v4();

        let model = MethodActiveModel {
            id: Set(method_id),
            salon_id: Set(scope.salon_id()),
            label: Set(request.label),
            kind: Set(request.kind),
            enabled: Set(true),
        }
        .insert(db)
        .await
        .map_err(|e| {
            error!(error = %e, method_id = %method_id, "Failed to create payment method");
            ServiceError::DatabaseError(e)
        })?;

        info!(method_id = %method_id, "Payment method created");
        Ok(model_to_response(model))
    }

    #[instrument(skip(self), fields(salon_id = %scope.salon_id()))]
    pub async fn list_methods(
        &self,
        scope: &TenantScope,
    ) -> Result<Vec<PaymentMethodResponse>, ServiceError> {
        let db = &*self.db_pool;
        let rows = scope
            .select::<MethodEntity>()
            .order_by_asc(payment_method::Column::Label)
            .all(db)
            .await
            .map_err(|e| {
                error!(error = %e, "Failed to list payment methods");
                ServiceError::DatabaseError(e)
            })?;
        Ok(rows.into_iter().map(model_to_response).collect())
    }

    /// Toggles whether a payment method is offered
    #[instrument(skip(self), fields(salon_id = %scope.salon_id(), method_id = %method_id))]
    pub async fn set_enabled(
        &self,
        scope: &TenantScope,
        method_id: Uuid,
        enabled: bool,
    ) -> Result<PaymentMethodResponse, ServiceError> {
        let db = &*self.db_pool;
        let model = self.find_owned(scope, method_id).await?;

        let mut active_model: MethodActiveModel = model.into();
        active_model.enabled = Set(enabled);

        let updated = active_model.update(db).await.map_err(|e| {
            error!(error = %e, method_id = %method_id, "Failed to update payment method");
            ServiceError::DatabaseError(e)
        })?;

        info!(method_id = %method_id, enabled, "Payment method toggled");
        Ok(model_to_response(updated))
    }

    #[instrument(skip(self), fields(salon_id = %scope.salon_id(), method_id = %method_id))]
    pub async fn delete_method(
        &self,
        scope: &TenantScope,
        method_id: Uuid,
    ) -> Result<(), ServiceError> {
        let db = &*self.db_pool;
        let model = self.find_owned(scope, method_id).await?;
        MethodEntity::delete_by_id(model.id)
            .exec(db)
            .await
            .map_err(|e| {
                error!(error = %e, method_id = %method_id, "Failed to delete payment method");
                ServiceError::DatabaseError(e)
            })?;
        info!(method_id = %method_id, "Payment method deleted");
        Ok(())
    }

    async fn find_owned(
        &self,
        scope: &TenantScope,
        method_id: Uuid,
    ) -> Result<MethodModel, ServiceError> {
        let db = &*self.db_pool;
        let model = MethodEntity::find_by_id(method_id)
            .one(db)
            .await
            .map_err(|e| {
                error!(error = %e, method_id = %method_id, "Failed to fetch payment method");
                ServiceError::DatabaseError(e)
            })?
            .ok_or_else(|| {
                warn!(method_id = %method_id, "Payment method not found");
                ServiceError::NotFound("Payment method not found".to_string())
            })?;
        scope.assert_owns::<MethodEntity>(&model)?;
        Ok(model)
    }
}

fn model_to_response(model: MethodModel) -> PaymentMethodResponse {
    PaymentMethodResponse {
        id: model.id,
        label: model.label,
        kind: model.kind,
        enabled: model.enabled,
    }
}
