use crate::{
    db::DbPool,
    entities::staff::{
        self, ActiveModel as StaffActiveModel, Entity as StaffEntity, Model as StaffModel,
    },
    errors::ServiceError,
    tenant::TenantScope,
};
use chrono::Utc;
use sea_orm::{ActiveModelTrait, EntityTrait, QueryOrder, Set};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info, instrument, warn};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateStaffRequest {
    #[validate(length(min = 1, max = 120, message = "Staff name is required"))]
    pub name: String,
    #[validate(length(min = 1, max = 80, message = "Role is required"))]
    pub role: String,
}

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateStaffRequest {
    #[validate(length(min = 1, max = 120, message = "Staff name is required"))]
    pub name: Option<String>,
    #[validate(length(min = 1, max = 80, message = "Role is required"))]
    pub role: Option<String>,
    pub active: Option<bool>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct StaffResponse {
    pub id: Uuid,
    pub name: String,
    pub role: String,
    pub active: bool,
}

/// Staff roster management for a salon
#[derive(Clone)]
pub struct StaffService {
    db_pool: Arc<DbPool>,
}

impl StaffService {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self { db_pool }
    }

    #[instrument(skip(self, request), fields(salon_id = %scope.salon_id(), name = %request.name))]
    pub async fn create_staff(
        &self,
        scope: &TenantScope,
        request: CreateStaffRequest,
    ) -> Result<StaffResponse, ServiceError> {
        request.validate()?;

        let db = &*self.db_pool;
        let staff_id = Uuid::new_v4();

        let model = StaffActiveModel {
            id: Set(staff_id),
            salon_id: Set(scope.salon_id()),
            name: Set(request.name),
            role: Set(request.role),
            active: Set(true),
            created_at: Set(Utc::now()),
        }
        .insert(db)
        .await
        .map_err(|e| {
            error!(error = %e, staff_id = %staff_id, "Failed to create staff member");
            ServiceError::DatabaseError(e)
        })?;

        info!(staff_id = %staff_id, "Staff member created");
        Ok(model_to_response(model))
    }

    #[instrument(skip(self), fields(salon_id = %scope.salon_id()))]
    pub async fn list_staff(&self, scope: &TenantScope) -> Result<Vec<StaffResponse>, ServiceError> {
        let db = &*self.db_pool;
        let rows = scope
            .select::<StaffEntity>()
            .order_by_asc(staff::Column::Name)
            .all(db)
            .await
            .map_err(|e| {
                error!(error = %e, "Failed to list staff");
                ServiceError::DatabaseError(e)
            })?;
        Ok(rows.into_iter().map(model_to_response).collect())
    }

    #[instrument(skip(self, request), fields(salon_id = %scope.salon_id(), staff_id = %staff_id))]
    pub async fn update_staff(
        &self,
        scope: &TenantScope,
        staff_id: Uuid,
        request: UpdateStaffRequest,
    ) -> Result<StaffResponse, ServiceError> {
        request.validate()?;

        let db = &*self.db_pool;
        let model = self.find_owned(scope, staff_id).await?;

        let mut active_model: StaffActiveModel = model.into();
        if let Some(name) = request.name {
            active_model.name = Set(name);
        }
        if let Some(role) = request.role {
            active_model.role = Set(role);
        }
        if let Some(active) = request.active {
            active_model.active = Set(active);
        }

        let updated = active_model.update(db).await.map_err(|e| {
            error!(error = %e, staff_id = %staff_id, "Failed to update staff member");
            ServiceError::DatabaseError(e)
        })?;

        info!(staff_id = %staff_id, "Staff member updated");
        Ok(model_to_response(updated))
    }

    #[instrument(skip(self), fields(salon_id = %scope.salon_id(), staff_id = %staff_id))]
    pub async fn delete_staff(
        &self,
        scope: &TenantScope,
        staff_id: Uuid,
    ) -> Result<(), ServiceError> {
        let db = &*self.db_pool;
        let model = self.find_owned(scope, staff_id).await?;
        StaffEntity::delete_by_id(model.id)
            .exec(db)
            .await
            .map_err(|e| {
                error!(error = %e, staff_id = %staff_id, "Failed to delete staff member");
                ServiceError::DatabaseError(e)
            })?;
        info!(staff_id = %staff_id, "Staff member deleted");
        Ok(())
    }

    async fn find_owned(
        &self,
        scope: &TenantScope,
        staff_id: Uuid,
    ) -> Result<StaffModel, ServiceError> {
        let db = &*self.db_pool;
        let model = StaffEntity::find_by_id(staff_id)
            .one(db)
            .await
            .map_err(|e| {
                error!(error = %e, staff_id = %staff_id, "Failed to fetch staff member");
                ServiceError::DatabaseError(e)
            })?
            .ok_or_else(|| {
                warn!(staff_id = %staff_id, "Staff member not found");
                ServiceError::NotFound("Staff member not found".to_string())
            })?;
        scope.assert_owns::<StaffEntity>(&model)?;
        Ok(model)
    }
}

fn model_to_response(model: StaffModel) -> StaffResponse {
    StaffResponse {
        id: model.id,
        name: model.name,
        role: model.role,
        active: model.active,
    }
}
