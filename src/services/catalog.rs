use crate::{
    db::DbPool,
    entities::service::{
        self, ActiveModel as CatalogActiveModel, Entity as CatalogEntity, Model as CatalogModel,
    },
    errors::ServiceError,
    tenant::TenantScope,
};
use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info, instrument, warn};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateServiceRequest {
    #[validate(length(min = 1, max = 120, message = "Service name is required"))]
    pub name: String,
    pub description: Option<String>,
    #[validate(range(min = 5, max = 480, message = "Duration must be between 5 and 480 minutes"))]
    pub duration_minutes: i32,
    pub price: Decimal,
}

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateServiceRequest {
    #[validate(length(min = 1, max = 120, message = "Service name is required"))]
    pub name: Option<String>,
    pub description: Option<String>,
    #[validate(range(min = 5, max = 480, message = "Duration must be between 5 and 480 minutes"))]
    pub duration_minutes: Option<i32>,
    pub price: Option<Decimal>,
    pub active: Option<bool>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ServiceResponse {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub duration_minutes: i32,
    pub price: Decimal,
    pub active: bool,
}

/// Service catalog management: the bookable offers of a salon
#[derive(Clone)]
pub struct CatalogService {
    db_pool: Arc<DbPool>,
}

impl CatalogService {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self { db_pool }
    }

    #[instrument(skip(self, request), fields(salon_id = %scope.salon_id(), name = %request.name))]
    pub async fn create_service(
        &self,
        scope: &TenantScope,
        request: CreateServiceRequest,
    ) -> Result<ServiceResponse, ServiceError> {
        request.validate()?;

        let db = &*self.db_pool;
        let service_id = Uuid::new_v4();

        let model = CatalogActiveModel {
            id: Set(service_id),
            salon_id: Set(scope.salon_id()),
            name: Set(request.name),
            description: Set(request.description),
            duration_minutes: Set(request.duration_minutes),
            price: Set(request.price),
            active: Set(true),
            created_at: Set(Utc::now()),
        }
        .insert(db)
        .await
        .map_err(|e| {
            error!(error = %e, service_id = %service_id, "Failed to create catalog service");
            ServiceError::DatabaseError(e)
        })?;

        info!(service_id = %service_id, "Catalog service created");
        Ok(model_to_response(model))
    }

    #[instrument(skip(self), fields(salon_id = %scope.salon_id(), service_id = %service_id))]
    pub async fn get_service(
        &self,
        scope: &TenantScope,
        service_id: Uuid,
    ) -> Result<ServiceResponse, ServiceError> {
        let model = self.find_owned(scope, service_id).await?;
        Ok(model_to_response(model))
    }

    /// Lists the scoped salon's catalog, active entries first
    #[instrument(skip(self), fields(salon_id = %scope.salon_id()))]
    pub async fn list_services(
        &self,
        scope: &TenantScope,
    ) -> Result<Vec<ServiceResponse>, ServiceError> {
        let db = &*self.db_pool;
        let rows = scope
            .select::<CatalogEntity>()
            .order_by_desc(service::Column::Active)
            .order_by_asc(service::Column::Name)
            .all(db)
            .await
            .map_err(|e| {
                error!(error = %e, "Failed to list catalog services");
                ServiceError::DatabaseError(e)
            })?;
        Ok(rows.into_iter().map(model_to_response).collect())
    }

    /// Lists only active services, used by the public salon page
    pub async fn list_active_services(
        &self,
        scope: &TenantScope,
    ) -> Result<Vec<ServiceResponse>, ServiceError> {
        let db = &*self.db_pool;
        let rows = scope
            .select::<CatalogEntity>()
            .filter(service::Column::Active.eq(true))
            .order_by_asc(service::Column::Name)
            .all(db)
            .await
            .map_err(|e| {
                error!(error = %e, "Failed to list public catalog services");
                ServiceError::DatabaseError(e)
            })?;
        Ok(rows.into_iter().map(model_to_response).collect())
    }

    #[instrument(skip(self, request), fields(salon_id = %scope.salon_id(), service_id = %service_id))]
    pub async fn update_service(
        &self,
        scope: &TenantScope,
        service_id: Uuid,
        request: UpdateServiceRequest,
    ) -> Result<ServiceResponse, ServiceError> {
        request.validate()?;

        let db = &*self.db_pool;
        let model = self.find_owned(scope, service_id).await?;

        let mut active_model: CatalogActiveModel = model.into();
        if let Some(name) = request.name {
            active_model.name = Set(name);
        }
        if let Some(description) = request.description {
            active_model.description = Set(Some(description));
        }
        if let Some(duration) = request.duration_minutes {
            active_model.duration_minutes = Set(duration);
        }
        if let Some(price) = request.price {
            active_model.price = Set(price);
        }
        if let Some(active) = request.active {
            active_model.active = Set(active);
        }

        let updated = active_model.update(db).await.map_err(|e| {
            error!(error = %e, service_id = %service_id, "Failed to update catalog service");
            ServiceError::DatabaseError(e)
        })?;

        info!(service_id = %service_id, "Catalog service updated");
        Ok(model_to_response(updated))
    }

    /// Removes a service from the catalog
    #[instrument(skip(self), fields(salon_id = %scope.salon_id(), service_id = %service_id))]
    pub async fn delete_service(
        &self,
        scope: &TenantScope,
        service_id: Uuid,
    ) -> Result<(), ServiceError> {
        let db = &*self.db_pool;
        let model = self.find_owned(scope, service_id).await?;
        CatalogEntity::delete_by_id(model.id)
            .exec(db)
            .await
            .map_err(|e| {
                error!(error = %e, service_id = %service_id, "Failed to delete catalog service");
                ServiceError::DatabaseError(e)
            })?;
        info!(service_id = %service_id, "Catalog service deleted");
        Ok(())
    }

    async fn find_owned(
        &self,
        scope: &TenantScope,
        service_id: Uuid,
    ) -> Result<CatalogModel, ServiceError> {
        let db = &*self.db_pool;
        let model = CatalogEntity::find_by_id(service_id)
            .one(db)
            .await
            .map_err(|e| {
                error!(error = %e, service_id = %service_id, "Failed to fetch catalog service");
                ServiceError::DatabaseError(e)
            })?
            .ok_or_else(|| {
                warn!(service_id = %service_id, "Catalog service not found");
                ServiceError::NotFound("Service not found".to_string())
            })?;
        scope.assert_owns::<CatalogEntity>(&model)?;
        Ok(model)
    }
}

fn model_to_response(model: CatalogModel) -> ServiceResponse {
    ServiceResponse {
        id: model.id,
        name: model.name,
        description: model.description,
        duration_minutes: model.duration_minutes,
        price: model.price,
        active: model.active,
    }
}
