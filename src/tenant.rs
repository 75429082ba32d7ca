//! Tenant scoping for salon-owned data.
//!
//! Every read of a salon-owned entity goes through [`TenantScope`], which
//! injects the `salon_id` equality filter, and every by-id mutation passes
//! [`TenantScope::assert_owns`]. Call sites never write their own owner
//! predicate; that keeps "forgot the WHERE salon_id" bugs structurally
//! impossible. There is no admin bypass.

use async_trait::async_trait;
use axum::{extract::FromRequestParts, http::request::Parts};
use sea_orm::{ColumnTrait, EntityName, EntityTrait, QueryFilter, Select};
use uuid::Uuid;

use crate::{
    auth::AuthUser,
    entities::{appointment, inventory_item, message, payment_method, service, staff},
    errors::ServiceError,
};

/// Marker for sea-orm entities owned by a salon.
pub trait TenantOwned: EntityTrait {
    /// Column holding the owning salon id
    fn owner_column() -> <Self as EntityTrait>::Column;

    /// Owning salon id of a fetched row
    fn owner_of(model: &<Self as EntityTrait>::Model) -> Uuid;
}

/// The resolved tenant key for one request. Built from the authenticated
/// session by the extractor below, or from a slug-resolved salon on the
/// public booking path. Never cached across requests.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TenantScope {
    salon_id: Uuid,
}

impl TenantScope {
    pub fn new(salon_id: Uuid) -> Self {
        Self { salon_id }
    }

    pub fn salon_id(&self) -> Uuid {
        self.salon_id
    }

    /// Starts a listing query for a tenant-owned entity with the owner
    /// filter already applied. The only sanctioned entry point for reads.
    pub fn select<E: TenantOwned>(&self) -> Select<E> {
        self.scoped(E::find())
    }

    /// Applies the owner filter to an existing select
    pub fn scoped<E: TenantOwned>(&self, select: Select<E>) -> Select<E> {
        select.filter(E::owner_column().eq(self.salon_id))
    }

    /// Rejects a fetched row that belongs to a different salon.
    /// Cross-tenant references fail outright with `Forbidden`; they are
    /// never downgraded to a silent filter or a partial result.
    pub fn assert_owns<E: TenantOwned>(
        &self,
        model: &<E as EntityTrait>::Model,
    ) -> Result<(), ServiceError> {
        if E::owner_of(model) == self.salon_id {
            Ok(())
        } else {
            Err(ServiceError::Forbidden(format!(
                "{} record belongs to another salon",
                E::default().table_name()
            )))
        }
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for TenantScope
where
    S: Send + Sync,
{
    type Rejection = ServiceError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = parts
            .extensions
            .get::<AuthUser>()
            .ok_or_else(|| ServiceError::Unauthorized("No authenticated session".to_string()))?;

        Ok(TenantScope::new(user.salon_id))
    }
}

impl TenantOwned for appointment::Entity {
    fn owner_column() -> appointment::Column {
        appointment::Column::SalonId
    }

    fn owner_of(model: &appointment::Model) -> Uuid {
        model.salon_id
    }
}

impl TenantOwned for service::Entity {
    fn owner_column() -> service::Column {
        service::Column::SalonId
    }

    fn owner_of(model: &service::Model) -> Uuid {
        model.salon_id
    }
}

impl TenantOwned for staff::Entity {
    fn owner_column() -> staff::Column {
        staff::Column::SalonId
    }

    fn owner_of(model: &staff::Model) -> Uuid {
        model.salon_id
    }
}

impl TenantOwned for inventory_item::Entity {
    fn owner_column() -> inventory_item::Column {
        inventory_item::Column::SalonId
    }

    fn owner_of(model: &inventory_item::Model) -> Uuid {
        model.salon_id
    }
}

impl TenantOwned for payment_method::Entity {
    fn owner_column() -> payment_method::Column {
        payment_method::Column::SalonId
    }

    fn owner_of(model: &payment_method::Model) -> Uuid {
        model.salon_id
    }
}

impl TenantOwned for message::Entity {
    fn owner_column() -> message::Column {
        message::Column::SalonId
    }

    fn owner_of(model: &message::Model) -> Uuid {
        model.salon_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveTime, Utc};
    use rust_decimal_macros::dec;
    use sea_orm::{DbBackend, QueryTrait};

    fn sample_appointment(salon_id: Uuid) -> appointment::Model {
        appointment::Model {
            id: Uuid::new_v4(),
            salon_id,
            client_name: "Client".into(),
            client_email: "client@example.com".into(),
            service_name: "Haircut".into(),
            staff_id: None,
            scheduled_date: NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
            start_time: NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
            status: "pending".into(),
            total_price: dec!(50),
            notes: None,
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    #[test]
    fn scoped_select_filters_on_owner_column() {
        let salon_id = Uuid::new_v4();
        let scope = TenantScope::new(salon_id);

        let sql = scope
            .select::<appointment::Entity>()
            .build(DbBackend::Sqlite)
            .to_string();

        assert!(
            sql.contains(r#""appointments"."salon_id" ="#),
            "owner predicate missing from generated SQL: {sql}"
        );
        assert!(sql.contains(&salon_id.to_string()));
    }

    #[test]
    fn scoped_by_id_lookup_keeps_owner_predicate() {
        let salon_id = Uuid::new_v4();
        let scope = TenantScope::new(salon_id);
        let service_id = Uuid::new_v4();

        let sql = scope
            .scoped(service::Entity::find_by_id(service_id))
            .build(DbBackend::Sqlite)
            .to_string();

        assert!(
            sql.contains(r#""services"."salon_id" ="#),
            "owner predicate missing from generated SQL: {sql}"
        );
        assert!(sql.contains(&service_id.to_string()));
    }

    #[test]
    fn assert_owns_accepts_own_record() {
        let salon_id = Uuid::new_v4();
        let scope = TenantScope::new(salon_id);
        let model = sample_appointment(salon_id);

        assert!(scope.assert_owns::<appointment::Entity>(&model).is_ok());
    }

    #[test]
    fn assert_owns_rejects_foreign_record_as_forbidden() {
        let scope = TenantScope::new(Uuid::new_v4());
        let model = sample_appointment(Uuid::new_v4());

        let err = scope
            .assert_owns::<appointment::Entity>(&model)
            .unwrap_err();
        assert!(matches!(err, ServiceError::Forbidden(_)));
    }

    #[tokio::test]
    async fn extractor_rejects_missing_session_as_unauthorized() {
        let (mut parts, _) = axum::http::Request::new(()).into_parts();

        let err = TenantScope::from_request_parts(&mut parts, &())
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Unauthorized(_)));
    }

    #[tokio::test]
    async fn extractor_resolves_salon_from_session() {
        let salon_id = Uuid::new_v4();
        let (mut parts, _) = axum::http::Request::new(()).into_parts();
        parts.extensions.insert(AuthUser {
            user_id: Uuid::new_v4(),
            email: "owner@example.com".into(),
            name: "Owner".into(),
            salon_id,
            token_id: "jti".into(),
        });

        let scope = TenantScope::from_request_parts(&mut parts, &())
            .await
            .unwrap();
        assert_eq!(scope.salon_id(), salon_id);
    }
}
