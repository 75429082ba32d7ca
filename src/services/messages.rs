use crate::{
    db::DbPool,
    entities::message::{
        self, ActiveModel as MessageActiveModel, Entity as MessageEntity, Model as MessageModel,
    },
    errors::ServiceError,
    events::{Event, EventSender},
    tenant::TenantScope,
};
use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info, instrument, warn};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// Submitted from a salon's public page, no authentication involved
#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct SubmitMessageRequest {
    #[validate(length(min = 1, max = 120, message = "Name is required"))]
    pub client_name: String,
    #[validate(email(message = "Email must be valid"))]
    pub client_email: String,
    #[validate(length(min = 1, max = 4000, message = "Message body is required"))]
    pub body: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub id: Uuid,
    pub client_name: String,
    pub client_email: String,
    pub body: String,
    pub is_read: bool,
    pub created_at: chrono::DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MessageListResponse {
    pub messages: Vec<MessageResponse>,
    pub total: u64,
    pub unread: u64,
    pub page: u64,
    pub per_page: u64,
}

/// Client inbox for a salon
#[derive(Clone)]
pub struct MessageService {
    db_pool: Arc<DbPool>,
    event_sender: Option<Arc<EventSender>>,
}

impl MessageService {
    pub fn new(db_pool: Arc<DbPool>, event_sender: Option<Arc<EventSender>>) -> Self {
        Self {
            db_pool,
            event_sender,
        }
    }

    /// Records an inbound message for a salon. Called from the public
    /// surface, so the target salon id is resolved from the slug by the
    /// caller rather than from a session.
    #[instrument(skip(self, request), fields(salon_id = %salon_id))]
    pub async fn submit_message(
        &self,
        salon_id: Uuid,
        request: SubmitMessageRequest,
    ) -> Result<MessageResponse, ServiceError> {
        request.validate()?;

        let db = &*self.db_pool;
        let message_id = Uuid::new_v4();

        let model = MessageActiveModel {
            id: Set(message_id),
            salon_id: Set(salon_id),
            client_name: Set(request.client_name),
            client_email: Set(request.client_email),
            body: Set(request.body),
            is_read: Set(false),
            created_at: Set(Utc::now()),
        }
        .insert(db)
        .await
        .map_err(|e| {
            error!(error = %e, message_id = %message_id, "Failed to store message");
            ServiceError::DatabaseError(e)
        })?;

        info!(message_id = %message_id, "Client message stored");

        if let Some(event_sender) = &self.event_sender {
            if let Err(e) = event_sender
                .send(Event::MessageReceived {
                    salon_id,
                    message_id,
                })
                .await
            {
                warn!(error = %e, message_id = %message_id, "Failed to send message event");
            }
        }

        Ok(model_to_response(model))
    }

    /// Lists the scoped salon's inbox, newest first
    #[instrument(skip(self), fields(salon_id = %scope.salon_id()))]
    pub async fn list_messages(
        &self,
        scope: &TenantScope,
        page: u64,
        per_page: u64,
    ) -> Result<MessageListResponse, ServiceError> {
        let db = &*self.db_pool;

        let unread = scope
            .select::<MessageEntity>()
            .filter(message::Column::IsRead.eq(false))
            .count(db)
            .await
            .map_err(|e| {
                error!(error = %e, "Failed to count unread messages");
                ServiceError::DatabaseError(e)
            })?;

        let paginator = scope
            .select::<MessageEntity>()
            .order_by_desc(message::Column::CreatedAt)
            .paginate(db, per_page);

        let total = paginator.num_items().await.map_err(|e| {
            error!(error = %e, "Failed to count messages");
            ServiceError::DatabaseError(e)
        })?;

        let rows = paginator.fetch_page(page.saturating_sub(1)).await.map_err(|e| {
            error!(error = %e, page, per_page, "Failed to fetch messages page");
            ServiceError::DatabaseError(e)
        })?;

        Ok(MessageListResponse {
            messages: rows.into_iter().map(model_to_response).collect(),
            total,
            unread,
            page,
            per_page,
        })
    }

    /// Marks a message as read
    #[instrument(skip(self), fields(salon_id = %scope.salon_id(), message_id = %message_id))]
    pub async fn mark_read(
        &self,
        scope: &TenantScope,
        message_id: Uuid,
    ) -> Result<MessageResponse, ServiceError> {
        let db = &*self.db_pool;
        let model = self.find_owned(scope, message_id).await?;

        let mut active_model: MessageActiveModel = model.into();
        active_model.is_read = Set(true);

        let updated = active_model.update(db).await.map_err(|e| {
            error!(error = %e, message_id = %message_id, "Failed to mark message read");
            ServiceError::DatabaseError(e)
        })?;

        info!(message_id = %message_id, "Message marked read");
        Ok(model_to_response(updated))
    }

    async fn find_owned(
        &self,
        scope: &TenantScope,
        message_id: Uuid,
    ) -> Result<MessageModel, ServiceError> {
        let db = &*self.db_pool;
        let model = MessageEntity::find_by_id(message_id)
            .one(db)
            .await
            .map_err(|e| {
                error!(error = %e, message_id = %message_id, "Failed to fetch message");
                ServiceError::DatabaseError(e)
            })?
            .ok_or_else(|| {
                warn!(message_id = %message_id, "Message not found");
                ServiceError::NotFound("Message not found".to_string())
            })?;
        scope.assert_owns::<MessageEntity>(&model)?;
        Ok(model)
    }
}

fn model_to_response(model: MessageModel) -> MessageResponse {
    MessageResponse {
        id: model.id,
        client_name: model.client_name,
        client_email: model.client_email,
        body: model.body,
        is_read: model.is_read,
        created_at: model.created_at,
    }
}
