use axum::{
    Json,
    extract::{Path, State},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use uuid::Uuid;

use outpass_auth_types::identity::{Identity, StaffIdentity};

use crate::domain::types::Notification;
use crate::error::OutpassServiceError;
use crate::handlers::JsonBody;
use crate::state::AppState;
use crate::usecase::notification::{
    DeleteNotificationUseCase, EditNotificationInput, EditNotificationUseCase,
    ListActiveNotificationsUseCase, ListMyNotificationsUseCase, SendNotificationInput,
    SendNotificationUseCase,
};

// ── Request / response types ─────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct NotificationRequest {
    pub title: Option<String>,
    pub message: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationResponse {
    pub id: Uuid,
    pub title: String,
    pub message: String,
    pub created_by: Uuid,
    #[serde(serialize_with = "outpass_core::serde::to_rfc3339_ms")]
    pub expires_at: DateTime<Utc>,
    #[serde(serialize_with = "outpass_core::serde::to_rfc3339_ms")]
    pub created_at: DateTime<Utc>,
}

impl From<Notification> for NotificationResponse {
    fn from(n: Notification) -> Self {
        Self {
            id: n.id,
            title: n.title,
            message: n.message,
            created_by: n.created_by,
            expires_at: n.expires_at,
            created_at: n.created_at,
        }
    }
}

// ── POST /notifications/send ─────────────────────────────────────────────────

pub async fn send_notification(
    staff: StaffIdentity,
    State(state): State<AppState>,
    JsonBody(body): JsonBody<NotificationRequest>,
) -> Result<Json<Value>, OutpassServiceError> {
    let uc = SendNotificationUseCase {
        repo: state.notification_repo(),
        ttl: state.notification_ttl,
    };
    let notification = uc
        .execute(
            staff.user_id,
            SendNotificationInput {
                title: body.title,
                message: body.message,
            },
        )
        .await?;
    Ok(Json(json!({
        "msg": "Notification sent successfully",
        "notification": NotificationResponse::from(notification),
    })))
}

// ── PUT /notifications/edit/{id} ─────────────────────────────────────────────

pub async fn edit_notification(
    staff: StaffIdentity,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    JsonBody(body): JsonBody<NotificationRequest>,
) -> Result<Json<Value>, OutpassServiceError> {
    let uc = EditNotificationUseCase {
        repo: state.notification_repo(),
    };
    let notification = uc
        .execute(
            id,
            staff.user_id,
            EditNotificationInput {
                title: body.title,
                message: body.message,
            },
        )
        .await?;
    Ok(Json(json!({
        "msg": "Notification updated successfully",
        "notification": NotificationResponse::from(notification),
    })))
}

// ── GET /notifications/staff/my ──────────────────────────────────────────────

pub async fn list_my_notifications(
    staff: StaffIdentity,
    State(state): State<AppState>,
) -> Result<Json<Vec<NotificationResponse>>, OutpassServiceError> {
    let uc = ListMyNotificationsUseCase {
        repo: state.notification_repo(),
    };
    let items = uc.execute(staff.user_id).await?;
    Ok(Json(items.into_iter().map(Into::into).collect()))
}

// ── GET /notifications/active ────────────────────────────────────────────────

pub async fn list_active_notifications(
    _identity: Identity,
    State(state): State<AppState>,
) -> Result<Json<Vec<NotificationResponse>>, OutpassServiceError> {
    let uc = ListActiveNotificationsUseCase {
        repo: state.notification_repo(),
    };
    let items = uc.execute().await?;
    Ok(Json(items.into_iter().map(Into::into).collect()))
}

// ── DELETE /notifications/delete/{id} ────────────────────────────────────────

pub async fn delete_notification(
    staff: StaffIdentity,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, OutpassServiceError> {
    let uc = DeleteNotificationUseCase {
        repo: state.notification_repo(),
    };
    uc.execute(id, staff.user_id).await?;
    Ok(Json(json!({ "msg": "Notification deleted successfully" })))
}
