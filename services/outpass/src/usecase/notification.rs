use chrono::{Duration, Utc};
use uuid::Uuid;

use crate::domain::repository::NotificationRepository;
use crate::domain::types::Notification;
use crate::error::OutpassServiceError;

// ── SendNotification ─────────────────────────────────────────────────────────

pub struct SendNotificationInput {
    pub title: Option<String>,
    pub message: Option<String>,
}

pub struct SendNotificationUseCase<R: NotificationRepository> {
    pub repo: R,
    pub ttl: Duration,
}

impl<R: NotificationRepository> SendNotificationUseCase<R> {
    pub async fn execute(
        &self,
        staff_id: Uuid,
        input: SendNotificationInput,
    ) -> Result<Notification, OutpassServiceError> {
        let (Some(title), Some(message)) = (
            input.title.filter(|t| !t.is_empty()),
            input.message.filter(|m| !m.is_empty()),
        ) else {
            return Err(OutpassServiceError::MissingFields);
        };

        let now = Utc::now();
        let notification = Notification {
            id: Uuid::now_v7(),
            title,
            message,
            created_by: staff_id,
            expires_at: now + self.ttl,
            created_at: now,
        };
        self.repo.create(&notification).await?;
        tracing::info!(notification_id = %notification.id, %staff_id, "notification sent");
        Ok(notification)
    }
}

// ── EditNotification ─────────────────────────────────────────────────────────

pub struct EditNotificationInput {
    pub title: Option<String>,
    pub message: Option<String>,
}

pub struct EditNotificationUseCase<R: NotificationRepository> {
    pub repo: R,
}

impl<R: NotificationRepository> EditNotificationUseCase<R> {
    pub async fn execute(
        &self,
        id: Uuid,
        staff_id: Uuid,
        input: EditNotificationInput,
    ) -> Result<Notification, OutpassServiceError> {
        let current = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or(OutpassServiceError::NotificationNotFound)?;
        let now = Utc::now();
        let (title, message) = (input.title.as_deref(), input.message.as_deref());
        let edited = current.edit(staff_id, title, message, now)?;
        if edited != current && !self.repo.update(&edited, now).await? {
            // Deleted or purged since the read.
            return Err(match self.repo.find_by_id(id).await? {
                None => OutpassServiceError::NotificationNotFound,
                Some(stored) => stored
                    .edit(staff_id, title, message, now)
                    .err()
                    .unwrap_or(OutpassServiceError::NotificationExpired),
            });
        }
        Ok(edited)
    }
}

// ── ListMyNotifications ──────────────────────────────────────────────────────

pub struct ListMyNotificationsUseCase<R: NotificationRepository> {
    pub repo: R,
}

impl<R: NotificationRepository> ListMyNotificationsUseCase<R> {
    pub async fn execute(&self, staff_id: Uuid) -> Result<Vec<Notification>, OutpassServiceError> {
        self.repo.list_by_creator(staff_id).await
    }
}

// ── ListActiveNotifications ──────────────────────────────────────────────────

pub struct ListActiveNotificationsUseCase<R: NotificationRepository> {
    pub repo: R,
}

impl<R: NotificationRepository> ListActiveNotificationsUseCase<R> {
    pub async fn execute(&self) -> Result<Vec<Notification>, OutpassServiceError> {
        self.repo.list_active(Utc::now()).await
    }
}

// ── DeleteNotification ───────────────────────────────────────────────────────

pub struct DeleteNotificationUseCase<R: NotificationRepository> {
    pub repo: R,
}

impl<R: NotificationRepository> DeleteNotificationUseCase<R> {
    pub async fn execute(&self, id: Uuid, staff_id: Uuid) -> Result<(), OutpassServiceError> {
        let current = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or(OutpassServiceError::NotificationNotFound)?;
        if current.created_by != staff_id {
            return Err(OutpassServiceError::Forbidden);
        }
        if !self.repo.delete(id).await? {
            return Err(OutpassServiceError::NotificationNotFound);
        }
        Ok(())
    }
}

// ── PurgeExpiredNotifications ────────────────────────────────────────────────

pub struct PurgeExpiredNotificationsUseCase<R: NotificationRepository> {
    pub repo: R,
}

impl<R: NotificationRepository> PurgeExpiredNotificationsUseCase<R> {
    pub async fn execute(&self) -> Result<u64, OutpassServiceError> {
        let purged = self.repo.purge_expired(Utc::now()).await?;
        if purged > 0 {
            tracing::debug!(purged, "expired notifications purged");
        }
        Ok(purged)
    }
}
