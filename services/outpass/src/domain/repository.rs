#![allow(async_fn_in_trait)]

use chrono::{DateTime, Utc};
use uuid::Uuid;

use outpass_domain::outpass::OutpassStatus;

use crate::domain::types::{Notification, Outpass, User};
use crate::error::OutpassServiceError;

/// Repository for user accounts.
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, OutpassServiceError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, OutpassServiceError>;

    /// Users whose id is in `ids`, in no particular order. Unknown ids are skipped.
    async fn find_many(&self, ids: &[Uuid]) -> Result<Vec<User>, OutpassServiceError>;

    /// Insert a new user. Fails with `UserAlreadyExists` on a duplicate email.
    async fn create(&self, user: &User) -> Result<(), OutpassServiceError>;

    /// Set the phone only if none is stored yet. Returns `false` if a phone
    /// was already present or the user does not exist.
    async fn set_phone_once(&self, id: Uuid, phone: &str) -> Result<bool, OutpassServiceError>;
}

/// Repository for outpasses.
///
/// Every transition that depends on the current state is a compare-and-set:
/// the write only lands if the stored row still matches the expected state,
/// and the return value says whether it did.
pub trait OutpassRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Outpass>, OutpassServiceError>;

    /// Whether the student currently owns a pending outpass.
    async fn has_pending(&self, student_id: Uuid) -> Result<bool, OutpassServiceError>;

    /// Insert a pending outpass. Fails with `DuplicatePending` if the store
    /// already holds a pending outpass for the same student.
    async fn create(&self, outpass: &Outpass) -> Result<(), OutpassServiceError>;

    /// Newest first.
    async fn list_by_status(
        &self,
        status: OutpassStatus,
    ) -> Result<Vec<Outpass>, OutpassServiceError>;

    /// Newest first.
    async fn list_by_student(&self, student_id: Uuid) -> Result<Vec<Outpass>, OutpassServiceError>;

    /// Outpasses with `reached = true`, latest return first.
    async fn list_reached(&self) -> Result<Vec<Outpass>, OutpassServiceError>;

    async fn count_by_status(&self, status: OutpassStatus) -> Result<u64, OutpassServiceError>;

    /// Student id of every outpass in scan order, repeats included.
    async fn list_student_ids(&self) -> Result<Vec<Uuid>, OutpassServiceError>;

    /// Persist `decided` only if the stored row is still pending.
    async fn save_decision(&self, decided: &Outpass) -> Result<bool, OutpassServiceError>;

    /// Move every pending outpass to `status` with one shared staff id and
    /// action time. Returns the number of rows changed.
    async fn decide_all_pending(
        &self,
        status: OutpassStatus,
        staff_id: Uuid,
        action_time: DateTime<Utc>,
    ) -> Result<u64, OutpassServiceError>;

    /// Persist the return fields of `reached` only if the stored row is
    /// approved and not yet reached.
    async fn save_reached(&self, reached: &Outpass) -> Result<bool, OutpassServiceError>;

    /// Delete the outpass only if it is still pending and owned by `student_id`.
    async fn delete_pending(
        &self,
        id: Uuid,
        student_id: Uuid,
    ) -> Result<bool, OutpassServiceError>;
}

/// Repository for time-limited staff notifications.
pub trait NotificationRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Notification>, OutpassServiceError>;
    async fn create(&self, notification: &Notification) -> Result<(), OutpassServiceError>;

    /// Overwrite title and message if the row still exists and has not
    /// expired at `now`. Returns whether a row changed.
    async fn update(
        &self,
        notification: &Notification,
        now: DateTime<Utc>,
    ) -> Result<bool, OutpassServiceError>;

    /// Newest first.
    async fn list_by_creator(
        &self,
        created_by: Uuid,
    ) -> Result<Vec<Notification>, OutpassServiceError>;

    /// Notifications with `expires_at > now`, newest first.
    async fn list_active(
        &self,
        now: DateTime<Utc>,
    ) -> Result<Vec<Notification>, OutpassServiceError>;

    /// Returns `true` if a row was deleted.
    async fn delete(&self, id: Uuid) -> Result<bool, OutpassServiceError>;

    /// Delete every notification with `expires_at <= now`. Returns the count.
    async fn purge_expired(&self, now: DateTime<Utc>) -> Result<u64, OutpassServiceError>;
}
