use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use outpass_domain::outpass::OutpassStatus;
use outpass_domain::user::UserRole;
use outpass_service::domain::repository::{
    NotificationRepository, OutpassRepository, UserRepository,
};
use outpass_service::domain::types::{Notification, Outpass, User};
use outpass_service::error::OutpassServiceError;

// ── MockUserRepo ─────────────────────────────────────────────────────────────

#[derive(Clone, Default)]
pub struct MockUserRepo {
    pub users: Arc<Mutex<Vec<User>>>,
}

impl MockUserRepo {
    pub fn new(users: Vec<User>) -> Self {
        Self {
            users: Arc::new(Mutex::new(users)),
        }
    }

    /// Remove a user while leaving their outpasses behind.
    pub fn remove(&self, id: Uuid) {
        self.users.lock().unwrap().retain(|u| u.id != id);
    }
}

impl UserRepository for MockUserRepo {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, OutpassServiceError> {
        Ok(self.users.lock().unwrap().iter().find(|u| u.id == id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, OutpassServiceError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn find_many(&self, ids: &[Uuid]) -> Result<Vec<User>, OutpassServiceError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .filter(|u| ids.contains(&u.id))
            .cloned()
            .collect())
    }

    async fn create(&self, user: &User) -> Result<(), OutpassServiceError> {
        let mut users = self.users.lock().unwrap();
        if users.iter().any(|u| u.email == user.email) {
            return Err(OutpassServiceError::UserAlreadyExists);
        }
        users.push(user.clone());
        Ok(())
    }

    async fn set_phone_once(&self, id: Uuid, phone: &str) -> Result<bool, OutpassServiceError> {
        let mut users = self.users.lock().unwrap();
        match users.iter_mut().find(|u| u.id == id && u.phone.is_none()) {
            Some(user) => {
                user.phone = Some(phone.to_owned());
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

// ── MockOutpassRepo ──────────────────────────────────────────────────────────

/// In-memory outpass store with the same compare-and-set semantics as the
/// database repository. Rows are kept in insertion order.
#[derive(Clone, Default)]
pub struct MockOutpassRepo {
    pub outpasses: Arc<Mutex<Vec<Outpass>>>,
}

impl MockOutpassRepo {
    pub fn new(outpasses: Vec<Outpass>) -> Self {
        Self {
            outpasses: Arc::new(Mutex::new(outpasses)),
        }
    }

    pub fn get(&self, id: Uuid) -> Option<Outpass> {
        self.outpasses
            .lock()
            .unwrap()
            .iter()
            .find(|o| o.id == id)
            .cloned()
    }

    pub fn pending_count_for(&self, student_id: Uuid) -> usize {
        self.outpasses
            .lock()
            .unwrap()
            .iter()
            .filter(|o| o.student_id == student_id && o.status == OutpassStatus::Pending)
            .count()
    }

    /// `ORDER BY created_at DESC`, as `list_by_status` / `list_by_student` document.
    fn newest_first(mut rows: Vec<Outpass>) -> Vec<Outpass> {
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        rows
    }
}

impl OutpassRepository for MockOutpassRepo {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Outpass>, OutpassServiceError> {
        Ok(self.get(id))
    }

    async fn has_pending(&self, student_id: Uuid) -> Result<bool, OutpassServiceError> {
        Ok(self.pending_count_for(student_id) > 0)
    }

    async fn create(&self, outpass: &Outpass) -> Result<(), OutpassServiceError> {
        let mut rows = self.outpasses.lock().unwrap();
        if rows
            .iter()
            .any(|o| o.student_id == outpass.student_id && o.status == OutpassStatus::Pending)
        {
            return Err(OutpassServiceError::DuplicatePending);
        }
        rows.push(outpass.clone());
        Ok(())
    }

    async fn list_by_status(
        &self,
        status: OutpassStatus,
    ) -> Result<Vec<Outpass>, OutpassServiceError> {
        let rows = self.outpasses.lock().unwrap();
        Ok(Self::newest_first(
            rows.iter().filter(|o| o.status == status).cloned().collect(),
        ))
    }

    async fn list_by_student(&self, student_id: Uuid) -> Result<Vec<Outpass>, OutpassServiceError> {
        let rows = self.outpasses.lock().unwrap();
        Ok(Self::newest_first(
            rows.iter()
                .filter(|o| o.student_id == student_id)
                .cloned()
                .collect(),
        ))
    }

    async fn list_reached(&self) -> Result<Vec<Outpass>, OutpassServiceError> {
        let mut rows: Vec<Outpass> = self
            .outpasses
            .lock()
            .unwrap()
            .iter()
            .filter(|o| o.reached)
            .cloned()
            .collect();
        // Latest return first, as `list_reached` documents.
        rows.sort_by(|a, b| b.actual_in_time.cmp(&a.actual_in_time));
        Ok(rows)
    }

    async fn count_by_status(&self, status: OutpassStatus) -> Result<u64, OutpassServiceError> {
        let rows = self.outpasses.lock().unwrap();
        Ok(rows.iter().filter(|o| o.status == status).count() as u64)
    }

    async fn list_student_ids(&self) -> Result<Vec<Uuid>, OutpassServiceError> {
        Ok(self
            .outpasses
            .lock()
            .unwrap()
            .iter()
            .map(|o| o.student_id)
            .collect())
    }

    async fn save_decision(&self, decided: &Outpass) -> Result<bool, OutpassServiceError> {
        let mut rows = self.outpasses.lock().unwrap();
        match rows
            .iter_mut()
            .find(|o| o.id == decided.id && o.status == OutpassStatus::Pending)
        {
            Some(row) => {
                row.status = decided.status;
                row.staff_id = decided.staff_id;
                row.action_time = decided.action_time;
                row.updated_at = decided.updated_at;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn decide_all_pending(
        &self,
        status: OutpassStatus,
        staff_id: Uuid,
        action_time: DateTime<Utc>,
    ) -> Result<u64, OutpassServiceError> {
        let mut rows = self.outpasses.lock().unwrap();
        let mut changed = 0;
        for row in rows
            .iter_mut()
            .filter(|o| o.status == OutpassStatus::Pending)
        {
            row.status = status;
            row.staff_id = Some(staff_id);
            row.action_time = Some(action_time);
            row.updated_at = action_time;
            changed += 1;
        }
        Ok(changed)
    }

    async fn save_reached(&self, reached: &Outpass) -> Result<bool, OutpassServiceError> {
        let mut rows = self.outpasses.lock().unwrap();
        match rows.iter_mut().find(|o| {
            o.id == reached.id && o.status == OutpassStatus::Approved && !o.reached
        }) {
            Some(row) => {
                row.reached = true;
                row.actual_in_time = reached.actual_in_time;
                row.delay_minutes = reached.delay_minutes;
                row.updated_at = reached.updated_at;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_pending(
        &self,
        id: Uuid,
        student_id: Uuid,
    ) -> Result<bool, OutpassServiceError> {
        let mut rows = self.outpasses.lock().unwrap();
        let before = rows.len();
        rows.retain(|o| {
            !(o.id == id && o.student_id == student_id && o.status == OutpassStatus::Pending)
        });
        Ok(rows.len() < before)
    }
}

// ── StaleReadOutpassRepo ─────────────────────────────────────────────────────

/// Serves one stale snapshot from the first `find_by_id`, then delegates.
/// Simulates a concurrent writer landing between read and write.
pub struct StaleReadOutpassRepo {
    pub inner: MockOutpassRepo,
    pub snapshot: Outpass,
    served: AtomicBool,
}

impl StaleReadOutpassRepo {
    pub fn new(inner: MockOutpassRepo, snapshot: Outpass) -> Self {
        Self {
            inner,
            snapshot,
            served: AtomicBool::new(false),
        }
    }
}

impl OutpassRepository for StaleReadOutpassRepo {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Outpass>, OutpassServiceError> {
        if id == self.snapshot.id && !self.served.swap(true, Ordering::SeqCst) {
            return Ok(Some(self.snapshot.clone()));
        }
        self.inner.find_by_id(id).await
    }

    async fn has_pending(&self, student_id: Uuid) -> Result<bool, OutpassServiceError> {
        self.inner.has_pending(student_id).await
    }

    async fn create(&self, outpass: &Outpass) -> Result<(), OutpassServiceError> {
        self.inner.create(outpass).await
    }

    async fn list_by_status(
        &self,
        status: OutpassStatus,
    ) -> Result<Vec<Outpass>, OutpassServiceError> {
        self.inner.list_by_status(status).await
    }

    async fn list_by_student(&self, student_id: Uuid) -> Result<Vec<Outpass>, OutpassServiceError> {
        self.inner.list_by_student(student_id).await
    }

    async fn list_reached(&self) -> Result<Vec<Outpass>, OutpassServiceError> {
        self.inner.list_reached().await
    }

    async fn count_by_status(&self, status: OutpassStatus) -> Result<u64, OutpassServiceError> {
        self.inner.count_by_status(status).await
    }

    async fn list_student_ids(&self) -> Result<Vec<Uuid>, OutpassServiceError> {
        self.inner.list_student_ids().await
    }

    async fn save_decision(&self, decided: &Outpass) -> Result<bool, OutpassServiceError> {
        self.inner.save_decision(decided).await
    }

    async fn decide_all_pending(
        &self,
        status: OutpassStatus,
        staff_id: Uuid,
        action_time: DateTime<Utc>,
    ) -> Result<u64, OutpassServiceError> {
        self.inner
            .decide_all_pending(status, staff_id, action_time)
            .await
    }

    async fn save_reached(&self, reached: &Outpass) -> Result<bool, OutpassServiceError> {
        self.inner.save_reached(reached).await
    }

    async fn delete_pending(
        &self,
        id: Uuid,
        student_id: Uuid,
    ) -> Result<bool, OutpassServiceError> {
        self.inner.delete_pending(id, student_id).await
    }
}

// ── MockNotificationRepo ─────────────────────────────────────────────────────

#[derive(Clone, Default)]
pub struct MockNotificationRepo {
    pub notifications: Arc<Mutex<Vec<Notification>>>,
}

impl MockNotificationRepo {
    pub fn new(notifications: Vec<Notification>) -> Self {
        Self {
            notifications: Arc::new(Mutex::new(notifications)),
        }
    }

    pub fn len(&self) -> usize {
        self.notifications.lock().unwrap().len()
    }
}

impl NotificationRepository for MockNotificationRepo {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Notification>, OutpassServiceError> {
        Ok(self
            .notifications
            .lock()
            .unwrap()
            .iter()
            .find(|n| n.id == id)
            .cloned())
    }

    async fn create(&self, notification: &Notification) -> Result<(), OutpassServiceError> {
        self.notifications.lock().unwrap().push(notification.clone());
        Ok(())
    }

    async fn update(
        &self,
        notification: &Notification,
        now: DateTime<Utc>,
    ) -> Result<bool, OutpassServiceError> {
        let mut rows = self.notifications.lock().unwrap();
        match rows
            .iter_mut()
            .find(|n| n.id == notification.id && n.expires_at >= now)
        {
            Some(row) => {
                row.title = notification.title.clone();
                row.message = notification.message.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn list_by_creator(
        &self,
        created_by: Uuid,
    ) -> Result<Vec<Notification>, OutpassServiceError> {
        let mut rows: Vec<Notification> = self
            .notifications
            .lock()
            .unwrap()
            .iter()
            .filter(|n| n.created_by == created_by)
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(rows)
    }

    async fn list_active(
        &self,
        now: DateTime<Utc>,
    ) -> Result<Vec<Notification>, OutpassServiceError> {
        let mut rows: Vec<Notification> = self
            .notifications
            .lock()
            .unwrap()
            .iter()
            .filter(|n| n.is_active(now))
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(rows)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, OutpassServiceError> {
        let mut rows = self.notifications.lock().unwrap();
        let before = rows.len();
        rows.retain(|n| n.id != id);
        Ok(rows.len() < before)
    }

    async fn purge_expired(&self, now: DateTime<Utc>) -> Result<u64, OutpassServiceError> {
        let mut rows = self.notifications.lock().unwrap();
        let before = rows.len();
        rows.retain(|n| n.is_active(now));
        Ok((before - rows.len()) as u64)
    }
}

// ── StaleReadNotificationRepo ────────────────────────────────────────────────

/// Serves one stale snapshot from the first `find_by_id`, then delegates.
/// Simulates the purge loop deleting a row between read and write.
pub struct StaleReadNotificationRepo {
    pub inner: MockNotificationRepo,
    pub snapshot: Notification,
    served: AtomicBool,
}

impl StaleReadNotificationRepo {
    pub fn new(inner: MockNotificationRepo, snapshot: Notification) -> Self {
        Self {
            inner,
            snapshot,
            served: AtomicBool::new(false),
        }
    }
}

impl NotificationRepository for StaleReadNotificationRepo {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Notification>, OutpassServiceError> {
        if id == self.snapshot.id && !self.served.swap(true, Ordering::SeqCst) {
            return Ok(Some(self.snapshot.clone()));
        }
        self.inner.find_by_id(id).await
    }

    async fn create(&self, notification: &Notification) -> Result<(), OutpassServiceError> {
        self.inner.create(notification).await
    }

    async fn update(
        &self,
        notification: &Notification,
        now: DateTime<Utc>,
    ) -> Result<bool, OutpassServiceError> {
        self.inner.update(notification, now).await
    }

    async fn list_by_creator(
        &self,
        created_by: Uuid,
    ) -> Result<Vec<Notification>, OutpassServiceError> {
        self.inner.list_by_creator(created_by).await
    }

    async fn list_active(
        &self,
        now: DateTime<Utc>,
    ) -> Result<Vec<Notification>, OutpassServiceError> {
        self.inner.list_active(now).await
    }

    async fn delete(&self, id: Uuid) -> Result<bool, OutpassServiceError> {
        self.inner.delete(id).await
    }

    async fn purge_expired(&self, now: DateTime<Utc>) -> Result<u64, OutpassServiceError> {
        self.inner.purge_expired(now).await
    }
}

// ── Test fixture helpers ─────────────────────────────────────────────────────

pub fn test_user(name: &str, role: UserRole) -> User {
    let now = Utc::now();
    User {
        id: Uuid::new_v4(),
        name: name.to_owned(),
        email: format!("{}@campus.edu", name.to_lowercase()),
        password_hash: String::new(),
        role,
        phone: None,
        created_at: now,
        updated_at: now,
    }
}

/// Pending outpass created `age` ago, due back two hours after leaving.
pub fn test_outpass(student_id: Uuid, age: Duration) -> Outpass {
    let created = Utc::now() - age;
    Outpass::new_request(
        student_id,
        "home visit".to_owned(),
        created + Duration::hours(1),
        created + Duration::hours(3),
        created,
    )
}

pub fn test_notification(created_by: Uuid, age: Duration, ttl: Duration) -> Notification {
    let created = Utc::now() - age;
    Notification {
        id: Uuid::new_v4(),
        title: "Hostel notice".to_owned(),
        message: "Gates close at 9pm".to_owned(),
        created_by,
        expires_at: created + ttl,
        created_at: created,
    }
}
