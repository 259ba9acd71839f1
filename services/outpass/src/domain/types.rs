use std::collections::HashSet;

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Deserialize;
use serde::de::IgnoredAny;
use uuid::Uuid;

use outpass_domain::outpass::{Decision, OutpassStatus};
use outpass_domain::user::UserRole;

use crate::error::OutpassServiceError;

// ── Users ────────────────────────────────────────────────────────────────────

/// Registered account. `password_hash` is a PHC string.
#[derive(Debug, Clone)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: UserRole,
    pub phone: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Public projection of a user joined into outpass listings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserBrief {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
}

impl From<&User> for UserBrief {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            phone: user.phone.clone(),
        }
    }
}

// ── Outpasses ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct Outpass {
    pub id: Uuid,
    pub student_id: Uuid,
    pub reason: String,
    pub out_time: DateTime<Utc>,
    pub in_time: DateTime<Utc>,
    pub status: OutpassStatus,
    pub staff_id: Option<Uuid>,
    pub action_time: Option<DateTime<Utc>>,
    pub reached: bool,
    pub actual_in_time: Option<DateTime<Utc>>,
    pub delay_minutes: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Outpass {
    /// Fresh pending request. No staff, action or return fields are set.
    pub fn new_request(
        student_id: Uuid,
        reason: String,
        out_time: DateTime<Utc>,
        in_time: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::now_v7(),
            student_id,
            reason,
            out_time,
            in_time,
            status: OutpassStatus::Pending,
            staff_id: None,
            action_time: None,
            reached: false,
            actual_in_time: None,
            delay_minutes: 0,
            created_at: now,
            updated_at: now,
        }
    }

    /// Apply a staff decision. Only a pending outpass can be decided.
    pub fn decide(
        &self,
        decision: Decision,
        staff_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<Outpass, OutpassServiceError> {
        if self.status.is_terminal() {
            return Err(OutpassServiceError::AlreadyProcessed);
        }
        Ok(Outpass {
            status: decision.target_status(),
            staff_id: Some(staff_id),
            action_time: Some(now),
            updated_at: now,
            ..self.clone()
        })
    }

    /// Check that `student_id` may cancel this outpass.
    pub fn ensure_cancellable_by(&self, student_id: Uuid) -> Result<(), OutpassServiceError> {
        if self.student_id != student_id {
            return Err(OutpassServiceError::Forbidden);
        }
        if self.status != OutpassStatus::Pending {
            return Err(OutpassServiceError::NotPending);
        }
        Ok(())
    }

    /// Record the owner's return at `now`.
    pub fn mark_reached(
        &self,
        student_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<Outpass, OutpassServiceError> {
        if self.student_id != student_id {
            return Err(OutpassServiceError::Forbidden);
        }
        if self.status != OutpassStatus::Approved {
            return Err(OutpassServiceError::NotApproved);
        }
        if self.reached {
            return Err(OutpassServiceError::AlreadyReached);
        }
        Ok(Outpass {
            reached: true,
            actual_in_time: Some(now),
            delay_minutes: delay_minutes(self.in_time, now),
            updated_at: now,
            ..self.clone()
        })
    }
}

/// Whole minutes between the planned and actual return; 0 unless late.
pub fn delay_minutes(in_time: DateTime<Utc>, actual_in_time: DateTime<Utc>) -> i32 {
    if actual_in_time <= in_time {
        return 0;
    }
    let minutes = (actual_in_time - in_time).num_minutes();
    i32::try_from(minutes).unwrap_or(i32::MAX)
}

/// Parse a client timestamp.
///
/// Accepts RFC 3339 (`2025-02-11T09:00:00Z`, `...+05:30`) and offset-less
/// `YYYY-MM-DDTHH:MM[:SS[.fff]]`, which is taken as UTC.
pub fn parse_instant(raw: &str) -> Result<DateTime<Utc>, OutpassServiceError> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| naive.and_utc())
        .ok_or(OutpassServiceError::InvalidDateFormat)
}

/// Timestamp as sent by a client: a date string or epoch milliseconds.
///
/// Any other JSON value lands in `Other` so that a wrong type is reported as
/// an invalid date instead of failing body extraction.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RawInstant {
    Text(String),
    EpochMillis(i64),
    Other(IgnoredAny),
}

impl RawInstant {
    pub fn is_blank(&self) -> bool {
        matches!(self, Self::Text(t) if t.trim().is_empty())
    }

    pub fn to_instant(&self) -> Result<DateTime<Utc>, OutpassServiceError> {
        match self {
            Self::Text(raw) => parse_instant(raw),
            Self::EpochMillis(ms) => {
                DateTime::from_timestamp_millis(*ms).ok_or(OutpassServiceError::InvalidDateFormat)
            }
            Self::Other(_) => Err(OutpassServiceError::InvalidDateFormat),
        }
    }
}

/// Outpass joined with the requesting student.
#[derive(Debug, Clone)]
pub struct OutpassWithStudent {
    pub outpass: Outpass,
    pub student: Option<UserBrief>,
}

/// Outpass joined with the deciding staff member's name.
#[derive(Debug, Clone)]
pub struct OutpassWithStaff {
    pub outpass: Outpass,
    pub staff_name: Option<String>,
}

/// Drop repeated ids, keeping the first occurrence of each.
pub fn dedup_first_seen(ids: impl IntoIterator<Item = Uuid>) -> Vec<Uuid> {
    let mut seen = HashSet::new();
    ids.into_iter().filter(|id| seen.insert(*id)).collect()
}

// ── Notifications ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub id: Uuid,
    pub title: String,
    pub message: String,
    pub created_by: Uuid,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl Notification {
    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        self.expires_at > now
    }

    /// Apply an edit by `staff_id`. Empty or absent fields are left unchanged.
    pub fn edit(
        &self,
        staff_id: Uuid,
        title: Option<&str>,
        message: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<Notification, OutpassServiceError> {
        if self.created_by != staff_id {
            return Err(OutpassServiceError::Forbidden);
        }
        if self.expires_at < now {
            return Err(OutpassServiceError::NotificationExpired);
        }
        let mut edited = self.clone();
        if let Some(title) = title.filter(|t| !t.is_empty()) {
            edited.title = title.to_owned();
        }
        if let Some(message) = message.filter(|m| !m.is_empty()) {
            edited.message = message.to_owned();
        }
        Ok(edited)
    }
}
