use axum::{
    Json,
    extract::{Path, State},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use uuid::Uuid;

use outpass_auth_types::identity::{StaffIdentity, StudentIdentity};
use outpass_domain::outpass::{Decision, OutpassStatus};

use crate::domain::types::{
    Outpass, OutpassWithStaff, OutpassWithStudent, RawInstant, UserBrief,
};
use crate::error::OutpassServiceError;
use crate::handlers::JsonBody;
use crate::state::AppState;
use crate::usecase::outpass::{
    CancelOutpassUseCase, CountPendingUseCase, DecideAllUseCase, DecideUseCase,
    ListDelayedUseCase, ListMineUseCase, ListPendingUseCase, MarkReachedUseCase,
    RequestOutpassInput, RequestOutpassUseCase,
};
use crate::usecase::roster::ListDistinctStudentsUseCase;

// ── Response types ───────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct StudentResponse {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
}

impl From<UserBrief> for StudentResponse {
    fn from(u: UserBrief) -> Self {
        Self {
            id: u.id,
            name: u.name,
            email: u.email,
            phone: u.phone,
        }
    }
}

#[derive(Serialize)]
pub struct StaffResponse {
    pub id: Uuid,
    pub name: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OutpassResponse {
    pub id: Uuid,
    pub student_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub student: Option<StudentResponse>,
    pub reason: String,
    #[serde(serialize_with = "outpass_core::serde::to_rfc3339_ms")]
    pub out_time: DateTime<Utc>,
    #[serde(serialize_with = "outpass_core::serde::to_rfc3339_ms")]
    pub in_time: DateTime<Utc>,
    pub status: OutpassStatus,
    pub staff_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub staff: Option<StaffResponse>,
    #[serde(serialize_with = "outpass_core::serde::to_rfc3339_ms_opt")]
    pub action_time: Option<DateTime<Utc>>,
    pub reached: bool,
    #[serde(serialize_with = "outpass_core::serde::to_rfc3339_ms_opt")]
    pub actual_in_time: Option<DateTime<Utc>>,
    pub delay_minutes: i32,
    #[serde(serialize_with = "outpass_core::serde::to_rfc3339_ms")]
    pub created_at: DateTime<Utc>,
    #[serde(serialize_with = "outpass_core::serde::to_rfc3339_ms")]
    pub updated_at: DateTime<Utc>,
}

impl From<Outpass> for OutpassResponse {
    fn from(o: Outpass) -> Self {
        Self {
            id: o.id,
            student_id: o.student_id,
            student: None,
            reason: o.reason,
            out_time: o.out_time,
            in_time: o.in_time,
            status: o.status,
            staff_id: o.staff_id,
            staff: None,
            action_time: o.action_time,
            reached: o.reached,
            actual_in_time: o.actual_in_time,
            delay_minutes: o.delay_minutes,
            created_at: o.created_at,
            updated_at: o.updated_at,
        }
    }
}

impl From<OutpassWithStudent> for OutpassResponse {
    fn from(row: OutpassWithStudent) -> Self {
        Self {
            student: row.student.map(StudentResponse::from),
            ..Self::from(row.outpass)
        }
    }
}

impl From<OutpassWithStaff> for OutpassResponse {
    fn from(row: OutpassWithStaff) -> Self {
        let staff = row
            .outpass
            .staff_id
            .zip(row.staff_name)
            .map(|(id, name)| StaffResponse { id, name });
        Self {
            staff,
            ..Self::from(row.outpass)
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestOutpassRequest {
    pub reason: Option<Value>,
    pub out_time: Option<RawInstant>,
    pub in_time: Option<RawInstant>,
}

/// Scalars become text; anything else counts as absent.
fn text_field(value: Option<Value>) -> Option<String> {
    match value? {
        Value::String(s) => Some(s),
        v @ (Value::Number(_) | Value::Bool(_)) => Some(v.to_string()),
        _ => None,
    }
}

// ── Student routes ───────────────────────────────────────────────────────────

/// `POST /outpass/request`
pub async fn request_outpass(
    student: StudentIdentity,
    State(state): State<AppState>,
    JsonBody(body): JsonBody<RequestOutpassRequest>,
) -> Result<Json<OutpassResponse>, OutpassServiceError> {
    let uc = RequestOutpassUseCase {
        repo: state.outpass_repo(),
    };
    let outpass = uc
        .execute(
            student.user_id,
            RequestOutpassInput {
                reason: text_field(body.reason),
                out_time: body.out_time,
                in_time: body.in_time,
            },
        )
        .await?;
    Ok(Json(outpass.into()))
}

/// `GET /outpass/my`
pub async fn list_mine(
    student: StudentIdentity,
    State(state): State<AppState>,
) -> Result<Json<Vec<OutpassResponse>>, OutpassServiceError> {
    let uc = ListMineUseCase {
        repo: state.outpass_repo(),
        users: state.user_repo(),
    };
    let rows = uc.execute(student.user_id).await?;
    Ok(Json(rows.into_iter().map(Into::into).collect()))
}

/// `DELETE /outpass/cancel/{id}`
pub async fn cancel_outpass(
    student: StudentIdentity,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, OutpassServiceError> {
    let uc = CancelOutpassUseCase {
        repo: state.outpass_repo(),
    };
    uc.execute(id, student.user_id).await?;
    Ok(Json(json!({ "msg": "Outpass cancelled successfully" })))
}

/// `PUT /outpass/reached/{id}`
pub async fn mark_reached(
    student: StudentIdentity,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, OutpassServiceError> {
    let uc = MarkReachedUseCase {
        repo: state.outpass_repo(),
    };
    let reached = uc.execute(id, student.user_id).await?;
    Ok(Json(json!({
        "msg": "Return marked successfully",
        "delayMinutes": reached.delay_minutes,
    })))
}

// ── Staff routes ─────────────────────────────────────────────────────────────

/// `GET /outpass/pending`
pub async fn list_pending(
    _staff: StaffIdentity,
    State(state): State<AppState>,
) -> Result<Json<Vec<OutpassResponse>>, OutpassServiceError> {
    let uc = ListPendingUseCase {
        repo: state.outpass_repo(),
        users: state.user_repo(),
    };
    let rows = uc.execute().await?;
    Ok(Json(rows.into_iter().map(Into::into).collect()))
}

async fn decide(
    state: AppState,
    id: Uuid,
    decision: Decision,
    staff_id: Uuid,
) -> Result<(), OutpassServiceError> {
    let uc = DecideUseCase {
        repo: state.outpass_repo(),
    };
    uc.execute(id, decision, staff_id).await.map(drop)
}

/// `PUT /outpass/approve/{id}`
pub async fn approve(
    staff: StaffIdentity,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, OutpassServiceError> {
    decide(state, id, Decision::Approve, staff.user_id).await?;
    Ok(Json(json!({ "msg": "Outpass approved successfully" })))
}

/// `PUT /outpass/reject/{id}`
pub async fn reject(
    staff: StaffIdentity,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, OutpassServiceError> {
    decide(state, id, Decision::Reject, staff.user_id).await?;
    Ok(Json(json!({ "msg": "Outpass rejected successfully" })))
}

/// `PUT /outpass/approve-all`
pub async fn approve_all(
    staff: StaffIdentity,
    State(state): State<AppState>,
) -> Result<Json<Value>, OutpassServiceError> {
    let uc = DecideAllUseCase {
        repo: state.outpass_repo(),
    };
    let count = uc.execute(Decision::Approve, staff.user_id).await?;
    Ok(Json(json!({
        "msg": "All pending outpasses approved successfully",
        "approvedCount": count,
    })))
}

/// `PUT /outpass/reject-all`
pub async fn reject_all(
    staff: StaffIdentity,
    State(state): State<AppState>,
) -> Result<Json<Value>, OutpassServiceError> {
    let uc = DecideAllUseCase {
        repo: state.outpass_repo(),
    };
    let count = uc.execute(Decision::Reject, staff.user_id).await?;
    Ok(Json(json!({
        "msg": "All pending outpasses rejected successfully",
        "rejectedCount": count,
    })))
}

/// `GET /outpass/staff/count`
pub async fn count_pending(
    _staff: StaffIdentity,
    State(state): State<AppState>,
) -> Result<Json<Value>, OutpassServiceError> {
    let uc = CountPendingUseCase {
        repo: state.outpass_repo(),
    };
    let count = uc.execute().await?;
    Ok(Json(json!({ "pendingCount": count })))
}

/// `GET /outpass/students`
pub async fn list_students(
    _staff: StaffIdentity,
    State(state): State<AppState>,
) -> Result<Json<Vec<StudentResponse>>, OutpassServiceError> {
    let uc = ListDistinctStudentsUseCase {
        repo: state.outpass_repo(),
        users: state.user_repo(),
    };
    let students = uc.execute().await?;
    Ok(Json(students.into_iter().map(Into::into).collect()))
}

/// `GET /outpass/delay`
pub async fn list_delayed(
    _staff: StaffIdentity,
    State(state): State<AppState>,
) -> Result<Json<Vec<OutpassResponse>>, OutpassServiceError> {
    let uc = ListDelayedUseCase {
        repo: state.outpass_repo(),
        users: state.user_repo(),
    };
    let rows = uc.execute().await?;
    Ok(Json(rows.into_iter().map(Into::into).collect()))
}
