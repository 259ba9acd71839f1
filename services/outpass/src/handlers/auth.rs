use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use uuid::Uuid;

use outpass_auth_types::identity::{Identity, StaffIdentity, StudentIdentity};
use outpass_domain::user::UserRole;

use crate::error::OutpassServiceError;
use crate::handlers::JsonBody;
use crate::state::AppState;
use crate::usecase::account::{
    AddPhoneUseCase, GetMeUseCase, LoginInput, LoginUseCase, RegisterInput, RegisterUseCase,
};

// ── Request / response types ─────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct RegisterRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub role: Option<UserRole>,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub role: UserRole,
    pub name: String,
}

#[derive(Deserialize)]
pub struct AddPhoneRequest {
    pub phone: Option<String>,
}

#[derive(Serialize)]
pub struct MeResponse {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub role: UserRole,
}

// ── POST /auth/register ──────────────────────────────────────────────────────

pub async fn register(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<RegisterRequest>,
) -> Result<Json<Value>, OutpassServiceError> {
    let uc = RegisterUseCase {
        repo: state.user_repo(),
    };
    uc.execute(RegisterInput {
        name: body.name,
        email: body.email,
        password: body.password,
        role: body.role,
    })
    .await?;
    Ok(Json(json!({ "msg": "User registered successfully" })))
}

// ── POST /auth/login ─────────────────────────────────────────────────────────

pub async fn login(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<LoginRequest>,
) -> Result<Json<LoginResponse>, OutpassServiceError> {
    let uc = LoginUseCase {
        repo: state.user_repo(),
        jwt_secret: state.jwt_secret.0.to_string(),
    };
    let out = uc
        .execute(LoginInput {
            email: body.email,
            password: body.password,
        })
        .await?;
    Ok(Json(LoginResponse {
        token: out.token,
        role: out.role,
        name: out.name,
    }))
}

// ── PUT /auth/add-phone ──────────────────────────────────────────────────────

pub async fn add_phone(
    identity: Identity,
    State(state): State<AppState>,
    JsonBody(body): JsonBody<AddPhoneRequest>,
) -> Result<Json<Value>, OutpassServiceError> {
    let uc = AddPhoneUseCase {
        repo: state.user_repo(),
    };
    let phone = uc.execute(identity.user_id, body.phone).await?;
    Ok(Json(json!({
        "msg": "Phone number added successfully",
        "phone": phone,
    })))
}

// ── GET /auth/me ─────────────────────────────────────────────────────────────

pub async fn get_me(
    identity: Identity,
    State(state): State<AppState>,
) -> Result<Json<MeResponse>, OutpassServiceError> {
    let uc = GetMeUseCase {
        repo: state.user_repo(),
    };
    let user = uc.execute(identity.user_id).await?;
    Ok(Json(MeResponse {
        id: user.id,
        name: user.name,
        email: user.email,
        phone: user.phone,
        role: user.role,
    }))
}

// ── GET /auth/student, GET /auth/staff ───────────────────────────────────────

pub async fn student_probe(_student: StudentIdentity) -> Json<Value> {
    Json(json!({ "msg": "Welcome Student" }))
}

pub async fn staff_probe(_staff: StaffIdentity) -> Json<Value> {
    Json(json!({ "msg": "Welcome Staff" }))
}
