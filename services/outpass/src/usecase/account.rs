use chrono::Utc;
use uuid::Uuid;

use outpass_auth_types::token::issue_access_token;
use outpass_domain::user::UserRole;

use crate::domain::repository::UserRepository;
use crate::domain::types::User;
use crate::error::OutpassServiceError;
use crate::infra::password::{hash_password, verify_password};

/// Treat absent and blank strings alike.
fn required(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

// ── Register ─────────────────────────────────────────────────────────────────

pub struct RegisterInput {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub role: Option<UserRole>,
}

pub struct RegisterUseCase<R: UserRepository> {
    pub repo: R,
}

impl<R: UserRepository> RegisterUseCase<R> {
    pub async fn execute(&self, input: RegisterInput) -> Result<User, OutpassServiceError> {
        let (Some(name), Some(email), Some(password)) = (
            required(input.name),
            required(input.email),
            required(input.password),
        ) else {
            return Err(OutpassServiceError::MissingFields);
        };
        let email = email.trim().to_owned();

        if self.repo.find_by_email(&email).await?.is_some() {
            return Err(OutpassServiceError::UserAlreadyExists);
        }

        let now = Utc::now();
        let user = User {
            id: Uuid::now_v7(),
            name: name.trim().to_owned(),
            email,
            password_hash: hash_password(&password)?,
            role: input.role.unwrap_or_default(),
            phone: None,
            created_at: now,
            updated_at: now,
        };
        self.repo.create(&user).await?;
        tracing::info!(user_id = %user.id, role = user.role.as_str(), "user registered");
        Ok(user)
    }
}

// ── Login ────────────────────────────────────────────────────────────────────

pub struct LoginInput {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug)]
pub struct LoginOutput {
    pub token: String,
    pub token_exp: u64,
    pub role: UserRole,
    pub name: String,
}

pub struct LoginUseCase<R: UserRepository> {
    pub repo: R,
    pub jwt_secret: String,
}

impl<R: UserRepository> LoginUseCase<R> {
    pub async fn execute(&self, input: LoginInput) -> Result<LoginOutput, OutpassServiceError> {
        let (Some(email), Some(password)) = (required(input.email), input.password) else {
            return Err(OutpassServiceError::InvalidCredentials);
        };

        let user = self
            .repo
            .find_by_email(email.trim())
            .await?
            .ok_or(OutpassServiceError::InvalidCredentials)?;

        if !verify_password(&password, &user.password_hash)? {
            return Err(OutpassServiceError::InvalidCredentials);
        }

        let (token, token_exp) = issue_access_token(user.id, user.role.as_u8(), &self.jwt_secret)
            .map_err(|e| anyhow::anyhow!("issue access token: {e}"))?;

        Ok(LoginOutput {
            token,
            token_exp,
            role: user.role,
            name: user.name,
        })
    }
}

// ── AddPhone ─────────────────────────────────────────────────────────────────

pub struct AddPhoneUseCase<R: UserRepository> {
    pub repo: R,
}

impl<R: UserRepository> AddPhoneUseCase<R> {
    /// Set the caller's phone. Allowed once; the stored value is never replaced.
    pub async fn execute(
        &self,
        user_id: Uuid,
        phone: Option<String>,
    ) -> Result<String, OutpassServiceError> {
        let phone = required(phone)
            .map(|p| p.trim().to_owned())
            .ok_or(OutpassServiceError::PhoneRequired)?;

        let user = self
            .repo
            .find_by_id(user_id)
            .await?
            .ok_or(OutpassServiceError::UserNotFound)?;
        if user.phone.is_some() {
            return Err(OutpassServiceError::PhoneAlreadySet);
        }

        if !self.repo.set_phone_once(user_id, &phone).await? {
            return Err(OutpassServiceError::PhoneAlreadySet);
        }
        Ok(phone)
    }
}

// ── Me ───────────────────────────────────────────────────────────────────────

pub struct GetMeUseCase<R: UserRepository> {
    pub repo: R,
}

impl<R: UserRepository> GetMeUseCase<R> {
    pub async fn execute(&self, user_id: Uuid) -> Result<User, OutpassServiceError> {
        self.repo
            .find_by_id(user_id)
            .await?
            .ok_or(OutpassServiceError::UserNotFound)
    }
}
