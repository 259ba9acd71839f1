//! Bearer-token identity extractors.
//!
//! Handlers never inspect headers themselves: they take one of the extractors
//! below and receive a resolved `{user_id, role}` value or the request is
//! rejected before the handler runs.

use std::sync::Arc;

use axum::extract::{FromRef, FromRequestParts};
use http::StatusCode;
use http::header::AUTHORIZATION;
use http::request::Parts;
use uuid::Uuid;

use outpass_domain::user::UserRole;

use crate::token::validate_access_token;

/// HMAC secret used to validate bearer tokens.
///
/// Provide it from the application state with a `FromRef` impl.
#[derive(Clone)]
pub struct TokenSecret(pub Arc<str>);

impl TokenSecret {
    pub fn new(secret: impl Into<Arc<str>>) -> Self {
        Self(secret.into())
    }
}

/// Authenticated caller resolved from `Authorization: Bearer <jwt>`.
///
/// Returns 401 if the header is absent, the token does not validate, or the
/// role claim is unknown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Identity {
    pub user_id: Uuid,
    pub role: UserRole,
}

/// Caller proven to hold the `student` role. Returns 403 for staff.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StudentIdentity {
    pub user_id: Uuid,
}

/// Caller proven to hold the `staff` role. Returns 403 for students.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StaffIdentity {
    pub user_id: Uuid,
}

fn resolve(parts: &Parts, secret: &TokenSecret) -> Result<Identity, StatusCode> {
    let token = parts
        .headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.strip_prefix("Bearer "))
        .ok_or(StatusCode::UNAUTHORIZED)?;

    let info = validate_access_token(token.trim(), &secret.0).map_err(|e| {
        tracing::debug!(error = %e, "rejected bearer token");
        StatusCode::UNAUTHORIZED
    })?;
    let role = UserRole::from_u8(info.user_role).ok_or(StatusCode::UNAUTHORIZED)?;

    Ok(Identity {
        user_id: info.user_id,
        role,
    })
}

// axum-core 0.5 defines `from_request_parts` as `fn -> impl Future + Send`.
// Each impl resolves synchronously and returns a 'static async move block so the
// future never borrows `parts` or `state`.

impl<S> FromRequestParts<S> for Identity
where
    TokenSecret: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = StatusCode;

    fn from_request_parts(
        parts: &mut Parts,
        state: &S,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        let result = resolve(parts, &TokenSecret::from_ref(state));
        async move { result }
    }
}

impl<S> FromRequestParts<S> for StudentIdentity
where
    TokenSecret: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = StatusCode;

    fn from_request_parts(
        parts: &mut Parts,
        state: &S,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        let result = resolve(parts, &TokenSecret::from_ref(state));
        async move {
            let identity = result?;
            match identity.role {
                UserRole::Student => Ok(Self {
                    user_id: identity.user_id,
                }),
                UserRole::Staff => Err(StatusCode::FORBIDDEN),
            }
        }
    }
}

impl<S> FromRequestParts<S> for StaffIdentity
where
    TokenSecret: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = StatusCode;

    fn from_request_parts(
        parts: &mut Parts,
        state: &S,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        let result = resolve(parts, &TokenSecret::from_ref(state));
        async move {
            let identity = result?;
            match identity.role {
                UserRole::Staff => Ok(Self {
                    user_id: identity.user_id,
                }),
                UserRole::Student => Err(StatusCode::FORBIDDEN),
            }
        }
    }
}
