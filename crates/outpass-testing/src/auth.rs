//! Mock auth helpers for tests.
//!
//! Every protected route expects `Authorization: Bearer <jwt>`. `MockAuth` signs
//! a real token for a chosen user/role so requests pass the identity extractors
//! without going through the login flow.

use axum::http::{HeaderMap, HeaderValue, header::AUTHORIZATION};
use uuid::Uuid;

use outpass_auth_types::token::issue_access_token;
use outpass_domain::user::UserRole;

/// Secret shared by test routers and `MockAuth`.
pub const TEST_JWT_SECRET: &str = "test-jwt-secret-for-unit-tests-only";

/// Configurable identity injected into test requests.
pub struct MockAuth {
    pub user_id: Uuid,
    pub role: UserRole,
}

impl MockAuth {
    pub fn new(user_id: Uuid, role: UserRole) -> Self {
        Self { user_id, role }
    }

    pub fn student() -> Self {
        Self::new(Uuid::new_v4(), UserRole::Student)
    }

    pub fn staff() -> Self {
        Self::new(Uuid::new_v4(), UserRole::Staff)
    }

    /// Bearer token signed with [`TEST_JWT_SECRET`].
    pub fn token(&self) -> String {
        let (token, _) = issue_access_token(self.user_id, self.role.as_u8(), TEST_JWT_SECRET)
            .expect("sign test token");
        token
    }

    /// `Authorization` header value for this identity.
    pub fn authorization(&self) -> HeaderValue {
        HeaderValue::from_str(&format!("Bearer {}", self.token())).expect("valid header value")
    }

    /// Return headers as if the client had logged in.
    pub fn headers(&self) -> HeaderMap {
        let mut map = HeaderMap::new();
        map.insert(AUTHORIZATION, self.authorization());
        map
    }
}
