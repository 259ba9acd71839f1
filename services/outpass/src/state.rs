use axum::extract::FromRef;
use chrono::Duration;
use sea_orm::DatabaseConnection;

use outpass_auth_types::identity::TokenSecret;

use crate::infra::db::{DbNotificationRepository, DbOutpassRepository, DbUserRepository};

/// Shared application state passed to every handler via axum `State`.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub jwt_secret: TokenSecret,
    pub notification_ttl: Duration,
}

impl AppState {
    pub fn user_repo(&self) -> DbUserRepository {
        DbUserRepository {
            db: self.db.clone(),
        }
    }

    pub fn outpass_repo(&self) -> DbOutpassRepository {
        DbOutpassRepository {
            db: self.db.clone(),
        }
    }

    pub fn notification_repo(&self) -> DbNotificationRepository {
        DbNotificationRepository {
            db: self.db.clone(),
        }
    }
}

impl FromRef<AppState> for TokenSecret {
    fn from_ref(state: &AppState) -> Self {
        state.jwt_secret.clone()
    }
}
