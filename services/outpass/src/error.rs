use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Coarse error class each variant belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    Validation,
    Conflict,
    NotFound,
    Forbidden,
    Store,
}

/// Outpass service domain error variants.
#[derive(Debug, thiserror::Error)]
pub enum OutpassServiceError {
    // validation
    #[error("all fields required")]
    MissingFields,
    #[error("invalid date format")]
    InvalidDateFormat,
    #[error("invalid request body: {0}")]
    InvalidBody(String),
    #[error("only pending outpass can be cancelled")]
    NotPending,
    #[error("outpass not approved")]
    NotApproved,
    #[error("already marked as reached")]
    AlreadyReached,
    #[error("phone number is required")]
    PhoneRequired,
    #[error("phone number already added")]
    PhoneAlreadySet,
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("user already exists")]
    UserAlreadyExists,
    #[error("notification already expired")]
    NotificationExpired,

    // conflict
    #[error("you already have a pending outpass")]
    DuplicatePending,
    #[error("already processed")]
    AlreadyProcessed,

    // not found
    #[error("outpass not found")]
    OutpassNotFound,
    #[error("user not found")]
    UserNotFound,
    #[error("notification not found")]
    NotificationNotFound,

    #[error("forbidden")]
    Forbidden,
    #[error("internal error")]
    Internal(#[from] anyhow::Error),
}

impl OutpassServiceError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::MissingFields => "MISSING_FIELDS",
            Self::InvalidDateFormat => "INVALID_DATE_FORMAT",
            Self::InvalidBody(_) => "INVALID_BODY",
            Self::NotPending => "NOT_PENDING",
            Self::NotApproved => "NOT_APPROVED",
            Self::AlreadyReached => "ALREADY_REACHED",
            Self::PhoneRequired => "PHONE_REQUIRED",
            Self::PhoneAlreadySet => "PHONE_ALREADY_SET",
            Self::InvalidCredentials => "INVALID_CREDENTIALS",
            Self::UserAlreadyExists => "USER_ALREADY_EXISTS",
            Self::NotificationExpired => "NOTIFICATION_EXPIRED",
            Self::DuplicatePending => "DUPLICATE_PENDING",
            Self::AlreadyProcessed => "ALREADY_PROCESSED",
            Self::OutpassNotFound => "OUTPASS_NOT_FOUND",
            Self::UserNotFound => "USER_NOT_FOUND",
            Self::NotificationNotFound => "NOTIFICATION_NOT_FOUND",
            Self::Forbidden => "FORBIDDEN",
            Self::Internal(_) => "INTERNAL",
        }
    }

    pub fn class(&self) -> ErrorClass {
        match self {
            Self::MissingFields
            | Self::InvalidDateFormat
            | Self::InvalidBody(_)
            | Self::NotPending
            | Self::NotApproved
            | Self::AlreadyReached
            | Self::PhoneRequired
            | Self::PhoneAlreadySet
            | Self::InvalidCredentials
            | Self::UserAlreadyExists
            | Self::NotificationExpired => ErrorClass::Validation,
            Self::DuplicatePending | Self::AlreadyProcessed => ErrorClass::Conflict,
            Self::OutpassNotFound | Self::UserNotFound | Self::NotificationNotFound => {
                ErrorClass::NotFound
            }
            Self::Forbidden => ErrorClass::Forbidden,
            Self::Internal(_) => ErrorClass::Store,
        }
    }
}

impl From<JsonRejection> for OutpassServiceError {
    fn from(rejection: JsonRejection) -> Self {
        Self::InvalidBody(rejection.body_text())
    }
}

impl IntoResponse for OutpassServiceError {
    fn into_response(self) -> Response {
        // Conflicts share 400 with validation errors on the wire.
        let status = match self.class() {
            ErrorClass::Validation | ErrorClass::Conflict => StatusCode::BAD_REQUEST,
            ErrorClass::NotFound => StatusCode::NOT_FOUND,
            ErrorClass::Forbidden => StatusCode::FORBIDDEN,
            ErrorClass::Store => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if let Self::Internal(ref e) = self {
            tracing::error!(error = %format!("{e:#}"), kind = "INTERNAL", "internal error");
        }
        let body = serde_json::json!({
            "kind": self.kind(),
            "message": self.to_string(),
        });
        (status, axum::Json(body)).into_response()
    }
}
