pub mod auth;
pub mod health;
pub mod notification;
pub mod outpass;

use axum::extract::FromRequest;

use crate::error::OutpassServiceError;

/// `Json` whose rejections render as [`OutpassServiceError::InvalidBody`].
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(OutpassServiceError))]
pub struct JsonBody<T>(pub T);
