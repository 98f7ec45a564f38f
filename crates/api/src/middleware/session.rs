//! # Session Identification
//!
//! Wizard drafts are scoped to the caller's session, identified by the
//! `x-session-id` request header.

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use rendezvous_core::errors::BookingError;

use super::error_handling::AppError;

pub const SESSION_HEADER: &str = "x-session-id";

const MAX_SESSION_ID_LENGTH: usize = 128;

/// The caller's session id, extracted from the `x-session-id` header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionId(pub String);

#[async_trait]
impl<S> FromRequestParts<S> for SessionId
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let value = parts
            .headers
            .get(SESSION_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .ok_or_else(|| {
                AppError(BookingError::Validation(format!(
                    "Missing {} header",
                    SESSION_HEADER
                )))
            })?;

        if value.len() > MAX_SESSION_ID_LENGTH {
            return Err(AppError(BookingError::Validation(format!(
                "The {} header is too long",
                SESSION_HEADER
            ))));
        }

        Ok(SessionId(value.to_string()))
    }
}
