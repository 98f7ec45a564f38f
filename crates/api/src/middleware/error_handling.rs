//! # Error Handling Middleware
//!
//! Maps [`BookingError`] values to HTTP status codes and JSON bodies so every
//! handler reports failures the same way.
//!
//! | error | status |
//! |---|---|
//! | `NotFound` | 404 |
//! | `Validation` | 400 |
//! | `InvalidFields` | 422, with a `fields` array |
//! | `Verification` | 401 |
//! | `Conflict` | 409 |
//! | `Database`, `Internal` | 500 |

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use rendezvous_core::errors::BookingError;
use serde_json::json;

/// Application error wrapper that provides HTTP status code mapping
///
/// # Example
///
/// ```
/// use axum::Json;
/// use rendezvous_api::middleware::error_handling::AppError;
/// use rendezvous_core::errors::BookingError;
///
/// async fn handler(found: bool) -> Result<Json<&'static str>, AppError> {
///     if !found {
///         return Err(AppError(BookingError::NotFound("Agency not found".to_string())));
///     }
///     Ok(Json("ok"))
/// }
/// # fn main() {}
/// ```
#[derive(Debug)]
pub struct AppError(pub BookingError);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            BookingError::NotFound(_) => StatusCode::NOT_FOUND,
            BookingError::Validation(_) => StatusCode::BAD_REQUEST,
            BookingError::InvalidFields(_) => StatusCode::UNPROCESSABLE_ENTITY,
            BookingError::Verification(_) => StatusCode::UNAUTHORIZED,
            BookingError::Conflict(_) => StatusCode::CONFLICT,
            BookingError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            BookingError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = match &self.0 {
            BookingError::InvalidFields(fields) => Json(json!({
                "error": self.0.to_string(),
                "fields": fields,
            })),
            other => Json(json!({ "error": other.to_string() })),
        };

        (status, body).into_response()
    }
}

/// Allows `?` on `BookingResult` inside handlers.
impl From<BookingError> for AppError {
    fn from(err: BookingError) -> Self {
        AppError(err)
    }
}

impl From<eyre::Report> for AppError {
    fn from(err: eyre::Report) -> Self {
        AppError(BookingError::Database(err))
    }
}

/// Maps a BookingError to an HTTP response
pub fn map_error(err: BookingError) -> Response {
    AppError(err).into_response()
}
