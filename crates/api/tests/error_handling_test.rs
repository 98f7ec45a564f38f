use axum::body::to_bytes;
use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use rendezvous_api::middleware::error_handling::map_error;
use rendezvous_core::errors::{BookingError, FieldErrors};
use rstest::rstest;
use serde_json::Value;

#[rstest]
#[case(BookingError::NotFound("Agency not found".to_string()), StatusCode::NOT_FOUND)]
#[case(
    BookingError::Validation("Missing x-session-id header".to_string()),
    StatusCode::BAD_REQUEST
)]
#[case(
    BookingError::InvalidFields(FieldErrors::single("selected_agency", "Please select an agency.")),
    StatusCode::UNPROCESSABLE_ENTITY
)]
#[case(
    BookingError::Verification("The verification code is incorrect.".to_string()),
    StatusCode::UNAUTHORIZED
)]
#[case(
    BookingError::Conflict("This time slot is no longer available.".to_string()),
    StatusCode::CONFLICT
)]
#[case(BookingError::Database(eyre::eyre!("Database error")), StatusCode::INTERNAL_SERVER_ERROR)]
#[case(
    BookingError::Internal(Box::new(std::io::Error::other("Internal error"))),
    StatusCode::INTERNAL_SERVER_ERROR
)]
fn test_error_status(#[case] error: BookingError, #[case] expected: StatusCode) {
    let response = map_error(error);

    assert_eq!(response.status(), expected);
}

#[tokio::test]
async fn test_field_errors_are_listed_in_the_body() {
    let mut errors = FieldErrors::new();
    errors.push("customer_first_name", "Please enter your first name.");
    errors.push("accept_terms", "Please accept the terms and conditions.");

    let response = map_error(BookingError::InvalidFields(errors));
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();

    assert_eq!(
        body["error"],
        "Invalid input: Please enter your first name. Please accept the terms and conditions."
    );
    assert_eq!(body["fields"][1]["field"], "accept_terms");
}

#[tokio::test]
async fn test_conflict_message_is_returned() {
    let response = map_error(BookingError::Conflict(
        "This time slot is no longer available.".to_string(),
    ));
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();

    assert_eq!(body["error"], "Conflict: This time slot is no longer available.");
}
