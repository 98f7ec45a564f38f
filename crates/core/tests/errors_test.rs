use std::error::Error;
use rendezvous_core::errors::{BookingError, BookingResult, FieldErrors};

#[test]
fn test_booking_error_display() {
    let not_found = BookingError::NotFound("Agency not found".to_string());
    let validation = BookingError::Validation("Invalid input".to_string());
    let verification = BookingError::Verification("Wrong code".to_string());
    let conflict = BookingError::Conflict("Slot taken".to_string());
    let database = BookingError::Database(eyre::eyre!("Database connection failed"));
    let internal = BookingError::Internal(Box::new(std::io::Error::new(
        std::io::ErrorKind::Other,
        "Internal error",
    )));

    assert_eq!(
        not_found.to_string(),
        "Resource not found: Agency not found"
    );
    assert_eq!(validation.to_string(), "Validation error: Invalid input");
    assert_eq!(verification.to_string(), "Verification error: Wrong code");
    assert_eq!(conflict.to_string(), "Conflict: Slot taken");
    assert!(database.to_string().contains("Database error:"));
    assert!(internal.to_string().contains("Internal server error:"));
}

#[test]
fn test_field_errors_display_joins_messages() {
    let mut errors = FieldErrors::new();
    errors.push("customer_first_name", "Please enter your first name.");
    errors.push("customer_phone", "Please enter your phone number.");

    let error = BookingError::from(errors);

    assert_eq!(
        error.to_string(),
        "Invalid input: Please enter your first name. Please enter your phone number."
    );
}

#[test]
fn test_field_errors_lookup() {
    let errors = FieldErrors::single("selected_agency", "Please select an agency.");

    assert_eq!(errors.iter().count(), 1);
    assert_eq!(
        errors.message_for("selected_agency"),
        Some("Please select an agency.")
    );
    assert_eq!(errors.message_for("selected_type"), None);
    assert!(FieldErrors::new().into_result().is_ok());
}

#[test]
fn test_error_conversion() {
    let io_error = std::io::Error::new(std::io::ErrorKind::Other, "IO error");
    let booking_error = BookingError::Internal(Box::new(io_error));

    assert!(booking_error.source().is_some());
}

#[test]
fn test_booking_result() {
    let result: BookingResult<i32> = Ok(42);
    assert_eq!(result.unwrap(), 42);

    let result: BookingResult<i32> = Err(BookingError::NotFound("Not found".to_string()));
    assert!(result.is_err());
}

#[test]
fn test_from_eyre_report() {
    let booking_error: BookingError = eyre::eyre!("Database error").into();

    assert!(matches!(booking_error, BookingError::Database(_)));
    assert!(booking_error.to_string().contains("Database error"));
}
