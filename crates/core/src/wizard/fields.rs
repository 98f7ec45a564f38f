//! Validation shared by the creation and edit wizards.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use validator::ValidateEmail;

use crate::errors::{BookingError, FieldErrors};
use crate::models::calendar::parse_calendar_time;
use crate::models::{CustomerDetails, SlotSelection, TimeRange};

/// Customer details exactly as entered on the form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CustomerForm {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub accept_terms: bool,
}

impl CustomerForm {
    /// Prefills the form from stored details; terms were accepted when booking.
    pub fn from_details(details: &CustomerDetails) -> Self {
        Self {
            first_name: details.first_name.clone(),
            last_name: details.last_name.clone(),
            email: details.email.clone(),
            phone: details.phone.clone(),
            accept_terms: true,
        }
    }

    pub fn details(&self) -> CustomerDetails {
        CustomerDetails {
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
            email: self.email.trim().to_string(),
            phone: self.phone.trim().to_string(),
        }
    }

    pub fn validate(&self) -> Result<CustomerDetails, FieldErrors> {
        let details = self.details();
        let mut errors = FieldErrors::new();

        if details.first_name.is_empty() {
            errors.push("customer_first_name", "Please enter your first name.");
        }
        if details.last_name.is_empty() {
            errors.push("customer_last_name", "Please enter your last name.");
        }
        if details.email.is_empty() {
            errors.push("customer_email", "Please enter your email address.");
        } else if !details.email.validate_email() {
            errors.push("customer_email", "Please enter a valid email address.");
        }
        if details.phone.is_empty() {
            errors.push("customer_phone", "Please enter your phone number.");
        } else if !is_digits(&details.phone) {
            errors.push(
                "customer_phone",
                "Please enter a valid phone number (numbers only).",
            );
        }
        if !self.accept_terms {
            errors.push("accept_terms", "Please accept the terms and conditions.");
        }

        errors.into_result().map(|_| details)
    }
}

pub fn is_digits(value: &str) -> bool {
    !value.is_empty() && value.chars().all(|c| c.is_ascii_digit())
}

/// Turns the calendar's two hidden fields into a same-day range.
pub fn validate_slot(selection: &SlotSelection) -> Result<TimeRange, FieldErrors> {
    let start = required_time(
        selection.start_str.as_deref(),
        "start_date",
        "Please select a start date and time.",
    )?;
    let end = required_time(
        selection.end_str.as_deref(),
        "end_date",
        "Please select an end date and time.",
    )?;
    TimeRange::new(start, end).map_err(|e| {
        let message = match e {
            BookingError::Validation(message) => message,
            other => other.to_string(),
        };
        FieldErrors::single("end_date", &message)
    })
}

fn required_time(
    value: Option<&str>,
    field: &str,
    missing: &str,
) -> Result<NaiveDateTime, FieldErrors> {
    let value = value.map(str::trim).filter(|v| !v.is_empty());
    let Some(value) = value else {
        return Err(FieldErrors::single(field, missing));
    };
    parse_calendar_time(value)
        .ok_or_else(|| FieldErrors::single(field, "Please select a valid date and time."))
}
