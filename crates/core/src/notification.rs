//! # Notifications
//!
//! Builds the appointment emails and hands them to a [`Notifier`]. Mail
//! delivery is best effort: failures are logged and reported as `false`,
//! never as errors, so they cannot roll back a booking.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::NaiveDateTime;
use tracing::{error, info};
use uuid::Uuid;

use crate::errors::{BookingError, BookingResult};
use crate::models::{Advisor, Agency, AppointmentType, Booking};
use crate::store::BookingStore;
use crate::verification::VerificationCode;

pub const CONFIRMATION_TEMPLATE: &str = "appointment_confirmation";
pub const VERIFICATION_TEMPLATE: &str = "verification_code";

pub type MailParams = BTreeMap<String, String>;

/// Outgoing mail transport.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Returns whether the transport accepted the message.
    async fn send_mail(
        &self,
        template_key: &str,
        recipient: &str,
        langcode: &str,
        params: &MailParams,
    ) -> bool;
}

/// Long date used in subjects and bodies, e.g. "Wednesday 19 March 2025".
pub fn format_long_date(value: NaiveDateTime) -> String {
    value.format("%A %-d %B %Y").to_string()
}

pub fn format_clock(value: NaiveDateTime) -> String {
    value.format("%H:%M").to_string()
}

pub fn customer_confirmation(
    booking: &Booking,
    agency: &Agency,
    advisor: &Advisor,
    kind: &AppointmentType,
) -> MailParams {
    let date = format_long_date(booking.start);
    let mut params = MailParams::new();
    params.insert(
        "subject".into(),
        format!("Confirmation of your appointment on {}", date),
    );
    params.insert("first_name".into(), booking.customer.first_name.clone());
    params.insert("last_name".into(), booking.customer.last_name.clone());
    params.insert("date".into(), date);
    params.insert("start_time".into(), format_clock(booking.start));
    params.insert("end_time".into(), format_clock(booking.end));
    params.insert("agency_name".into(), agency.name.clone());
    params.insert("agency_address".into(), agency.address.clone());
    params.insert("advisor_name".into(), advisor.name.clone());
    params.insert("appointment_type".into(), kind.name.clone());
    params
}

pub fn advisor_notification(
    booking: &Booking,
    agency: &Agency,
    advisor: &Advisor,
    kind: &AppointmentType,
) -> MailParams {
    let date = format_long_date(booking.start);
    let mut params = MailParams::new();
    params.insert(
        "subject".into(),
        format!("New appointment scheduled on {}", date),
    );
    params.insert("advisor_name".into(), advisor.name.clone());
    params.insert(
        "customer_first_name".into(),
        booking.customer.first_name.clone(),
    );
    params.insert(
        "customer_last_name".into(),
        booking.customer.last_name.clone(),
    );
    params.insert("customer_email".into(), booking.customer.email.clone());
    params.insert("customer_phone".into(), booking.customer.phone.clone());
    params.insert("date".into(), date);
    params.insert("start_time".into(), format_clock(booking.start));
    params.insert("end_time".into(), format_clock(booking.end));
    params.insert("agency_name".into(), agency.name.clone());
    params.insert("appointment_type".into(), kind.name.clone());
    params
}

pub fn verification_message(code: &VerificationCode) -> MailParams {
    let mut params = MailParams::new();
    params.insert(
        "subject".into(),
        "Your appointment verification code".to_string(),
    );
    params.insert("code".into(), code.as_str().to_string());
    params
}

/// Sends the customer confirmation and the advisor notification for a
/// stored booking. Returns `true` only if both were accepted.
pub async fn send_confirmation_emails<S, N>(
    store: &S,
    notifier: &N,
    booking_id: Uuid,
    langcode: &str,
) -> bool
where
    S: BookingStore + ?Sized,
    N: Notifier + ?Sized,
{
    match try_send_confirmation_emails(store, notifier, booking_id, langcode).await {
        Ok(sent) => sent,
        Err(e) => {
            error!("Error sending appointment emails: {}", e);
            false
        }
    }
}

async fn try_send_confirmation_emails<S, N>(
    store: &S,
    notifier: &N,
    booking_id: Uuid,
    langcode: &str,
) -> BookingResult<bool>
where
    S: BookingStore + ?Sized,
    N: Notifier + ?Sized,
{
    let booking = store.get_booking(booking_id).await?.ok_or_else(|| {
        BookingError::NotFound(format!("Appointment {} not found", booking_id))
    })?;
    let agency = store.get_agency(booking.agency_id).await?.ok_or_else(|| {
        BookingError::NotFound(format!("Agency {} not found", booking.agency_id))
    })?;
    let advisor = store.get_advisor(booking.advisor_id).await?.ok_or_else(|| {
        BookingError::NotFound(format!("Advisor {} not found", booking.advisor_id))
    })?;
    let kind = store
        .get_appointment_type(booking.appointment_type_id)
        .await?
        .ok_or_else(|| {
            BookingError::NotFound(format!(
                "Appointment type {} not found",
                booking.appointment_type_id
            ))
        })?;

    info!(
        "Sending confirmation emails for appointment {} to {} and {}",
        booking.id, booking.customer.email, advisor.email
    );

    let customer_sent = notifier
        .send_mail(
            CONFIRMATION_TEMPLATE,
            &booking.customer.email,
            langcode,
            &customer_confirmation(&booking, &agency, &advisor, &kind),
        )
        .await;
    if !customer_sent {
        error!("Failed to send email to {}", booking.customer.email);
    }

    let advisor_sent = notifier
        .send_mail(
            CONFIRMATION_TEMPLATE,
            &advisor.email,
            langcode,
            &advisor_notification(&booking, &agency, &advisor, &kind),
        )
        .await;
    if !advisor_sent {
        error!("Failed to send email to {}", advisor.email);
    }

    Ok(customer_sent && advisor_sent)
}

/// Mails the verification code to `recipient`.
pub async fn send_verification_code<N>(
    notifier: &N,
    recipient: &str,
    langcode: &str,
    code: &VerificationCode,
) -> bool
where
    N: Notifier + ?Sized,
{
    let sent = notifier
        .send_mail(
            VERIFICATION_TEMPLATE,
            recipient,
            langcode,
            &verification_message(code),
        )
        .await;
    if !sent {
        error!("Failed to send verification code to {}", recipient);
    }
    sent
}
