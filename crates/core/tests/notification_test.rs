use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use pretty_assertions::assert_eq;
use rendezvous_core::{
    models::{
        Advisor, Agency, AppointmentType, Booking, BookingStatus, CustomerDetails, WorkingHours,
    },
    notification::{
        MailParams, Notifier, VERIFICATION_TEMPLATE, advisor_notification, customer_confirmation,
        format_long_date, send_verification_code,
    },
    verification::VerificationCode,
};
use serde_test::{Token, assert_tokens};
use uuid::Uuid;

#[derive(Default)]
struct RecordingNotifier {
    accept: bool,
    sent: Mutex<Vec<(String, String, String, MailParams)>>,
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send_mail(
        &self,
        template_key: &str,
        recipient: &str,
        langcode: &str,
        params: &MailParams,
    ) -> bool {
        self.sent.lock().unwrap().push((
            template_key.to_string(),
            recipient.to_string(),
            langcode.to_string(),
            params.clone(),
        ));
        self.accept
    }
}

fn fixtures() -> (Booking, Agency, Advisor, AppointmentType) {
    let day = NaiveDate::from_ymd_opt(2025, 3, 19).unwrap();
    let agency = Agency {
        id: Uuid::new_v4(),
        name: "Lyon Part-Dieu".to_string(),
        address: "12 rue Garibaldi, Lyon".to_string(),
        contact_info: None,
        working_hours: WorkingHours::default(),
        created_at: Utc::now(),
    };
    let advisor = Advisor {
        id: Uuid::new_v4(),
        name: "Sophie Bernard".to_string(),
        email: "sophie.bernard@example.com".to_string(),
        agency_id: agency.id,
        active: true,
        working_hours: WorkingHours::default(),
        created_at: Utc::now(),
    };
    let kind = AppointmentType {
        id: Uuid::new_v4(),
        name: "Mortgage".to_string(),
    };
    let booking = Booking {
        id: Uuid::new_v4(),
        title: "Mortgage appointment on 19-03-2025 08:00".to_string(),
        agency_id: agency.id,
        advisor_id: advisor.id,
        appointment_type_id: kind.id,
        start: day.and_hms_opt(8, 0, 0).unwrap(),
        end: day.and_hms_opt(9, 30, 0).unwrap(),
        customer: CustomerDetails {
            first_name: "Claire".to_string(),
            last_name: "Durand".to_string(),
            email: "claire.durand@example.com".to_string(),
            phone: "0601020304".to_string(),
        },
        status: BookingStatus::Pending,
        notes: None,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    };
    (booking, agency, advisor, kind)
}

#[test]
fn test_long_date_format() {
    let value = NaiveDate::from_ymd_opt(2025, 3, 9)
        .unwrap()
        .and_hms_opt(8, 0, 0)
        .unwrap();

    assert_eq!(format_long_date(value), "Sunday 9 March 2025");
}

#[test]
fn test_customer_confirmation_params() {
    let (booking, agency, advisor, kind) = fixtures();

    let params = customer_confirmation(&booking, &agency, &advisor, &kind);

    assert_eq!(
        params["subject"],
        "Confirmation of your appointment on Wednesday 19 March 2025"
    );
    assert_eq!(params["start_time"], "08:00");
    assert_eq!(params["end_time"], "09:30");
    assert_eq!(params["agency_address"], "12 rue Garibaldi, Lyon");
    assert_eq!(params["advisor_name"], "Sophie Bernard");
}

#[test]
fn test_advisor_notification_params() {
    let (booking, agency, advisor, kind) = fixtures();

    let params = advisor_notification(&booking, &agency, &advisor, &kind);

    assert_eq!(
        params["subject"],
        "New appointment scheduled on Wednesday 19 March 2025"
    );
    assert_eq!(params["customer_phone"], "0601020304");
    assert_eq!(params["appointment_type"], "Mortgage");
}

#[tokio::test]
async fn test_verification_code_is_mailed() {
    let notifier = RecordingNotifier {
        accept: true,
        ..RecordingNotifier::default()
    };
    let code = VerificationCode::from("Zx9Yw8");

    let sent = send_verification_code(&notifier, "claire.durand@example.com", "fr", &code).await;

    assert!(sent);
    let sent = notifier.sent.lock().unwrap();
    assert_eq!(sent.len(), 1);
    let (template, recipient, langcode, params) = &sent[0];
    assert_eq!(template, VERIFICATION_TEMPLATE);
    assert_eq!(recipient, "claire.durand@example.com");
    assert_eq!(langcode, "fr");
    assert_eq!(params["code"], "Zx9Yw8");
}

#[tokio::test]
async fn test_rejected_mail_is_reported_not_raised() {
    let notifier = RecordingNotifier::default();

    let sent = send_verification_code(
        &notifier,
        "claire.durand@example.com",
        "en",
        &VerificationCode::from("Zx9Yw8"),
    )
    .await;

    assert!(!sent);
}

#[test]
fn test_verification_code_serializes_as_plain_string() {
    assert_tokens(&VerificationCode::from("Zx9Yw8"), &[Token::Str("Zx9Yw8")]);
}
