#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::http::{HeaderName, HeaderValue};
use axum_test::TestServer;
use chrono::{NaiveDate, NaiveDateTime, Weekday};
use rendezvous_api::{ApiState, build_router, session::MemorySessionStore};
use rendezvous_core::models::{
    Advisor, Agency, AppointmentType, Booking, BookingStatus, CreateAdvisorRequest,
    CreateAgencyRequest, CreateAppointmentTypeRequest, CustomerDetails, HoursRule, NewBooking,
    TimeRange, WorkingHours,
};
use rendezvous_core::notification::{MailParams, Notifier, VERIFICATION_TEMPLATE};
use rendezvous_core::store::BookingStore;
use rendezvous_db::MemoryStore;

#[derive(Debug, Clone)]
pub struct SentMail {
    pub template: String,
    pub recipient: String,
    pub params: MailParams,
}

/// Notifier that keeps every message it is asked to send.
#[derive(Default)]
pub struct RecordingNotifier {
    pub sent: Mutex<Vec<SentMail>>,
}

impl RecordingNotifier {
    pub fn sent(&self) -> Vec<SentMail> {
        self.sent.lock().unwrap().clone()
    }

    pub fn last_code(&self) -> Option<String> {
        self.sent()
            .into_iter()
            .rev()
            .find(|mail| mail.template == VERIFICATION_TEMPLATE)
            .and_then(|mail| mail.params.get("code").cloned())
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send_mail(
        &self,
        template_key: &str,
        recipient: &str,
        _langcode: &str,
        params: &MailParams,
    ) -> bool {
        self.sent.lock().unwrap().push(SentMail {
            template: template_key.to_string(),
            recipient: recipient.to_string(),
            params: params.clone(),
        });
        true
    }
}

pub fn at(hour: u32, minute: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 3, 19)
        .unwrap()
        .and_hms_opt(hour, minute, 0)
        .unwrap()
}

pub fn session(id: &str) -> (HeaderName, HeaderValue) {
    (
        HeaderName::from_static("x-session-id"),
        HeaderValue::from_str(id).unwrap(),
    )
}

pub fn customer() -> CustomerDetails {
    CustomerDetails {
        first_name: "Camille".to_string(),
        last_name: "Durand".to_string(),
        email: "camille.durand@example.com".to_string(),
        phone: "0612345678".to_string(),
    }
}

/// A running router over a store holding one agency, one advisor and one
/// appointment type. The agency opens Wednesdays 08:00-18:00 and the advisor
/// works 09:00-17:00.
pub struct TestApp {
    pub server: TestServer,
    pub store: Arc<MemoryStore>,
    pub notifier: Arc<RecordingNotifier>,
    pub agency: Agency,
    pub advisor: Advisor,
    pub kind: AppointmentType,
}

impl TestApp {
    pub async fn book(&self, start: NaiveDateTime, end: NaiveDateTime) -> Booking {
        self.store
            .create_booking(NewBooking {
                title: format!(
                    "{} appointment on {}",
                    self.kind.name,
                    start.format("%d-%m-%Y %H:%M")
                ),
                agency_id: self.agency.id,
                advisor_id: self.advisor.id,
                appointment_type_id: self.kind.id,
                range: TimeRange::new(start, end).unwrap(),
                customer: customer(),
                status: BookingStatus::Pending,
            })
            .await
            .unwrap()
    }
}

pub fn wednesday(start: &str, end: &str) -> WorkingHours {
    WorkingHours::new(vec![HoursRule::parse(Weekday::Wed, start, end).unwrap()]).unwrap()
}

pub async fn spawn_app() -> TestApp {
    let store = Arc::new(MemoryStore::new());
    let notifier = Arc::new(RecordingNotifier::default());

    let agency = store
        .create_agency(CreateAgencyRequest {
            name: "Lyon Part-Dieu".to_string(),
            address: "12 rue Garibaldi, Lyon".to_string(),
            contact_info: Some("04 72 00 00 00".to_string()),
            working_hours: wednesday("08:00", "18:00"),
        })
        .await
        .unwrap();
    let advisor = store
        .create_advisor(CreateAdvisorRequest {
            name: "Sophie Bernard".to_string(),
            email: "sophie.bernard@example.com".to_string(),
            agency_id: agency.id,
            active: true,
            working_hours: wednesday("09:00", "17:00"),
        })
        .await
        .unwrap();
    let kind = store
        .create_appointment_type(CreateAppointmentTypeRequest {
            name: "Mortgage".to_string(),
        })
        .await
        .unwrap();

    let state = Arc::new(ApiState::new(
        store.clone(),
        notifier.clone(),
        Arc::new(MemorySessionStore::new(Duration::from_secs(3600))),
        "en",
    ));
    let server = TestServer::new(build_router(state)).unwrap();

    TestApp {
        server,
        store,
        notifier,
        agency,
        advisor,
        kind,
    }
}
