use std::sync::Arc;
use std::time::Duration;

use chrono::{NaiveDate, NaiveDateTime, Utc};
use mockall::predicate::eq;
use pretty_assertions::assert_eq;
use rendezvous_api::mailer::LogMailer;
use rendezvous_api::service::{RETRY_MESSAGE, WizardService};
use rendezvous_api::session::MemorySessionStore;
use rendezvous_core::errors::BookingError;
use rendezvous_core::models::{
    AppointmentType, Booking, BookingStatus, CreateAppointmentTypeRequest, CustomerDetails,
};
use rendezvous_core::store::{BookingStore, DraftKey, load_draft, save_draft};
use rendezvous_core::wizard::{
    BOOKING_WIZARD_ID, BookingDraft, BookingStep, CustomerForm, StepInput,
};
use rendezvous_db::MemoryStore;
use rendezvous_db::mock::{MockMailer, MockStore};
use uuid::Uuid;

fn at(hour: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 3, 19)
        .unwrap()
        .and_hms_opt(hour, 0, 0)
        .unwrap()
}

fn customer_form() -> CustomerForm {
    CustomerForm {
        first_name: "Camille".to_string(),
        last_name: "Durand".to_string(),
        email: "camille.durand@example.com".to_string(),
        phone: "0612345678".to_string(),
        accept_terms: true,
    }
}

fn review_draft(kind_id: Uuid) -> BookingDraft {
    BookingDraft {
        step: BookingStep::Review,
        agency_id: Some(Uuid::new_v4()),
        appointment_type_id: Some(kind_id),
        advisor_id: Some(Uuid::new_v4()),
        start: Some(at(10)),
        end: Some(at(11)),
        customer: customer_form(),
    }
}

fn mortgage(id: Uuid) -> AppointmentType {
    AppointmentType {
        id,
        name: "Mortgage".to_string(),
    }
}

fn sessions() -> Arc<MemorySessionStore> {
    Arc::new(MemorySessionStore::new(Duration::from_secs(3600)))
}

#[test_log::test(tokio::test)]
async fn test_database_failure_on_submit_keeps_the_review() {
    let kind_id = Uuid::new_v4();
    let mut store = MockStore::new();
    store
        .expect_get_appointment_type()
        .with(eq(kind_id))
        .returning(move |id| Ok(Some(mortgage(id))));
    store
        .expect_create_booking()
        .times(1)
        .returning(|_| Err(BookingError::Database(eyre::eyre!("connection reset"))));

    let sessions = sessions();
    let key = DraftKey::new("s1", BOOKING_WIZARD_ID);
    save_draft(&*sessions, &key, &review_draft(kind_id))
        .await
        .unwrap();
    let service = WizardService::new(Arc::new(store), Arc::new(LogMailer), sessions.clone(), "en");

    let err = service.submit("s1").await.unwrap_err();

    assert!(matches!(err, BookingError::Internal(_)));
    assert!(err.to_string().contains(RETRY_MESSAGE));
    let kept: BookingDraft = load_draft(&*sessions, &key).await.unwrap().unwrap();
    assert_eq!(kept.step, BookingStep::Review);
}

#[test_log::test(tokio::test)]
async fn test_conflict_on_submit_is_reported_as_is() {
    let kind_id = Uuid::new_v4();
    let mut store = MockStore::new();
    store
        .expect_get_appointment_type()
        .returning(move |id| Ok(Some(mortgage(id))));
    store.expect_create_booking().returning(|_| {
        Err(BookingError::Conflict(
            "This time slot is no longer available.".to_string(),
        ))
    });

    let sessions = sessions();
    save_draft(
        &*sessions,
        &DraftKey::new("s1", BOOKING_WIZARD_ID),
        &review_draft(kind_id),
    )
    .await
    .unwrap();
    let service = WizardService::new(Arc::new(store), Arc::new(LogMailer), sessions, "en");

    let err = service.submit("s1").await.unwrap_err();

    assert!(matches!(err, BookingError::Conflict(_)));
}

#[test_log::test(tokio::test)]
async fn test_unknown_agency_is_not_stored() {
    let mut store = MockStore::new();
    store.expect_get_agency().returning(|_| Ok(None));

    let sessions = sessions();
    let service = WizardService::new(Arc::new(store), Arc::new(LogMailer), sessions.clone(), "en");

    let err = service
        .next(
            "s1",
            StepInput::Agency {
                selected_agency: Some(Uuid::new_v4()),
            },
        )
        .await
        .unwrap_err();

    match err {
        BookingError::NotFound(message) => {
            assert_eq!(message, "The selected agency is invalid.")
        }
        other => panic!("unexpected error: {other}"),
    }
    let stored: Option<BookingDraft> =
        load_draft(&*sessions, &DraftKey::new("s1", BOOKING_WIZARD_ID))
            .await
            .unwrap();
    assert!(stored.is_none());
}

#[test_log::test(tokio::test)]
async fn test_store_failure_while_listing_options_propagates() {
    let mut store = MockStore::new();
    store
        .expect_list_agencies()
        .with(eq(None::<String>))
        .returning(|_| Err(BookingError::Database(eyre::eyre!("pool timed out"))));

    let service = WizardService::new(Arc::new(store), Arc::new(LogMailer), sessions(), "en");

    let err = service.view("s1").await.unwrap_err();

    assert!(matches!(err, BookingError::Database(_)));
}

#[test_log::test(tokio::test)]
async fn test_failed_mail_does_not_block_verification_step() {
    let booking = Booking {
        id: Uuid::new_v4(),
        title: "Mortgage appointment on 19-03-2025 10:00".to_string(),
        agency_id: Uuid::new_v4(),
        advisor_id: Uuid::new_v4(),
        appointment_type_id: Uuid::new_v4(),
        start: at(10),
        end: at(11),
        customer: CustomerDetails {
            first_name: "Camille".to_string(),
            last_name: "Durand".to_string(),
            email: "camille.durand@example.com".to_string(),
            phone: "0612345678".to_string(),
        },
        status: BookingStatus::Pending,
        notes: None,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    };
    let id = booking.id;

    let mut store = MockStore::new();
    store
        .expect_get_booking()
        .with(eq(id))
        .returning(move |_| Ok(Some(booking.clone())));
    let mut mailer = MockMailer::new();
    mailer
        .expect_send_mail()
        .withf(|template, recipient, _, params| {
            template == "verification_code"
                && recipient == "camille.durand@example.com"
                && params.contains_key("code")
        })
        .times(1)
        .returning(|_, _, _, _| false);

    let service = WizardService::new(Arc::new(store), Arc::new(mailer), sessions(), "en");

    let view = service.start_edit("s1", id).await.unwrap();

    assert_eq!(
        view.message.as_deref(),
        Some("The verification code could not be sent. Please try again later.")
    );
}

#[test_log::test(tokio::test)]
async fn test_failed_confirmation_mail_still_books() {
    let store = Arc::new(MemoryStore::new());
    let kind = store
        .create_appointment_type(CreateAppointmentTypeRequest {
            name: "Mortgage".to_string(),
        })
        .await
        .unwrap();

    // Agency and advisor are unknown to the store, so the confirmation mails
    // cannot be assembled; the booking itself must still go through.
    let mut mailer = MockMailer::new();
    mailer.expect_send_mail().never();

    let sessions = sessions();
    save_draft(
        &*sessions,
        &DraftKey::new("s1", BOOKING_WIZARD_ID),
        &review_draft(kind.id),
    )
    .await
    .unwrap();
    let service = WizardService::new(store, Arc::new(mailer), sessions, "en");

    let view = service.submit("s1").await.unwrap();

    assert_eq!(view.step, BookingStep::Success);
    assert!(view.booking_id.is_some());
}
