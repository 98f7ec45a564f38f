//! Runs against a real database:
//! `DATABASE_URL=postgres://... cargo test -p rendezvous-db -- --ignored`

use chrono::{NaiveDate, NaiveDateTime, Weekday};
use pretty_assertions::assert_eq;
use rendezvous_core::errors::BookingError;
use rendezvous_core::models::{
    Advisor, Agency, AppointmentType, BookingStatus, CreateAdvisorRequest, CreateAgencyRequest,
    CreateAppointmentTypeRequest, CustomerDetails, HoursRule, NewBooking, TimeRange,
    WorkingHours,
};
use rendezvous_core::store::BookingStore;
use rendezvous_db::schema::initialize_database;
use rendezvous_db::{PgStore, create_pool};
use tokio::sync::OnceCell;
use uuid::Uuid;

static SCHEMA: OnceCell<()> = OnceCell::const_new();

fn at(hour: u32, minute: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 3, 19)
        .unwrap()
        .and_hms_opt(hour, minute, 0)
        .unwrap()
}

struct Fixture {
    store: PgStore,
    agency: Agency,
    advisor: Advisor,
    kind: AppointmentType,
}

impl Fixture {
    fn booking(&self, start: NaiveDateTime, end: NaiveDateTime) -> NewBooking {
        NewBooking {
            title: format!("Pg appointment {}", Uuid::new_v4()),
            agency_id: self.agency.id,
            advisor_id: self.advisor.id,
            appointment_type_id: self.kind.id,
            range: TimeRange::new(start, end).unwrap(),
            customer: CustomerDetails {
                first_name: "Camille".to_string(),
                last_name: "Durand".to_string(),
                email: "camille.durand@example.com".to_string(),
                phone: "0612345678".to_string(),
            },
            status: BookingStatus::Pending,
        }
    }
}

// Every fixture gets its own advisor, so tests never see each other's bookings.
async fn fixture() -> Fixture {
    let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let pool = create_pool(&url).await.unwrap();
    SCHEMA
        .get_or_init(|| async { initialize_database(&pool).await.unwrap() })
        .await;

    let store = PgStore::new(pool);
    let hours = WorkingHours::new(vec![
        HoursRule::parse(Weekday::Wed, "08:00", "18:00").unwrap(),
    ])
    .unwrap();
    let agency = store
        .create_agency(CreateAgencyRequest {
            name: format!("Agency {}", Uuid::new_v4()),
            address: "12 rue Garibaldi, Lyon".to_string(),
            contact_info: None,
            working_hours: hours.clone(),
        })
        .await
        .unwrap();
    let advisor = store
        .create_advisor(CreateAdvisorRequest {
            name: "Sophie Bernard".to_string(),
            email: "sophie.bernard@example.com".to_string(),
            agency_id: agency.id,
            active: true,
            working_hours: hours,
        })
        .await
        .unwrap();
    let kind = store
        .create_appointment_type(CreateAppointmentTypeRequest {
            name: format!("Mortgage {}", Uuid::new_v4()),
        })
        .await
        .unwrap();

    Fixture {
        store,
        agency,
        advisor,
        kind,
    }
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn test_overlapping_booking_is_a_conflict() {
    let fx = fixture().await;
    fx.store
        .create_booking(fx.booking(at(10, 0), at(11, 0)))
        .await
        .unwrap();

    let err = fx
        .store
        .create_booking(fx.booking(at(10, 30), at(11, 30)))
        .await
        .unwrap_err();
    assert!(matches!(err, BookingError::Conflict(_)));

    // Touching ranges do not overlap
    fx.store
        .create_booking(fx.booking(at(11, 0), at(12, 0)))
        .await
        .unwrap();
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn test_concurrent_bookings_only_one_wins() {
    let fx = fixture().await;
    let (store_a, store_b) = (fx.store.clone(), fx.store.clone());
    let (first, second) = (fx.booking(at(14, 0), at(15, 0)), fx.booking(at(14, 0), at(15, 0)));

    let (a, b) = tokio::join!(
        tokio::spawn(async move { store_a.create_booking(first).await }),
        tokio::spawn(async move { store_b.create_booking(second).await }),
    );
    let results = [a.unwrap(), b.unwrap()];

    assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
    assert!(
        results
            .iter()
            .any(|r| matches!(r, Err(BookingError::Conflict(_))))
    );
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn test_cancelled_and_edited_bookings_release_their_slot() {
    let fx = fixture().await;
    let first = fx
        .store
        .create_booking(fx.booking(at(9, 0), at(10, 0)))
        .await
        .unwrap();

    // Moving a booking over its own old range is allowed
    let mut moved = first.clone();
    moved.start = at(9, 30);
    moved.end = at(10, 30);
    let saved = fx.store.save_booking(&moved).await.unwrap();
    assert_eq!(saved.start, at(9, 30));

    fx.store
        .set_booking_status(first.id, BookingStatus::Cancelled)
        .await
        .unwrap();
    fx.store
        .create_booking(fx.booking(at(9, 30), at(10, 30)))
        .await
        .unwrap();
}
