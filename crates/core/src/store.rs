//! Collaborator traits for persistence and per-session draft storage.

use async_trait::async_trait;
use serde::{Serialize, de::DeserializeOwned};
use uuid::Uuid;

use crate::errors::{BookingError, BookingResult};
use crate::models::{
    Advisor, Agency, AppointmentType, Booking, BookingFilter, BookingStatus,
    CreateAdvisorRequest, CreateAgencyRequest, CreateAppointmentTypeRequest, NewBooking,
};

/// Record store for agencies, advisors, appointment types and bookings.
///
/// Implementations must reject, with [`BookingError::Conflict`], a booking
/// that overlaps a non-cancelled booking of the same advisor.
#[async_trait]
pub trait BookingStore: Send + Sync {
    /// Agencies ordered by name, optionally filtered by a name fragment.
    async fn list_agencies(&self, name: Option<String>) -> BookingResult<Vec<Agency>>;

    async fn get_agency(&self, id: Uuid) -> BookingResult<Option<Agency>>;

    async fn create_agency(&self, request: CreateAgencyRequest) -> BookingResult<Agency>;

    async fn get_advisor(&self, id: Uuid) -> BookingResult<Option<Advisor>>;

    /// Active advisors attached to `agency_id`.
    async fn list_active_advisors(&self, agency_id: Uuid) -> BookingResult<Vec<Advisor>>;

    async fn create_advisor(&self, request: CreateAdvisorRequest) -> BookingResult<Advisor>;

    async fn list_appointment_types(&self) -> BookingResult<Vec<AppointmentType>>;

    async fn get_appointment_type(&self, id: Uuid) -> BookingResult<Option<AppointmentType>>;

    async fn create_appointment_type(
        &self,
        request: CreateAppointmentTypeRequest,
    ) -> BookingResult<AppointmentType>;

    async fn get_booking(&self, id: Uuid) -> BookingResult<Option<Booking>>;

    /// Bookings held with `advisor_id` at `agency_id`, any status.
    async fn list_advisor_bookings(
        &self,
        agency_id: Uuid,
        advisor_id: Uuid,
    ) -> BookingResult<Vec<Booking>>;

    /// Bookings whose customer phone equals `phone`, newest first.
    async fn find_bookings_by_phone(&self, phone: &str) -> BookingResult<Vec<Booking>>;

    /// Bookings matching `filter`, ordered by title.
    async fn list_bookings(&self, filter: &BookingFilter) -> BookingResult<Vec<Booking>>;

    async fn create_booking(&self, booking: NewBooking) -> BookingResult<Booking>;

    /// Saves every mutable field of an existing booking.
    async fn save_booking(&self, booking: &Booking) -> BookingResult<Booking>;

    async fn set_booking_status(&self, id: Uuid, status: BookingStatus) -> BookingResult<Booking>;
}

/// Identifies one wizard's draft within one user session.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DraftKey {
    pub session_id: String,
    pub wizard_id: &'static str,
}

impl DraftKey {
    pub fn new(session_id: impl Into<String>, wizard_id: &'static str) -> Self {
        Self {
            session_id: session_id.into(),
            wizard_id,
        }
    }
}

/// Transient per-session storage of wizard drafts.
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn get(&self, key: &DraftKey) -> BookingResult<Option<serde_json::Value>>;

    async fn set(&self, key: &DraftKey, value: serde_json::Value) -> BookingResult<()>;

    async fn delete(&self, key: &DraftKey) -> BookingResult<()>;
}

/// Loads a typed draft, treating a value that no longer decodes as absent.
pub async fn load_draft<T, S>(store: &S, key: &DraftKey) -> BookingResult<Option<T>>
where
    T: DeserializeOwned,
    S: SessionStore + ?Sized,
{
    match store.get(key).await? {
        Some(value) => match serde_json::from_value(value) {
            Ok(draft) => Ok(Some(draft)),
            Err(e) => {
                tracing::warn!("Discarding undecodable draft for {:?}: {}", key, e);
                Ok(None)
            }
        },
        None => Ok(None),
    }
}

pub async fn save_draft<T, S>(store: &S, key: &DraftKey, draft: &T) -> BookingResult<()>
where
    T: Serialize,
    S: SessionStore + ?Sized,
{
    let value = serde_json::to_value(draft)
        .map_err(|e| BookingError::Internal(Box::new(e)))?;
    store.set(key, value).await
}
