//! In-memory [`BookingStore`] for tests and local runs without Postgres.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use rendezvous_core::errors::{BookingError, BookingResult};
use rendezvous_core::models::{
    Advisor, Agency, AppointmentType, Booking, BookingFilter, BookingStatus, CreateAdvisorRequest,
    CreateAgencyRequest, CreateAppointmentTypeRequest, NewBooking,
};
use rendezvous_core::store::BookingStore;
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Default)]
struct Records {
    agencies: HashMap<Uuid, Agency>,
    advisors: HashMap<Uuid, Advisor>,
    appointment_types: HashMap<Uuid, AppointmentType>,
    bookings: HashMap<Uuid, Booking>,
}

impl Records {
    fn overlapping(&self, candidate: &Booking) -> bool {
        candidate.holds_slot()
            && self.bookings.values().any(|other| {
                other.id != candidate.id
                    && other.advisor_id == candidate.advisor_id
                    && other.holds_slot()
                    && other.range().overlaps(&candidate.range())
            })
    }
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// Every record lives behind one lock so overlap checks and inserts are atomic.
#[derive(Default)]
pub struct MemoryStore {
    records: RwLock<Records>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BookingStore for MemoryStore {
    async fn list_agencies(&self, name: Option<String>) -> BookingResult<Vec<Agency>> {
        let records = self.records.read().await;
        let name = name.as_deref().map(str::trim).unwrap_or_default();
        let mut agencies: Vec<Agency> = records
            .agencies
            .values()
            .filter(|a| name.is_empty() || contains_ignore_case(&a.name, name))
            .cloned()
            .collect();
        agencies.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(agencies)
    }

    async fn get_agency(&self, id: Uuid) -> BookingResult<Option<Agency>> {
        Ok(self.records.read().await.agencies.get(&id).cloned())
    }

    async fn create_agency(&self, request: CreateAgencyRequest) -> BookingResult<Agency> {
        let agency = Agency {
            id: Uuid::new_v4(),
            name: request.name,
            address: request.address,
            contact_info: request.contact_info,
            working_hours: request.working_hours,
            created_at: Utc::now(),
        };
        self.records
            .write()
            .await
            .agencies
            .insert(agency.id, agency.clone());
        Ok(agency)
    }

    async fn get_advisor(&self, id: Uuid) -> BookingResult<Option<Advisor>> {
        Ok(self.records.read().await.advisors.get(&id).cloned())
    }

    async fn list_active_advisors(&self, agency_id: Uuid) -> BookingResult<Vec<Advisor>> {
        let records = self.records.read().await;
        let mut advisors: Vec<Advisor> = records
            .advisors
            .values()
            .filter(|a| a.agency_id == agency_id && a.active)
            .cloned()
            .collect();
        advisors.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(advisors)
    }

    async fn create_advisor(&self, request: CreateAdvisorRequest) -> BookingResult<Advisor> {
        let mut records = self.records.write().await;
        if !records.agencies.contains_key(&request.agency_id) {
            return Err(BookingError::NotFound(format!(
                "Agency {} not found",
                request.agency_id
            )));
        }
        let advisor = Advisor {
            id: Uuid::new_v4(),
            name: request.name,
            email: request.email,
            agency_id: request.agency_id,
            active: request.active,
            working_hours: request.working_hours,
            created_at: Utc::now(),
        };
        records.advisors.insert(advisor.id, advisor.clone());
        Ok(advisor)
    }

    async fn list_appointment_types(&self) -> BookingResult<Vec<AppointmentType>> {
        let records = self.records.read().await;
        let mut types: Vec<AppointmentType> =
            records.appointment_types.values().cloned().collect();
        types.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(types)
    }

    async fn get_appointment_type(&self, id: Uuid) -> BookingResult<Option<AppointmentType>> {
        Ok(self.records.read().await.appointment_types.get(&id).cloned())
    }

    async fn create_appointment_type(
        &self,
        request: CreateAppointmentTypeRequest,
    ) -> BookingResult<AppointmentType> {
        let kind = AppointmentType {
            id: Uuid::new_v4(),
            name: request.name,
        };
        self.records
            .write()
            .await
            .appointment_types
            .insert(kind.id, kind.clone());
        Ok(kind)
    }

    async fn get_booking(&self, id: Uuid) -> BookingResult<Option<Booking>> {
        Ok(self.records.read().await.bookings.get(&id).cloned())
    }

    async fn list_advisor_bookings(
        &self,
        agency_id: Uuid,
        advisor_id: Uuid,
    ) -> BookingResult<Vec<Booking>> {
        let records = self.records.read().await;
        let mut bookings: Vec<Booking> = records
            .bookings
            .values()
            .filter(|b| b.agency_id == agency_id && b.advisor_id == advisor_id)
            .cloned()
            .collect();
        bookings.sort_by_key(|b| b.start);
        Ok(bookings)
    }

    async fn find_bookings_by_phone(&self, phone: &str) -> BookingResult<Vec<Booking>> {
        let phone = phone.trim();
        let records = self.records.read().await;
        let mut bookings: Vec<Booking> = records
            .bookings
            .values()
            .filter(|b| b.customer.phone == phone)
            .cloned()
            .collect();
        bookings.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(bookings)
    }

    async fn list_bookings(&self, filter: &BookingFilter) -> BookingResult<Vec<Booking>> {
        let records = self.records.read().await;
        let adviser = filter
            .adviser
            .as_deref()
            .map(str::trim)
            .filter(|a| !a.is_empty());
        let mut bookings: Vec<Booking> = records
            .bookings
            .values()
            .filter(|b| filter.matches(b))
            .filter(|b| match adviser {
                Some(name) => records
                    .advisors
                    .get(&b.advisor_id)
                    .is_some_and(|a| contains_ignore_case(&a.name, name)),
                None => true,
            })
            .cloned()
            .collect();
        bookings.sort_by(|a, b| a.title.cmp(&b.title));
        Ok(bookings)
    }

    async fn create_booking(&self, new_booking: NewBooking) -> BookingResult<Booking> {
        let mut records = self.records.write().await;
        let now = Utc::now();
        let booking = Booking {
            id: Uuid::new_v4(),
            title: new_booking.title,
            agency_id: new_booking.agency_id,
            advisor_id: new_booking.advisor_id,
            appointment_type_id: new_booking.appointment_type_id,
            start: new_booking.range.start,
            end: new_booking.range.end,
            customer: new_booking.customer,
            status: new_booking.status,
            notes: None,
            created_at: now,
            updated_at: now,
        };
        if records.overlapping(&booking) {
            return Err(BookingError::Conflict(
                "This time slot is no longer available.".to_string(),
            ));
        }
        records.bookings.insert(booking.id, booking.clone());
        Ok(booking)
    }

    async fn save_booking(&self, booking: &Booking) -> BookingResult<Booking> {
        let mut records = self.records.write().await;
        if !records.bookings.contains_key(&booking.id) {
            return Err(BookingError::NotFound(format!(
                "Appointment {} not found",
                booking.id
            )));
        }
        if records.overlapping(booking) {
            return Err(BookingError::Conflict(
                "This time slot is no longer available.".to_string(),
            ));
        }
        let saved = Booking {
            updated_at: Utc::now(),
            ..booking.clone()
        };
        records.bookings.insert(saved.id, saved.clone());
        Ok(saved)
    }

    async fn set_booking_status(&self, id: Uuid, status: BookingStatus) -> BookingResult<Booking> {
        let mut records = self.records.write().await;
        let booking = records
            .bookings
            .get_mut(&id)
            .ok_or_else(|| BookingError::NotFound(format!("Appointment {} not found", id)))?;
        booking.status = status;
        booking.updated_at = Utc::now();
        Ok(booking.clone())
    }
}
