//! [`BookingStore`] backed by Postgres.

use async_trait::async_trait;
use rendezvous_core::errors::{BookingError, BookingResult};
use rendezvous_core::models::{
    Advisor, Agency, AppointmentType, Booking, BookingFilter, BookingStatus, CreateAdvisorRequest,
    CreateAgencyRequest, CreateAppointmentTypeRequest, NewBooking,
};
use rendezvous_core::store::BookingStore;
use uuid::Uuid;

use crate::DbPool;
use crate::repositories::booking::SlotWrite;
use crate::repositories::{advisor, agency, appointment_type, booking};

const SLOT_TAKEN: &str = "This time slot is no longer available.";

#[derive(Clone)]
pub struct PgStore {
    pool: DbPool,
}

impl PgStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn convert_all<R, T>(rows: Vec<R>) -> BookingResult<Vec<T>>
where
    T: TryFrom<R, Error = eyre::Report>,
{
    rows.into_iter()
        .map(|row| T::try_from(row).map_err(BookingError::from))
        .collect()
}

fn saved(write: SlotWrite) -> BookingResult<Booking> {
    match write {
        SlotWrite::Saved(row) => Ok(Booking::try_from(row)?),
        SlotWrite::Overlaps => Err(BookingError::Conflict(SLOT_TAKEN.to_string())),
    }
}

#[async_trait]
impl BookingStore for PgStore {
    async fn list_agencies(&self, name: Option<String>) -> BookingResult<Vec<Agency>> {
        let name = name.as_deref().map(str::trim).filter(|n| !n.is_empty());
        convert_all(agency::list_agencies(&self.pool, name).await?)
    }

    async fn get_agency(&self, id: Uuid) -> BookingResult<Option<Agency>> {
        match agency::get_agency_by_id(&self.pool, id).await? {
            Some(row) => Ok(Some(Agency::try_from(row)?)),
            None => Ok(None),
        }
    }

    async fn create_agency(&self, request: CreateAgencyRequest) -> BookingResult<Agency> {
        let row = agency::create_agency(
            &self.pool,
            &request.name,
            &request.address,
            request.contact_info.as_deref(),
            &request.working_hours,
        )
        .await?;
        Ok(Agency::try_from(row)?)
    }

    async fn get_advisor(&self, id: Uuid) -> BookingResult<Option<Advisor>> {
        match advisor::get_advisor_by_id(&self.pool, id).await? {
            Some(row) => Ok(Some(Advisor::try_from(row)?)),
            None => Ok(None),
        }
    }

    async fn list_active_advisors(&self, agency_id: Uuid) -> BookingResult<Vec<Advisor>> {
        convert_all(advisor::get_active_advisors_by_agency(&self.pool, agency_id).await?)
    }

    async fn create_advisor(&self, request: CreateAdvisorRequest) -> BookingResult<Advisor> {
        let row = advisor::create_advisor(
            &self.pool,
            &request.name,
            &request.email,
            request.agency_id,
            request.active,
            &request.working_hours,
        )
        .await?;
        Ok(Advisor::try_from(row)?)
    }

    async fn list_appointment_types(&self) -> BookingResult<Vec<AppointmentType>> {
        let rows = appointment_type::list_appointment_types(&self.pool).await?;
        Ok(rows.into_iter().map(AppointmentType::from).collect())
    }

    async fn get_appointment_type(&self, id: Uuid) -> BookingResult<Option<AppointmentType>> {
        let row = appointment_type::get_appointment_type_by_id(&self.pool, id).await?;
        Ok(row.map(AppointmentType::from))
    }

    async fn create_appointment_type(
        &self,
        request: CreateAppointmentTypeRequest,
    ) -> BookingResult<AppointmentType> {
        let row = appointment_type::create_appointment_type(&self.pool, &request.name).await?;
        Ok(row.into())
    }

    async fn get_booking(&self, id: Uuid) -> BookingResult<Option<Booking>> {
        match booking::get_booking_by_id(&self.pool, id).await? {
            Some(row) => Ok(Some(Booking::try_from(row)?)),
            None => Ok(None),
        }
    }

    async fn list_advisor_bookings(
        &self,
        agency_id: Uuid,
        advisor_id: Uuid,
    ) -> BookingResult<Vec<Booking>> {
        convert_all(booking::get_bookings_by_advisor(&self.pool, agency_id, advisor_id).await?)
    }

    async fn find_bookings_by_phone(&self, phone: &str) -> BookingResult<Vec<Booking>> {
        convert_all(booking::get_bookings_by_phone(&self.pool, phone.trim()).await?)
    }

    async fn list_bookings(&self, filter: &BookingFilter) -> BookingResult<Vec<Booking>> {
        convert_all(booking::list_bookings(&self.pool, filter).await?)
    }

    async fn create_booking(&self, new_booking: NewBooking) -> BookingResult<Booking> {
        saved(booking::create_booking(&self.pool, &new_booking).await?)
    }

    async fn save_booking(&self, updated: &Booking) -> BookingResult<Booking> {
        if booking::get_booking_by_id(&self.pool, updated.id).await?.is_none() {
            return Err(BookingError::NotFound(format!(
                "Appointment {} not found",
                updated.id
            )));
        }
        saved(booking::update_booking(&self.pool, updated).await?)
    }

    async fn set_booking_status(&self, id: Uuid, status: BookingStatus) -> BookingResult<Booking> {
        match booking::update_booking_status(&self.pool, id, status).await? {
            Some(row) => Ok(Booking::try_from(row)?),
            None => Err(BookingError::NotFound(format!("Appointment {} not found", id))),
        }
    }
}
