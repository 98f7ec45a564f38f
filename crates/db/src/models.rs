use chrono::{DateTime, NaiveDateTime, Utc};
use eyre::{Result, WrapErr};
use rendezvous_core::models::{
    Advisor, Agency, AppointmentType, Booking, CustomerDetails, HoursRule, WorkingHours,
};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use sqlx::types::Json;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbAgency {
    pub id: Uuid,
    pub name: String,
    pub address: String,
    pub contact_info: Option<String>,
    pub working_hours: Json<Vec<HoursRule>>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbAdvisor {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub agency_id: Uuid,
    pub active: bool,
    pub working_hours: Json<Vec<HoursRule>>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbAppointmentType {
    pub id: Uuid,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbBooking {
    pub id: Uuid,
    pub title: String,
    pub agency_id: Uuid,
    pub advisor_id: Uuid,
    pub appointment_type_id: Uuid,
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
    pub customer_first_name: String,
    pub customer_last_name: String,
    pub customer_email: String,
    pub customer_phone: String,
    pub status: String,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn working_hours(rules: Json<Vec<HoursRule>>, owner: Uuid) -> Result<WorkingHours> {
    WorkingHours::new(rules.0)
        .wrap_err_with(|| format!("Invalid working hours stored for {}", owner))
}

impl TryFrom<DbAgency> for Agency {
    type Error = eyre::Report;

    fn try_from(row: DbAgency) -> Result<Self> {
        Ok(Agency {
            working_hours: working_hours(row.working_hours, row.id)?,
            id: row.id,
            name: row.name,
            address: row.address,
            contact_info: row.contact_info,
            created_at: row.created_at,
        })
    }
}

impl TryFrom<DbAdvisor> for Advisor {
    type Error = eyre::Report;

    fn try_from(row: DbAdvisor) -> Result<Self> {
        Ok(Advisor {
            working_hours: working_hours(row.working_hours, row.id)?,
            id: row.id,
            name: row.name,
            email: row.email,
            agency_id: row.agency_id,
            active: row.active,
            created_at: row.created_at,
        })
    }
}

impl From<DbAppointmentType> for AppointmentType {
    fn from(row: DbAppointmentType) -> Self {
        AppointmentType {
            id: row.id,
            name: row.name,
        }
    }
}

impl TryFrom<DbBooking> for Booking {
    type Error = eyre::Report;

    fn try_from(row: DbBooking) -> Result<Self> {
        let status = row
            .status
            .parse()
            .wrap_err_with(|| format!("Invalid status stored for booking {}", row.id))?;
        Ok(Booking {
            id: row.id,
            title: row.title,
            agency_id: row.agency_id,
            advisor_id: row.advisor_id,
            appointment_type_id: row.appointment_type_id,
            start: row.start_time,
            end: row.end_time,
            customer: CustomerDetails {
                first_name: row.customer_first_name,
                last_name: row.customer_last_name,
                email: row.customer_email,
                phone: row.customer_phone,
            },
            status,
            notes: row.notes,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}
