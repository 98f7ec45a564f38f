use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::working_hours::WorkingHours;

/// A physical service location with its own opening hours.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Agency {
    pub id: Uuid,
    pub name: String,
    pub address: String,
    pub contact_info: Option<String>,
    pub working_hours: WorkingHours,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateAgencyRequest {
    pub name: String,
    pub address: String,
    pub contact_info: Option<String>,
    #[serde(default)]
    pub working_hours: WorkingHours,
}

/// A staff member who can be booked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Advisor {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub agency_id: Uuid,
    pub active: bool,
    pub working_hours: WorkingHours,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateAdvisorRequest {
    pub name: String,
    pub email: String,
    pub agency_id: Uuid,
    #[serde(default = "default_active")]
    pub active: bool,
    #[serde(default)]
    pub working_hours: WorkingHours,
}

fn default_active() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppointmentType {
    pub id: Uuid,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateAppointmentTypeRequest {
    pub name: String,
}

/// A selectable entry rendered by the toggle widgets of the first wizard steps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionOption {
    pub id: Uuid,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

impl From<&Agency> for SelectionOption {
    fn from(agency: &Agency) -> Self {
        Self {
            id: agency.id,
            name: agency.name.clone(),
            address: Some(agency.address.clone()),
        }
    }
}

impl From<&Advisor> for SelectionOption {
    fn from(advisor: &Advisor) -> Self {
        Self {
            id: advisor.id,
            name: advisor.name.clone(),
            address: None,
        }
    }
}

impl From<&AppointmentType> for SelectionOption {
    fn from(kind: &AppointmentType) -> Self {
        Self {
            id: kind.id,
            name: kind.name.clone(),
            address: None,
        }
    }
}
