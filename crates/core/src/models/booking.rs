use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{BookingError, BookingResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Cancelled,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BookingStatus {
    type Err = BookingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(BookingStatus::Pending),
            "confirmed" => Ok(BookingStatus::Confirmed),
            "cancelled" => Ok(BookingStatus::Cancelled),
            other => Err(BookingError::Validation(format!(
                "Unknown booking status: {}",
                other
            ))),
        }
    }
}

/// Wall-clock interval `[start, end)` in the agency's local time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimeRange {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl TimeRange {
    /// Checked constructor: start before end, both on the same calendar day.
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> BookingResult<Self> {
        if start >= end {
            return Err(BookingError::Validation(
                "The appointment must end after it starts.".to_string(),
            ));
        }
        if start.date() != end.date() {
            return Err(BookingError::Validation(
                "The appointment must start and end on the same day.".to_string(),
            ));
        }
        Ok(Self { start, end })
    }

    pub fn overlaps(&self, other: &TimeRange) -> bool {
        self.start < other.end && other.start < self.end
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerDetails {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Booking {
    pub id: Uuid,
    pub title: String,
    pub agency_id: Uuid,
    pub advisor_id: Uuid,
    pub appointment_type_id: Uuid,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub customer: CustomerDetails,
    pub status: BookingStatus,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Booking {
    pub fn range(&self) -> TimeRange {
        TimeRange {
            start: self.start,
            end: self.end,
        }
    }

    /// Cancelled bookings no longer hold their slot.
    pub fn holds_slot(&self) -> bool {
        self.status != BookingStatus::Cancelled
    }
}

/// Fields of a booking about to be persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewBooking {
    pub title: String,
    pub agency_id: Uuid,
    pub advisor_id: Uuid,
    pub appointment_type_id: Uuid,
    pub range: TimeRange,
    pub customer: CustomerDetails,
    pub status: BookingStatus,
}

/// Filters of the administrative booking list. Empty fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingFilter {
    pub title: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub agency: Option<Uuid>,
    #[serde(default, rename = "type", deserialize_with = "blank_as_none")]
    pub appointment_type: Option<Uuid>,
    pub adviser: Option<String>,
}

impl BookingFilter {
    /// Matches on everything except the adviser name, which needs the advisor record.
    pub fn matches(&self, booking: &Booking) -> bool {
        let title = self.title.as_deref().map(str::trim);
        let title_ok = match title.filter(|t| !t.is_empty()) {
            Some(title) => booking
                .title
                .to_lowercase()
                .contains(&title.to_lowercase()),
            None => true,
        };
        title_ok
            && self.agency.is_none_or(|id| booking.agency_id == id)
            && self
                .appointment_type
                .is_none_or(|id| booking.appointment_type_id == id)
    }
}

/// Blank form values mean "no filter".
fn blank_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: FromStr,
    T::Err: fmt::Display,
{
    match Option::<String>::deserialize(deserializer)? {
        Some(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(serde::de::Error::custom),
        _ => Ok(None),
    }
}

/// A booking as listed by the search and admin endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingSummary {
    pub id: Uuid,
    pub title: String,
    pub formatted_date: String,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub agency: String,
    pub adviser: String,
    #[serde(rename = "type")]
    pub appointment_type: String,
    pub status: BookingStatus,
}
