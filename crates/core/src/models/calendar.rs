use chrono::{DateTime, Datelike, NaiveDateTime, Weekday};
use serde::{Deserialize, Serialize};

use super::booking::{Booking, TimeRange};
use super::working_hours::{BusinessHours, minutes_of};

/// A non-bookable interval rendered on the calendar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum UnavailableBlock {
    /// Repeats every week on `day`.
    Recurring {
        day: Weekday,
        start_minute: u16,
        end_minute: u16,
        label: String,
    },
    /// A one-off interval, typically an existing booking.
    Absolute {
        start: NaiveDateTime,
        end: NaiveDateTime,
        label: String,
    },
}

impl UnavailableBlock {
    pub fn label(&self) -> &str {
        match self {
            UnavailableBlock::Recurring { label, .. }
            | UnavailableBlock::Absolute { label, .. } => label,
        }
    }

    /// True when a same-day `range` intersects this block.
    pub fn overlaps(&self, range: &TimeRange) -> bool {
        match self {
            UnavailableBlock::Recurring {
                day,
                start_minute,
                end_minute,
                ..
            } => {
                if range.start.weekday() != *day {
                    return false;
                }
                let start = minutes_of(range.start.time());
                let end = minutes_of(range.end.time());
                start < *end_minute && *start_minute < end
            }
            UnavailableBlock::Absolute { start, end, .. } => {
                range.start < *end && *start < range.end
            }
        }
    }
}

/// An existing appointment as seen by the availability calculator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookedSlot {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub title: String,
}

impl BookedSlot {
    /// Labels the slot `"{type}-{customer last name}"`.
    pub fn from_booking(booking: &Booking, type_name: &str) -> Self {
        Self {
            start: booking.start,
            end: booking.end,
            title: format!("{}-{}", type_name, booking.customer.last_name),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarWorkingHours {
    pub agency: Vec<BusinessHours>,
    pub advisor: Vec<BusinessHours>,
}

/// Everything the browser calendar needs to render the slot picker.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarSettings {
    pub working_hours: CalendarWorkingHours,
    pub existing_appointments: Vec<BookedSlot>,
    pub unavailable: Vec<UnavailableBlock>,
    pub default_start: Option<NaiveDateTime>,
    pub default_end: Option<NaiveDateTime>,
}

/// The pair of strings the calendar writes into its hidden fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotSelection {
    pub start_str: Option<String>,
    pub end_str: Option<String>,
}

/// Parses a calendar timestamp into agency wall-clock time.
///
/// Accepts RFC 3339 (`2025-03-19T08:00:00+01:00`, the offset is dropped) and
/// naive `2025-03-19T08:00:00` or `2025-03-19T08:00`.
pub fn parse_calendar_time(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    if let Ok(with_offset) = DateTime::parse_from_rfc3339(value) {
        return Some(with_offset.naive_local());
    }
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M"))
        .ok()
}
