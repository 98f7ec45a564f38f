use chrono::{Datelike, NaiveDateTime};

use crate::models::WorkingHours;
use crate::models::working_hours::minutes_of;

/// Whether the calendar may accept the candidate `[start, end)`.
///
/// The candidate must stay within one calendar day and fit entirely inside
/// one of the agency's rules for that weekday. Advisor hours and existing
/// appointments are not considered here.
pub fn is_selection_allowed(
    start: NaiveDateTime,
    end: NaiveDateTime,
    agency_hours: &WorkingHours,
) -> bool {
    if start.date() != end.date() || start >= end {
        return false;
    }

    let start_minute = minutes_of(start.time());
    let end_minute = minutes_of(end.time());

    agency_hours
        .rules_for(start.weekday())
        .any(|rule| rule.contains(start_minute, end_minute))
}
