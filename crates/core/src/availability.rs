//! # Availability
//!
//! Computes the calendar blocks during which a new appointment cannot be
//! placed with a given advisor:
//!
//! 1. For each weekday, the parts of the agency's opening hours during which
//!    the advisor is not working.
//! 2. Every existing appointment of the advisor, except the one being edited.
//!
//! Missing hours for either party on a weekday mean "no data" for that day,
//! not "closed", so nothing is emitted for it.

use chrono::Weekday;

use crate::models::{BookedSlot, TimeRange, UnavailableBlock, WorkingHours};

pub const ADVISOR_UNAVAILABLE: &str = "Advisor unavailable";

pub const WEEK: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

/// Merges agency hours, advisor hours and existing appointments into the
/// set of unavailable blocks.
///
/// `excluding` is the range of the appointment currently being edited. An
/// existing appointment with exactly the same start and end is skipped, so a
/// different appointment that coincides with it is skipped too.
///
/// Advisor hours that extend beyond the agency's are not reported here; see
/// [`advisor_hours_outside_agency`].
pub fn compute_unavailable(
    agency_hours: &WorkingHours,
    advisor_hours: &WorkingHours,
    existing: &[BookedSlot],
    excluding: Option<&TimeRange>,
) -> Vec<UnavailableBlock> {
    let mut blocks = Vec::new();

    for day in WEEK {
        let (Some(agency), Some(advisor)) =
            (agency_hours.first_for(day), advisor_hours.first_for(day))
        else {
            continue;
        };

        if advisor.start_minute > agency.start_minute {
            blocks.push(UnavailableBlock::Recurring {
                day,
                start_minute: agency.start_minute,
                end_minute: advisor.start_minute,
                label: ADVISOR_UNAVAILABLE.to_string(),
            });
        }

        if advisor.end_minute < agency.end_minute {
            blocks.push(UnavailableBlock::Recurring {
                day,
                start_minute: advisor.end_minute,
                end_minute: agency.end_minute,
                label: ADVISOR_UNAVAILABLE.to_string(),
            });
        }
    }

    for slot in existing {
        let is_excluded =
            excluding.is_some_and(|range| range.start == slot.start && range.end == slot.end);
        if is_excluded {
            continue;
        }
        blocks.push(UnavailableBlock::Absolute {
            start: slot.start,
            end: slot.end,
            label: slot.title.clone(),
        });
    }

    blocks
}

/// Weekdays on which the advisor's first rule starts before or ends after
/// the agency's first rule, or on which the advisor works while the agency
/// is closed.
pub fn advisor_hours_outside_agency(
    agency_hours: &WorkingHours,
    advisor_hours: &WorkingHours,
) -> Vec<Weekday> {
    WEEK.into_iter()
        .filter(|day| match (agency_hours.first_for(*day), advisor_hours.first_for(*day)) {
            (_, None) => false,
            (None, Some(_)) => true,
            (Some(agency), Some(advisor)) => {
                advisor.start_minute < agency.start_minute || advisor.end_minute > agency.end_minute
            }
        })
        .collect()
}
