//! Weekly opening hours for agencies and advisors.
//!
//! Hours are wall-clock minutes since midnight, grouped by weekday. A weekday
//! may carry several rules (a lunch break splits the day in two) but rules on
//! the same day never overlap.

use chrono::{NaiveTime, Timelike, Weekday};
use serde::{Deserialize, Serialize};

use crate::errors::{BookingError, BookingResult};

pub const MINUTES_PER_DAY: u16 = 24 * 60;

/// One opening interval `[start_minute, end_minute)` on a weekday.
///
/// Deserializes from minutes or from office-hours integers
/// (`{"day": "Mon", "starthours": 830, "endhours": 1730}`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawHoursRule")]
pub struct HoursRule {
    pub day: Weekday,
    pub start_minute: u16,
    pub end_minute: u16,
}

impl HoursRule {
    pub fn new(day: Weekday, start_minute: u16, end_minute: u16) -> BookingResult<Self> {
        if start_minute >= end_minute {
            return Err(BookingError::Validation(format!(
                "Opening time must be before closing time on {}",
                day
            )));
        }
        if end_minute > MINUTES_PER_DAY {
            return Err(BookingError::Validation(format!(
                "Closing time on {} is past midnight",
                day
            )));
        }
        Ok(Self {
            day,
            start_minute,
            end_minute,
        })
    }

    /// Parses `"HH:MM"` bounds, e.g. `("08:30", "17:00")`.
    pub fn parse(day: Weekday, start: &str, end: &str) -> BookingResult<Self> {
        Self::new(day, parse_clock(start)?, parse_clock(end)?)
    }

    /// Builds a rule from office-hours integers where `830` means 08:30 and
    /// `1730` means 17:30.
    pub fn from_office_hours(day: Weekday, start: u16, end: u16) -> BookingResult<Self> {
        Self::new(day, office_hours_to_minutes(start)?, office_hours_to_minutes(end)?)
    }

    pub fn start_time(&self) -> String {
        minutes_to_clock(self.start_minute)
    }

    pub fn end_time(&self) -> String {
        minutes_to_clock(self.end_minute)
    }

    /// True when `[start_minute, end_minute)` lies inside this rule.
    pub fn contains(&self, start_minute: u16, end_minute: u16) -> bool {
        self.start_minute <= start_minute && end_minute <= self.end_minute
    }

    fn overlaps(&self, other: &HoursRule) -> bool {
        self.day == other.day
            && self.start_minute < other.end_minute
            && other.start_minute < self.end_minute
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawHoursRule {
    Minutes {
        day: Weekday,
        start_minute: u16,
        end_minute: u16,
    },
    OfficeHours {
        day: Weekday,
        starthours: u16,
        endhours: u16,
    },
}

impl TryFrom<RawHoursRule> for HoursRule {
    type Error = BookingError;

    fn try_from(raw: RawHoursRule) -> Result<Self, Self::Error> {
        match raw {
            RawHoursRule::Minutes {
                day,
                start_minute,
                end_minute,
            } => HoursRule::new(day, start_minute, end_minute),
            RawHoursRule::OfficeHours {
                day,
                starthours,
                endhours,
            } => HoursRule::from_office_hours(day, starthours, endhours),
        }
    }
}

/// A weekly set of opening intervals.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<HoursRule>", into = "Vec<HoursRule>")]
pub struct WorkingHours {
    rules: Vec<HoursRule>,
}

impl WorkingHours {
    pub fn new(rules: Vec<HoursRule>) -> BookingResult<Self> {
        for (i, rule) in rules.iter().enumerate() {
            if rule.start_minute >= rule.end_minute || rule.end_minute > MINUTES_PER_DAY {
                return Err(BookingError::Validation(format!(
                    "Invalid opening interval on {}",
                    rule.day
                )));
            }
            if rules[i + 1..].iter().any(|other| rule.overlaps(other)) {
                return Err(BookingError::Validation(format!(
                    "Opening intervals overlap on {}",
                    rule.day
                )));
            }
        }
        Ok(Self { rules })
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn rules(&self) -> &[HoursRule] {
        &self.rules
    }

    /// The first rule configured for `day`.
    pub fn first_for(&self, day: Weekday) -> Option<&HoursRule> {
        self.rules.iter().find(|r| r.day == day)
    }

    pub fn rules_for(&self, day: Weekday) -> impl Iterator<Item = &HoursRule> {
        self.rules.iter().filter(move |r| r.day == day)
    }

    /// Exports the rules in the calendar widget's business-hours shape.
    pub fn business_hours(&self) -> Vec<BusinessHours> {
        self.rules
            .iter()
            .map(|rule| BusinessHours {
                days_of_week: vec![rule.day.num_days_from_sunday()],
                start_time: rule.start_time(),
                end_time: rule.end_time(),
            })
            .collect()
    }
}

impl TryFrom<Vec<HoursRule>> for WorkingHours {
    type Error = BookingError;

    fn try_from(rules: Vec<HoursRule>) -> Result<Self, Self::Error> {
        WorkingHours::new(rules)
    }
}

impl From<WorkingHours> for Vec<HoursRule> {
    fn from(hours: WorkingHours) -> Self {
        hours.rules
    }
}

/// Business hours as consumed by the calendar widget. Days are numbered
/// from Sunday = 0.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BusinessHours {
    pub days_of_week: Vec<u32>,
    pub start_time: String,
    pub end_time: String,
}

/// Minutes since midnight of a wall-clock time.
pub fn minutes_of(time: NaiveTime) -> u16 {
    (time.hour() * 60 + time.minute()) as u16
}

pub fn parse_clock(value: &str) -> BookingResult<u16> {
    let invalid = || BookingError::Validation(format!("Invalid time of day: {}", value));
    let (hours, minutes) = value.trim().split_once(':').ok_or_else(invalid)?;
    let hours: u16 = hours.parse().map_err(|_| invalid())?;
    let minutes: u16 = minutes.parse().map_err(|_| invalid())?;
    if minutes >= 60 || hours > 24 || (hours == 24 && minutes > 0) {
        return Err(invalid());
    }
    Ok(hours * 60 + minutes)
}

pub fn minutes_to_clock(minutes: u16) -> String {
    format!("{:02}:{:02}", minutes / 60, minutes % 60)
}

fn office_hours_to_minutes(value: u16) -> BookingResult<u16> {
    let (hours, minutes) = (value / 100, value % 100);
    if minutes >= 60 || hours > 24 || (hours == 24 && minutes > 0) {
        return Err(BookingError::Validation(format!(
            "Invalid office hours value: {}",
            value
        )));
    }
    Ok(hours * 60 + minutes)
}
