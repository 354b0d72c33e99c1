//! Wall-clock value types
//!
//! Immutable time-of-day primitives with ordering and "next occurrence after"
//! arithmetic. Local wall-clock instants are `chrono::NaiveDateTime`; the
//! platform derives them from the place timezone before they reach this core,
//! so nothing here carries an offset.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Days, NaiveDate, NaiveDateTime, NaiveTime, Weekday};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Time value errors
#[derive(Debug, Error)]
pub enum TimeError {
    #[error("invalid time of day: {0}")]
    InvalidTimeOfDay(String),

    #[error("time range must have a start or an end")]
    EmptyRange,

    #[error("time range start {start} must precede end {end}")]
    InvertedRange { start: TimeOfDay, end: TimeOfDay },

    #[error("day set must not be empty")]
    EmptyDaySet,
}

/// A time of day with second resolution
///
/// Ordering is plain clock order within one day; wrap-around windows are
/// expressed by [`TimeRange`], not by the time itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TimeOfDay(NaiveTime);

impl TimeOfDay {
    /// Midnight (00:00:00)
    pub const MIDNIGHT: TimeOfDay = TimeOfDay(NaiveTime::MIN);

    /// Create from hour/minute/second, if valid
    pub fn new(hour: u32, minute: u32, second: u32) -> Option<Self> {
        NaiveTime::from_hms_opt(hour, minute, second).map(TimeOfDay)
    }

    /// Wrap an existing `NaiveTime`
    pub fn from_time(time: NaiveTime) -> Self {
        TimeOfDay(time)
    }

    /// The underlying `NaiveTime`
    pub fn time(&self) -> NaiveTime {
        self.0
    }

    /// The next instant strictly after `now` at which this time of day occurs
    ///
    /// Today if the time is still ahead of `now`, otherwise tomorrow.
    pub fn next_occurrence_after(&self, now: NaiveDateTime) -> NaiveDateTime {
        let today = now.date().and_time(self.0);
        if today > now {
            today
        } else {
            (now.date() + Days::new(1)).and_time(self.0)
        }
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%H:%M:%S"))
    }
}

impl FromStr for TimeOfDay {
    type Err = TimeError;

    /// Parse `HH:MM:SS` or `HH:MM`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NaiveTime::parse_from_str(s, "%H:%M:%S")
            .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M"))
            .map(TimeOfDay)
            .map_err(|_| TimeError::InvalidTimeOfDay(s.to_string()))
    }
}

impl From<NaiveTime> for TimeOfDay {
    fn from(time: NaiveTime) -> Self {
        TimeOfDay(time)
    }
}

/// Day of the week
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DayOfWeek {
    Mon,
    Tue,
    Wed,
    Thu,
    Fri,
    Sat,
    Sun,
}

impl DayOfWeek {
    /// The day of week of a calendar date
    pub fn of(date: NaiveDate) -> Self {
        date.weekday().into()
    }
}

impl From<Weekday> for DayOfWeek {
    fn from(w: Weekday) -> Self {
        match w {
            Weekday::Mon => DayOfWeek::Mon,
            Weekday::Tue => DayOfWeek::Tue,
            Weekday::Wed => DayOfWeek::Wed,
            Weekday::Thu => DayOfWeek::Thu,
            Weekday::Fri => DayOfWeek::Fri,
            Weekday::Sat => DayOfWeek::Sat,
            Weekday::Sun => DayOfWeek::Sun,
        }
    }
}

impl From<DayOfWeek> for Weekday {
    fn from(d: DayOfWeek) -> Self {
        match d {
            DayOfWeek::Mon => Weekday::Mon,
            DayOfWeek::Tue => Weekday::Tue,
            DayOfWeek::Wed => Weekday::Wed,
            DayOfWeek::Thu => Weekday::Thu,
            DayOfWeek::Fri => Weekday::Fri,
            DayOfWeek::Sat => Weekday::Sat,
            DayOfWeek::Sun => Weekday::Sun,
        }
    }
}

/// A same-day time window bounded by optional start and end times
///
/// At least one bound must be present. An absent start is treated as
/// midnight; an absent end as midnight of the next day. The start is
/// inclusive and the end exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRange {
    #[serde(skip_serializing_if = "Option::is_none")]
    start: Option<TimeOfDay>,

    #[serde(skip_serializing_if = "Option::is_none")]
    end: Option<TimeOfDay>,
}

impl TimeRange {
    /// Create a range, validating the bounds
    pub fn new(start: Option<TimeOfDay>, end: Option<TimeOfDay>) -> Result<Self, TimeError> {
        match (start, end) {
            (None, None) => Err(TimeError::EmptyRange),
            (Some(s), Some(e)) if s >= e => Err(TimeError::InvertedRange { start: s, end: e }),
            _ => Ok(TimeRange { start, end }),
        }
    }

    /// Range starting at `start` and running to midnight
    pub fn after(start: TimeOfDay) -> Self {
        TimeRange {
            start: Some(start),
            end: None,
        }
    }

    /// Range starting at midnight and ending before `end`
    pub fn before(end: TimeOfDay) -> Self {
        TimeRange {
            start: None,
            end: Some(end),
        }
    }

    /// The configured start bound, if any
    pub fn start(&self) -> Option<TimeOfDay> {
        self.start
    }

    /// The configured end bound, if any
    pub fn end(&self) -> Option<TimeOfDay> {
        self.end
    }

    /// The effective start bound (midnight when absent)
    pub fn effective_start(&self) -> TimeOfDay {
        self.start.unwrap_or(TimeOfDay::MIDNIGHT)
    }

    /// The effective end bound (midnight, meaning midnight next day, when absent)
    pub fn effective_end(&self) -> TimeOfDay {
        self.end.unwrap_or(TimeOfDay::MIDNIGHT)
    }

    /// Whether `time` falls inside the window
    pub fn contains(&self, time: NaiveTime) -> bool {
        if time < self.effective_start().time() {
            return false;
        }
        match self.end {
            Some(end) => time < end.time(),
            None => true,
        }
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}, {})",
            self.effective_start(),
            self.end
                .map(|e| e.to_string())
                .unwrap_or_else(|| "24:00:00".to_string())
        )
    }
}
