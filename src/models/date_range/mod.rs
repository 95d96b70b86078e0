// Date range module
// Start/end pair produced by the picker, plus named presets

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::utils::date::{days_between, is_same_day};

/// Selected range with time of day. `end` is never before `start`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl DateRange {
    /// Create a range, rejecting an end before the start.
    ///
    /// # Examples
    /// ```
    /// use daterange_picker::models::date_range::DateRange;
    /// use chrono::NaiveDate;
    ///
    /// let start = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap().and_hms_opt(0, 0, 0).unwrap();
    /// let end = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap().and_hms_opt(23, 59, 59).unwrap();
    /// let range = DateRange::new(start, end).unwrap();
    /// assert_eq!(range.day_count(), 5);
    /// ```
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> Result<Self, String> {
        if end < start {
            return Err("Range end must not be before its start".to_string());
        }
        Ok(Self { start, end })
    }

    /// Build from whole days using the given time settings.
    pub fn from_dates(
        start: NaiveDate,
        end: NaiveDate,
        times: &TimeSettings,
    ) -> Result<Self, String> {
        Self::new(times.start_of(start), times.end_of(end))
    }

    pub fn start_date(&self) -> NaiveDate {
        self.start.date()
    }

    pub fn end_date(&self) -> NaiveDate {
        self.end.date()
    }

    /// Inclusive number of calendar days covered.
    pub fn day_count(&self) -> i64 {
        days_between(self.start_date(), self.end_date()) + 1
    }

    /// Whether both ends fall on the same calendar days as `other`.
    pub fn same_days(&self, other: &DateRange) -> bool {
        is_same_day(self.start, other.start) && is_same_day(self.end, other.end)
    }

    pub fn contains_date(&self, date: NaiveDate) -> bool {
        date >= self.start_date() && date <= self.end_date()
    }
}

/// Predefined range offered next to the calendars ("Last 7 days", ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedRange {
    pub label: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl NamedRange {
    pub fn new(label: impl Into<String>, start: NaiveDate, end: NaiveDate) -> Result<Self, String> {
        let label = label.into();
        if label.trim().is_empty() {
            return Err("Range label cannot be empty".to_string());
        }
        if end < start {
            return Err(format!("Range '{}' ends before it starts", label));
        }
        Ok(Self { label, start, end })
    }
}

/// Time of day applied to picked dates.
///
/// Picked start dates default to midnight and end dates to the last second of
/// the day, so a committed range always covers its end day completely.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSettings {
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
}

impl Default for TimeSettings {
    fn default() -> Self {
        Self {
            start_time: NaiveTime::MIN,
            end_time: NaiveTime::from_hms_opt(23, 59, 59).unwrap_or(NaiveTime::MIN),
        }
    }
}

impl TimeSettings {
    pub fn start_of(&self, date: NaiveDate) -> NaiveDateTime {
        date.and_time(self.start_time)
    }

    pub fn end_of(&self, date: NaiveDate) -> NaiveDateTime {
        date.and_time(self.end_time)
    }
}
