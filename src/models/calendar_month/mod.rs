// Calendar month module
// Year/month pair displayed by one calendar of the picker

use chrono::{Datelike, NaiveDate, Weekday};
use serde::Serialize;
use std::fmt;

use crate::utils::date::{days_in_month, shift_month};

/// A displayed month. Always holds a valid, representable year/month pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct CalendarMonth {
    year: i32,
    month: u32,
}

impl CalendarMonth {
    /// Create a month, validating that its first day is representable.
    ///
    /// # Examples
    /// ```
    /// use daterange_picker::models::calendar_month::CalendarMonth;
    ///
    /// let march = CalendarMonth::new(2024, 3).unwrap();
    /// assert_eq!(march.day_count(), 31);
    /// assert!(CalendarMonth::new(2024, 13).is_none());
    /// ```
    pub fn new(year: i32, month: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, 1).map(|_| Self { year, month })
    }

    /// The month containing `date`.
    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn first_day(&self) -> NaiveDate {
        // Validated at construction
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap_or(NaiveDate::MIN)
    }

    pub fn last_day(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.month, self.day_count()).unwrap_or(NaiveDate::MAX)
    }

    pub fn day_count(&self) -> u32 {
        days_in_month(self.year, self.month).unwrap_or(28)
    }

    /// Weekday of the 1st of the month.
    pub fn first_weekday(&self) -> Weekday {
        self.first_day().weekday()
    }

    /// Whether `date` belongs to this month.
    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }

    /// Move by `delta` months. `None` past the representable range.
    pub fn shift(&self, delta: i32) -> Option<Self> {
        shift_month(self.first_day(), delta).map(Self::from_date)
    }

    pub fn next(&self) -> Option<Self> {
        self.shift(1)
    }

    pub fn previous(&self) -> Option<Self> {
        self.shift(-1)
    }

    /// Same month in another year (month dropdown / year dropdown).
    pub fn with_year(&self, year: i32) -> Option<Self> {
        Self::new(year, self.month)
    }

    pub fn with_month(&self, month: u32) -> Option<Self> {
        Self::new(self.year, month)
    }
}

impl fmt::Display for CalendarMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}
