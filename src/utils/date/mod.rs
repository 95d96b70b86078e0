// Date utility functions
// Calendar arithmetic shared by the grid, classifier and parser

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime};

pub fn is_same_day(date1: NaiveDateTime, date2: NaiveDateTime) -> bool {
    date1.date() == date2.date()
}

/// Shift a date by the given number of months, clamping the day to the
/// length of the target month (Jan 31 + 1 month = Feb 28/29).
///
/// Returns `None` when the result falls outside chrono's representable range.
pub fn shift_month(date: NaiveDate, delta: i32) -> Option<NaiveDate> {
    let total_months = (date.year() as i64 * 12) + (date.month() as i64 - 1) + delta as i64;
    let new_year = i32::try_from(total_months.div_euclid(12)).ok()?;
    let new_month = (total_months.rem_euclid(12) + 1) as u32;
    let max_day = days_in_month(new_year, new_month)?;
    NaiveDate::from_ymd_opt(new_year, new_month, date.day().min(max_day))
}

/// Get the number of days in a given month.
pub fn days_in_month(year: i32, month: u32) -> Option<u32> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    // The last representable month has no successor; count forward instead.
    match shift_first_of_next_month(first) {
        Some(next) => Some((next - first).num_days() as u32),
        None => Some(
            (1..=31)
                .rev()
                .find(|day| NaiveDate::from_ymd_opt(year, month, *day).is_some())
                .unwrap_or(28),
        ),
    }
}

fn shift_first_of_next_month(first: NaiveDate) -> Option<NaiveDate> {
    if first.month() == 12 {
        NaiveDate::from_ymd_opt(first.year().checked_add(1)?, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(first.year(), first.month() + 1, 1)
    }
}

/// Number of whole days from `from` to `to` (negative when `to` is earlier).
pub fn days_between(from: NaiveDate, to: NaiveDate) -> i64 {
    (to - from).num_days()
}

/// Add whole days, saturating at chrono's representable bounds.
pub fn add_days_saturating(date: NaiveDate, days: i64) -> NaiveDate {
    date.checked_add_signed(Duration::days(days)).unwrap_or(if days < 0 {
        NaiveDate::MIN
    } else {
        NaiveDate::MAX
    })
}
