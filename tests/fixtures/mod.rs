// Test fixtures - reusable test data
// Provides consistent pickers, dates and a recording listener across test files

#![allow(dead_code)]

use chrono::{NaiveDate, NaiveDateTime};
use std::sync::{Arc, Mutex};

use daterange_picker::models::calendar_cell::Side;
use daterange_picker::models::calendar_month::CalendarMonth;
use daterange_picker::models::date_range::DateRange;
use daterange_picker::models::settings::PickerOptions;
use daterange_picker::services::picker::{DateRangePicker, PickerListener};

/// Sample dates for testing
pub mod dates {
    use super::*;

    pub fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    /// The fixed "today" every fixture picker uses
    pub fn today() -> NaiveDate {
        ymd(2024, 3, 14)
    }

    pub fn march_2024() -> CalendarMonth {
        CalendarMonth::new(2024, 3).unwrap()
    }

    /// Returns Feb 29, 2024 (leap year)
    pub fn leap_day_2024() -> NaiveDate {
        ymd(2024, 2, 29)
    }
}

/// Sample pickers for testing
pub mod pickers {
    use super::*;

    /// US format, bounded to 2024
    pub fn bounded_2024() -> PickerOptions {
        PickerOptions::new()
            .date_format("MM/dd/yyyy")
            .min_date(dates::ymd(2024, 1, 1))
            .max_date(dates::ymd(2024, 12, 31))
    }

    pub fn build(options: PickerOptions) -> DateRangePicker {
        DateRangePicker::new(options.resolve().unwrap()).with_today(dates::today())
    }

    /// A picker plus the events it reported
    pub fn recorded(options: PickerOptions) -> (DateRangePicker, Recorder) {
        let recorder = Recorder::default();
        let picker = build(options).with_listener(Box::new(recorder.clone()));
        (picker, recorder)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Recorded {
    RangeSelected(DateRange),
    StartChanged(Option<NaiveDateTime>),
    EndChanged(Option<NaiveDateTime>),
    SelectionStart(NaiveDateTime),
    SelectionEnd(NaiveDateTime),
    MonthChanged(Side, CalendarMonth),
    Opened,
    Closed,
    Cancel,
    Reset,
}

/// Listener that keeps every notification for later inspection
#[derive(Debug, Clone, Default)]
pub struct Recorder {
    events: Arc<Mutex<Vec<Recorded>>>,
}

impl Recorder {
    pub fn events(&self) -> Vec<Recorded> {
        self.events.lock().unwrap().clone()
    }

    pub fn count(&self, pred: impl Fn(&Recorded) -> bool) -> usize {
        self.events().iter().filter(|e| pred(e)).count()
    }

    fn push(&self, event: Recorded) {
        self.events.lock().unwrap().push(event);
    }
}

impl PickerListener for Recorder {
    fn range_selected(&mut self, range: DateRange) {
        self.push(Recorded::RangeSelected(range));
    }

    fn start_changed(&mut self, start: Option<NaiveDateTime>) {
        self.push(Recorded::StartChanged(start));
    }

    fn end_changed(&mut self, end: Option<NaiveDateTime>) {
        self.push(Recorded::EndChanged(end));
    }

    fn selection_start(&mut self, start: NaiveDateTime) {
        self.push(Recorded::SelectionStart(start));
    }

    fn selection_end(&mut self, end: NaiveDateTime) {
        self.push(Recorded::SelectionEnd(end));
    }

    fn month_changed(&mut self, side: Side, month: CalendarMonth) {
        self.push(Recorded::MonthChanged(side, month));
    }

    fn opened(&mut self) {
        self.push(Recorded::Opened);
    }

    fn closed(&mut self) {
        self.push(Recorded::Closed);
    }

    fn cancel(&mut self) {
        self.push(Recorded::Cancel);
    }

    fn reset(&mut self) {
        self.push(Recorded::Reset);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;

    #[test]
    fn test_fixture_dates_are_valid() {
        assert_eq!(dates::today().weekday(), chrono::Weekday::Thu);
        assert_eq!(dates::leap_day_2024().day(), 29);
        assert!(dates::march_2024().contains(dates::today()));
    }

    #[test]
    fn test_fixture_options_resolve() {
        let config = pickers::bounded_2024().resolve().unwrap();
        assert_eq!(config.min_date, Some(dates::ymd(2024, 1, 1)));
    }
}
