// Property-based tests for month grids and cell classification
// Exercises grid layout, bounds and range highlighting with random inputs

use chrono::{Datelike, NaiveDate};
use proptest::prelude::*;

use daterange_picker::models::calendar_cell::{CellClass, Side};
use daterange_picker::models::calendar_month::CalendarMonth;
use daterange_picker::models::date_range::DateRange;
use daterange_picker::models::settings::PickerOptions;
use daterange_picker::services::grid::{MonthGrid, GRID_CELLS, GRID_COLUMNS, GRID_ROWS};
use daterange_picker::services::parser::{format_range, parse_range_text};
use daterange_picker::services::picker::DateRangePicker;

fn month_strategy() -> impl Strategy<Value = CalendarMonth> {
    (1900..2100i32, 1..=12u32).prop_map(|(year, month)| CalendarMonth::new(year, month).unwrap())
}

fn date_strategy() -> impl Strategy<Value = NaiveDate> {
    (2000..2040i32, 1..=365u32)
        .prop_map(|(year, ordinal)| NaiveDate::from_yo_opt(year, ordinal).unwrap())
}

proptest! {
    /// Property: every grid has 42 cells in 6 rows of 7
    #[test]
    fn prop_grid_is_six_by_seven(month in month_strategy(), first_day in 0..7u8) {
        let grid = MonthGrid::build(month, first_day, Side::Left);
        prop_assert_eq!(grid.cells().len(), GRID_CELLS);
        prop_assert_eq!(grid.rows().count(), GRID_ROWS);
        prop_assert!(grid.rows().all(|row| row.len() == GRID_COLUMNS));
    }

    /// Property: the first cell falls on the configured first day of week
    /// and the whole month is visible
    #[test]
    fn prop_first_cell_weekday(month in month_strategy(), first_day in 0..7u8) {
        let grid = MonthGrid::build(month, first_day, Side::Right);
        let first = grid.first_visible().unwrap();
        prop_assert_eq!(first.weekday().num_days_from_sunday() as u8, first_day);
        prop_assert!(first < month.first_day());
        prop_assert!(grid.find(month.last_day()).is_some());
    }

    /// Property: classifying the same inputs twice gives the same grid
    #[test]
    fn prop_classification_is_idempotent(
        month in month_strategy(),
        start in date_strategy(),
        length in 0..40i64,
    ) {
        let config = PickerOptions::new().resolve().unwrap();
        let end = start + chrono::Duration::days(length);
        let range = DateRange::from_dates(start, end, &config.time_settings).unwrap();
        let mut picker = DateRangePicker::new(config).with_range(range);
        // No hooks are set, so the refresh request has nothing to evaluate
        let _request = picker.begin_month_change(Side::Left, month);

        prop_assert_eq!(picker.calendar(Side::Left), picker.calendar(Side::Left));
        prop_assert_eq!(picker.calendar(Side::Right), picker.calendar(Side::Right));
    }

    /// Property: cells before the minimum or after the maximum are disabled
    #[test]
    fn prop_out_of_bounds_cells_disabled(
        min in date_strategy(),
        span in 0..90i64,
    ) {
        let max = min + chrono::Duration::days(span);
        let config = PickerOptions::new().min_date(min).max_date(max).resolve().unwrap();
        let picker = DateRangePicker::new(config).with_today(min);

        for side in [Side::Left, Side::Right] {
            let grid = picker.calendar(side);
            for cell in grid.cells() {
                let date = cell.date.unwrap();
                if date < min || date > max {
                    prop_assert!(cell.is_disabled, "{} should be disabled", date);
                }
            }
        }
    }

    /// Property: every day strictly between committed ends is in range
    #[test]
    fn prop_in_range_between_committed_ends(start in date_strategy(), length in 2..60i64) {
        let config = PickerOptions::new().resolve().unwrap();
        let end = start + chrono::Duration::days(length);
        let range = DateRange::from_dates(start, end, &config.time_settings).unwrap();
        let picker = DateRangePicker::new(config).with_range(range).with_today(start);

        for side in [Side::Left, Side::Right] {
            for cell in picker.calendar(side).cells() {
                let date = cell.date.unwrap();
                if date > start && date < end {
                    prop_assert!(cell.has_class(&CellClass::InRange), "{} should be in range", date);
                }
            }
        }
    }

    /// Property: formatting a range then parsing it back gives the same dates
    #[test]
    fn prop_format_parse_round_trip(
        start in date_strategy(),
        length in 0..400i64,
        pattern in prop::sample::select(vec![
            "MM/dd/yyyy", "dd/MM/yyyy", "yyyy-MM-dd", "d.M.yyyy", "dd MMM yyyy", "dddd, MMMM d, yyyy",
        ]),
    ) {
        let config = PickerOptions::new().date_format(pattern).resolve().unwrap();
        let end = start + chrono::Duration::days(length);
        let text = format_range(start, Some(end), &config);
        prop_assert_eq!(parse_range_text(&text, &config), Ok((start, end)));
    }
}
