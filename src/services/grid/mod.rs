//! Month grid builder.
//!
//! Lays out a fixed 6x7 grid for one displayed month: the trailing days of the
//! previous month, every day of the month, then leading days of the next month.

use chrono::{Datelike, Duration, NaiveDate, Weekday};

use crate::models::calendar_cell::{CalendarCell, Side};
use crate::models::calendar_month::CalendarMonth;

pub const GRID_ROWS: usize = 6;
pub const GRID_COLUMNS: usize = 7;
pub const GRID_CELLS: usize = GRID_ROWS * GRID_COLUMNS;

/// Number of previous-month days shown before the 1st.
///
/// When the 1st already falls on `first_day_of_week` a whole leading week of
/// the previous month is still shown, so every grid opens with off-month days.
pub fn leading_days(first_weekday: Weekday, first_day_of_week: u8) -> i64 {
    let weekday = first_weekday.num_days_from_sunday() as i64;
    let offset = (weekday - (first_day_of_week % 7) as i64 + 7) % 7;
    if offset == 0 {
        7
    } else {
        offset
    }
}

/// A 42-cell grid for one calendar side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthGrid {
    month: CalendarMonth,
    side: Side,
    first_day_of_week: u8,
    cells: Vec<CalendarCell>,
}

impl MonthGrid {
    /// Build the unclassified grid for `month`.
    ///
    /// Slots whose date would fall outside chrono's representable range become
    /// out-of-range cells instead of failing the whole grid.
    pub fn build(month: CalendarMonth, first_day_of_week: u8, side: Side) -> Self {
        let first = month.first_day();
        let offset = leading_days(month.first_weekday(), first_day_of_week);

        let cells = (0..GRID_CELLS as i64)
            .map(|i| match first.checked_add_signed(Duration::days(i - offset)) {
                Some(date) => CalendarCell::new(date, side, !month.contains(date)),
                None => CalendarCell::out_of_range(side),
            })
            .collect();

        Self {
            month,
            side,
            first_day_of_week: first_day_of_week % 7,
            cells,
        }
    }

    pub fn month(&self) -> CalendarMonth {
        self.month
    }

    pub fn side(&self) -> Side {
        self.side
    }

    pub fn first_day_of_week(&self) -> u8 {
        self.first_day_of_week
    }

    pub fn cells(&self) -> &[CalendarCell] {
        &self.cells
    }

    pub(crate) fn cells_mut(&mut self) -> &mut [CalendarCell] {
        &mut self.cells
    }

    /// Rows of seven cells, top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[CalendarCell]> {
        self.cells.chunks(GRID_COLUMNS)
    }

    pub fn cell(&self, row: usize, column: usize) -> Option<&CalendarCell> {
        if row >= GRID_ROWS || column >= GRID_COLUMNS {
            return None;
        }
        self.cells.get(row * GRID_COLUMNS + column)
    }

    /// The cell showing `date`, if it is on this grid.
    pub fn find(&self, date: NaiveDate) -> Option<&CalendarCell> {
        self.cells.iter().find(|cell| cell.date == Some(date))
    }

    pub fn first_visible(&self) -> Option<NaiveDate> {
        self.cells.iter().find_map(|cell| cell.date)
    }

    pub fn last_visible(&self) -> Option<NaiveDate> {
        self.cells.iter().rev().find_map(|cell| cell.date)
    }

    /// All representable dates on the grid, in order.
    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.cells.iter().filter_map(|cell| cell.date)
    }

    /// ISO-8601 week number of each row.
    pub fn iso_week_numbers(&self) -> Vec<Option<u32>> {
        self.rows()
            .map(|row| row.iter().find_map(|cell| cell.date).map(|d| d.iso_week().week()))
            .collect()
    }

    /// Week number of each row where week 1 is the week containing January 1st
    /// and weeks start on the grid's first day of week.
    pub fn week_numbers(&self) -> Vec<Option<u32>> {
        self.rows()
            .map(|row| {
                row.iter()
                    .find_map(|cell| cell.date)
                    .and_then(|d| first_day_week_of_year(d, self.first_day_of_week))
            })
            .collect()
    }
}

fn first_day_week_of_year(date: NaiveDate, first_day_of_week: u8) -> Option<u32> {
    let jan_first = NaiveDate::from_ymd_opt(date.year(), 1, 1)?;
    let jan_offset =
        (jan_first.weekday().num_days_from_sunday() as i64 - first_day_of_week as i64 + 7) % 7;
    let day_of_year = date.ordinal0() as i64;
    Some(((day_of_year + jan_offset) / 7 + 1) as u32)
}
