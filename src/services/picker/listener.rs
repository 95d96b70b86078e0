use chrono::NaiveDateTime;

use crate::models::calendar_cell::Side;
use crate::models::calendar_month::CalendarMonth;
use crate::models::date_range::DateRange;

/// Host notifications. Every method defaults to a no-op so hosts only
/// implement what they listen to.
#[cfg_attr(test, mockall::automock)]
pub trait PickerListener: Send {
    /// A range was applied.
    fn range_selected(&mut self, _range: DateRange) {}

    /// The committed start changed (`None` after a reset).
    fn start_changed(&mut self, _start: Option<NaiveDateTime>) {}

    fn end_changed(&mut self, _end: Option<NaiveDateTime>) {}

    /// A new pick was started.
    fn selection_start(&mut self, _start: NaiveDateTime) {}

    /// The end of a pick was chosen, before it is applied.
    fn selection_end(&mut self, _end: NaiveDateTime) {}

    fn month_changed(&mut self, _side: Side, _month: CalendarMonth) {}

    fn opened(&mut self) {}

    fn closed(&mut self) {}

    fn cancel(&mut self) {}

    fn reset(&mut self) {}
}

/// Listener used when the host registers none.
#[derive(Debug, Default)]
pub struct NoopListener;

impl PickerListener for NoopListener {}
