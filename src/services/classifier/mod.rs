//! Cell classifier.
//!
//! Computes the display/interaction state of every cell of a month grid from
//! the pending selection, the hover preview and the configured constraints.
//! Rules are evaluated in a fixed order and their markers accumulate; any
//! disabling rule marks the cell disabled.

use chrono::{Datelike, NaiveDate, Weekday};

use crate::models::calendar_cell::{CalendarCell, CellClass, CellClasses, Side};
use crate::models::calendar_month::CalendarMonth;
use crate::models::settings::Constraints;
use crate::services::grid::MonthGrid;
use crate::services::hooks::HookOutcome;
use crate::utils::date::add_days_saturating;

/// Date-only view of the in-progress selection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Highlight {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    pub hover: Option<NaiveDate>,
}

impl Highlight {
    /// A start is picked and the end is still open.
    pub fn picking_end(&self) -> bool {
        self.start.is_some() && self.end.is_none()
    }
}

/// Everything the classifier reads besides the hook outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClassifyContext<'a> {
    pub month: CalendarMonth,
    pub side: Side,
    pub today: NaiveDate,
    pub constraints: Constraints,
    pub highlight: Highlight,
    pub custom_date_class: Option<&'a str>,
}

impl ClassifyContext<'_> {
    /// Earliest selectable date for this side.
    ///
    /// While an end is being picked the right calendar starts at the pending
    /// start, so an end before the start cannot be picked there.
    pub fn effective_min_date(&self) -> Option<NaiveDate> {
        let global = self.constraints.min_date;
        match (self.side, self.highlight.start) {
            (Side::Right, Some(start)) if self.highlight.picking_end() => {
                Some(global.map_or(start, |min| min.max(start)))
            }
            _ => global,
        }
    }

    /// Latest selectable date, reduced to `start + max_span` while an end is
    /// being picked.
    pub fn effective_max_date(&self) -> Option<NaiveDate> {
        let global = self.constraints.max_date;
        match (self.highlight.start, self.constraints.max_span) {
            (Some(start), Some(span)) if self.highlight.picking_end() => {
                let limit = add_days_saturating(start, span as i64);
                Some(global.map_or(limit, |max| max.min(limit)))
            }
            _ => global,
        }
    }

    /// Whether a pending span ending on `date` would break min/max span.
    fn violates_span(&self, date: NaiveDate) -> bool {
        let Some(start) = self.highlight.start.filter(|_| self.highlight.picking_end()) else {
            return false;
        };
        if let Some(min_span) = self.constraints.min_span.filter(|span| *span > 0) {
            let first_allowed = add_days_saturating(start, min_span as i64);
            if date >= start && date < first_allowed {
                return true;
            }
        }
        if let Some(max_span) = self.constraints.max_span {
            if date > add_days_saturating(start, max_span as i64) {
                return true;
            }
        }
        false
    }
}

/// Classify a single date. Returns the disabled flag and the accumulated markers.
pub fn classify_date(
    date: NaiveDate,
    ctx: &ClassifyContext<'_>,
    outcome: &HookOutcome,
) -> (bool, CellClasses) {
    let mut classes = CellClasses::new();
    let mut disabled = false;
    let mut disable = |classes: &mut CellClasses| {
        classes.push(CellClass::Off);
        classes.push(CellClass::Disabled);
        disabled = true;
    };

    if date == ctx.today {
        classes.push(CellClass::Today);
    }

    if matches!(date.weekday(), Weekday::Sat | Weekday::Sun) {
        classes.push(CellClass::Weekend);
    }

    if !ctx.month.contains(date) {
        classes.push(CellClass::Off);
        classes.push(CellClass::Ends);
    }

    if ctx.effective_min_date().is_some_and(|min| date < min)
        || ctx.effective_max_date().is_some_and(|max| date > max)
    {
        disable(&mut classes);
    }

    if ctx.violates_span(date) {
        disable(&mut classes);
    }

    if !outcome.enabled {
        disable(&mut classes);
    }

    let highlight = ctx.highlight;
    if highlight.start == Some(date) {
        classes.push(CellClass::Active);
        classes.push(CellClass::StartDate);
    }
    if highlight.end == Some(date) {
        classes.push(CellClass::Active);
        classes.push(CellClass::EndDate);
    }

    if let (Some(start), Some(end)) = (highlight.start, highlight.end) {
        if date > start && date < end {
            classes.push(CellClass::InRange);
        }
    }

    if let Some(name) = outcome.custom.class_name(ctx.custom_date_class) {
        classes.push(CellClass::Custom(name));
    }

    if highlight.end.is_none() {
        if let Some(hover) = highlight.hover {
            let after_start = highlight.start.is_some_and(|start| date > start);
            if (after_start && date < hover) || date == hover {
                classes.push(CellClass::InRange);
            }
        }
    }

    if !disabled {
        classes.push(CellClass::Available);
    }

    (disabled, classes)
}

/// Classify every in-range cell of `grid` in place. Out-of-range cells are
/// left untouched.
pub fn classify_grid<F>(grid: &mut MonthGrid, ctx: &ClassifyContext<'_>, outcome_for: F)
where
    F: Fn(NaiveDate) -> HookOutcome,
{
    for cell in grid.cells_mut() {
        classify_cell(cell, ctx, &outcome_for);
    }
}

fn classify_cell<F>(cell: &mut CalendarCell, ctx: &ClassifyContext<'_>, outcome_for: &F)
where
    F: Fn(NaiveDate) -> HookOutcome,
{
    let Some(date) = cell.date else {
        return;
    };
    let (disabled, classes) = classify_date(date, ctx, &outcome_for(date));
    cell.is_disabled = disabled;
    cell.classes = classes;
}
