//! Range selection state machine.
//!
//! Tracks the in-progress (pending) pick, the committed range bound to the
//! host and the hover preview. Every mutation returns the notifications it
//! produced so the caller decides how to deliver them.

use chrono::{NaiveDate, NaiveDateTime};

use crate::models::date_range::{DateRange, TimeSettings};
use crate::services::classifier::Highlight;

/// Where the pending pick currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionPhase {
    /// No pending start
    Idle,
    /// Start picked, waiting for the end
    PickingEnd,
    /// Both ends picked
    Committed,
}

/// Notification produced by a selection change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionEvent {
    SelectionStart(NaiveDateTime),
    SelectionEnd(NaiveDateTime),
    StartChanged(Option<NaiveDateTime>),
    EndChanged(Option<NaiveDateTime>),
    RangeSelected(DateRange),
    Reset,
}

/// How clicks are turned into picks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SelectionRules {
    pub single_date: bool,
    pub auto_apply: bool,
    pub times: TimeSettings,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RangeSelection {
    pending_start: Option<NaiveDateTime>,
    pending_end: Option<NaiveDateTime>,
    committed_start: Option<NaiveDateTime>,
    committed_end: Option<NaiveDateTime>,
    hover: Option<NaiveDate>,
}

impl RangeSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an already bound range.
    pub fn with_committed(range: DateRange) -> Self {
        Self {
            pending_start: Some(range.start),
            pending_end: Some(range.end),
            committed_start: Some(range.start),
            committed_end: Some(range.end),
            hover: None,
        }
    }

    pub fn phase(&self) -> SelectionPhase {
        match (self.pending_start, self.pending_end) {
            (None, _) => SelectionPhase::Idle,
            (Some(_), None) => SelectionPhase::PickingEnd,
            (Some(_), Some(_)) => SelectionPhase::Committed,
        }
    }

    pub fn pending_start(&self) -> Option<NaiveDateTime> {
        self.pending_start
    }

    pub fn pending_end(&self) -> Option<NaiveDateTime> {
        self.pending_end
    }

    pub fn committed_start(&self) -> Option<NaiveDateTime> {
        self.committed_start
    }

    pub fn committed_end(&self) -> Option<NaiveDateTime> {
        self.committed_end
    }

    /// The committed range, once both ends are bound.
    pub fn committed(&self) -> Option<DateRange> {
        DateRange::new(self.committed_start?, self.committed_end?).ok()
    }

    pub fn hover(&self) -> Option<NaiveDate> {
        self.hover
    }

    /// Date-only view consumed by the classifier.
    pub fn highlight(&self) -> Highlight {
        Highlight {
            start: self.pending_start.map(|start| start.date()),
            end: self.pending_end.map(|end| end.date()),
            hover: self.hover,
        }
    }

    /// Apply a click on `date`.
    ///
    /// A click restarts the pick unless a start is pending and `date` is not
    /// before it; clicking the pending start again picks a single-day range.
    pub fn click(&mut self, date: NaiveDate, rules: &SelectionRules) -> Vec<SelectionEvent> {
        let mut events = Vec::new();
        self.hover = None;

        if rules.single_date {
            let start = rules.times.start_of(date);
            let end = rules.times.end_of(date).max(start);
            self.pending_start = Some(start);
            self.pending_end = Some(end);
            events.push(SelectionEvent::SelectionStart(start));
            events.push(SelectionEvent::SelectionEnd(end));
            if rules.auto_apply {
                events.extend(self.commit());
            }
            return events;
        }

        let restart = match (self.phase(), self.pending_start) {
            (SelectionPhase::PickingEnd, Some(start)) => date < start.date(),
            _ => true,
        };

        if restart {
            let start = rules.times.start_of(date);
            self.pending_end = None;
            self.pending_start = Some(start);
            log::debug!("Selection started at {}", start);
            events.push(SelectionEvent::SelectionStart(start));
        } else {
            // Never before the start, even with a late start time
            let end = self
                .pending_start
                .map_or(rules.times.end_of(date), |start| rules.times.end_of(date).max(start));
            self.pending_end = Some(end);
            log::debug!("Selection ended at {}", end);
            events.push(SelectionEvent::SelectionEnd(end));
            if rules.auto_apply {
                events.extend(self.commit());
            }
        }

        events
    }

    /// Update the hover preview. Only has an effect while the end is being
    /// picked; returns whether the preview changed.
    pub fn hover_date(&mut self, date: NaiveDate) -> bool {
        if self.phase() != SelectionPhase::PickingEnd || self.hover == Some(date) {
            return false;
        }
        self.hover = Some(date);
        true
    }

    pub fn clear_hover(&mut self) -> bool {
        self.hover.take().is_some()
    }

    /// Copy the pending pick to the committed values.
    pub fn commit(&mut self) -> Vec<SelectionEvent> {
        let mut events = Vec::new();
        self.hover = None;

        if self.committed_start != self.pending_start {
            self.committed_start = self.pending_start;
            events.push(SelectionEvent::StartChanged(self.committed_start));
        }
        if self.committed_end != self.pending_end {
            self.committed_end = self.pending_end;
            events.push(SelectionEvent::EndChanged(self.committed_end));
        }
        if let Some(range) = self.committed() {
            log::info!("Committed range {} to {}", range.start, range.end);
            events.push(SelectionEvent::RangeSelected(range));
        }

        events
    }

    /// Replace both pending and committed values with `range`.
    pub fn commit_range(&mut self, range: DateRange) -> Vec<SelectionEvent> {
        self.pending_start = Some(range.start);
        self.pending_end = Some(range.end);
        self.commit()
    }

    /// Drop the pending pick and restore the committed values.
    pub fn cancel(&mut self) {
        self.pending_start = self.committed_start;
        self.pending_end = self.committed_end;
        self.hover = None;
    }

    /// Clear everything.
    pub fn reset(&mut self) -> Vec<SelectionEvent> {
        self.pending_start = None;
        self.pending_end = None;
        self.hover = None;
        let mut events = self.commit();
        events.push(SelectionEvent::Reset);
        events
    }
}
