//! Date-range picker facade.
//!
//! Owns the configuration, host hooks, selection state and the two displayed
//! months, and turns user input (clicks, hovers, typed text, predefined
//! ranges) into selection changes and host notifications.

mod listener;
mod navigation;
mod refresh;

pub use listener::{NoopListener, PickerListener};
pub use refresh::{HookRequest, HookResponse};

#[cfg(test)]
pub use listener::MockPickerListener;

use chrono::{Local, NaiveDate};
use std::fmt;

use crate::models::calendar_cell::Side;
use crate::models::calendar_month::CalendarMonth;
use crate::models::date_range::DateRange;
use crate::models::settings::PickerConfig;
use crate::services::classifier::{classify_grid, ClassifyContext};
use crate::services::grid::MonthGrid;
use crate::services::hooks::{EvaluationTokens, HookResults, PickerHooks};
use crate::services::parser::{format_range, parse_range_text};
use crate::services::selection::{
    RangeSelection, SelectionEvent, SelectionPhase, SelectionRules,
};
use crate::utils::date::add_days_saturating;

pub struct DateRangePicker {
    config: PickerConfig,
    hooks: PickerHooks,
    listener: Box<dyn PickerListener>,
    selection: RangeSelection,
    left: CalendarMonth,
    right: CalendarMonth,
    today: NaiveDate,
    open: bool,
    show_calendars: bool,
    chosen_label: Option<String>,
    edit_text: Option<String>,
    hook_results: HookResults,
    tokens: EvaluationTokens,
}

impl fmt::Debug for DateRangePicker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DateRangePicker")
            .field("selection", &self.selection)
            .field("left", &self.left)
            .field("right", &self.right)
            .field("open", &self.open)
            .field("chosen_label", &self.chosen_label)
            .field("edit_text", &self.edit_text)
            .finish_non_exhaustive()
    }
}

impl DateRangePicker {
    /// Create a picker showing the current month on the left.
    ///
    /// # Examples
    /// ```
    /// use daterange_picker::models::settings::PickerOptions;
    /// use daterange_picker::services::picker::DateRangePicker;
    /// use chrono::NaiveDate;
    ///
    /// let config = PickerOptions::new().auto_apply(true).resolve().unwrap();
    /// let mut picker = DateRangePicker::new(config);
    /// picker.click_date(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
    /// picker.click_date(NaiveDate::from_ymd_opt(2024, 3, 5).unwrap());
    /// assert_eq!(picker.formatted_range(), "03/01/2024 - 03/05/2024");
    /// ```
    pub fn new(config: PickerConfig) -> Self {
        let today = Local::now().date_naive();
        let left = CalendarMonth::from_date(today);
        let show_calendars = config.always_show_calendars || config.ranges.is_empty();

        let mut picker = Self {
            config,
            hooks: PickerHooks::default(),
            listener: Box::new(NoopListener),
            selection: RangeSelection::new(),
            left,
            right: left.next().unwrap_or(left),
            today,
            open: false,
            show_calendars,
            chosen_label: None,
            edit_text: None,
            hook_results: HookResults::default(),
            tokens: EvaluationTokens::new(),
        };
        picker.adjust_calendars();
        picker
    }

    pub fn with_hooks(mut self, hooks: PickerHooks) -> Self {
        self.hooks = hooks;
        self
    }

    pub fn with_listener(mut self, listener: Box<dyn PickerListener>) -> Self {
        self.listener = listener;
        self
    }

    /// Start from an already bound range.
    pub fn with_range(mut self, range: DateRange) -> Self {
        self.set_range(range);
        self
    }

    /// Override the date used for the "today" marker.
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.set_today(today);
        self
    }

    pub fn set_today(&mut self, today: NaiveDate) {
        self.today = today;
        if self.selection.pending_start().is_none() {
            self.adjust_calendars();
        }
    }

    /// Bind a range from the host without notifying it back.
    pub fn set_range(&mut self, range: DateRange) {
        self.selection = RangeSelection::with_committed(range);
        self.chosen_label = self.matching_label();
        self.adjust_calendars();
    }

    pub fn config(&self) -> &PickerConfig {
        &self.config
    }

    pub fn selection(&self) -> &RangeSelection {
        &self.selection
    }

    pub fn phase(&self) -> SelectionPhase {
        self.selection.phase()
    }

    /// The range currently bound to the host.
    pub fn committed(&self) -> Option<DateRange> {
        self.selection.committed()
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Whether the calendars are shown next to the predefined ranges.
    pub fn calendars_visible(&self) -> bool {
        self.show_calendars
    }

    pub fn chosen_label(&self) -> Option<&str> {
        self.chosen_label.as_deref()
    }

    /// Classified grid for one side.
    pub fn calendar(&self, side: Side) -> MonthGrid {
        let month = self.month(side);
        let mut grid = MonthGrid::build(month, self.config.first_day_of_week, side);
        let ctx = self.classify_context(side, month);
        classify_grid(&mut grid, &ctx, |date| {
            self.hooks.outcome_for(date, &self.hook_results)
        });
        grid
    }

    /// Localised weekday column headers, starting at the first day of week.
    pub fn weekday_header(&self) -> Vec<String> {
        self.config.culture.weekday_header(self.config.first_day_of_week)
    }

    /// "March 2024" style caption for one side.
    pub fn month_label(&self, side: Side) -> String {
        let month = self.month(side);
        format!(
            "{} {}",
            self.config.culture.month_name(month.month()),
            month.year()
        )
    }

    fn classify_context(&self, side: Side, month: CalendarMonth) -> ClassifyContext<'_> {
        ClassifyContext {
            month,
            side,
            today: self.today,
            constraints: self.config.constraints(),
            highlight: self.selection.highlight(),
            custom_date_class: self.config.custom_date_class.as_deref(),
        }
    }

    fn rules(&self) -> SelectionRules {
        SelectionRules {
            single_date: self.config.single_date_picker,
            auto_apply: self.config.auto_apply,
            times: self.config.time_settings,
        }
    }

    /// Move a clicked date inside the configured bounds.
    ///
    /// Returns `None` when no valid date remains, e.g. a minimum span that
    /// would push the end past the maximum date.
    fn clamp_click(&self, date: NaiveDate) -> Option<NaiveDate> {
        let mut date = date;
        if let Some(min) = self.config.min_date {
            date = date.max(min);
        }
        if let Some(max) = self.config.max_date {
            date = date.min(max);
        }

        let picking_start = self
            .selection
            .pending_start()
            .filter(|_| self.selection.phase() == SelectionPhase::PickingEnd)
            .map(|start| start.date());
        if let (Some(start), false) = (picking_start, self.config.single_date_picker) {
            if date >= start {
                if let Some(span) = self.config.min_span {
                    date = date.max(add_days_saturating(start, span as i64));
                }
                if let Some(span) = self.config.max_span {
                    date = date.min(add_days_saturating(start, span as i64));
                }
                if self.config.max_date.is_some_and(|max| date > max) {
                    return None;
                }
            }
        }

        Some(date)
    }

    /// Handle a click on a day cell. Returns whether the click changed the
    /// selection.
    pub fn click_date(&mut self, date: NaiveDate) -> bool {
        let Some(date) = self.clamp_click(date) else {
            log::debug!("Ignoring click on {}: no valid end within bounds", date);
            return false;
        };
        if !self.hooks.outcome_for(date, &self.hook_results).enabled {
            log::debug!("Ignoring click on disabled day {}", date);
            return false;
        }

        let rules = self.rules();
        let events = self.selection.click(date, &rules);
        let applied = events
            .iter()
            .any(|event| matches!(event, SelectionEvent::RangeSelected(_)));

        self.edit_text = None;
        self.dispatch(events);

        if applied {
            self.chosen_label = self.matching_label();
            self.close();
        }
        true
    }

    /// Handle a click on a cell of one calendar.
    ///
    /// Clicks on cells drawn as disabled are ignored, so the right calendar
    /// cannot restart a pick from a day before the pending start. A click on
    /// a date the grid does not show is ignored as well.
    pub fn click_cell(&mut self, side: Side, date: NaiveDate) -> bool {
        let grid = self.calendar(side);
        match grid.find(date) {
            Some(cell) if !cell.is_disabled => self.click_date(date),
            Some(_) => {
                log::debug!("Ignoring click on disabled {:?} cell {}", side, date);
                false
            }
            None => false,
        }
    }

    /// Update the hover preview. Returns whether the grids need repainting.
    pub fn hover_date(&mut self, date: NaiveDate) -> bool {
        self.selection.hover_date(date)
    }

    /// Apply the pending pick. Ignored until both ends are picked.
    pub fn apply(&mut self) -> bool {
        if self.selection.phase() != SelectionPhase::Committed {
            return false;
        }
        let events = self.selection.commit();
        self.dispatch(events);
        self.chosen_label = self.matching_label();
        self.close();
        true
    }

    /// Discard the pending pick and close.
    pub fn cancel(&mut self) {
        self.selection.cancel();
        self.edit_text = None;
        self.listener.cancel();
        self.close();
    }

    /// Clear pending and committed values.
    pub fn reset(&mut self) {
        log::info!("Resetting date range picker");
        let events = self.selection.reset();
        self.edit_text = None;
        self.chosen_label = None;
        self.dispatch(events);
        self.adjust_calendars();
    }

    pub fn open(&mut self) {
        if self.open {
            return;
        }
        self.selection.cancel();
        self.chosen_label = self.matching_label();
        if self.chosen_label.as_deref() == Some(self.config.custom_range_label.as_str()) {
            self.show_calendars = true;
        }
        if self.config.auto_adjust_calendars {
            self.adjust_calendars();
        }
        self.open = true;
        log::debug!("Picker opened");
        self.listener.opened();
    }

    /// Close the popup. An unfinished pick is dropped.
    pub fn close(&mut self) {
        if !self.open {
            return;
        }
        if self.selection.phase() != SelectionPhase::Committed {
            self.selection.cancel();
        }
        self.selection.clear_hover();
        self.open = false;
        log::debug!("Picker closed");
        self.listener.closed();
    }

    pub fn toggle(&mut self) {
        if self.open {
            self.close();
        } else {
            self.open();
        }
    }

    /// Apply a predefined range by label. The custom range label only
    /// reveals the calendars.
    pub fn click_range(&mut self, label: &str) -> bool {
        if label == self.config.custom_range_label {
            self.chosen_label = Some(label.to_string());
            self.show_calendars = true;
            return true;
        }

        let Some(named) = self.config.range_for_label(label) else {
            log::warn!("Unknown predefined range '{}'", label);
            return false;
        };
        let start = self.clamp_bounds(named.start);
        let end = self.clamp_bounds(named.end);
        let range = match DateRange::from_dates(start, end, &self.config.time_settings) {
            Ok(range) => range,
            Err(err) => {
                log::warn!("Predefined range '{}' is unusable: {}", label, err);
                return false;
            }
        };

        self.chosen_label = Some(label.to_string());
        if !self.config.always_show_calendars {
            self.show_calendars = false;
        }
        self.edit_text = None;
        let events = self.selection.commit_range(range);
        self.dispatch(events);
        self.adjust_calendars();
        self.close();
        true
    }

    fn clamp_bounds(&self, date: NaiveDate) -> NaiveDate {
        let date = self.config.min_date.map_or(date, |min| date.max(min));
        self.config.max_date.map_or(date, |max| date.min(max))
    }

    /// Label of the predefined range matching the committed dates, else the
    /// custom range label.
    fn matching_label(&self) -> Option<String> {
        let committed = self.selection.committed()?;
        let named = self
            .config
            .ranges
            .iter()
            .find(|range| range.start == committed.start_date() && range.end == committed.end_date());
        match named {
            Some(range) => Some(range.label.clone()),
            None if self.config.show_custom_range_label => {
                Some(self.config.custom_range_label.clone())
            }
            None => None,
        }
    }

    /// Handle text typed into the input field.
    ///
    /// A valid range is committed immediately. Empty text resets when
    /// configured to. Anything else leaves the selection untouched and keeps
    /// the text for display. Returns whether the selection changed.
    pub fn on_text_input(&mut self, text: &str) -> bool {
        if text.trim().is_empty() && self.config.reset_on_clear {
            self.reset();
            return true;
        }

        match parse_range_text(text, &self.config) {
            Ok((start, end)) => {
                let range = match DateRange::from_dates(start, end, &self.config.time_settings) {
                    Ok(range) => range,
                    Err(err) => {
                        log::warn!("Rejected typed range '{}': {}", text, err);
                        self.edit_text = Some(text.to_string());
                        return false;
                    }
                };
                self.edit_text = None;
                let events = self.selection.commit_range(range);
                self.dispatch(events);
                self.chosen_label = self.matching_label();
                self.adjust_calendars();
                true
            }
            Err(err) => {
                log::warn!("Could not parse '{}': {}", text, err);
                self.edit_text = Some(text.to_string());
                false
            }
        }
    }

    /// Drop any half-typed text so the committed range is displayed again.
    pub fn lost_focus(&mut self) {
        self.edit_text = None;
    }

    /// Text shown in the input field.
    pub fn formatted_range(&self) -> String {
        if let Some(text) = &self.edit_text {
            return text.clone();
        }
        match self.selection.committed_start() {
            Some(start) => format_range(
                start.date(),
                self.selection.committed_end().map(|end| end.date()),
                &self.config,
            ),
            None => String::new(),
        }
    }

    fn dispatch(&mut self, events: Vec<SelectionEvent>) {
        for event in events {
            match event {
                SelectionEvent::SelectionStart(start) => self.listener.selection_start(start),
                SelectionEvent::SelectionEnd(end) => self.listener.selection_end(end),
                SelectionEvent::StartChanged(start) => self.listener.start_changed(start),
                SelectionEvent::EndChanged(end) => self.listener.end_changed(end),
                SelectionEvent::RangeSelected(range) => self.listener.range_selected(range),
                SelectionEvent::Reset => self.listener.reset(),
            }
        }
    }
}
