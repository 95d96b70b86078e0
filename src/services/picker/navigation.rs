use chrono::NaiveDate;
use std::collections::BTreeSet;

use super::refresh::{HookRequest, HookResponse};
use super::DateRangePicker;
use crate::models::calendar_cell::Side;
use crate::models::calendar_month::CalendarMonth;
use crate::services::grid::MonthGrid;

/// A left/right pair that never shows the same month twice.
fn pair_from_left(left: CalendarMonth) -> (CalendarMonth, CalendarMonth) {
    match left.next() {
        Some(right) => (left, right),
        None => (left.previous().unwrap_or(left), left),
    }
}

fn pair_from_right(right: CalendarMonth) -> (CalendarMonth, CalendarMonth) {
    match right.previous() {
        Some(left) => (left, right),
        None => pair_from_left(right),
    }
}

impl DateRangePicker {
    pub fn month(&self, side: Side) -> CalendarMonth {
        match side {
            Side::Left => self.left,
            Side::Right => self.right,
        }
    }

    /// Show the pending start on the left and the pending end (or the
    /// following month) on the right.
    pub fn adjust_calendars(&mut self) {
        let highlight = self.selection.highlight();
        let start = highlight.start.unwrap_or(self.today);
        let start_month = CalendarMonth::from_date(start);

        // Keep the view while an end is being picked and the start is visible
        if highlight.picking_end() && (start_month == self.left || start_month == self.right) {
            return;
        }

        let (left, right) = match highlight.end.map(CalendarMonth::from_date) {
            Some(end_month) if !self.config.linked_calendars && end_month > start_month => {
                (start_month, end_month)
            }
            _ => pair_from_left(start_month),
        };
        if (left, right) != (self.left, self.right) {
            log::debug!("Calendars adjusted to {} / {}", left, right);
        }
        self.left = left;
        self.right = right;
        if self.needs_hook_refresh() {
            log::debug!("Visible dates await hook evaluation");
        }
    }

    /// Whether the previous-month control is offered on `side`.
    ///
    /// Uses the same side-specific bounds as the grid, so the right calendar
    /// cannot page before a pending start.
    pub fn prev_available(&self, side: Side) -> bool {
        if self.config.linked_calendars && side == Side::Right {
            return false;
        }
        let month = self.month(side);
        let min = self.classify_context(side, month).effective_min_date();
        month.previous().is_some() && min.map_or(true, |min| min < month.first_day())
    }

    /// Whether the next-month control is offered on `side`.
    pub fn next_available(&self, side: Side) -> bool {
        if self.config.linked_calendars && side == Side::Left && !self.config.single_date_picker {
            return false;
        }
        let month = self.month(side);
        let max = self.classify_context(side, month).effective_max_date();
        month.next().is_some() && max.map_or(true, |max| max > month.last_day())
    }

    /// Every date shown on either grid, ascending and without duplicates.
    pub fn visible_dates(&self) -> Vec<NaiveDate> {
        let fdow = self.config.first_day_of_week;
        let dates: BTreeSet<NaiveDate> = [Side::Left, Side::Right]
            .into_iter()
            .flat_map(|side| MonthGrid::build(self.month(side), fdow, side).dates().collect::<Vec<_>>())
            .collect();
        dates.into_iter().collect()
    }

    /// Show `month` on `side` and request a hook refresh for the new view.
    ///
    /// Linked calendars move together; unlinked ones are only pushed apart
    /// when they would overlap.
    pub fn begin_month_change(&mut self, side: Side, month: CalendarMonth) -> HookRequest {
        let (left, right) = match side {
            Side::Left if self.config.linked_calendars || month >= self.right => {
                pair_from_left(month)
            }
            Side::Left => (month, self.right),
            Side::Right if self.config.linked_calendars || month <= self.left => {
                pair_from_right(month)
            }
            Side::Right => (self.left, month),
        };
        self.left = left;
        self.right = right;

        log::debug!("{:?} calendar changed to {}", side, month);
        self.listener.month_changed(side, month);
        self.request_hooks(Some((side, month)))
    }

    /// Whether some visible date still waits on a deferred hook answer.
    ///
    /// Becomes true whenever the picker moves its own calendars, e.g. after
    /// typed text, a predefined range or a reset.
    pub fn needs_hook_refresh(&self) -> bool {
        self.hooks.has_deferred()
            && self
                .visible_dates()
                .into_iter()
                .any(|date| self.hooks.is_pending(date, &self.hook_results))
    }

    /// Refresh request for the current view when it has unanswered dates.
    pub fn pending_hook_request(&self) -> Option<HookRequest> {
        self.needs_hook_refresh().then(|| self.hook_request())
    }

    /// Hook refresh for the current view without a month change.
    pub fn hook_request(&self) -> HookRequest {
        self.request_hooks(None)
    }

    fn request_hooks(&self, month_change: Option<(Side, CalendarMonth)>) -> HookRequest {
        let dates = if self.hooks.has_deferred() {
            self.visible_dates()
        } else {
            Vec::new()
        };
        HookRequest {
            hooks: self.hooks.clone(),
            dates,
            token: self.tokens.issue(),
            tokens: self.tokens.clone(),
            month_change,
        }
    }

    /// Store evaluated hook results unless a newer request superseded them.
    pub fn apply_hook_results(&mut self, response: HookResponse) -> bool {
        if !self.tokens.is_current(response.token) {
            log::warn!("Ignoring stale hook results {:?}", response.token);
            return false;
        }
        self.hook_results = response.results;
        true
    }

    /// Change month and await its hook evaluation.
    pub async fn change_month(&mut self, side: Side, month: CalendarMonth) -> bool {
        let request = self.begin_month_change(side, month);
        match request.evaluate().await {
            Some(response) => self.apply_hook_results(response),
            None => false,
        }
    }

    /// Step `side` by `delta` months when navigation allows it.
    pub async fn navigate(&mut self, side: Side, delta: i32) -> bool {
        let allowed = match delta {
            0 => return false,
            d if d < 0 => self.prev_available(side),
            _ => self.next_available(side),
        };
        let Some(month) = self.month(side).shift(delta).filter(|_| allowed) else {
            return false;
        };
        self.change_month(side, month).await
    }

    /// Re-evaluate hooks for the current view.
    pub async fn refresh_hooks(&mut self) -> bool {
        match self.hook_request().evaluate().await {
            Some(response) => self.apply_hook_results(response),
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::models::calendar_cell::{CellClass, Side};
    use crate::models::calendar_month::CalendarMonth;
    use crate::models::date_range::{DateRange, NamedRange};
    use crate::models::settings::PickerOptions;
    use crate::services::hooks::PickerHooks;
    use crate::services::picker::{DateRangePicker, MockPickerListener};
    use chrono::{Datelike, NaiveDate};
    use mockall::predicate::eq;
    use std::time::Duration;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn month(y: i32, m: u32) -> CalendarMonth {
        CalendarMonth::new(y, m).unwrap()
    }

    fn picker(options: PickerOptions) -> DateRangePicker {
        DateRangePicker::new(options.resolve().unwrap()).with_today(date(2024, 3, 14))
    }

    #[tokio::test]
    async fn test_linked_calendars_move_together() {
        let mut picker = picker(PickerOptions::new());
        assert!(picker.navigate(Side::Right, 1).await);
        assert_eq!(picker.month(Side::Left), month(2024, 4));
        assert_eq!(picker.month(Side::Right), month(2024, 5));

        assert!(picker.navigate(Side::Left, -2).await);
        assert_eq!(picker.month(Side::Left), month(2024, 2));
        assert_eq!(picker.month(Side::Right), month(2024, 3));
    }

    #[tokio::test]
    async fn test_unlinked_calendars_never_overlap() {
        let mut picker = picker(PickerOptions::new().linked_calendars(false));
        picker.change_month(Side::Right, month(2024, 8)).await;
        assert_eq!(picker.month(Side::Left), month(2024, 3));

        picker.change_month(Side::Left, month(2024, 9)).await;
        assert_eq!(picker.month(Side::Left), month(2024, 9));
        assert_eq!(picker.month(Side::Right), month(2024, 10));
    }

    #[test]
    fn test_navigation_availability() {
        let picker = picker(
            PickerOptions::new()
                .min_date(date(2024, 3, 1))
                .max_date(date(2024, 4, 30)),
        );
        assert!(!picker.prev_available(Side::Left));
        assert!(!picker.next_available(Side::Right));
        // Linked: only the outer controls are offered
        assert!(!picker.next_available(Side::Left));
        assert!(!picker.prev_available(Side::Right));

        let unlinked = self::picker(PickerOptions::new().linked_calendars(false));
        assert!(unlinked.next_available(Side::Left));
        assert!(unlinked.prev_available(Side::Right));
    }

    #[tokio::test]
    async fn test_navigate_refuses_past_bounds() {
        let mut picker = picker(PickerOptions::new().min_date(date(2024, 3, 1)));
        assert!(!picker.navigate(Side::Left, -1).await);
        assert_eq!(picker.month(Side::Left), month(2024, 3));
    }

    #[test]
    fn test_adjust_calendars_to_committed_range() {
        let range = DateRange::from_dates(date(2024, 5, 20), date(2024, 8, 2), &Default::default())
            .unwrap();
        let linked = picker(PickerOptions::new()).with_range(range);
        assert_eq!(linked.month(Side::Left), month(2024, 5));
        assert_eq!(linked.month(Side::Right), month(2024, 6));

        let unlinked = picker(PickerOptions::new().linked_calendars(false)).with_range(range);
        assert_eq!(unlinked.month(Side::Left), month(2024, 5));
        assert_eq!(unlinked.month(Side::Right), month(2024, 8));
    }

    #[test]
    fn test_month_changed_listener() {
        let mut listener = MockPickerListener::new();
        listener
            .expect_month_changed()
            .with(eq(Side::Left), eq(month(2024, 6)))
            .times(1)
            .return_const(());
        let mut picker = picker(PickerOptions::new()).with_listener(Box::new(listener));
        let request = picker.begin_month_change(Side::Left, month(2024, 6));
        assert_eq!(request.date_count(), 0);
    }

    #[tokio::test]
    async fn test_deferred_hooks_applied_after_month_change() {
        let hooks = PickerHooks::new()
            .days_enabled_async(|d| async move { d != NaiveDate::from_ymd_opt(2024, 6, 12).unwrap() });
        let mut picker = picker(PickerOptions::new()).with_hooks(hooks);

        assert!(picker.change_month(Side::Left, month(2024, 6)).await);
        let grid = picker.calendar(Side::Left);
        assert!(grid.find(date(2024, 6, 12)).unwrap().is_disabled);
        assert!(grid.find(date(2024, 6, 13)).unwrap().has_class(&CellClass::Available));
    }

    #[tokio::test]
    async fn test_superseded_month_change_is_dropped() {
        let hooks = PickerHooks::new().days_enabled_async(|_| async {
            tokio::time::sleep(Duration::from_millis(20)).await;
            false
        });
        let mut picker = picker(PickerOptions::new()).with_hooks(hooks);

        let stale = picker.begin_month_change(Side::Left, month(2024, 6));
        let fresh = picker.begin_month_change(Side::Left, month(2024, 7));
        assert!(stale.evaluate().await.is_none());

        let response = fresh.evaluate().await.unwrap();
        assert!(picker.apply_hook_results(response));
        assert_eq!(picker.month(Side::Left), month(2024, 7));
        assert!(picker.calendar(Side::Left).find(date(2024, 7, 10)).unwrap().is_disabled);
    }

    #[tokio::test]
    async fn test_stale_response_is_not_applied() {
        let hooks = PickerHooks::new().days_enabled_async(|_| async { false });
        let mut picker = picker(PickerOptions::new()).with_hooks(hooks);

        let first = picker.hook_request();
        let response = first.evaluate().await.unwrap();
        let _newer = picker.hook_request();
        assert!(!picker.apply_hook_results(response));
        // Nothing cached yet: unanswered days stay disabled
        assert!(picker.calendar(Side::Left).find(date(2024, 3, 10)).unwrap().is_disabled);
        assert!(!picker.click_date(date(2024, 3, 10)));
        assert!(picker.needs_hook_refresh());
    }

    #[tokio::test]
    async fn test_text_input_moving_the_view_needs_refresh() {
        let hooks = PickerHooks::new()
            .days_enabled_async(|d| async move { d != NaiveDate::from_ymd_opt(2024, 7, 10).unwrap() });
        let mut picker = picker(PickerOptions::new()).with_hooks(hooks);
        assert!(picker.refresh_hooks().await);
        assert!(picker.pending_hook_request().is_none());

        assert!(picker.on_text_input("07/01/2024 - 07/05/2024"));
        assert_eq!(picker.month(Side::Left), month(2024, 7));
        assert!(picker.needs_hook_refresh());
        assert!(picker.calendar(Side::Left).find(date(2024, 7, 10)).unwrap().is_disabled);
        assert!(!picker.click_date(date(2024, 7, 10)));

        let request = picker.pending_hook_request().unwrap();
        let response = request.evaluate().await.unwrap();
        assert!(picker.apply_hook_results(response));
        assert!(!picker.needs_hook_refresh());
        assert!(picker.calendar(Side::Left).find(date(2024, 7, 10)).unwrap().is_disabled);
        assert!(picker.click_date(date(2024, 7, 11)));
    }

    #[tokio::test]
    async fn test_predefined_range_moving_the_view_needs_refresh() {
        let hooks = PickerHooks::new().days_enabled_async(|d| async move { d.day() != 15 });
        let ranges = vec![NamedRange::new("Autumn", date(2024, 10, 1), date(2024, 10, 31)).unwrap()];
        let mut picker = picker(PickerOptions::new().ranges(ranges)).with_hooks(hooks);
        picker.refresh_hooks().await;

        assert!(picker.click_range("Autumn"));
        assert_eq!(picker.month(Side::Left), month(2024, 10));
        assert!(!picker.click_date(date(2024, 10, 20)));

        assert!(picker.refresh_hooks().await);
        assert!(picker.calendar(Side::Left).find(date(2024, 10, 15)).unwrap().is_disabled);
        assert!(picker.click_date(date(2024, 10, 20)));
    }

    #[test]
    fn test_right_calendar_cannot_page_before_pending_start() {
        let mut picker = picker(PickerOptions::new().linked_calendars(false));
        assert!(picker.prev_available(Side::Right));

        picker.click_date(date(2024, 4, 3));
        assert_eq!(picker.month(Side::Right), month(2024, 4));
        assert!(!picker.prev_available(Side::Right));
        assert!(picker.prev_available(Side::Left));
    }

    #[test]
    fn test_max_span_limits_next_month() {
        let mut picker = picker(PickerOptions::new().linked_calendars(false).max_span(5));
        assert!(picker.next_available(Side::Right));

        picker.click_date(date(2024, 4, 3));
        assert!(!picker.next_available(Side::Right));
    }
}
