use chrono::NaiveDate;

use crate::models::calendar_cell::Side;
use crate::models::calendar_month::CalendarMonth;
use crate::services::hooks::{
    evaluate_dates, EvaluationToken, EvaluationTokens, HookResults, PickerHooks,
};

/// Deferred hook evaluation for the currently visible grids.
///
/// Detached from the picker so the host can await it elsewhere while the
/// picker keeps handling input. A request issued later supersedes this one.
#[derive(Debug)]
pub struct HookRequest {
    pub(super) hooks: PickerHooks,
    pub(super) dates: Vec<NaiveDate>,
    pub(super) token: EvaluationToken,
    pub(super) tokens: EvaluationTokens,
    pub(super) month_change: Option<(Side, CalendarMonth)>,
}

/// Outcome of a finished `HookRequest`.
#[derive(Debug, Clone, PartialEq)]
pub struct HookResponse {
    pub(super) token: EvaluationToken,
    pub(super) results: HookResults,
}

impl HookRequest {
    pub fn token(&self) -> EvaluationToken {
        self.token
    }

    pub fn date_count(&self) -> usize {
        self.dates.len()
    }

    /// Await the deferred hooks, then the month-changed hook.
    ///
    /// Returns `None` when a newer request superseded this one; the
    /// month-changed hook is not called in that case.
    pub async fn evaluate(self) -> Option<HookResponse> {
        let results = if self.hooks.has_deferred() {
            evaluate_dates(&self.hooks, self.dates, self.token, &self.tokens).await?
        } else {
            HookResults::default()
        };

        if let Some((side, month)) = self.month_change {
            self.hooks.notify_month_changed(side, month).await;
        }

        Some(HookResponse {
            token: self.token,
            results,
        })
    }
}

impl HookResponse {
    pub fn token(&self) -> EvaluationToken {
        self.token
    }

    pub fn results(&self) -> &HookResults {
        &self.results
    }
}
