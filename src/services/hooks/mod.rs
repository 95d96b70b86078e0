//! Host-supplied date callbacks.
//!
//! Every hook honours one asynchronous contract (`BoxFuture`). Synchronous
//! closures are kept as ready hooks and can also be answered inline, so a
//! picker with only synchronous hooks classifies cells without a runtime.
//! Deferred (async) hooks are evaluated per month change on the tokio runtime
//! and their results are only applied while their evaluation token is current.

use chrono::NaiveDate;
use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::task::JoinSet;

use crate::models::calendar_cell::Side;
use crate::models::calendar_month::CalendarMonth;

pub type BoxFuture<T> = Pin<Box<dyn Future<Output = T> + Send + 'static>>;

/// Answer of the custom-date hook for one date.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CustomDateResult {
    #[default]
    NoClass,
    /// Add this class name to the cell
    ClassName(String),
    /// `true` adds the configured custom date class, `false` adds nothing
    UseConfiguredDefault(bool),
}

impl CustomDateResult {
    /// Class name to attach, if any.
    pub fn class_name(&self, configured: Option<&str>) -> Option<String> {
        match self {
            CustomDateResult::NoClass => None,
            CustomDateResult::ClassName(name) => Some(name.clone()),
            CustomDateResult::UseConfiguredDefault(true) => configured.map(str::to_string),
            CustomDateResult::UseConfiguredDefault(false) => None,
        }
        .filter(|name| !name.trim().is_empty())
    }
}

impl From<bool> for CustomDateResult {
    fn from(value: bool) -> Self {
        CustomDateResult::UseConfiguredDefault(value)
    }
}

impl From<String> for CustomDateResult {
    fn from(value: String) -> Self {
        CustomDateResult::ClassName(value)
    }
}

impl From<&str> for CustomDateResult {
    fn from(value: &str) -> Self {
        CustomDateResult::ClassName(value.to_string())
    }
}

impl From<Option<String>> for CustomDateResult {
    fn from(value: Option<String>) -> Self {
        value.map(CustomDateResult::ClassName).unwrap_or_default()
    }
}

enum DateHook<T> {
    Ready(Arc<dyn Fn(NaiveDate) -> T + Send + Sync>),
    Deferred(Arc<dyn Fn(NaiveDate) -> BoxFuture<T> + Send + Sync>),
}

impl<T> Clone for DateHook<T> {
    fn clone(&self) -> Self {
        match self {
            DateHook::Ready(f) => DateHook::Ready(Arc::clone(f)),
            DateHook::Deferred(f) => DateHook::Deferred(Arc::clone(f)),
        }
    }
}

impl<T: Send + 'static> DateHook<T> {
    fn call(&self, date: NaiveDate) -> BoxFuture<T> {
        match self {
            DateHook::Ready(f) => {
                let value = f(date);
                Box::pin(std::future::ready(value))
            }
            DateHook::Deferred(f) => f(date),
        }
    }

    fn call_now(&self, date: NaiveDate) -> Option<T> {
        match self {
            DateHook::Ready(f) => Some(f(date)),
            DateHook::Deferred(_) => None,
        }
    }

    fn is_deferred(&self) -> bool {
        matches!(self, DateHook::Deferred(_))
    }
}

type MonthChangedHook = Arc<dyn Fn(Side, CalendarMonth) -> BoxFuture<()> + Send + Sync>;

/// Hook outcome for one date. The default is permissive: enabled, no class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HookOutcome {
    pub enabled: bool,
    pub custom: CustomDateResult,
}

impl Default for HookOutcome {
    fn default() -> Self {
        Self {
            enabled: true,
            custom: CustomDateResult::NoClass,
        }
    }
}

/// Callbacks supplied by the host application.
#[derive(Clone, Default)]
pub struct PickerHooks {
    days_enabled: Option<DateHook<bool>>,
    custom_date: Option<DateHook<CustomDateResult>>,
    month_changed: Option<MonthChangedHook>,
}

impl fmt::Debug for PickerHooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PickerHooks")
            .field("days_enabled", &self.days_enabled.is_some())
            .field("custom_date", &self.custom_date.is_some())
            .field("month_changed", &self.month_changed.is_some())
            .finish()
    }
}

impl PickerHooks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Synchronous "is this day selectable" predicate.
    pub fn days_enabled<F>(mut self, f: F) -> Self
    where
        F: Fn(NaiveDate) -> bool + Send + Sync + 'static,
    {
        self.days_enabled = Some(DateHook::Ready(Arc::new(f)));
        self
    }

    /// Asynchronous "is this day selectable" predicate.
    pub fn days_enabled_async<F, Fut>(mut self, f: F) -> Self
    where
        F: Fn(NaiveDate) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = bool> + Send + 'static,
    {
        self.days_enabled = Some(DateHook::Deferred(Arc::new(move |date| {
            Box::pin(f(date)) as BoxFuture<bool>
        })));
        self
    }

    /// Synchronous custom class hook. May answer a class name, a bool or a
    /// `CustomDateResult`.
    pub fn custom_date<F, R>(mut self, f: F) -> Self
    where
        F: Fn(NaiveDate) -> R + Send + Sync + 'static,
        R: Into<CustomDateResult>,
    {
        self.custom_date = Some(DateHook::Ready(Arc::new(
            move |date| -> CustomDateResult { f(date).into() },
        )));
        self
    }

    pub fn custom_date_async<F, Fut, R>(mut self, f: F) -> Self
    where
        F: Fn(NaiveDate) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = R> + Send + 'static,
        R: Into<CustomDateResult>,
    {
        self.custom_date = Some(DateHook::Deferred(Arc::new(move |date| {
            let fut = f(date);
            Box::pin(async move {
                let result: CustomDateResult = fut.await.into();
                result
            }) as BoxFuture<CustomDateResult>
        })));
        self
    }

    /// Awaited after a month change has been evaluated.
    pub fn month_changed_async<F, Fut>(mut self, f: F) -> Self
    where
        F: Fn(Side, CalendarMonth) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        self.month_changed = Some(Arc::new(move |side, month| {
            Box::pin(f(side, month)) as BoxFuture<()>
        }));
        self
    }

    /// Whether `date` still waits on a deferred hook answer.
    pub fn is_pending(&self, date: NaiveDate, cache: &HookResults) -> bool {
        self.has_deferred() && cache.get(date).is_none()
    }

    /// Whether any date hook needs the runtime to answer.
    pub fn has_deferred(&self) -> bool {
        self.days_enabled.as_ref().is_some_and(DateHook::is_deferred)
            || self.custom_date.as_ref().is_some_and(DateHook::is_deferred)
    }

    /// Outcome for `date` using ready hooks inline and `cache` for deferred ones.
    ///
    /// A date the deferred day-enabled hook has not answered yet stays
    /// disabled until it is evaluated. A missing custom class is no class.
    pub fn outcome_for(&self, date: NaiveDate, cache: &HookResults) -> HookOutcome {
        let cached = cache.get(date);
        let enabled = match &self.days_enabled {
            None => true,
            Some(hook) => hook
                .call_now(date)
                .or_else(|| cached.map(|outcome| outcome.enabled))
                .unwrap_or(false),
        };
        let custom = match &self.custom_date {
            None => CustomDateResult::NoClass,
            Some(hook) => hook
                .call_now(date)
                .or_else(|| cached.map(|outcome| outcome.custom.clone()))
                .unwrap_or_default(),
        };
        HookOutcome { enabled, custom }
    }

    /// Evaluate both date hooks for one date through the async contract.
    pub async fn evaluate(&self, date: NaiveDate) -> HookOutcome {
        let enabled = match &self.days_enabled {
            Some(hook) => hook.call(date).await,
            None => true,
        };
        let custom = match &self.custom_date {
            Some(hook) => hook.call(date).await,
            None => CustomDateResult::NoClass,
        };
        HookOutcome { enabled, custom }
    }

    pub(crate) async fn notify_month_changed(&self, side: Side, month: CalendarMonth) {
        if let Some(hook) = &self.month_changed {
            hook(side, month).await;
        }
    }
}

/// Deferred hook outcomes for the dates of the visible grids.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HookResults {
    outcomes: HashMap<NaiveDate, HookOutcome>,
}

impl HookResults {
    pub fn get(&self, date: NaiveDate) -> Option<&HookOutcome> {
        self.outcomes.get(&date)
    }

    pub fn insert(&mut self, date: NaiveDate, outcome: HookOutcome) {
        self.outcomes.insert(date, outcome);
    }

    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }
}

/// Identifies one month-change evaluation. Later tokens compare greater.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EvaluationToken(u64);

/// Monotonic token source shared between a picker and its in-flight
/// evaluations. Issuing a token supersedes every earlier one.
#[derive(Debug, Clone, Default)]
pub struct EvaluationTokens {
    current: Arc<AtomicU64>,
}

impl EvaluationTokens {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn issue(&self) -> EvaluationToken {
        EvaluationToken(self.current.fetch_add(1, Ordering::SeqCst) + 1)
    }

    pub fn is_current(&self, token: EvaluationToken) -> bool {
        self.current.load(Ordering::SeqCst) == token.0
    }
}

/// Evaluate the date hooks for `dates` concurrently.
///
/// Returns `None` when `token` was superseded before every answer arrived;
/// the partial results are dropped and remaining tasks aborted. A hook task
/// that panics leaves its date unanswered, so it stays disabled.
pub async fn evaluate_dates(
    hooks: &PickerHooks,
    dates: Vec<NaiveDate>,
    token: EvaluationToken,
    tokens: &EvaluationTokens,
) -> Option<HookResults> {
    let mut results = HookResults::default();
    let mut tasks = JoinSet::new();

    for date in dates {
        let hooks = hooks.clone();
        tasks.spawn(async move { (date, hooks.evaluate(date).await) });
    }

    while let Some(joined) = tasks.join_next().await {
        if !tokens.is_current(token) {
            tasks.abort_all();
            log::warn!("Discarding superseded hook evaluation {:?}", token);
            return None;
        }
        match joined {
            Ok((date, outcome)) => results.insert(date, outcome),
            Err(err) => log::warn!("Date hook task failed: {}", err),
        }
    }

    if !tokens.is_current(token) {
        log::warn!("Discarding superseded hook evaluation {:?}", token);
        return None;
    }
    Some(results)
}
