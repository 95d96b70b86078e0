// Settings module
// Picker configuration: an optional-field layer that merges by precedence
// and the resolved, validated configuration the picker runs with

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::culture::Culture;
use super::date_format::DateFormat;
use super::date_range::{NamedRange, TimeSettings};

/// One configuration layer. Every field is optional so layers can be merged:
/// explicit options > named shared config > hard-coded defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PickerOptions {
    pub date_format: Option<String>,
    pub culture: Option<String>,
    pub first_day_of_week: Option<u8>,
    pub min_date: Option<NaiveDate>,
    pub max_date: Option<NaiveDate>,
    /// Minimum distance from start to end, in whole days
    pub min_span: Option<u32>,
    /// Maximum distance from start to end, in whole days
    pub max_span: Option<u32>,
    pub auto_apply: Option<bool>,
    pub single_date_picker: Option<bool>,
    pub linked_calendars: Option<bool>,
    pub auto_adjust_calendars: Option<bool>,
    pub reset_on_clear: Option<bool>,
    pub always_show_calendars: Option<bool>,
    pub show_custom_range_label: Option<bool>,
    pub custom_range_label: Option<String>,
    pub apply_label: Option<String>,
    pub cancel_label: Option<String>,
    pub custom_date_class: Option<String>,
    pub show_week_numbers: Option<bool>,
    pub show_iso_week_numbers: Option<bool>,
    pub range_separator: Option<String>,
    pub time_settings: Option<TimeSettings>,
    pub ranges: Option<Vec<NamedRange>>,
}

impl PickerOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fill every unset field from `fallback`.
    pub fn or(self, fallback: PickerOptions) -> PickerOptions {
        PickerOptions {
            date_format: self.date_format.or(fallback.date_format),
            culture: self.culture.or(fallback.culture),
            first_day_of_week: self.first_day_of_week.or(fallback.first_day_of_week),
            min_date: self.min_date.or(fallback.min_date),
            max_date: self.max_date.or(fallback.max_date),
            min_span: self.min_span.or(fallback.min_span),
            max_span: self.max_span.or(fallback.max_span),
            auto_apply: self.auto_apply.or(fallback.auto_apply),
            single_date_picker: self.single_date_picker.or(fallback.single_date_picker),
            linked_calendars: self.linked_calendars.or(fallback.linked_calendars),
            auto_adjust_calendars: self.auto_adjust_calendars.or(fallback.auto_adjust_calendars),
            reset_on_clear: self.reset_on_clear.or(fallback.reset_on_clear),
            always_show_calendars: self.always_show_calendars.or(fallback.always_show_calendars),
            show_custom_range_label: self
                .show_custom_range_label
                .or(fallback.show_custom_range_label),
            custom_range_label: self.custom_range_label.or(fallback.custom_range_label),
            apply_label: self.apply_label.or(fallback.apply_label),
            cancel_label: self.cancel_label.or(fallback.cancel_label),
            custom_date_class: self.custom_date_class.or(fallback.custom_date_class),
            show_week_numbers: self.show_week_numbers.or(fallback.show_week_numbers),
            show_iso_week_numbers: self.show_iso_week_numbers.or(fallback.show_iso_week_numbers),
            range_separator: self.range_separator.or(fallback.range_separator),
            time_settings: self.time_settings.or(fallback.time_settings),
            ranges: self.ranges.or(fallback.ranges),
        }
    }

    /// Resolve against the hard-coded defaults and validate.
    pub fn resolve(self) -> Result<PickerConfig, String> {
        let defaults = PickerConfig::default();

        let culture = match self.culture.as_deref() {
            Some(name) => Culture::from_name_or_default(name),
            None => defaults.culture,
        };
        let date_format = DateFormat::new(
            self.date_format
                .as_deref()
                .unwrap_or_else(|| culture.short_date_pattern()),
        )?;
        let first_day_of_week = self
            .first_day_of_week
            .unwrap_or_else(|| culture.first_day_of_week());
        let single_date_picker = self.single_date_picker.unwrap_or(defaults.single_date_picker);

        let config = PickerConfig {
            date_format,
            first_day_of_week,
            culture,
            min_date: self.min_date,
            max_date: self.max_date,
            min_span: self.min_span,
            max_span: self.max_span,
            // Single-date pickers always apply on the first click
            auto_apply: single_date_picker || self.auto_apply.unwrap_or(defaults.auto_apply),
            single_date_picker,
            linked_calendars: self.linked_calendars.unwrap_or(defaults.linked_calendars),
            auto_adjust_calendars: self
                .auto_adjust_calendars
                .unwrap_or(defaults.auto_adjust_calendars),
            reset_on_clear: self.reset_on_clear.unwrap_or(defaults.reset_on_clear),
            always_show_calendars: self
                .always_show_calendars
                .unwrap_or(defaults.always_show_calendars),
            show_custom_range_label: self
                .show_custom_range_label
                .unwrap_or(defaults.show_custom_range_label),
            custom_range_label: self.custom_range_label.unwrap_or(defaults.custom_range_label),
            apply_label: self.apply_label.unwrap_or(defaults.apply_label),
            cancel_label: self.cancel_label.unwrap_or(defaults.cancel_label),
            custom_date_class: self.custom_date_class.or(defaults.custom_date_class),
            show_week_numbers: self.show_week_numbers.unwrap_or(defaults.show_week_numbers),
            show_iso_week_numbers: self
                .show_iso_week_numbers
                .unwrap_or(defaults.show_iso_week_numbers),
            range_separator: self.range_separator.unwrap_or(defaults.range_separator),
            time_settings: self.time_settings.unwrap_or(defaults.time_settings),
            ranges: self.ranges.unwrap_or(defaults.ranges),
        };

        config.validate()?;
        Ok(config)
    }

    pub fn date_format(mut self, pattern: impl Into<String>) -> Self {
        self.date_format = Some(pattern.into());
        self
    }

    pub fn culture(mut self, name: impl Into<String>) -> Self {
        self.culture = Some(name.into());
        self
    }

    pub fn first_day_of_week(mut self, day: u8) -> Self {
        self.first_day_of_week = Some(day);
        self
    }

    pub fn min_date(mut self, date: NaiveDate) -> Self {
        self.min_date = Some(date);
        self
    }

    pub fn max_date(mut self, date: NaiveDate) -> Self {
        self.max_date = Some(date);
        self
    }

    pub fn min_span(mut self, days: u32) -> Self {
        self.min_span = Some(days);
        self
    }

    pub fn max_span(mut self, days: u32) -> Self {
        self.max_span = Some(days);
        self
    }

    pub fn auto_apply(mut self, enabled: bool) -> Self {
        self.auto_apply = Some(enabled);
        self
    }

    pub fn single_date_picker(mut self, enabled: bool) -> Self {
        self.single_date_picker = Some(enabled);
        self
    }

    pub fn linked_calendars(mut self, enabled: bool) -> Self {
        self.linked_calendars = Some(enabled);
        self
    }

    pub fn auto_adjust_calendars(mut self, enabled: bool) -> Self {
        self.auto_adjust_calendars = Some(enabled);
        self
    }

    pub fn reset_on_clear(mut self, enabled: bool) -> Self {
        self.reset_on_clear = Some(enabled);
        self
    }

    pub fn always_show_calendars(mut self, enabled: bool) -> Self {
        self.always_show_calendars = Some(enabled);
        self
    }

    pub fn custom_date_class(mut self, class: impl Into<String>) -> Self {
        self.custom_date_class = Some(class.into());
        self
    }

    pub fn range_separator(mut self, separator: impl Into<String>) -> Self {
        self.range_separator = Some(separator.into());
        self
    }

    pub fn time_settings(mut self, times: TimeSettings) -> Self {
        self.time_settings = Some(times);
        self
    }

    pub fn ranges(mut self, ranges: Vec<NamedRange>) -> Self {
        self.ranges = Some(ranges);
        self
    }
}

/// Fully resolved picker configuration. Read-only while the picker runs.
#[derive(Debug, Clone, PartialEq)]
pub struct PickerConfig {
    pub date_format: DateFormat,
    pub culture: Culture,
    /// 0 = Sunday … 6 = Saturday
    pub first_day_of_week: u8,
    pub min_date: Option<NaiveDate>,
    pub max_date: Option<NaiveDate>,
    pub min_span: Option<u32>,
    pub max_span: Option<u32>,
    pub auto_apply: bool,
    pub single_date_picker: bool,
    pub linked_calendars: bool,
    pub auto_adjust_calendars: bool,
    pub reset_on_clear: bool,
    pub always_show_calendars: bool,
    pub show_custom_range_label: bool,
    pub custom_range_label: String,
    pub apply_label: String,
    pub cancel_label: String,
    /// Class added when the custom-date hook answers `true`
    pub custom_date_class: Option<String>,
    pub show_week_numbers: bool,
    pub show_iso_week_numbers: bool,
    pub range_separator: String,
    pub time_settings: TimeSettings,
    pub ranges: Vec<NamedRange>,
}

impl Default for PickerConfig {
    fn default() -> Self {
        Self {
            date_format: DateFormat::default(),
            culture: Culture::invariant(),
            first_day_of_week: 0,
            min_date: None,
            max_date: None,
            min_span: None,
            max_span: None,
            auto_apply: false,
            single_date_picker: false,
            linked_calendars: true,
            auto_adjust_calendars: true,
            reset_on_clear: true,
            always_show_calendars: false,
            show_custom_range_label: true,
            custom_range_label: "Custom Range".to_string(),
            apply_label: "Apply".to_string(),
            cancel_label: "Cancel".to_string(),
            custom_date_class: None,
            show_week_numbers: false,
            show_iso_week_numbers: false,
            range_separator: " - ".to_string(),
            time_settings: TimeSettings::default(),
            ranges: Vec::new(),
        }
    }
}

impl PickerConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.first_day_of_week > 6 {
            return Err(format!(
                "First day of week must be 0-6 (Sunday-Saturday), got {}",
                self.first_day_of_week
            ));
        }

        if let (Some(min), Some(max)) = (self.min_date, self.max_date) {
            if min > max {
                return Err(format!("Minimum date {} is after maximum date {}", min, max));
            }
        }

        if let (Some(min), Some(max)) = (self.min_span, self.max_span) {
            if min > max {
                return Err(format!(
                    "Minimum span ({} days) exceeds maximum span ({} days)",
                    min, max
                ));
            }
        }

        if self.time_settings.start_time > self.time_settings.end_time {
            return Err(format!(
                "Start time {} is after end time {}",
                self.time_settings.start_time, self.time_settings.end_time
            ));
        }

        if self.range_separator.trim().is_empty() {
            return Err("Range separator must contain a visible character".to_string());
        }

        if self.show_custom_range_label && self.custom_range_label.trim().is_empty() {
            return Err("Custom range label cannot be empty".to_string());
        }

        for (i, range) in self.ranges.iter().enumerate() {
            if self.ranges[..i].iter().any(|other| other.label == range.label) {
                return Err(format!("Duplicate range label '{}'", range.label));
            }
            if range.end < range.start {
                return Err(format!("Range '{}' ends before it starts", range.label));
            }
        }

        Ok(())
    }

    /// Date bounds and span limits consumed by the cell classifier.
    pub fn constraints(&self) -> Constraints {
        Constraints {
            min_date: self.min_date,
            max_date: self.max_date,
            min_span: self.min_span,
            max_span: self.max_span,
        }
    }

    pub fn format_date(&self, date: NaiveDate) -> String {
        self.date_format.format(date, &self.culture)
    }

    pub fn range_for_label(&self, label: &str) -> Option<&NamedRange> {
        self.ranges.iter().find(|range| range.label == label)
    }
}

/// Selection bounds. Predicates live with the host hooks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Constraints {
    pub min_date: Option<NaiveDate>,
    pub max_date: Option<NaiveDate>,
    pub min_span: Option<u32>,
    pub max_span: Option<u32>,
}
