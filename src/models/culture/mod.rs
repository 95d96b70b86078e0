// Culture module
// Locale data used for date display, parsing and the weekday header

use chrono::{Datelike, Locale, NaiveDate, TimeZone, Utc};

/// Built-in culture table: (name, short date pattern, first day of week, locale).
const CULTURES: &[(&str, &str, u8, Locale)] = &[
    ("en-US", "M/d/yyyy", 0, Locale::en_US),
    ("en-GB", "dd/MM/yyyy", 1, Locale::en_GB),
    ("en-AU", "d/MM/yyyy", 1, Locale::en_AU),
    ("de-DE", "dd.MM.yyyy", 1, Locale::de_DE),
    ("fr-FR", "dd/MM/yyyy", 1, Locale::fr_FR),
    ("es-ES", "dd/MM/yyyy", 1, Locale::es_ES),
    ("pt-BR", "dd/MM/yyyy", 0, Locale::pt_BR),
    ("ru-RU", "dd.MM.yyyy", 1, Locale::ru_RU),
    ("ja-JP", "yyyy/MM/dd", 0, Locale::ja_JP),
];

/// Name, default pattern and localized month/weekday names for one culture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Culture {
    name: String,
    short_date_pattern: String,
    first_day_of_week: u8,
    locale: Locale,
    month_names: Vec<String>,
    month_abbreviations: Vec<String>,
    day_names: Vec<String>,
    day_abbreviations: Vec<String>,
}

impl Default for Culture {
    fn default() -> Self {
        Self::invariant()
    }
}

impl Culture {
    /// Look up a built-in culture by name (`en-US`, `de_DE`, case-insensitive).
    pub fn from_name(name: &str) -> Option<Self> {
        let wanted = name.trim().replace('_', "-");
        CULTURES
            .iter()
            .find(|(culture, ..)| culture.eq_ignore_ascii_case(&wanted))
            .map(|(culture, pattern, first_day, locale)| {
                Self::build(culture, pattern, *first_day, *locale)
            })
    }

    /// Like `from_name`, falling back to the invariant culture.
    pub fn from_name_or_default(name: &str) -> Self {
        Self::from_name(name).unwrap_or_else(|| {
            log::warn!("Unknown culture '{}', using invariant culture", name);
            Self::invariant()
        })
    }

    /// Culture-neutral English formatting with a zero-padded US pattern.
    pub fn invariant() -> Self {
        Self::build("invariant", "MM/dd/yyyy", 0, Locale::en_US)
    }

    /// Names of all built-in cultures.
    pub fn available() -> impl Iterator<Item = &'static str> {
        CULTURES.iter().map(|(name, ..)| *name)
    }

    fn build(name: &str, pattern: &str, first_day_of_week: u8, locale: Locale) -> Self {
        let month_name = |month: u32, fmt: &str| {
            NaiveDate::from_ymd_opt(2024, month, 15)
                .map(|date| localized(date, fmt, locale))
                .unwrap_or_default()
        };
        // 2024-01-07 is a Sunday; index 0 = Sunday like `first_day_of_week`
        let day_name = |offset: u32, fmt: &str| {
            NaiveDate::from_ymd_opt(2024, 1, 7 + offset)
                .map(|date| localized(date, fmt, locale))
                .unwrap_or_default()
        };

        Self {
            name: name.to_string(),
            short_date_pattern: pattern.to_string(),
            first_day_of_week,
            locale,
            month_names: (1..=12).map(|m| month_name(m, "%B")).collect(),
            month_abbreviations: (1..=12).map(|m| month_name(m, "%b")).collect(),
            day_names: (0..7).map(|d| day_name(d, "%A")).collect(),
            day_abbreviations: (0..7).map(|d| day_name(d, "%a")).collect(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn short_date_pattern(&self) -> &str {
        &self.short_date_pattern
    }

    /// 0 = Sunday … 6 = Saturday
    pub fn first_day_of_week(&self) -> u8 {
        self.first_day_of_week
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    /// Full month name, `month` in 1..=12.
    pub fn month_name(&self, month: u32) -> &str {
        lookup(&self.month_names, (month as usize).wrapping_sub(1))
    }

    pub fn month_abbreviation(&self, month: u32) -> &str {
        lookup(&self.month_abbreviations, (month as usize).wrapping_sub(1))
    }

    pub fn month_names(&self) -> &[String] {
        &self.month_names
    }

    pub fn month_abbreviations(&self) -> &[String] {
        &self.month_abbreviations
    }

    /// Full weekday name of `date`.
    pub fn day_name(&self, date: NaiveDate) -> &str {
        lookup(&self.day_names, date.weekday().num_days_from_sunday() as usize)
    }

    pub fn day_abbreviation(&self, date: NaiveDate) -> &str {
        lookup(&self.day_abbreviations, date.weekday().num_days_from_sunday() as usize)
    }

    pub fn day_names(&self) -> &[String] {
        &self.day_names
    }

    pub fn day_abbreviations(&self) -> &[String] {
        &self.day_abbreviations
    }

    /// Two-letter weekday header labels rotated so that `first_day_of_week`
    /// comes first.
    pub fn weekday_header(&self, first_day_of_week: u8) -> Vec<String> {
        let start = (first_day_of_week % 7) as usize;
        (0..7)
            .map(|i| {
                let abbr = &self.day_abbreviations[(start + i) % 7];
                abbr.chars().take(2).collect()
            })
            .collect()
    }
}

fn localized(date: NaiveDate, fmt: &str, locale: Locale) -> String {
    Utc.from_utc_datetime(&date.and_time(chrono::NaiveTime::MIN))
        .format_localized(fmt, locale)
        .to_string()
}

fn lookup(names: &[String], index: usize) -> &str {
    names.get(index).map(String::as_str).unwrap_or("")
}
