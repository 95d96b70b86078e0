//! Text-range parser.
//!
//! Turns the text typed into the picker's input ("03/01/2024 - 03/05/2024")
//! into a range clamped to the configured bounds, and formats ranges back
//! for display.

use chrono::NaiveDate;
use thiserror::Error;

use crate::models::settings::PickerConfig;
use crate::utils::date::add_days_saturating;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("input is empty")]
    Empty,

    #[error("expected two dates separated by '{separator}'")]
    MissingSeparator { separator: String },

    #[error("'{input}' does not match the date format '{format}'")]
    InvalidDate { input: String, format: String },

    #[error("range end {end} is before its start {start}")]
    EndBeforeStart { start: NaiveDate, end: NaiveDate },

    #[error("{date} is outside the selectable dates")]
    OutOfBounds { date: NaiveDate },
}

/// Split `text` into its start and end halves.
///
/// The configured separator is tried first. When it is absent the bare
/// separator (usually `-`) is used, unless the date format itself contains
/// that character and splitting there would cut a date in half.
fn split_range<'a>(text: &'a str, config: &PickerConfig) -> Result<(&'a str, &'a str), ParseError> {
    let separator = config.range_separator.as_str();
    if let Some((start, end)) = text.split_once(separator) {
        return Ok((start, end));
    }

    let bare = separator.trim();
    let cuts_dates = bare.chars().any(|c| config.date_format.contains_literal(c));
    if !bare.is_empty() && !cuts_dates {
        if let Some((start, end)) = text.split_once(bare) {
            return Ok((start, end));
        }
    }

    Err(ParseError::MissingSeparator {
        separator: separator.to_string(),
    })
}

fn parse_date(text: &str, config: &PickerConfig) -> Result<NaiveDate, ParseError> {
    let text = text.trim();
    config
        .date_format
        .parse(text, &config.culture)
        .ok_or_else(|| ParseError::InvalidDate {
            input: text.to_string(),
            format: config.date_format.pattern().to_string(),
        })
}

fn clamp(date: NaiveDate, min: Option<NaiveDate>, max: Option<NaiveDate>) -> NaiveDate {
    let date = min.map_or(date, |min| date.max(min));
    max.map_or(date, |max| date.min(max))
}

/// Parse `text` into a `(start, end)` pair of dates.
///
/// Both halves must parse strictly. The start is clamped into
/// `[min_date, max_date]`; the end is clamped to `max_date` and to
/// `start + max_span`, and pushed out to `start + min_span` when shorter.
/// In single-date mode one date is enough and both ends are that date.
pub fn parse_range_text(text: &str, config: &PickerConfig) -> Result<(NaiveDate, NaiveDate), ParseError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(ParseError::Empty);
    }

    if config.single_date_picker {
        let date = match parse_date(text, config) {
            Ok(date) => date,
            Err(err) => match split_range(text, config) {
                Ok((start, _)) => parse_date(start, config)?,
                Err(_) => return Err(err),
            },
        };
        let date = clamp(date, config.min_date, config.max_date);
        return Ok((date, date));
    }

    let (start_text, end_text) = split_range(text, config)?;
    let start = parse_date(start_text, config)?;
    let end = parse_date(end_text, config)?;

    if end < start {
        return Err(ParseError::EndBeforeStart { start, end });
    }

    let start = clamp(start, config.min_date, config.max_date);
    let span_max = config
        .max_span
        .map(|span| add_days_saturating(start, span as i64));
    let max = match (config.max_date, span_max) {
        (Some(a), Some(b)) => Some(a.min(b)),
        (a, b) => a.or(b),
    };
    let mut end = clamp(end, None, max);
    if let Some(span) = config.min_span {
        end = end.max(add_days_saturating(start, span as i64));
    }

    if end < start {
        return Err(ParseError::EndBeforeStart { start, end });
    }
    if let Some(max) = config.max_date.filter(|max| end > *max) {
        log::debug!("Minimum span pushes end past {}", max);
        return Err(ParseError::OutOfBounds { date: end });
    }

    Ok((start, end))
}

/// Display text for a range: the start alone in single-date mode or while the
/// end is unset, otherwise `start<separator>end`.
pub fn format_range(start: NaiveDate, end: Option<NaiveDate>, config: &PickerConfig) -> String {
    match end {
        Some(end) if !config.single_date_picker => format!(
            "{}{}{}",
            config.format_date(start),
            config.range_separator,
            config.format_date(end)
        ),
        _ => config.format_date(start),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::settings::PickerOptions;
    use pretty_assertions::assert_eq;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn config() -> PickerConfig {
        PickerOptions::new()
            .date_format("MM/dd/yyyy")
            .min_date(date(2024, 1, 1))
            .max_date(date(2024, 12, 31))
            .resolve()
            .unwrap()
    }

    #[test]
    fn test_parses_two_dates() {
        let parsed = parse_range_text("03/01/2024 - 03/05/2024", &config()).unwrap();
        assert_eq!(parsed, (date(2024, 3, 1), date(2024, 3, 5)));
    }

    #[test]
    fn test_bare_hyphen_and_whitespace() {
        let parsed = parse_range_text("  03/01/2024-03/05/2024 ", &config()).unwrap();
        assert_eq!(parsed, (date(2024, 3, 1), date(2024, 3, 5)));
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(parse_range_text("   ", &config()), Err(ParseError::Empty));
    }

    #[test]
    fn test_missing_separator() {
        assert!(matches!(
            parse_range_text("03/01/2024", &config()),
            Err(ParseError::MissingSeparator { .. })
        ));
    }

    #[test]
    fn test_invalid_half() {
        let err = parse_range_text("03/01/2024 - 3/5/2024", &config()).unwrap_err();
        assert_eq!(
            err,
            ParseError::InvalidDate {
                input: "3/5/2024".to_string(),
                format: "MM/dd/yyyy".to_string(),
            }
        );
    }

    #[test]
    fn test_end_before_start_rejected() {
        assert_eq!(
            parse_range_text("03/01/2024 - 02/01/2024", &config()),
            Err(ParseError::EndBeforeStart {
                start: date(2024, 3, 1),
                end: date(2024, 2, 1),
            })
        );
    }

    #[test]
    fn test_clamps_to_bounds() {
        let parsed = parse_range_text("12/01/2023 - 01/05/2025", &config()).unwrap();
        assert_eq!(parsed, (date(2024, 1, 1), date(2024, 12, 31)));
    }

    #[test]
    fn test_clamps_to_spans() {
        let mut config = config();
        config.max_span = Some(7);
        let parsed = parse_range_text("03/01/2024 - 03/20/2024", &config).unwrap();
        assert_eq!(parsed, (date(2024, 3, 1), date(2024, 3, 8)));

        config.max_span = None;
        config.min_span = Some(3);
        let parsed = parse_range_text("03/01/2024 - 03/02/2024", &config).unwrap();
        assert_eq!(parsed, (date(2024, 3, 1), date(2024, 3, 4)));
    }

    #[test]
    fn test_min_span_past_max_date_is_out_of_bounds() {
        let mut config = config();
        config.min_span = Some(5);
        assert_eq!(
            parse_range_text("12/29/2024 - 12/30/2024", &config),
            Err(ParseError::OutOfBounds { date: date(2025, 1, 3) })
        );
    }

    #[test]
    fn test_hyphenated_format_needs_full_separator() {
        let config = PickerOptions::new().date_format("yyyy-MM-dd").resolve().unwrap();
        let parsed = parse_range_text("2024-03-01 - 2024-03-05", &config).unwrap();
        assert_eq!(parsed, (date(2024, 3, 1), date(2024, 3, 5)));
        assert!(matches!(
            parse_range_text("2024-03-01", &config),
            Err(ParseError::MissingSeparator { .. })
        ));
    }

    #[test]
    fn test_single_date_mode() {
        let config = PickerOptions::new().single_date_picker(true).resolve().unwrap();
        assert_eq!(
            parse_range_text("06/15/2024", &config),
            Ok((date(2024, 6, 15), date(2024, 6, 15)))
        );
        assert_eq!(
            parse_range_text("06/15/2024 - 06/20/2024", &config),
            Ok((date(2024, 6, 15), date(2024, 6, 15)))
        );
    }

    #[test]
    fn test_format_round_trip() {
        let config = config();
        let text = format_range(date(2024, 3, 1), Some(date(2024, 3, 5)), &config);
        assert_eq!(text, "03/01/2024 - 03/05/2024");
        assert_eq!(
            parse_range_text(&text, &config),
            Ok((date(2024, 3, 1), date(2024, 3, 5)))
        );
    }

    #[test]
    fn test_format_start_only() {
        assert_eq!(format_range(date(2024, 3, 1), None, &config()), "03/01/2024");
    }
}
