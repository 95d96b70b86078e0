// Date format module
// Display pattern ("MM/dd/yyyy", "dd MMM yyyy", ...) that formats dates and
// strictly parses them back using a culture's names

use chrono::{Datelike, NaiveDate};
use std::fmt;

use super::culture::Culture;

/// Two-digit years at or below this value map to 20xx, above to 19xx.
const TWO_DIGIT_YEAR_PIVOT: i32 = 49;

/// Years `yyyy` reads back. Dates outside still format, but the text
/// (e.g. `-001` or `10000`) does not parse.
pub const FOUR_DIGIT_YEARS: std::ops::RangeInclusive<i32> = 0..=9999;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Year4,
    Year2,
    MonthFull,
    MonthAbbr,
    Month2,
    Month1,
    WeekdayFull,
    WeekdayAbbr,
    Day2,
    Day1,
    Literal(String),
}

/// A tokenized date pattern.
///
/// Recognized fields: `yyyy`, `yy`, `MMMM`, `MMM`, `MM`, `M`, `dddd`, `ddd`,
/// `dd`, `d`. Upper-case `YYYY`/`DD` are accepted as year/day for settings
/// written in that style. Text in single or double quotes, or after a
/// backslash, is literal; every other character is literal too.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateFormat {
    pattern: String,
    tokens: Vec<Token>,
}

impl DateFormat {
    /// Tokenize a pattern. The pattern must contain a year, month and day.
    ///
    /// # Examples
    /// ```
    /// use daterange_picker::models::date_format::DateFormat;
    /// use daterange_picker::models::culture::Culture;
    /// use chrono::NaiveDate;
    ///
    /// let format = DateFormat::new("MM/dd/yyyy").unwrap();
    /// let culture = Culture::invariant();
    /// let date = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
    /// assert_eq!(format.format(date, &culture), "03/05/2024");
    /// assert_eq!(format.parse("03/05/2024", &culture), Some(date));
    /// ```
    pub fn new(pattern: &str) -> Result<Self, String> {
        if pattern.trim().is_empty() {
            return Err("Date format cannot be empty".to_string());
        }

        let tokens = tokenize(pattern)?;
        let has = |pred: fn(&Token) -> bool| tokens.iter().any(pred);
        if !has(|t| matches!(t, Token::Year4 | Token::Year2)) {
            return Err(format!("Date format '{}' has no year field", pattern));
        }
        if !has(|t| matches!(t, Token::Month1 | Token::Month2 | Token::MonthAbbr | Token::MonthFull)) {
            return Err(format!("Date format '{}' has no month field", pattern));
        }
        if !has(|t| matches!(t, Token::Day1 | Token::Day2)) {
            return Err(format!("Date format '{}' has no day field", pattern));
        }

        Ok(Self {
            pattern: pattern.to_string(),
            tokens,
        })
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Whether the formatted output can itself contain `needle`.
    pub fn contains_literal(&self, needle: char) -> bool {
        self.tokens.iter().any(|t| match t {
            Token::Literal(text) => text.contains(needle),
            _ => false,
        })
    }

    /// Format `date`. Only years in [`FOUR_DIGIT_YEARS`] round-trip through
    /// [`DateFormat::parse`].
    pub fn format(&self, date: NaiveDate, culture: &Culture) -> String {
        let mut out = String::new();
        for token in &self.tokens {
            match token {
                Token::Year4 => out.push_str(&format!("{:04}", date.year())),
                Token::Year2 => out.push_str(&format!("{:02}", date.year().rem_euclid(100))),
                Token::MonthFull => out.push_str(culture.month_name(date.month())),
                Token::MonthAbbr => out.push_str(culture.month_abbreviation(date.month())),
                Token::Month2 => out.push_str(&format!("{:02}", date.month())),
                Token::Month1 => out.push_str(&date.month().to_string()),
                Token::WeekdayFull => out.push_str(culture.day_name(date)),
                Token::WeekdayAbbr => out.push_str(culture.day_abbreviation(date)),
                Token::Day2 => out.push_str(&format!("{:02}", date.day())),
                Token::Day1 => out.push_str(&date.day().to_string()),
                Token::Literal(text) => out.push_str(text),
            }
        }
        out
    }

    /// Strictly parse `input`: every field and literal must match and the
    /// whole input must be consumed. Weekday names, when present, must agree
    /// with the parsed date.
    pub fn parse(&self, input: &str, culture: &Culture) -> Option<NaiveDate> {
        let mut rest = input;
        let mut year = None;
        let mut month = None;
        let mut day = None;
        let mut weekday = None;

        for token in &self.tokens {
            match token {
                Token::Year4 => {
                    let (value, tail) = take_digits(rest, 4, 4)?;
                    year = Some(value as i32);
                    rest = tail;
                }
                Token::Year2 => {
                    let (value, tail) = take_digits(rest, 2, 2)?;
                    let value = value as i32;
                    year = Some(if value <= TWO_DIGIT_YEAR_PIVOT {
                        2000 + value
                    } else {
                        1900 + value
                    });
                    rest = tail;
                }
                Token::Month2 => {
                    let (value, tail) = take_digits(rest, 2, 2)?;
                    month = Some(value);
                    rest = tail;
                }
                Token::Month1 => {
                    let (value, tail) = take_digits(rest, 1, 2)?;
                    month = Some(value);
                    rest = tail;
                }
                Token::MonthFull => {
                    let (index, tail) = take_name(rest, culture.month_names())?;
                    month = Some(index as u32 + 1);
                    rest = tail;
                }
                Token::MonthAbbr => {
                    let (index, tail) = take_name(rest, culture.month_abbreviations())?;
                    month = Some(index as u32 + 1);
                    rest = tail;
                }
                Token::Day2 => {
                    let (value, tail) = take_digits(rest, 2, 2)?;
                    day = Some(value);
                    rest = tail;
                }
                Token::Day1 => {
                    let (value, tail) = take_digits(rest, 1, 2)?;
                    day = Some(value);
                    rest = tail;
                }
                Token::WeekdayFull => {
                    let (index, tail) = take_name(rest, culture.day_names())?;
                    weekday = Some(index as u32);
                    rest = tail;
                }
                Token::WeekdayAbbr => {
                    let (index, tail) = take_name(rest, culture.day_abbreviations())?;
                    weekday = Some(index as u32);
                    rest = tail;
                }
                Token::Literal(text) => {
                    rest = rest.strip_prefix(text.as_str())?;
                }
            }
        }

        if !rest.is_empty() {
            return None;
        }

        let date = NaiveDate::from_ymd_opt(year?, month?, day?)?;
        match weekday {
            Some(expected) if date.weekday().num_days_from_sunday() != expected => None,
            _ => Some(date),
        }
    }
}

impl Default for DateFormat {
    /// `MM/dd/yyyy`
    fn default() -> Self {
        Self {
            pattern: "MM/dd/yyyy".to_string(),
            tokens: vec![
                Token::Month2,
                Token::Literal("/".to_string()),
                Token::Day2,
                Token::Literal("/".to_string()),
                Token::Year4,
            ],
        }
    }
}

impl fmt::Display for DateFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.pattern)
    }
}

fn tokenize(pattern: &str) -> Result<Vec<Token>, String> {
    let chars: Vec<char> = pattern.chars().collect();
    let mut tokens = Vec::new();
    let mut literal = String::new();
    let mut i = 0;

    let flush = |literal: &mut String, tokens: &mut Vec<Token>| {
        if !literal.is_empty() {
            tokens.push(Token::Literal(std::mem::take(literal)));
        }
    };

    while i < chars.len() {
        let c = chars[i];
        match c {
            'y' | 'Y' | 'M' | 'd' | 'D' => {
                let run = chars[i..].iter().take_while(|&&next| next == c).count();
                flush(&mut literal, &mut tokens);
                tokens.push(match (c, run) {
                    ('y' | 'Y', 1..=2) => Token::Year2,
                    ('y' | 'Y', _) => Token::Year4,
                    ('M', 1) => Token::Month1,
                    ('M', 2) => Token::Month2,
                    ('M', 3) => Token::MonthAbbr,
                    ('M', _) => Token::MonthFull,
                    (_, 1) => Token::Day1,
                    (_, 2) => Token::Day2,
                    (_, 3) => Token::WeekdayAbbr,
                    _ => Token::WeekdayFull,
                });
                i += run;
            }
            '\'' | '"' => {
                let close = chars[i + 1..]
                    .iter()
                    .position(|&next| next == c)
                    .ok_or_else(|| format!("Unterminated quote in date format '{}'", pattern))?;
                literal.extend(&chars[i + 1..i + 1 + close]);
                i += close + 2;
            }
            '\\' => {
                let escaped = chars
                    .get(i + 1)
                    .ok_or_else(|| format!("Dangling escape in date format '{}'", pattern))?;
                literal.push(*escaped);
                i += 2;
            }
            _ => {
                literal.push(c);
                i += 1;
            }
        }
    }
    flush(&mut literal, &mut tokens);
    Ok(tokens)
}

/// Consume between `min` and `max` ASCII digits.
fn take_digits(input: &str, min: usize, max: usize) -> Option<(u32, &str)> {
    let len = input
        .bytes()
        .take(max)
        .take_while(|b| b.is_ascii_digit())
        .count();
    if len < min {
        return None;
    }
    let value = input[..len].parse().ok()?;
    Some((value, &input[len..]))
}

/// Match the longest name that prefixes `input`, ignoring case.
fn take_name<'a>(input: &'a str, names: &[String]) -> Option<(usize, &'a str)> {
    names
        .iter()
        .enumerate()
        .filter_map(|(index, name)| strip_prefix_ignore_case(input, name).map(|tail| (index, tail)))
        .min_by_key(|(_, tail)| tail.len())
}

fn strip_prefix_ignore_case<'a>(input: &'a str, prefix: &str) -> Option<&'a str> {
    if prefix.is_empty() {
        return None;
    }
    let mut input_chars = input.char_indices();
    for expected in prefix.chars() {
        let (_, actual) = input_chars.next()?;
        if !actual.to_lowercase().eq(expected.to_lowercase()) {
            return None;
        }
    }
    let consumed = input_chars.next().map(|(idx, _)| idx).unwrap_or(input.len());
    Some(&input[consumed..])
}
