// Unit tests for date formats across cultures
// Parameterised over patterns and culture names

use chrono::NaiveDate;
use test_case::test_case;

use daterange_picker::models::culture::Culture;
use daterange_picker::models::date_format::DateFormat;
use daterange_picker::models::settings::PickerOptions;

fn march_5() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 5).unwrap()
}

#[test_case("MM/dd/yyyy", "en-US" => "03/05/2024" ; "us padded")]
#[test_case("M/d/yyyy", "en-US" => "3/5/2024" ; "us short")]
#[test_case("dd.MM.yyyy", "de-DE" => "05.03.2024" ; "german")]
#[test_case("yyyy/MM/dd", "ja-JP" => "2024/03/05" ; "japanese")]
#[test_case("dd MMM yy", "en-GB" => "05 Mar 24" ; "abbreviated month")]
#[test_case("dddd d MMMM yyyy", "en-GB" => "Tuesday 5 March 2024" ; "long names")]
#[test_case("d MMMM yyyy", "fr-FR" => "5 mars 2024" ; "french month")]
#[test_case("'Day' dd 'of' MM/yyyy", "en-US" => "Day 05 of 03/2024" ; "quoted literals")]
fn test_format(pattern: &str, culture: &str) -> String {
    let format = DateFormat::new(pattern).unwrap();
    format.format(march_5(), &Culture::from_name(culture).unwrap())
}

#[test_case("MM/dd/yyyy", "03/05/2024" => Some(march_5()) ; "exact")]
#[test_case("MM/dd/yyyy", "3/5/2024" => None ; "missing padding")]
#[test_case("M/d/yyyy", "3/5/2024" => Some(march_5()) ; "short fields")]
#[test_case("MM/dd/yyyy", "02/30/2024" => None ; "impossible day")]
#[test_case("MM/dd/yyyy", "03/05/2024x" => None ; "trailing text")]
#[test_case("dd MMM yyyy", "05 mar 2024" => Some(march_5()) ; "case insensitive name")]
#[test_case("dddd d MMMM yyyy", "Monday 5 March 2024" => None ; "weekday mismatch")]
#[test_case("yy-MM-dd", "24-03-05" => Some(march_5()) ; "two digit year")]
#[test_case("yy-MM-dd", "50-03-05" => NaiveDate::from_ymd_opt(1950, 3, 5) ; "two digit year pivot")]
fn test_parse(pattern: &str, input: &str) -> Option<NaiveDate> {
    let format = DateFormat::new(pattern).unwrap();
    format.parse(input, &Culture::from_name("en-GB").unwrap())
}

#[test_case("" ; "empty")]
#[test_case("MM/dd" ; "no year")]
#[test_case("yyyy-dd" ; "no month")]
#[test_case("yyyy-MM" ; "no day")]
fn test_rejected_patterns(pattern: &str) {
    assert!(DateFormat::new(pattern).is_err());
}

#[test_case("en-US" => ("M/d/yyyy".to_string(), 0) ; "us")]
#[test_case("en-GB" => ("dd/MM/yyyy".to_string(), 1) ; "uk")]
#[test_case("de_de" => ("dd.MM.yyyy".to_string(), 1) ; "underscore and case")]
#[test_case("xx-YY" => ("MM/dd/yyyy".to_string(), 0) ; "unknown falls back to invariant")]
fn test_culture_defaults(name: &str) -> (String, u8) {
    let config = PickerOptions::new().culture(name).resolve().unwrap();
    (config.date_format.pattern().to_string(), config.first_day_of_week)
}
