//! Calendar-day arithmetic
//!
//! All calculators work on whole calendar days. `CalendarDate` wraps
//! `chrono::NaiveDate`, which has no time-of-day or timezone, so offsets can
//! never drift by a day across a daylight-saving transition.

use crate::errors::{CalcError, CalcResult};
use chrono::{Days, NaiveDate};
use once_cell::sync::Lazy;
use regex_lite::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

static ISO_DATE_SHAPE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("ISO date pattern is valid"));

/// A calendar day with no time-of-day component
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CalendarDate(NaiveDate);

impl CalendarDate {
    /// Parse a strict `YYYY-MM-DD` string (surrounding whitespace is ignored)
    pub fn parse(input: &str) -> CalcResult<Self> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(CalcError::InvalidDateInput("date is required".to_string()));
        }
        if !ISO_DATE_SHAPE.is_match(trimmed) {
            return Err(CalcError::InvalidDateInput(format!(
                "expected YYYY-MM-DD, got '{}'",
                trimmed
            )));
        }
        NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
            .map(Self)
            .map_err(|_| CalcError::InvalidDateInput(format!("'{}' is not a calendar date", trimmed)))
    }

    /// Build from year/month/day components
    pub fn from_ymd(year: i32, month: u32, day: u32) -> CalcResult<Self> {
        NaiveDate::from_ymd_opt(year, month, day)
            .map(Self)
            .ok_or_else(|| {
                CalcError::InvalidDateInput(format!(
                    "{:04}-{:02}-{:02} is not a calendar date",
                    year, month, day
                ))
            })
    }

    /// The date `days` days later (earlier when negative)
    pub fn add_days(self, days: i64) -> CalcResult<Self> {
        let shifted = if days >= 0 {
            self.0.checked_add_days(Days::new(days.unsigned_abs()))
        } else {
            self.0.checked_sub_days(Days::new(days.unsigned_abs()))
        };
        shifted.map(Self).ok_or_else(|| {
            CalcError::OutOfDomainResult(format!(
                "{} shifted by {} days is outside the supported calendar",
                self, days
            ))
        })
    }

    /// Long form, e.g. "Monday, October 7, 2024"
    pub fn format_long(&self) -> String {
        self.0.format("%A, %B %-d, %Y").to_string()
    }

    /// Short form used in forecast tables, e.g. "Mon, Oct 7"
    pub fn format_short(&self) -> String {
        self.0.format("%a, %b %-d").to_string()
    }

    pub fn naive(&self) -> NaiveDate {
        self.0
    }
}

impl From<NaiveDate> for CalendarDate {
    fn from(date: NaiveDate) -> Self {
        Self(date)
    }
}

impl fmt::Display for CalendarDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

impl std::str::FromStr for CalendarDate {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Whole-day difference `a - b` (negative when `a` is before `b`)
pub fn diff_days(a: CalendarDate, b: CalendarDate) -> i64 {
    (a.0 - b.0).num_days()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rstest::rstest;

    fn date(s: &str) -> CalendarDate {
        CalendarDate::parse(s).unwrap()
    }

    #[rstest]
    #[case("2024-01-01")]
    #[case("2024-02-29")]
    #[case(" 2023-12-31 ")]
    fn test_parse_accepts_iso_dates(#[case] input: &str) {
        assert!(CalendarDate::parse(input).is_ok());
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    #[case("not a date")]
    #[case("2024-1-5")]
    #[case("01/15/2024")]
    #[case("2023-02-29")]
    #[case("2024-13-01")]
    #[case("2024-04-31")]
    fn test_parse_rejects_bad_input(#[case] input: &str) {
        assert!(matches!(
            CalendarDate::parse(input),
            Err(CalcError::InvalidDateInput(_))
        ));
    }

    #[test]
    fn test_add_days_rolls_over_month_and_year() {
        assert_eq!(date("2024-01-31").add_days(1).unwrap(), date("2024-02-01"));
        assert_eq!(date("2024-02-28").add_days(1).unwrap(), date("2024-02-29"));
        assert_eq!(date("2023-02-28").add_days(1).unwrap(), date("2023-03-01"));
        assert_eq!(date("2024-12-31").add_days(1).unwrap(), date("2025-01-01"));
        assert_eq!(date("2024-03-01").add_days(-1).unwrap(), date("2024-02-29"));
    }

    #[test]
    fn test_add_days_naegele_offset() {
        assert_eq!(date("2024-01-01").add_days(280).unwrap(), date("2024-10-07"));
    }

    #[test]
    fn test_add_days_overflow_is_out_of_domain() {
        let max = CalendarDate::from(NaiveDate::MAX);
        assert!(matches!(max.add_days(1), Err(CalcError::OutOfDomainResult(_))));
    }

    #[test]
    fn test_diff_days_sign() {
        assert_eq!(diff_days(date("2024-01-15"), date("2024-01-01")), 14);
        assert_eq!(diff_days(date("2024-01-01"), date("2024-01-15")), -14);
        assert_eq!(diff_days(date("2024-01-01"), date("2024-01-01")), 0);
    }

    #[test]
    fn test_format_long() {
        assert_eq!(date("2024-10-07").format_long(), "Monday, October 7, 2024");
        assert_eq!(date("2024-01-15").format_long(), "Monday, January 15, 2024");
    }

    #[test]
    fn test_format_short() {
        assert_eq!(date("2024-10-07").format_short(), "Mon, Oct 7");
    }

    #[test]
    fn test_serde_uses_iso_string() {
        let json = serde_json::to_string(&date("2024-10-07")).unwrap();
        assert_eq!(json, "\"2024-10-07\"");
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Property: diff_days inverts add_days for any offset
        #[test]
        fn prop_diff_inverts_add(offset in -100_000i64..100_000) {
            let origin = date("2024-01-01");
            let shifted = origin.add_days(offset).unwrap();
            prop_assert_eq!(diff_days(shifted, origin), offset);
        }

        /// Property: add_days is strictly increasing in the offset
        #[test]
        fn prop_add_days_strictly_increasing(a in -50_000i64..50_000, step in 1i64..1000) {
            let origin = date("2000-06-15");
            let earlier = origin.add_days(a).unwrap();
            let later = origin.add_days(a + step).unwrap();
            prop_assert!(later > earlier);
        }
    }
}
