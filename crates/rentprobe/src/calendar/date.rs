//! Strict `YYYY-MM-DD` calendar dates.

use super::window::CalendarMonth;
use crate::result::{ProbeError, ProbeResult};
use chrono::{Datelike, NaiveDate};
use regex::Regex;
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

fn date_grammar() -> &'static Regex {
    static GRAMMAR: OnceLock<Regex> = OnceLock::new();
    GRAMMAR.get_or_init(|| Regex::new(r"^([0-9]{4})-([0-9]{2})-([0-9]{2})$").expect("date grammar compiles"))
}

/// A pure calendar date to click in the date-picker.
///
/// No timezone or locale is involved: the value is exactly the
/// (year, month, day) written in the input string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CalendarTarget {
    date: NaiveDate,
}

impl CalendarTarget {
    /// Parse a zero-padded `YYYY-MM-DD` string.
    ///
    /// Only the grammar and calendar validity are checked; past dates are
    /// accepted here and left to the widget.
    pub fn parse(input: &str) -> ProbeResult<Self> {
        let fail = |reason: &str| ProbeError::DateParse {
            input: input.to_string(),
            reason: reason.to_string(),
        };

        let caps = date_grammar()
            .captures(input)
            .ok_or_else(|| fail("expected zero-padded YYYY-MM-DD"))?;

        let year: i32 = caps[1].parse().map_err(|_| fail("year is not a number"))?;
        let month: u32 = caps[2].parse().map_err(|_| fail("month is not a number"))?;
        let day: u32 = caps[3].parse().map_err(|_| fail("day is not a number"))?;

        if !(1..=12).contains(&month) {
            return Err(fail("month must be between 01 and 12"));
        }

        NaiveDate::from_ymd_opt(year, month, day)
            .map(|date| Self { date })
            .ok_or_else(|| fail("day does not exist in that month"))
    }

    /// Wrap an already valid date
    #[must_use]
    pub const fn from_date(date: NaiveDate) -> Self {
        Self { date }
    }

    /// Calendar year
    #[must_use]
    pub fn year(&self) -> i32 {
        self.date.year()
    }

    /// Month of year (1-12)
    #[must_use]
    pub fn month_number(&self) -> u32 {
        self.date.month()
    }

    /// Day of month
    #[must_use]
    pub fn day(&self) -> u32 {
        self.date.day()
    }

    /// The month panel this date lives in
    #[must_use]
    pub fn month(&self) -> CalendarMonth {
        CalendarMonth::of(self.date)
    }

    /// Underlying chrono date
    #[must_use]
    pub const fn date(&self) -> NaiveDate {
        self.date
    }
}

impl FromStr for CalendarTarget {
    type Err = ProbeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for CalendarTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.date.format("%Y-%m-%d"))
    }
}
