//! Calendar months and the window of months the widget is showing.

use crate::result::{ProbeError, ProbeResult};
use chrono::{Datelike, Month, NaiveDate};
use std::fmt;

/// One month panel, identified by its "<MonthName> <Year>" label
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CalendarMonth {
    year: i32,
    month: u32,
}

impl CalendarMonth {
    /// Create a month; `month` is clamped into 1..=12
    #[must_use]
    pub fn new(year: i32, month: u32) -> Self {
        Self {
            year,
            month: month.clamp(1, 12),
        }
    }

    /// Month containing `date`
    #[must_use]
    pub fn of(date: NaiveDate) -> Self {
        Self::new(date.year(), date.month())
    }

    /// Calendar year
    #[must_use]
    pub const fn year(&self) -> i32 {
        self.year
    }

    /// Month of year (1-12)
    #[must_use]
    pub const fn month(&self) -> u32 {
        self.month
    }

    /// The following month
    #[must_use]
    pub const fn succ(&self) -> Self {
        if self.month == 12 {
            Self {
                year: self.year + 1,
                month: 1,
            }
        } else {
            Self {
                year: self.year,
                month: self.month + 1,
            }
        }
    }

    /// Signed number of months from `self` to `other`
    #[must_use]
    pub fn months_until(&self, other: &Self) -> i64 {
        let a = i64::from(self.year) * 12 + i64::from(self.month);
        let b = i64::from(other.year) * 12 + i64::from(other.month);
        b - a
    }

    /// Number of days in the month
    #[must_use]
    pub fn days(&self) -> u32 {
        let next = self.succ();
        NaiveDate::from_ymd_opt(next.year, next.month, 1)
            .and_then(|d| d.pred_opt())
            .map_or(31, |d| d.day())
    }

    /// Widget label, e.g. "October 2026"
    #[must_use]
    pub fn label(&self) -> String {
        let name = Month::try_from(self.month as u8).map_or("?", |m| m.name());
        format!("{name} {}", self.year)
    }

    /// Parse a widget label such as "October 2026" (surrounding whitespace allowed)
    pub fn parse_label(label: &str) -> ProbeResult<Self> {
        let mut parts = label.split_whitespace();
        let (Some(name), Some(year), None) = (parts.next(), parts.next(), parts.next()) else {
            return Err(ProbeError::widget_state(format!(
                "month label {label:?} is not \"<MonthName> <Year>\""
            )));
        };
        let month: Month = name.parse().map_err(|_| {
            ProbeError::widget_state(format!("unknown month name {name:?} in label {label:?}"))
        })?;
        let year: i32 = year.parse().map_err(|_| {
            ProbeError::widget_state(format!("invalid year {year:?} in label {label:?}"))
        })?;
        Ok(Self::new(year, month.number_from_month()))
    }
}

impl fmt::Display for CalendarMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

/// Months currently rendered by the date-picker, earliest first.
///
/// Always non-empty and strictly consecutive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisibleMonthWindow {
    months: Vec<CalendarMonth>,
}

impl VisibleMonthWindow {
    /// Build a window from months in display order
    pub fn new(months: Vec<CalendarMonth>) -> ProbeResult<Self> {
        if months.is_empty() {
            return Err(ProbeError::widget_state("calendar shows no month labels"));
        }
        if let Some(pair) = months.windows(2).find(|w| w[0].succ() != w[1]) {
            return Err(ProbeError::widget_state(format!(
                "calendar months are not consecutive: {} then {}",
                pair[0], pair[1]
            )));
        }
        Ok(Self { months })
    }

    /// Build a window by parsing month labels read from the page
    pub fn from_labels<S: AsRef<str>>(labels: &[S]) -> ProbeResult<Self> {
        let months = labels
            .iter()
            .map(|l| CalendarMonth::parse_label(l.as_ref()))
            .collect::<ProbeResult<Vec<_>>>()?;
        Self::new(months)
    }

    /// Earliest visible month
    #[must_use]
    pub fn first(&self) -> CalendarMonth {
        self.months[0]
    }

    /// Latest visible month
    #[must_use]
    pub fn last(&self) -> CalendarMonth {
        self.months[self.months.len() - 1]
    }

    /// Number of visible months
    #[must_use]
    pub fn len(&self) -> usize {
        self.months.len()
    }

    /// Always false; windows are non-empty by construction
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.months.is_empty()
    }

    /// Whether `month` is rendered
    #[must_use]
    pub fn contains(&self, month: &CalendarMonth) -> bool {
        self.months.contains(month)
    }

    /// The window after one "next month" step
    #[must_use]
    pub fn advanced(&self) -> Self {
        Self {
            months: self.months.iter().map(CalendarMonth::succ).collect(),
        }
    }

    /// Forward steps needed before `target` is rendered (0 if already visible).
    ///
    /// `None` when `target` precedes the window.
    #[must_use]
    pub fn advances_to(&self, target: &CalendarMonth) -> Option<u32> {
        if *target < self.first() {
            return None;
        }
        let beyond = self.last().months_until(target);
        Some(u32::try_from(beyond.max(0)).unwrap_or(u32::MAX))
    }

    /// Visible months in order
    #[must_use]
    pub fn months(&self) -> &[CalendarMonth] {
        &self.months
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod month_tests {
        use super::*;

        #[test]
        fn test_succ_wraps_year() {
            assert_eq!(CalendarMonth::new(2026, 12).succ(), CalendarMonth::new(2027, 1));
            assert_eq!(CalendarMonth::new(2026, 3).succ(), CalendarMonth::new(2026, 4));
        }

        #[test]
        fn test_months_until() {
            let oct = CalendarMonth::new(2026, 10);
            assert_eq!(oct.months_until(&CalendarMonth::new(2027, 2)), 4);
            assert_eq!(oct.months_until(&CalendarMonth::new(2026, 8)), -2);
        }

        #[test]
        fn test_days() {
            assert_eq!(CalendarMonth::new(2026, 2).days(), 28);
            assert_eq!(CalendarMonth::new(2028, 2).days(), 29);
            assert_eq!(CalendarMonth::new(2026, 12).days(), 31);
            assert_eq!(CalendarMonth::new(2026, 11).days(), 30);
        }

        #[test]
        fn test_label_roundtrip() {
            let m = CalendarMonth::new(2026, 10);
            assert_eq!(m.label(), "October 2026");
            assert_eq!(CalendarMonth::parse_label("  October 2026 \n").unwrap(), m);
        }

        #[test]
        fn test_parse_label_rejects_garbage() {
            assert!(CalendarMonth::parse_label("Octember 2026").is_err());
            assert!(CalendarMonth::parse_label("October").is_err());
            assert!(CalendarMonth::parse_label("October 2026 extra").is_err());
            assert!(CalendarMonth::parse_label("October twenty").is_err());
        }
    }

    mod window_tests {
        use super::*;

        fn window(labels: &[&str]) -> VisibleMonthWindow {
            VisibleMonthWindow::from_labels(labels).unwrap()
        }

        #[test]
        fn test_two_month_window() {
            let w = window(&["October 2026", "November 2026"]);
            assert_eq!(w.len(), 2);
            assert!(w.contains(&CalendarMonth::new(2026, 11)));
            assert!(!w.contains(&CalendarMonth::new(2026, 12)));
        }

        #[test]
        fn test_rejects_gaps_and_empty() {
            assert!(VisibleMonthWindow::from_labels(&["October 2026", "December 2026"]).is_err());
            assert!(VisibleMonthWindow::from_labels::<&str>(&[]).is_err());
        }

        #[test]
        fn test_advanced_shifts_whole_window() {
            let w = window(&["December 2026", "January 2027"]).advanced();
            assert_eq!(w.first(), CalendarMonth::new(2027, 1));
            assert_eq!(w.last(), CalendarMonth::new(2027, 2));
        }

        #[test]
        fn test_advances_to() {
            let w = window(&["October 2026", "November 2026"]);
            assert_eq!(w.advances_to(&CalendarMonth::new(2026, 10)), Some(0));
            assert_eq!(w.advances_to(&CalendarMonth::new(2026, 11)), Some(0));
            assert_eq!(w.advances_to(&CalendarMonth::new(2027, 2)), Some(3));
            assert_eq!(w.advances_to(&CalendarMonth::new(2026, 9)), None);
        }
    }
}
