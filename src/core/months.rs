//! Reporting months and the API fetch window that covers them.

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

use super::error::FilingError;

/// Days added on both sides of the requested months when querying the API.
pub const FETCH_PADDING_DAYS: i64 = 2;

/// One calendar month (reporting bucket key), ordered by (year, month).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct MonthKey {
    year: i32,
    month: u32,
}

impl MonthKey {
    /// Returns `None` unless `month` is in `1..=12` and the month lies
    /// within the calendar range `chrono` supports.
    pub fn new(year: i32, month: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, 1).map(Self::of)
    }

    /// The month containing `date`.
    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    /// First day of the month.
    pub fn first_day(&self) -> NaiveDate {
        // every constructor checks that this date exists
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap_or(NaiveDate::MIN)
    }

    /// The previous calendar month, `None` at the start of the calendar.
    pub fn pred(&self) -> Option<Self> {
        if self.month == 1 {
            Self::new(self.year.checked_sub(1)?, 12)
        } else {
            Self::new(self.year, self.month - 1)
        }
    }

    /// The next calendar month, `None` at the end of the calendar.
    pub fn succ(&self) -> Option<Self> {
        if self.month == 12 {
            Self::new(self.year.checked_add(1)?, 1)
        } else {
            Self::new(self.year, self.month + 1)
        }
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{:02}", self.year, self.month)
    }
}

impl FromStr for MonthKey {
    type Err = FilingError;

    /// Parses `YYYY-MM`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bad = || FilingError::Configuration(format!("invalid month '{s}', expected YYYY-MM"));
        let (y, m) = s.trim().split_once('-').ok_or_else(bad)?;
        let year: i32 = y.parse().map_err(|_| bad())?;
        let month: u32 = m.parse().map_err(|_| bad())?;
        Self::new(year, month).ok_or_else(bad)
    }
}

/// `target` and the `months_back` months before it, newest first.
///
/// Stops early at the start of the supported calendar.
pub fn month_list(target: MonthKey, months_back: u32) -> Vec<MonthKey> {
    std::iter::successors(Some(target), MonthKey::pred)
        .take((months_back as usize).saturating_add(1))
        .collect()
}

/// Half-open `[since, until)` timestamp range passed to the invoice API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchWindow {
    /// Inclusive start.
    pub since: NaiveDateTime,
    /// Exclusive end.
    pub until: NaiveDateTime,
}

impl FetchWindow {
    /// Spans every month in `months`, padded by [`FETCH_PADDING_DAYS`] on
    /// both sides. Returns `None` for an empty list.
    pub fn covering(months: &[MonthKey]) -> Option<Self> {
        let oldest = months.iter().min()?;
        let newest = months.iter().max()?;
        let padding = Duration::days(FETCH_PADDING_DAYS);
        let start = oldest.first_day().and_hms_opt(0, 0, 0)?;
        let end = newest.succ()?.first_day().and_hms_opt(0, 0, 0)?;
        Some(Self {
            since: start.checked_sub_signed(padding)?,
            until: end.checked_add_signed(padding)?,
        })
    }

    /// `since` formatted as a UTC timestamp with a `Z` suffix.
    pub fn since_param(&self) -> String {
        iso_z(self.since)
    }

    /// `until` formatted as a UTC timestamp with a `Z` suffix.
    pub fn until_param(&self) -> String {
        iso_z(self.until)
    }
}

fn iso_z(dt: NaiveDateTime) -> String {
    dt.format("%Y-%m-%dT%H:%M:%SZ").to_string()
}
