//! The `MonthKey` type, a `YYYY-MM` bucket identifying a calendar month.

use crate::Result;
use anyhow::{bail, Context};
use chrono::{Datelike, Local, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// The years a month key can hold, so that it always displays as four digits.
const YEARS: std::ops::RangeInclusive<i32> = 0..=9999;

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Identifies a calendar month. Displays and serializes as `YYYY-MM`, e.g. `2024-01`.
///
/// Ordering is chronological. Month arithmetic is plain integer arithmetic on the `(year, month)`
/// pair, so it never needs a calendar. Years stay within `0000` through `9999`; stepping past
/// either end stays on `0000-01` or `9999-12`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthKey {
    year: i32,
    month: u32,
}

impl MonthKey {
    /// Creates a month key. `month` is 1-based.
    pub fn new(year: i32, month: u32) -> Result<Self> {
        if !(1..=12).contains(&month) {
            bail!("Invalid month number {month}, expected 1 through 12");
        }
        if !YEARS.contains(&year) {
            bail!("Invalid year {year}, expected 0 through 9999");
        }
        Ok(Self { year, month })
    }

    /// The month that contains `date`. Dates outside the supported years land on the nearest end.
    pub fn from_date(date: NaiveDate) -> Self {
        if date.year() < *YEARS.start() {
            return Self { year: 0, month: 1 };
        }
        if date.year() > *YEARS.end() {
            return Self {
                year: 9999,
                month: 12,
            };
        }
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// The current month according to the local calendar.
    pub fn current() -> Self {
        Self::from_date(Local::now().date_naive())
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    /// The 1-based month number.
    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn previous(&self) -> Self {
        if self.month == 1 && self.year == *YEARS.start() {
            *self
        } else if self.month == 1 {
            Self {
                year: self.year - 1,
                month: 12,
            }
        } else {
            Self {
                year: self.year,
                month: self.month - 1,
            }
        }
    }

    pub fn next(&self) -> Self {
        if self.month == 12 && self.year == *YEARS.end() {
            *self
        } else if self.month == 12 {
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

    /// The first calendar day of the month.
    pub fn start(&self) -> Result<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
            .with_context(|| format!("The month {self} has no first day"))
    }

    /// The last calendar day of the month.
    pub fn end(&self) -> Result<NaiveDate> {
        let first_of_next = if self.month == 12 {
            NaiveDate::from_ymd_opt(self.year + 1, 1, 1)
        } else {
            NaiveDate::from_ymd_opt(self.year, self.month + 1, 1)
        };
        first_of_next
            .and_then(|d| d.pred_opt())
            .with_context(|| format!("The month {self} has no last day"))
    }

    /// Returns true if `date` (expected to be `YYYY-MM-DD`) starts with this month's key.
    pub fn is_prefix_of(&self, date: &str) -> bool {
        date.starts_with(&self.to_string())
    }

    /// The month's display name, e.g. `January 2024`.
    pub fn name(&self) -> String {
        let ix = (self.month as usize).saturating_sub(1);
        let name = MONTH_NAMES.get(ix).copied().unwrap_or_default();
        format!("{name} {}", self.year)
    }
}

impl Default for MonthKey {
    fn default() -> Self {
        Self::current()
    }
}

impl Display for MonthKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for MonthKey {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        let (year, month) = s
            .split_once('-')
            .with_context(|| format!("Invalid month '{s}', expected YYYY-MM"))?;
        let all_digits = |p: &str| !p.is_empty() && p.chars().all(|c| c.is_ascii_digit());
        if year.len() != 4 || month.len() != 2 || !all_digits(year) || !all_digits(month) {
            bail!("Invalid month '{s}', expected YYYY-MM");
        }
        let year: i32 = year
            .parse()
            .with_context(|| format!("Invalid year in month '{s}'"))?;
        let month: u32 = month
            .parse()
            .with_context(|| format!("Invalid month number in month '{s}'"))?;
        Self::new(year, month)
    }
}

impl Serialize for MonthKey {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for MonthKey {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        MonthKey::from_str(&s).map_err(serde::de::Error::custom)
    }
}
