//! Common value types
//!
//! Dates travel as `YYYY-MM-DD` text everywhere (storage, JSON, filters).
//! [`BusinessDate`] and [`MonthKey`] parse that text strictly once at the
//! boundary so the rest of the code never handles loose strings.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::error::{AppError, ErrorCode};

/// Timestamp type (Unix milliseconds)
pub type Timestamp = i64;

/// Date/month parsing failure
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DateParseError {
    #[error("Invalid date '{0}', expected YYYY-MM-DD")]
    Date(String),
    #[error("Invalid month '{0}', expected YYYY-MM")]
    Month(String),
}

impl From<DateParseError> for AppError {
    fn from(err: DateParseError) -> Self {
        let input = match &err {
            DateParseError::Date(s) | DateParseError::Month(s) => s.clone(),
        };
        AppError::with_message(ErrorCode::InvalidFormat, err.to_string()).with_detail("input", input)
    }
}

/// `true` when `s` has exactly the digit/dash layout of `layout` ('9' = digit)
fn matches_layout(s: &str, layout: &str) -> bool {
    s.len() == layout.len()
        && s.bytes().zip(layout.bytes()).all(|(c, l)| match l {
            b'9' => c.is_ascii_digit(),
            other => c == other,
        })
}

// ============================================================================
// BusinessDate
// ============================================================================

/// A calendar day in the business timezone (`YYYY-MM-DD`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BusinessDate(NaiveDate);

impl BusinessDate {
    pub fn new(date: NaiveDate) -> Self {
        Self(date)
    }

    pub fn from_ymd(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day).map(Self)
    }

    /// Strict `YYYY-MM-DD` parse; rejects `2024-3-1`, `2024-02-30`, trailing text
    pub fn parse(s: &str) -> Result<Self, DateParseError> {
        if !matches_layout(s, "9999-99-99") {
            return Err(DateParseError::Date(s.to_string()));
        }
        NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map(Self)
            .map_err(|_| DateParseError::Date(s.to_string()))
    }

    pub fn naive(&self) -> NaiveDate {
        self.0
    }

    /// Month this date belongs to
    pub fn month_key(&self) -> MonthKey {
        MonthKey {
            year: self.0.year(),
            month: self.0.month(),
        }
    }
}

impl fmt::Display for BusinessDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

impl FromStr for BusinessDate {
    type Err = DateParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for BusinessDate {
    type Error = DateParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl Serialize for BusinessDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for BusinessDate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}

// ============================================================================
// MonthKey
// ============================================================================

/// A calendar month (`YYYY-MM`) used to filter dates
///
/// Filtering is a literal string-prefix match of the `YYYY-MM-DD` text, the
/// same rule the SQL layer applies with `LIKE 'YYYY-MM%'`. Parsing is strict
/// so a short prefix such as `2024-1` can never reach a filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthKey {
    year: i32,
    month: u32,
}

impl MonthKey {
    pub fn new(year: i32, month: u32) -> Result<Self, DateParseError> {
        if !(1000..=9999).contains(&year) || !(1..=12).contains(&month) {
            return Err(DateParseError::Month(format!("{year}-{month}")));
        }
        Ok(Self { year, month })
    }

    /// Strict `YYYY-MM` parse
    pub fn parse(s: &str) -> Result<Self, DateParseError> {
        if !matches_layout(s, "9999-99") {
            return Err(DateParseError::Month(s.to_string()));
        }
        let year = s[..4]
            .parse()
            .map_err(|_| DateParseError::Month(s.to_string()))?;
        let month = s[5..]
            .parse()
            .map_err(|_| DateParseError::Month(s.to_string()))?;
        Self::new(year, month).map_err(|_| DateParseError::Month(s.to_string()))
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    /// The literal `YYYY-MM` prefix
    pub fn prefix(&self) -> String {
        format!("{:04}-{:02}", self.year, self.month)
    }

    /// SQL `LIKE` pattern matching every date of this month
    pub fn like_pattern(&self) -> String {
        format!("{}%", self.prefix())
    }

    /// Prefix match against the date's text form
    pub fn contains(&self, date: &BusinessDate) -> bool {
        date.to_string().starts_with(&self.prefix())
    }

    pub fn first_day(&self) -> BusinessDate {
        // year/month validated at construction
        BusinessDate(NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap_or_default())
    }

    /// Every date of the month in ascending order
    pub fn days(&self) -> impl Iterator<Item = BusinessDate> + use<> {
        let month = self.month;
        self.first_day()
            .naive()
            .iter_days()
            .take_while(move |d| d.month() == month)
            .map(BusinessDate)
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for MonthKey {
    type Err = DateParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for MonthKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for MonthKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}
