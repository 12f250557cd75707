#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Price record and bulletin date types.
//!
//! These are the values the extraction layer hands to its callers: one
//! [`PriceRecord`] per priced commodity line, an [`ExtractedDate`] for the
//! bulletin's publication date, and the [`BulletinPayload`] envelope that
//! downstream consumers receive (`{"data": [...], "date": "YYYY-MM-DD"}`).

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike as _, NaiveDate};
use serde::{Deserialize, Serialize};

/// A single commodity price taken from a bulletin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceRecord {
    /// Title-cased section heading in effect when the record was closed
    /// (e.g. "Fish Products"). `None` before the first heading.
    pub category: Option<String>,
    /// Whitespace-collapsed commodity description. Never empty.
    pub commodity: String,
    /// Price for the period. `None` when the bulletin marks it `n/a`.
    pub price: Option<f64>,
}

/// Errors returned when parsing an [`ExtractedDate`] from text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DateParseError {
    /// The string is not shaped like `YYYY-MM-DD`.
    #[error("expected YYYY-MM-DD, got '{0}'")]
    Format(String),

    /// Month or day is outside the accepted range.
    #[error("date field out of range: {year}-{month}-{day}")]
    OutOfRange {
        /// Year component.
        year: i32,
        /// Month component.
        month: u32,
        /// Day component.
        day: u32,
    },
}

/// A bulletin publication date.
///
/// Field ranges are checked (month `1..=12`, day `1..=31`) but the day is
/// not checked against the month length, so `2025-02-31` is representable.
/// Use [`ExtractedDate::to_naive_date`] when a real calendar date is needed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ExtractedDate {
    year: i32,
    month: u32,
    day: u32,
}

impl ExtractedDate {
    /// Creates a date, returning `None` if `month` or `day` is out of range.
    #[must_use]
    pub const fn new(year: i32, month: u32, day: u32) -> Option<Self> {
        if month < 1 || month > 12 || day < 1 || day > 31 {
            return None;
        }
        Some(Self { year, month, day })
    }

    /// Year component.
    #[must_use]
    pub const fn year(&self) -> i32 {
        self.year
    }

    /// Month component (`1..=12`).
    #[must_use]
    pub const fn month(&self) -> u32 {
        self.month
    }

    /// Day component (`1..=31`).
    #[must_use]
    pub const fn day(&self) -> u32 {
        self.day
    }

    /// Converts to a calendar-validated [`NaiveDate`].
    ///
    /// Returns `None` for combinations that do not exist on the calendar
    /// (e.g. April 31st).
    #[must_use]
    pub fn to_naive_date(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, self.day)
    }
}

impl From<NaiveDate> for ExtractedDate {
    fn from(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
            day: date.day(),
        }
    }
}

impl fmt::Display for ExtractedDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}-{:02}", self.year, self.month, self.day)
    }
}

impl FromStr for ExtractedDate {
    type Err = DateParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let format_err = || DateParseError::Format(s.to_owned());

        let mut parts = s.trim().splitn(3, '-');
        let year = parts
            .next()
            .and_then(|p| p.parse::<i32>().ok())
            .ok_or_else(format_err)?;
        let month = parts
            .next()
            .and_then(|p| p.parse::<u32>().ok())
            .ok_or_else(format_err)?;
        let day = parts
            .next()
            .and_then(|p| p.parse::<u32>().ok())
            .ok_or_else(format_err)?;

        Self::new(year, month, day).ok_or(DateParseError::OutOfRange { year, month, day })
    }
}

impl TryFrom<String> for ExtractedDate {
    type Error = DateParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ExtractedDate> for String {
    fn from(date: ExtractedDate) -> Self {
        date.to_string()
    }
}

/// The per-document delivery envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BulletinPayload {
    /// Records in the order they were closed.
    pub data: Vec<PriceRecord>,
    /// Publication date (extracted or substituted by the caller).
    pub date: ExtractedDate,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_out_of_range_fields() {
        assert!(ExtractedDate::new(2025, 0, 1).is_none());
        assert!(ExtractedDate::new(2025, 13, 1).is_none());
        assert!(ExtractedDate::new(2025, 1, 0).is_none());
        assert!(ExtractedDate::new(2025, 1, 32).is_none());
    }

    #[test]
    fn accepts_day_past_month_length() {
        let date = ExtractedDate::new(2025, 2, 31).unwrap();
        assert_eq!(date.to_string(), "2025-02-31");
        assert!(date.to_naive_date().is_none());
    }

    #[test]
    fn displays_zero_padded() {
        let date = ExtractedDate::new(2025, 3, 7).unwrap();
        assert_eq!(date.to_string(), "2025-03-07");
    }

    #[test]
    fn parses_iso_string() {
        let date: ExtractedDate = "2025-10-13".parse().unwrap();
        assert_eq!((date.year(), date.month(), date.day()), (2025, 10, 13));
    }

    #[test]
    fn rejects_malformed_string() {
        assert!(matches!(
            "13 October 2025".parse::<ExtractedDate>(),
            Err(DateParseError::Format(_))
        ));
        assert!(matches!(
            "2025-13-01".parse::<ExtractedDate>(),
            Err(DateParseError::OutOfRange { month: 13, .. })
        ));
    }

    #[test]
    fn converts_from_naive_date() {
        let naive = NaiveDate::from_ymd_opt(2024, 12, 1).unwrap();
        let date = ExtractedDate::from(naive);
        assert_eq!(date.to_naive_date(), Some(naive));
    }

    #[test]
    fn payload_serializes_to_server_shape() {
        let payload = BulletinPayload {
            data: vec![
                PriceRecord {
                    category: Some("Fish Products".to_owned()),
                    commodity: "Bangus".to_owned(),
                    price: Some(180.0),
                },
                PriceRecord {
                    category: None,
                    commodity: "Red Onion".to_owned(),
                    price: None,
                },
            ],
            date: ExtractedDate::new(2025, 10, 13).unwrap(),
        };

        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["date"], "2025-10-13");
        assert_eq!(json["data"][0]["category"], "Fish Products");
        assert_eq!(json["data"][0]["commodity"], "Bangus");
        assert_eq!(json["data"][0]["price"], 180.0);
        assert!(json["data"][1]["category"].is_null());
        assert!(json["data"][1]["price"].is_null());

        let back: BulletinPayload = serde_json::from_value(json).unwrap();
        assert_eq!(back, payload);
    }
}
