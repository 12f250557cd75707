//! Publication date recovery.
//!
//! The bulletin date is printed near the top of the first page, in
//! whatever format the issuing office used that day. Each line in scope is
//! tried against a fixed list of [`DateRule`]s; the first hit wins. When
//! nothing in the text matches, the file name is tried as a last resort.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use price_bulletin_models::ExtractedDate;
use regex::{Captures, Regex};

use crate::config::{DEFAULT_CONFIG, ExtractionConfig};

/// `October 13, 2025` or `October 13 2025`.
static LONG_MONTH_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)(January|February|March|April|May|June|July|August|September|October|November|December)\s+([0-9]{1,2}),?\s+([0-9]{4})",
    )
    .expect("valid regex")
});

/// `10/13/2025` or `13/10/2025`.
static SLASH_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([0-9]{1,2})/([0-9]{1,2})/([0-9]{4})").expect("valid regex"));

/// `2025-10-13` or `2025-1-5`.
static ISO_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([0-9]{4})-([0-9]{1,2})-([0-9]{1,2})").expect("valid regex"));

/// `13 October 2025` or `13 Oct 2025`.
static DAY_MONTH_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)([0-9]{1,2})\s+(Jan|Feb|Mar|Apr|May|Jun|Jul|Aug|Sep|Oct|Nov|Dec|January|February|March|April|May|June|July|August|September|October|November|December)\s+([0-9]{4})",
    )
    .expect("valid regex")
});

/// `20251013` or `2025-10-13` anywhere in a file name.
static FILENAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([0-9]{4})-?([0-9]{2})-?([0-9]{2})").expect("valid regex"));

/// Lower-case month names and three-letter abbreviations.
static MONTHS: LazyLock<BTreeMap<&'static str, u32>> = LazyLock::new(|| {
    BTreeMap::from([
        ("jan", 1),
        ("january", 1),
        ("feb", 2),
        ("february", 2),
        ("mar", 3),
        ("march", 3),
        ("apr", 4),
        ("april", 4),
        ("may", 5),
        ("jun", 6),
        ("june", 6),
        ("jul", 7),
        ("july", 7),
        ("aug", 8),
        ("august", 8),
        ("sep", 9),
        ("september", 9),
        ("oct", 10),
        ("october", 10),
        ("nov", 11),
        ("november", 11),
        ("dec", 12),
        ("december", 12),
    ])
});

/// Looks up a month name or abbreviation, ignoring case.
#[must_use]
pub fn month_number(name: &str) -> Option<u32> {
    MONTHS.get(name.to_lowercase().as_str()).copied()
}

/// One date grammar. Rules are tried in [`DateRule::ALL`] order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateRule {
    /// `<MonthName> <day>[,] <year>`
    LongMonthName,
    /// `<p1>/<p2>/<year>`, month/day preferred over day/month.
    Slash,
    /// `<year>-<month>-<day>`
    Iso,
    /// `<day> <MonthAbbrevOrName> <year>`
    DayMonthName,
}

impl DateRule {
    /// Rules in priority order.
    pub const ALL: &[Self] = &[
        Self::LongMonthName,
        Self::Slash,
        Self::Iso,
        Self::DayMonthName,
    ];

    fn regex(self) -> &'static Regex {
        match self {
            Self::LongMonthName => &*LONG_MONTH_RE,
            Self::Slash => &*SLASH_RE,
            Self::Iso => &*ISO_RE,
            Self::DayMonthName => &*DAY_MONTH_RE,
        }
    }

    /// Applies the rule to a line.
    ///
    /// Only the first syntactic match in the line is considered; if its
    /// fields are out of range the rule does not match.
    #[must_use]
    pub fn apply(self, line: &str) -> Option<ExtractedDate> {
        let caps = self.regex().captures(line)?;
        match self {
            Self::LongMonthName => {
                let month = month_number(&caps[1])?;
                ExtractedDate::new(field(&caps, 3)?, month, field(&caps, 2)?)
            }
            Self::Slash => {
                let p1: u32 = field(&caps, 1)?;
                let p2: u32 = field(&caps, 2)?;
                let year = field(&caps, 3)?;
                if p1 <= 12 && p2 <= 31 {
                    ExtractedDate::new(year, p1, p2)
                } else if p2 <= 12 && p1 <= 31 {
                    ExtractedDate::new(year, p2, p1)
                } else {
                    None
                }
            }
            Self::Iso => ExtractedDate::new(field(&caps, 1)?, field(&caps, 2)?, field(&caps, 3)?),
            Self::DayMonthName => {
                let month = month_number(&caps[2])?;
                ExtractedDate::new(field(&caps, 3)?, month, field(&caps, 1)?)
            }
        }
    }

    /// Short name used in log messages.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::LongMonthName => "Month DD, YYYY",
            Self::Slash => "MM/DD/YYYY",
            Self::Iso => "YYYY-MM-DD",
            Self::DayMonthName => "DD Month YYYY",
        }
    }
}

fn field<T: std::str::FromStr>(caps: &Captures<'_>, index: usize) -> Option<T> {
    caps.get(index)?.as_str().parse().ok()
}

/// Tries every rule against every non-blank line, in order.
fn scan_lines<'a>(lines: impl IntoIterator<Item = &'a str>) -> Option<ExtractedDate> {
    for line in lines {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        for rule in DateRule::ALL {
            if let Some(date) = rule.apply(line) {
                log::debug!("Found date {date} ({}) in line '{line}'", rule.label());
                return Some(date);
            }
        }
    }
    None
}

/// Pulls a `YYYY?MM?DD` date out of a file name.
#[must_use]
pub fn date_from_filename(filename: &str) -> Option<ExtractedDate> {
    let caps = FILENAME_RE.captures(filename)?;
    let date = ExtractedDate::new(field(&caps, 1)?, field(&caps, 2)?, field(&caps, 3)?)?;
    log::debug!("Found date {date} in filename '{filename}'");
    Some(date)
}

/// Extracts the publication date from page texts using the default limits.
///
/// # Example
///
/// ```
/// let pages = ["Department of Agriculture\nOctober 13, 2025\nFISH PRODUCTS"];
/// let date = price_bulletin::extract_date(&pages, "bulletin.pdf").unwrap();
///
/// assert_eq!(date.to_string(), "2025-10-13");
/// ```
#[must_use]
pub fn extract_date<P: AsRef<str>>(pages: &[P], filename: &str) -> Option<ExtractedDate> {
    extract_date_with_config(pages, filename, &DEFAULT_CONFIG)
}

/// Extracts the publication date from page texts.
///
/// Only the first `date_scan_pages` pages and the first `date_scan_lines`
/// lines of each are searched. Falls back to [`date_from_filename`].
#[must_use]
pub fn extract_date_with_config<P: AsRef<str>>(
    pages: &[P],
    filename: &str,
    config: &ExtractionConfig,
) -> Option<ExtractedDate> {
    let lines = pages
        .iter()
        .take(config.date_scan_pages)
        .flat_map(|page| page.as_ref().lines().take(config.date_scan_lines));

    scan_lines(lines).or_else(|| date_from_filename(filename))
}

/// Extracts the publication date from a single page given as lines.
#[must_use]
pub fn extract_date_from_lines<S: AsRef<str>>(
    lines: &[S],
    filename: &str,
    config: &ExtractionConfig,
) -> Option<ExtractedDate> {
    let lines = lines
        .iter()
        .take(config.date_scan_lines)
        .map(|line| line.as_ref());

    scan_lines(lines).or_else(|| date_from_filename(filename))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(date: Option<ExtractedDate>) -> Option<String> {
        date.map(|d| d.to_string())
    }

    #[test]
    fn long_month_name() {
        assert_eq!(ymd(extract_date(&["October 13, 2025"], "")), Some("2025-10-13".into()));
        assert_eq!(ymd(extract_date(&["as of JUNE 2 2024"], "")), Some("2024-06-02".into()));
    }

    #[test]
    fn slash_forces_day_month_when_first_part_exceeds_twelve() {
        assert_eq!(ymd(extract_date(&["13/10/2025"], "")), Some("2025-10-13".into()));
    }

    #[test]
    fn slash_prefers_month_day_when_ambiguous() {
        assert_eq!(ymd(extract_date(&["10/05/2025"], "")), Some("2025-10-05".into()));
    }

    #[test]
    fn slash_with_both_parts_invalid_falls_through() {
        assert_eq!(DateRule::Slash.apply("40/40/2025"), None);
        // The slash rule fails, but the ISO rule still gets its turn on
        // the same line.
        assert_eq!(
            ymd(extract_date(&["ref 40/40/2025 issued 2025-10-13"], "")),
            Some("2025-10-13".into())
        );
    }

    #[test]
    fn iso_is_zero_padded() {
        assert_eq!(ymd(extract_date(&["2025-1-5"], "")), Some("2025-01-05".into()));
    }

    #[test]
    fn iso_out_of_range_is_no_match() {
        assert_eq!(DateRule::Iso.apply("2025-13-40"), None);
    }

    #[test]
    fn day_month_name_with_abbreviation() {
        assert_eq!(ymd(extract_date(&["13 Oct 2025"], "")), Some("2025-10-13".into()));
        assert_eq!(ymd(extract_date(&["1 september 2024"], "")), Some("2024-09-01".into()));
    }

    #[test]
    fn rule_priority_within_a_line() {
        // Both the long-month and the slash form appear; long month wins.
        let line = "10/05/2025 (October 6, 2025)";
        assert_eq!(ymd(extract_date(&[line], "")), Some("2025-10-06".into()));
    }

    #[test]
    fn earlier_line_wins_over_higher_priority_rule() {
        let page = "2025-01-02\nJanuary 3, 2025";
        assert_eq!(ymd(extract_date(&[page], "")), Some("2025-01-02".into()));
    }

    #[test]
    fn no_calendar_validation() {
        assert_eq!(ymd(extract_date(&["February 31, 2025"], "")), Some("2025-02-31".into()));
    }

    #[test]
    fn falls_back_to_filename() {
        let pages = ["DAILY PRICE INDEX", "nothing here"];
        assert_eq!(
            ymd(extract_date(&pages, "daily_price_20251013.pdf")),
            Some("2025-10-13".into())
        );
        assert_eq!(
            ymd(extract_date(&pages, "dpi-2025-10-13.pdf")),
            Some("2025-10-13".into())
        );
    }

    #[test]
    fn absent_when_nothing_matches() {
        assert_eq!(extract_date(&["no date"], "bulletin.pdf"), None);
        assert_eq!(extract_date::<&str>(&[], ""), None);
    }

    #[test]
    fn only_first_fifteen_lines_are_searched() {
        let mut page: Vec<String> = (0..15).map(|i| format!("line {i}")).collect();
        page.push("October 13, 2025".to_owned());
        let page = page.join("\n");
        assert_eq!(extract_date(&[page], ""), None);
    }

    #[test]
    fn blank_lines_count_toward_the_limit() {
        let page = format!("{}October 13, 2025", "\n".repeat(15));
        assert_eq!(extract_date(&[page], ""), None);
    }

    #[test]
    fn only_first_two_pages_are_searched() {
        let pages = ["page one", "page two", "October 13, 2025"];
        assert_eq!(extract_date(&pages, ""), None);

        let pages = ["page one", "October 13, 2025"];
        assert_eq!(ymd(extract_date(&pages, "")), Some("2025-10-13".into()));
    }

    #[test]
    fn scan_limits_follow_config() {
        let config = ExtractionConfig {
            date_scan_pages: 3,
            ..ExtractionConfig::default()
        };
        let pages = ["page one", "page two", "October 13, 2025"];
        assert_eq!(
            ymd(extract_date_with_config(&pages, "", &config)),
            Some("2025-10-13".into())
        );
    }

    #[test]
    fn single_page_lines() {
        let lines = ["Department of Agriculture", "", "13/10/2025"];
        let date = extract_date_from_lines(&lines, "", &ExtractionConfig::default());
        assert_eq!(ymd(date), Some("2025-10-13".into()));
    }

    #[test]
    fn month_lookup_ignores_case() {
        assert_eq!(month_number("OCT"), Some(10));
        assert_eq!(month_number("December"), Some(12));
        assert_eq!(month_number("Sept"), None);
    }
}
