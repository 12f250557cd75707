#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Extraction layer for agricultural daily price bulletins.
//!
//! Bulletins arrive as loosely structured text: one line per table row in
//! reading order, with repeated column banners, section headings, and
//! commodity descriptions that wrap across several lines. This crate turns
//! that text into [`PriceRecord`]s ([`classify`]) and recovers the
//! bulletin's publication date ([`extract_date`]).
//!
//! Both operations are pure functions of their input. They never fail: a
//! document without recognizable rows yields an empty list, and a document
//! without a recognizable date yields `None`. Deciding what to do about
//! either is up to the caller.

pub mod classify;
pub mod config;
pub mod date;
pub mod text;

pub use classify::{LineClassifier, classify, classify_with_config};
pub use config::{DEFAULT_CONFIG, ExtractionConfig};
pub use date::{DateRule, extract_date, extract_date_from_lines, extract_date_with_config};
pub use price_bulletin_models::{BulletinPayload, ExtractedDate, PriceRecord};

/// Errors that can occur while loading an [`ExtractionConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Reading the config file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The config file is not valid TOML for [`ExtractionConfig`].
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Rendering the config as TOML failed.
    #[error("TOML serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// The config parsed but its contents are unusable.
    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Everything recovered from one bulletin.
#[derive(Debug, Clone, PartialEq)]
pub struct BulletinExtraction {
    /// Records in the order they were closed.
    pub records: Vec<PriceRecord>,
    /// Publication date, if one was found in the text or the file name.
    pub date: Option<ExtractedDate>,
}

impl BulletinExtraction {
    /// Packages the records for delivery, substituting `fallback` when no
    /// date was found.
    #[must_use]
    pub fn into_payload(self, fallback: ExtractedDate) -> BulletinPayload {
        BulletinPayload {
            data: self.records,
            date: self.date.unwrap_or(fallback),
        }
    }
}

/// Splits page texts into lines, pages concatenated in document order.
#[must_use]
pub fn document_lines<P: AsRef<str>>(pages: &[P]) -> Vec<&str> {
    pages.iter().flat_map(|page| page.as_ref().lines()).collect()
}

/// Runs classification and date extraction over one document.
///
/// `filename` is only consulted when the page text has no date.
///
/// # Example
///
/// ```
/// use price_bulletin::{ExtractionConfig, extract_bulletin};
///
/// let pages = [
///     "DAILY PRICE INDEX\n(As of October 13, 2025)\nCOMMODITY SPECIFICATION PRICE\nFISH PRODUCTS\n",
///     "VEGETABLES\nFresh Red\nOnion n/a\nPage 2",
/// ];
/// let extraction = extract_bulletin(&pages, "dpi.pdf", &ExtractionConfig::default());
///
/// assert_eq!(extraction.records.len(), 1);
/// assert_eq!(extraction.records[0].commodity, "Fresh Red Onion");
/// assert_eq!(extraction.date.unwrap().to_string(), "2025-10-13");
/// ```
#[must_use]
pub fn extract_bulletin<P: AsRef<str>>(
    pages: &[P],
    filename: &str,
    config: &ExtractionConfig,
) -> BulletinExtraction {
    let lines = document_lines(pages);
    log::debug!(
        "Classifying {} line(s) from {} page(s) of '{filename}'",
        lines.len(),
        pages.len()
    );

    let records = classify_with_config(&lines, config);
    let date = extract_date_with_config(pages, filename, config);

    if records.is_empty() {
        log::warn!("No price records recognized in '{filename}'");
    } else {
        log::info!("Extracted {} records from '{filename}'", records.len());
    }
    if date.is_none() {
        log::warn!("Could not determine the bulletin date of '{filename}'");
    }

    BulletinExtraction { records, date }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Two pages shaped like a real daily price index: title furniture,
    /// the column banner repeated on each page, wrapped descriptions, and
    /// a page footer.
    const SAMPLE_PAGES: &[&str] = &[
        "Department of Agriculture\n\
         DAILY PRICE INDEX\n\
         National Capital Region\n\
         (As of October 13, 2025)\n\
         COMMODITY SPECIFICATION PREVAILING RETAIL\n\
         PRICE PER UNIT (P/UNIT)\n\
         IMPORTED COMMERCIAL RICE\n\
         Special Well-milled  White Rice 56.00\n\
         Regular Milled   White Rice 45.50\n\
         FISH PRODUCTS\n\
         Bangus Large 220.00\n\
         Tilapia Medium (5-6 pcs/kg)\n\
         150.00\n\
         (Prices are in Philippine pesos)\n\
         Page 1 of 2",
        "Department of Agriculture\n\
         COMMODITY SPECIFICATION PREVAILING RETAIL\n\
         PRICE PER UNIT (P/UNIT)\n\
         LOWLAND VEGETABLES\n\
         Ampalaya 4-5 pcs/kg 120.00\n\
         Red Onion, local,\n\
         medium N/A\n\
         SPICES\n\
         Ginger\n\
         Page 2 of 2",
    ];

    fn sample() -> BulletinExtraction {
        extract_bulletin(SAMPLE_PAGES, "daily_price_20251012.pdf", &ExtractionConfig::default())
    }

    #[test]
    fn extracts_sample_bulletin() {
        let extraction = sample();
        let summary: Vec<(Option<&str>, &str, Option<f64>)> = extraction
            .records
            .iter()
            .map(|r| (r.category.as_deref(), r.commodity.as_str(), r.price))
            .collect();

        // "IMPORTED COMMERCIAL RICE" and "LOWLAND VEGETABLES" directly follow
        // the banner, so they are swallowed with it. "National Capital
        // Region" never sees a price and is cleared by the banner.
        assert_eq!(
            summary,
            vec![
                (None, "Special Well-milled White Rice", Some(56.0)),
                (None, "Regular Milled White Rice", Some(45.5)),
                (Some("Fish Products"), "Bangus Large", Some(220.0)),
                (
                    Some("Fish Products"),
                    "Tilapia Medium (5-6 pcs/kg)",
                    Some(150.0)
                ),
                (Some("Fish Products"), "Ampalaya 4-5 pcs/kg", Some(120.0)),
                (Some("Fish Products"), "Red Onion, local, medium", None),
            ]
        );
        assert_eq!(extraction.date.map(|d| d.to_string()), Some("2025-10-13".into()));
    }

    #[test]
    fn sample_commodities_are_normalized() {
        for record in sample().records {
            assert!(!record.commodity.is_empty());
            assert!(!record.commodity.contains("  "));
            assert_eq!(record.commodity, record.commodity.trim());
        }
    }

    #[test]
    fn extraction_is_repeatable() {
        assert_eq!(sample(), sample());
    }

    #[test]
    fn payload_uses_fallback_only_without_date() {
        let fallback = ExtractedDate::new(2000, 1, 1).unwrap();

        let payload = sample().into_payload(fallback);
        assert_eq!(payload.date.to_string(), "2025-10-13");
        assert_eq!(payload.data.len(), 6);

        let empty = extract_bulletin(&["nothing useful"], "scan.pdf", &ExtractionConfig::default());
        assert!(empty.records.is_empty());
        assert_eq!(empty.into_payload(fallback).date, fallback);
    }

    #[test]
    fn flat_page_lines_yield_the_same_date() {
        let lines = document_lines(&SAMPLE_PAGES[..1]);
        let date = extract_date_from_lines(&lines, "scan.pdf", &ExtractionConfig::default());
        assert_eq!(date, sample().date);
    }

    #[test]
    fn document_lines_concatenates_pages() {
        let lines = document_lines(&["a\nb", "c"]);
        assert_eq!(lines, vec!["a", "b", "c"]);
    }
}
