//! Line classification and record segmentation.
//!
//! Turns the ordered lines of a price bulletin into [`PriceRecord`]s. The
//! bulletin layout interleaves three kinds of upper-case lines with the
//! data rows:
//!
//! - **Header blocks**: the column banner (`COMMODITY`, `SPECIFICATION`,
//!   `PREVAILING RETAIL PRICE PER UNIT (P/UNIT)`, ...) repeated on every
//!   page. A block starts at an upper-case line containing a header
//!   keyword and runs until the next line that is not upper case.
//! - **Category headings**: section titles such as `FISH PRODUCTS`. Any
//!   other upper-case line without digits or parentheses.
//! - Upper-case data lines (`NFA RICE (25KG)`), which are treated like any
//!   other description fragment.
//!
//! Description fragments accumulate until a line ends in a price token
//! (`180.00` or `n/a`), at which point the buffered fragments become one
//! record.

use std::sync::LazyLock;

use price_bulletin_models::PriceRecord;
use regex::Regex;

use crate::config::{DEFAULT_CONFIG, ExtractionConfig};
use crate::text::{has_digit_or_paren, is_upper_case, normalize_commodity, title_case};

/// Trailing price: a decimal number or the `n/a` marker at end of line.
static PRICE_TOKEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([0-9]+(?:\.[0-9]+)?|(?i:n/a))$").expect("valid regex"));

/// Page footer such as `Page 3` or `Page 3 of 5`.
static PAGE_FOOTER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^Page\s*[0-9]+").expect("valid regex"));

/// Literal used by bulletins for commodities without a price.
const NOT_AVAILABLE: &str = "n/a";

/// Returns `true` for page furniture that never carries data: footers,
/// document and report titles, and parenthesized legend lines.
#[must_use]
pub fn is_noise_line(line: &str, config: &ExtractionConfig) -> bool {
    line.starts_with('(') || PAGE_FOOTER_RE.is_match(line) || config.has_title_prefix(line)
}

/// Trims every line and drops empty and noise lines.
#[must_use]
pub fn preprocess<'a, S: AsRef<str>>(lines: &'a [S], config: &ExtractionConfig) -> Vec<&'a str> {
    lines
        .iter()
        .map(|l| l.as_ref().trim())
        .filter(|l| !l.is_empty() && !is_noise_line(l, config))
        .collect()
}

/// Where the classifier is relative to a header block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// Outside any header block.
    Scanning,
    /// Inside a header block; upper-case lines are discarded.
    InHeaderBlock,
}

/// What a single line turned out to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LineKind {
    HeaderStart,
    HeaderContinuation,
    Category,
    Fragment,
}

/// Per-document classification state.
///
/// A fresh classifier is created for every document, so the current
/// category and the pending fragments never leak between documents.
#[derive(Debug)]
pub struct LineClassifier<'a> {
    config: &'a ExtractionConfig,
    state: State,
    category: Option<String>,
    buffer: Vec<&'a str>,
    records: Vec<PriceRecord>,
}

impl<'a> LineClassifier<'a> {
    /// Creates a classifier using the given tables.
    #[must_use]
    pub const fn new(config: &'a ExtractionConfig) -> Self {
        Self {
            config,
            state: State::Scanning,
            category: None,
            buffer: Vec::new(),
            records: Vec::new(),
        }
    }

    /// Decides what `line` is, given the current state.
    fn kind_of(&self, line: &str) -> LineKind {
        if !is_upper_case(line) {
            return LineKind::Fragment;
        }
        if self.state == State::InHeaderBlock {
            return LineKind::HeaderContinuation;
        }
        if self.config.has_header_keyword(line) {
            LineKind::HeaderStart
        } else if has_digit_or_paren(line) {
            LineKind::Fragment
        } else {
            LineKind::Category
        }
    }

    /// Feeds one already-preprocessed line.
    pub fn feed(&mut self, line: &'a str) {
        let kind = self.kind_of(line);

        self.state = match kind {
            LineKind::HeaderStart | LineKind::HeaderContinuation => State::InHeaderBlock,
            LineKind::Category | LineKind::Fragment => State::Scanning,
        };

        match kind {
            LineKind::HeaderStart => {
                log::trace!("Header block starts at '{line}'");
                self.discard_buffer();
            }
            LineKind::HeaderContinuation => {
                log::trace!("Skipping header line '{line}'");
            }
            LineKind::Category => {
                self.discard_buffer();
                let category = title_case(line);
                log::trace!("Category: {category}");
                self.category = Some(category);
            }
            LineKind::Fragment => {
                self.buffer.push(line);
                self.try_close_record();
            }
        }
    }

    /// Closes a record if the most recent fragment ends in a price token.
    fn try_close_record(&mut self) {
        let Some(&last) = self.buffer.last() else {
            return;
        };
        let Some(token) = PRICE_TOKEN_RE.find(last) else {
            return;
        };

        let stripped = last[..token.start()].trim();
        let head = &self.buffer[..self.buffer.len() - 1];
        let commodity = normalize_commodity(head.iter().copied().chain([stripped]));

        // The token regex only admits the marker or `digits[.digits]`, and
        // the latter always parses as f64.
        let price = match token.as_str() {
            marker if marker.eq_ignore_ascii_case(NOT_AVAILABLE) => None,
            number => number.parse::<f64>().ok(),
        };

        if commodity.is_empty() {
            log::debug!("Dropping price token '{}' with no description", token.as_str());
        } else {
            self.records.push(PriceRecord {
                category: self.category.clone(),
                commodity,
                price,
            });
        }

        self.buffer.clear();
    }

    fn discard_buffer(&mut self) {
        if !self.buffer.is_empty() {
            log::debug!(
                "Discarding {} unpriced fragment(s): {:?}",
                self.buffer.len(),
                self.buffer
            );
            self.buffer.clear();
        }
    }

    /// Finishes the document and returns its records.
    ///
    /// Fragments still pending at end of input never saw a price and are
    /// dropped.
    #[must_use]
    pub fn finish(mut self) -> Vec<PriceRecord> {
        self.discard_buffer();
        self.records
    }
}

/// Classifies bulletin lines using the default tables.
///
/// # Example
///
/// ```
/// let records = price_bulletin::classify(&["FISH PRODUCTS", "Bangus 180.00"]);
///
/// assert_eq!(records.len(), 1);
/// assert_eq!(records[0].category.as_deref(), Some("Fish Products"));
/// assert_eq!(records[0].commodity, "Bangus");
/// assert_eq!(records[0].price, Some(180.0));
/// ```
#[must_use]
pub fn classify<S: AsRef<str>>(lines: &[S]) -> Vec<PriceRecord> {
    classify_with_config(lines, &DEFAULT_CONFIG)
}

/// Classifies bulletin lines using the given tables.
///
/// Lines are trimmed and noise lines removed before classification.
#[must_use]
pub fn classify_with_config<S: AsRef<str>>(
    lines: &[S],
    config: &ExtractionConfig,
) -> Vec<PriceRecord> {
    let mut classifier = LineClassifier::new(config);
    for line in preprocess(lines, config) {
        classifier.feed(line);
    }
    classifier.finish()
}
