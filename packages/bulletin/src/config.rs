//! Keyword and prefix tables that drive extraction.
//!
//! The defaults match the Department of Agriculture "Daily Price Index"
//! layout. A TOML file can override any subset of the fields; anything it
//! leaves out keeps its default value.

use std::path::Path;
use std::sync::LazyLock;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Column-header words that mark an upper-case line as part of a repeated
/// table banner rather than a section title.
const DEFAULT_HEADER_KEYWORDS: &[&str] = &[
    "PRICE",
    "UNIT",
    "RETAIL",
    "PREVAILING",
    "COMMODITY",
    "SPECIFICATION",
    "DEPARTMENT",
    "DAILY",
    "INDEX",
    "NCR",
    "PAGE",
    "NOTE",
    "(P/UNIT)",
    "P/UNIT",
];

const DEFAULT_DOCUMENT_TITLE_PREFIXES: &[&str] = &["Department of Agriculture"];

const DEFAULT_REPORT_TITLE_PREFIXES: &[&str] = &["DAILY PRICE INDEX"];

/// Process-wide default configuration, shared read-only.
pub static DEFAULT_CONFIG: LazyLock<ExtractionConfig> = LazyLock::new(ExtractionConfig::default);

/// Tables and limits used by the classifier and the date extractor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Substrings that turn an upper-case line into a header block.
    pub header_keywords: Vec<String>,
    /// Lines starting with any of these are dropped as page furniture.
    pub document_title_prefixes: Vec<String>,
    /// Lines starting with any of these are dropped as report titles.
    pub report_title_prefixes: Vec<String>,
    /// Number of leading pages searched for the publication date.
    pub date_scan_pages: usize,
    /// Number of leading lines per page searched for the publication date.
    pub date_scan_lines: usize,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        let owned = |items: &[&str]| -> Vec<String> { items.iter().map(|s| (*s).to_owned()).collect() };
        Self {
            header_keywords: owned(DEFAULT_HEADER_KEYWORDS),
            document_title_prefixes: owned(DEFAULT_DOCUMENT_TITLE_PREFIXES),
            report_title_prefixes: owned(DEFAULT_REPORT_TITLE_PREFIXES),
            date_scan_pages: 2,
            date_scan_lines: 15,
        }
    }
}

impl ExtractionConfig {
    /// Parses a configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Toml`] if the text is not valid TOML for this
    /// shape, or [`ConfigError::Invalid`] if a table contains an empty
    /// entry.
    pub fn from_toml_str(toml_str: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(toml_str)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and parses a configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, otherwise
    /// the same errors as [`ExtractionConfig::from_toml_str`].
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        log::debug!("Loaded extraction config from {}", path.display());
        Self::from_toml_str(&contents)
    }

    /// Renders the configuration as TOML.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Serialize`] if serialization fails.
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// An empty keyword would match every upper-case line and an empty
    /// prefix every line, so both are rejected.
    fn validate(&self) -> Result<(), ConfigError> {
        let tables = [
            ("header_keywords", &self.header_keywords),
            ("document_title_prefixes", &self.document_title_prefixes),
            ("report_title_prefixes", &self.report_title_prefixes),
        ];
        for (name, entries) in tables {
            if entries.iter().any(|e| e.trim().is_empty()) {
                return Err(ConfigError::Invalid(format!("{name} contains an empty entry")));
            }
        }
        Ok(())
    }

    /// Returns `true` if the line contains any header keyword.
    #[must_use]
    pub fn has_header_keyword(&self, line: &str) -> bool {
        self.header_keywords.iter().any(|k| line.contains(k.as_str()))
    }

    /// Returns `true` if the line starts with a document or report title
    /// prefix.
    #[must_use]
    pub fn has_title_prefix(&self, line: &str) -> bool {
        self.document_title_prefixes
            .iter()
            .chain(&self.report_title_prefixes)
            .any(|p| line.starts_with(p.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_toml_keeps_defaults() {
        let config = ExtractionConfig::from_toml_str("date_scan_lines = 20\n").unwrap();
        assert_eq!(config.date_scan_lines, 20);
        assert_eq!(config.date_scan_pages, 2);
        assert_eq!(config.header_keywords, ExtractionConfig::default().header_keywords);
    }

    #[test]
    fn overrides_tables() {
        let config = ExtractionConfig::from_toml_str(
            r#"
header_keywords = ["PRICE", "AVERAGE"]
report_title_prefixes = ["WEEKLY PRICE MONITOR"]
"#,
        )
        .unwrap();
        assert!(config.has_header_keyword("AVERAGE (PHP)"));
        assert!(!config.has_header_keyword("RETAIL"));
        assert!(config.has_title_prefix("WEEKLY PRICE MONITOR - NCR"));
        assert!(config.has_title_prefix("Department of Agriculture, Quezon City"));
    }

    #[test]
    fn rejects_empty_keyword() {
        let err = ExtractionConfig::from_toml_str(r#"header_keywords = ["PRICE", " "]"#)
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn rejects_wrong_types() {
        let err = ExtractionConfig::from_toml_str("date_scan_pages = \"two\"").unwrap_err();
        assert!(matches!(err, ConfigError::Toml(_)));
    }

    #[test]
    fn default_round_trips_through_toml() {
        let rendered = ExtractionConfig::default().to_toml_string().unwrap();
        let parsed = ExtractionConfig::from_toml_str(&rendered).unwrap();
        assert_eq!(parsed, ExtractionConfig::default());
    }
}
