//! Plaintext bulletin dumps.
//!
//! Text produced by an external PDF-to-text converter, with pages
//! separated by form feed characters (`pdftotext` does this by default).

use std::path::Path;

use crate::{PageSource, PdfError, file_name};

/// Page separator in converter output.
const FORM_FEED: char = '\u{c}';

/// A plaintext dump held in memory.
#[derive(Debug, Clone)]
pub struct TextDocument {
    filename: String,
    text: String,
}

impl TextDocument {
    /// Wraps text that was obtained elsewhere.
    #[must_use]
    pub fn from_text(filename: &str, text: String) -> Self {
        Self {
            filename: filename.to_owned(),
            text,
        }
    }

    /// Reads a dump from disk.
    ///
    /// # Errors
    ///
    /// Returns [`PdfError::Io`] if the file cannot be read or is not UTF-8.
    pub fn open(path: &Path) -> Result<Self, PdfError> {
        let text = std::fs::read_to_string(path)?;
        Ok(Self::from_text(&file_name(path), text))
    }
}

impl PageSource for TextDocument {
    fn pages(&self) -> Result<Vec<String>, PdfError> {
        let mut pages: Vec<String> = self.text.split(FORM_FEED).map(str::to_owned).collect();

        // Converters usually end the last page with a form feed too.
        if pages.len() > 1 && pages.last().is_some_and(|p| p.trim().is_empty()) {
            pages.pop();
        }

        Ok(pages)
    }

    fn filename(&self) -> &str {
        &self.filename
    }
}
