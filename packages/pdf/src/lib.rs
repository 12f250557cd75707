#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Page text extraction for price bulletins.
//!
//! Price bulletins are published as PDFs. This crate turns a bulletin
//! into an ordered list of page texts using pure-Rust text extraction
//! ([`pdf_extract`]), or reads a plaintext dump where pages are separated
//! by form feeds. Both implement [`PageSource`], which is all the
//! extraction layer needs from a document.

pub mod text;

use std::path::Path;

pub use text::TextDocument;

/// Errors specific to page text extraction.
#[derive(Debug, thiserror::Error)]
pub enum PdfError {
    /// PDF text extraction failed.
    #[error("PDF extraction error: {0}")]
    Extraction(String),

    /// The document produced no pages at all.
    #[error("No pages extracted from {filename}")]
    Empty {
        /// File name of the offending document.
        filename: String,
    },

    /// An I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A document that can be split into page texts.
pub trait PageSource: Send + Sync {
    /// Returns the text of every page, in document order.
    ///
    /// # Errors
    ///
    /// Returns [`PdfError`] if the document cannot be decoded.
    fn pages(&self) -> Result<Vec<String>, PdfError>;

    /// File name used for log messages and the date fallback.
    fn filename(&self) -> &str;
}

/// A PDF held in memory.
#[derive(Debug, Clone)]
pub struct PdfDocument {
    filename: String,
    bytes: Vec<u8>,
}

impl PdfDocument {
    /// Wraps PDF bytes that were obtained elsewhere.
    #[must_use]
    pub fn from_bytes(filename: &str, bytes: Vec<u8>) -> Self {
        Self {
            filename: filename.to_owned(),
            bytes,
        }
    }

    /// Reads a PDF from disk.
    ///
    /// # Errors
    ///
    /// Returns [`PdfError::Io`] if the file cannot be read.
    pub fn open(path: &Path) -> Result<Self, PdfError> {
        let bytes = std::fs::read(path)?;
        log::debug!("Read {} bytes from {}", bytes.len(), path.display());
        Ok(Self::from_bytes(&file_name(path), bytes))
    }
}

impl PageSource for PdfDocument {
    fn pages(&self) -> Result<Vec<String>, PdfError> {
        let pages = pdf_extract::extract_text_from_mem_by_pages(&self.bytes).map_err(|e| {
            PdfError::Extraction(format!("failed to extract text from {}: {e}", self.filename))
        })?;

        if pages.is_empty() {
            return Err(PdfError::Empty {
                filename: self.filename.clone(),
            });
        }

        log::debug!(
            "Extracted {} page(s), {} characters of text from {}",
            pages.len(),
            pages.iter().map(String::len).sum::<usize>(),
            self.filename
        );

        Ok(pages)
    }

    fn filename(&self) -> &str {
        &self.filename
    }
}

/// Returns the final path component as a string, or the whole path if it
/// has none.
fn file_name(path: &Path) -> String {
    path.file_name()
        .map_or_else(|| path.to_string_lossy(), |name| name.to_string_lossy())
        .into_owned()
}

/// Opens a document, picking the reader by extension: `.pdf` (any case) is
/// decoded as a PDF, anything else is read as a plaintext dump.
///
/// # Errors
///
/// Returns [`PdfError::Io`] if the file cannot be read.
pub fn open_document(path: &Path) -> Result<Box<dyn PageSource>, PdfError> {
    let is_pdf = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"));

    if is_pdf {
        Ok(Box::new(PdfDocument::open(path)?))
    } else {
        Ok(Box::new(TextDocument::open(path)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_pdf_bytes_fail_extraction() {
        let doc = PdfDocument::from_bytes("broken.pdf", b"not a pdf".to_vec());
        assert!(matches!(doc.pages(), Err(PdfError::Extraction(_))));
        assert_eq!(doc.filename(), "broken.pdf");
    }

    #[test]
    fn missing_file_is_io_error() {
        let path = Path::new("definitely/not/here/daily_price_20251013.pdf");
        assert!(matches!(PdfDocument::open(path), Err(PdfError::Io(_))));
        assert!(matches!(open_document(path), Err(PdfError::Io(_))));
    }

    #[test]
    fn file_name_strips_directories() {
        assert_eq!(
            file_name(Path::new("pdfs/daily_price_20251013.pdf")),
            "daily_price_20251013.pdf"
        );
    }

    #[test]
    fn text_extension_opens_as_text() {
        let dir = std::env::temp_dir().join(format!("price_bulletin_pdf_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("dpi_2025-10-13.TXT");
        std::fs::write(&path, "FISH PRODUCTS\nBangus 180.00\u{c}VEGETABLES\n").unwrap();

        let doc = open_document(&path).unwrap();
        assert_eq!(doc.filename(), "dpi_2025-10-13.TXT");
        assert_eq!(doc.pages().unwrap().len(), 2);

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
