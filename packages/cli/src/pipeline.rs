//! Per-document extraction with failure isolation.
//!
//! Each document is opened, split into pages, and run through
//! [`extract_bulletin`] on a blocking task. Documents are independent: a
//! document that cannot be read, fails PDF decoding, or panics produces an
//! error outcome for that document only.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use price_bulletin::{BulletinExtraction, ExtractedDate, ExtractionConfig, extract_bulletin};
use price_bulletin_pdf::{PdfError, open_document};

use crate::progress::ProgressCallback;

/// Errors that stop a single document from being processed.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// The document could not be read or decoded.
    #[error(transparent)]
    Pdf(#[from] PdfError),

    /// The extraction task panicked or was cancelled.
    #[error("Extraction task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Result of processing one document.
#[derive(Debug)]
pub struct DocumentOutcome<T = BulletinExtraction> {
    /// Path as given on the command line.
    pub path: PathBuf,
    /// What the document produced, or why it was skipped.
    pub result: Result<T, PipelineError>,
}

/// Opens one document and extracts its records and date.
///
/// # Errors
///
/// Returns [`PdfError`] if the document cannot be read or decoded.
pub fn process_document(
    path: &Path,
    config: &ExtractionConfig,
) -> Result<BulletinExtraction, PdfError> {
    let doc = open_document(path)?;
    let pages = doc.pages()?;
    Ok(extract_bulletin(&pages, doc.filename(), config))
}

/// Finds only the publication date of one document.
///
/// # Errors
///
/// Returns [`PdfError`] if the document cannot be read or decoded.
pub fn document_date(
    path: &Path,
    config: &ExtractionConfig,
) -> Result<Option<ExtractedDate>, PdfError> {
    let doc = open_document(path)?;
    let pages = doc.pages()?;
    Ok(price_bulletin::extract_date_with_config(
        &pages,
        doc.filename(),
        config,
    ))
}

/// Runs `job` over every document with at most `concurrency` in flight.
///
/// Each document gets its own blocking task, so a panic inside PDF
/// decoding becomes a [`PipelineError::Join`] for that document alone.
/// Outcomes come back in the same order as `paths`.
pub async fn process_documents<T, F>(
    paths: Vec<PathBuf>,
    config: Arc<ExtractionConfig>,
    concurrency: usize,
    progress: &Arc<dyn ProgressCallback>,
    job: F,
) -> Vec<DocumentOutcome<T>>
where
    T: Send + 'static,
    F: Fn(&Path, &ExtractionConfig) -> Result<T, PdfError> + Copy + Send + 'static,
{
    use futures::stream::{self, StreamExt as _};

    log::info!(
        "Processing {} document(s) (concurrency={concurrency})",
        paths.len()
    );

    stream::iter(paths.into_iter().map(move |path| {
        let config = Arc::clone(&config);
        let progress = Arc::clone(progress);
        async move {
            let task_path = path.clone();
            let joined = tokio::task::spawn_blocking(move || job(&task_path, &config)).await;
            progress.inc(1);

            let result = match joined {
                Ok(output) => output.map_err(PipelineError::from),
                Err(e) => {
                    log::error!("Task for {} did not complete: {e}", path.display());
                    Err(PipelineError::from(e))
                }
            };
            DocumentOutcome { path, result }
        }
    }))
    .buffered(concurrency.max(1))
    .collect()
    .await
}
