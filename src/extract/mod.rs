//! Format-dependent text extraction.
//!
//! [`Extractor`] dispatches one file to the strategy for its [`Format`]:
//!
//! - **PDF**: text layer via [`PdfBackend`], plus OCR of rendered pages when
//!   forced or when the text layer has no letters
//! - **Image**: OCR when enabled, otherwise an empty text
//! - **Plain text**: file contents verbatim
//! - **Document**: delegated to a [`DocumentBackend`]
//!
//! Every strategy's output goes through [`text::clean`](crate::text::clean).
//! Scratch files live in a temporary directory owned by a single call and
//! removed when it returns, whatever the outcome.

mod document;
mod format;
mod pdf;

pub use document::{DocumentBackend, Docsplit};
pub use format::{Format, RECOGNIZED_EXTENSIONS};
pub use pdf::{PdfBackend, Poppler};

use crate::config::Config;
use crate::ocr::{OcrEngine, OcrError, Tesseract};
use crate::text;
use crate::tool::{Deadline, ToolError};
use crate::walk::FileEntry;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tempfile::TempDir;

/// When to run OCR.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OcrMode {
    /// Never; images yield empty text
    #[default]
    Off,
    /// Images, and PDFs whose text layer has no letters
    Fallback,
    /// Images, and every PDF regardless of its text layer
    Always,
}

/// One file to extract, with the OCR policy that applies to it.
#[derive(Debug, Clone, Copy)]
pub struct ExtractionRequest<'a> {
    pub entry: &'a FileEntry,
    pub ocr: OcrMode,
}

/// Outcome of extracting one file: cleaned text, or why it failed.
pub type ExtractionResult = Result<String, ExtractionError>;

/// Errors that make a single file unprocessable.
#[derive(Debug, thiserror::Error)]
pub enum ExtractionError {
    #[error(transparent)]
    Tool(#[from] ToolError),

    #[error(transparent)]
    Ocr(#[from] OcrError),

    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{tool} produced no output at {path}")]
    MissingOutput { tool: &'static str, path: PathBuf },

    #[error("Failed to create scratch directory: {0}")]
    Scratch(#[source] std::io::Error),
}

/// Dispatches files to extraction backends.
pub struct Extractor {
    pdf: Box<dyn PdfBackend>,
    documents: Box<dyn DocumentBackend>,
    ocr: Box<dyn OcrEngine>,
    file_timeout: Duration,
}

impl Extractor {
    /// Create with specific backends (for testing).
    pub fn new(
        pdf: Box<dyn PdfBackend>,
        documents: Box<dyn DocumentBackend>,
        ocr: Box<dyn OcrEngine>,
        file_timeout: Duration,
    ) -> Self {
        Self {
            pdf,
            documents,
            ocr,
            file_timeout,
        }
    }

    /// Create the production backends from resolved configuration.
    pub fn from_config(config: &Config) -> Self {
        let tools = &config.tools;
        Self::new(
            Box::new(Poppler::new(&tools.pdftotext, &tools.pdftoppm, config.render_dpi)),
            Box::new(Docsplit::new(&tools.docsplit)),
            Box::new(Tesseract::new(&tools.tesseract, config.tessdata_dir.clone())),
            config.file_timeout,
        )
    }

    /// Names of backends whose tools are not installed.
    ///
    /// The OCR engine is only checked when `ocr` is not [`OcrMode::Off`].
    pub fn unavailable_backends(&self, ocr: OcrMode) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if !self.pdf.is_available() {
            missing.push(self.pdf.name());
        }
        if !self.documents.is_available() {
            missing.push(self.documents.name());
        }
        if ocr != OcrMode::Off && !self.ocr.is_available() {
            missing.push(self.ocr.name());
        }
        missing
    }

    /// Extract the cleaned text of one file.
    pub fn extract(&self, request: &ExtractionRequest<'_>) -> ExtractionResult {
        let deadline = Deadline::after(self.file_timeout);
        let path = request.entry.path.as_path();

        let raw = match request.entry.format {
            Format::Pdf => self.extract_pdf(path, request.ocr, &deadline)?,
            Format::Image => self.extract_image(path, request.ocr, &deadline)?,
            Format::PlainText => read_text(path)?,
            Format::Document => self.extract_document(path, &deadline)?,
        };

        Ok(text::clean_str(&raw))
    }

    fn extract_pdf(
        &self,
        pdf: &Path,
        mode: OcrMode,
        deadline: &Deadline,
    ) -> Result<String, ExtractionError> {
        let mut content = text::clean(&self.pdf.extract_text(pdf, deadline.remaining())?);

        let needs_ocr = match mode {
            OcrMode::Off => false,
            OcrMode::Fallback => !text::has_alphabetic(&content),
            OcrMode::Always => true,
        };
        if !needs_ocr {
            return Ok(content);
        }

        tracing::info!("Running OCR on {}", pdf.display());
        let recognized = self.ocr_pdf(pdf, deadline)?;

        if recognized.is_empty() {
            return Ok(content);
        }
        if content.trim().is_empty() {
            return Ok(recognized);
        }
        if !content.ends_with('\n') {
            content.push('\n');
        }
        content.push_str(&recognized);
        Ok(content)
    }

    /// OCR every rendered page of `pdf`, joining page texts with newlines.
    ///
    /// A page the engine fails on is skipped. Running out of time is not a
    /// page failure: it fails the whole file.
    fn ocr_pdf(&self, pdf: &Path, deadline: &Deadline) -> Result<String, ExtractionError> {
        let scratch = scratch_dir()?;
        let pages = self
            .pdf
            .render_pages(pdf, scratch.path(), deadline.remaining())?;
        tracing::debug!("Rendered {} pages of {}", pages.len(), pdf.display());

        let mut texts = Vec::with_capacity(pages.len());
        for (index, page) in pages.iter().enumerate() {
            match self.ocr.recognize(page, deadline.remaining()) {
                Ok(page_text) => texts.push(text::clean_str(&page_text)),
                Err(err @ OcrError::Engine {
                    source: ToolError::Timeout { .. },
                    ..
                }) => return Err(err.into()),
                Err(err) => {
                    tracing::warn!(
                        "Skipping page {} of {}: {}",
                        index + 1,
                        pdf.display(),
                        err
                    );
                }
            }
        }

        Ok(texts.join("\n"))
    }

    fn extract_image(
        &self,
        image: &Path,
        mode: OcrMode,
        deadline: &Deadline,
    ) -> Result<String, ExtractionError> {
        if mode == OcrMode::Off {
            return Ok(String::new());
        }
        Ok(self.ocr.recognize(image, deadline.remaining())?)
    }

    fn extract_document(
        &self,
        document: &Path,
        deadline: &Deadline,
    ) -> Result<String, ExtractionError> {
        let scratch = scratch_dir()?;
        let raw = self
            .documents
            .extract_text(document, scratch.path(), deadline.remaining())?;
        Ok(text::clean(&raw))
    }
}

fn read_text(path: &Path) -> Result<String, ExtractionError> {
    let raw = std::fs::read(path).map_err(|source| ExtractionError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(text::clean(&raw))
}

/// Temporary directory for one file's intermediate output, removed on drop.
fn scratch_dir() -> Result<TempDir, ExtractionError> {
    tempfile::Builder::new()
        .prefix("docs2csv-")
        .tempdir()
        .map_err(ExtractionError::Scratch)
}
