//! docs2csv - batch-convert a directory of documents into a CSV dataset
//!
//! Each recognized file under a directory becomes one row with a stable id,
//! its extracted text, a title and a locator URL. Text comes from external
//! tools (pdftotext, tesseract, docsplit); this crate decides which tool
//! to use per file, when to fall back to OCR, how to sanitize the text, and
//! keeps a single bad file from stopping the batch.
//!
//! # Module Structure
//!
//! - [`walk`] - Recognized-file discovery
//! - [`extract`] - Format dispatch and OCR fallback
//! - [`ocr`] - OCR engine adapter
//! - [`text`] - Text sanitization
//! - [`pipeline`] - Batch driver with per-file failure isolation
//! - [`sink`] / [`record`] - CSV output
//! - [`config`] / [`cli`] - Settings and command-line flags
//! - [`tool`] - External process runner

pub mod cli;
pub mod config;
pub mod extract;
pub mod ocr;
pub mod pipeline;
pub mod record;
pub mod sink;
pub mod text;
pub mod tool;
pub mod walk;

pub use cli::Cli;
pub use config::{Config, Settings};
pub use extract::{ExtractionError, ExtractionRequest, ExtractionResult, Extractor, Format, OcrMode};
pub use pipeline::{Pipeline, RunError, RunSummary};
pub use record::Record;
pub use sink::{OutputDestination, RecordSink};
pub use walk::{walk, FileEntry, WalkError};
