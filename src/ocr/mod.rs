//! OCR adapter: turns one image into plain text via an external engine.
//!
//! The engine is a trait so the extraction pipeline can be exercised with
//! fakes. [`Tesseract`] is the production engine.

mod engine;
mod tesseract;

pub use engine::{OcrEngine, OcrError};
pub use tesseract::Tesseract;
