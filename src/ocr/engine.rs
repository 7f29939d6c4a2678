//! OcrEngine trait and related error types.

use crate::tool::ToolError;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// An engine that can recognize text in a single image.
///
/// Implementations wrap one external OCR tool and know how to invoke it.
pub trait OcrEngine {
    /// Human-readable name for logs and error messages.
    fn name(&self) -> &'static str;

    /// Check if the engine can be invoked on this system.
    ///
    /// Should be fast - typically checks if the binary exists.
    fn is_available(&self) -> bool;

    /// Recognize the text in `image`, giving up after `timeout`.
    fn recognize(&self, image: &Path, timeout: Duration) -> Result<String, OcrError>;
}

/// Errors from a single OCR invocation.
#[derive(Debug, thiserror::Error)]
pub enum OcrError {
    #[error("Image not found: {path}")]
    ImageNotFound { path: PathBuf },

    #[error("OCR of {path} failed: {source}")]
    Engine {
        path: PathBuf,
        #[source]
        source: ToolError,
    },
}
