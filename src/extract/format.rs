//! Recognized document formats.

/// File extensions (without the dot) eligible for processing.
///
/// Matching is exact and case-sensitive: `report.PDF` is not picked up.
pub const RECOGNIZED_EXTENSIONS: &[&str] = &[
    "txt", "pdf", "html", "htm", "mhtml", "mht", "doc", "docx", "ppt", "pptx", "xls", "xlsx",
    "jpg", "rtf",
];

/// Extraction strategy for a recognized file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// PDF text layer, with optional OCR of rendered pages
    Pdf,
    /// Raster image, text only via OCR
    Image,
    /// Plain text, read verbatim
    PlainText,
    /// Office documents, HTML, RTF: handed to the generic extractor
    Document,
}

impl Format {
    /// Detect the format from a file extension (without the dot).
    ///
    /// Returns `None` for extensions outside [`RECOGNIZED_EXTENSIONS`].
    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension {
            "pdf" => Some(Self::Pdf),
            "jpg" => Some(Self::Image),
            "txt" => Some(Self::PlainText),
            other if RECOGNIZED_EXTENSIONS.contains(&other) => Some(Self::Document),
            _ => None,
        }
    }

    /// Short name for logging.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Image => "image",
            Self::PlainText => "text",
            Self::Document => "document",
        }
    }
}
