//! PDF capabilities: text layer extraction and page rendering.

use super::ExtractionError;
use crate::tool;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::Duration;

/// File name prefix for rendered page images.
const PAGE_PREFIX: &str = "page";

/// A backend that can read a PDF's text layer and rasterize its pages.
pub trait PdfBackend {
    /// Human-readable name for logs and error messages.
    fn name(&self) -> &'static str;

    /// Check if the backend's tools are installed.
    fn is_available(&self) -> bool;

    /// Raw bytes of the PDF's embedded text.
    fn extract_text(&self, pdf: &Path, timeout: Duration) -> Result<Vec<u8>, ExtractionError>;

    /// Render every page to an image inside `out_dir`.
    ///
    /// Returns the image paths in page order.
    fn render_pages(
        &self,
        pdf: &Path,
        out_dir: &Path,
        timeout: Duration,
    ) -> Result<Vec<PathBuf>, ExtractionError>;
}

/// PDF backend built on the poppler utilities `pdftotext` and `pdftoppm`.
#[derive(Debug, Clone)]
pub struct Poppler {
    pdftotext: PathBuf,
    pdftoppm: PathBuf,
    dpi: u32,
}

impl Poppler {
    /// Create a backend from explicit tool paths and a render resolution.
    pub fn new(pdftotext: impl Into<PathBuf>, pdftoppm: impl Into<PathBuf>, dpi: u32) -> Self {
        Self {
            pdftotext: pdftotext.into(),
            pdftoppm: pdftoppm.into(),
            dpi,
        }
    }

    /// `pdftotext -enc UTF-8 <pdf> -` (text to stdout)
    fn text_command(&self, pdf: &Path) -> Command {
        let mut command = Command::new(&self.pdftotext);
        command.args(["-enc", "UTF-8"]).arg(pdf).arg("-");
        command
    }

    /// `pdftoppm -r <dpi> -png <pdf> <out_dir>/page`
    fn render_command(&self, pdf: &Path, out_dir: &Path) -> Command {
        let mut command = Command::new(&self.pdftoppm);
        command
            .arg("-r")
            .arg(self.dpi.to_string())
            .arg("-png")
            .arg(pdf)
            .arg(out_dir.join(PAGE_PREFIX));
        command
    }
}

impl PdfBackend for Poppler {
    fn name(&self) -> &'static str {
        "poppler (pdftotext/pdftoppm)"
    }

    fn is_available(&self) -> bool {
        tool::command_exists(&self.pdftotext) && tool::command_exists(&self.pdftoppm)
    }

    fn extract_text(&self, pdf: &Path, timeout: Duration) -> Result<Vec<u8>, ExtractionError> {
        let output = tool::run(&mut self.text_command(pdf), timeout)?;
        Ok(output.stdout)
    }

    fn render_pages(
        &self,
        pdf: &Path,
        out_dir: &Path,
        timeout: Duration,
    ) -> Result<Vec<PathBuf>, ExtractionError> {
        tool::run(&mut self.render_command(pdf, out_dir), timeout)?;
        rendered_pages(out_dir)
    }
}

/// Collect `page-N.png` files from `dir`, ordered by page number.
///
/// pdftoppm zero-pads N to the width of the page count, so lexical order
/// is not enough to be safe.
fn rendered_pages(dir: &Path) -> Result<Vec<PathBuf>, ExtractionError> {
    let read_error = |source| ExtractionError::Io {
        path: dir.to_path_buf(),
        source,
    };

    let mut pages = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(read_error)? {
        let path = entry.map_err(read_error)?.path();
        if let Some(number) = page_number(&path) {
            pages.push((number, path));
        }
    }

    pages.sort();
    Ok(pages.into_iter().map(|(_, path)| path).collect())
}

/// Page number of a rendered image named `page-<N>.png`.
fn page_number(path: &Path) -> Option<u32> {
    if path.extension()? != "png" {
        return None;
    }
    let stem = path.file_stem()?.to_str()?;
    let (prefix, number) = stem.rsplit_once('-')?;
    if prefix != PAGE_PREFIX {
        return None;
    }
    number.parse().ok()
}
