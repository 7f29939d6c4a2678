//! Tesseract OCR engine.

use super::engine::{OcrEngine, OcrError};
use crate::tool;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::Duration;

/// Environment variable tesseract reads its model directory from.
const TESSDATA_ENV: &str = "TESSDATA_PREFIX";

/// Page segmentation mode 1: automatic segmentation with orientation and
/// script detection.
const PAGE_SEG_MODE: &str = "1";

/// OCR engine backed by the `tesseract` command-line tool.
///
/// Runs `tesseract <image> stdout --psm 1`. The model directory (which must
/// contain the orientation detection model `osd.traineddata`) is set on the
/// child's environment only.
#[derive(Debug, Clone)]
pub struct Tesseract {
    program: PathBuf,
    tessdata_dir: Option<PathBuf>,
}

impl Tesseract {
    /// Create an engine running `program` with an optional model directory.
    pub fn new(program: impl Into<PathBuf>, tessdata_dir: Option<PathBuf>) -> Self {
        Self {
            program: program.into(),
            tessdata_dir,
        }
    }

    /// Build the command line for one image.
    fn command(&self, image: &Path) -> Command {
        let mut command = Command::new(&self.program);
        command
            .arg(image)
            .arg("stdout")
            .args(["--psm", PAGE_SEG_MODE]);
        if let Some(dir) = &self.tessdata_dir {
            command.env(TESSDATA_ENV, dir);
        }
        command
    }
}

impl Default for Tesseract {
    fn default() -> Self {
        Self::new("tesseract", None)
    }
}

impl OcrEngine for Tesseract {
    fn name(&self) -> &'static str {
        "tesseract"
    }

    fn is_available(&self) -> bool {
        tool::command_exists(&self.program)
    }

    fn recognize(&self, image: &Path, timeout: Duration) -> Result<String, OcrError> {
        if !image.is_file() {
            return Err(OcrError::ImageNotFound {
                path: image.to_path_buf(),
            });
        }

        let output = tool::run(&mut self.command(image), timeout).map_err(|source| {
            OcrError::Engine {
                path: image.to_path_buf(),
                source,
            }
        })?;

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}
