//! Generic document extraction (office formats, HTML, RTF).

use super::ExtractionError;
use crate::tool;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::Duration;

/// A backend that turns any supported document into plain text.
pub trait DocumentBackend {
    /// Human-readable name for logs and error messages.
    fn name(&self) -> &'static str;

    /// Check if the backend's tool is installed.
    fn is_available(&self) -> bool;

    /// Extract the text of `document`, using `scratch` for intermediate files.
    fn extract_text(
        &self,
        document: &Path,
        scratch: &Path,
        timeout: Duration,
    ) -> Result<Vec<u8>, ExtractionError>;
}

/// Document backend using `docsplit text`.
///
/// docsplit writes `<output dir>/<file stem>.txt`; the file is read back
/// and left for the caller's scratch directory to clean up.
#[derive(Debug, Clone)]
pub struct Docsplit {
    program: PathBuf,
}

impl Docsplit {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    fn command(&self, document: &Path, scratch: &Path) -> Command {
        let mut command = Command::new(&self.program);
        command
            .args(["text", "--no-ocr", "--output"])
            .arg(scratch)
            .arg(document);
        command
    }
}

impl Default for Docsplit {
    fn default() -> Self {
        Self::new("docsplit")
    }
}

impl DocumentBackend for Docsplit {
    fn name(&self) -> &'static str {
        "docsplit"
    }

    fn is_available(&self) -> bool {
        tool::command_exists(&self.program)
    }

    fn extract_text(
        &self,
        document: &Path,
        scratch: &Path,
        timeout: Duration,
    ) -> Result<Vec<u8>, ExtractionError> {
        tool::run(&mut self.command(document, scratch), timeout)?;

        let output = output_path(document, scratch);
        std::fs::read(&output).map_err(|_| ExtractionError::MissingOutput {
            tool: self.name(),
            path: output,
        })
    }
}

/// Where docsplit leaves the text for `document`.
fn output_path(document: &Path, scratch: &Path) -> PathBuf {
    let stem = document.file_stem().unwrap_or(document.as_os_str());
    let mut name = stem.to_os_string();
    name.push(".txt");
    scratch.join(name)
}
