//! Command-line interface definitions.
//!
//! Lives in the library so the `xtask` crate can render the man page from
//! the same definitions.

use crate::config::{Config, Settings, SettingsError, ToolPaths, DEFAULT_RENDER_DPI};
use crate::sink::OutputDestination;
use clap::{ArgAction, Parser};
use std::path::PathBuf;
use std::sync::OnceLock;
use std::time::Duration;

/// Version string with build date and, for dev builds, the git commit.
fn long_version() -> &'static str {
    static LONG_VERSION: OnceLock<String> = OnceLock::new();
    LONG_VERSION.get_or_init(|| {
        let version = env!("CARGO_PKG_VERSION");
        let date = env!("DOCS2CSV_BUILD_DATE");
        match option_env!("VERGEN_GIT_SHA") {
            Some(sha) if sha != "unknown" => {
                format!("{} ({} {})", version, &sha[..sha.len().min(7)], date)
            }
            _ => format!("{} ({})", version, date),
        }
    })
}

/// Batch-convert a directory of documents into a CSV of extracted text.
#[derive(Debug, Parser)]
#[command(
    name = "docs2csv",
    version,
    long_version = long_version(),
    long_about = "Scan a directory for documents (txt, pdf, html, office files, rtf, jpg), \
                  extract their text and write one CSV row per document with the columns \
                  id, text, title and url.\n\n\
                  PDFs without a text layer and images can be run through OCR. Files that \
                  fail to extract are reported on stderr and left out; the run goes on.\n\n\
                  External tools: pdftotext and pdftoppm (poppler), tesseract, docsplit."
)]
pub struct Cli {
    /// Only list files that would be processed, do not extract text
    #[arg(short = 'l', long)]
    pub list: bool,

    /// OCR images, and PDFs that have no text layer
    #[arg(short = 'o', long)]
    pub ocr: bool,

    /// OCR every PDF, even when it has a text layer (implies --ocr)
    #[arg(short = 'f', long)]
    pub force_ocr: bool,

    /// Scan subdirectories recursively
    #[arg(short = 'r', long)]
    pub recurse: bool,

    /// Emit <URL>/<relative path> locators instead of file:// URLs
    #[arg(short = 'u', long, value_name = "URL")]
    pub url_base: Option<String>,

    /// Settings file (default: <config dir>/docs2csv/config.toml if present)
    #[arg(short = 'c', long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Time budget per file, in seconds
    #[arg(long, value_name = "SECS", value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout: Option<u64>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short = 'v', long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Directory to scan
    pub directory: PathBuf,

    /// CSV file to write (default: stdout)
    pub output: Option<PathBuf>,
}

impl Cli {
    /// Settings from `--config`, or from the default location.
    pub fn load_settings(&self) -> Result<Settings, SettingsError> {
        match &self.config {
            Some(path) => Settings::load(path),
            None => Settings::load_default(),
        }
    }

    /// Resolve the run configuration; flags take precedence over settings.
    pub fn to_config(&self, settings: &Settings, default_tools: ToolPaths) -> Config {
        let output = match &self.output {
            Some(path) => OutputDestination::File(path.clone()),
            None => OutputDestination::Stdout,
        };
        let timeout_secs = self
            .timeout
            .or(settings.timeout_secs)
            .unwrap_or(crate::config::DEFAULT_TIMEOUT_SECS);

        Config {
            process: !self.list,
            recurse: self.recurse,
            ocr: self.ocr || self.force_ocr,
            force_ocr: self.force_ocr,
            output,
            url_base: self.url_base.clone().or_else(|| settings.url_base.clone()),
            tools: settings.tool_paths(default_tools),
            tessdata_dir: settings.tessdata_dir(),
            render_dpi: settings.render_dpi.unwrap_or(DEFAULT_RENDER_DPI),
            file_timeout: Duration::from_secs(timeout_secs),
        }
    }
}
