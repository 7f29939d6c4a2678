//! Run configuration.
//!
//! A [`Config`] is resolved once at startup from command-line flags and an
//! optional TOML [`Settings`] file, then only read. Settings hold what is
//! machine-specific (tool locations, model directory); flags hold what is
//! run-specific.

use crate::extract::OcrMode;
use crate::sink::OutputDestination;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default per-file time budget.
pub const DEFAULT_TIMEOUT_SECS: u64 = 300;

/// Default resolution for rendering PDF pages before OCR.
pub const DEFAULT_RENDER_DPI: u32 = 300;

/// Value of the `OS` environment variable on Windows.
const WINDOWS_OS: &str = "Windows_NT";

/// Locations of the external tools.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolPaths {
    pub pdftotext: PathBuf,
    pub pdftoppm: PathBuf,
    pub tesseract: PathBuf,
    pub docsplit: PathBuf,
}

impl ToolPaths {
    /// Default locations for a platform.
    ///
    /// On Windows (`os` is `Windows_NT`) the poppler executables are
    /// expected next to the docs2csv executable in `exe_dir`; elsewhere
    /// every tool is looked up on `PATH`.
    pub fn for_platform(os: Option<&str>, exe_dir: Option<&Path>) -> Self {
        let (pdftotext, pdftoppm) = match (os, exe_dir) {
            (Some(WINDOWS_OS), Some(dir)) => (dir.join("pdftotext.exe"), dir.join("pdftoppm.exe")),
            _ => (PathBuf::from("pdftotext"), PathBuf::from("pdftoppm")),
        };
        Self {
            pdftotext,
            pdftoppm,
            tesseract: PathBuf::from("tesseract"),
            docsplit: PathBuf::from("docsplit"),
        }
    }

    /// Default locations for the running process.
    pub fn detect() -> Self {
        let os = std::env::var("OS").ok();
        Self::for_platform(os.as_deref(), executable_dir().as_deref())
    }
}

impl Default for ToolPaths {
    fn default() -> Self {
        Self::for_platform(None, None)
    }
}

/// Fully resolved, read-only configuration for one run.
#[derive(Debug, Clone)]
pub struct Config {
    /// Extract text (false: only list matching files)
    pub process: bool,
    /// Descend into subdirectories
    pub recurse: bool,
    /// OCR images and PDFs without a text layer
    pub ocr: bool,
    /// OCR every PDF, even with a text layer
    pub force_ocr: bool,
    pub output: OutputDestination,
    /// Base for record URLs instead of `file://` paths
    pub url_base: Option<String>,
    pub tools: ToolPaths,
    /// OCR model directory handed to the engine
    pub tessdata_dir: Option<PathBuf>,
    pub render_dpi: u32,
    /// Time budget for extracting a single file
    pub file_timeout: Duration,
}

impl Config {
    /// OCR policy implied by the `ocr`/`force_ocr` flags.
    pub fn ocr_mode(&self) -> OcrMode {
        if self.force_ocr {
            OcrMode::Always
        } else if self.ocr {
            OcrMode::Fallback
        } else {
            OcrMode::Off
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            process: true,
            recurse: false,
            ocr: false,
            force_ocr: false,
            output: OutputDestination::Stdout,
            url_base: None,
            tools: ToolPaths::default(),
            tessdata_dir: None,
            render_dpi: DEFAULT_RENDER_DPI,
            file_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

/// Errors loading the settings file.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("Cannot read settings file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid settings file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid settings file {path}: {key} must be greater than zero")]
    Invalid { path: PathBuf, key: &'static str },
}

/// Contents of the optional `config.toml`. Every key is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub url_base: Option<String>,
    pub tessdata_dir: Option<PathBuf>,
    pub timeout_secs: Option<u64>,
    pub render_dpi: Option<u32>,
    pub tools: ToolSettings,
}

/// `[tools]` table: overrides for individual tool locations.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ToolSettings {
    pub pdftotext: Option<PathBuf>,
    pub pdftoppm: Option<PathBuf>,
    pub tesseract: Option<PathBuf>,
    pub docsplit: Option<PathBuf>,
}

impl Settings {
    /// Load settings from an explicit path. The file must exist.
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let content = std::fs::read_to_string(path).map_err(|source| SettingsError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let settings: Self = toml::from_str(&content).map_err(|source| SettingsError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        settings.validate(path)?;
        Ok(settings)
    }

    /// Reject values that would make every tool call fail.
    fn validate(&self, path: &Path) -> Result<(), SettingsError> {
        let zero_key = if self.timeout_secs == Some(0) {
            Some("timeout_secs")
        } else if self.render_dpi == Some(0) {
            Some("render_dpi")
        } else {
            None
        };
        match zero_key {
            Some(key) => Err(SettingsError::Invalid {
                path: path.to_path_buf(),
                key,
            }),
            None => Ok(()),
        }
    }

    /// Load settings from the default location, if a file is there.
    pub fn load_default() -> Result<Self, SettingsError> {
        match Self::default_path() {
            Some(path) if path.is_file() => {
                tracing::debug!("Loading settings from {}", path.display());
                Self::load(&path)
            }
            _ => Ok(Self::default()),
        }
    }

    /// `<config dir>/docs2csv/config.toml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("docs2csv").join("config.toml"))
    }

    /// Tool locations: platform defaults overridden by `[tools]`.
    pub fn tool_paths(&self, defaults: ToolPaths) -> ToolPaths {
        let tools = self.tools.clone();
        ToolPaths {
            pdftotext: tools.pdftotext.unwrap_or(defaults.pdftotext),
            pdftoppm: tools.pdftoppm.unwrap_or(defaults.pdftoppm),
            tesseract: tools.tesseract.unwrap_or(defaults.tesseract),
            docsplit: tools.docsplit.unwrap_or(defaults.docsplit),
        }
    }

    /// OCR model directory: the configured one, else a `tessdata`
    /// directory shipped next to the executable.
    pub fn tessdata_dir(&self) -> Option<PathBuf> {
        self.tessdata_dir.clone().or_else(|| {
            executable_dir()
                .map(|dir| dir.join("tessdata"))
                .filter(|dir| dir.is_dir())
        })
    }
}

fn executable_dir() -> Option<PathBuf> {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
}
