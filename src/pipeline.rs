//! Batch driver: walk, extract, write.
//!
//! Files are handled one at a time in traversal order. A file that cannot be
//! extracted is logged and skipped; only an unreadable input directory or an
//! unwritable output stops the run.

use crate::config::Config;
use crate::extract::{ExtractionRequest, Extractor};
use crate::record::Record;
use crate::sink::{RecordSink, SinkError};
use crate::walk::{self, FileEntry, WalkError};
use std::io::Write;
use std::path::Path;

/// Fatal errors that end a run.
#[derive(Debug, thiserror::Error)]
pub enum RunError {
    #[error("Cannot read input directory: {0}")]
    Traversal(#[source] WalkError),

    #[error(transparent)]
    Sink(#[from] SinkError),
}

/// Counts reported at the end of a run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    /// Files listed in list-only mode
    pub listed: usize,
    /// Files that produced a record
    pub processed: usize,
    /// Files (or subtrees) that failed and were left out
    pub skipped: usize,
}

/// Runs one batch with a fixed configuration and extractor.
pub struct Pipeline {
    config: Config,
    extractor: Extractor,
}

impl Pipeline {
    pub fn new(config: Config, extractor: Extractor) -> Self {
        Self { config, extractor }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Process every recognized file under `root` into `sink`.
    ///
    /// In list-only mode nothing is extracted and each file becomes a
    /// listing row; otherwise the header is written first, even when no
    /// file matches.
    pub fn run<W: Write>(
        &self,
        root: &Path,
        sink: &mut RecordSink<W>,
    ) -> Result<RunSummary, RunError> {
        let entries = walk::walk(root, self.config.recurse).map_err(RunError::Traversal)?;

        if self.config.process {
            sink.write_header()?;
        }

        let mut summary = RunSummary::default();
        for item in entries {
            let entry = match item {
                Ok(entry) => entry,
                Err(err) => {
                    tracing::warn!("Skipping {}: {}", err.path().display(), err);
                    summary.skipped += 1;
                    continue;
                }
            };

            if !self.config.process {
                tracing::info!("Found {}", entry.title());
                sink.write_listing(&entry)?;
                summary.listed += 1;
                continue;
            }

            tracing::info!("Processing {}", entry.title());
            match self.process_file(&entry) {
                Some(record) => {
                    sink.write_record(&record)?;
                    summary.processed += 1;
                }
                None => summary.skipped += 1,
            }
        }

        sink.flush()?;

        if self.config.process {
            tracing::info!(
                "Done: {} processed, {} skipped",
                summary.processed,
                summary.skipped
            );
        } else {
            tracing::info!("Done: {} files listed", summary.listed);
        }
        Ok(summary)
    }

    /// Extract one file into a record, or log why it was skipped.
    fn process_file(&self, entry: &FileEntry) -> Option<Record> {
        let request = ExtractionRequest {
            entry,
            ocr: self.config.ocr_mode(),
        };

        match self.extractor.extract(&request) {
            Ok(text) => {
                tracing::debug!(
                    "Extracted {} chars from {} ({})",
                    text.len(),
                    entry.title(),
                    entry.format.name()
                );
                Some(Record::new(entry, text, self.config.url_base.as_deref()))
            }
            Err(err) => {
                tracing::warn!("Skipping {}: {}", entry.title(), err);
                None
            }
        }
    }
}
