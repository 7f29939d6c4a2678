//! CSV output: a header, then one row per record, streamed as produced.

use crate::record::Record;
use crate::walk::FileEntry;
use std::fs::File;
use std::io::{self, Write};
use std::path::PathBuf;

/// Column names of the output, in order.
pub const HEADER: [&str; 4] = ["id", "text", "title", "url"];

/// Where output rows go.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum OutputDestination {
    #[default]
    Stdout,
    File(PathBuf),
}

/// Errors opening or writing the output. Always fatal to a run.
#[derive(Debug, thiserror::Error)]
pub enum SinkError {
    #[error("Cannot open output file {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to write output: {0}")]
    Write(#[from] csv::Error),

    #[error("Failed to flush output: {0}")]
    Flush(#[from] io::Error),
}

/// Streams rows to a CSV destination.
pub struct RecordSink<W: Write = Box<dyn Write>> {
    writer: csv::Writer<W>,
    header_written: bool,
}

impl RecordSink {
    /// Open a sink on a file (created or truncated) or on stdout.
    pub fn open(destination: &OutputDestination) -> Result<Self, SinkError> {
        let writer: Box<dyn Write> = match destination {
            OutputDestination::Stdout => Box::new(io::stdout()),
            OutputDestination::File(path) => {
                let file = File::create(path).map_err(|source| SinkError::Open {
                    path: path.clone(),
                    source,
                })?;
                Box::new(file)
            }
        };
        Ok(Self::from_writer(writer))
    }
}

impl<W: Write> RecordSink<W> {
    /// Wrap any writer.
    pub fn from_writer(writer: W) -> Self {
        let writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(writer);
        Self {
            writer,
            header_written: false,
        }
    }

    /// Write the header row. Only the first call writes anything.
    pub fn write_header(&mut self) -> Result<(), SinkError> {
        if self.header_written {
            return Ok(());
        }
        self.writer.write_record(HEADER)?;
        self.header_written = true;
        Ok(())
    }

    pub fn write_record(&mut self, record: &Record) -> Result<(), SinkError> {
        self.writer.serialize(record)?;
        Ok(())
    }

    /// Write a one-column listing row for a file (list-only mode).
    pub fn write_listing(&mut self, entry: &FileEntry) -> Result<(), SinkError> {
        self.writer.write_record([entry.title()])?;
        Ok(())
    }

    pub fn flush(&mut self) -> Result<(), SinkError> {
        self.writer.flush()?;
        Ok(())
    }

    /// Flush and hand back the underlying writer.
    pub fn finish(mut self) -> Result<W, SinkError> {
        self.flush()?;
        self.writer
            .into_inner()
            .map_err(|err| SinkError::Flush(io::Error::new(err.error().kind(), err.error().to_string())))
    }
}
