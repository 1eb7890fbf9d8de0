//! Atomic CSV file sink
//!
//! Writes to a temporary file in the destination directory and renames it
//! into place on `finish()`. Dropping the writer before `finish()` removes
//! the temporary file and leaves any existing destination untouched.

use crate::error::{Error, Result};
use crate::record::ProjectedRecord;
use csv::{Terminator, Writer, WriterBuilder};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::debug;

/// Default CSV output path
pub const DEFAULT_CSV_PATH: &str = "characters.csv";

/// CSV writer with RFC 4180 `\r\n` row endings
fn csv_writer<W: Write>(inner: W) -> Writer<W> {
    WriterBuilder::new()
        .terminator(Terminator::CRLF)
        .from_writer(inner)
}

/// CSV writer that only exposes complete files
pub struct AtomicCsvWriter {
    writer: Writer<BufWriter<NamedTempFile>>,
    final_path: PathBuf,
    rows: usize,
}

impl AtomicCsvWriter {
    /// Create a writer targeting `final_path` and write the header row
    pub fn create(final_path: impl AsRef<Path>) -> Result<Self> {
        let final_path = final_path.as_ref().to_path_buf();

        let parent_dir = match final_path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
            _ => PathBuf::from("."),
        };

        let temp_file = NamedTempFile::new_in(&parent_dir).map_err(|e| {
            Error::output(format!(
                "Failed to create temporary file in {}: {e}",
                parent_dir.display()
            ))
        })?;

        let mut writer = csv_writer(BufWriter::new(temp_file));
        writer.write_record(ProjectedRecord::FIELDS)?;

        Ok(Self {
            writer,
            final_path,
            rows: 0,
        })
    }

    /// Append one record
    pub fn write(&mut self, record: &ProjectedRecord) -> Result<()> {
        self.writer.write_record(record.values())?;
        self.rows += 1;
        Ok(())
    }

    /// Flush and move the file into place, returning its path
    pub fn finish(self) -> Result<PathBuf> {
        let buf_writer = self
            .writer
            .into_inner()
            .map_err(|e| Error::output(format!("Failed to flush CSV writer: {}", e.error())))?;

        let temp_file = buf_writer
            .into_inner()
            .map_err(|e| Error::output(format!("Failed to flush buffer: {}", e.error())))?;

        temp_file.persist(&self.final_path).map_err(|e| {
            Error::output(format!(
                "Failed to persist file to {}: {}",
                self.final_path.display(),
                e.error
            ))
        })?;

        debug!("Wrote {} rows to {}", self.rows, self.final_path.display());
        Ok(self.final_path)
    }
}

/// Write all records to `path` with a `name,location,image` header
pub fn write_csv(path: impl AsRef<Path>, records: &[ProjectedRecord]) -> Result<PathBuf> {
    let mut writer = AtomicCsvWriter::create(path)?;
    for record in records {
        writer.write(record)?;
    }
    writer.finish()
}
