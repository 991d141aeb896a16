//! CSV output.

use std::fs::File;
use std::path::Path;

use crate::error::PipelineResult;

/// Streams rows to a CSV file, flushing after every row.
pub struct CsvSink {
    wtr: csv::Writer<File>,
}

impl CsvSink {
    /// Create (or truncate) `path` and write the header row.
    pub fn create(path: &Path, columns: &[String]) -> PipelineResult<Self> {
        let file = File::create(path)?;
        let mut wtr = csv::WriterBuilder::new().has_headers(false).from_writer(file);
        wtr.write_record(columns)?;
        wtr.flush()?;
        Ok(Self { wtr })
    }

    /// Write one row of rendered cells.
    pub fn write_row(&mut self, cells: &[String]) -> PipelineResult<()> {
        self.wtr.write_record(cells)?;
        self.wtr.flush()?;
        Ok(())
    }

    /// Flush and close the file.
    pub fn finish(mut self) -> PipelineResult<()> {
        self.wtr.flush()?;
        Ok(())
    }
}
