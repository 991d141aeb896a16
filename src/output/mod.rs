//! Writing enriched tables.
//!
//! [`TableWriter`] accepts rows incrementally, as the pipeline produces them, and persists them in
//! the format selected by the output path's extension. [`TableWriter::finish`] must be called to
//! guarantee everything appended so far is on disk; the pipeline runner always calls it, including
//! after a cancellation.

pub mod csv;
#[cfg(feature = "excel")]
pub mod excel;

use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::{PipelineError, PipelineResult};
use crate::types::{EnrichedRow, OutputLayout};

/// Output format, selected from the output path's extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// `.csv`
    Csv,
    /// `.xlsx` (feature-gated behind `excel`).
    Xlsx,
}

impl OutputFormat {
    /// Infer the output format from `path`.
    ///
    /// Only formats that can be written are accepted; legacy workbook formats are rejected.
    pub fn from_path(path: &Path) -> PipelineResult<Self> {
        let ext = path
            .extension()
            .and_then(|s| s.to_str())
            .map(str::to_ascii_lowercase);
        match ext.as_deref() {
            Some("csv") => Ok(Self::Csv),
            Some("xlsx") => Ok(Self::Xlsx),
            _ => Err(PipelineError::Format {
                message: format!(
                    "cannot write '{}': output must end in .csv or .xlsx",
                    path.display()
                ),
            }),
        }
    }
}

enum Sink {
    Csv(csv::CsvSink),
    #[cfg(feature = "excel")]
    Xlsx(excel::XlsxSink),
}

/// Incremental writer for enriched rows.
pub struct TableWriter {
    path: PathBuf,
    layout: OutputLayout,
    sink: Sink,
    rows_written: usize,
}

impl TableWriter {
    /// Create the output for `path` and write the header row.
    ///
    /// CSV output is created on disk immediately; workbook output is created on
    /// [`Self::finish`].
    pub fn create(path: impl AsRef<Path>, layout: OutputLayout) -> PipelineResult<Self> {
        let path = path.as_ref();
        let sink = match OutputFormat::from_path(path)? {
            OutputFormat::Csv => Sink::Csv(csv::CsvSink::create(path, layout.columns())?),
            #[cfg(feature = "excel")]
            OutputFormat::Xlsx => Sink::Xlsx(excel::XlsxSink::new(path, layout.columns())?),
            #[cfg(not(feature = "excel"))]
            OutputFormat::Xlsx => {
                return Err(PipelineError::Format {
                    message: "excel support not enabled (enable cargo feature 'excel')".to_string(),
                });
            }
        };

        Ok(Self {
            path: path.to_path_buf(),
            layout,
            sink,
            rows_written: 0,
        })
    }

    /// Append one enriched row.
    pub fn append(&mut self, row: &EnrichedRow) -> PipelineResult<()> {
        let cells = self.layout.render(row);
        match &mut self.sink {
            Sink::Csv(s) => s.write_row(&cells)?,
            #[cfg(feature = "excel")]
            Sink::Xlsx(s) => s.write_row(&cells)?,
        }
        self.rows_written += 1;
        Ok(())
    }

    /// Persist everything appended so far and close the output.
    pub fn finish(self) -> PipelineResult<usize> {
        match self.sink {
            Sink::Csv(s) => s.finish()?,
            #[cfg(feature = "excel")]
            Sink::Xlsx(s) => s.finish()?,
        }
        info!(path = %self.path.display(), rows = self.rows_written, "wrote output table");
        Ok(self.rows_written)
    }
}
