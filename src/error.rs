use std::path::PathBuf;

use thiserror::Error;

/// Convenience result type for loading, writing and running the pipeline.
pub type PipelineResult<T> = Result<T, PipelineError>;

/// Error type returned by the loader, the writer and the pipeline runner.
///
/// `File`, `Format` and `Schema` are the fatal input errors: they are raised before any row is
/// enriched. Per-row lookup failures never surface here; they end up in the row's status.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The input file could not be opened (missing, permission denied, ...).
    #[error("cannot open '{}': {source}", .path.display())]
    File {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file extension does not map to a supported table format.
    #[error("unsupported format: {message}")]
    Format { message: String },

    /// The table does not have the expected shape (no company-name column, no header row, ...).
    #[error("schema mismatch: {message}")]
    Schema { message: String },

    /// Underlying I/O error while writing output.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV read/write error.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[cfg(feature = "excel")]
    /// Workbook read error (feature-gated behind `excel`).
    #[error("excel error: {0}")]
    Excel(#[from] calamine::Error),

    #[cfg(feature = "excel")]
    /// Workbook write error (feature-gated behind `excel`).
    #[error("xlsx write error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),
}

impl PipelineError {
    /// Returns `true` for the errors that reject the input before processing starts.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            Self::File { .. } | Self::Format { .. } | Self::Schema { .. }
        )
    }
}
