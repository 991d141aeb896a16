//! Unified loading entrypoint.
//!
//! Most callers should use [`load_table`], which detects the table format from the file
//! extension and resolves the company-name column once, at load time.

use std::path::Path;

use tracing::{debug, info};

use crate::error::{PipelineError, PipelineResult};
use crate::types::{Header, Table};

use super::csv;

/// Header names accepted as the company-name column, in priority order.
///
/// Matching is case-insensitive against the trimmed header and never partial.
pub const COMPANY_COLUMN_ALIASES: [&str; 8] = [
    "company name",
    "company",
    "company_name",
    "companyname",
    "organization",
    "organisation",
    "business name",
    "name",
];

/// Supported table formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableFormat {
    /// Comma-separated values with a header row.
    Csv,
    /// Spreadsheet/workbook formats (feature-gated behind `excel`).
    Excel,
}

impl TableFormat {
    /// Parse an input format from a file extension (case-insensitive).
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "csv" => Some(Self::Csv),
            "xlsx" | "xlsm" | "xls" | "xlsb" | "ods" => Some(Self::Excel),
            _ => None,
        }
    }

    /// Infer the format of `path` from its extension.
    ///
    /// Fails with [`PipelineError::Format`] when the extension is missing or unknown.
    pub fn from_path(path: &Path) -> PipelineResult<Self> {
        let ext = path
            .extension()
            .and_then(|s| s.to_str())
            .ok_or_else(|| PipelineError::Format {
                message: format!("path has no extension ({})", path.display()),
            })?;

        Self::from_extension(ext).ok_or_else(|| PipelineError::Format {
            message: format!(
                "extension '{ext}' is not supported, use .csv or .xlsx ({})",
                path.display()
            ),
        })
    }
}

/// How to choose the sheet when loading a workbook.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SheetSelection {
    /// Load the first sheet (default).
    #[default]
    First,
    /// Load a single named sheet.
    Sheet(String),
}

/// Options controlling [`load_table`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadOptions {
    /// Use this column as the company name instead of searching the alias list.
    pub company_column: Option<String>,
    /// Workbook sheet to read; ignored for CSV.
    pub sheet: SheetSelection,
}

/// Load an input table from `path`.
///
/// Errors, all raised before any row is returned:
///
/// - [`PipelineError::Format`] if the extension is not a supported table format
/// - [`PipelineError::File`] if the file cannot be opened
/// - [`PipelineError::Schema`] if no company-name column can be found
///
/// # Examples
///
/// ```no_run
/// use places_enrichment::ingestion::{load_table, LoadOptions};
///
/// # fn main() -> Result<(), places_enrichment::PipelineError> {
/// let table = load_table("companies.csv", &LoadOptions::default())?;
/// println!("rows={} company column={}", table.row_count(), table.header.company_column());
/// # Ok(())
/// # }
/// ```
pub fn load_table(path: impl AsRef<Path>, options: &LoadOptions) -> PipelineResult<Table> {
    let path = path.as_ref();
    let format = TableFormat::from_path(path)?;

    let company_column = options.company_column.as_deref();
    let table = match format {
        TableFormat::Csv => csv::load_csv_from_path(path, company_column)?,
        TableFormat::Excel => {
            // calamine reports an unopenable file as a workbook error.
            ensure_readable(path)?;
            load_excel_dispatch(path, company_column, &options.sheet)?
        }
    };

    info!(
        path = %path.display(),
        ?format,
        rows = table.row_count(),
        company_column = table.header.company_column(),
        "loaded input table"
    );
    Ok(table)
}

/// Build a [`Header`] from raw column names, resolving the company-name column.
///
/// With `explicit` set, that column must exist. Otherwise the first entry of
/// [`COMPANY_COLUMN_ALIASES`] present in `columns` wins.
pub fn resolve_header(columns: Vec<String>, explicit: Option<&str>) -> PipelineResult<Header> {
    let position = |name: &str| {
        columns
            .iter()
            .position(|c| c.trim().eq_ignore_ascii_case(name.trim()))
    };

    let company_idx = match explicit {
        Some(name) => position(name).ok_or_else(|| PipelineError::Schema {
            message: format!("company column '{name}' not found. headers={columns:?}"),
        })?,
        None => COMPANY_COLUMN_ALIASES
            .iter()
            .find_map(|alias| position(alias))
            .ok_or_else(|| PipelineError::Schema {
                message: format!(
                    "no company name column (expected one of {COMPANY_COLUMN_ALIASES:?}). headers={columns:?}"
                ),
            })?,
    };

    debug!(column = %columns[company_idx], index = company_idx, "resolved company column");
    Ok(Header::new(columns, company_idx))
}

fn ensure_readable(path: &Path) -> PipelineResult<()> {
    std::fs::File::open(path)
        .map(drop)
        .map_err(|source| PipelineError::File {
            path: path.to_path_buf(),
            source,
        })
}

fn load_excel_dispatch(
    path: &Path,
    company_column: Option<&str>,
    sel: &SheetSelection,
) -> PipelineResult<Table> {
    // Avoid unused warnings when the feature is off.
    let _ = (path, company_column, sel);

    #[cfg(feature = "excel")]
    {
        use super::excel;

        match sel {
            SheetSelection::First => excel::load_excel_from_path(path, None, company_column),
            SheetSelection::Sheet(name) => {
                excel::load_excel_from_path(path, Some(name.as_str()), company_column)
            }
        }
    }

    #[cfg(not(feature = "excel"))]
    {
        Err(PipelineError::Format {
            message: "excel support not enabled (enable cargo feature 'excel')".to_string(),
        })
    }
}
