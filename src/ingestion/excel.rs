#![cfg(feature = "excel")]

use std::path::Path;

use calamine::{Data, Reader, open_workbook_auto};

use crate::error::{PipelineError, PipelineResult};
use crate::types::{InputRow, Table};

use super::unified::resolve_header;

/// Load one sheet of a workbook (`.xlsx`, `.xls`, `.ods`, etc.) into an in-memory [`Table`].
///
/// Behavior:
/// - Picks `sheet_name` if provided; otherwise uses the first sheet in the workbook
/// - Detects the first non-empty row as the header row
/// - Resolves the company-name column from the header
/// - Renders every remaining row's cells as strings, padded to the header width
pub fn load_excel_from_path(
    path: impl AsRef<Path>,
    sheet_name: Option<&str>,
    company_column: Option<&str>,
) -> PipelineResult<Table> {
    let mut workbook = open_workbook_auto(path)?;

    let sheet = match sheet_name {
        Some(name) => name.to_string(),
        None => workbook
            .sheet_names()
            .first()
            .cloned()
            .ok_or_else(|| PipelineError::Schema {
                message: "workbook has no sheets".to_string(),
            })?,
    };

    let range = workbook.worksheet_range(&sheet)?;
    load_sheet_range(&sheet, &range, company_column)
}

fn load_sheet_range(
    sheet: &str,
    range: &calamine::Range<Data>,
    company_column: Option<&str>,
) -> PipelineResult<Table> {
    let header_row_idx = range
        .rows()
        .position(|row| row.iter().any(|c| !matches!(c, Data::Empty)))
        .ok_or_else(|| PipelineError::Schema {
            message: format!("sheet '{sheet}' has no non-empty rows (no header row found)"),
        })?;

    let columns: Vec<String> = range
        .rows()
        .nth(header_row_idx)
        .map(|row| row.iter().map(cell_to_string).collect())
        .unwrap_or_default();

    let header =
        resolve_header(columns, company_column).map_err(|e| wrap_schema_err_with_sheet(sheet, e))?;
    let width = header.len();

    let rows = range
        .rows()
        .skip(header_row_idx + 1)
        .map(|row| InputRow::new(row.iter().map(cell_to_string).collect(), width))
        .collect();

    Ok(Table::new(header, rows))
}

fn wrap_schema_err_with_sheet(sheet: &str, err: PipelineError) -> PipelineError {
    match err {
        PipelineError::Schema { message } => PipelineError::Schema {
            message: format!("sheet '{sheet}': {message}"),
        },
        other => other,
    }
}

/// Render a cell the way a user sees it: integral floats lose their `.0` (zip codes, ids).
fn cell_to_string(c: &Data) -> String {
    match c {
        Data::String(s) => s.clone(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) => {
            if f.fract() == 0.0 && f.abs() < 1e15 {
                (*f as i64).to_string()
            } else {
                f.to_string()
            }
        }
        Data::Bool(b) => b.to_string(),
        Data::DateTime(d) => d.to_string(),
        Data::DateTimeIso(s) => s.clone(),
        Data::DurationIso(s) => s.clone(),
        Data::Error(e) => format!("{e:?}"),
        Data::Empty => String::new(),
    }
}
