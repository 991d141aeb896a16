//! CSV loading implementation.

use std::fs::File;
use std::path::Path;

use crate::error::{PipelineError, PipelineResult};
use crate::types::{InputRow, Table};

use super::unified::resolve_header;

const UTF8_BOM: char = '\u{feff}';

/// Load a CSV file into an in-memory [`Table`].
///
/// Rules:
///
/// - CSV must have a header row.
/// - A UTF-8 byte-order mark before the first header is ignored.
/// - Records shorter than the header are padded with empty cells; longer ones are truncated.
/// - Cell values are kept verbatim.
pub fn load_csv_from_path(
    path: impl AsRef<Path>,
    company_column: Option<&str>,
) -> PipelineResult<Table> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| PipelineError::File {
        path: path.to_path_buf(),
        source,
    })?;
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(file);
    load_csv_from_reader(&mut rdr, company_column)
}

/// Load CSV data from an existing CSV reader.
pub fn load_csv_from_reader<R: std::io::Read>(
    rdr: &mut csv::Reader<R>,
    company_column: Option<&str>,
) -> PipelineResult<Table> {
    let columns: Vec<String> = rdr
        .headers()?
        .iter()
        .enumerate()
        .map(|(idx, h)| {
            if idx == 0 {
                h.trim_start_matches(UTF8_BOM).to_string()
            } else {
                h.to_string()
            }
        })
        .collect();

    let header = resolve_header(columns, company_column)?;
    let width = header.len();

    let mut rows: Vec<InputRow> = Vec::new();
    for result in rdr.records() {
        let record = result?;
        rows.push(InputRow::new(
            record.iter().map(str::to_string).collect(),
            width,
        ));
    }

    Ok(Table::new(header, rows))
}
