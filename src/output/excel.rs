#![cfg(feature = "excel")]

use std::path::{Path, PathBuf};

use rust_xlsxwriter::{Format, Workbook, Worksheet, XlsxError};

use crate::error::PipelineResult;

const SHEET_NAME: &str = "Enriched";

/// Accumulates rows in a worksheet and saves the workbook on [`Self::finish`].
///
/// The `.xlsx` container cannot be appended to, so nothing is on disk until `finish` runs.
pub struct XlsxSink {
    path: PathBuf,
    sheet: Worksheet,
    next_row: u32,
}

impl XlsxSink {
    /// Start a worksheet with a bold header row.
    pub fn new(path: &Path, columns: &[String]) -> PipelineResult<Self> {
        let mut sheet = Worksheet::new();
        sheet.set_name(SHEET_NAME)?;

        let bold = Format::new().set_bold();
        for (col, name) in columns.iter().enumerate() {
            sheet.write_string_with_format(0, col_num(col)?, name, &bold)?;
        }

        Ok(Self {
            path: path.to_path_buf(),
            sheet,
            next_row: 1,
        })
    }

    /// Write one row of rendered cells; empty cells are left blank.
    pub fn write_row(&mut self, cells: &[String]) -> PipelineResult<()> {
        for (col, value) in cells.iter().enumerate() {
            if !value.is_empty() {
                self.sheet.write_string(self.next_row, col_num(col)?, value)?;
            }
        }
        self.next_row += 1;
        Ok(())
    }

    /// Save the workbook to disk.
    pub fn finish(self) -> PipelineResult<()> {
        let mut workbook = Workbook::new();
        workbook.push_worksheet(self.sheet);
        workbook.save(&self.path)?;
        Ok(())
    }
}

fn col_num(col: usize) -> Result<u16, XlsxError> {
    u16::try_from(col).map_err(|_| XlsxError::RowColumnLimitError)
}
