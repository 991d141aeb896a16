//! Loading input tables.
//!
//! Most callers should use [`load_table`] (from [`unified`]) which:
//!
//! - detects the format from the file extension
//! - resolves the company-name column from a fixed alias list (or an explicit override)
//! - reads every row into an in-memory [`crate::types::Table`], preserving column and row order
//!
//! Format-specific functions are also available under:
//! - [`csv`]
//! - `excel` (Cargo feature `excel`)

pub mod csv;
#[cfg(feature = "excel")]
pub mod excel;
pub mod unified;

pub use unified::{
    COMPANY_COLUMN_ALIASES, LoadOptions, SheetSelection, TableFormat, load_table, resolve_header,
};
