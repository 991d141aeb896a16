//! Core data model types for the enrichment pipeline.
//!
//! The loader produces a [`Table`] (a [`Header`] plus ordered [`InputRow`]s). The enricher turns
//! each input row into an [`EnrichedRow`], which the writer lays out using an [`OutputLayout`].

use std::fmt;

/// Names of the enrichment columns, in output order.
pub const ENRICHMENT_COLUMNS: [&str; 6] = [
    "phone_number",
    "domain",
    "street",
    "city",
    "zip_code",
    "country",
];

/// Name of the per-row status column, always written after the enrichment columns.
pub const STATUS_COLUMN: &str = "status";

/// Ordered column names of an input table, with the company-name column resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    /// Column names in source order.
    pub columns: Vec<String>,
    /// Index of the company-name column in [`Self::columns`].
    pub company_idx: usize,
}

impl Header {
    /// Create a header from column names and the resolved company-name column index.
    pub fn new(columns: Vec<String>, company_idx: usize) -> Self {
        Self {
            columns,
            company_idx,
        }
    }

    /// Number of columns.
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Returns `true` if the header has no columns.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Name of the company-name column.
    pub fn company_column(&self) -> &str {
        &self.columns[self.company_idx]
    }

    /// Returns the index of a column by name (case-insensitive, whitespace-trimmed).
    pub fn index_of(&self, name: &str) -> Option<usize> {
        let wanted = name.trim();
        self.columns
            .iter()
            .position(|c| c.trim().eq_ignore_ascii_case(wanted))
    }
}

/// A single source row; values are aligned to the table [`Header`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputRow {
    /// Cell values in header order. Always exactly `header.len()` entries.
    pub values: Vec<String>,
}

impl InputRow {
    /// Create a row, padding or truncating `values` to `width` cells.
    pub fn new(mut values: Vec<String>, width: usize) -> Self {
        values.resize(width, String::new());
        Self { values }
    }

    /// Value at column `idx`, or `""` if out of range.
    pub fn get(&self, idx: usize) -> &str {
        self.values.get(idx).map(String::as_str).unwrap_or("")
    }
}

/// In-memory input table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    /// Column layout of every row.
    pub header: Header,
    /// Rows in source order.
    pub rows: Vec<InputRow>,
}

impl Table {
    /// Create a table from header and rows.
    pub fn new(header: Header, rows: Vec<InputRow>) -> Self {
        Self { header, rows }
    }

    /// Number of data rows (header excluded).
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Company name of `row`, trimmed.
    pub fn company_name<'a>(&self, row: &'a InputRow) -> &'a str {
        row.get(self.header.company_idx).trim()
    }
}

/// The six enrichment fields. Empty strings mean "not resolved".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnrichmentFields {
    pub phone_number: String,
    pub domain: String,
    pub street: String,
    pub city: String,
    pub zip_code: String,
    pub country: String,
}

impl EnrichmentFields {
    /// Field values in [`ENRICHMENT_COLUMNS`] order.
    pub fn as_array(&self) -> [&str; 6] {
        [
            self.phone_number.as_str(),
            self.domain.as_str(),
            self.street.as_str(),
            self.city.as_str(),
            self.zip_code.as_str(),
            self.country.as_str(),
        ]
    }

    /// Number of non-blank fields.
    pub fn filled_count(&self) -> usize {
        self.as_array()
            .iter()
            .filter(|v| !v.trim().is_empty())
            .count()
    }
}

/// Maximum length (in characters) of a rendered status, error detail included.
pub const MAX_STATUS_LEN: usize = 250;

/// Per-row outcome classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Status {
    /// All six enrichment fields were filled.
    Ok,
    /// Some, but not all, fields were filled (or the details call failed).
    Partial,
    /// No candidate matched, or a matched candidate yielded no fields.
    NotFound,
    /// The lookup failed; carries a short description.
    Error(String),
    /// The company name was blank; no lookup was made.
    EmptyName,
}

impl Status {
    /// Status for a matched candidate, from the number of filled enrichment fields.
    pub fn from_filled(filled: usize) -> Self {
        match filled {
            0 => Self::NotFound,
            n if n >= ENRICHMENT_COLUMNS.len() => Self::Ok,
            _ => Self::Partial,
        }
    }

    /// Build an `ERROR:<detail>` status.
    pub fn error(detail: impl fmt::Display) -> Self {
        Self::Error(detail.to_string())
    }

    /// Whether producing this status involved a network call.
    pub fn attempted_lookup(&self) -> bool {
        !matches!(self, Self::EmptyName)
    }

    /// Short label without the error detail (`OK`, `PARTIAL`, `NOT_FOUND`, `ERROR`, `EMPTY_NAME`).
    pub fn label(&self) -> &'static str {
        match self {
            Self::Ok => "OK",
            Self::Partial => "PARTIAL",
            Self::NotFound => "NOT_FOUND",
            Self::Error(_) => "ERROR",
            Self::EmptyName => "EMPTY_NAME",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Error(detail) => {
                let full = format!("ERROR:{detail}");
                let capped: String = full.chars().take(MAX_STATUS_LEN).collect();
                f.write_str(&capped)
            }
            other => f.write_str(other.label()),
        }
    }
}

/// An input row with its enrichment result attached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnrichedRow {
    /// Original cell values, unchanged.
    pub input: InputRow,
    /// Resolved enrichment fields (all empty unless a lookup succeeded).
    pub fields: EnrichmentFields,
    /// Terminal outcome for this row.
    pub status: Status,
}

impl EnrichedRow {
    /// A row with no enrichment fields and the given status.
    pub fn unresolved(input: InputRow, status: Status) -> Self {
        Self {
            input,
            fields: EnrichmentFields::default(),
            status,
        }
    }
}

/// Where each output column takes its value from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    Input(usize),
    Field(usize),
    Status,
}

/// Output column layout: input columns first, then the enrichment columns, then `status`.
///
/// An input column whose name equals one of the output columns is reused in place (it is
/// overwritten with the enrichment value) instead of being duplicated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputLayout {
    columns: Vec<String>,
    slots: Vec<Slot>,
}

impl OutputLayout {
    /// Compute the output layout for an input header.
    pub fn for_header(header: &Header) -> Self {
        let mut columns = header.columns.clone();
        let mut slots: Vec<Slot> = (0..header.len()).map(Slot::Input).collect();

        let appended = ENRICHMENT_COLUMNS
            .iter()
            .enumerate()
            .map(|(i, name)| (*name, Slot::Field(i)))
            .chain(std::iter::once((STATUS_COLUMN, Slot::Status)));

        for (name, slot) in appended {
            match columns.iter().position(|c| c.trim() == name) {
                Some(existing) => slots[existing] = slot,
                None => {
                    columns.push(name.to_string());
                    slots.push(slot);
                }
            }
        }

        Self { columns, slots }
    }

    /// Output column names in order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Render one enriched row into output cell values.
    pub fn render(&self, row: &EnrichedRow) -> Vec<String> {
        let fields = row.fields.as_array();
        self.slots
            .iter()
            .map(|slot| match *slot {
                Slot::Input(i) => row.input.get(i).to_string(),
                Slot::Field(i) => fields[i].to_string(),
                Slot::Status => row.status.to_string(),
            })
            .collect()
    }
}
