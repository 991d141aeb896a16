//! `places-enrichment` enriches a table of company names (CSV or Excel) with phone, website
//! domain and postal address data from the Google Places API, adding a per-row status.
//!
//! The primary entrypoint is [`pipeline::enrich_file`], which runs the three stages in order:
//!
//! 1. **Load** ([`ingestion::load_table`]): detect the format by extension, resolve the
//!    company-name column, read every row.
//! 2. **Enrich** ([`enrich::Enricher`]): one text search per row, one details call for the top
//!    candidate, map the result onto six columns and classify the row.
//! 3. **Write** ([`output::TableWriter`]): append rows as they are produced, in input order.
//!
//! ## Output columns
//!
//! Input columns come first, unchanged, followed by `phone_number`, `domain`, `street`, `city`,
//! `zip_code`, `country` and `status`.
//!
//! ## Row status
//!
//! - `OK`: all six enrichment fields were filled
//! - `PARTIAL`: one to five fields were filled, or the details call failed
//! - `NOT_FOUND`: no candidate, or a candidate with nothing usable
//! - `ERROR:<detail>`: the text search failed (network, HTTP status, API status, bad payload)
//! - `EMPTY_NAME`: blank company name; no request was made
//!
//! Lookup failures never abort a batch. Only input problems ([`PipelineError::File`],
//! [`PipelineError::Format`], [`PipelineError::Schema`]) and output write failures do.
//!
//! ## Example
//!
//! ```no_run
//! use places_enrichment::config::EnrichConfig;
//! use places_enrichment::ingestion::LoadOptions;
//! use places_enrichment::pipeline::{enrich_file, PipelineOptions};
//! use places_enrichment::places::GooglePlacesClient;
//!
//! # fn main() -> Result<(), places_enrichment::PipelineError> {
//! let mut config = EnrichConfig::new("my-api-key");
//! config.region = Some("de".to_string());
//! config.context_columns = vec!["City".to_string(), "Country".to_string()];
//!
//! let client = GooglePlacesClient::new(config.api_key.clone());
//! let summary = enrich_file(
//!     "companies.csv",
//!     "companies_enriched.xlsx",
//!     client,
//!     config,
//!     &LoadOptions::default(),
//!     &PipelineOptions::default(),
//! )?;
//! println!("{summary}");
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - [`ingestion`]: table loading (CSV, and workbooks behind the `excel` feature)
//! - [`enrich`]: per-row enrichment and status policy
//! - [`places`]: the places client seam and the Google implementation
//! - [`output`]: incremental CSV/XLSX writers
//! - [`pipeline`]: the row loop, throttling, cancellation and run summaries
//! - [`types`]: table and row types
//! - [`config`]: run configuration
//! - [`error`]: error types

pub mod config;
pub mod enrich;
pub mod error;
pub mod ingestion;
pub mod output;
pub mod pipeline;
pub mod places;
pub mod types;

pub use error::{PipelineError, PipelineResult};
