//! Pipeline runner: Loader → sequential Enricher loop → Writer.
//!
//! This module sits "above" [`crate::ingestion`], [`crate::enrich`] and [`crate::output`] and
//! provides:
//!
//! - the per-row loop, checking a [`CancellationToken`] before each row
//! - throttling (a fixed pause after every row that made a network call)
//! - a guaranteed writer flush on every exit path, cancellation included
//! - run summaries + observer hooks for monitoring

mod cancel;
mod observer;

use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use crate::config::EnrichConfig;
use crate::enrich::Enricher;
use crate::error::PipelineResult;
use crate::ingestion::{LoadOptions, load_table};
use crate::output::{OutputFormat, TableWriter};
use crate::places::PlacesClient;
use crate::types::{OutputLayout, Table};

pub use cancel::CancellationToken;
pub use observer::{PipelineEvent, PipelineObserver, RunSummary, TracingObserver};

/// Options for [`run_pipeline`] and [`enrich_file`].
#[derive(Clone)]
pub struct PipelineOptions {
    /// Checked before each row; once set, no further rows are enriched.
    pub cancel: CancellationToken,
    /// Receives run/row/throttle events. `None` disables reporting.
    pub observer: Option<Arc<dyn PipelineObserver>>,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            cancel: CancellationToken::new(),
            observer: Some(Arc::new(TracingObserver)),
        }
    }
}

impl std::fmt::Debug for PipelineOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PipelineOptions")
            .field("cancelled", &self.cancel.is_cancelled())
            .field("observer_set", &self.observer.is_some())
            .finish()
    }
}

impl PipelineOptions {
    fn emit(&self, event: PipelineEvent) {
        if let Some(obs) = self.observer.as_ref() {
            obs.on_event(&event);
        }
    }
}

/// Enrich every row of `table` in order and append it to `writer`.
///
/// The writer is finished (flushed to disk) on every path, including cancellation and a failed
/// append. Rows that were not reached before cancellation are not written.
pub fn run_pipeline<C: PlacesClient>(
    table: Table,
    enricher: &Enricher<C>,
    mut writer: TableWriter,
    options: &PipelineOptions,
) -> PipelineResult<RunSummary> {
    let start = Instant::now();
    let total = table.row_count();
    let delay = enricher.config().delay;
    let mut summary = RunSummary::new(total);
    options.emit(PipelineEvent::RunStarted { rows: total });

    let mut append_result = Ok(());
    for (index, row) in table.rows.into_iter().enumerate() {
        if options.cancel.is_cancelled() {
            summary.interrupted = true;
            options.emit(PipelineEvent::Interrupted {
                processed: index,
                remaining: total - index,
            });
            break;
        }

        let enriched = enricher.enrich(row);
        summary.record(&enriched.status);
        options.emit(PipelineEvent::RowFinished {
            index,
            status: enriched.status.clone(),
        });

        if let Err(e) = writer.append(&enriched) {
            append_result = Err(e);
            break;
        }

        if enriched.status.attempted_lookup() && !delay.is_zero() {
            std::thread::sleep(delay);
            summary.throttle_wait += delay;
            options.emit(PipelineEvent::ThrottleWaited { duration: delay });
        }
    }

    let finished = writer.finish();
    append_result?;
    summary.rows_written = finished?;
    summary.elapsed = start.elapsed();

    options.emit(PipelineEvent::RunFinished {
        summary: summary.clone(),
    });
    Ok(summary)
}

/// Load `input`, enrich every row through `client`, and write the result to `output`.
///
/// Input and output formats are validated before any lookup is made; those failures are
/// returned as [`crate::PipelineError::Format`], [`crate::PipelineError::File`] or
/// [`crate::PipelineError::Schema`] and nothing is written.
pub fn enrich_file<C: PlacesClient>(
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
    client: C,
    config: EnrichConfig,
    load_options: &LoadOptions,
    options: &PipelineOptions,
) -> PipelineResult<RunSummary> {
    let output = output.as_ref();
    OutputFormat::from_path(output)?;

    let table = load_table(input, load_options)?;
    let enricher = Enricher::new(client, config, &table.header);
    let writer = TableWriter::create(output, OutputLayout::for_header(&table.header))?;

    run_pipeline(table, &enricher, writer, options)
}
