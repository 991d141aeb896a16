use std::fmt;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::types::Status;

/// Events emitted by the pipeline runner.
#[derive(Debug, Clone)]
pub enum PipelineEvent {
    RunStarted { rows: usize },
    RowFinished { index: usize, status: Status },
    ThrottleWaited { duration: Duration },
    Interrupted { processed: usize, remaining: usize },
    RunFinished { summary: RunSummary },
}

/// Observer hook for pipeline events.
pub trait PipelineObserver {
    fn on_event(&self, event: &PipelineEvent);
}

/// Logs pipeline events through `tracing`. Per-row outcomes are logged at debug level.
#[derive(Debug, Default)]
pub struct TracingObserver;

impl PipelineObserver for TracingObserver {
    fn on_event(&self, event: &PipelineEvent) {
        match event {
            PipelineEvent::RunStarted { rows } => info!(rows, "enriching companies"),
            PipelineEvent::RowFinished { index, status } => {
                debug!(row = index + 1, status = %status, "row done")
            }
            PipelineEvent::ThrottleWaited { duration } => debug!(?duration, "throttle"),
            PipelineEvent::Interrupted {
                processed,
                remaining,
            } => warn!(processed, remaining, "interrupted, saving rows enriched so far"),
            PipelineEvent::RunFinished { summary } => info!(%summary, "run finished"),
        }
    }
}

/// Outcome counts and timings for one pipeline run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub rows_total: usize,
    pub rows_written: usize,
    pub ok: usize,
    pub partial: usize,
    pub not_found: usize,
    pub errors: usize,
    pub empty_name: usize,
    pub interrupted: bool,
    pub throttle_wait: Duration,
    pub elapsed: Duration,
}

impl RunSummary {
    pub(crate) fn new(rows_total: usize) -> Self {
        Self {
            rows_total,
            ..Self::default()
        }
    }

    pub(crate) fn record(&mut self, status: &Status) {
        let counter = match status {
            Status::Ok => &mut self.ok,
            Status::Partial => &mut self.partial,
            Status::NotFound => &mut self.not_found,
            Status::Error(_) => &mut self.errors,
            Status::EmptyName => &mut self.empty_name,
        };
        *counter += 1;
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "rows={}/{}, ok={}, partial={}, not_found={}, error={}, empty_name={}, interrupted={}, throttle_wait={:?}, elapsed={:?}",
            self.rows_written,
            self.rows_total,
            self.ok,
            self.partial,
            self.not_found,
            self.errors,
            self.empty_name,
            self.interrupted,
            self.throttle_wait,
            self.elapsed
        )
    }
}
