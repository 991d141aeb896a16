//! `places-enrich`: bulk-enrich a company list with Google Places contact data.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result, anyhow, bail};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use places_enrichment::config::{API_KEY_ENV, EnrichConfig};
use places_enrichment::ingestion::{LoadOptions, SheetSelection};
use places_enrichment::pipeline::{
    CancellationToken, PipelineEvent, PipelineObserver, PipelineOptions, TracingObserver,
    enrich_file,
};
use places_enrichment::places::GooglePlacesClient;

/// Exit code used when a second Ctrl-C forces the process down (128 + SIGINT).
const FORCED_EXIT_CODE: i32 = 130;

#[derive(Parser, Debug)]
#[command(
    name = "places-enrich",
    version,
    about = "Bulk enrich a company list with Google Places contact data",
    after_help = "Examples:\n  places-enrich --input companies.csv --output enriched.csv --region de\n  places-enrich --input leads.xlsx --output leads_enriched.xlsx --context City,Country --sleep 0.2"
)]
struct Cli {
    /// Input table (.csv, .xlsx, .xls, .xlsm, .xlsb, .ods)
    #[arg(long, value_name = "PATH")]
    input: PathBuf,

    /// Output table (.csv or .xlsx)
    #[arg(long, value_name = "PATH")]
    output: PathBuf,

    /// Google Places API key
    #[arg(long, env = API_KEY_ENV, hide_env_values = true)]
    api_key: Option<String>,

    /// Two-letter region bias, e.g. 'de' or 'us'
    #[arg(long, value_name = "CODE")]
    region: Option<String>,

    /// Comma-separated extra columns added to the search query (e.g. 'City,Country')
    #[arg(long, value_name = "COLUMNS")]
    context: Option<String>,

    /// Delay between rows that hit the API, in seconds
    #[arg(long, value_name = "SECONDS", default_value_t = 0.1)]
    sleep: f64,

    /// Workbook sheet to read (defaults to the first sheet)
    #[arg(long, value_name = "NAME")]
    sheet: Option<String>,

    /// Company-name column, overriding header alias detection
    #[arg(long, value_name = "NAME")]
    company_column: Option<String>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn enrich_config(&self) -> Result<EnrichConfig> {
        let api_key = self
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .ok_or_else(|| anyhow!("provide an API key via --api-key or ${API_KEY_ENV}"))?;

        let delay = Duration::try_from_secs_f64(self.sleep)
            .with_context(|| format!("invalid --sleep value {}", self.sleep))?;

        let mut config = EnrichConfig::new(api_key);
        config.region = self
            .region
            .as_deref()
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .map(str::to_ascii_lowercase);
        config.context_columns = self
            .context
            .as_deref()
            .map(EnrichConfig::parse_context_list)
            .unwrap_or_default();
        config.delay = delay;
        Ok(config)
    }

    fn load_options(&self) -> LoadOptions {
        LoadOptions {
            company_column: self.company_column.clone(),
            sheet: self
                .sheet
                .clone()
                .map(SheetSelection::Sheet)
                .unwrap_or_default(),
        }
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Progress bar over the input rows; every event is also forwarded to the log.
struct ProgressObserver {
    bar: ProgressBar,
    log: TracingObserver,
}

impl ProgressObserver {
    fn new() -> Self {
        let bar = ProgressBar::new(0);
        if let Ok(style) = ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos:>4}/{len:4} {msg}")
        {
            bar.set_style(style.progress_chars("##-"));
        }
        Self {
            bar,
            log: TracingObserver,
        }
    }
}

impl PipelineObserver for ProgressObserver {
    fn on_event(&self, event: &PipelineEvent) {
        match event {
            PipelineEvent::RunStarted { rows } => self.bar.set_length(*rows as u64),
            PipelineEvent::RowFinished { status, .. } => {
                self.bar.inc(1);
                self.bar.set_message(status.label());
            }
            PipelineEvent::Interrupted { .. } => self.bar.abandon_with_message("interrupted"),
            PipelineEvent::RunFinished { .. } => self.bar.finish_and_clear(),
            PipelineEvent::ThrottleWaited { .. } => {}
        }
        self.bar.suspend(|| self.log.on_event(event));
    }
}

fn install_interrupt_handler(cancel: CancellationToken) {
    let result = ctrlc::set_handler(move || {
        if cancel.cancel() {
            eprintln!("Interrupted again, exiting without saving.");
            std::process::exit(FORCED_EXIT_CODE);
        }
        eprintln!("Interrupt received, finishing the current row and saving output...");
    });
    if let Err(e) = result {
        warn!(error = %e, "failed to install Ctrl-C handler; interrupts will not save output");
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = cli.enrich_config()?;
    let load_options = cli.load_options();
    info!(?config, input = %cli.input.display(), output = %cli.output.display(), "starting");

    let cancel = CancellationToken::new();
    install_interrupt_handler(cancel.clone());

    let options = PipelineOptions {
        cancel,
        observer: Some(Arc::new(ProgressObserver::new())),
    };
    let client = GooglePlacesClient::new(config.api_key.clone());

    let summary = match enrich_file(&cli.input, &cli.output, client, config, &load_options, &options)
    {
        Ok(summary) => summary,
        Err(e) if e.is_input_error() => bail!("input rejected: {e}"),
        Err(e) => return Err(e).context("enrichment run failed"),
    };

    if summary.interrupted {
        warn!(
            rows = summary.rows_written,
            output = %cli.output.display(),
            "interrupted by user, partial output saved"
        );
    } else {
        info!(output = %cli.output.display(), "done");
    }
    Ok(())
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli) {
        error!("{e:#}");
        std::process::exit(1);
    }
}
