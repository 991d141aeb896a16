use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use places_enrichment::PipelineError;
use places_enrichment::config::EnrichConfig;
use places_enrichment::ingestion::LoadOptions;
use places_enrichment::pipeline::{
    CancellationToken, PipelineEvent, PipelineObserver, PipelineOptions, enrich_file,
};
use places_enrichment::places::{
    AddressComponent, Candidate, LookupError, PlaceDetails, PlacesClient,
};

fn tmp_file(name: &str, ext: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    std::env::temp_dir().join(format!("places-enrichment-{name}-{nanos}.{ext}"))
}

fn write_input(name: &str, contents: &str) -> PathBuf {
    let path = tmp_file(name, "csv");
    std::fs::write(&path, contents).unwrap();
    path
}

/// Resolves every query to a fully populated place, except queries starting with "Nowhere".
///
/// Optionally cancels `cancel_on.1` once the query `cancel_on.0` has been searched.
#[derive(Default)]
struct StubPlaces {
    searches: Mutex<Vec<String>>,
    cancel_on: Option<(String, CancellationToken)>,
}

impl PlacesClient for StubPlaces {
    fn text_search(&self, query: &str, _region: Option<&str>) -> Result<Vec<Candidate>, LookupError> {
        self.searches.lock().unwrap().push(query.to_string());
        match &self.cancel_on {
            Some((trigger, token)) if query == trigger.as_str() => {
                token.cancel();
            }
            _ => {}
        }
        if query.starts_with("Nowhere") {
            return Ok(Vec::new());
        }
        Ok(vec![Candidate {
            place_id: query.to_string(),
            name: Some(query.to_string()),
            formatted_address: None,
        }])
    }

    fn place_details(&self, place_id: &str) -> Result<PlaceDetails, LookupError> {
        let comp = |name: &str, ty: &str| AddressComponent {
            long_name: name.to_string(),
            types: vec![ty.to_string()],
        };
        Ok(PlaceDetails {
            international_phone_number: Some("+49 30 000".to_string()),
            formatted_phone_number: None,
            website: Some(format!("https://www.{}.example/", place_id.to_lowercase().replace(' ', "-"))),
            address_components: vec![
                comp("1", "street_number"),
                comp("Main St", "route"),
                comp("Berlin", "locality"),
                comp("10115", "postal_code"),
                comp("Germany", "country"),
            ],
        })
    }
}

#[derive(Default)]
struct RecordingObserver {
    events: Mutex<Vec<PipelineEvent>>,
}

impl PipelineObserver for RecordingObserver {
    fn on_event(&self, event: &PipelineEvent) {
        self.events.lock().unwrap().push(event.clone());
    }
}

fn config() -> EnrichConfig {
    let mut config = EnrichConfig::new("test-key");
    config.delay = Duration::ZERO;
    config
}

fn quiet_options() -> PipelineOptions {
    PipelineOptions {
        cancel: CancellationToken::new(),
        observer: None,
    }
}

fn read_csv(path: &Path) -> (Vec<String>, Vec<Vec<String>>) {
    let mut rdr = csv::Reader::from_path(path).unwrap();
    let header = rdr.headers().unwrap().iter().map(str::to_string).collect();
    let rows = rdr
        .records()
        .map(|r| r.unwrap().iter().map(str::to_string).collect())
        .collect();
    (header, rows)
}

#[test]
fn output_keeps_row_order_and_appends_columns() {
    let output = tmp_file("order", "csv");
    let summary = enrich_file(
        "tests/fixtures/companies.csv",
        &output,
        StubPlaces::default(),
        config(),
        &LoadOptions::default(),
        &quiet_options(),
    )
    .unwrap();

    let (header, rows) = read_csv(&output);
    assert_eq!(
        header,
        vec![
            "Company Name", "City", "Country", "Notes", "phone_number", "domain", "street",
            "city", "zip_code", "country", "status",
        ]
    );
    assert_eq!(rows.len(), 4);
    let names: Vec<&str> = rows.iter().map(|r| r[0].as_str()).collect();
    assert_eq!(names, vec!["Tesla", "   ", "Acme Corp", "Nowhere Ltd"]);
    let statuses: Vec<&str> = rows.iter().map(|r| r[10].as_str()).collect();
    assert_eq!(statuses, vec!["OK", "EMPTY_NAME", "OK", "NOT_FOUND"]);
    assert_eq!(rows[0][5], "tesla.example");
    assert_eq!(rows[0][3], "ev maker");

    assert_eq!(summary.rows_total, 4);
    assert_eq!(summary.rows_written, 4);
    assert_eq!((summary.ok, summary.empty_name, summary.not_found), (2, 1, 1));
    assert!(!summary.interrupted);

    let _ = std::fs::remove_file(&output);
}

#[test]
fn cancellation_saves_rows_enriched_so_far() {
    let cancel = CancellationToken::new();
    let client = StubPlaces {
        cancel_on: Some(("Beta".to_string(), cancel.clone())),
        ..StubPlaces::default()
    };
    let input = write_input("cancel-in", "Company\nAlpha\nBeta\nGamma\nDelta\n");
    let output = tmp_file("cancel-out", "csv");
    let options = PipelineOptions {
        cancel,
        observer: None,
    };

    let summary = enrich_file(
        &input,
        &output,
        &client,
        config(),
        &LoadOptions::default(),
        &options,
    )
    .unwrap();

    assert!(summary.interrupted);
    assert_eq!(summary.rows_written, 2);
    assert_eq!(*client.searches.lock().unwrap(), vec!["Alpha", "Beta"]);

    let (_, rows) = read_csv(&output);
    let names: Vec<&str> = rows.iter().map(|r| r[0].as_str()).collect();
    assert_eq!(names, vec!["Alpha", "Beta"]);
    assert!(rows.iter().all(|r| r.last().unwrap() == "OK"));

    let _ = std::fs::remove_file(&input);
    let _ = std::fs::remove_file(&output);
}

#[test]
fn throttle_applies_only_after_lookups() {
    let observer = Arc::new(RecordingObserver::default());
    let options = PipelineOptions {
        cancel: CancellationToken::new(),
        observer: Some(observer.clone()),
    };
    let mut config = config();
    config.delay = Duration::from_millis(1);
    let output = tmp_file("throttle", "csv");

    let summary = enrich_file(
        "tests/fixtures/companies.csv",
        &output,
        StubPlaces::default(),
        config,
        &LoadOptions::default(),
        &options,
    )
    .unwrap();

    let events = observer.events.lock().unwrap();
    let waits = events
        .iter()
        .filter(|e| matches!(e, PipelineEvent::ThrottleWaited { .. }))
        .count();
    let finished_rows = events
        .iter()
        .filter(|e| matches!(e, PipelineEvent::RowFinished { .. }))
        .count();
    assert_eq!(waits, 3);
    assert_eq!(finished_rows, 4);
    assert_eq!(summary.throttle_wait, Duration::from_millis(3));
    assert!(matches!(events.first(), Some(PipelineEvent::RunStarted { rows: 4 })));
    assert!(matches!(events.last(), Some(PipelineEvent::RunFinished { .. })));

    let _ = std::fs::remove_file(&output);
}

#[test]
fn existing_output_columns_are_reused() {
    let input = write_input("rerun-in", "Company,status,Notes\nAcme,OLD,keep\n");
    let output = tmp_file("rerun-out", "csv");

    enrich_file(
        &input,
        &output,
        StubPlaces::default(),
        config(),
        &LoadOptions::default(),
        &quiet_options(),
    )
    .unwrap();

    let (header, rows) = read_csv(&output);
    assert_eq!(
        header,
        vec![
            "Company", "status", "Notes", "phone_number", "domain", "street", "city",
            "zip_code", "country",
        ]
    );
    assert_eq!(rows[0][1], "OK");
    assert_eq!(rows[0][2], "keep");

    let _ = std::fs::remove_file(&input);
    let _ = std::fs::remove_file(&output);
}

#[test]
fn fatal_input_errors_write_nothing_and_make_no_calls() {
    let client = StubPlaces::default();

    let output = tmp_file("bad-schema", "csv");
    let err = enrich_file(
        "tests/fixtures/no_company.csv",
        &output,
        &client,
        config(),
        &LoadOptions::default(),
        &quiet_options(),
    )
    .unwrap_err();
    assert!(matches!(err, PipelineError::Schema { .. }));
    assert!(!output.exists());

    let output = tmp_file("bad-format", "json");
    let err = enrich_file(
        "tests/fixtures/companies.csv",
        &output,
        &client,
        config(),
        &LoadOptions::default(),
        &quiet_options(),
    )
    .unwrap_err();
    assert!(matches!(err, PipelineError::Format { .. }));
    assert!(!output.exists());

    assert!(client.searches.lock().unwrap().is_empty());
}

#[cfg(feature = "excel")]
#[test]
fn xlsx_output_can_be_loaded_back() {
    use places_enrichment::ingestion::load_table;

    let output = tmp_file("xlsx", "xlsx");
    enrich_file(
        "tests/fixtures/companies.csv",
        &output,
        StubPlaces::default(),
        config(),
        &LoadOptions::default(),
        &quiet_options(),
    )
    .unwrap();

    let table = load_table(&output, &LoadOptions::default()).unwrap();
    assert_eq!(table.row_count(), 4);
    let status_idx = table.header.index_of("status").unwrap();
    let zip_idx = table.header.index_of("zip_code").unwrap();
    let statuses: Vec<&str> = table.rows.iter().map(|r| r.get(status_idx)).collect();
    assert_eq!(statuses, vec!["OK", "EMPTY_NAME", "OK", "NOT_FOUND"]);
    assert_eq!(table.rows[0].get(zip_idx), "10115");

    let _ = std::fs::remove_file(&output);
}
