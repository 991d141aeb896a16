#![cfg(feature = "excel")]

use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use places_enrichment::PipelineError;
use places_enrichment::ingestion::excel::load_excel_from_path;
use places_enrichment::ingestion::{LoadOptions, SheetSelection, load_table};

fn tmp_file(name: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    std::env::temp_dir().join(format!("places-enrichment-{name}-{nanos}.xlsx"))
}

/// Two sheets: "Other" holds a single unrelated cell, "Leads" holds the company table with its
/// header on the third row, starting in column B.
fn write_leads_workbook(path: &PathBuf) {
    use rust_xlsxwriter::Workbook;

    let mut wb = Workbook::new();

    let other = wb.add_worksheet();
    other.set_name("Other").unwrap();
    other.write_string(0, 0, "x").unwrap();

    let leads = wb.add_worksheet();
    leads.set_name("Leads").unwrap();
    leads.write_string(2, 1, "Company Name").unwrap();
    leads.write_string(2, 2, "Zip").unwrap();
    leads.write_string(2, 3, "Score").unwrap();
    leads.write_string(3, 1, "Tesla").unwrap();
    leads.write_number(3, 2, 10115.0).unwrap();
    leads.write_number(3, 3, 1.5).unwrap();
    leads.write_number(4, 2, 99.0).unwrap();

    wb.save(path).unwrap();
}

fn leads_options() -> LoadOptions {
    LoadOptions {
        sheet: SheetSelection::Sheet("Leads".to_string()),
        ..LoadOptions::default()
    }
}

#[test]
fn named_sheet_uses_first_non_empty_row_as_header() {
    let path = tmp_file("leads");
    write_leads_workbook(&path);

    let table = load_table(&path, &leads_options()).unwrap();

    assert_eq!(table.header.company_column(), "Company Name");
    assert_eq!(table.row_count(), 2);

    let company = table.header.company_idx;
    let zip = table.header.index_of("zip").unwrap();
    let score = table.header.index_of("Score").unwrap();
    assert_eq!(table.rows[0].get(company), "Tesla");
    assert_eq!(table.rows[0].get(zip), "10115");
    assert_eq!(table.rows[0].get(score), "1.5");
    assert_eq!(table.company_name(&table.rows[1]), "");
    assert_eq!(table.rows[1].get(zip), "99");

    let _ = std::fs::remove_file(&path);
}

#[test]
fn default_sheet_without_company_column_names_the_sheet() {
    let path = tmp_file("first-sheet");
    write_leads_workbook(&path);

    let err = load_table(&path, &LoadOptions::default()).unwrap_err();
    match err {
        PipelineError::Schema { message } => {
            assert!(message.starts_with("sheet 'Other':"), "{message}");
            assert!(message.contains("no company name column"), "{message}");
        }
        other => panic!("expected schema error, got {other:?}"),
    }

    let _ = std::fs::remove_file(&path);
}

#[test]
fn explicit_company_column_on_named_sheet() {
    let path = tmp_file("explicit");
    write_leads_workbook(&path);

    let table = load_excel_from_path(&path, Some("Leads"), Some("score")).unwrap();
    assert_eq!(table.header.company_column(), "Score");
    assert_eq!(table.company_name(&table.rows[0]), "1.5");

    let err = load_excel_from_path(&path, Some("Leads"), Some("Firm")).unwrap_err();
    match err {
        PipelineError::Schema { message } => {
            assert!(message.contains("sheet 'Leads'"), "{message}");
            assert!(message.contains("'Firm'"), "{message}");
        }
        other => panic!("expected schema error, got {other:?}"),
    }

    let _ = std::fs::remove_file(&path);
}

#[test]
fn missing_workbook_is_a_file_error() {
    let path = tmp_file("missing");
    let err = load_table(&path, &LoadOptions::default()).unwrap_err();
    assert!(matches!(err, PipelineError::File { .. }), "{err:?}");
    assert!(err.is_input_error());
}
