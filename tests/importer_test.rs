// ==========================================
// Transport importer integration tests
// ==========================================

mod helpers;

use std::io::Write;
use std::path::PathBuf;

use helpers::api_test_helper::ApiTestEnv;
use helpers::test_data_builder::{date, datetime};
use recycling_planning::domain::TransportType;
use recycling_planning::importer::{ImportError, TransportImporter};
use tempfile::NamedTempFile;

fn write_file(suffix: &str, lines: &[&str]) -> NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(suffix)
        .tempfile()
        .expect("temp file");
    for line in lines {
        writeln!(file, "{}", line).expect("write line");
    }
    file.flush().expect("flush");
    file
}

#[tokio::test]
async fn test_csv_import_keeps_good_rows_and_reports_bad_ones() {
    let env = ApiTestEnv::new().expect("test env");
    env.add_truck("AA-11-AA");
    let stream = env.add_waste_stream("Wood");

    let waste_row = format!(
        "2026-03-03 07:00,Yard,Incinerator,,,{},waste,",
        stream.number
    );
    let file = write_file(
        ".csv",
        &[
            "Pickup_At,Pickup_Location,Delivery_Location,Kenteken,Driver,Waste_Stream,Type,Note",
            "2026-03-02 08:15,LOC-A,LOC-B,aa-11-aa,,,,first",
            "yesterday,LOC-A,LOC-B,,,,,",
            &waste_row,
            "2026-03-04 09:00,LOC-A,LOC-B,ZZ-99-ZZ,,,,",
            "2026-03-05T10:30,,LOC-B,,,,container,",
        ],
    );

    let summary = env
        .state
        .importer
        .import_from_csv(file.path())
        .await
        .expect("import");

    assert_eq!(summary.total, 5);
    assert_eq!(summary.imported, 2);
    assert_eq!(summary.rejected, 3);
    assert_eq!(summary.transport_ids.len(), 2);

    let rejected_rows: Vec<usize> = summary.rejections.iter().map(|r| r.row).collect();
    assert_eq!(rejected_rows, vec![2, 4, 5]);
    assert!(summary.rejections[2].reason.contains("pickup_location"));

    let first = env.reload(&summary.transport_ids[0]);
    assert_eq!(first.pickup_at, datetime(2026, 3, 2, 8, 15));
    assert_eq!(first.truck_plate.as_deref(), Some("AA-11-AA"));
    assert_eq!(first.note.as_deref(), Some("first"));
    assert_eq!(first.transport_type, TransportType::Container);

    let waste = env.reload(&summary.transport_ids[1]);
    assert_eq!(waste.transport_type, TransportType::Waste);
    assert_eq!(waste.waste_stream_number.as_deref(), Some(stream.number.as_str()));

    let listed = env
        .state
        .transport_api
        .list_transports_between(date(2026, 3, 2), date(2026, 3, 8))
        .unwrap();
    assert_eq!(listed.len(), 2);

    let log = env
        .state
        .action_log_repo
        .find_by_action_type("IMPORT_TRANSPORTS")
        .unwrap();
    assert_eq!(log.len(), 1);
    assert_eq!(log[0].actor, "import");
}

#[tokio::test]
async fn test_missing_csv_is_file_error() {
    let env = ApiTestEnv::new().expect("test env");
    let result = env
        .state
        .importer
        .import_from_csv("/nonexistent/transports.csv")
        .await;
    assert!(matches!(result, Err(ImportError::FileNotFound(_))));
}

#[tokio::test]
async fn test_batch_import_isolates_failing_files() {
    let env = ApiTestEnv::new().expect("test env");

    let good = write_file(
        ".csv",
        &[
            "pickup_at,pickup_location,delivery_location",
            "2026-03-02 08:00,LOC-A,LOC-B",
            "2026-03-03,LOC-C,LOC-D",
        ],
    );
    let unsupported = write_file(".txt", &["pickup_at", "2026-03-02 08:00"]);

    let paths: Vec<PathBuf> = vec![
        PathBuf::from("/nonexistent/missing.csv"),
        good.path().to_path_buf(),
        unsupported.path().to_path_buf(),
    ];
    let results = env.state.importer.batch_import(paths).await;

    assert_eq!(results.len(), 3);
    assert!(results[0].is_err());
    assert!(results[2].is_err());

    let summary = results[1].as_ref().expect("good file imported");
    assert_eq!(summary.total, 2);
    assert_eq!(summary.imported, 2);
    assert!(summary.rejections.is_empty());

    let second = env.reload(&summary.transport_ids[1]);
    assert_eq!(second.pickup_at, datetime(2026, 3, 3, 0, 0));
}

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

#[tokio::test]
async fn test_excel_import_reads_date_cells() {
    let env = ApiTestEnv::new().expect("test env");

    let summary = env
        .state
        .importer
        .import_from_excel(fixture("transports.xlsx"))
        .await
        .expect("import");

    assert_eq!(summary.total, 3);
    assert_eq!(summary.imported, 2);
    assert_eq!(summary.rejected, 1);
    assert_eq!(summary.rejections[0].row, 2);
    assert!(summary.rejections[0].reason.contains("pickup_at"));

    let first = env.reload(&summary.transport_ids[0]);
    assert_eq!(first.pickup_at, datetime(2026, 3, 2, 8, 15));
    assert_eq!(first.pickup_location, "Yard");
    assert_eq!(first.note.as_deref(), Some("first"));
    assert_eq!(first.truck_plate, None);

    let second = env.reload(&summary.transport_ids[1]);
    assert_eq!(second.pickup_at, datetime(2026, 3, 3, 7, 0));
    assert_eq!(second.note.as_deref(), Some("42"));
}

#[tokio::test]
async fn test_batch_import_dispatches_excel_files() {
    let env = ApiTestEnv::new().expect("test env");
    let csv = write_file(
        ".csv",
        &[
            "pickup_at,pickup_location,delivery_location",
            "2026-03-04 10:00,LOC-A,LOC-B",
        ],
    );

    let results = env
        .state
        .importer
        .batch_import(vec![fixture("transports.xlsx"), csv.path().to_path_buf()])
        .await;

    assert_eq!(results.len(), 2);
    let excel = results[0].as_ref().expect("excel imported");
    assert_eq!(excel.imported, 2);
    assert_eq!(excel.rejected, 1);
    assert_eq!(results[1].as_ref().expect("csv imported").imported, 1);

    let listed = env
        .state
        .transport_api
        .list_transports_between(date(2026, 3, 2), date(2026, 3, 4))
        .unwrap();
    assert_eq!(listed.len(), 3);
}
