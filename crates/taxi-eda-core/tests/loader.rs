use std::path::PathBuf;

use taxi_eda_core::{load_trip_table, parse_trip_table, pipelines, EdaError, LoadOptions};

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("data")
        .join(name)
}

#[test]
fn loads_fixture_without_index_and_sorted_by_pickup() {
    let table = load_trip_table(fixture("trips_sample.csv"), &LoadOptions::default())
        .expect("fixture loads");

    assert_eq!(table.height(), 4);
    let names: Vec<String> = table
        .frame()
        .get_column_names()
        .iter()
        .map(|name| name.to_string())
        .collect();
    assert_eq!(names[0], "VendorID");
    assert_eq!(names.len(), 14);

    let pickups: Vec<&str> = table
        .frame()
        .column("tpep_pickup_datetime")
        .unwrap()
        .str()
        .unwrap()
        .into_no_null_iter()
        .collect();
    assert_eq!(
        pickups,
        [
            "2024-01-01 09:00:00",
            "2024-01-03 08:10:00",
            "2024-01-05 22:15:00",
            "2024-02-02 14:30:00",
        ]
    );
}

#[test]
fn loaded_table_feeds_the_pipelines() {
    let table = load_trip_table(fixture("trips_sample.csv"), &LoadOptions::default()).unwrap();

    let summary = pipelines::fare_sum_by_month(&table).unwrap();
    let totals: Vec<f64> = summary
        .frame
        .column("fare_amount")
        .unwrap()
        .f64()
        .unwrap()
        .into_no_null_iter()
        .collect();
    assert_eq!(totals, [60.0, 15.5]);
}

#[test]
fn index_column_is_kept_when_not_declared() {
    let options = LoadOptions {
        has_index_column: false,
        ..LoadOptions::default()
    };
    let table = load_trip_table(fixture("trips_sample.csv"), &options).unwrap();
    assert_eq!(table.frame().width(), 15);
}

#[test]
fn missing_file_is_a_load_error_naming_the_path() {
    let path = fixture("no_such_export.csv");
    let err = load_trip_table(&path, &LoadOptions::default()).unwrap_err();
    match err {
        EdaError::DatasetLoad { path: reported, .. } => assert_eq!(reported, path),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn export_without_pickup_column_is_a_load_error() {
    let content = b",fare_amount,tip_amount\n0,10.0,1.0\n1,12.0,2.0\n";
    let err = parse_trip_table(content, &LoadOptions::default()).unwrap_err();
    assert!(matches!(
        err,
        EdaError::DatasetLoad { ref reason, .. } if reason.contains("tpep_pickup_datetime")
    ));
}
