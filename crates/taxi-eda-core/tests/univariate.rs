use polars::prelude::*;
use taxi_eda_core::columns::{
    CategoricalChart, CategoricalColumn, NumericChart, NumericColumn, UnivariateSelection,
};
use taxi_eda_core::univariate::{
    categorical_chart_spec, univariate_categorical, univariate_numeric, COUNT_COLUMN,
    PROPORTION_COLUMN, ROW_COLUMN,
};
use taxi_eda_core::{ChartKind, EdaError, TripTable};

fn trips() -> TripTable {
    let df = df!(
        "tpep_pickup_datetime" => &[
            "2024-01-02 10:00:00",
            "2024-01-01 10:00:00",
            "2024-01-03 10:00:00",
            "2024-01-04 10:00:00",
        ],
        "fare_amount" => &[12.0f64, 7.5, 30.0, 9.0],
        "payment_type" => &["Cash", "Credit card", "Cash", "Cash"],
    )
    .unwrap();
    TripTable::new(df).unwrap()
}

#[test]
fn identifier_columns_are_not_numeric_selections() {
    for name in ["RatecodeID", "PULocationID", "DOLocationID", "LocationID_pickup", "LocationID_dropoff"] {
        let err = name.parse::<NumericColumn>().unwrap_err();
        assert!(
            matches!(err, EdaError::InvalidSelection { ref value, .. } if value == name),
            "{name} should be rejected, got {err:?}"
        );
    }
}

#[test]
fn timestamp_columns_are_not_categorical_selections() {
    for name in ["tpep_pickup_datetime", "tpep_dropoff_datetime"] {
        assert!(matches!(
            name.parse::<CategoricalColumn>(),
            Err(EdaError::InvalidSelection { .. })
        ));
    }
}

#[test]
fn unknown_and_cross_kind_selections_are_rejected() {
    assert!("not_a_column".parse::<NumericColumn>().is_err());
    assert!("day_period".parse::<NumericColumn>().is_err());
    assert!("fare_amount".parse::<CategoricalColumn>().is_err());
    assert!("scatter".parse::<NumericChart>().is_err());
    assert!("histogram".parse::<CategoricalChart>().is_err());

    assert_eq!("Bar".parse::<NumericChart>().unwrap(), NumericChart::Bar);
    assert_eq!("Pie".parse::<CategoricalChart>().unwrap(), CategoricalChart::Pie);
    assert_eq!(
        "fare_amount".parse::<NumericColumn>().unwrap(),
        NumericColumn::FareAmount
    );
}

#[test]
fn lenient_selection_falls_back_per_field() {
    let selection = UnivariateSelection::resolve(
        Some("PULocationID"),
        Some("bar"),
        Some("day_period"),
        Some("donut"),
    );

    let default = UnivariateSelection::default();
    assert_eq!(selection.numeric, default.numeric);
    assert_eq!(selection.numeric_chart, NumericChart::Bar);
    assert_eq!(selection.categorical, CategoricalColumn::DayPeriod);
    assert_eq!(selection.categorical_chart, default.categorical_chart);

    assert!(UnivariateSelection::parse(Some("PULocationID"), None, None, None).is_err());
}

#[test]
fn numeric_histogram_keeps_values_in_pickup_order() {
    let summary = univariate_numeric(&trips(), NumericColumn::FareAmount, NumericChart::Histogram)
        .unwrap();

    assert!(summary.keys.is_empty());
    let values: Vec<f64> = summary
        .frame
        .column("fare_amount")
        .unwrap()
        .f64()
        .unwrap()
        .into_no_null_iter()
        .collect();
    assert_eq!(values, [7.5, 12.0, 30.0, 9.0]);
}

#[test]
fn numeric_bar_pairs_values_with_row_position() {
    let summary =
        univariate_numeric(&trips(), NumericColumn::FareAmount, NumericChart::Bar).unwrap();

    assert_eq!(summary.keys, [ROW_COLUMN]);
    assert_eq!(summary.height(), 4);
    let rows = summary.frame.column(ROW_COLUMN).unwrap();
    assert_eq!(rows.get(0).unwrap().extract::<u64>(), Some(0));
    assert_eq!(rows.get(3).unwrap().extract::<u64>(), Some(3));
}

#[test]
fn categorical_counts_and_proportions() {
    let table = trips();

    let counts =
        univariate_categorical(&table, CategoricalColumn::PaymentType, CategoricalChart::Bar)
            .unwrap();
    let counted: Vec<i64> = counts
        .frame
        .column(COUNT_COLUMN)
        .unwrap()
        .i64()
        .unwrap()
        .into_no_null_iter()
        .collect();
    assert_eq!(counted, [3, 1]);

    let shares =
        univariate_categorical(&table, CategoricalColumn::PaymentType, CategoricalChart::Pie)
            .unwrap();
    let proportions: Vec<f64> = shares
        .frame
        .column(PROPORTION_COLUMN)
        .unwrap()
        .f64()
        .unwrap()
        .into_no_null_iter()
        .collect();
    assert_eq!(proportions, [0.75, 0.25]);
    assert!((proportions.iter().sum::<f64>() - 1.0).abs() < 1e-12);
}

#[test]
fn chart_spec_uses_column_as_title() {
    let spec = categorical_chart_spec(
        &trips(),
        CategoricalColumn::PaymentType,
        CategoricalChart::Pie,
    )
    .unwrap();
    assert_eq!(spec.title, "payment_type");
    assert_eq!(spec.kind, ChartKind::Pie);
}

#[test]
fn selecting_an_absent_column_reports_missing_column() {
    let err = univariate_categorical(&trips(), CategoricalColumn::DayPeriod, CategoricalChart::Bar)
        .unwrap_err();
    assert!(matches!(err, EdaError::MissingColumn { ref column, .. } if column == "day_period"));
}
