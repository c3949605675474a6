use taxi_eda_core::columns::{CategoricalColumn, NumericColumn, IDENTIFIER_COLUMNS};
use taxi_eda_core::descriptions::{
    describe, describe_or_placeholder, description_table, COLUMN_DESCRIPTIONS,
    COLUMN_NAME_HEADER, DESCRIPTION_HEADER, NO_DESCRIPTION,
};
use taxi_eda_core::EdaError;

#[test]
fn known_columns_are_described() {
    assert_eq!(
        describe("tip_amount").unwrap(),
        "Tip amount provided by the passenger."
    );
    assert!(describe("day_period").unwrap().contains("Part of the day"));
}

#[test]
fn unknown_column_is_an_error_or_a_placeholder() {
    let err = describe("surge_multiplier").unwrap_err();
    assert!(matches!(err, EdaError::UnknownColumn { ref column } if column == "surge_multiplier"));
    assert!(err.is_recoverable());
    assert_eq!(describe_or_placeholder("surge_multiplier"), NO_DESCRIPTION);
}

#[test]
fn every_selectable_column_is_catalogued() {
    for column in NumericColumn::ALL {
        assert!(describe(column.name()).is_ok(), "{column} lacks a description");
    }
    for column in CategoricalColumn::ALL {
        assert!(describe(column.name()).is_ok(), "{column} lacks a description");
    }
    for name in IDENTIFIER_COLUMNS {
        assert!(describe(name).is_ok(), "{name} lacks a description");
    }
}

#[test]
fn description_table_keeps_catalog_order() {
    let table = description_table().unwrap();
    assert_eq!(table.height(), COLUMN_DESCRIPTIONS.len());

    let names = table.column(COLUMN_NAME_HEADER).unwrap().str().unwrap();
    let descriptions = table.column(DESCRIPTION_HEADER).unwrap().str().unwrap();
    assert_eq!(names.get(0), Some("VendorID"));
    assert_eq!(names.get(34), Some("day_period"));
    assert_eq!(descriptions.get(0), Some(COLUMN_DESCRIPTIONS[0].1));
}
