use std::collections::HashMap;

use once_cell::sync::Lazy;
use polars::prelude::{DataFrame, NamedFrom, Series};

use crate::columns::*;
use crate::error::{EdaError, Result};

pub const NO_DESCRIPTION: &str = "no description available";
pub const COLUMN_NAME_HEADER: &str = "Column Name";
pub const DESCRIPTION_HEADER: &str = "Description";

/// Display order matches the dataset's column order.
pub const COLUMN_DESCRIPTIONS: [(&str, &str); 35] = [
    (VENDOR_ID, "Code indicating the taxi provider or vendor for the trip."),
    (PICKUP_DATETIME, "Timestamp when the passenger was picked up."),
    (DROPOFF_DATETIME, "Timestamp when the passenger was dropped off."),
    (PASSENGER_COUNT, "Number of passengers in the taxi during the trip."),
    (TRIP_DISTANCE, "Distance traveled during the trip (in miles)."),
    (RATECODE_ID, "Identifier for the rate type used for the trip fare."),
    (
        STORE_AND_FWD_FLAG,
        "Flag indicating whether the trip record was stored and forwarded due to no network connection.",
    ),
    (PU_LOCATION_ID, "Pickup location ID as defined in the NYC taxi zones."),
    (DO_LOCATION_ID, "Dropoff location ID as defined in the NYC taxi zones."),
    (
        PAYMENT_TYPE,
        "Numeric code indicating the passenger's payment method (e.g., card, cash).",
    ),
    (FARE_AMOUNT, "Base fare charged for the trip before additional fees."),
    (EXTRA, "Additional miscellaneous charges (e.g., surcharge, booking fees)."),
    (MTA_TAX, "Mandatory $0.50 tax charged for all TPEP trips."),
    (TIP_AMOUNT, "Tip amount provided by the passenger."),
    (TOLLS_AMOUNT, "Total tolls charged during the trip."),
    (
        IMPROVEMENT_SURCHARGE,
        "Standard $0.30 improvement surcharge added to trips.",
    ),
    (
        CONGESTION_SURCHARGE,
        "Additional fee applied for congestion zones, if applicable.",
    ),
    (AIRPORT_FEE, "Fee applied when trips originate from or end at airports."),
    (
        TOTAL_AMOUNT,
        "Total amount charged to the passenger including all fees.",
    ),
    (LOCATION_ID_PICKUP, "Mapped pickup zone location ID."),
    (BOROUGH_PICKUP, "Borough corresponding to the pickup location."),
    (ZONE_PICKUP, "Specific zone name for the pickup location."),
    (
        SERVICE_ZONE_PICKUP,
        "Service zone (e.g., Yellow Zone, Green Zone) for the pickup.",
    ),
    (LOCATION_ID_DROPOFF, "Mapped dropoff zone location ID."),
    (BOROUGH_DROPOFF, "Borough corresponding to the dropoff location."),
    (ZONE_DROPOFF, "Specific zone name for the dropoff location."),
    (
        SERVICE_ZONE_DROPOFF,
        "Service zone (e.g., Yellow Zone, Green Zone) for the dropoff.",
    ),
    (YEAR, "Year extracted from the pickup timestamp."),
    (MONTH, "Month extracted from the pickup timestamp."),
    (DAY, "Day of the month extracted from the pickup timestamp."),
    (
        HOUR_PICKUP,
        "Hour of the day when the pickup occurred (24-hour format).",
    ),
    (HOUR_PICKUP_MIN, "Minute component of the pickup timestamp."),
    (
        HOUR_DROPOFF,
        "Hour of the day when the dropoff occurred (24-hour format).",
    ),
    (TRIP_DURATION_MINUTES, "Total trip duration measured in minutes."),
    (
        DAY_PERIOD,
        "Part of the day when the trip occurred (morning, afternoon, night, etc).",
    ),
];

static BY_NAME: Lazy<HashMap<&'static str, &'static str>> =
    Lazy::new(|| COLUMN_DESCRIPTIONS.iter().copied().collect());

pub fn describe(column: &str) -> Result<&'static str> {
    BY_NAME
        .get(column)
        .copied()
        .ok_or_else(|| EdaError::UnknownColumn {
            column: column.to_string(),
        })
}

pub fn describe_or_placeholder(column: &str) -> &'static str {
    describe(column).unwrap_or(NO_DESCRIPTION)
}

/// The whole catalog as a two-column table, in catalog order.
pub fn description_table() -> Result<DataFrame> {
    let (names, descriptions): (Vec<&str>, Vec<&str>) = COLUMN_DESCRIPTIONS.iter().copied().unzip();
    let df = DataFrame::new(vec![
        Series::new(COLUMN_NAME_HEADER.into(), names).into(),
        Series::new(DESCRIPTION_HEADER.into(), descriptions).into(),
    ])?;
    Ok(df)
}
