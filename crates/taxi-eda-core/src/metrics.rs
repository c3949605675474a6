use polars::prelude::*;
use serde::Serialize;

use crate::columns::{FARE_AMOUNT, PASSENGER_COUNT};
use crate::error::Result;
use crate::trip_table::TripTable;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum MetricValue {
    Count(u64),
    Currency(f64),
    Quantity(f64),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Metric {
    pub label: &'static str,
    pub value: MetricValue,
}

/// Headline numbers shown above the trip analysis charts.
pub fn trip_metrics(table: &TripTable) -> Result<Vec<Metric>> {
    table.require("trip-metrics", &[FARE_AMOUNT, PASSENGER_COUNT])?;

    let totals = table
        .lazy()
        .select([
            col(FARE_AMOUNT).cast(DataType::Float64).sum().alias(FARE_AMOUNT),
            col(PASSENGER_COUNT)
                .cast(DataType::Float64)
                .sum()
                .alias(PASSENGER_COUNT),
        ])
        .collect()?;

    let revenue = totals.column(FARE_AMOUNT)?.f64()?.get(0).unwrap_or(0.0);
    let passengers = totals.column(PASSENGER_COUNT)?.f64()?.get(0).unwrap_or(0.0);

    Ok(vec![
        Metric {
            label: "Total Trips",
            value: MetricValue::Count(table.height() as u64),
        },
        Metric {
            label: "Total Revenue",
            value: MetricValue::Currency(revenue),
        },
        Metric {
            label: "Total Passengers",
            value: MetricValue::Quantity(passengers),
        },
    ])
}
