//! Catalog of aggregation pipelines feeding the dashboard charts.
//!
//! Every pipeline is a pure function of the trip table. Output rows are ordered
//! by group key, null keys are dropped and empty groups never appear.

use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use polars::prelude::*;
use serde::Serialize;
use tracing::debug;

use crate::columns::{
    BOROUGH_PICKUP, DAY, DAY_PERIOD, FARE_AMOUNT, HOUR_PICKUP, MONTH, PASSENGER_COUNT,
    PAYMENT_TYPE, TIP_AMOUNT, TRIP_DISTANCE,
};
use crate::error::{EdaError, Result};
use crate::summary::SummaryTable;
use crate::trip_table::TripTable;

/// Payment label counted by the cash-ratio pipeline.
pub const CASH: &str = "Cash";
pub const RATIO_COLUMN: &str = "ratio";
pub const TRIPS_COLUMN: &str = "trips";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum PipelineId {
    TipByHour,
    DistanceByPickupBorough,
    TipByDay,
    TipByDayPeriod,
    PassengersByMonthAndPeriod,
    CashRatioByPeriod,
    FareAvgByDay,
    FareMaxByDay,
    FareSumByMonth,
    FareAvgByPeriod,
    FareMaxByPaymentType,
    TripsByPassengerCount,
    FareSumByPassengerCount,
    TipAvgByPassengerCount,
    DistanceAvgByPassengerCount,
}

impl PipelineId {
    /// Catalog order; `PIPELINES` is laid out the same way.
    pub const ALL: [PipelineId; 15] = [
        PipelineId::TipByHour,
        PipelineId::DistanceByPickupBorough,
        PipelineId::TipByDay,
        PipelineId::TipByDayPeriod,
        PipelineId::PassengersByMonthAndPeriod,
        PipelineId::CashRatioByPeriod,
        PipelineId::FareAvgByDay,
        PipelineId::FareMaxByDay,
        PipelineId::FareSumByMonth,
        PipelineId::FareAvgByPeriod,
        PipelineId::FareMaxByPaymentType,
        PipelineId::TripsByPassengerCount,
        PipelineId::FareSumByPassengerCount,
        PipelineId::TipAvgByPassengerCount,
        PipelineId::DistanceAvgByPassengerCount,
    ];

    pub fn descriptor(self) -> &'static PipelineDescriptor {
        &PIPELINES[self as usize]
    }

    pub fn code(self) -> &'static str {
        self.descriptor().code
    }
}

impl fmt::Display for PipelineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for PipelineId {
    type Err = EdaError;

    fn from_str(s: &str) -> Result<Self> {
        let code = s.trim();
        all_pipeline_descriptors()
            .iter()
            .find(|d| d.code == code)
            .map(|d| d.id)
            .ok_or_else(|| EdaError::InvalidSelection {
                kind: "pipeline",
                value: code.to_string(),
                allowed: all_pipeline_descriptors().iter().map(|d| d.code).collect(),
            })
    }
}

pub type PipelineFn = fn(&TripTable) -> Result<SummaryTable>;

#[derive(Debug, Clone)]
pub struct PipelineDescriptor {
    pub id: PipelineId,
    pub code: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub run: PipelineFn,
}

static PIPELINES: Lazy<Vec<PipelineDescriptor>> = Lazy::new(|| {
    vec![
        PipelineDescriptor {
            id: PipelineId::TipByHour,
            code: "tip-by-hour",
            title: "Average Tip Amount by Pickup Hour of the Day",
            description: "Mean tip_amount per hour_pickup, rounded to cents",
            run: tip_by_hour,
        },
        PipelineDescriptor {
            id: PipelineId::DistanceByPickupBorough,
            code: "distance-by-pickup-borough",
            title: "Average Trip Distance by Pickup Borough",
            description: "Mean trip_distance per Borough_pickup",
            run: distance_by_pickup_borough,
        },
        PipelineDescriptor {
            id: PipelineId::TipByDay,
            code: "tip-by-day",
            title: "Day of the Week with Highest Average Tip",
            description: "Mean tip_amount per day",
            run: tip_by_day,
        },
        PipelineDescriptor {
            id: PipelineId::TipByDayPeriod,
            code: "tip-by-day-period",
            title: "Part of Day with Highest Average Tip",
            description: "Mean tip_amount per day_period",
            run: tip_by_day_period,
        },
        PipelineDescriptor {
            id: PipelineId::PassengersByMonthAndPeriod,
            code: "passengers-by-month-and-period",
            title: "Total Passengers per Period Each Month",
            description: "Summed passenger_count per month, one series per day_period",
            run: passengers_by_month_and_period,
        },
        PipelineDescriptor {
            id: PipelineId::CashRatioByPeriod,
            code: "cash-ratio-by-period",
            title: "Period with Highest Cash Ratio",
            description: "Share of cash-paid trips per day_period",
            run: cash_ratio_by_period,
        },
        PipelineDescriptor {
            id: PipelineId::FareAvgByDay,
            code: "fare-avg-by-day",
            title: "Average Fare Amount by Day",
            description: "Mean fare_amount per day",
            run: fare_avg_by_day,
        },
        PipelineDescriptor {
            id: PipelineId::FareMaxByDay,
            code: "fare-max-by-day",
            title: "Highest Fare Amount per Day",
            description: "Max fare_amount per day",
            run: fare_max_by_day,
        },
        PipelineDescriptor {
            id: PipelineId::FareSumByMonth,
            code: "fare-sum-by-month",
            title: "Total Fare by Month",
            description: "Summed fare_amount per month",
            run: fare_sum_by_month,
        },
        PipelineDescriptor {
            id: PipelineId::FareAvgByPeriod,
            code: "fare-avg-by-period",
            title: "Highest Average Fare by Period",
            description: "Mean fare_amount per day_period",
            run: fare_avg_by_period,
        },
        PipelineDescriptor {
            id: PipelineId::FareMaxByPaymentType,
            code: "fare-max-by-payment-type",
            title: "Highest Fare Amount per Payment Type",
            description: "Max fare_amount per payment_type",
            run: fare_max_by_payment_type,
        },
        PipelineDescriptor {
            id: PipelineId::TripsByPassengerCount,
            code: "trips-by-passenger-count",
            title: "Total Number of Trips by Passenger Count",
            description: "Trip count per passenger_count",
            run: trips_by_passenger_count,
        },
        PipelineDescriptor {
            id: PipelineId::FareSumByPassengerCount,
            code: "fare-sum-by-passenger-count",
            title: "Total Amount Paid vs Passenger Count",
            description: "Summed fare_amount per passenger_count",
            run: fare_sum_by_passenger_count,
        },
        PipelineDescriptor {
            id: PipelineId::TipAvgByPassengerCount,
            code: "tip-avg-by-passenger-count",
            title: "Trips with More Passengers Tend to Give Higher Tips",
            description: "Mean tip_amount per passenger_count",
            run: tip_avg_by_passenger_count,
        },
        PipelineDescriptor {
            id: PipelineId::DistanceAvgByPassengerCount,
            code: "distance-avg-by-passenger-count",
            title: "Average Trip Distance by Passenger Count",
            description: "Mean trip_distance per passenger_count",
            run: distance_avg_by_passenger_count,
        },
    ]
});

pub fn all_pipeline_descriptors() -> &'static [PipelineDescriptor] {
    PIPELINES.as_slice()
}

pub fn run_pipeline(table: &TripTable, id: PipelineId) -> Result<SummaryTable> {
    let descriptor = id.descriptor();
    let summary = (descriptor.run)(table)?;
    debug!(
        pipeline = descriptor.code,
        input_rows = table.height(),
        output_rows = summary.height(),
        "pipeline finished"
    );
    Ok(summary)
}

#[derive(Debug, Clone, Copy)]
enum Aggregation {
    Mean,
    Sum,
    Max,
}

/// Single-key group-by over one numeric column, keyed ascending.
fn aggregate_by(
    table: &TripTable,
    pipeline: &'static str,
    key: &str,
    value: &str,
    aggregation: Aggregation,
) -> Result<SummaryTable> {
    table.require(pipeline, &[key, value])?;

    let values = col(value).cast(DataType::Float64);
    let aggregated = match aggregation {
        Aggregation::Mean => values.mean(),
        Aggregation::Sum => values.sum(),
        Aggregation::Max => values.max(),
    };

    let frame = table
        .lazy()
        .filter(col(key).is_not_null())
        .group_by([col(key)])
        .agg([aggregated.alias(value)])
        .sort([key], SortMultipleOptions::default())
        .collect()?;

    Ok(SummaryTable::new(
        pipeline,
        vec![key.to_string()],
        vec![value.to_string()],
        frame,
    ))
}

fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

pub fn tip_by_hour(table: &TripTable) -> Result<SummaryTable> {
    let mut summary = aggregate_by(
        table,
        "tip-by-hour",
        HOUR_PICKUP,
        TIP_AMOUNT,
        Aggregation::Mean,
    )?;

    let rounded: Float64Chunked = summary
        .frame
        .column(TIP_AMOUNT)?
        .f64()?
        .into_iter()
        .map(|value| value.map(round_cents))
        .collect();
    summary
        .frame
        .with_column(rounded.with_name(TIP_AMOUNT.into()).into_series())?;

    Ok(summary)
}

pub fn distance_by_pickup_borough(table: &TripTable) -> Result<SummaryTable> {
    aggregate_by(
        table,
        "distance-by-pickup-borough",
        BOROUGH_PICKUP,
        TRIP_DISTANCE,
        Aggregation::Mean,
    )
}

pub fn tip_by_day(table: &TripTable) -> Result<SummaryTable> {
    aggregate_by(table, "tip-by-day", DAY, TIP_AMOUNT, Aggregation::Mean)
}

pub fn tip_by_day_period(table: &TripTable) -> Result<SummaryTable> {
    aggregate_by(
        table,
        "tip-by-day-period",
        DAY_PERIOD,
        TIP_AMOUNT,
        Aggregation::Mean,
    )
}

/// Summed passengers per (month, day_period), widened so every day_period is
/// its own column over month. Missing combinations stay null.
pub fn passengers_by_month_and_period(table: &TripTable) -> Result<SummaryTable> {
    const PIPELINE: &str = "passengers-by-month-and-period";
    table.require(PIPELINE, &[MONTH, DAY_PERIOD, PASSENGER_COUNT])?;

    let long = table
        .lazy()
        .filter(col(MONTH).is_not_null().and(col(DAY_PERIOD).is_not_null()))
        .with_column(col(DAY_PERIOD).cast(DataType::String))
        .group_by([col(MONTH), col(DAY_PERIOD)])
        .agg([col(PASSENGER_COUNT)
            .cast(DataType::Float64)
            .sum()
            .alias(PASSENGER_COUNT)])
        .collect()?;

    let periods = distinct_labels(&long, DAY_PERIOD)?;

    let mut wide = long
        .clone()
        .lazy()
        .group_by([col(MONTH)])
        .agg([]);
    for period in &periods {
        let series = long
            .clone()
            .lazy()
            .filter(col(DAY_PERIOD).eq(lit(period.as_str())))
            .select([col(MONTH), col(PASSENGER_COUNT).alias(period.as_str())]);
        wide = wide.left_join(series, col(MONTH), col(MONTH));
    }

    let frame = wide
        .sort([MONTH], SortMultipleOptions::default())
        .collect()?;

    Ok(SummaryTable::new(
        PIPELINE,
        vec![MONTH.to_string()],
        periods,
        frame,
    ))
}

/// Sorted distinct non-null values of a text column.
fn distinct_labels(df: &DataFrame, column: &str) -> Result<Vec<String>> {
    let labels = df
        .clone()
        .lazy()
        .filter(col(column).is_not_null())
        .group_by([col(column)])
        .agg([])
        .sort([column], SortMultipleOptions::default())
        .collect()?;

    let values = labels.column(column)?.str()?;
    Ok(values.into_iter().flatten().map(str::to_string).collect())
}

/// Cash trips over all trips with a known payment type, per day_period.
///
/// Groups whose denominator is zero are dropped rather than reported as NaN.
pub fn cash_ratio_by_period(table: &TripTable) -> Result<SummaryTable> {
    const PIPELINE: &str = "cash-ratio-by-period";
    table.require(PIPELINE, &[DAY_PERIOD, PAYMENT_TYPE])?;

    let payment = col(PAYMENT_TYPE).cast(DataType::String);
    let frame = table
        .lazy()
        .filter(col(DAY_PERIOD).is_not_null())
        .group_by([col(DAY_PERIOD)])
        .agg([
            payment
                .clone()
                .eq(lit(CASH))
                .sum()
                .cast(DataType::Float64)
                .alias("cash_trips"),
            payment.count().cast(DataType::Float64).alias("paid_trips"),
        ])
        .filter(col("paid_trips").gt(lit(0.0)))
        .select([
            col(DAY_PERIOD),
            (col("cash_trips") / col("paid_trips")).alias(RATIO_COLUMN),
        ])
        .sort([DAY_PERIOD], SortMultipleOptions::default())
        .collect()?;

    Ok(SummaryTable::new(
        PIPELINE,
        vec![DAY_PERIOD.to_string()],
        vec![RATIO_COLUMN.to_string()],
        frame,
    ))
}

pub fn fare_avg_by_day(table: &TripTable) -> Result<SummaryTable> {
    aggregate_by(table, "fare-avg-by-day", DAY, FARE_AMOUNT, Aggregation::Mean)
}

pub fn fare_max_by_day(table: &TripTable) -> Result<SummaryTable> {
    aggregate_by(table, "fare-max-by-day", DAY, FARE_AMOUNT, Aggregation::Max)
}

pub fn fare_sum_by_month(table: &TripTable) -> Result<SummaryTable> {
    aggregate_by(
        table,
        "fare-sum-by-month",
        MONTH,
        FARE_AMOUNT,
        Aggregation::Sum,
    )
}

pub fn fare_avg_by_period(table: &TripTable) -> Result<SummaryTable> {
    aggregate_by(
        table,
        "fare-avg-by-period",
        DAY_PERIOD,
        FARE_AMOUNT,
        Aggregation::Mean,
    )
}

pub fn fare_max_by_payment_type(table: &TripTable) -> Result<SummaryTable> {
    aggregate_by(
        table,
        "fare-max-by-payment-type",
        PAYMENT_TYPE,
        FARE_AMOUNT,
        Aggregation::Max,
    )
}

pub fn trips_by_passenger_count(table: &TripTable) -> Result<SummaryTable> {
    const PIPELINE: &str = "trips-by-passenger-count";
    table.require(PIPELINE, &[PASSENGER_COUNT])?;

    let frame = table
        .lazy()
        .filter(col(PASSENGER_COUNT).is_not_null())
        .group_by([col(PASSENGER_COUNT)])
        .agg([len().cast(DataType::Int64).alias(TRIPS_COLUMN)])
        .sort([PASSENGER_COUNT], SortMultipleOptions::default())
        .collect()?;

    Ok(SummaryTable::new(
        PIPELINE,
        vec![PASSENGER_COUNT.to_string()],
        vec![TRIPS_COLUMN.to_string()],
        frame,
    ))
}

pub fn fare_sum_by_passenger_count(table: &TripTable) -> Result<SummaryTable> {
    aggregate_by(
        table,
        "fare-sum-by-passenger-count",
        PASSENGER_COUNT,
        FARE_AMOUNT,
        Aggregation::Sum,
    )
}

pub fn tip_avg_by_passenger_count(table: &TripTable) -> Result<SummaryTable> {
    aggregate_by(
        table,
        "tip-avg-by-passenger-count",
        PASSENGER_COUNT,
        TIP_AMOUNT,
        Aggregation::Mean,
    )
}

pub fn distance_avg_by_passenger_count(table: &TripTable) -> Result<SummaryTable> {
    aggregate_by(
        table,
        "distance-avg-by-passenger-count",
        PASSENGER_COUNT,
        TRIP_DISTANCE,
        Aggregation::Mean,
    )
}
