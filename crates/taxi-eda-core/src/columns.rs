//! Column names of the trip table and the closed sets of columns that may be
//! picked for univariate analysis.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use tracing::warn;

use crate::error::{EdaError, Result};

pub const VENDOR_ID: &str = "VendorID";
pub const PICKUP_DATETIME: &str = "tpep_pickup_datetime";
pub const DROPOFF_DATETIME: &str = "tpep_dropoff_datetime";
pub const PASSENGER_COUNT: &str = "passenger_count";
pub const TRIP_DISTANCE: &str = "trip_distance";
pub const RATECODE_ID: &str = "RatecodeID";
pub const STORE_AND_FWD_FLAG: &str = "store_and_fwd_flag";
pub const PU_LOCATION_ID: &str = "PULocationID";
pub const DO_LOCATION_ID: &str = "DOLocationID";
pub const PAYMENT_TYPE: &str = "payment_type";
pub const FARE_AMOUNT: &str = "fare_amount";
pub const EXTRA: &str = "extra";
pub const MTA_TAX: &str = "mta_tax";
pub const TIP_AMOUNT: &str = "tip_amount";
pub const TOLLS_AMOUNT: &str = "tolls_amount";
pub const IMPROVEMENT_SURCHARGE: &str = "improvement_surcharge";
pub const CONGESTION_SURCHARGE: &str = "congestion_surcharge";
pub const AIRPORT_FEE: &str = "Airport_fee";
pub const TOTAL_AMOUNT: &str = "total_amount";
pub const LOCATION_ID_PICKUP: &str = "LocationID_pickup";
pub const BOROUGH_PICKUP: &str = "Borough_pickup";
pub const ZONE_PICKUP: &str = "Zone_pickup";
pub const SERVICE_ZONE_PICKUP: &str = "service_zone_pickup";
pub const LOCATION_ID_DROPOFF: &str = "LocationID_dropoff";
pub const BOROUGH_DROPOFF: &str = "Borough_dropoff";
pub const ZONE_DROPOFF: &str = "Zone_dropoff";
pub const SERVICE_ZONE_DROPOFF: &str = "service_zone_dropoff";
pub const YEAR: &str = "year";
pub const MONTH: &str = "month";
pub const DAY: &str = "day";
pub const HOUR_PICKUP: &str = "hour_pickup";
pub const HOUR_PICKUP_MIN: &str = "hour_pickup_min";
pub const HOUR_DROPOFF: &str = "hour_dropoff";
pub const TRIP_DURATION_MINUTES: &str = "trip_duration_minutes";
pub const DAY_PERIOD: &str = "day_period";

/// Numeric columns that hold categorical codes rather than measurements.
pub const IDENTIFIER_COLUMNS: [&str; 5] = [
    RATECODE_ID,
    PU_LOCATION_ID,
    DO_LOCATION_ID,
    LOCATION_ID_PICKUP,
    LOCATION_ID_DROPOFF,
];

pub const TIMESTAMP_COLUMNS: [&str; 2] = [PICKUP_DATETIME, DROPOFF_DATETIME];

/// Numeric measurement columns eligible for univariate analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum NumericColumn {
    VendorId,
    PassengerCount,
    TripDistance,
    FareAmount,
    Extra,
    MtaTax,
    TipAmount,
    TollsAmount,
    ImprovementSurcharge,
    CongestionSurcharge,
    AirportFee,
    TotalAmount,
    Year,
    Month,
    Day,
    HourPickup,
    HourPickupMin,
    HourDropoff,
    TripDurationMinutes,
}

impl NumericColumn {
    pub const ALL: [NumericColumn; 19] = [
        NumericColumn::VendorId,
        NumericColumn::PassengerCount,
        NumericColumn::TripDistance,
        NumericColumn::FareAmount,
        NumericColumn::Extra,
        NumericColumn::MtaTax,
        NumericColumn::TipAmount,
        NumericColumn::TollsAmount,
        NumericColumn::ImprovementSurcharge,
        NumericColumn::CongestionSurcharge,
        NumericColumn::AirportFee,
        NumericColumn::TotalAmount,
        NumericColumn::Year,
        NumericColumn::Month,
        NumericColumn::Day,
        NumericColumn::HourPickup,
        NumericColumn::HourPickupMin,
        NumericColumn::HourDropoff,
        NumericColumn::TripDurationMinutes,
    ];

    pub fn name(self) -> &'static str {
        match self {
            NumericColumn::VendorId => VENDOR_ID,
            NumericColumn::PassengerCount => PASSENGER_COUNT,
            NumericColumn::TripDistance => TRIP_DISTANCE,
            NumericColumn::FareAmount => FARE_AMOUNT,
            NumericColumn::Extra => EXTRA,
            NumericColumn::MtaTax => MTA_TAX,
            NumericColumn::TipAmount => TIP_AMOUNT,
            NumericColumn::TollsAmount => TOLLS_AMOUNT,
            NumericColumn::ImprovementSurcharge => IMPROVEMENT_SURCHARGE,
            NumericColumn::CongestionSurcharge => CONGESTION_SURCHARGE,
            NumericColumn::AirportFee => AIRPORT_FEE,
            NumericColumn::TotalAmount => TOTAL_AMOUNT,
            NumericColumn::Year => YEAR,
            NumericColumn::Month => MONTH,
            NumericColumn::Day => DAY,
            NumericColumn::HourPickup => HOUR_PICKUP,
            NumericColumn::HourPickupMin => HOUR_PICKUP_MIN,
            NumericColumn::HourDropoff => HOUR_DROPOFF,
            NumericColumn::TripDurationMinutes => TRIP_DURATION_MINUTES,
        }
    }

    pub fn allowed_names() -> Vec<&'static str> {
        Self::ALL.iter().map(|c| c.name()).collect()
    }
}

impl fmt::Display for NumericColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for NumericColumn {
    type Err = EdaError;

    fn from_str(s: &str) -> Result<Self> {
        let name = s.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|c| c.name() == name)
            .ok_or_else(|| EdaError::InvalidSelection {
                kind: if IDENTIFIER_COLUMNS.contains(&name) {
                    "numeric column (identifier codes are not measurements)"
                } else {
                    "numeric column"
                },
                value: name.to_string(),
                allowed: Self::allowed_names(),
            })
    }
}

/// Text-valued columns eligible for univariate analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum CategoricalColumn {
    StoreAndFwdFlag,
    PaymentType,
    BoroughPickup,
    ZonePickup,
    ServiceZonePickup,
    BoroughDropoff,
    ZoneDropoff,
    ServiceZoneDropoff,
    DayPeriod,
}

impl CategoricalColumn {
    pub const ALL: [CategoricalColumn; 9] = [
        CategoricalColumn::StoreAndFwdFlag,
        CategoricalColumn::PaymentType,
        CategoricalColumn::BoroughPickup,
        CategoricalColumn::ZonePickup,
        CategoricalColumn::ServiceZonePickup,
        CategoricalColumn::BoroughDropoff,
        CategoricalColumn::ZoneDropoff,
        CategoricalColumn::ServiceZoneDropoff,
        CategoricalColumn::DayPeriod,
    ];

    pub fn name(self) -> &'static str {
        match self {
            CategoricalColumn::StoreAndFwdFlag => STORE_AND_FWD_FLAG,
            CategoricalColumn::PaymentType => PAYMENT_TYPE,
            CategoricalColumn::BoroughPickup => BOROUGH_PICKUP,
            CategoricalColumn::ZonePickup => ZONE_PICKUP,
            CategoricalColumn::ServiceZonePickup => SERVICE_ZONE_PICKUP,
            CategoricalColumn::BoroughDropoff => BOROUGH_DROPOFF,
            CategoricalColumn::ZoneDropoff => ZONE_DROPOFF,
            CategoricalColumn::ServiceZoneDropoff => SERVICE_ZONE_DROPOFF,
            CategoricalColumn::DayPeriod => DAY_PERIOD,
        }
    }

    pub fn allowed_names() -> Vec<&'static str> {
        Self::ALL.iter().map(|c| c.name()).collect()
    }
}

impl fmt::Display for CategoricalColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CategoricalColumn {
    type Err = EdaError;

    fn from_str(s: &str) -> Result<Self> {
        let name = s.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|c| c.name() == name)
            .ok_or_else(|| EdaError::InvalidSelection {
                kind: if TIMESTAMP_COLUMNS.contains(&name) {
                    "categorical column (raw timestamps are not labels)"
                } else {
                    "categorical column"
                },
                value: name.to_string(),
                allowed: Self::allowed_names(),
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NumericChart {
    #[default]
    Histogram,
    Bar,
}

impl NumericChart {
    pub const ALL: [NumericChart; 2] = [NumericChart::Histogram, NumericChart::Bar];

    pub fn name(self) -> &'static str {
        match self {
            NumericChart::Histogram => "histogram",
            NumericChart::Bar => "bar",
        }
    }
}

impl FromStr for NumericChart {
    type Err = EdaError;

    fn from_str(s: &str) -> Result<Self> {
        let name = s.trim().to_ascii_lowercase();
        Self::ALL
            .iter()
            .copied()
            .find(|c| c.name() == name)
            .ok_or_else(|| EdaError::InvalidSelection {
                kind: "numeric chart",
                value: s.to_string(),
                allowed: Self::ALL.iter().map(|c| c.name()).collect(),
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoricalChart {
    #[default]
    Bar,
    Pie,
}

impl CategoricalChart {
    pub const ALL: [CategoricalChart; 2] = [CategoricalChart::Bar, CategoricalChart::Pie];

    pub fn name(self) -> &'static str {
        match self {
            CategoricalChart::Bar => "bar",
            CategoricalChart::Pie => "pie",
        }
    }
}

impl FromStr for CategoricalChart {
    type Err = EdaError;

    fn from_str(s: &str) -> Result<Self> {
        let name = s.trim().to_ascii_lowercase();
        Self::ALL
            .iter()
            .copied()
            .find(|c| c.name() == name)
            .ok_or_else(|| EdaError::InvalidSelection {
                kind: "categorical chart",
                value: s.to_string(),
                allowed: Self::ALL.iter().map(|c| c.name()).collect(),
            })
    }
}

/// Column and chart choices for the univariate page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct UnivariateSelection {
    pub numeric: NumericColumn,
    pub numeric_chart: NumericChart,
    pub categorical: CategoricalColumn,
    pub categorical_chart: CategoricalChart,
}

impl Default for UnivariateSelection {
    fn default() -> Self {
        Self {
            numeric: NumericColumn::ALL[0],
            numeric_chart: NumericChart::default(),
            categorical: CategoricalColumn::ALL[0],
            categorical_chart: CategoricalChart::default(),
        }
    }
}

impl UnivariateSelection {
    /// Strict parse: any invalid part is an error.
    pub fn parse(
        numeric: Option<&str>,
        numeric_chart: Option<&str>,
        categorical: Option<&str>,
        categorical_chart: Option<&str>,
    ) -> Result<Self> {
        let default = Self::default();
        Ok(Self {
            numeric: numeric
                .map(str::parse::<NumericColumn>)
                .transpose()?
                .unwrap_or(default.numeric),
            numeric_chart: numeric_chart
                .map(str::parse::<NumericChart>)
                .transpose()?
                .unwrap_or(default.numeric_chart),
            categorical: categorical
                .map(str::parse::<CategoricalColumn>)
                .transpose()?
                .unwrap_or(default.categorical),
            categorical_chart: categorical_chart
                .map(str::parse::<CategoricalChart>)
                .transpose()?
                .unwrap_or(default.categorical_chart),
        })
    }

    /// Lenient parse: an invalid part falls back to its default.
    pub fn resolve(
        numeric: Option<&str>,
        numeric_chart: Option<&str>,
        categorical: Option<&str>,
        categorical_chart: Option<&str>,
    ) -> Self {
        let default = Self::default();
        Self {
            numeric: or_default(numeric, default.numeric),
            numeric_chart: or_default(numeric_chart, default.numeric_chart),
            categorical: or_default(categorical, default.categorical),
            categorical_chart: or_default(categorical_chart, default.categorical_chart),
        }
    }
}

fn or_default<T>(raw: Option<&str>, default: T) -> T
where
    T: FromStr<Err = EdaError> + fmt::Debug,
{
    match raw.map(str::parse::<T>) {
        None => default,
        Some(Ok(value)) => value,
        Some(Err(err)) => {
            warn!(error = %err, fallback = ?default, "invalid selection, using default");
            default
        }
    }
}
