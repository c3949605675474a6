use polars::prelude::*;

use crate::columns::PICKUP_DATETIME;
use crate::error::{EdaError, Result};

/// The loaded trip dataset, ordered by pickup time.
///
/// Built once per session and only ever read afterwards; every pipeline takes
/// it by shared reference.
#[derive(Debug, Clone)]
pub struct TripTable {
    df: DataFrame,
}

impl TripTable {
    /// Wraps a raw frame, sorting it by pickup timestamp (stable, ascending).
    pub fn new(df: DataFrame) -> Result<Self> {
        if df.column(PICKUP_DATETIME).is_err() {
            return Err(EdaError::MissingColumn {
                pipeline: "trip_table",
                column: PICKUP_DATETIME.to_string(),
            });
        }

        let df = df
            .lazy()
            .sort(
                [PICKUP_DATETIME],
                SortMultipleOptions::default().with_maintain_order(true),
            )
            .collect()?;

        Ok(Self { df })
    }

    pub fn frame(&self) -> &DataFrame {
        &self.df
    }

    pub fn height(&self) -> usize {
        self.df.height()
    }

    pub fn lazy(&self) -> LazyFrame {
        self.df.clone().lazy()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.df.column(name).is_ok()
    }

    /// Fails with the first of `columns` that the table lacks.
    pub fn require(&self, pipeline: &'static str, columns: &[&str]) -> Result<()> {
        match columns.iter().find(|name| !self.has_column(name)) {
            Some(missing) => Err(EdaError::MissingColumn {
                pipeline,
                column: missing.to_string(),
            }),
            None => Ok(()),
        }
    }

    /// First `rows` trips, for the dataset overview.
    pub fn preview(&self, rows: usize) -> DataFrame {
        self.df.head(Some(rows))
    }
}
