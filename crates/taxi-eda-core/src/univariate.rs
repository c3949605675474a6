use polars::prelude::*;
use tracing::debug;

use crate::columns::{CategoricalChart, CategoricalColumn, NumericChart, NumericColumn};
use crate::error::Result;
use crate::summary::{ChartKind, ChartSpec, SummaryTable};
use crate::trip_table::TripTable;

pub const ROW_COLUMN: &str = "row";
pub const COUNT_COLUMN: &str = "count";
pub const PROPORTION_COLUMN: &str = "proportion";

const NUMERIC_PIPELINE: &str = "univariate-numeric";
const CATEGORICAL_PIPELINE: &str = "univariate-categorical";

/// Values of one numeric column, shaped for the chosen chart.
///
/// A histogram gets the bare values; a bar chart gets each value against its
/// row position in pickup order.
pub fn univariate_numeric(
    table: &TripTable,
    column: NumericColumn,
    chart: NumericChart,
) -> Result<SummaryTable> {
    let name = column.name();
    table.require(NUMERIC_PIPELINE, &[name])?;

    let values = col(name).cast(DataType::Float64);
    let (keys, frame) = match chart {
        NumericChart::Histogram => (Vec::new(), table.lazy().select([values]).collect()?),
        NumericChart::Bar => (
            vec![ROW_COLUMN.to_string()],
            table
                .lazy()
                .select([values])
                .with_row_index(ROW_COLUMN, None)
                .collect()?,
        ),
    };

    debug!(column = name, chart = chart.name(), rows = frame.height(), "univariate numeric");
    Ok(SummaryTable::new(
        NUMERIC_PIPELINE,
        keys,
        vec![name.to_string()],
        frame,
    ))
}

/// Value counts (bar) or value proportions (pie) of one categorical column.
pub fn univariate_categorical(
    table: &TripTable,
    column: CategoricalColumn,
    chart: CategoricalChart,
) -> Result<SummaryTable> {
    let name = column.name();
    table.require(CATEGORICAL_PIPELINE, &[name])?;

    let counts = table
        .lazy()
        .filter(col(name).is_not_null())
        .group_by([col(name)])
        .agg([len().cast(DataType::Int64).alias(COUNT_COLUMN)])
        .sort([name], SortMultipleOptions::default());

    let (value, frame) = match chart {
        CategoricalChart::Bar => (COUNT_COLUMN, counts.collect()?),
        CategoricalChart::Pie => {
            let share = col(COUNT_COLUMN).cast(DataType::Float64)
                / col(COUNT_COLUMN).sum().cast(DataType::Float64);
            (
                PROPORTION_COLUMN,
                counts
                    .select([col(name), share.alias(PROPORTION_COLUMN)])
                    .collect()?,
            )
        }
    };

    debug!(column = name, chart = chart.name(), groups = frame.height(), "univariate categorical");
    Ok(SummaryTable::new(
        CATEGORICAL_PIPELINE,
        vec![name.to_string()],
        vec![value.to_string()],
        frame,
    ))
}

pub fn numeric_chart_spec(
    table: &TripTable,
    column: NumericColumn,
    chart: NumericChart,
) -> Result<ChartSpec> {
    let kind = match chart {
        NumericChart::Histogram => ChartKind::Histogram,
        NumericChart::Bar => ChartKind::Bar,
    };
    Ok(ChartSpec {
        title: column.name().to_string(),
        kind,
        summary: univariate_numeric(table, column, chart)?,
    })
}

pub fn categorical_chart_spec(
    table: &TripTable,
    column: CategoricalColumn,
    chart: CategoricalChart,
) -> Result<ChartSpec> {
    let kind = match chart {
        CategoricalChart::Bar => ChartKind::Bar,
        CategoricalChart::Pie => ChartKind::Pie,
    };
    Ok(ChartSpec {
        title: column.name().to_string(),
        kind,
        summary: univariate_categorical(table, column, chart)?,
    })
}
