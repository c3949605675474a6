use polars::prelude::DataFrame;
use serde::Serialize;

/// How the renderer should draw a summary table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    Bar,
    /// One bar series per value column, sharing the key axis.
    GroupedBar,
    Line,
    Histogram,
    Pie,
}

impl ChartKind {
    pub fn name(self) -> &'static str {
        match self {
            ChartKind::Bar => "bar",
            ChartKind::GroupedBar => "grouped_bar",
            ChartKind::Line => "line",
            ChartKind::Histogram => "histogram",
            ChartKind::Pie => "pie",
        }
    }
}

/// Output of one pipeline: key columns followed by aggregated value columns.
#[derive(Debug, Clone)]
pub struct SummaryTable {
    pub pipeline: &'static str,
    pub keys: Vec<String>,
    pub values: Vec<String>,
    pub frame: DataFrame,
}

impl SummaryTable {
    pub fn new(
        pipeline: &'static str,
        keys: Vec<String>,
        values: Vec<String>,
        frame: DataFrame,
    ) -> Self {
        Self {
            pipeline,
            keys,
            values,
            frame,
        }
    }

    pub fn height(&self) -> usize {
        self.frame.height()
    }

    pub fn is_empty(&self) -> bool {
        self.frame.height() == 0
    }
}

impl PartialEq for SummaryTable {
    fn eq(&self, other: &Self) -> bool {
        self.pipeline == other.pipeline
            && self.keys == other.keys
            && self.values == other.values
            && self.frame.equals_missing(&other.frame)
    }
}

/// A summary table paired with how and under what title to draw it.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSpec {
    pub title: String,
    pub kind: ChartKind,
    pub summary: SummaryTable,
}
