//! Dashboard pages and the charts each one shows.

use std::fmt;
use std::str::FromStr;

use polars::prelude::DataFrame;
use serde::Serialize;
use tracing::{debug, warn};

use crate::columns::UnivariateSelection;
use crate::descriptions::description_table;
use crate::error::{EdaError, Result};
use crate::metrics::{trip_metrics, Metric};
use crate::pipelines::{run_pipeline, PipelineId};
use crate::summary::{ChartKind, ChartSpec};
use crate::trip_table::TripTable;
use crate::univariate::{categorical_chart_spec, numeric_chart_spec};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Page {
    Home,
    UnivariateAnalysis,
    TripAnalysis,
    TimeAnalysis,
    FareRevenueAnalysis,
    PassengerInsights,
}

/// One chart slot on a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChartEntry {
    pub pipeline: PipelineId,
    pub kind: ChartKind,
    pub title: &'static str,
}

#[derive(Debug)]
pub struct PageLayout {
    pub page: Page,
    pub code: &'static str,
    pub alias: &'static str,
    pub title: &'static str,
    pub charts: &'static [ChartEntry],
}

const fn bar(pipeline: PipelineId, title: &'static str) -> ChartEntry {
    ChartEntry {
        pipeline,
        kind: ChartKind::Bar,
        title,
    }
}

const TRIP_ANALYSIS_CHARTS: &[ChartEntry] = &[
    bar(
        PipelineId::TipByHour,
        "Average Tip Amount by Pickup Hour of the Day",
    ),
    bar(
        PipelineId::DistanceByPickupBorough,
        "Average Trip Distance by Pickup Borough",
    ),
    bar(
        PipelineId::TipByDay,
        "Day of the Week with Highest Average Tip",
    ),
    bar(
        PipelineId::TipByDayPeriod,
        "Part of Day with Highest Average Tip",
    ),
];

const TIME_ANALYSIS_CHARTS: &[ChartEntry] = &[
    ChartEntry {
        pipeline: PipelineId::TipByHour,
        kind: ChartKind::Line,
        title: "Pickup Hours vs Tip Amount",
    },
    bar(
        PipelineId::TipByDay,
        "Day of the Week with Highest Average Tip",
    ),
    bar(
        PipelineId::TipByDayPeriod,
        "Part of Day with Highest Average Tip",
    ),
    ChartEntry {
        pipeline: PipelineId::PassengersByMonthAndPeriod,
        kind: ChartKind::GroupedBar,
        title: "Total Passengers per Period Each Month",
    },
    bar(
        PipelineId::CashRatioByPeriod,
        "Period with Highest Cash Ratio",
    ),
];

const FARE_REVENUE_CHARTS: &[ChartEntry] = &[
    bar(PipelineId::FareAvgByDay, "Average Fare Amount by Day"),
    bar(PipelineId::FareMaxByDay, "Highest Fare Amount per Day"),
    bar(PipelineId::FareSumByMonth, "Total Fare by Month"),
    bar(PipelineId::FareAvgByPeriod, "Highest Average Fare by Period"),
    bar(
        PipelineId::FareMaxByPaymentType,
        "Highest Fare Amount per Payment Type",
    ),
];

const PASSENGER_INSIGHTS_CHARTS: &[ChartEntry] = &[
    bar(
        PipelineId::TripsByPassengerCount,
        "Total Number of Trips by Passenger Count",
    ),
    bar(
        PipelineId::FareSumByPassengerCount,
        "Total Amount Paid vs Passenger Count",
    ),
    bar(
        PipelineId::TipAvgByPassengerCount,
        "Trips with More Passengers Tend to Give Higher Tips",
    ),
    bar(
        PipelineId::DistanceAvgByPassengerCount,
        "Trip Distance vs Passenger Count",
    ),
    bar(
        PipelineId::DistanceAvgByPassengerCount,
        "Average Trip Distance by Passenger Count",
    ),
];

/// Indexed by `Page as usize`.
static PAGE_LAYOUTS: [PageLayout; 6] = [
    PageLayout {
        page: Page::Home,
        code: "home",
        alias: "home",
        title: "Home",
        charts: &[],
    },
    PageLayout {
        page: Page::UnivariateAnalysis,
        code: "univariate-analysis",
        alias: "univariate",
        title: "Univariate Analysis",
        charts: &[],
    },
    PageLayout {
        page: Page::TripAnalysis,
        code: "trip-analysis",
        alias: "trip",
        title: "Trip Analysis",
        charts: TRIP_ANALYSIS_CHARTS,
    },
    PageLayout {
        page: Page::TimeAnalysis,
        code: "time-analysis",
        alias: "time",
        title: "Time Analysis",
        charts: TIME_ANALYSIS_CHARTS,
    },
    PageLayout {
        page: Page::FareRevenueAnalysis,
        code: "fare-revenue-analysis",
        alias: "fare",
        title: "Fare Revenue Analysis",
        charts: FARE_REVENUE_CHARTS,
    },
    PageLayout {
        page: Page::PassengerInsights,
        code: "passenger-insights",
        alias: "passengers",
        title: "Passenger Insights",
        charts: PASSENGER_INSIGHTS_CHARTS,
    },
];

impl Page {
    pub const ALL: [Page; 6] = [
        Page::Home,
        Page::UnivariateAnalysis,
        Page::TripAnalysis,
        Page::TimeAnalysis,
        Page::FareRevenueAnalysis,
        Page::PassengerInsights,
    ];

    pub fn layout(self) -> &'static PageLayout {
        &PAGE_LAYOUTS[self as usize]
    }

    pub fn code(self) -> &'static str {
        self.layout().code
    }

    pub fn title(self) -> &'static str {
        self.layout().title
    }

    pub fn charts(self) -> &'static [ChartEntry] {
        self.layout().charts
    }
}

impl fmt::Display for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

impl FromStr for Page {
    type Err = EdaError;

    /// Accepts the page code, its short alias or its title, ignoring case.
    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim();
        PAGE_LAYOUTS
            .iter()
            .find(|layout| {
                layout.code.eq_ignore_ascii_case(wanted)
                    || layout.alias.eq_ignore_ascii_case(wanted)
                    || layout.title.eq_ignore_ascii_case(wanted)
            })
            .map(|layout| layout.page)
            .ok_or_else(|| EdaError::InvalidSelection {
                kind: "page",
                value: wanted.to_string(),
                allowed: PAGE_LAYOUTS.iter().map(|layout| layout.code).collect(),
            })
    }
}

#[derive(Debug, Clone)]
pub struct PageRequest {
    pub selection: UnivariateSelection,
    pub preview_rows: usize,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            selection: UnivariateSelection::default(),
            preview_rows: 20,
        }
    }
}

#[derive(Debug, Clone)]
pub struct NamedTable {
    pub title: &'static str,
    pub frame: DataFrame,
}

/// A chart that could not be produced; shown in place of the chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChartFailure {
    pub title: String,
    pub error: String,
}

#[derive(Debug, Clone)]
pub struct PageView {
    pub page: Page,
    pub metrics: Vec<Metric>,
    pub tables: Vec<NamedTable>,
    pub charts: Vec<ChartSpec>,
    pub failures: Vec<ChartFailure>,
}

impl PageView {
    fn new(page: Page) -> Self {
        Self {
            page,
            metrics: Vec::new(),
            tables: Vec::new(),
            charts: Vec::new(),
            failures: Vec::new(),
        }
    }

    /// Missing columns only cost the affected slot; anything else aborts the page.
    fn record<T>(&mut self, title: &str, result: Result<T>) -> Result<Option<T>> {
        match result {
            Ok(value) => Ok(Some(value)),
            Err(err @ EdaError::MissingColumn { .. }) => {
                warn!(page = self.page.code(), chart = title, error = %err, "chart unavailable");
                self.failures.push(ChartFailure {
                    title: title.to_string(),
                    error: err.to_string(),
                });
                Ok(None)
            }
            Err(err) => Err(err),
        }
    }

    fn push_chart(&mut self, title: &str, result: Result<ChartSpec>) -> Result<()> {
        if let Some(chart) = self.record(title, result)? {
            self.charts.push(chart);
        }
        Ok(())
    }
}

pub fn render_page(table: &TripTable, page: Page, request: &PageRequest) -> Result<PageView> {
    let mut view = PageView::new(page);

    match page {
        Page::Home => {
            view.tables.push(NamedTable {
                title: "Dataset Overview",
                frame: table.preview(request.preview_rows),
            });
            view.tables.push(NamedTable {
                title: "Column Descriptions",
                frame: description_table()?,
            });
        }
        Page::UnivariateAnalysis => {
            let selection = request.selection;
            view.push_chart(
                selection.numeric.name(),
                numeric_chart_spec(table, selection.numeric, selection.numeric_chart),
            )?;
            view.push_chart(
                selection.categorical.name(),
                categorical_chart_spec(table, selection.categorical, selection.categorical_chart),
            )?;
        }
        Page::TripAnalysis => {
            if let Some(metrics) = view.record("Trip Metrics", trip_metrics(table))? {
                view.metrics = metrics;
            }
        }
        Page::TimeAnalysis | Page::FareRevenueAnalysis | Page::PassengerInsights => {}
    }

    for entry in page.charts() {
        let chart = run_pipeline(table, entry.pipeline).map(|summary| ChartSpec {
            title: entry.title.to_string(),
            kind: entry.kind,
            summary,
        });
        view.push_chart(entry.title, chart)?;
    }

    debug!(
        page = page.code(),
        charts = view.charts.len(),
        failures = view.failures.len(),
        "page rendered"
    );
    Ok(view)
}
