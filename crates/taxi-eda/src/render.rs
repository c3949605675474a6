//! Terminal, JSON and CSV output for page views.

use std::fmt::Write as _;
use std::fs::{self, File};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{ContentArrangement, Table};
use polars::prelude::*;
use serde_json::{json, Value};
use taxi_eda_core::metrics::{Metric, MetricValue};
use taxi_eda_core::pages::NamedTable;
use taxi_eda_core::{ChartSpec, PageView};
use tracing::info;

pub fn format_value(value: &AnyValue<'_>) -> String {
    match value {
        AnyValue::Null => String::new(),
        AnyValue::String(s) => (*s).to_string(),
        AnyValue::StringOwned(s) => s.to_string(),
        AnyValue::Float64(v) => format_float(*v),
        AnyValue::Float32(v) => format_float(f64::from(*v)),
        other => other.to_string(),
    }
}

/// At most four decimals, trailing zeros dropped.
fn format_float(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    let text = format!("{value:.4}");
    text.trim_end_matches('0').trim_end_matches('.').to_string()
}

pub fn format_metric(value: &MetricValue) -> String {
    match value {
        MetricValue::Count(count) => count.to_string(),
        MetricValue::Currency(amount) => format!("${amount:.2}"),
        MetricValue::Quantity(quantity) => format_float(*quantity),
    }
}

fn new_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

pub fn frame_table(df: &DataFrame) -> Result<Table> {
    let mut table = new_table();
    table.set_header(
        df.get_column_names()
            .iter()
            .map(|name| name.to_string())
            .collect::<Vec<_>>(),
    );

    for row in 0..df.height() {
        let cells = df
            .get_columns()
            .iter()
            .map(|column| column.get(row).map(|value| format_value(&value)))
            .collect::<PolarsResult<Vec<_>>>()?;
        table.add_row(cells);
    }
    Ok(table)
}

pub fn metrics_table(metrics: &[Metric]) -> Table {
    let mut table = new_table();
    table.set_header(vec!["Metric", "Value"]);
    for metric in metrics {
        table.add_row(vec![metric.label.to_string(), format_metric(&metric.value)]);
    }
    table
}

pub fn page_text(view: &PageView) -> Result<String> {
    let mut out = String::new();
    writeln!(out, "{}", view.page.title())?;

    if !view.metrics.is_empty() {
        writeln!(out, "\n{}", metrics_table(&view.metrics))?;
    }
    for named in &view.tables {
        writeln!(out, "\n{}\n{}", named.title, frame_table(&named.frame)?)?;
    }
    for chart in &view.charts {
        writeln!(out, "\n{}", chart_text(chart)?)?;
    }
    for failure in &view.failures {
        writeln!(out, "\n{}: unavailable ({})", failure.title, failure.error)?;
    }
    Ok(out)
}

pub fn chart_text(chart: &ChartSpec) -> Result<String> {
    Ok(format!(
        "{} [{}]\n{}",
        chart.title,
        chart.kind.name(),
        frame_table(&chart.summary.frame)?
    ))
}

/// Rows as an array of objects, one per row.
pub fn frame_rows(df: &DataFrame) -> Result<Value> {
    let mut df = df.clone();
    let mut buffer = Vec::new();
    JsonWriter::new(&mut buffer)
        .with_json_format(JsonFormat::Json)
        .finish(&mut df)?;
    if buffer.is_empty() {
        return Ok(Value::Array(Vec::new()));
    }
    Ok(serde_json::from_slice(&buffer)?)
}

pub fn chart_json(chart: &ChartSpec) -> Result<Value> {
    Ok(json!({
        "title": chart.title,
        "kind": chart.kind,
        "pipeline": chart.summary.pipeline,
        "keys": chart.summary.keys,
        "values": chart.summary.values,
        "rows": frame_rows(&chart.summary.frame)?,
    }))
}

fn table_json(named: &NamedTable) -> Result<Value> {
    Ok(json!({
        "title": named.title,
        "rows": frame_rows(&named.frame)?,
    }))
}

pub fn page_json(view: &PageView) -> Result<Value> {
    let tables = view.tables.iter().map(table_json).collect::<Result<Vec<_>>>()?;
    let charts = view.charts.iter().map(chart_json).collect::<Result<Vec<_>>>()?;

    Ok(json!({
        "page": view.page,
        "title": view.page.title(),
        "metrics": view.metrics,
        "tables": tables,
        "charts": charts,
        "failures": view.failures,
    }))
}

/// File stem for a chart title: lowercase words joined by dashes.
pub fn slug(title: &str) -> String {
    title
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|word| !word.is_empty())
        .map(str::to_ascii_lowercase)
        .collect::<Vec<_>>()
        .join("-")
}

/// Writes each chart summary as `NN-<slug>.csv` under `dir`.
pub fn export_charts(view: &PageView, dir: &Path) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create export directory '{}'", dir.display()))?;

    let mut written = Vec::with_capacity(view.charts.len());
    for (index, chart) in view.charts.iter().enumerate() {
        let path = dir.join(format!("{:02}-{}.csv", index + 1, slug(&chart.title)));
        let mut file = File::create(&path)
            .with_context(|| format!("Failed to create '{}'", path.display()))?;
        let mut frame = chart.summary.frame.clone();
        CsvWriter::new(&mut file)
            .include_header(true)
            .finish(&mut frame)
            .with_context(|| format!("Failed to write '{}'", path.display()))?;

        info!(path = %path.display(), rows = frame.height(), "chart summary exported");
        written.push(path);
    }
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use taxi_eda_core::{render_page, Page, PageRequest, TripTable};

    fn trips() -> TripTable {
        let df = df!(
            "tpep_pickup_datetime" => &["2024-01-02 10:00:00", "2024-01-01 09:00:00", "2024-02-01 23:00:00"],
            "hour_pickup" => &[10i64, 9, 23],
            "day" => &[2i64, 1, 1],
            "month" => &[1i64, 1, 2],
            "day_period" => &["morning", "morning", "night"],
            "passenger_count" => &[1i64, 2, 1],
            "payment_type" => &["Cash", "Credit card", "Cash"],
            "fare_amount" => &[10.0f64, 20.0, 12.5],
            "tip_amount" => &[1.0f64, 2.0, 0.5],
            "trip_distance" => &[1.5f64, 3.0, 2.25],
            "Borough_pickup" => &["Manhattan", "Queens", "Manhattan"],
        )
        .unwrap();
        TripTable::new(df).unwrap()
    }

    #[test]
    fn values_render_without_noise() {
        assert_eq!(format_value(&AnyValue::Null), "");
        assert_eq!(format_value(&AnyValue::String("Queens")), "Queens");
        assert_eq!(format_value(&AnyValue::Float64(3.33)), "3.33");
        assert_eq!(format_value(&AnyValue::Float64(5.0)), "5");
        assert_eq!(format_value(&AnyValue::Int64(42)), "42");
        assert_eq!(format_metric(&MetricValue::Currency(75.5)), "$75.50");
        assert_eq!(format_metric(&MetricValue::Count(4)), "4");
    }

    #[test]
    fn slugs_are_file_safe() {
        assert_eq!(
            slug("Average Tip Amount by Pickup Hour of the Day"),
            "average-tip-amount-by-pickup-hour-of-the-day"
        );
        assert_eq!(slug("Pickup Hours vs. Tip  Amount"), "pickup-hours-vs-tip-amount");
    }

    #[test]
    fn page_text_lists_metrics_and_charts() {
        let view = render_page(&trips(), Page::TripAnalysis, &PageRequest::default()).unwrap();
        let text = page_text(&view).unwrap();

        assert!(text.starts_with("Trip Analysis"));
        assert!(text.contains("Total Revenue"));
        assert!(text.contains("$42.50"));
        assert!(text.contains("Average Trip Distance by Pickup Borough [bar]"));
        assert!(text.contains("Queens"));
    }

    #[test]
    fn page_json_carries_chart_rows() {
        let view = render_page(&trips(), Page::TimeAnalysis, &PageRequest::default()).unwrap();
        let value = page_json(&view).unwrap();

        assert_eq!(value["page"], "time-analysis");
        let charts = value["charts"].as_array().unwrap();
        assert_eq!(charts.len(), 5);
        assert_eq!(charts[0]["kind"], "line");
        assert_eq!(charts[3]["kind"], "grouped_bar");

        let ratios = charts[4]["rows"].as_array().unwrap();
        assert_eq!(ratios.len(), 2);
        assert_eq!(ratios[0]["day_period"], "morning");
        assert_eq!(ratios[0]["ratio"], 0.5);
    }

    #[test]
    fn export_writes_one_csv_per_chart() {
        let dir = tempfile::tempdir().unwrap();
        let view = render_page(&trips(), Page::FareRevenueAnalysis, &PageRequest::default())
            .unwrap();

        let written = export_charts(&view, dir.path()).unwrap();

        assert_eq!(written.len(), 5);
        assert!(written[0].ends_with("01-average-fare-amount-by-day.csv"));
        let content = fs::read_to_string(&written[2]).unwrap();
        let mut lines = content.lines();
        assert_eq!(lines.next(), Some("month,fare_amount"));
        assert_eq!(lines.count(), 2);
    }
}
