use std::env;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use taxi_eda_core::columns::UnivariateSelection;
use taxi_eda_core::descriptions::{describe_or_placeholder, description_table};
use taxi_eda_core::{
    all_pipeline_descriptors, load_trip_table, render_page, run_pipeline, Page, PageRequest,
    PipelineId, TripTable,
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod config;
mod render;

use config::{AppConfig, LogFormat, UnivariateDefaults, DATASET_ENV};

#[derive(Parser, Debug)]
#[command(author, version, about = "NYC yellow taxi trip exploration", long_about = None)]
struct Cli {
    /// Trip export to analyse (overrides TAXI_EDA_DATASET and the config file)
    #[arg(long, global = true)]
    dataset: Option<PathBuf>,
    /// Configuration file (defaults to ./taxi-eda.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the dashboard pages
    Pages,
    /// List the aggregation pipelines
    Pipelines,
    /// Describe one column, or every catalogued column
    Describe {
        column: Option<String>,
    },
    /// Render a page
    Show(ShowArgs),
    /// Run a single pipeline and print its summary
    Run {
        pipeline: String,
    },
    /// Write every chart summary of a page as CSV
    Export(ExportArgs),
}

#[derive(Args, Debug, Default)]
struct SelectionArgs {
    /// Numeric column for the univariate page
    #[arg(long)]
    numeric: Option<String>,
    /// histogram or bar
    #[arg(long)]
    numeric_chart: Option<String>,
    /// Categorical column for the univariate page
    #[arg(long)]
    categorical: Option<String>,
    /// bar or pie
    #[arg(long)]
    categorical_chart: Option<String>,
}

#[derive(Args, Debug)]
struct ShowArgs {
    page: String,
    #[command(flatten)]
    selection: SelectionArgs,
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    format: OutputFormat,
}

#[derive(Args, Debug)]
struct ExportArgs {
    page: String,
    /// Directory that receives one CSV per chart
    #[arg(long)]
    out: PathBuf,
    #[command(flatten)]
    selection: SelectionArgs,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
enum OutputFormat {
    Table,
    Json,
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    let config = AppConfig::load(cli.config.as_deref())?;
    init_tracing(config.log_format);

    match cli.command {
        Command::Pages => handle_pages(),
        Command::Pipelines => handle_pipelines(),
        Command::Describe { column } => handle_describe(column.as_deref()),
        Command::Show(args) => {
            let table = open_dataset(&config, cli.dataset.as_deref())?;
            handle_show(&table, &config, args)
        }
        Command::Run { pipeline } => {
            let id: PipelineId = pipeline.parse()?;
            let table = open_dataset(&config, cli.dataset.as_deref())?;
            handle_run(&table, id)
        }
        Command::Export(args) => {
            let table = open_dataset(&config, cli.dataset.as_deref())?;
            handle_export(&table, &config, args)
        }
    }
}

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    match format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Pretty => builder.init(),
    }
}

fn open_dataset(config: &AppConfig, flag: Option<&Path>) -> Result<TripTable> {
    let path = config.dataset_path(flag, env::var(DATASET_ENV).ok());
    load_trip_table(&path, &config.load_options())
        .with_context(|| format!("Failed to load trip dataset from '{}'", path.display()))
}

/// Command-line choices are strict; configured defaults are lenient.
fn selection(defaults: &UnivariateDefaults, args: &SelectionArgs) -> Result<UnivariateSelection> {
    let mut selection = defaults.selection();
    if let Some(raw) = &args.numeric {
        selection.numeric = raw.parse()?;
    }
    if let Some(raw) = &args.numeric_chart {
        selection.numeric_chart = raw.parse()?;
    }
    if let Some(raw) = &args.categorical {
        selection.categorical = raw.parse()?;
    }
    if let Some(raw) = &args.categorical_chart {
        selection.categorical_chart = raw.parse()?;
    }
    Ok(selection)
}

fn page_request(config: &AppConfig, args: &SelectionArgs) -> Result<PageRequest> {
    Ok(PageRequest {
        selection: selection(&config.univariate, args)?,
        preview_rows: config.preview_rows,
    })
}

fn handle_pages() -> Result<()> {
    let mut table = comfy_table::Table::new();
    table.set_header(vec!["Page", "Alias", "Title", "Charts"]);
    for page in Page::ALL {
        let layout = page.layout();
        table.add_row(vec![
            layout.code.to_string(),
            layout.alias.to_string(),
            layout.title.to_string(),
            layout.charts.len().to_string(),
        ]);
    }
    println!("{table}");
    Ok(())
}

fn handle_pipelines() -> Result<()> {
    let mut table = comfy_table::Table::new();
    table.set_header(vec!["Pipeline", "Title", "Description"]);
    for descriptor in all_pipeline_descriptors() {
        table.add_row(vec![descriptor.code, descriptor.title, descriptor.description]);
    }
    println!("{table}");
    Ok(())
}

fn handle_describe(column: Option<&str>) -> Result<()> {
    match column {
        Some(name) => println!("{name}: {}", describe_or_placeholder(name)),
        None => println!("{}", render::frame_table(&description_table()?)?),
    }
    Ok(())
}

fn handle_show(table: &TripTable, config: &AppConfig, args: ShowArgs) -> Result<()> {
    let page: Page = args.page.parse()?;
    let request = page_request(config, &args.selection)?;
    let view = render_page(table, page, &request)?;

    for failure in &view.failures {
        warn!(chart = %failure.title, error = %failure.error, "chart skipped");
    }

    match args.format {
        OutputFormat::Table => print!("{}", render::page_text(&view)?),
        OutputFormat::Json => println!(
            "{}",
            serde_json::to_string_pretty(&render::page_json(&view)?)?
        ),
    }
    Ok(())
}

fn handle_run(table: &TripTable, id: PipelineId) -> Result<()> {
    let descriptor = id.descriptor();
    let summary = run_pipeline(table, id)?;
    println!("{} ({})", descriptor.title, descriptor.code);
    println!("{}", render::frame_table(&summary.frame)?);
    Ok(())
}

fn handle_export(table: &TripTable, config: &AppConfig, args: ExportArgs) -> Result<()> {
    let page: Page = args.page.parse()?;
    let request = page_request(config, &args.selection)?;
    let view = render_page(table, page, &request)?;

    let written = render::export_charts(&view, &args.out)?;
    info!(page = page.code(), files = written.len(), "page exported");
    if !view.failures.is_empty() {
        warn!(skipped = view.failures.len(), "some charts were unavailable");
    }
    for path in &written {
        println!("{}", path.display());
    }
    Ok(())
}
