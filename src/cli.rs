//! CLI definition and dispatch.

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{error, info, warn};

use crate::adapters::csv_adapter::{self, CsvTableWriter};
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::svg_chart_adapter::SvgChartAdapter;
use crate::domain::engine::{IndicatorRow, compute_indicators};
use crate::domain::error::PricelensError;
use crate::domain::fetch_config::{FetchConfig, build_fetch_config};
use crate::domain::normalize::normalize;
use crate::domain::ohlcv::RawRow;
use crate::ports::chart_port::ChartPort;
use crate::ports::config_port::ConfigPort;
use crate::ports::price_feed::PriceFeed;
use crate::ports::table_writer::TableWriter;

pub const OUTPUT_SECTION: &str = "output";

#[derive(Parser, Debug)]
#[command(name = "pricelens", about = "Technical indicators for a daily price series")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Fetch prices over HTTP, compute indicators, write the table
    Run {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long, env = "PRICELENS_API_KEY", hide_env_values = true)]
        api_key: Option<String>,
        #[arg(short, long)]
        output: Option<PathBuf>,
        #[arg(long)]
        chart: Option<PathBuf>,
    },
    /// Compute indicators from a local price CSV
    Compute {
        #[arg(short, long)]
        input: PathBuf,
        #[arg(short, long)]
        output: Option<PathBuf>,
        #[arg(long)]
        chart: Option<PathBuf>,
        #[arg(long)]
        symbol: Option<String>,
    },
    /// Validate a configuration file and print the fetch window
    Validate {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long, env = "PRICELENS_API_KEY", hide_env_values = true)]
        api_key: Option<String>,
    },
}

/// Where the table and chart go. `csv: None` means stdout.
#[derive(Debug, Clone, PartialEq)]
pub struct OutputPaths {
    pub csv: Option<PathBuf>,
    pub chart: Option<PathBuf>,
}

pub fn run(cli: Cli) -> ExitCode {
    let result = match cli.command {
        Command::Run {
            config,
            api_key,
            output,
            chart,
        } => run_fetch(&config, api_key.as_deref(), output, chart),
        Command::Compute {
            input,
            output,
            chart,
            symbol,
        } => run_compute(&input, output, chart, symbol.as_deref()),
        Command::Validate { config, api_key } => run_validate(&config, api_key.as_deref()),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            (&e).into()
        }
    }
}

pub fn load_config(path: &Path) -> Result<FileConfigAdapter, PricelensError> {
    info!("Loading config from {}", path.display());
    FileConfigAdapter::from_file(path)
}

fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

fn run_fetch(
    config_path: &Path,
    api_key: Option<&str>,
    output: Option<PathBuf>,
    chart: Option<PathBuf>,
) -> Result<(), PricelensError> {
    let adapter = load_config(config_path)?;
    let fetch = build_fetch_config(&adapter, api_key, today())?;
    let outputs = resolve_outputs(&adapter, &fetch.symbol, output, chart);

    let feed = build_http_feed(&adapter)?;
    let rows = run_pipeline(feed.as_ref(), &fetch)?;
    write_outputs(&rows, &fetch.symbol, &outputs)
}

#[cfg(feature = "http")]
fn build_http_feed(config: &dyn ConfigPort) -> Result<Box<dyn PriceFeed>, PricelensError> {
    use crate::adapters::http_feed_adapter::{DEFAULT_BASE_URL, HttpFeedAdapter};

    let base_url = config
        .get_non_empty(crate::domain::fetch_config::FEED_SECTION, "base_url")
        .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
    Ok(Box::new(HttpFeedAdapter::new(&base_url)?))
}

#[cfg(not(feature = "http"))]
fn build_http_feed(_config: &dyn ConfigPort) -> Result<Box<dyn PriceFeed>, PricelensError> {
    Err(PricelensError::Fetch {
        reason: "http feature is required for run".to_string(),
    })
}

fn run_compute(
    input: &Path,
    output: Option<PathBuf>,
    chart: Option<PathBuf>,
    symbol: Option<&str>,
) -> Result<(), PricelensError> {
    info!("Reading prices from {}", input.display());
    let raw = csv_adapter::read_rows(input)?;
    let rows = process_rows(&raw)?;

    let symbol = symbol
        .map(str::to_uppercase)
        .or_else(|| {
            input
                .file_stem()
                .map(|s| s.to_string_lossy().to_uppercase())
        })
        .unwrap_or_default();
    let outputs = OutputPaths { csv: output, chart };
    write_outputs(&rows, &symbol, &outputs)
}

fn run_validate(config_path: &Path, api_key: Option<&str>) -> Result<(), PricelensError> {
    let adapter = load_config(config_path)?;
    let fetch = build_fetch_config(&adapter, api_key, today())?;
    let outputs = resolve_outputs(&adapter, &fetch.symbol, None, None);

    println!("symbol:   {}", fetch.symbol);
    println!("window:   {} to {}", fetch.from_date, fetch.to_date);
    if let Some(csv) = &outputs.csv {
        println!("csv:      {}", csv.display());
    }
    if let Some(chart) = &outputs.chart {
        println!("chart:    {}", chart.display());
    }
    info!("Configuration is valid");
    Ok(())
}

/// Output paths from CLI flags, falling back to `[output]` and then to
/// `<symbol>_indicators.csv`.
pub fn resolve_outputs(
    config: &dyn ConfigPort,
    symbol: &str,
    output: Option<PathBuf>,
    chart: Option<PathBuf>,
) -> OutputPaths {
    let csv = output
        .or_else(|| config.get_non_empty(OUTPUT_SECTION, "csv_path").map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(format!("{}_indicators.csv", symbol.to_lowercase())));
    let chart = chart.or_else(|| {
        config
            .get_non_empty(OUTPUT_SECTION, "chart_path")
            .map(PathBuf::from)
    });
    OutputPaths {
        csv: Some(csv),
        chart,
    }
}

/// Fetches raw rows for `fetch` and runs them through the indicator pipeline.
pub fn run_pipeline(
    feed: &dyn PriceFeed,
    fetch: &FetchConfig,
) -> Result<Vec<IndicatorRow>, PricelensError> {
    let raw = feed.fetch_rows(fetch)?;
    process_rows(&raw)
}

/// Normalizes raw rows and computes the trimmed indicator table.
pub fn process_rows(raw: &[RawRow]) -> Result<Vec<IndicatorRow>, PricelensError> {
    let series = normalize(raw)?;
    if let (Some(first), Some(last)) = (series.first_date(), series.last_date()) {
        info!(rows = series.len(), %first, %last, "normalized price series");
    }

    let rows = compute_indicators(&series)?;
    if let Some(first) = rows.first() {
        info!(
            rows = rows.len(),
            first = %first.row.date,
            "computed indicators"
        );
    }
    Ok(rows)
}

pub fn write_outputs(
    rows: &[IndicatorRow],
    symbol: &str,
    outputs: &OutputPaths,
) -> Result<(), PricelensError> {
    match &outputs.csv {
        Some(path) => {
            CsvTableWriter.write(rows, path)?;
            info!("Table written to: {}", path.display());
        }
        None => CsvTableWriter.write_to(rows, io::stdout().lock())?,
    }

    if let Some(path) = &outputs.chart {
        if symbol.is_empty() {
            warn!("chart has no symbol in its title");
        }
        SvgChartAdapter.render(symbol, rows, path)?;
        info!("Chart written to: {}", path.display());
    }
    Ok(())
}
