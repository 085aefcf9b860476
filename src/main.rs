mod config;
mod error;
mod forecast;
mod indicator;
mod model;
mod render;
mod sample;
mod store;
mod view;
mod window;

use std::path::Path;
use std::time::Duration;

use clap::Parser;
use derive_more::{Display, Error};
use error_stack::{Report, ResultExt};
use tracing::info;
use tracing_subscriber::EnvFilter;

use config::AppConfig;
use model::{ChartKind, Overlay, Selection, TimeWindow};
use render::Renderer;
use render::json::JsonRenderer;
use render::terminal::TerminalRenderer;
use store::StockStore;

const DEFAULT_CONFIG_PATH: &str = "config.toml";

#[derive(Debug, Display, Error)]
pub enum AppError {
    #[display("configuration error")]
    Config,
    #[display("data source error")]
    Data,
    #[display("invalid {what}: \"{value}\"")]
    InvalidSelection { what: &'static str, value: String },
    #[display("search failed")]
    Search,
    #[display("stock symbol \"{symbol}\" not found. Available stocks: {available}")]
    NotFound { symbol: String, available: String },
}

#[derive(Parser)]
#[command(name = "stock-analyzer", about = "Technical analysis dashboard for stock data")]
struct Cli {
    /// Stock symbol to analyze (uses the configured default when omitted)
    symbol: Option<String>,

    /// Path to the TOML configuration file
    #[arg(short, long)]
    config: Option<String>,

    /// Lookback window: 1mo, 3mo, 6mo, 1y, or a number of points
    #[arg(short, long)]
    window: Option<String>,

    /// Chart type: line or candlestick
    #[arg(long)]
    chart: Option<String>,

    /// Comma-separated overlays to draw (sma20, sma50, ema12; "none" disables all)
    #[arg(long)]
    overlays: Option<String>,

    /// JSON stock data file (built-in sample data when omitted)
    #[arg(long)]
    data: Option<String>,

    /// Emit the analysis as JSON instead of the terminal dashboard
    #[arg(long)]
    json: bool,
}

fn main() {
    if let Err(report) = run() {
        eprintln!("{report:?}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), Report<AppError>> {
    let cli = Cli::parse();

    let (config_path, explicit) = match cli.config.as_deref() {
        Some(path) => (path, true),
        None => (DEFAULT_CONFIG_PATH, false),
    };
    let config_file = Path::new(config_path);
    // No subscriber yet; the fallback notice is logged after init_tracing.
    let defaulted = !explicit && !config_file.exists();
    let config =
        config::load_or_default(config_file, explicit).change_context(AppError::Config)?;

    init_tracing(&config);
    if defaulted {
        tracing::debug!(path = config_path, "config file not found, using defaults");
    }

    // ── Store ─────────────────────────────────────────────────────────────────
    let store = build_store(&cli, &config)?;
    if store.is_empty() {
        tracing::warn!("no stocks loaded; nothing to do");
        return Ok(());
    }
    info!(stocks = store.len(), "stock data ready");

    // ── Selection ─────────────────────────────────────────────────────────────
    let selection = build_selection(&cli, &config)?;

    // ── Search ────────────────────────────────────────────────────────────────
    info!(symbol = %selection.symbol, "searching stock data");
    let record = store
        .search(&selection.symbol)
        .change_context(AppError::Search)?;
    let Some(record) = record else {
        return Err(Report::new(AppError::NotFound {
            symbol: selection.symbol.clone(),
            available: store.symbols().join(", "),
        }));
    };
    info!(symbol = %record.symbol, name = %record.name, "loaded stock data");

    // ── Analysis and rendering ────────────────────────────────────────────────
    let view = view::analyze(record, &selection);
    let renderer: Box<dyn Renderer> = if cli.json {
        Box::new(JsonRenderer)
    } else {
        Box::new(TerminalRenderer)
    };
    renderer.render(&view);

    Ok(())
}

fn init_tracing(config: &AppConfig) {
    let filter = EnvFilter::new(&config.general.log_level);
    match config.general.log_format.as_str() {
        "json" => {
            tracing_subscriber::fmt()
                .json()
                .with_env_filter(filter)
                .init();
        }
        _ => {
            tracing_subscriber::fmt().with_env_filter(filter).init();
        }
    }
}

fn build_store(cli: &Cli, config: &AppConfig) -> Result<StockStore, Report<AppError>> {
    let data_file = cli.data.as_deref().or(config.data.file.as_deref());
    let store = match data_file {
        Some(path) => {
            info!(path, "loading stock data file");
            StockStore::from_json_file(Path::new(path)).change_context(AppError::Data)?
        }
        None => sample::sample_store().change_context(AppError::Data)?,
    };
    Ok(store.with_search_delay(Duration::from_millis(config.data.search_delay_ms)))
}

fn build_selection(cli: &Cli, config: &AppConfig) -> Result<Selection, Report<AppError>> {
    let symbol = cli
        .symbol
        .clone()
        .unwrap_or_else(|| config.dashboard.default_symbol.clone());

    let window_raw = cli.window.as_deref().unwrap_or(&config.dashboard.window);
    let window = TimeWindow::parse(window_raw).ok_or_else(|| {
        Report::new(AppError::InvalidSelection {
            what: "window",
            value: window_raw.to_string(),
        })
    })?;

    let chart_raw = cli.chart.as_deref().unwrap_or(&config.dashboard.chart);
    let chart = ChartKind::from_str(chart_raw).ok_or_else(|| {
        Report::new(AppError::InvalidSelection {
            what: "chart type",
            value: chart_raw.to_string(),
        })
    })?;

    let overlays = match cli.overlays.as_deref().map(str::trim) {
        Some("none") => Vec::new(),
        Some(raw) => {
            let tokens: Vec<String> = raw.split(',').map(|t| t.trim().to_string()).collect();
            parse_overlays(&tokens)?
        }
        None => parse_overlays(&config.dashboard.overlays)?,
    };

    Ok(Selection {
        symbol,
        window,
        chart,
        overlays,
    })
}

fn parse_overlays(raw: &[String]) -> Result<Vec<Overlay>, Report<AppError>> {
    let mut overlays = Vec::new();
    for token in raw {
        let overlay = Overlay::from_str(token).ok_or_else(|| {
            Report::new(AppError::InvalidSelection {
                what: "overlay",
                value: token.clone(),
            })
        })?;
        if !overlays.contains(&overlay) {
            overlays.push(overlay);
        }
    }
    Ok(overlays)
}
