use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use serde_json::json;
use tracing::{error, info};
use tracing_subscriber::FmtSubscriber;

use energy_resilience_stats::charts::{chart_slices, generation_timeline, TOP_RESOURCES};
use energy_resilience_stats::dashboard::compare_countries;
use energy_resilience_stats::report::{render, render_comparison};
use energy_resilience_stats::{
    CountryCode, Dashboard, DashboardConfig, DashboardError, DataState, FileRecordSource,
    HttpRecordSource, RecordSource, StatsAggregator, View,
};

/// Grid overview statistics for European power markets
#[derive(Parser, Debug)]
#[command(name = "energy-stats", version, about)]
struct Cli {
    /// TOML configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Base URL of the energy data API (overrides the config file)
    #[arg(long)]
    api_url: Option<String>,

    /// Two-letter country code, e.g. DE
    #[arg(long)]
    country: Option<String>,

    /// View to render
    #[arg(long, value_enum, default_value = "dashboard")]
    view: ViewArg,

    /// Read records from a JSON or CSV file instead of the API
    #[arg(long)]
    input: Option<PathBuf>,

    /// Compare every configured country instead of rendering one view
    #[arg(long)]
    compare: bool,

    /// Output format
    #[arg(long, value_enum, default_value = "text")]
    format: OutputFormat,

    /// Set the logging level
    #[arg(long, default_value = "warn")]
    log_level: tracing::Level,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum ViewArg {
    Dashboard,
    Regional,
    Mix,
    Resilience,
    All,
}

impl ViewArg {
    fn views(self) -> Vec<View> {
        match self {
            ViewArg::Dashboard => vec![View::Dashboard],
            ViewArg::Regional => vec![View::RegionalAnalysis],
            ViewArg::Mix => vec![View::GenerationMix],
            ViewArg::Resilience => vec![View::ResilienceStats],
            ViewArg::All => View::ALL.to_vec(),
        }
    }
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(cli.log_level)
        .with_writer(std::io::stderr)
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("failed to install log subscriber: {}", e);
    }

    match run(&cli) {
        Ok(code) => code,
        Err(e) => {
            error!("{}", e);
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<ExitCode, DashboardError> {
    let config = load_config(cli)?;
    let aggregator = StatsAggregator::new(config.aggregator.clone());

    let source: Box<dyn RecordSource> = match &cli.input {
        Some(path) => {
            info!("Reading records from {}", path.display());
            Box::new(FileRecordSource::new(path))
        }
        None => {
            info!("Querying {}", config.api_base_url);
            Box::new(HttpRecordSource::new(
                config.api_base_url.clone(),
                config.request_timeout(),
            ))
        }
    };

    if cli.compare {
        let rows = compare_countries(source.as_ref(), &config.countries, &aggregator);
        match cli.format {
            OutputFormat::Text => print!("{}", render_comparison(&rows)?),
            OutputFormat::Json => println!("{}", to_json(&rows)?),
        }
        return Ok(ExitCode::SUCCESS);
    }

    let mut dashboard = Dashboard::new(config.default_country.clone(), aggregator);
    dashboard.load(config.default_country.clone(), source.as_ref());

    match cli.format {
        OutputFormat::Text => {
            let ctx = dashboard.context();
            let pages = cli
                .view
                .views()
                .into_iter()
                .map(|view| render(view, &ctx))
                .collect::<Result<Vec<_>, _>>()?;
            print!("{}", pages.join("\n"));
        }
        OutputFormat::Json => println!("{}", state_json(&dashboard)?),
    }

    match dashboard.state() {
        DataState::Unavailable { .. } => Ok(ExitCode::FAILURE),
        _ => Ok(ExitCode::SUCCESS),
    }
}

/// Config file (or defaults), then command-line overrides
fn load_config(cli: &Cli) -> Result<DashboardConfig, DashboardError> {
    let mut config = match &cli.config {
        Some(path) => DashboardConfig::from_file(path)?,
        None => DashboardConfig::default(),
    };

    if let Some(url) = &cli.api_url {
        config.api_base_url = url.clone();
    }
    if let Some(code) = &cli.country {
        config.default_country = CountryCode::parse(code)?;
    }

    config.validate()?;
    Ok(config)
}

fn state_json(dashboard: &Dashboard) -> Result<String, DashboardError> {
    let country = &dashboard.selection().country;
    let value = match dashboard.state() {
        DataState::Ready(snapshot) => json!({
            "country": country,
            "name": country.display_name(),
            "status": "ready",
            "stats": snapshot.stats,
            "timeline": generation_timeline(&snapshot.records),
            "chart": chart_slices(&snapshot.stats, TOP_RESOURCES),
        }),
        DataState::Loading => json!({
            "country": country,
            "status": "loading",
        }),
        DataState::Unavailable { reason } => json!({
            "country": country,
            "status": "unavailable",
            "reason": reason,
        }),
    };
    to_json(&value)
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String, DashboardError> {
    serde_json::to_string_pretty(value)
        .map_err(|e| DashboardError::Generic(format!("failed to encode JSON: {}", e)))
}
