//! BandWatch CLI: Bollinger Band regime report for one security.
//!
//! Commands:
//! - `analyze`: fetch a daily series and print its regime, signals and advisory
//! - `presets`: list the named engine presets
//! - `normalize`: show how a security identifier is resolved

use anyhow::{Context, Result};
use bandwatch_core::config::{AnalysisConfig, Preset};
use bandwatch_core::data::{
    load_series, CircuitBreaker, CsvProvider, DataProvider, FetchRequest, SecurityId,
    SyntheticProvider, YahooProvider, DEFAULT_COUNT,
};
use bandwatch_core::report::{analyze, render};
use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "bandwatch",
    version,
    about = "BandWatch: Bollinger Band regime analysis for a daily price series"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze one security and print the regime report.
    Analyze {
        /// Security identifier (e.g. 601061.XSHG, sh600519, 399006.SZ, SPY).
        symbol: String,

        /// Number of trading days to analyze.
        #[arg(long, default_value_t = DEFAULT_COUNT)]
        count: usize,

        /// Last date of the window (YYYY-MM-DD). Defaults to today.
        #[arg(long)]
        end: Option<NaiveDate>,

        /// Named preset: canonical, classic.
        #[arg(long)]
        preset: Option<String>,

        /// TOML config file layered over the preset.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Band window (overrides preset and config file).
        #[arg(long)]
        window: Option<usize>,

        /// Band stdev multiplier (overrides preset and config file).
        #[arg(long)]
        multiplier: Option<f64>,

        /// Width-trend lookback in bars (overrides preset and config file).
        #[arg(long)]
        lookback: Option<usize>,

        /// Read bars from a CSV file instead of Yahoo Finance.
        #[arg(long, conflicts_with = "synthetic")]
        csv: Option<PathBuf>,

        /// Use deterministic synthetic bars instead of Yahoo Finance.
        #[arg(long, default_value_t = false)]
        synthetic: bool,

        /// Yahoo Finance retries after a failed request (backoff doubles from 500 ms).
        #[arg(long, default_value_t = 3)]
        retries: u32,

        /// Output format.
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,

        /// Write the aligned chart arrays (date,close,upper,middle,lower) to this CSV file.
        #[arg(long)]
        chart_out: Option<PathBuf>,
    },
    /// List the named engine presets.
    Presets,
    /// Show how a security identifier is normalized.
    Normalize {
        symbol: String,
    },
}

struct AnalyzeArgs {
    symbol: String,
    count: usize,
    end: Option<NaiveDate>,
    preset: Option<String>,
    config: Option<PathBuf>,
    window: Option<usize>,
    multiplier: Option<f64>,
    lookback: Option<usize>,
    csv: Option<PathBuf>,
    synthetic: bool,
    retries: u32,
    format: OutputFormat,
    chart_out: Option<PathBuf>,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Analyze {
            symbol,
            count,
            end,
            preset,
            config,
            window,
            multiplier,
            lookback,
            csv,
            synthetic,
            retries,
            format,
            chart_out,
        } => run_analyze(AnalyzeArgs {
            symbol,
            count,
            end,
            preset,
            config,
            window,
            multiplier,
            lookback,
            csv,
            synthetic,
            retries,
            format,
            chart_out,
        }),
        Commands::Presets => run_presets(),
        Commands::Normalize { symbol } => run_normalize(&symbol),
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

/// Preset, then config file, then explicit flags.
fn build_config(args: &AnalyzeArgs) -> Result<AnalysisConfig> {
    let preset = args.preset.as_deref().map(Preset::from_name).transpose()?;
    let document = args
        .config
        .as_ref()
        .map(|path| {
            std::fs::read_to_string(path)
                .with_context(|| format!("failed to read config {}", path.display()))
        })
        .transpose()?;
    let mut config = AnalysisConfig::layered(preset, document.as_deref())?;

    if let Some(window) = args.window {
        config.bands.window = window;
    }
    if let Some(multiplier) = args.multiplier {
        config.bands.multiplier = multiplier;
    }
    if let Some(lookback) = args.lookback {
        config.width.lookback = lookback;
    }
    config.validate()?;
    Ok(config)
}

fn provider_for(args: &AnalyzeArgs) -> Result<Box<dyn DataProvider>> {
    if let Some(path) = &args.csv {
        return Ok(Box::new(CsvProvider::new(path)));
    }
    if args.synthetic {
        return Ok(Box::new(SyntheticProvider::default()));
    }
    let breaker = Arc::new(CircuitBreaker::default_provider());
    let provider =
        YahooProvider::new(breaker)?.with_retry(args.retries, Duration::from_millis(500));
    Ok(Box::new(provider))
}

fn insufficient(symbol: &str, reason: impl std::fmt::Display) -> ExitCode {
    println!("{symbol}: insufficient data - {reason}");
    ExitCode::FAILURE
}

fn run_analyze(args: AnalyzeArgs) -> Result<ExitCode> {
    let config = build_config(&args)?;
    let id = SecurityId::parse(&args.symbol)?;
    let provider = provider_for(&args)?;
    let request = FetchRequest::new(args.count, args.end);
    let today = chrono::Local::now().date_naive();
    debug!(symbol = %id, preset = %config.preset, provider = provider.name(), "starting analysis");

    let series = match load_series(provider.as_ref(), &id, &request, today) {
        Ok(series) => series,
        Err(e) => return Ok(insufficient(&id.yahoo_symbol(), e)),
    };
    let report = match analyze(&series, &config) {
        Ok(report) => report,
        Err(e) => return Ok(insufficient(&id.yahoo_symbol(), e)),
    };

    match args.format {
        OutputFormat::Text => print!("{}", render::render_text(&report)),
        OutputFormat::Json => println!("{}", render::export_json(&report)?),
    }

    if let Some(path) = &args.chart_out {
        render::save_chart_csv(&report.chart, path)
            .with_context(|| format!("failed to write chart CSV {}", path.display()))?;
        eprintln!("Chart data saved to: {}", path.display());
    }
    Ok(ExitCode::SUCCESS)
}

fn run_presets() -> Result<ExitCode> {
    for preset in Preset::all() {
        println!("{:<10} {}", preset.name(), preset.description());
    }
    Ok(ExitCode::SUCCESS)
}

fn run_normalize(symbol: &str) -> Result<ExitCode> {
    let id = SecurityId::parse(symbol)?;
    println!("{}", serde_json::to_string(&id)?);
    println!("yahoo symbol: {}", id.yahoo_symbol());
    Ok(ExitCode::SUCCESS)
}
