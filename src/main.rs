use anyhow::Context;
use clap::{Parser, Subcommand};
use configuration::{Config, OutputFormat};
use data_provider::{DataProvider, StaticProvider, StockAnalysisClient};
use futures::future::join_all;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::sync::Arc;
use valuation::{ForecastYears, ValuationEngine};

mod logging;
mod report;
mod tickers;

use report::Outcome;

/// The main entry point for the valuator application.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load VALUATOR__* overrides from a .env file, if there is one
    dotenvy::dotenv().ok();

    // Parse command-line arguments
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => configuration::load_config_from(path),
        None => configuration::load_config(),
    }
    .context("Failed to load configuration")?;

    let _log_guard = logging::init(&config.logging)?;

    // Execute the appropriate command
    match cli.command {
        Commands::Analyze(args) => handle_analyze(args, &config).await,
        Commands::Tickers => handle_tickers(&config),
    }
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// Values dividend-paying stocks with a two-year dividend discount model.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to a configuration file (defaults to ./config.toml when present).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch forecast data for one or more tickers and rate them.
    Analyze(AnalyzeArgs),
    /// List the reference tickers of large dividend payers.
    Tickers,
}

#[derive(Parser)]
struct AnalyzeArgs {
    /// Ticker symbols to analyze (e.g., "KO", "JNJ").
    #[arg(required = true)]
    tickers: Vec<String>,

    /// Use this beta instead of the one found on the overview page.
    #[arg(long, allow_hyphen_values = true)]
    beta: Option<String>,

    /// The two forecast years to project from (e.g., --years 2025 2026).
    #[arg(long, num_args = 2, value_names = ["FIRST", "SECOND"])]
    years: Option<Vec<String>>,

    /// Read snapshots from a JSON file instead of fetching them.
    #[arg(long)]
    offline: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    format: OutputFormat,
}

// ==============================================================================
// Analyze Command Logic
// ==============================================================================

/// Handles the orchestration of one or more valuation runs.
async fn handle_analyze(args: AnalyzeArgs, config: &Config) -> anyhow::Result<()> {
    let provider: Arc<dyn DataProvider> = match &args.offline {
        Some(path) => Arc::new(
            StaticProvider::from_json_file(path)
                .with_context(|| format!("Failed to load snapshots from {}", path.display()))?,
        ),
        None => Arc::new(StockAnalysisClient::new(config.provider.clone())?),
    };

    let mut engine = ValuationEngine::from_config(config);
    if let Some([first, second]) = args.years.as_deref() {
        engine = engine.with_forecast_years(ForecastYears::new(first, second));
    }
    let engine = Arc::new(engine);

    if args.beta.is_some() && args.tickers.len() > 1 {
        tracing::warn!("--beta applies to every ticker in this run");
    }

    // Set up the progress bar
    let progress_bar = ProgressBar::new(args.tickers.len() as u64);
    progress_bar.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("#>-"),
    );

    // Each ticker is fetched and valued independently
    let tasks: Vec<_> = args
        .tickers
        .iter()
        .map(|ticker| {
            let provider = Arc::clone(&provider);
            let engine = Arc::clone(&engine);
            let ticker = ticker.clone();
            let beta = args.beta.clone();
            let pb_clone = progress_bar.clone();

            tokio::spawn(async move {
                pb_clone.set_message(format!("Fetching {ticker}..."));
                let result = async {
                    let snapshot = provider.fetch_snapshot(&ticker).await?;
                    Ok::<_, anyhow::Error>(engine.analyze(&snapshot, beta.as_deref())?)
                }
                .await;
                pb_clone.inc(1);
                result
            })
        })
        .collect();

    // Wait for all concurrent tasks to complete; join_all keeps input order
    let results = join_all(tasks).await;
    progress_bar.finish_and_clear();

    let outcomes: Vec<Outcome> = args
        .tickers
        .iter()
        .zip(results)
        .map(|(ticker, joined)| Outcome {
            ticker: ticker.to_uppercase(),
            result: joined.unwrap_or_else(|e| Err(anyhow::anyhow!("task failed: {e}"))),
        })
        .collect();

    let horizon = engine.policy().horizon_years;
    match args.format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&report::to_json(&outcomes))?);
        }
        OutputFormat::Table => {
            for outcome in &outcomes {
                if let Ok(result) = &outcome.result {
                    println!("{}", report::detail_table(result, horizon));
                }
            }
            if outcomes.len() > 1 {
                println!("{}", report::summary_table(&outcomes, horizon));
            }
        }
    }

    let failures: Vec<&Outcome> = outcomes.iter().filter(|o| o.result.is_err()).collect();
    for outcome in &failures {
        if let Err(error) = &outcome.result {
            tracing::debug!(ticker = %outcome.ticker, "Valuation failed: {error:?}");
            eprintln!("{}", report::failure_message(&outcome.ticker, error));
        }
    }

    if failures.len() == outcomes.len() {
        anyhow::bail!("No ticker could be valued");
    }
    Ok(())
}

/// Prints the reference ticker list.
fn handle_tickers(config: &Config) -> anyhow::Result<()> {
    let entries = tickers::load(&config.tickers.path)?;
    println!("List of {} large companies that pay dividends:", entries.len());
    for entry in entries {
        println!("{entry}");
    }
    Ok(())
}
