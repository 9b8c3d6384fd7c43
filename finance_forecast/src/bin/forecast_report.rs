use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::Parser;
use finance_forecast::{
    AppConfig, DataLoader, ForecastModel, ForecastResult, RatioCalculator, RatioSummary,
    Scenario, ScenarioGenerator,
};
use serde::Serialize;
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Ratio, forecast and scenario report over historical financial figures
#[derive(Debug, Parser)]
#[command(name = "forecast_report")]
#[command(about = "Financial ratios, profit forecast and scenario analysis")]
struct Args {
    /// CSV file with date,revenue,expenses,profit columns
    #[arg(long, default_value = concat!(env!("CARGO_MANIFEST_DIR"), "/data/financial_data.csv"))]
    data: PathBuf,

    /// Optional TOML settings file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Scenario to run: base, best or worst
    #[arg(long, default_value = "base")]
    scenario: String,

    /// Month starts to forecast after the last recorded date (overrides the config)
    #[arg(long)]
    months: Option<usize>,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Serialize)]
struct Report {
    latest_ratios: Option<RatioSummary>,
    model_score: Option<f64>,
    scenario: Scenario,
    scenario_profit: Vec<(NaiveDate, f64)>,
    forecast: Option<ForecastResult>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => AppConfig::from_file(path)
            .with_context(|| format!("reading config {}", path.display()))?,
        None => AppConfig::default(),
    };
    if let Some(months) = args.months {
        config = config.with_horizon_months(months).context("invalid --months")?;
    }
    let scenario: Scenario = args.scenario.parse()?;

    let data = DataLoader::from_csv(&args.data)
        .with_context(|| format!("loading {}", args.data.display()))?;
    info!(rows = data.len(), "loaded financial data");

    let data = RatioCalculator::all(data)?;
    let latest_ratios = RatioSummary::latest(&data).ok();

    let scenario_data =
        ScenarioGenerator::generate_with(&data, config.scenarios.parameters(scenario))?;
    let scenario_profit = scenario_data
        .dates()?
        .into_iter()
        .zip(scenario_data.profit()?)
        .collect();

    let mut model = ForecastModel::with_config(data.clone(), config.forecast);
    let model_score = match model.train() {
        Ok(score) => {
            info!(score, "trained forecast model");
            Some(score)
        }
        Err(e) => {
            warn!(error = %e, "training failed, forecast unavailable");
            None
        }
    };

    let forecast = if model.is_trained() {
        let dates = data.future_months(config.horizon_months)?;
        match model.forecast_dates(&dates) {
            Ok(result) => Some(result),
            Err(e) => {
                warn!(error = %e, "forecast failed");
                None
            }
        }
    } else {
        None
    };

    let report = Report {
        latest_ratios,
        model_score,
        scenario,
        scenario_profit,
        forecast,
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }

    Ok(())
}

fn print_report(report: &Report) {
    println!("Financial Forecasting and Scenario Analysis");
    println!();

    match &report.latest_ratios {
        Some(ratios) => println!("{}", ratios),
        None => println!("Financial ratios not available"),
    }
    println!();

    match report.model_score {
        Some(score) => println!("Model Accuracy: {:.2}%", score * 100.0),
        None => println!("Model score not available"),
    }
    println!();

    println!("{} Profit:", report.scenario.label());
    for (date, profit) in &report.scenario_profit {
        println!("  {}  {:>12.2}", date, profit);
    }
    println!();

    match &report.forecast {
        Some(forecast) => {
            println!("Forecasted Profit:");
            for (date, value) in forecast.dates().iter().zip(forecast.values()) {
                let date = date.map(|d| d.to_string()).unwrap_or_else(|| "-".to_string());
                println!("  {}  {:>12.2}", date, value);
            }
        }
        None => println!("Forecast not available"),
    }
}
