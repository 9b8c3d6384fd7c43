use finance_forecast::{DataLoader, ForecastConfig, ForecastModel, RatioCalculator};
use std::path::PathBuf;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load data from CSV
    let csv_path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("data")
        .join("financial_data.csv");

    println!("Loading data from: {}", csv_path.display());
    let data = DataLoader::from_csv(csv_path)?;
    println!("Loaded {} periods", data.len());

    let data = RatioCalculator::all(data)?;

    // Train once, then forecast the next six months
    let model = ForecastModel::build(data.clone(), ForecastConfig::default())?;
    if let Some(summary) = model.training_summary() {
        println!(
            "Held-out R²: {:.4} ({} training rows, {} held out)",
            summary.score, summary.train_rows, summary.test_rows
        );
    }
    if let (Some((month, year)), Some(intercept)) = (model.coefficients(), model.intercept()) {
        println!(
            "profit = {:.2} + {:.2} * month + {:.2} * year",
            intercept, month, year
        );
    }

    let forecast = model.forecast_dates(&data.future_months(6)?)?;
    println!("Forecast for the next {} months:", forecast.len());
    for (date, value) in forecast.dates().iter().zip(forecast.values()) {
        if let Some(date) = date {
            println!("{}: {:.2}", date, value);
        }
    }

    Ok(())
}
