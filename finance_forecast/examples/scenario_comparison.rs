use finance_forecast::{DataLoader, RatioCalculator, RatioSummary, Scenario, ScenarioGenerator, ScenarioPresets};
use std::path::PathBuf;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let csv_path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("data")
        .join("financial_data.csv");
    let data = DataLoader::from_csv(csv_path)?;
    let presets = ScenarioPresets::default();

    println!("{:<12} {:>14} {:>14}", "Scenario", "Total profit", "Last margin");
    for scenario in Scenario::ALL {
        let scenario_data = ScenarioGenerator::generate_with(&data, presets.parameters(scenario))?;
        let total: f64 = scenario_data.profit()?.iter().sum();

        // Ratios are stale on a scenario copy, so recompute them
        let ratios = RatioSummary::latest(&RatioCalculator::all(scenario_data)?)?;

        println!(
            "{:<12} {:>14.2} {:>13.2}%",
            scenario.label(),
            total,
            ratios.profit_margin * 100.0
        );
    }

    Ok(())
}
