use finance_forecast::data::columns::{MONTH, PROFIT_MARGIN};
use finance_forecast::{
    AppConfig, DataLoader, ForecastModel, RatioCalculator, RatioSummary, Scenario,
    ScenarioGenerator,
};
use std::path::PathBuf;

fn sample_csv() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("data")
        .join("financial_data.csv")
}

#[test]
fn test_full_pipeline() {
    let config = AppConfig::default();

    // Load, enrich, train once
    let data = DataLoader::from_csv(sample_csv()).unwrap();
    assert_eq!(data.len(), 24);

    let data = RatioCalculator::all(data).unwrap();
    assert!(data.has_column(PROFIT_MARGIN));
    assert!(RatioSummary::latest(&data).is_ok());

    let model = ForecastModel::build(data.clone(), config.forecast).unwrap();
    assert!(model.is_trained());
    assert!(model.score().unwrap().is_finite());
    assert!(model.data().has_column(MONTH));

    // Repeated forecasts against the same trained model agree
    let dates = data.future_months(config.horizon_months).unwrap();
    let first = model.forecast_dates(&dates).unwrap();
    let second = model.forecast_dates(&dates).unwrap();
    assert_eq!(first, second);
    assert_eq!(first.len(), 6);
    assert!(first.values().iter().all(|v| v.is_finite()));

    // Scenarios order as expected
    let totals: Vec<f64> = Scenario::ALL
        .iter()
        .map(|&scenario| {
            let params = config.scenarios.parameters(scenario);
            ScenarioGenerator::generate_with(&data, params)
                .unwrap()
                .profit()
                .unwrap()
                .iter()
                .sum()
        })
        .collect();
    let (base, best, worst) = (totals[0], totals[1], totals[2]);
    assert!(best > base);
    assert!(worst < base);
}
