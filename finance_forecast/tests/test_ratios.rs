use approx::assert_relative_eq;
use chrono::NaiveDate;
use finance_forecast::data::columns::*;
use finance_forecast::{FinancialData, FinancialRecord, ForecastError, RatioCalculator, RatioSummary};
use proptest::prelude::*;

const RATIO_COLUMNS: [&str; 7] = [
    PROFIT_MARGIN,
    RETURN_ON_ASSETS,
    RETURN_ON_EQUITY,
    CURRENT_RATIO,
    QUICK_RATIO,
    DEBT_TO_EQUITY_RATIO,
    INTEREST_COVERAGE_RATIO,
];

fn dataset(rows: &[(f64, f64, f64)]) -> FinancialData {
    let records: Vec<FinancialRecord> = rows
        .iter()
        .enumerate()
        .map(|(i, &(revenue, expenses, profit))| FinancialRecord {
            date: NaiveDate::from_ymd_opt(2020, 1, 1).unwrap() + chrono::Duration::days(i as i64),
            revenue,
            expenses,
            profit,
        })
        .collect();
    FinancialData::from_records(&records).unwrap()
}

fn ratio_bits(data: &FinancialData) -> Vec<Vec<u64>> {
    RATIO_COLUMNS
        .iter()
        .map(|name| {
            data.column_values(name)
                .unwrap()
                .into_iter()
                .map(f64::to_bits)
                .collect()
        })
        .collect()
}

#[test]
fn test_ratio_values() {
    let data = RatioCalculator::all(dataset(&[(1000.0, 600.0, 400.0)])).unwrap();

    assert_relative_eq!(data.column_values(PROFIT_MARGIN).unwrap()[0], 0.4);
    assert_relative_eq!(data.column_values(RETURN_ON_ASSETS).unwrap()[0], 0.25);
    assert_relative_eq!(data.column_values(RETURN_ON_EQUITY).unwrap()[0], 1.0);
    assert_relative_eq!(data.column_values(CURRENT_RATIO).unwrap()[0], 1600.0 / 600.0);
    assert_relative_eq!(data.column_values(QUICK_RATIO).unwrap()[0], 400.0 / 600.0);
    assert_relative_eq!(data.column_values(DEBT_TO_EQUITY_RATIO).unwrap()[0], 1.5);
    assert_relative_eq!(data.column_values(INTEREST_COVERAGE_RATIO).unwrap()[0], 1000.0 / 600.0);
}

#[test]
fn test_ratios_keep_rows_and_base_columns() {
    let base = dataset(&[(1000.0, 600.0, 400.0), (800.0, 900.0, -100.0)]);
    let data = RatioCalculator::all(base.clone()).unwrap();

    assert_eq!(data.len(), 2);
    assert_eq!(data.to_records().unwrap(), base.to_records().unwrap());
    assert_eq!(data.dataframe().width(), 4 + RATIO_COLUMNS.len());
}

#[test]
fn test_division_by_zero_follows_ieee() {
    // zero revenue and zero profit in the same row; second row is well formed
    let data = RatioCalculator::all(dataset(&[(0.0, 0.0, 0.0), (100.0, 50.0, 50.0)])).unwrap();

    assert!(data.column_values(PROFIT_MARGIN).unwrap()[0].is_nan());
    assert!(data.column_values(CURRENT_RATIO).unwrap()[0].is_nan());
    assert_relative_eq!(data.column_values(PROFIT_MARGIN).unwrap()[1], 0.5);

    let data = RatioCalculator::leverage(dataset(&[(100.0, 50.0, 0.0)])).unwrap();
    assert_eq!(data.column_values(DEBT_TO_EQUITY_RATIO).unwrap()[0], f64::INFINITY);

    let data = RatioCalculator::profitability(dataset(&[(0.0, 50.0, -50.0)])).unwrap();
    assert_eq!(data.column_values(PROFIT_MARGIN).unwrap()[0], f64::NEG_INFINITY);
}

#[test]
fn test_groups_are_independent() {
    let data = RatioCalculator::liquidity(dataset(&[(1000.0, 600.0, 400.0)])).unwrap();

    assert!(data.has_column(CURRENT_RATIO));
    assert!(data.has_column(QUICK_RATIO));
    assert!(!data.has_column(PROFIT_MARGIN));
    assert!(!data.has_column(DEBT_TO_EQUITY_RATIO));
}

#[test]
fn test_latest_summary() {
    let data = RatioCalculator::all(dataset(&[(500.0, 400.0, 100.0), (1000.0, 600.0, 400.0)])).unwrap();

    let summary = RatioSummary::latest(&data).unwrap();

    assert_relative_eq!(summary.profit_margin, 0.4);
    assert_relative_eq!(summary.debt_to_equity_ratio, 1.5);

    let text = summary.to_string();
    assert!(text.contains("Profit Margin: 40.00%"));
    assert!(text.contains("Debt to Equity Ratio: 1.50"));
}

#[test]
fn test_summary_requires_ratios() {
    let data = RatioCalculator::profitability(dataset(&[(1000.0, 600.0, 400.0)])).unwrap();
    assert!(matches!(
        RatioSummary::latest(&data),
        Err(ForecastError::DataError(_))
    ));
    assert!(RatioSummary::latest(&dataset(&[])).is_err());
}

fn nonzero() -> impl Strategy<Value = f64> {
    prop_oneof![-1.0e6..-1.0e-3, 1.0e-3..1.0e6]
}

proptest! {
    #[test]
    fn prop_ratio_groups_commute(rows in prop::collection::vec((nonzero(), nonzero(), nonzero()), 1..20)) {
        let canonical = RatioCalculator::all(dataset(&rows)).unwrap();

        let reversed = RatioCalculator::leverage(dataset(&rows)).unwrap();
        let reversed = RatioCalculator::liquidity(reversed).unwrap();
        let reversed = RatioCalculator::profitability(reversed).unwrap();

        let shuffled = RatioCalculator::liquidity(dataset(&rows)).unwrap();
        let shuffled = RatioCalculator::leverage(shuffled).unwrap();
        let shuffled = RatioCalculator::profitability(shuffled).unwrap();

        prop_assert_eq!(ratio_bits(&canonical), ratio_bits(&reversed));
        prop_assert_eq!(ratio_bits(&canonical), ratio_bits(&shuffled));
    }
}
