//! Historical financial figures held as a polars frame

use crate::error::{ForecastError, Result};
use chrono::{Datelike, Months, NaiveDate};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::path::Path;
use tracing::debug;

/// Column names shared by the dataset, ratio and forecasting code
pub mod columns {
    pub const DATE: &str = "date";
    pub const REVENUE: &str = "revenue";
    pub const EXPENSES: &str = "expenses";
    pub const PROFIT: &str = "profit";

    pub const MONTH: &str = "month";
    pub const YEAR: &str = "year";

    pub const PROFIT_MARGIN: &str = "profit_margin";
    pub const RETURN_ON_ASSETS: &str = "return_on_assets";
    pub const RETURN_ON_EQUITY: &str = "return_on_equity";
    pub const CURRENT_RATIO: &str = "current_ratio";
    pub const QUICK_RATIO: &str = "quick_ratio";
    pub const DEBT_TO_EQUITY_RATIO: &str = "debt_to_equity_ratio";
    pub const INTEREST_COVERAGE_RATIO: &str = "interest_coverage_ratio";

    /// Numeric columns every dataset must carry
    pub const BASE_FIGURES: [&str; 3] = [REVENUE, EXPENSES, PROFIT];
}

use columns::{DATE, EXPENSES, PROFIT, REVENUE};

/// One period of historical figures
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialRecord {
    pub date: NaiveDate,
    pub revenue: f64,
    pub expenses: f64,
    pub profit: f64,
}

impl FinancialRecord {
    /// Record whose profit is `revenue - expenses`
    pub fn new(date: NaiveDate, revenue: f64, expenses: f64) -> Self {
        Self {
            date,
            revenue,
            expenses,
            profit: revenue - expenses,
        }
    }
}

/// CSV row; empty numeric cells load as missing
#[derive(Debug, Deserialize)]
struct CsvRow {
    date: NaiveDate,
    revenue: Option<f64>,
    expenses: Option<f64>,
    profit: Option<f64>,
}

impl From<CsvRow> for FinancialRecord {
    fn from(row: CsvRow) -> Self {
        Self {
            date: row.date,
            revenue: row.revenue.unwrap_or(f64::NAN),
            expenses: row.expenses.unwrap_or(f64::NAN),
            profit: row.profit.unwrap_or(f64::NAN),
        }
    }
}

/// Dataset of financial figures plus any derived columns.
///
/// The frame always has a non-null `date` column of Date type and Float64
/// `revenue`, `expenses` and `profit` columns. Row order is insertion order.
#[derive(Debug, Clone)]
pub struct FinancialData {
    df: DataFrame,
}

/// Data loader for financial figures
#[derive(Debug)]
pub struct DataLoader;

impl DataLoader {
    /// Load figures from a CSV file with `date,revenue,expenses,profit` headers.
    ///
    /// Dates are `YYYY-MM-DD`. Extra columns are ignored.
    pub fn from_csv<P: AsRef<Path>>(path: P) -> Result<FinancialData> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let mut reader = csv::Reader::from_reader(file);

        let records = reader
            .deserialize::<CsvRow>()
            .map(|row| row.map(FinancialRecord::from))
            .collect::<std::result::Result<Vec<_>, _>>()?;

        debug!(path = %path.display(), rows = records.len(), "loaded financial records");

        FinancialData::from_records(&records)
    }
}

impl FinancialData {
    /// Build a dataset from records, keeping their order
    pub fn from_records(records: &[FinancialRecord]) -> Result<Self> {
        let dates: Vec<NaiveDate> = records.iter().map(|r| r.date).collect();
        let revenue: Vec<f64> = records.iter().map(|r| r.revenue).collect();
        let expenses: Vec<f64> = records.iter().map(|r| r.expenses).collect();
        let profit: Vec<f64> = records.iter().map(|r| r.profit).collect();

        let df = DataFrame::new(vec![
            Series::new(DATE, dates),
            Series::new(REVENUE, revenue),
            Series::new(EXPENSES, expenses),
            Series::new(PROFIT, profit),
        ])?;

        Self::from_dataframe(df)
    }

    /// Wrap an existing frame.
    ///
    /// The `date` column may be Date, Datetime or `YYYY-MM-DD` strings and is
    /// normalised to Date. Base figures are cast to Float64. Every other
    /// column is kept untouched.
    pub fn from_dataframe(mut df: DataFrame) -> Result<Self> {
        let dates = parse_dates(&df)?;
        if dates.iter().any(|d| d.is_none()) {
            return Err(ForecastError::DataError(
                "Column 'date' contains missing values".to_string(),
            ));
        }
        if df.column(DATE)?.dtype() != &DataType::Date {
            df.with_column(Series::new(DATE, dates))?;
        }

        for name in columns::BASE_FIGURES {
            let series = df.column(name).map_err(|_| {
                ForecastError::DataError(format!("Missing required column '{}'", name))
            })?;
            if !series.dtype().is_numeric() {
                return Err(ForecastError::DataError(format!(
                    "Column '{}' must be numeric, found {}",
                    name,
                    series.dtype()
                )));
            }
            if series.dtype() != &DataType::Float64 {
                let casted = series.cast(&DataType::Float64)?;
                df.with_column(casted)?;
            }
        }

        Ok(Self { df })
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.df.height()
    }

    /// Whether the dataset has no rows
    pub fn is_empty(&self) -> bool {
        self.df.height() == 0
    }

    /// Get the DataFrame
    pub fn dataframe(&self) -> &DataFrame {
        &self.df
    }

    /// Take the DataFrame out of the wrapper
    pub fn into_dataframe(self) -> DataFrame {
        self.df
    }

    /// Whether a column with this name exists
    pub fn has_column(&self, name: &str) -> bool {
        self.df.get_column_names().contains(&name)
    }

    /// Dates in row order
    pub fn dates(&self) -> Result<Vec<NaiveDate>> {
        Ok(parse_dates(&self.df)?.into_iter().flatten().collect())
    }

    /// Values of a numeric column as f64, with missing values as NaN
    pub fn column_values(&self, name: &str) -> Result<Vec<f64>> {
        float_column(&self.df, name)
    }

    pub fn revenue(&self) -> Result<Vec<f64>> {
        self.column_values(REVENUE)
    }

    pub fn expenses(&self) -> Result<Vec<f64>> {
        self.column_values(EXPENSES)
    }

    pub fn profit(&self) -> Result<Vec<f64>> {
        self.column_values(PROFIT)
    }

    /// Latest date in the dataset, if any
    pub fn last_date(&self) -> Result<Option<NaiveDate>> {
        Ok(self.dates()?.into_iter().max())
    }

    /// The `n` month starts strictly after the latest date
    pub fn future_months(&self, n: usize) -> Result<Vec<NaiveDate>> {
        let last = self.last_date()?.ok_or_else(|| {
            ForecastError::DataError("Cannot extend an empty dataset".to_string())
        })?;

        let first = last
            .with_day(1)
            .and_then(|d| d.checked_add_months(Months::new(1)));

        Ok(std::iter::successors(first, |d| d.checked_add_months(Months::new(1)))
            .take(n)
            .collect())
    }

    /// Base figures back as records
    pub fn to_records(&self) -> Result<Vec<FinancialRecord>> {
        let dates = self.dates()?;
        let revenue = self.revenue()?;
        let expenses = self.expenses()?;
        let profit = self.profit()?;

        Ok(dates
            .into_iter()
            .zip(revenue)
            .zip(expenses)
            .zip(profit)
            .map(|(((date, revenue), expenses), profit)| FinancialRecord {
                date,
                revenue,
                expenses,
                profit,
            })
            .collect())
    }
}

/// Every first-of-month date in `[start, end]`.
///
/// A start that is not itself a month start rolls forward to the next one.
pub fn month_starts(start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    let first = if start.day() == 1 {
        Some(start)
    } else {
        start
            .with_day(1)
            .and_then(|d| d.checked_add_months(Months::new(1)))
    };

    std::iter::successors(first, |d| d.checked_add_months(Months::new(1)))
        .take_while(|d| *d <= end)
        .collect()
}

/// Frame with a single `date` column, the input shape `forecast` expects
pub fn future_frame(dates: &[NaiveDate]) -> Result<DataFrame> {
    Ok(DataFrame::new(vec![Series::new(DATE, dates.to_vec())])?)
}

/// Read the `date` column of any frame, accepting Date, Datetime and string columns
pub(crate) fn parse_dates(df: &DataFrame) -> Result<Vec<Option<NaiveDate>>> {
    let series = df
        .column(DATE)
        .map_err(|_| ForecastError::DataError("Missing required column 'date'".to_string()))?;

    match series.dtype() {
        DataType::Date => Ok(series.date()?.as_date_iter().collect()),
        DataType::Datetime(_, _) => {
            let casted = series.cast(&DataType::Date)?;
            let dates = casted.date()?.as_date_iter().collect();
            Ok(dates)
        }
        DataType::Utf8 => series
            .utf8()?
            .into_iter()
            .map(|value| value.map(parse_date).transpose())
            .collect(),
        other => Err(ForecastError::DataError(format!(
            "Column 'date' has unsupported type {}",
            other
        ))),
    }
}

fn parse_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|e| ForecastError::DataError(format!("Invalid date '{}': {}", value, e)))
}

/// Numeric column as f64 values, nulls as NaN
pub(crate) fn float_column(df: &DataFrame, name: &str) -> Result<Vec<f64>> {
    let series = df
        .column(name)
        .map_err(|_| ForecastError::DataError(format!("Missing column '{}'", name)))?;
    if !series.dtype().is_numeric() {
        return Err(ForecastError::DataError(format!(
            "Column '{}' must be numeric, found {}",
            name,
            series.dtype()
        )));
    }

    let casted = series.cast(&DataType::Float64)?;
    let values = casted
        .f64()?
        .into_iter()
        .map(|v| v.unwrap_or(f64::NAN))
        .collect();

    Ok(values)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_month_starts_rolls_forward() {
        let starts = month_starts(date(2023, 12, 15), date(2024, 3, 1));
        assert_eq!(starts, vec![date(2024, 1, 1), date(2024, 2, 1), date(2024, 3, 1)]);
    }

    #[test]
    fn test_month_starts_includes_aligned_start() {
        let starts = month_starts(date(2023, 12, 1), date(2024, 1, 31));
        assert_eq!(starts, vec![date(2023, 12, 1), date(2024, 1, 1)]);
        assert!(month_starts(date(2024, 2, 2), date(2024, 2, 28)).is_empty());
    }

    #[test]
    fn test_string_dates_are_normalised() {
        let df = DataFrame::new(vec![
            Series::new(DATE, &["2023-01-01", "2023-02-01"]),
            Series::new(REVENUE, &[100i64, 200]),
            Series::new(EXPENSES, &[50.0, 80.0]),
            Series::new(PROFIT, &[50.0, 120.0]),
        ])
        .unwrap();

        let data = FinancialData::from_dataframe(df).unwrap();

        assert_eq!(data.dataframe().column(DATE).unwrap().dtype(), &DataType::Date);
        assert_eq!(data.dates().unwrap(), vec![date(2023, 1, 1), date(2023, 2, 1)]);
        assert_eq!(data.revenue().unwrap(), vec![100.0, 200.0]);
    }

    #[test]
    fn test_missing_required_column() {
        let df = DataFrame::new(vec![
            Series::new(DATE, &["2023-01-01"]),
            Series::new(REVENUE, &[100.0]),
        ])
        .unwrap();

        let err = FinancialData::from_dataframe(df).unwrap_err();
        assert!(matches!(err, ForecastError::DataError(msg) if msg.contains("expenses")));
    }
}
