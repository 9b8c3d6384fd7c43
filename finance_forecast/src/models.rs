//! Linear profit forecasting from calendar position.
//!
//! A [`ForecastModel`] owns one dataset and one linear regression of
//! `profit` on `[month, year]`. It starts untrained, becomes trained after a
//! successful [`ForecastModel::train`], and only then answers forecasts.

use crate::config::ForecastConfig;
use crate::data::columns::{MONTH, PROFIT, YEAR};
use crate::data::{float_column, future_frame, parse_dates, FinancialData};
use crate::error::{ForecastError, Result};
use chrono::{Datelike, NaiveDate};
use finance_math::metrics::{mean_absolute_error, r2_score, root_mean_squared_error};
use finance_math::{shuffled_split, LinearModel};
use polars::prelude::*;
use serde::Serialize;
use tracing::debug;

/// Fewest training rows accepted: two features plus the intercept
pub const MIN_TRAINING_ROWS: usize = 3;

/// Fewest held-out rows for which a score is computed
const MIN_SCORING_ROWS: usize = 2;

/// Lifecycle of a [`ForecastModel`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ModelState {
    Untrained,
    Trained,
}

/// Outcome of a training pass
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TrainingSummary {
    /// R² on the held-out rows, 0.0 when too few rows were held out
    pub score: f64,
    pub train_rows: usize,
    pub test_rows: usize,
    pub holdout_mae: Option<f64>,
    pub holdout_rmse: Option<f64>,
}

/// Predicted profit per input date
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastResult {
    dates: Vec<Option<NaiveDate>>,
    values: Vec<f64>,
}

impl ForecastResult {
    /// Create a new forecast result
    pub fn new(dates: Vec<Option<NaiveDate>>, values: Vec<f64>) -> Result<Self> {
        if dates.len() != values.len() {
            return Err(ForecastError::ForecastingError(format!(
                "Values length ({}) doesn't match dates length ({})",
                values.len(),
                dates.len()
            )));
        }

        Ok(Self { dates, values })
    }

    /// Get the forecasted values
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Input dates in the order they were given
    pub fn dates(&self) -> &[Option<NaiveDate>] {
        &self.dates
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// `date` and predicted `profit` columns
    pub fn to_dataframe(&self) -> Result<DataFrame> {
        Ok(DataFrame::new(vec![
            Series::new(crate::data::columns::DATE, self.dates.clone()),
            Series::new(PROFIT, self.values.clone()),
        ])?)
    }
}

/// Linear regression of profit on month and year, bound to one dataset
#[derive(Debug, Clone)]
pub struct ForecastModel {
    data: FinancialData,
    config: ForecastConfig,
    regression: Option<LinearModel>,
    summary: Option<TrainingSummary>,
}

impl ForecastModel {
    /// Untrained model over `data` with the default split settings
    pub fn new(data: FinancialData) -> Self {
        Self::with_config(data, ForecastConfig::default())
    }

    /// Untrained model over `data`
    pub fn with_config(data: FinancialData, config: ForecastConfig) -> Self {
        Self {
            data,
            config,
            regression: None,
            summary: None,
        }
    }

    /// Construct and train in one step.
    ///
    /// The returned model is trained; its held-out score is available from
    /// [`ForecastModel::score`].
    pub fn build(data: FinancialData, config: ForecastConfig) -> Result<Self> {
        config.validate()?;
        let mut model = Self::with_config(data, config);
        model.train()?;
        Ok(model)
    }

    /// Add `month` and `year` derived from `date`, then replace every missing
    /// numeric value (null or NaN) with zero.
    ///
    /// Rows with a missing date get month and year 0. No column is removed.
    pub fn preprocess(df: &DataFrame) -> Result<DataFrame> {
        let dates = parse_dates(df)?;
        let months: Vec<Option<i32>> = dates.iter().map(|d| d.map(|d| d.month() as i32)).collect();
        let years: Vec<Option<i32>> = dates.iter().map(|d| d.map(|d| d.year())).collect();

        let mut out = df.clone();
        out.with_column(Series::new(MONTH, months))?;
        out.with_column(Series::new(YEAR, years))?;

        zero_fill(out)
    }

    /// Fit on a seeded 80/20 split of the held dataset and return R² on the
    /// held-out rows.
    ///
    /// On success the held dataset is replaced by its preprocessed form and
    /// the model becomes trained. On failure the model keeps its previous
    /// state.
    ///
    /// # Errors
    /// * `NoData` when the dataset has no rows
    /// * `InsufficientData` when fewer than [`MIN_TRAINING_ROWS`] rows remain for fitting
    /// * `FitFailure` when the features or targets are unusable or the solve fails
    /// * `InvalidParameter` when the configured test size is out of range
    pub fn train(&mut self) -> Result<f64> {
        let (processed, features, profit) = training_frame(self.data.dataframe())?;
        let rows = processed.height();
        if rows == 0 {
            return Err(ForecastError::NoData);
        }

        let partition = shuffled_split(rows, self.config.test_size, self.config.random_state)?;
        if partition.train.len() < MIN_TRAINING_ROWS {
            return Err(ForecastError::InsufficientData {
                required: MIN_TRAINING_ROWS,
                actual: partition.train.len(),
            });
        }
        debug!(
            rows,
            train_rows = partition.train.len(),
            test_rows = partition.test.len(),
            "partitioned dataset"
        );

        let pick = |indices: &[usize]| -> (Vec<Vec<f64>>, Vec<f64>) {
            indices
                .iter()
                .map(|&i| (features[i].clone(), profit[i]))
                .unzip()
        };
        let (train_x, train_y) = pick(&partition.train);
        let (test_x, test_y) = pick(&partition.test);

        let regression = LinearModel::fit(&train_x, &train_y)
            .map_err(|e| ForecastError::FitFailure(e.to_string()))?;

        let summary = holdout_summary(&regression, &test_x, &test_y, train_x.len())?;
        debug!(
            score = summary.score,
            coefficients = ?regression.coefficients(),
            intercept = regression.intercept(),
            "fitted forecast model"
        );

        self.data = FinancialData::from_dataframe(processed).map_err(fit_failure)?;
        self.regression = Some(regression);
        self.summary = Some(summary);

        Ok(summary.score)
    }

    /// Predict profit for every row of `future`, in input order.
    ///
    /// Only the `date` column is read. The trained model is not changed.
    ///
    /// # Errors
    /// `ModelNotTrained` before a successful [`ForecastModel::train`];
    /// `ForecastingError` for unusable input.
    pub fn forecast(&self, future: &DataFrame) -> Result<ForecastResult> {
        let regression = self
            .regression
            .as_ref()
            .ok_or(ForecastError::ModelNotTrained)?;

        let local = |e: ForecastError| ForecastError::ForecastingError(e.to_string());

        let processed = Self::preprocess(future).map_err(local)?;
        let features = features(&processed).map_err(local)?;
        let values = regression
            .predict(&features)
            .map_err(|e| ForecastError::ForecastingError(e.to_string()))?;
        let dates = parse_dates(future).map_err(local)?;

        debug!(periods = values.len(), "forecast profit");

        ForecastResult::new(dates, values)
    }

    /// Predict profit for the given dates
    pub fn forecast_dates(&self, dates: &[NaiveDate]) -> Result<ForecastResult> {
        if self.regression.is_none() {
            return Err(ForecastError::ModelNotTrained);
        }
        let frame = future_frame(dates).map_err(|e| ForecastError::ForecastingError(e.to_string()))?;
        self.forecast(&frame)
    }

    pub fn state(&self) -> ModelState {
        if self.regression.is_some() {
            ModelState::Trained
        } else {
            ModelState::Untrained
        }
    }

    pub fn is_trained(&self) -> bool {
        self.state() == ModelState::Trained
    }

    /// Held-out R² of the last successful training pass
    pub fn score(&self) -> Option<f64> {
        self.summary.map(|s| s.score)
    }

    pub fn training_summary(&self) -> Option<&TrainingSummary> {
        self.summary.as_ref()
    }

    /// Fitted `(month, year)` coefficients
    pub fn coefficients(&self) -> Option<(f64, f64)> {
        self.regression.as_ref().and_then(|r| match r.coefficients() {
            [month, year] => Some((*month, *year)),
            _ => None,
        })
    }

    pub fn intercept(&self) -> Option<f64> {
        self.regression.as_ref().map(LinearModel::intercept)
    }

    /// The held dataset; preprocessed once the model is trained
    pub fn data(&self) -> &FinancialData {
        &self.data
    }

    pub fn config(&self) -> &ForecastConfig {
        &self.config
    }
}

fn fit_failure(e: ForecastError) -> ForecastError {
    match e {
        ForecastError::FitFailure(_) => e,
        other => ForecastError::FitFailure(other.to_string()),
    }
}

/// Preprocessed frame with its feature rows and profit targets
fn training_frame(df: &DataFrame) -> Result<(DataFrame, Vec<Vec<f64>>, Vec<f64>)> {
    let processed = ForecastModel::preprocess(df).map_err(fit_failure)?;
    let features = features(&processed).map_err(fit_failure)?;
    let profit = float_column(&processed, PROFIT).map_err(fit_failure)?;
    Ok((processed, features, profit))
}

/// `[month, year]` feature rows
fn features(df: &DataFrame) -> Result<Vec<Vec<f64>>> {
    let months = float_column(df, MONTH)?;
    let years = float_column(df, YEAR)?;

    Ok(months
        .into_iter()
        .zip(years)
        .map(|(month, year)| vec![month, year])
        .collect())
}

fn holdout_summary(
    regression: &LinearModel,
    test_x: &[Vec<f64>],
    test_y: &[f64],
    train_rows: usize,
) -> Result<TrainingSummary> {
    if test_y.is_empty() {
        return Ok(TrainingSummary {
            score: 0.0,
            train_rows,
            test_rows: 0,
            holdout_mae: None,
            holdout_rmse: None,
        });
    }

    let predicted = regression
        .predict(test_x)
        .map_err(|e| ForecastError::FitFailure(e.to_string()))?;

    let score = if test_y.len() < MIN_SCORING_ROWS {
        0.0
    } else {
        r2_score(test_y, &predicted).map_err(|e| ForecastError::FitFailure(e.to_string()))?
    };

    Ok(TrainingSummary {
        score,
        train_rows,
        test_rows: test_y.len(),
        holdout_mae: mean_absolute_error(test_y, &predicted).ok(),
        holdout_rmse: root_mean_squared_error(test_y, &predicted).ok(),
    })
}

/// Replace nulls in numeric columns and NaN in float columns with zero
fn zero_fill(df: DataFrame) -> Result<DataFrame> {
    let exprs: Vec<Expr> = df
        .get_columns()
        .iter()
        .filter_map(|series| {
            let name = series.name();
            let dtype = series.dtype();
            if dtype.is_float() {
                Some(
                    col(name)
                        .fill_nan(lit(0.0))
                        .fill_null(lit(0.0))
                        .alias(name),
                )
            } else if dtype.is_numeric() {
                Some(col(name).fill_null(lit(0)).alias(name))
            } else {
                None
            }
        })
        .collect();

    Ok(df.lazy().with_columns(exprs).collect()?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preprocess_derives_calendar_columns() {
        let df = DataFrame::new(vec![
            Series::new("date", &["2023-03-01", "2024-11-15"]),
            Series::new("profit", &[Some(1.0), None]),
            Series::new("ratio", &[f64::NAN, 2.0]),
        ])
        .unwrap();

        let out = ForecastModel::preprocess(&df).unwrap();

        assert_eq!(float_column(&out, MONTH).unwrap(), vec![3.0, 11.0]);
        assert_eq!(float_column(&out, YEAR).unwrap(), vec![2023.0, 2024.0]);
        assert_eq!(float_column(&out, PROFIT).unwrap(), vec![1.0, 0.0]);
        assert_eq!(float_column(&out, "ratio").unwrap(), vec![0.0, 2.0]);
        assert_eq!(out.width(), 5);
    }

    #[test]
    fn test_preprocess_zero_fills_missing_dates() {
        let df = DataFrame::new(vec![Series::new("date", &[Some("2023-05-01"), None])]).unwrap();

        let out = ForecastModel::preprocess(&df).unwrap();

        assert_eq!(float_column(&out, MONTH).unwrap(), vec![5.0, 0.0]);
        assert_eq!(float_column(&out, YEAR).unwrap(), vec![2023.0, 0.0]);
    }

    #[test]
    fn test_unusable_training_frame_is_a_fit_failure() {
        let no_profit = DataFrame::new(vec![Series::new("date", &["2023-01-01"])]).unwrap();
        let err = training_frame(&no_profit).unwrap_err();
        assert!(matches!(err, ForecastError::FitFailure(_)));
        assert!(err.is_training_error());

        let bad_dates = DataFrame::new(vec![
            Series::new("date", &[1i64, 2]),
            Series::new("profit", &[1.0, 2.0]),
        ])
        .unwrap();
        let err = training_frame(&bad_dates).unwrap_err();
        assert!(matches!(err, ForecastError::FitFailure(_)));
    }

    #[test]
    fn test_forecast_result_length_check() {
        assert!(ForecastResult::new(vec![None], vec![1.0, 2.0]).is_err());
        let result = ForecastResult::new(vec![None, None], vec![1.0, 2.0]).unwrap();
        assert_eq!(result.len(), 2);
        assert_eq!(result.to_dataframe().unwrap().height(), 2);
    }
}
