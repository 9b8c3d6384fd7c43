//! Error types for the finance_forecast crate

use finance_math::MathError;
use polars::prelude::PolarsError;
use thiserror::Error;

/// Custom error types for the finance_forecast crate
#[derive(Debug, Error)]
pub enum ForecastError {
    /// Error related to data validation or processing
    #[error("Data error: {0}")]
    DataError(String),

    /// Training was attempted on a dataset without rows
    #[error("No data available to train the model")]
    NoData,

    /// Too few rows left in the training partition to fit the model
    #[error("Insufficient data: need at least {required} training rows, got {actual}")]
    InsufficientData { required: usize, actual: usize },

    /// The underlying least squares fit failed
    #[error("Model fit failed: {0}")]
    FitFailure(String),

    /// `forecast` was called before a successful `train`
    #[error("Model has not been trained")]
    ModelNotTrained,

    /// Error related to forecasting operations
    #[error("Forecasting error: {0}")]
    ForecastingError(String),

    /// Error from invalid parameters
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Error from configuration parsing
    #[error("Config error: {0}")]
    ConfigError(String),

    /// Error from IO operations
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Error from CSV parsing
    #[error("CSV error: {0}")]
    CsvError(String),

    /// Error from Polars operations
    #[error("Polars error: {0}")]
    PolarsError(String),
}

impl ForecastError {
    /// Whether this error came out of `train`, leaving the model untrained
    pub fn is_training_error(&self) -> bool {
        matches!(
            self,
            ForecastError::NoData
                | ForecastError::InsufficientData { .. }
                | ForecastError::FitFailure(_)
        )
    }
}

/// Result type with our custom error
pub type Result<T> = std::result::Result<T, ForecastError>;

impl From<PolarsError> for ForecastError {
    fn from(err: PolarsError) -> Self {
        ForecastError::PolarsError(err.to_string())
    }
}

impl From<csv::Error> for ForecastError {
    fn from(err: csv::Error) -> Self {
        ForecastError::CsvError(err.to_string())
    }
}

impl From<toml::de::Error> for ForecastError {
    fn from(err: toml::de::Error) -> Self {
        ForecastError::ConfigError(err.to_string())
    }
}

impl From<MathError> for ForecastError {
    fn from(err: MathError) -> Self {
        match err {
            MathError::InvalidInput(msg) => ForecastError::InvalidParameter(msg),
            MathError::InsufficientData(msg) | MathError::CalculationError(msg) => {
                ForecastError::FitFailure(msg)
            }
        }
    }
}
