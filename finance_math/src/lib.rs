//! # Finance Math
//!
//! Numeric building blocks for financial forecasting.
//! This crate provides an ordinary least squares model, goodness-of-fit
//! metrics and a reproducible train/test partition. It knows nothing about
//! datasets or dates; callers hand it plain feature rows and targets.

use thiserror::Error;

pub mod metrics;
pub mod regression;
pub mod split;

pub use regression::LinearModel;
pub use split::{shuffled_split, Partition};

/// Errors that can occur in regression and scoring calculations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MathError {
    #[error("Insufficient data for calculation: {0}")]
    InsufficientData(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Calculation error: {0}")]
    CalculationError(String),
}

/// Result type for finance math operations
pub type Result<T> = std::result::Result<T, MathError>;
