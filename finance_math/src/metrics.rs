//! Goodness-of-fit and error metrics for predictions

use crate::{MathError, Result};

fn check_lengths(actual: &[f64], predicted: &[f64]) -> Result<()> {
    if actual.len() != predicted.len() || actual.is_empty() {
        return Err(MathError::InvalidInput(
            "Actual and predicted values must have the same non-zero length".to_string(),
        ));
    }
    Ok(())
}

/// Coefficient of determination.
///
/// 1.0 is a perfect fit, and the value is negative when the predictions are
/// worse than always predicting the mean. When the actual values have no
/// variance the score is 1.0 for a perfect prediction and 0.0 otherwise.
pub fn r2_score(actual: &[f64], predicted: &[f64]) -> Result<f64> {
    check_lengths(actual, predicted)?;

    let mean = actual.iter().sum::<f64>() / actual.len() as f64;
    let ss_total: f64 = actual.iter().map(|a| (a - mean).powi(2)).sum();
    let ss_residual: f64 = actual
        .iter()
        .zip(predicted.iter())
        .map(|(a, p)| (a - p).powi(2))
        .sum();

    if ss_total == 0.0 {
        return Ok(if ss_residual == 0.0 { 1.0 } else { 0.0 });
    }

    Ok(1.0 - ss_residual / ss_total)
}

/// Mean absolute error
pub fn mean_absolute_error(actual: &[f64], predicted: &[f64]) -> Result<f64> {
    check_lengths(actual, predicted)?;

    let sum: f64 = actual
        .iter()
        .zip(predicted.iter())
        .map(|(a, p)| (a - p).abs())
        .sum();

    Ok(sum / actual.len() as f64)
}

/// Root mean squared error
pub fn root_mean_squared_error(actual: &[f64], predicted: &[f64]) -> Result<f64> {
    check_lengths(actual, predicted)?;

    let mse = actual
        .iter()
        .zip(predicted.iter())
        .map(|(a, p)| (a - p).powi(2))
        .sum::<f64>()
        / actual.len() as f64;

    Ok(mse.sqrt())
}
