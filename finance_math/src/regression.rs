//! Ordinary least squares regression with an intercept term.
//!
//! Fitting is delegated to `linfa-linear`; the fitted parameters are copied
//! out so a model can be cloned, compared and serialized without holding on
//! to linfa types.

use crate::{MathError, Result};
use linfa::dataset::Dataset;
use linfa::traits::Fit;
use linfa_linear::LinearRegression;
use ndarray::{Array1, Array2, Axis};
use serde::Serialize;

/// A fitted linear model `y = intercept + sum(coefficients[j] * x[j])`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LinearModel {
    coefficients: Vec<f64>,
    intercept: f64,
}

impl LinearModel {
    /// Fit a model on row-major feature vectors and their targets.
    ///
    /// Every row must have the same width, and there must be more rows than
    /// varying features so the intercept is identifiable. A feature that is
    /// constant over all rows gets a zero coefficient.
    ///
    /// # Errors
    /// * `InvalidInput` for ragged rows, length mismatches or non-finite values
    /// * `InsufficientData` when there are too few rows
    /// * `CalculationError` when the least squares solve fails or yields
    ///   non-finite parameters (for example with perfectly collinear features)
    pub fn fit(features: &[Vec<f64>], target: &[f64]) -> Result<Self> {
        let x = design_matrix(features)?;
        let (rows, width) = x.dim();

        if target.len() != rows {
            return Err(MathError::InvalidInput(format!(
                "Target length ({}) doesn't match number of rows ({})",
                target.len(),
                rows
            )));
        }
        if target.iter().any(|v| !v.is_finite()) {
            return Err(MathError::InvalidInput(
                "Target contains non-finite values".to_string(),
            ));
        }
        // Columns without variance carry no information once the intercept is
        // fitted; they get a zero coefficient instead of a singular solve.
        let active: Vec<usize> = (0..width)
            .filter(|&j| {
                let column = x.column(j);
                column.iter().any(|v| *v != column[0])
            })
            .collect();

        if rows <= active.len() {
            return Err(MathError::InsufficientData(format!(
                "Need more than {} rows to fit {} varying features with an intercept, got {}",
                active.len(),
                active.len(),
                rows
            )));
        }

        let mut coefficients = vec![0.0; width];
        let intercept = if active.is_empty() {
            target.iter().sum::<f64>() / rows as f64
        } else {
            let dataset = Dataset::new(x.select(Axis(1), &active), Array1::from(target.to_vec()));
            let fitted = LinearRegression::new()
                .with_intercept(true)
                .fit(&dataset)
                .map_err(|e| MathError::CalculationError(e.to_string()))?;

            for (param, &j) in fitted.params().iter().zip(active.iter()) {
                coefficients[j] = *param;
            }
            fitted.intercept()
        };

        if !intercept.is_finite() || coefficients.iter().any(|c| !c.is_finite()) {
            return Err(MathError::CalculationError(
                "Least squares solution is not finite; features may be collinear".to_string(),
            ));
        }

        Ok(Self {
            coefficients,
            intercept,
        })
    }

    /// Predict one value per feature row
    pub fn predict(&self, features: &[Vec<f64>]) -> Result<Vec<f64>> {
        if features.is_empty() {
            return Ok(Vec::new());
        }

        let x = design_matrix(features)?;
        if x.ncols() != self.coefficients.len() {
            return Err(MathError::InvalidInput(format!(
                "Model expects {} features, got {}",
                self.coefficients.len(),
                x.ncols()
            )));
        }

        let coefficients = Array1::from(self.coefficients.clone());
        let predictions = x.dot(&coefficients) + self.intercept;

        Ok(predictions.to_vec())
    }

    /// Fitted coefficients, one per feature column
    pub fn coefficients(&self) -> &[f64] {
        &self.coefficients
    }

    /// Fitted intercept
    pub fn intercept(&self) -> f64 {
        self.intercept
    }
}

/// Pack feature rows into an `n x p` matrix, rejecting ragged or non-finite input
fn design_matrix(features: &[Vec<f64>]) -> Result<Array2<f64>> {
    let width = match features.first() {
        Some(row) if !row.is_empty() => row.len(),
        Some(_) => {
            return Err(MathError::InvalidInput(
                "Feature rows must not be empty".to_string(),
            ))
        }
        None => {
            return Err(MathError::InsufficientData(
                "No feature rows supplied".to_string(),
            ))
        }
    };

    let mut flat = Vec::with_capacity(features.len() * width);
    for (i, row) in features.iter().enumerate() {
        if row.len() != width {
            return Err(MathError::InvalidInput(format!(
                "Row {} has {} features, expected {}",
                i,
                row.len(),
                width
            )));
        }
        if row.iter().any(|v| !v.is_finite()) {
            return Err(MathError::InvalidInput(format!(
                "Row {} contains non-finite feature values",
                i
            )));
        }
        flat.extend_from_slice(row);
    }

    Array2::from_shape_vec((features.len(), width), flat)
        .map_err(|e| MathError::InvalidInput(e.to_string()))
}
