//! Profitability, liquidity and leverage ratios.
//!
//! Every ratio is a row-wise quotient of the three base figures. Divisions by
//! zero follow IEEE-754 and yield infinities or NaN for that row only. The
//! three groups read nothing but the base figures, so they can run in any
//! order or be skipped independently.

use crate::data::columns::*;
use crate::data::FinancialData;
use crate::error::{ForecastError, Result};
use polars::prelude::*;
use serde::Serialize;
use std::fmt;

/// Adds derived ratio columns to a dataset
#[derive(Debug)]
pub struct RatioCalculator;

impl RatioCalculator {
    /// `profit_margin`, `return_on_assets` and `return_on_equity`
    pub fn profitability(data: FinancialData) -> Result<FinancialData> {
        Self::with_ratios(
            data,
            [
                (col(PROFIT) / col(REVENUE)).alias(PROFIT_MARGIN),
                (col(PROFIT) / (col(REVENUE) + col(EXPENSES))).alias(RETURN_ON_ASSETS),
                (col(PROFIT) / (col(REVENUE) - col(EXPENSES))).alias(RETURN_ON_EQUITY),
            ],
        )
    }

    /// `current_ratio` and `quick_ratio`
    pub fn liquidity(data: FinancialData) -> Result<FinancialData> {
        Self::with_ratios(
            data,
            [
                ((col(REVENUE) + col(EXPENSES)) / col(EXPENSES)).alias(CURRENT_RATIO),
                ((col(REVENUE) - col(EXPENSES)) / col(EXPENSES)).alias(QUICK_RATIO),
            ],
        )
    }

    /// `debt_to_equity_ratio` and `interest_coverage_ratio`
    pub fn leverage(data: FinancialData) -> Result<FinancialData> {
        Self::with_ratios(
            data,
            [
                (col(EXPENSES) / col(PROFIT)).alias(DEBT_TO_EQUITY_RATIO),
                (col(REVENUE) / col(EXPENSES)).alias(INTEREST_COVERAGE_RATIO),
            ],
        )
    }

    /// All three groups
    pub fn all(data: FinancialData) -> Result<FinancialData> {
        let data = Self::profitability(data)?;
        let data = Self::liquidity(data)?;
        Self::leverage(data)
    }

    fn with_ratios<E: AsRef<[Expr]>>(data: FinancialData, exprs: E) -> Result<FinancialData> {
        let df = data.into_dataframe().lazy().with_columns(exprs).collect()?;
        FinancialData::from_dataframe(df)
    }
}

/// The seven ratios of one row, usually the most recent period
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RatioSummary {
    pub profit_margin: f64,
    pub return_on_assets: f64,
    pub return_on_equity: f64,
    pub current_ratio: f64,
    pub quick_ratio: f64,
    pub debt_to_equity_ratio: f64,
    pub interest_coverage_ratio: f64,
}

impl RatioSummary {
    /// Ratios of the last row. All three groups must have been computed.
    pub fn latest(data: &FinancialData) -> Result<Self> {
        if data.is_empty() {
            return Err(ForecastError::DataError(
                "No rows to summarise".to_string(),
            ));
        }

        let last = |name: &str| -> Result<f64> {
            if !data.has_column(name) {
                return Err(ForecastError::DataError(format!(
                    "Ratio column '{}' has not been computed",
                    name
                )));
            }
            let values = data.column_values(name)?;
            Ok(values.last().copied().unwrap_or(f64::NAN))
        };

        Ok(Self {
            profit_margin: last(PROFIT_MARGIN)?,
            return_on_assets: last(RETURN_ON_ASSETS)?,
            return_on_equity: last(RETURN_ON_EQUITY)?,
            current_ratio: last(CURRENT_RATIO)?,
            quick_ratio: last(QUICK_RATIO)?,
            debt_to_equity_ratio: last(DEBT_TO_EQUITY_RATIO)?,
            interest_coverage_ratio: last(INTEREST_COVERAGE_RATIO)?,
        })
    }
}

impl fmt::Display for RatioSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Profitability Ratios:")?;
        writeln!(f, "  Profit Margin: {:.2}%", self.profit_margin * 100.0)?;
        writeln!(f, "  Return on Assets: {:.2}%", self.return_on_assets * 100.0)?;
        writeln!(f, "  Return on Equity: {:.2}%", self.return_on_equity * 100.0)?;
        writeln!(f, "Liquidity Ratios:")?;
        writeln!(f, "  Current Ratio: {:.2}", self.current_ratio)?;
        writeln!(f, "  Quick Ratio: {:.2}", self.quick_ratio)?;
        writeln!(f, "Leverage Ratios:")?;
        writeln!(f, "  Debt to Equity Ratio: {:.2}", self.debt_to_equity_ratio)?;
        write!(
            f,
            "  Interest Coverage Ratio: {:.2}",
            self.interest_coverage_ratio
        )
    }
}
